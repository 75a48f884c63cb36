//! Convert exhibit CSV exports to JSON and enrich the records with
//! LLM-written descriptions.

pub mod commands;
pub mod config;
pub mod convert;
pub mod enricher;
pub mod error;
pub mod llm;
pub mod prompt;
pub mod record;

pub use enricher::{EnrichSummary, Enricher, ItemOutcome};
pub use error::{EnrichError, GenerationError, Result};
pub use llm::{DescriptionGenerator, GenerationParams, LlmClient};
pub use prompt::PromptProfile;
pub use record::Record;
