//! Entry points behind the CLI subcommands.

use crate::config::{LlmOverrides, LlmSettings};
use crate::convert::{convert_csv_to_json, ConvertSummary};
use crate::enricher::{EnrichSummary, Enricher};
use crate::error::{EnrichError, Result};
use crate::llm::LlmClient;
use crate::prompt::PromptProfile;
use std::path::{Path, PathBuf};
use tracing::info;

pub fn convert(input: &Path, output: &Path) -> Result<ConvertSummary> {
    convert_csv_to_json(input, output)
}

#[derive(Debug, Clone)]
pub struct EnrichOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub profile: String,
    pub template: Option<PathBuf>,
    pub temperature: Option<f32>,
    pub llm: LlmOverrides,
}

pub async fn enrich(options: EnrichOptions) -> Result<EnrichSummary> {
    enrich_with_env(options, |key| std::env::var(key).ok()).await
}

/// Resolve the credential before anything else, so a missing key means no
/// file is read or written and no request is made.
pub async fn enrich_with_env<F>(options: EnrichOptions, lookup: F) -> Result<EnrichSummary>
where
    F: Fn(&str) -> Option<String>,
{
    let settings = LlmSettings::resolve(options.llm.clone(), lookup)?;
    let profile = build_profile(&options)?;
    let client = LlmClient::new(&settings).map_err(|e| EnrichError::Config(e.to_string()))?;

    info!(model = client.model(), base_url = %settings.base_url, "Using chat-completion endpoint");
    Enricher::new(client, profile)
        .run(&options.input, &options.output)
        .await
}

fn build_profile(options: &EnrichOptions) -> Result<PromptProfile> {
    let mut profile = PromptProfile::builtin(&options.profile)?;
    if let Some(path) = &options.template {
        profile = profile.with_template_file(path)?;
    }
    if let Some(temperature) = options.temperature {
        profile = profile.with_temperature(temperature)?;
    }
    Ok(profile)
}
