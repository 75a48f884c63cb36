//! Batch enrichment: one generation call per eligible record, in input order.
//!
//! Each record ends the run in one of three states. Records missing `name`,
//! `era` or `theme` are skipped without a call. Eligible records are either
//! updated with the trimmed generated text or, when the call fails, left
//! exactly as they were. No single record can abort the batch.

use crate::error::{EnrichError, Result};
use crate::llm::{DescriptionGenerator, GenerationParams};
use crate::prompt::PromptProfile;
use crate::record::{
    display_name, read_records, write_records, ExhibitFields, Record, DESCRIPTION_FIELD,
};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Terminal state of one record for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Skipped,
    Updated(String),
    Failed { reason: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichSummary {
    pub total: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl EnrichSummary {
    fn record(&mut self, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Skipped => self.skipped += 1,
            ItemOutcome::Updated(_) => self.updated += 1,
            ItemOutcome::Failed { .. } => self.failed += 1,
        }
    }
}

pub struct Enricher<G> {
    generator: G,
    profile: PromptProfile,
}

impl<G: DescriptionGenerator> Enricher<G> {
    pub fn new(generator: G, profile: PromptProfile) -> Self {
        Self { generator, profile }
    }

    pub fn profile(&self) -> &PromptProfile {
        &self.profile
    }

    pub fn params(&self) -> GenerationParams {
        GenerationParams {
            temperature: self.profile.temperature,
            // Headroom over the character limit so replies are not cut mid-sentence.
            max_tokens: self.profile.max_length.map(|n| n.saturating_mul(4)),
        }
    }

    /// Enrich a single record in place.
    pub async fn enrich_record(&self, record: &mut Record) -> ItemOutcome {
        let prompt = match ExhibitFields::from_record(record) {
            Some(fields) => self.profile.render(&fields),
            None => return ItemOutcome::Skipped,
        };

        match self.generator.generate(&prompt, &self.params()).await {
            Ok(text) => {
                let description = text.trim().to_string();
                record.insert(
                    DESCRIPTION_FIELD.to_string(),
                    Value::String(description.clone()),
                );
                ItemOutcome::Updated(description)
            }
            Err(e) => ItemOutcome::Failed {
                reason: e.to_string(),
            },
        }
    }

    /// Run the enrichment loop over `records`, strictly one at a time.
    pub async fn enrich_records(&self, records: &mut [Record]) -> EnrichSummary {
        let total = records.len();
        let mut summary = EnrichSummary {
            total,
            ..Default::default()
        };

        info!(
            profile = %self.profile.name,
            temperature = self.profile.temperature,
            "Enriching {} records",
            total
        );

        for (idx, record) in records.iter_mut().enumerate() {
            let name = display_name(record);
            let outcome = self.enrich_record(record).await;
            match &outcome {
                ItemOutcome::Updated(_) => {
                    info!("[{}/{}] {}: updated", idx + 1, total, name);
                }
                ItemOutcome::Skipped => {
                    info!(
                        "[{}/{}] {}: skipped (missing name, era or theme)",
                        idx + 1,
                        total,
                        name
                    );
                }
                ItemOutcome::Failed { reason } => {
                    warn!("[{}/{}] {}: failed: {}", idx + 1, total, name, reason);
                }
            }
            summary.record(&outcome);
        }

        summary
    }

    /// Load `input`, enrich every record and write the whole collection to
    /// `output` once. `output` must not be the input file.
    pub async fn run(&self, input: &Path, output: &Path) -> Result<EnrichSummary> {
        if !input.is_file() {
            return Err(EnrichError::InputNotFound(input.to_path_buf()));
        }
        if is_same_file(input, output)? {
            return Err(EnrichError::OutputOverwritesInput(output.to_path_buf()));
        }

        let mut records = read_records(input)?;
        let summary = self.enrich_records(&mut records).await;
        write_records(output, &records)?;

        info!(
            updated = summary.updated,
            skipped = summary.skipped,
            failed = summary.failed,
            "Wrote {}",
            output.display()
        );
        Ok(summary)
    }
}

fn is_same_file(input: &Path, output: &Path) -> Result<bool> {
    if !output.exists() {
        return Ok(false);
    }
    Ok(fs::canonicalize(input)? == fs::canonicalize(output)?)
}
