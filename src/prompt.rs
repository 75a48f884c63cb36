//! Prompt profiles for description generation.
//!
//! A profile bundles the instruction template with the sampling temperature
//! and optional length hints. Templates use `{name}`, `{era}` and `{theme}`
//! slots, plus `{min_length}`/`{max_length}` when the profile has hints.

use crate::error::{EnrichError, Result};
use crate::record::ExhibitFields;
use std::fs;
use std::path::Path;

pub const REQUIRED_SLOTS: [&str; 3] = ["{name}", "{era}", "{theme}"];

const CONCISE_TEMPLATE: &str = r#"You are a museum curator. Using the information below, write an engaging and educational description for this exhibit.

Information:
- Name: {name}
- Era: {era}
- Theme: {theme}

Constraints:
- Write in Japanese.
- Keep it short: one or two sentences.
- Convey the historical background of the era or how the object was used.

Output (the description only):"#;

const CURATOR_TEMPLATE: &str = r#"You are a museum curator writing a caption for an exhibit panel.

Information:
- Name: {name}
- Era: {era}
- Theme: {theme}

Constraints:
- Write in Japanese, in the polite desu/masu register.
- Between {min_length} and {max_length} characters.
- Structure: what the object is, then how it was used or what it meant in its era.
- State only well-established facts. Do not invent dates, places, people or measurements; if unsure, stay general.
- No headings, bullet points, quotation marks or emoji.

Output (the caption only):"#;

#[derive(Debug, Clone, PartialEq)]
pub struct PromptProfile {
    pub name: String,
    pub template: String,
    pub temperature: f32,
    pub min_length: Option<u32>,
    pub max_length: Option<u32>,
}

impl PromptProfile {
    /// Short one-to-two sentence descriptions.
    pub fn concise() -> Self {
        Self {
            name: "concise".to_string(),
            template: CONCISE_TEMPLATE.to_string(),
            temperature: 0.7,
            min_length: None,
            max_length: None,
        }
    }

    /// Longer, fact-conservative captions of 100-300 characters.
    pub fn curator() -> Self {
        Self {
            name: "curator".to_string(),
            template: CURATOR_TEMPLATE.to_string(),
            temperature: 0.3,
            min_length: Some(100),
            max_length: Some(300),
        }
    }

    pub fn builtin(name: &str) -> Result<Self> {
        match name {
            "concise" => Ok(Self::concise()),
            "curator" => Ok(Self::curator()),
            other => Err(EnrichError::Config(format!(
                "unknown profile '{}' (expected concise or curator)",
                other
            ))),
        }
    }

    /// Replace the template with one read from `path`, keeping temperature
    /// and length hints.
    pub fn with_template_file(self, path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(EnrichError::InputNotFound(path.to_path_buf()));
        }
        let template = fs::read_to_string(path)?;
        self.with_template(template)
    }

    pub fn with_template(mut self, template: String) -> Result<Self> {
        let missing: Vec<&str> = REQUIRED_SLOTS
            .iter()
            .copied()
            .filter(|slot| !template.contains(slot))
            .collect();
        if !missing.is_empty() {
            return Err(EnrichError::Template(format!(
                "template is missing slot(s): {}",
                missing.join(", ")
            )));
        }
        self.template = template;
        Ok(self)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Result<Self> {
        if !(0.0..=2.0).contains(&temperature) {
            return Err(EnrichError::Config(format!(
                "temperature {} is outside 0.0..=2.0",
                temperature
            )));
        }
        self.temperature = temperature;
        Ok(self)
    }

    pub fn render(&self, fields: &ExhibitFields<'_>) -> String {
        let mut prompt = self
            .template
            .replace("{name}", &fields.name)
            .replace("{era}", &fields.era)
            .replace("{theme}", &fields.theme);
        if let Some(min) = self.min_length {
            prompt = prompt.replace("{min_length}", &min.to_string());
        }
        if let Some(max) = self.max_length {
            prompt = prompt.replace("{max_length}", &max.to_string());
        }
        prompt
    }
}
