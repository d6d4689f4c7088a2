//! Prompt Templates
//!
//! Each agent builds its generation request from a system template and a user
//! template. The defaults are the Markdown files under `prompts/`, compiled
//! into the binary. A directory of `*.md` files can override any of them by
//! file stem (e.g. `quiz.md` replaces the quiz user template).
//!
//! Templates use `{name}` placeholders: `{book}`, `{author}`, `{section}`,
//! `{topic}`, `{context}` and `{query}`.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct Prompts {
    pub tutor_system: String,
    pub tutor: String,
    pub search_system: String,
    pub search: String,
    pub quiz_system: String,
    pub quiz: String,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            tutor_system: include_str!("../prompts/tutor_system.md").to_string(),
            tutor: include_str!("../prompts/tutor.md").to_string(),
            search_system: include_str!("../prompts/search_system.md").to_string(),
            search: include_str!("../prompts/search.md").to_string(),
            quiz_system: include_str!("../prompts/quiz_system.md").to_string(),
            quiz: include_str!("../prompts/quiz.md").to_string(),
        }
    }
}

impl Prompts {
    /// Starts from the built-in templates and replaces every one that has a
    /// matching `<stem>.md` file in `dir`.
    pub fn with_overrides(dir: &Path) -> Result<Self> {
        let mut prompts = Self::default();
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read prompts directory {}", dir.display()))?;

        for entry in entries {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("md") {
                continue;
            }
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .context("Could not get file stem")?
                .to_string();
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read prompt {}", path.display()))?;

            let slot = match stem.as_str() {
                "tutor_system" => &mut prompts.tutor_system,
                "tutor" => &mut prompts.tutor,
                "search_system" => &mut prompts.search_system,
                "search" => &mut prompts.search,
                "quiz_system" => &mut prompts.quiz_system,
                "quiz" => &mut prompts.quiz,
                _ => {
                    warn!(file = %path.display(), "Ignoring unknown prompt template");
                    continue;
                }
            };
            info!(prompt = %stem, "Loaded prompt override");
            *slot = content;
        }

        Ok(prompts)
    }
}

/// Substitutes `{name}` placeholders in a single pass.
///
/// Substituted values are not scanned again, so a query containing
/// `{context}` stays literal. Unknown placeholders are left as written.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let name = &after[..close];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match replaced {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out.trim_end().to_string()
}
