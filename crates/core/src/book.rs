//! Book Profile
//!
//! Describes the single book the tutor covers: its table of contents, used by
//! the tutor agent as the curriculum, and the topic list the quiz agent draws
//! from.

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookProfile {
    pub title: String,
    pub author: String,
    /// Ordered section names; the teaching cursor indexes into this list.
    pub sections: Vec<String>,
    /// Topics a quiz can be generated about.
    pub quiz_topics: Vec<String>,
}

impl BookProfile {
    /// Loads a profile from a JSON file and checks that both lists are non-empty.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read book profile {}", path.display()))?;
        let profile: BookProfile = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid book profile {}", path.display()))?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.sections.is_empty(),
            "Book profile '{}' has no sections",
            self.title
        );
        ensure!(
            !self.quiz_topics.is_empty(),
            "Book profile '{}' has no quiz topics",
            self.title
        );
        Ok(())
    }

    pub fn rich_dad_poor_dad() -> Self {
        let sections = [
            "Introduction and Background",
            "The Two Dads Philosophy",
            "Lesson 1: The Rich Don't Work for Money",
            "Lesson 2: Why Teach Financial Literacy",
            "Lesson 3: Mind Your Own Business",
            "Lesson 4: The History of Taxes and Power of Corporations",
            "Lesson 5: The Rich Invent Money",
            "Lesson 6: Work to Learn, Don't Work for Money",
            "Overcoming Obstacles",
            "Getting Started - Action Steps",
        ];
        let quiz_topics = [
            "assets and liabilities",
            "financial literacy",
            "working for money vs money working for you",
            "corporation and taxes",
            "overcoming fear and obstacles",
        ];
        Self {
            title: "Rich Dad Poor Dad".to_string(),
            author: "Robert Kiyosaki".to_string(),
            sections: sections.iter().map(|s| s.to_string()).collect(),
            quiz_topics: quiz_topics.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for BookProfile {
    fn default() -> Self {
        Self::rich_dad_poor_dad()
    }
}
