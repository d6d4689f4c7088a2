use serde::{Deserialize, Serialize};

/// Position of a learner in the book's ordered list of sections.
///
/// The cursor only moves forward one section at a time, stops at the last
/// section, and returns to the first one when a new lesson is started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeachingProgress {
    section_index: usize,
}

impl TeachingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cursor clamped to a curriculum of `total_sections` entries.
    pub fn position(&self, total_sections: usize) -> usize {
        self.section_index.min(total_sections.saturating_sub(1))
    }

    pub fn section_index(&self) -> usize {
        self.section_index
    }

    pub fn restart(self) -> Self {
        Self { section_index: 0 }
    }

    /// Moves one section forward, saturating at the last section.
    pub fn advance(self, total_sections: usize) -> Self {
        let last = total_sections.saturating_sub(1);
        Self {
            section_index: (self.position(total_sections) + 1).min(last),
        }
    }
}

/// Per-conversation state owned by the caller and threaded through each turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub teaching: TeachingProgress,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_saturates_at_last_section() {
        let mut progress = TeachingProgress::new();
        for _ in 0..25 {
            progress = progress.advance(10);
            assert!(progress.section_index() < 10);
        }
        assert_eq!(progress.section_index(), 9);
    }

    #[test]
    fn test_n_advances_equal_clamped_sum() {
        for n in 0..15 {
            let mut progress = TeachingProgress::new().advance(4).advance(4);
            for _ in 0..n {
                progress = progress.advance(4);
            }
            assert_eq!(progress.section_index(), (2 + n).min(3));
        }
    }

    #[test]
    fn test_restart_returns_to_first_section() {
        let progress = TeachingProgress::new().advance(5).advance(5).restart();
        assert_eq!(progress.section_index(), 0);
    }

    #[test]
    fn test_single_section_curriculum_never_moves() {
        let progress = TeachingProgress::new().advance(1).advance(1);
        assert_eq!(progress.section_index(), 0);
    }

    #[test]
    fn test_position_clamps_stale_cursor() {
        let progress = TeachingProgress::new().advance(10).advance(10).advance(10);
        assert_eq!(progress.position(2), 1);
        assert_eq!(progress.advance(2).section_index(), 1);
    }

    #[test]
    fn test_session_state_default() {
        assert_eq!(SessionState::new().teaching.section_index(), 0);
    }
}
