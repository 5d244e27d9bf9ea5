use crate::difficulty::Difficulty;

/// Settings a session is started with. Read once at start; immutable while
/// the session runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub difficulty: Difficulty,
    pub duration_secs: u64,
    pub silent: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            duration_secs: 30,
            silent: false,
        }
    }
}

/// Mutable per-session counters. Created on start, discarded on the next
/// start. Score only moves up between resets.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub score: u32,
    pub seconds_remaining: u64,
    /// Targets shown so far, hit or not.
    pub appearances: u32,
    /// Successful whacks (a target can be whacked more than once while up).
    pub hits: u32,
    pub started_at: Option<std::time::SystemTime>,
}

impl SessionState {
    pub fn reset(&mut self) {
        *self = SessionState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.difficulty, Difficulty::Easy);
        assert_eq!(config.duration_secs, 30);
        assert!(!config.silent);
    }

    #[test]
    fn test_state_reset() {
        let mut state = SessionState {
            score: 42,
            seconds_remaining: 3,
            appearances: 10,
            hits: 7,
            started_at: Some(std::time::SystemTime::now()),
        };
        state.reset();
        assert_eq!(state.score, 0);
        assert_eq!(state.seconds_remaining, 0);
        assert_eq!(state.appearances, 0);
        assert_eq!(state.hits, 0);
        assert!(state.started_at.is_none());
    }
}
