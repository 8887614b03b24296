use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    game::{MatchingGame, SkillMeter, TicTacToe, WordGame},
    models::Statistics,
};

/// Longest profile id accepted from a client
pub const MAX_PROFILE_LEN: usize = 64;

/// Widget state for one open page.
///
/// Owned by the page's websocket connection and shared only with the delayed
/// tasks that connection spawns.
#[derive(Debug)]
pub struct PageSession {
    pub session_id: Uuid,
    pub profile: String,
    pub board: TicTacToe,
    pub matching: MatchingGame,
    pub word: WordGame,
    /// Word-guess statistics, loaded once when the page opens
    pub stats: Statistics,
    pub skills: SkillMeter,
}

pub type SharedSession = Arc<Mutex<PageSession>>;

impl PageSession {
    pub fn new(session_id: Uuid, profile: String, stats: Statistics, first_word: String) -> Self {
        Self {
            session_id,
            profile,
            board: TicTacToe::new(),
            matching: MatchingGame::new(),
            word: WordGame::new(first_word),
            stats,
            skills: SkillMeter::default(),
        }
    }

    pub fn into_shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    /// Make every pending delayed effect a no-op
    pub fn close(&mut self) {
        self.matching.invalidate();
        self.skills.invalidate();
    }
}

/// Registry entry for an open page
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub profile: String,
    pub connected_at: DateTime<Utc>,
}

/// Accept client-chosen profile ids that are short and URL-safe
pub fn is_valid_profile(profile: &str) -> bool {
    !profile.is_empty()
        && profile.len() <= MAX_PROFILE_LEN
        && profile
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{word_guess::WordGameStatus, RevealOutcome};
    use rand::{rngs::StdRng, SeedableRng};

    fn session() -> PageSession {
        PageSession::new(
            Uuid::new_v4(),
            "profile".to_string(),
            Statistics::default(),
            "react".to_string(),
        )
    }

    #[test]
    fn test_profile_validation() {
        assert!(is_valid_profile("3f2a-b_c9"));
        assert!(!is_valid_profile(""));
        assert!(!is_valid_profile("has space"));
        assert!(!is_valid_profile(&"a".repeat(MAX_PROFILE_LEN + 1)));
    }

    #[test]
    fn test_new_session_starts_fresh() {
        let page = session();
        assert_eq!(page.word.status(), WordGameStatus::Playing);
        assert!(!page.matching.is_started());
        assert_eq!(page.board.scores().draws, 0);
    }

    #[test]
    fn test_close_drops_pending_resolution() {
        let mut page = session();
        page.matching.new_game(&mut StdRng::seed_from_u64(3));
        let symbol = page.matching.tokens()[0].symbol;
        let partner = page
            .matching
            .tokens()
            .iter()
            .position(|t| t.id != 0 && t.symbol == symbol)
            .unwrap();

        page.matching.reveal(0);
        let RevealOutcome::Compare(pending) = page.matching.reveal(partner) else {
            panic!("Expected comparison");
        };
        let skill_run = page.skills.restart();

        page.close();

        assert!(!page.matching.resolve(pending));
        assert_eq!(page.skills.advance(skill_run, 0), None);
    }
}
