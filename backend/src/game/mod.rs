// Widget state machines. Each is synchronous and owns its own state;
// delays and persistence are driven from the websocket session.

pub mod board;
pub mod feedback;
pub mod matching;
pub mod skill_meter;
pub mod word_guess;

pub use board::{BoardSnapshot, TicTacToe};
pub use matching::{Comparison, MatchingGame, MatchingSnapshot, PendingResolution, RevealOutcome};
pub use skill_meter::{SkillBar, SkillBarView, SkillMeter};
pub use word_guess::{SubmitOutcome, WordGame, WordSnapshot};
