use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    game::{BoardSnapshot, MatchingSnapshot, SkillBarView, WordSnapshot},
    models::StatsSummary,
};

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Ask for every widget's current state
    Sync,

    // Board game
    PlaceMark {
        cell: usize,
    },
    ResetBoard,
    ResetScores,

    // Matching game
    NewMatchingGame,
    RevealToken {
        token: usize,
    },

    // Word-guess game
    KeyPress {
        key: String,
    },
    AppendLetter {
        letter: char,
    },
    DeleteLetter,
    SubmitGuess,
    ToggleHint,
    NewWordGame,
    GetStats,

    // Skill meter
    AnimateSkills,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    SessionStarted {
        session_id: Uuid,
        profile: String,
    },
    BoardState(BoardSnapshot),
    MatchingState(MatchingSnapshot),
    WordState(WordSnapshot),
    /// Transient "shake" cue for an incomplete guess
    GuessRejected {
        reason: String,
    },
    Stats(StatsSummary),
    SkillBars {
        bars: Vec<SkillBarView>,
    },
    SkillProgress {
        index: usize,
        skill: String,
        progress: f64,
    },
    Error {
        message: String,
    },
}
