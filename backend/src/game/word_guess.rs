use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{
    game::feedback::{FeedbackScorer, KeyboardFeedback, LetterFeedback, LetterStatus},
    models::{Statistics, DISTRIBUTION_SLOTS},
};

pub const WORD_LENGTH: usize = 5;
pub const MAX_ATTEMPTS: usize = DISTRIBUTION_SLOTS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordGameStatus {
    Playing,
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Guess was not 5 letters (or the round is over); nothing changed
    Rejected,
    Continue,
    Won { attempts: usize },
    Lost,
}

impl SubmitOutcome {
    /// True when the submission finished the round and statistics changed
    pub fn is_terminal(&self) -> bool {
        matches!(self, SubmitOutcome::Won { .. } | SubmitOutcome::Lost)
    }
}

/// A physical or on-screen key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Submit,
    Delete,
    Letter(char),
}

impl KeyAction {
    /// Map a key name ("Enter", "Backspace", "a") to an action
    pub fn from_key(key: &str) -> Option<Self> {
        if key.eq_ignore_ascii_case("enter") {
            return Some(KeyAction::Submit);
        }
        if key.eq_ignore_ascii_case("backspace") {
            return Some(KeyAction::Delete);
        }

        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) if ch.is_ascii_alphabetic() => {
                Some(KeyAction::Letter(ch.to_ascii_lowercase()))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordSnapshot {
    pub status: WordGameStatus,
    pub attempts: Vec<Vec<LetterFeedback>>,
    pub current: String,
    pub attempts_remaining: usize,
    pub keyboard: BTreeMap<String, LetterStatus>,
    pub hint: Option<char>,
    /// The target word, only once the round is over
    pub answer: Option<String>,
}

/// One round of the 5-letter guessing game
#[derive(Debug, Clone)]
pub struct WordGame {
    target: String,
    attempts: Vec<String>,
    current: String,
    status: WordGameStatus,
    keyboard: KeyboardFeedback,
    show_hint: bool,
}

impl WordGame {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into().to_ascii_lowercase(),
            attempts: Vec::with_capacity(MAX_ATTEMPTS),
            current: String::with_capacity(WORD_LENGTH),
            status: WordGameStatus::Playing,
            keyboard: KeyboardFeedback::new(),
            show_hint: false,
        }
    }

    /// Start a new round; statistics live outside the round and are untouched
    pub fn new_game(&mut self, target: impl Into<String>) {
        *self = Self::new(target);
    }

    pub fn append_letter(&mut self, ch: char) -> bool {
        if self.status != WordGameStatus::Playing
            || self.current.len() >= WORD_LENGTH
            || !ch.is_ascii_alphabetic()
        {
            return false;
        }
        self.current.push(ch.to_ascii_lowercase());
        true
    }

    pub fn delete_letter(&mut self) -> bool {
        if self.status != WordGameStatus::Playing {
            return false;
        }
        self.current.pop().is_some()
    }

    /// Submit the in-progress guess, recording the result into `stats`
    /// when the round ends
    pub fn submit_guess(&mut self, stats: &mut Statistics) -> SubmitOutcome {
        if self.status != WordGameStatus::Playing || self.current.len() != WORD_LENGTH {
            return SubmitOutcome::Rejected;
        }

        let guess = std::mem::take(&mut self.current);
        self.keyboard
            .absorb(&FeedbackScorer::score_guess(&guess, &self.target));
        let solved = guess == self.target;
        self.attempts.push(guess);

        if solved {
            self.status = WordGameStatus::Won;
            let attempts = self.attempts.len();
            stats.record_win(attempts);
            return SubmitOutcome::Won { attempts };
        }

        if self.attempts.len() >= MAX_ATTEMPTS {
            self.status = WordGameStatus::Lost;
            stats.record_loss();
            return SubmitOutcome::Lost;
        }

        SubmitOutcome::Continue
    }

    /// Apply a key press. Returns `None` for keys that do nothing.
    pub fn handle_key(&mut self, key: &str, stats: &mut Statistics) -> Option<SubmitOutcome> {
        if self.status != WordGameStatus::Playing {
            return None;
        }

        match KeyAction::from_key(key)? {
            KeyAction::Submit => Some(self.submit_guess(stats)),
            KeyAction::Delete => {
                self.delete_letter();
                None
            }
            KeyAction::Letter(ch) => {
                self.append_letter(ch);
                None
            }
        }
    }

    /// Toggle the first-letter hint. Only available while playing.
    pub fn toggle_hint(&mut self) -> bool {
        if self.status != WordGameStatus::Playing {
            return false;
        }
        self.show_hint = !self.show_hint;
        self.show_hint
    }

    pub fn hint(&self) -> Option<char> {
        if self.show_hint && self.status == WordGameStatus::Playing {
            self.target.chars().next().map(|c| c.to_ascii_uppercase())
        } else {
            None
        }
    }

    pub fn snapshot(&self) -> WordSnapshot {
        WordSnapshot {
            status: self.status,
            attempts: self
                .attempts
                .iter()
                .map(|guess| FeedbackScorer::score_guess(guess, &self.target))
                .collect(),
            current: self.current.clone(),
            attempts_remaining: MAX_ATTEMPTS - self.attempts.len(),
            keyboard: self.keyboard.to_map(),
            hint: self.hint(),
            answer: (self.status != WordGameStatus::Playing).then(|| self.target.clone()),
        }
    }
}

#[cfg(test)]
impl WordGame {
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn status(&self) -> WordGameStatus {
        self.status
    }

    pub fn attempts(&self) -> &[String] {
        &self.attempts
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn keyboard(&self) -> &KeyboardFeedback {
        &self.keyboard
    }
}
