use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Status of one guessed letter. Ordered weakest to strongest so the
/// keyboard can keep the maximum seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterStatus {
    Absent,
    Present,
    Correct,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterFeedback {
    pub letter: char,
    pub status: LetterStatus,
}

pub struct FeedbackScorer;

impl FeedbackScorer {
    /// Grade each letter of a guess against the target.
    ///
    /// Rules:
    /// - Same letter at the same index is `Correct`
    /// - Otherwise a letter found anywhere in the target is `Present`
    /// - Otherwise `Absent`
    ///
    /// Letters are graded independently; repeated letters are not counted
    /// against the number of occurrences in the target.
    pub fn score_guess(guess: &str, target: &str) -> Vec<LetterFeedback> {
        let target: Vec<char> = target.chars().collect();

        guess
            .chars()
            .enumerate()
            .map(|(index, letter)| {
                let status = if target.get(index) == Some(&letter) {
                    LetterStatus::Correct
                } else if target.contains(&letter) {
                    LetterStatus::Present
                } else {
                    LetterStatus::Absent
                };
                LetterFeedback { letter, status }
            })
            .collect()
    }
}

/// Best known status per letter across every guess of the round
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyboardFeedback {
    letters: BTreeMap<char, LetterStatus>,
}

impl KeyboardFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn absorb(&mut self, row: &[LetterFeedback]) {
        for feedback in row {
            self.letters
                .entry(feedback.letter)
                .and_modify(|status| *status = (*status).max(feedback.status))
                .or_insert(feedback.status);
        }
    }

    /// String-keyed copy for JSON output
    pub fn to_map(&self) -> BTreeMap<String, LetterStatus> {
        self.letters
            .iter()
            .map(|(letter, status)| (letter.to_string(), *status))
            .collect()
    }
}

#[cfg(test)]
impl KeyboardFeedback {
    pub fn status(&self, letter: char) -> Option<LetterStatus> {
        self.letters.get(&letter).copied()
    }
}
