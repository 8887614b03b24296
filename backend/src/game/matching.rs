use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

/// Card faces, each dealt twice
pub const SYMBOLS: [&str; 8] = ["🚀", "🎮", "💻", "🎨", "🎯", "🔥", "🌟", "🎸"];

/// Cards that may be face-up and unresolved at the same time
pub const MAX_REVEALED: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub id: usize,
    pub symbol: &'static str,
    pub face_up: bool,
    pub matched: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Match,
    Mismatch,
}

/// A comparison waiting for its display delay to elapse.
///
/// Carries the generation of the deal it was made in so a resolution that
/// fires after a restart can be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingResolution {
    pub generation: u64,
    pub comparison: Comparison,
    pub first: usize,
    pub second: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    Ignored,
    Revealed,
    Compare(PendingResolution),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenView {
    pub id: usize,
    /// Hidden while the card is face-down
    pub symbol: Option<String>,
    pub face_up: bool,
    pub matched: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingSnapshot {
    pub started: bool,
    pub tokens: Vec<TokenView>,
    pub moves: u32,
    pub matched_pairs: usize,
    pub total_pairs: usize,
    pub complete: bool,
}

/// Memory game: flip two cards, keep them if they match
#[derive(Debug, Clone, Default)]
pub struct MatchingGame {
    tokens: Vec<Token>,
    revealed: Vec<usize>,
    matched_pairs: usize,
    moves: u32,
    generation: u64,
    started: bool,
}

impl MatchingGame {
    /// A game that has not been dealt yet; reveals are ignored until `new_game`
    pub fn new() -> Self {
        Self::default()
    }

    /// Deal a freshly shuffled set of tokens and reset all counters
    pub fn new_game<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut symbols: Vec<&'static str> = SYMBOLS.iter().chain(SYMBOLS.iter()).copied().collect();
        symbols.shuffle(rng);

        self.tokens = symbols
            .into_iter()
            .enumerate()
            .map(|(id, symbol)| Token {
                id,
                symbol,
                face_up: false,
                matched: false,
            })
            .collect();
        self.revealed.clear();
        self.matched_pairs = 0;
        self.moves = 0;
        self.generation += 1;
        self.started = true;

        tracing::debug!("Dealt matching game generation {}", self.generation);
    }

    /// Invalidate any resolution still in flight without touching the board
    pub fn invalidate(&mut self) {
        self.generation += 1;
    }

    pub fn is_complete(&self) -> bool {
        self.started && self.matched_pairs == SYMBOLS.len()
    }

    pub fn reveal(&mut self, id: usize) -> RevealOutcome {
        if !self.started || self.is_complete() || self.revealed.len() >= MAX_REVEALED {
            return RevealOutcome::Ignored;
        }
        let Some(token) = self.tokens.get_mut(id) else {
            return RevealOutcome::Ignored;
        };
        if token.face_up || token.matched {
            return RevealOutcome::Ignored;
        }

        token.face_up = true;
        self.revealed.push(id);

        if self.revealed.len() < MAX_REVEALED {
            return RevealOutcome::Revealed;
        }

        self.moves += 1;
        let (first, second) = (self.revealed[0], self.revealed[1]);
        let comparison = if self.tokens[first].symbol == self.tokens[second].symbol {
            Comparison::Match
        } else {
            Comparison::Mismatch
        };

        RevealOutcome::Compare(PendingResolution {
            generation: self.generation,
            comparison,
            first,
            second,
        })
    }

    /// Apply a delayed comparison. Returns false when the resolution belongs
    /// to an abandoned deal.
    pub fn resolve(&mut self, pending: PendingResolution) -> bool {
        if pending.generation != self.generation {
            return false;
        }

        for id in [pending.first, pending.second] {
            if let Some(token) = self.tokens.get_mut(id) {
                match pending.comparison {
                    Comparison::Match => token.matched = true,
                    Comparison::Mismatch => token.face_up = false,
                }
            }
        }
        if pending.comparison == Comparison::Match {
            self.matched_pairs += 1;
        }
        self.revealed.clear();
        true
    }

    pub fn snapshot(&self) -> MatchingSnapshot {
        MatchingSnapshot {
            started: self.started,
            tokens: self
                .tokens
                .iter()
                .map(|token| TokenView {
                    id: token.id,
                    symbol: (token.face_up || token.matched).then(|| token.symbol.to_string()),
                    face_up: token.face_up,
                    matched: token.matched,
                })
                .collect(),
            moves: self.moves,
            matched_pairs: self.matched_pairs,
            total_pairs: SYMBOLS.len(),
            complete: self.is_complete(),
        }
    }
}

#[cfg(test)]
impl MatchingGame {
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn revealed(&self) -> &[usize] {
        &self.revealed
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn matched_pairs(&self) -> usize {
        self.matched_pairs
    }

    pub fn is_started(&self) -> bool {
        self.started
    }
}
