use once_cell::sync::Lazy;
use rand::{seq::IndexedRandom, Rng};
use std::collections::HashSet;

/// Built-in 5-letter answers for the word-guess game
pub const WORD_LIST: [&str; 40] = [
    "react", "state", "props", "hooks", "redux", "build", "style", "debug", "array", "class",
    "event", "fetch", "async", "await", "route", "stack", "queue", "graph", "logic", "scope",
    "media", "input", "focus", "hover", "click", "touch", "swipe", "modal", "toast", "alert",
    "theme", "color", "space", "width", "model", "cache", "store", "proxy", "query", "param",
];

static BUILTIN: Lazy<HashSet<&'static str>> = Lazy::new(|| WORD_LIST.iter().copied().collect());

pub struct Dictionary {
    words: Vec<String>,
}

impl Dictionary {
    /// The fixed answer list shipped with the game
    pub fn builtin() -> Self {
        tracing::info!("Loaded {} words into dictionary", BUILTIN.len());
        Self {
            words: WORD_LIST.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Pick a target uniformly at random. Falls back to the first built-in
    /// word if the dictionary is empty.
    pub fn random_word<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.words
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| WORD_LIST[0].to_string())
    }
}

#[cfg(test)]
impl Dictionary {
    /// Create a dictionary from arbitrary words
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Check if a word exists in the dictionary
    pub fn contains(&self, word: &str) -> bool {
        let word = word.to_lowercase();
        self.words.iter().any(|w| *w == word)
    }

    /// Get the number of words in the dictionary
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if dictionary is empty
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
