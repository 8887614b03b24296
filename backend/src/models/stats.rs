use serde::{Deserialize, Serialize};

/// Word-guess attempts allowed per round; also the distribution width
pub const DISTRIBUTION_SLOTS: usize = 6;

/// Narrowest bar drawn for a non-empty distribution slot (percent)
const MIN_BAR_WIDTH: f64 = 8.0;

/// Aggregate word-guess results for one profile.
///
/// Stored verbatim as JSON; field names are part of the persisted format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub played: u32,
    pub wins: u32,
    pub current_streak: u32,
    pub max_streak: u32,
    pub distribution: [u32; DISTRIBUTION_SLOTS],
}

/// Statistics plus the derived figures the stats dialog shows
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    #[serde(flatten)]
    pub stats: Statistics,
    pub win_percentage: u32,
    pub bar_widths: [f64; DISTRIBUTION_SLOTS],
}

impl Statistics {
    /// Record a win that took `attempts_used` guesses (1-based)
    pub fn record_win(&mut self, attempts_used: usize) {
        self.played = self.played.saturating_add(1);
        self.wins = self.wins.saturating_add(1);
        self.current_streak = self.current_streak.saturating_add(1);
        self.max_streak = self.max_streak.max(self.current_streak);
        if let Some(slot) = attempts_used
            .checked_sub(1)
            .and_then(|index| self.distribution.get_mut(index))
        {
            *slot = slot.saturating_add(1);
        }
    }

    pub fn record_loss(&mut self) {
        self.played = self.played.saturating_add(1);
        self.current_streak = 0;
    }

    pub fn win_percentage(&self) -> u32 {
        if self.played == 0 {
            0
        } else {
            ((self.wins as f64 / self.played as f64) * 100.0).round() as u32
        }
    }

    /// Bar widths relative to the largest slot, with a minimum width for
    /// slots that have any wins
    pub fn bar_widths(&self) -> [f64; DISTRIBUTION_SLOTS] {
        let max = self.distribution.iter().copied().max().unwrap_or(0);
        let mut widths = [0.0; DISTRIBUTION_SLOTS];
        for (width, count) in widths.iter_mut().zip(self.distribution) {
            if count > 0 {
                *width = (count as f64 / max as f64 * 100.0).max(MIN_BAR_WIDTH);
            }
        }
        widths
    }

    pub fn summary(&self) -> StatsSummary {
        StatsSummary {
            stats: self.clone(),
            win_percentage: self.win_percentage(),
            bar_widths: self.bar_widths(),
        }
    }
}
