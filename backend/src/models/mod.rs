pub mod portfolio;
pub mod stats;

pub use portfolio::Portfolio;
pub use stats::{Statistics, StatsSummary, DISTRIBUTION_SLOTS};
