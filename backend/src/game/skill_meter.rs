use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_LEVEL: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillBar {
    pub skill: String,
    pub level: u32,
    pub max_level: u32,
    /// Delay before this bar starts filling (milliseconds)
    pub delay_ms: u64,
}

impl SkillBar {
    pub fn new(skill: &str, level: u32, delay_ms: u64) -> Self {
        Self {
            skill: skill.to_string(),
            level,
            max_level: DEFAULT_MAX_LEVEL,
            delay_ms,
        }
    }

    /// Fill percentage, clamped to [0, 100]
    pub fn percentage(&self) -> f64 {
        if self.max_level == 0 {
            return 0.0;
        }
        (self.level as f64 / self.max_level as f64 * 100.0).clamp(0.0, 100.0)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

pub fn default_bars() -> Vec<SkillBar> {
    vec![
        SkillBar::new("JavaScript", 90, 0),
        SkillBar::new("React", 85, 200),
        SkillBar::new("Node.js", 80, 400),
        SkillBar::new("TypeScript", 75, 600),
        SkillBar::new("UI/UX Design", 70, 800),
        SkillBar::new("Kamehameha", 95, 1000),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillBarView {
    pub skill: String,
    pub level: u32,
    pub max_level: u32,
    pub progress: f64,
}

/// Staggered progress animation for the skills section
#[derive(Debug, Clone)]
pub struct SkillMeter {
    bars: Vec<SkillBar>,
    progress: Vec<f64>,
    generation: u64,
}

impl Default for SkillMeter {
    fn default() -> Self {
        Self::new(default_bars())
    }
}

impl SkillMeter {
    pub fn new(bars: Vec<SkillBar>) -> Self {
        let progress = vec![0.0; bars.len()];
        Self {
            bars,
            progress,
            generation: 0,
        }
    }

    pub fn bars(&self) -> &[SkillBar] {
        &self.bars
    }

    /// Drop every bar back to zero and start a new animation run
    pub fn restart(&mut self) -> u64 {
        self.generation += 1;
        self.progress.iter_mut().for_each(|p| *p = 0.0);
        self.generation
    }

    pub fn invalidate(&mut self) {
        self.generation += 1;
    }

    /// Fill one bar to its target. `None` if the run was superseded.
    pub fn advance(&mut self, generation: u64, index: usize) -> Option<f64> {
        if generation != self.generation {
            return None;
        }
        let target = self.bars.get(index)?.percentage();
        self.progress[index] = target;
        Some(target)
    }

    pub fn snapshot(&self) -> Vec<SkillBarView> {
        self.bars
            .iter()
            .zip(&self.progress)
            .map(|(bar, progress)| SkillBarView {
                skill: bar.skill.clone(),
                level: bar.level,
                max_level: bar.max_level,
                progress: *progress,
            })
            .collect()
    }
}
