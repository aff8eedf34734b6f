//! Result rendering: priority tiers and the results view.

use std::fmt;
use std::io::{self, Write};

use crate::ports::prioritizer::{RankedItem, Ranking};

/// Lowest score classified as [`Tier::High`].
pub const HIGH_THRESHOLD: f64 = 70.0;

/// Lowest score classified as [`Tier::Medium`].
pub const MEDIUM_THRESHOLD: f64 = 40.0;

/// Priority tier derived from a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Score of at least 70.
    High,
    /// Score of at least 40 and below 70.
    Medium,
    /// Everything else, including missing and NaN scores.
    Low,
}

impl Tier {
    /// Lowercase tier name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a score into a tier. Lower bounds are inclusive.
#[must_use]
pub fn classify(score: f64) -> Tier {
    if score >= HIGH_THRESHOLD {
        Tier::High
    } else if score >= MEDIUM_THRESHOLD {
        Tier::Medium
    } else {
        Tier::Low
    }
}

/// One rendered result.
///
/// Fields the service left out are empty strings.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Priority tier.
    pub tier: Tier,
    /// Task title.
    pub title: String,
    /// Score as displayed.
    pub score: String,
    /// Explanation text.
    pub explanation: String,
    /// Whether the task is part of a dependency cycle.
    pub circular_dependency: bool,
    /// The echoed task record, pretty-printed with two-space indents.
    pub task_json: String,
}

impl Block {
    /// Renders a ranked item. Never fails; missing fields render blank.
    #[must_use]
    pub fn from_item(item: &RankedItem) -> Self {
        Self {
            tier: item.score.map_or(Tier::Low, classify),
            title: item.display_title().unwrap_or_default().to_string(),
            score: item.score.map(|s| s.to_string()).unwrap_or_default(),
            explanation: item.explanation.clone().unwrap_or_default(),
            circular_dependency: item.circular_dependency,
            task_json: serde_json::to_string_pretty(&item.task).unwrap_or_default(),
        }
    }
}

/// The results display region.
///
/// Every update replaces the whole view; blocks keep the service's order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultsView {
    blocks: Vec<Block>,
    cycles: Vec<Vec<String>>,
}

impl ResultsView {
    /// Creates an empty view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the view and repopulates it from `ranking`.
    pub fn replace(&mut self, ranking: &Ranking) {
        self.blocks = ranking.items.iter().map(Block::from_item).collect();
        self.cycles.clone_from(&ranking.cycles);
    }

    /// Rendered blocks in display order.
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Dependency cycles reported with the current ranking.
    #[must_use]
    pub fn cycles(&self) -> &[Vec<String>] {
        &self.cycles
    }

    /// Whether nothing is rendered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Writes the view as plain text.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        for (index, block) in self.blocks.iter().enumerate() {
            if index > 0 {
                writeln!(out)?;
            }
            let tier = format!("[{}]", block.tier.as_str().to_uppercase());
            writeln!(out, "{tier:<8} {}  (score: {})", block.title, block.score)?;
            if !block.explanation.is_empty() {
                writeln!(out, "         {}", block.explanation)?;
            }
            if block.circular_dependency {
                writeln!(out, "         ! part of a dependency cycle")?;
            }
            for line in block.task_json.lines() {
                writeln!(out, "         {line}")?;
            }
        }
        if !self.cycles.is_empty() {
            writeln!(out, "\nDependency cycles:")?;
            for cycle in &self.cycles {
                writeln!(out, "  {}", cycle.join(" -> "))?;
            }
        }
        Ok(())
    }
}
