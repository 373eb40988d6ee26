/*!
 * Resegmentation core: merge short cues, split long ones, redistribute timing.
 *
 * Raw cues flow one way through this module:
 *
 * - `merger`: buffers consecutive non-empty cues until a flush condition holds
 * - `splitter`: cuts over-long text at sentence, clause, or word boundaries
 * - `timing`: spreads the original interval across the fragments with gaps
 * - `notice`: structured diagnostics for degraded-but-valid results
 *
 * Everything here is synchronous and free of I/O. The only state lives in a
 * single `Merger` owned by one invocation, so a `ResegmentConfig` can be
 * shared freely between concurrent runs.
 */

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

pub mod merger;
pub mod notice;
pub mod splitter;
pub mod timing;

// Re-export main types
pub use merger::{merge_cues, merge_cues_with_progress, Merger, ResegmentOutcome};
pub use notice::{Notice, NoticeKind};
pub use splitter::{segment_text, CutTier, Segmentation};
pub use timing::{distribute_timing, TimedFragment, TimingPlan};

/// Thresholds that drive merging and splitting
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct ResegmentConfig {
    /// Buffer is flushed once it holds at least this many characters
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,

    /// Flushed text longer than this is split into several cues
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Silent gap inserted between cues produced from one split, in milliseconds
    #[serde(default = "default_gap_ms")]
    pub gap_ms: u64,
}

impl ResegmentConfig {
    pub fn new(min_chars: usize, max_chars: usize, gap_ms: u64) -> Self {
        Self {
            min_chars,
            max_chars,
            gap_ms,
        }
    }

    /// Validate thresholds: `0 < min_chars < max_chars`
    pub fn validate(&self) -> Result<()> {
        if self.min_chars == 0 {
            return Err(anyhow!("min_chars must be greater than zero"));
        }

        if self.max_chars <= self.min_chars {
            return Err(anyhow!(
                "max_chars ({}) must be greater than min_chars ({})",
                self.max_chars,
                self.min_chars
            ));
        }

        Ok(())
    }
}

impl Default for ResegmentConfig {
    fn default() -> Self {
        Self {
            min_chars: default_min_chars(),
            max_chars: default_max_chars(),
            gap_ms: default_gap_ms(),
        }
    }
}

fn default_min_chars() -> usize {
    80
}

fn default_max_chars() -> usize {
    120
}

fn default_gap_ms() -> u64 {
    100
}

/// Character length as the thresholds count it (Unicode scalar values)
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}
