/*!
 * Time redistribution across the fragments of one split cue.
 *
 * The original interval is shared out in proportion to fragment length, with
 * a silent gap between consecutive fragments. The last fragment always ends
 * exactly where the original interval ended.
 */

use crate::resegment::char_len;
use crate::resegment::notice::{Notice, NoticeKind};

/// Smallest gap used when the interval cannot afford the configured one
const MIN_FALLBACK_GAP_MS: u64 = 50;

/// One fragment with its share of the interval
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedFragment {
    pub text: String,
    pub start_ms: u64,
    pub end_ms: u64,
}

impl TimedFragment {
    pub fn new(text: impl Into<String>, start_ms: u64, end_ms: u64) -> Self {
        Self {
            text: text.into(),
            start_ms,
            end_ms,
        }
    }
}

/// Result of distributing one interval
#[derive(Debug, Clone, Default)]
pub struct TimingPlan {
    pub fragments: Vec<TimedFragment>,
    pub notices: Vec<Notice>,
}

/// Distribute `[start_ms, end_ms]` over `fragments`, separated by `gap_ms`.
///
/// When the interval is too short for all gaps, the whole interval is shared
/// and the gap shrinks to `max(50, total / n)`. Computed times never pass
/// `end_ms`, so every fragment keeps `start <= end`.
pub fn distribute_timing(
    fragments: &[String],
    start_ms: u64,
    end_ms: u64,
    gap_ms: u64,
) -> TimingPlan {
    let mut plan = TimingPlan::default();

    match fragments {
        [] => return plan,
        [single] => {
            plan.fragments
                .push(TimedFragment::new(single.clone(), start_ms, end_ms));
            return plan;
        }
        _ => {}
    }

    if end_ms < start_ms {
        return unsplit(
            fragments,
            start_ms,
            end_ms,
            format!("Interval ends before it starts ({} > {})", start_ms, end_ms),
        );
    }

    let total_ms = end_ms - start_ms;
    let gaps_needed = (fragments.len() - 1) as u64;
    let Some(total_gap_ms) = gaps_needed.checked_mul(gap_ms) else {
        return unsplit(
            fragments,
            start_ms,
            end_ms,
            format!("Gap arithmetic overflowed ({} gaps of {}ms)", gaps_needed, gap_ms),
        );
    };

    let (available_ms, effective_gap_ms) = if total_ms > total_gap_ms {
        (total_ms - total_gap_ms, gap_ms)
    } else {
        let gap = (total_ms / (gaps_needed + 1)).max(MIN_FALLBACK_GAP_MS);
        plan.notices.push(Notice::new(
            NoticeKind::CompressedGaps,
            format!(
                "Duration too short for proper gaps ({}ms for {} gaps of {}ms), using {}ms gaps",
                total_ms, gaps_needed, gap_ms, gap
            ),
        ));
        (total_ms, gap)
    };

    let mut weights: Vec<u64> = fragments.iter().map(|f| char_len(f) as u64).collect();
    let mut total_weight: u64 = weights.iter().sum();
    if total_weight == 0 {
        weights.iter_mut().for_each(|w| *w = 1);
        total_weight = weights.len() as u64;
    }

    let last = fragments.len() - 1;
    let mut cursor = start_ms;

    for (i, (text, weight)) in fragments.iter().zip(weights.iter()).enumerate() {
        let fragment_end = if i == last {
            end_ms
        } else {
            let duration = (available_ms as u128 * *weight as u128 / total_weight as u128) as u64;
            cursor.saturating_add(duration).min(end_ms)
        };

        plan.fragments
            .push(TimedFragment::new(text.clone(), cursor, fragment_end));

        if i < last {
            cursor = fragment_end.saturating_add(effective_gap_ms).min(end_ms);
        }
    }

    plan
}

// Safe fallback: keep the original interval and the text in one piece
fn unsplit(fragments: &[String], start_ms: u64, end_ms: u64, reason: String) -> TimingPlan {
    TimingPlan {
        fragments: vec![TimedFragment::new(fragments.join(" "), start_ms, end_ms)],
        notices: vec![Notice::new(NoticeKind::MalformedInterval, reason)],
    }
}
