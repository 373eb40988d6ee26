/*!
 * Buffering state machine that turns raw cues into readable cues.
 *
 * Consecutive non-empty cues are accumulated until the buffer is long enough,
 * the input ends, or the safety valve trips. Each flush produces either one
 * cue or, for text over `max_chars`, several split cues with redistributed
 * timing. Output cues are numbered from 1 in emission order.
 */

use crate::resegment::notice::{Notice, NoticeKind};
use crate::resegment::splitter::segment_text;
use crate::resegment::timing::distribute_timing;
use crate::resegment::{char_len, ResegmentConfig};
use crate::subtitle_processor::SubtitleEntry;

/// Everything one resegmentation run produced
#[derive(Debug, Clone, Default)]
pub struct ResegmentOutcome {
    /// Final cues, numbered from 1
    pub entries: Vec<SubtitleEntry>,

    /// Degraded-but-valid decisions taken along the way
    pub notices: Vec<Notice>,

    /// Number of raw cues consumed
    pub input_count: usize,

    /// Raw cues skipped because their text was blank
    pub skipped_empty: usize,
}

impl ResegmentOutcome {
    /// Number of notices of a given kind
    pub fn count_notices(&self, kind: NoticeKind) -> usize {
        self.notices.iter().filter(|n| n.kind == kind).count()
    }

    /// Output cues per input cue (0.0 for empty input)
    pub fn compression_ratio(&self) -> f64 {
        if self.input_count == 0 {
            0.0
        } else {
            self.entries.len() as f64 / self.input_count as f64
        }
    }
}

// @state: Merger buffer
#[derive(Debug, Default)]
enum BufferState {
    #[default]
    Empty,
    Accumulating {
        text: String,
        start_ms: u64,
        // end of the last cue appended to the buffer
        last_end_ms: u64,
    },
}

/// Incremental merger: feed raw cues with `push`, then call `finish`
#[derive(Debug)]
pub struct Merger<'a> {
    config: &'a ResegmentConfig,
    state: BufferState,
    outcome: ResegmentOutcome,
}

impl<'a> Merger<'a> {
    pub fn new(config: &'a ResegmentConfig) -> Self {
        Self {
            config,
            state: BufferState::Empty,
            outcome: ResegmentOutcome::default(),
        }
    }

    /// True while text is waiting to be flushed
    pub fn is_accumulating(&self) -> bool {
        matches!(self.state, BufferState::Accumulating { .. })
    }

    /// Consume one raw cue. `is_last` marks the final cue of the input.
    pub fn push(&mut self, cue: &SubtitleEntry, is_last: bool) {
        self.outcome.input_count += 1;

        let clean = normalize_text(&cue.text);
        if clean.is_empty() {
            self.outcome.skipped_empty += 1;
            return;
        }

        let buffer_len = match &mut self.state {
            BufferState::Empty => {
                let len = char_len(&clean);
                self.state = BufferState::Accumulating {
                    text: clean,
                    start_ms: cue.start_time_ms,
                    last_end_ms: cue.end_time_ms,
                };
                len
            }
            BufferState::Accumulating {
                text, last_end_ms, ..
            } => {
                text.push(' ');
                text.push_str(&clean);
                *last_end_ms = cue.end_time_ms;
                char_len(text)
            }
        };

        let should_flush = buffer_len >= self.config.min_chars
            || is_last
            || buffer_len > self.config.max_chars.saturating_mul(2);

        if should_flush {
            self.flush();
        }
    }

    /// Flush whatever is still buffered and return the result
    pub fn finish(mut self) -> ResegmentOutcome {
        self.flush();
        self.outcome
    }

    fn flush(&mut self) {
        let BufferState::Accumulating {
            text,
            start_ms,
            last_end_ms,
        } = std::mem::take(&mut self.state)
        else {
            return;
        };

        let end_ms = if last_end_ms < start_ms {
            self.outcome.notices.push(Notice::new(
                NoticeKind::MalformedInterval,
                format!(
                    "Buffered text ends at {}ms before it starts at {}ms, clamping end to start",
                    last_end_ms, start_ms
                ),
            ));
            start_ms
        } else {
            last_end_ms
        };

        if char_len(&text) > self.config.max_chars {
            let segmentation = segment_text(&text, self.config.max_chars);
            self.outcome.notices.extend(segmentation.notices);

            let plan = distribute_timing(
                &segmentation.fragments,
                start_ms,
                end_ms,
                self.config.gap_ms,
            );
            self.outcome.notices.extend(plan.notices);

            for fragment in plan.fragments {
                self.emit(fragment.start_ms, fragment.end_ms, fragment.text);
            }
        } else {
            self.emit(start_ms, end_ms, text);
        }
    }

    fn emit(&mut self, start_ms: u64, end_ms: u64, text: String) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        let seq_num = self.outcome.entries.len() + 1;
        self.outcome
            .entries
            .push(SubtitleEntry::new(seq_num, start_ms, end_ms, text.to_string()));
    }
}

/// Replace each line break character with a space and strip surrounding
/// whitespace. Inner runs of spaces are left alone.
pub fn normalize_text(text: &str) -> String {
    text.replace(['\r', '\n'], " ").trim().to_string()
}

/// Run the merger over a complete, ordered cue sequence
pub fn merge_cues(cues: &[SubtitleEntry], config: &ResegmentConfig) -> ResegmentOutcome {
    merge_cues_with_progress(cues, config, |_, _| {})
}

/// Same as `merge_cues`, calling `on_progress(processed, total)` after each cue
pub fn merge_cues_with_progress<F>(
    cues: &[SubtitleEntry],
    config: &ResegmentConfig,
    mut on_progress: F,
) -> ResegmentOutcome
where
    F: FnMut(usize, usize),
{
    let total = cues.len();
    let mut merger = Merger::new(config);

    for (i, cue) in cues.iter().enumerate() {
        merger.push(cue, i + 1 == total);
        on_progress(i + 1, total);
    }

    merger.finish()
}
