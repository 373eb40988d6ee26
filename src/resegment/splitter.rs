/*!
 * Text segmentation for over-long cues.
 *
 * A text longer than `max_chars` is cut near a preferred offset chosen from
 * its length. Candidate cut points are searched in three tiers: sentence
 * ends, clause punctuation, then plain spaces. The left half is final and the
 * right half is processed again until it fits.
 */

use crate::resegment::char_len;
use crate::resegment::notice::{Notice, NoticeKind};

/// Priority class of a cut point, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CutTier {
    Sentence,
    Clause,
    Space,
    Forced,
}

// @struct: Separator set and search window for one tier
struct TierRule {
    tier: CutTier,
    separators: &'static [&'static str],
    // match must start after `preferred - behind`
    behind: usize,
    // match must end at or before `preferred + ahead`
    ahead: usize,
}

const TIER_RULES: [TierRule; 3] = [
    TierRule {
        tier: CutTier::Sentence,
        separators: &[". ", "! ", "? "],
        behind: 20,
        ahead: 10,
    },
    TierRule {
        tier: CutTier::Clause,
        separators: &[", ", "; ", ": ", " - ", " — ", " – "],
        behind: 15,
        ahead: 10,
    },
    TierRule {
        tier: CutTier::Space,
        separators: &[" "],
        behind: 10,
        ahead: 5,
    },
];

/// A chosen cut: character offset into the text and the tier that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutPoint {
    pub offset: usize,
    pub tier: CutTier,
}

/// Result of segmenting one text
#[derive(Debug, Clone, Default)]
pub struct Segmentation {
    /// Fragments in reading order
    pub fragments: Vec<String>,

    /// Diagnostics for forced cuts and oversized fragments
    pub notices: Vec<Notice>,
}

/// Preferred cut offset for a text of `length` characters.
///
/// Length bands give 70, 90 or 100; the result never exceeds `max_chars`
/// so that small limits still cut inside the text.
pub fn preferred_cut(length: usize, max_chars: usize) -> usize {
    let band = if length < 150 {
        70
    } else if length < 180 {
        90
    } else {
        100
    };

    band.min(max_chars).max(1)
}

/// Find the best natural cut point around `preferred`, if any.
///
/// The highest tier with a candidate wins; inside a tier the candidate
/// closest to `preferred` wins, earlier separators winning ties.
pub fn find_cut_point(chars: &[char], preferred: usize) -> Option<CutPoint> {
    for rule in TIER_RULES.iter() {
        let mut best: Option<usize> = None;

        for separator in rule.separators {
            let pattern: Vec<char> = separator.chars().collect();
            let Some(pos) = rfind_before(chars, &pattern, preferred + rule.ahead) else {
                continue;
            };

            if pos + rule.behind <= preferred {
                continue;
            }

            let cut = pos + pattern.len();
            let closer = best.is_none_or(|b| cut.abs_diff(preferred) < b.abs_diff(preferred));
            if closer {
                best = Some(cut);
            }
        }

        if let Some(offset) = best {
            return Some(CutPoint {
                offset,
                tier: rule.tier,
            });
        }
    }

    None
}

/// Split `text` into fragments of at most `max_chars` characters where possible.
///
/// Text that already fits is returned untouched as a single fragment.
pub fn segment_text(text: &str, max_chars: usize) -> Segmentation {
    let mut segmentation = Segmentation::default();
    let mut remainder = text.to_string();

    loop {
        let chars: Vec<char> = remainder.chars().collect();
        if chars.len() <= max_chars {
            segmentation.fragments.push(remainder);
            break;
        }

        let preferred = preferred_cut(chars.len(), max_chars);
        let offset = match find_cut_point(&chars, preferred) {
            Some(cut) => cut.offset,
            None => {
                let offset = preferred.min(chars.len());
                segmentation.notices.push(Notice::new(
                    NoticeKind::ForcedCut,
                    format!(
                        "Forced split at position {} - no good break point found in \"{}\"",
                        offset,
                        preview(&remainder)
                    ),
                ));
                offset
            }
        };

        let left = chars[..offset].iter().collect::<String>().trim().to_string();
        let right = chars[offset..].iter().collect::<String>().trim().to_string();

        let left_len = char_len(&left);
        if left_len > max_chars {
            segmentation.notices.push(Notice::new(
                NoticeKind::OversizedFragment,
                format!(
                    "Fragment of {} chars exceeds the {} char limit: \"{}\"",
                    left_len,
                    max_chars,
                    preview(&left)
                ),
            ));
        }

        if !left.is_empty() {
            segmentation.fragments.push(left);
        }

        if right.is_empty() {
            break;
        }
        remainder = right;
    }

    segmentation
}

/// Last start index of `needle` lying entirely before `end`
fn rfind_before(haystack: &[char], needle: &[char], end: usize) -> Option<usize> {
    let end = end.min(haystack.len());
    if needle.is_empty() || needle.len() > end {
        return None;
    }

    (0..=end - needle.len())
        .rev()
        .find(|&pos| haystack[pos..pos + needle.len()] == *needle)
}

fn preview(text: &str) -> String {
    const PREVIEW_CHARS: usize = 30;
    if char_len(text) <= PREVIEW_CHARS {
        text.to_string()
    } else {
        let head: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{}…", head)
    }
}
