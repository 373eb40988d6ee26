/*!
 * Tests for the merge, split and timing pipeline
 */

use subreflow::resegment::{
    distribute_timing, merge_cues, segment_text, NoticeKind, ResegmentConfig,
};
use subreflow::resegment::merger::normalize_text;
use subreflow::subtitle_processor::SubtitleEntry;
use crate::common::{cue, speech_cues};

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Fragmentary cues are merged and the merged text is split back under the limit
#[test]
fn test_mergeCues_withFragmentedSpeech_shouldProduceTwoTimedCues() {
    let cues = vec![
        cue(0, 300, "Hi"),
        cue(300, 600, "there"),
        cue(600, 4000, "how are you today my friend"),
    ];
    let config = ResegmentConfig::new(10, 20, 100);

    let outcome = merge_cues(&cues, &config);

    assert_eq!(outcome.entries.len(), 2);
    assert_eq!(outcome.entries[0].text, "Hi there how are you");
    assert_eq!(outcome.entries[1].text, "today my friend");

    assert_eq!(outcome.entries[0].start_time_ms, 0);
    assert_eq!(outcome.entries[0].end_time_ms, 2228);
    assert_eq!(outcome.entries[1].start_time_ms, 2328);
    assert_eq!(outcome.entries[1].end_time_ms, 4000);
    assert!(outcome.notices.is_empty());
}

#[test]
fn test_mergeCues_withOnlyEmptyCue_shouldProduceNoCues() {
    let outcome = merge_cues(&[cue(0, 2000, "")], &ResegmentConfig::default());
    assert!(outcome.entries.is_empty());
    assert!(outcome.notices.is_empty());
}

#[test]
fn test_distributeTiming_withTooShortInterval_shouldUseFiftyMsGaps() {
    let fragments = vec!["one".to_string(), "two".to_string(), "six".to_string()];
    let plan = distribute_timing(&fragments, 0, 150, 100);

    let gaps: Vec<u64> = plan
        .fragments
        .windows(2)
        .map(|pair| pair[1].start_ms - pair[0].end_ms)
        .collect();
    assert_eq!(gaps[0], 50);
    assert_eq!(plan.fragments.last().map(|f| f.end_ms), Some(150));
    assert_eq!(plan.notices[0].kind, NoticeKind::CompressedGaps);
}

#[test]
fn test_segmentText_withTextUnderLimit_shouldReturnItUnchanged() {
    let samples = [
        "",
        "x",
        "Exactly twenty chars",
        "Short line, with a comma. And a sentence!",
    ];
    for sample in samples {
        let result = segment_text(sample, 41);
        assert_eq!(result.fragments, vec![sample.to_string()]);
        assert!(result.notices.is_empty());
    }
}

#[test]
fn test_segmentText_acrossLimits_shouldNeverDropOrDuplicateCharacters() {
    let text = "When the storm finally passed, the villagers came out of their houses; \
                some were crying, others laughing - nobody could quite believe it. \
                By the evening the square was full again! Who would have guessed? \
                Certainly not the old baker, who had predicted the end of the world";

    for max_chars in [15, 25, 40, 70, 120, 200] {
        let result = segment_text(text, max_chars);
        let rebuilt = result.fragments.join(" ");

        assert_eq!(
            strip_whitespace(&rebuilt),
            strip_whitespace(text),
            "characters changed for max_chars={}",
            max_chars
        );
        assert!(result.fragments.iter().all(|f| !f.is_empty()));
    }
}

#[test]
fn test_segmentText_withNaturalBreaks_shouldKeepFragmentsWithinLimit() {
    let text = "I told him twice already, but he would not listen. \
                So I packed my bags and left the house before sunrise, \
                without a word to anyone in the family";
    let result = segment_text(text, 60);

    assert!(result.fragments.len() >= 3);
    for fragment in &result.fragments {
        assert!(char_len(fragment) <= 60, "fragment too long: {:?}", fragment);
    }
    assert!(result.notices.iter().all(|n| n.kind != NoticeKind::ForcedCut));
}

#[test]
fn test_distributeTiming_forVariousIntervals_shouldSpanExactlyAndStayOrdered() {
    let fragments: Vec<String> = ["a", "longer piece", "mid size", "z"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    for (start, end, gap) in [
        (0u64, 10_000u64, 100u64),
        (1_234, 1_234, 100),
        (5_000, 5_120, 100),
        (0, 1, 0),
        (3_600_000, 3_600_250, 500),
    ] {
        let plan = distribute_timing(&fragments, start, end, gap);

        assert_eq!(plan.fragments.len(), fragments.len());
        assert_eq!(plan.fragments[0].start_ms, start);
        assert_eq!(plan.fragments.last().map(|f| f.end_ms), Some(end));
        for fragment in &plan.fragments {
            assert!(fragment.start_ms <= fragment.end_ms);
            assert!(fragment.end_ms <= end);
        }
        for pair in plan.fragments.windows(2) {
            assert!(pair[0].end_ms <= pair[1].start_ms);
        }
    }
}

/// Output that already fits the thresholds passes through a second run unchanged
#[test]
fn test_mergeCues_onOwnOutput_shouldBeIdempotent() {
    let config = ResegmentConfig::default();
    let cues: Vec<SubtitleEntry> = (0..9)
        .map(|i| {
            let start = i as u64 * 1500;
            cue(start, start + 1400, &format!("Line {:02} of the slow river.", i))
        })
        .collect();

    let first = merge_cues(&cues, &config);
    assert_eq!(first.entries.len(), 3);
    for entry in &first.entries {
        let len = char_len(&entry.text);
        assert!(len >= config.min_chars && len <= config.max_chars);
    }

    let second = merge_cues(&first.entries, &config);
    assert_eq!(second.entries, first.entries);
}

#[test]
fn test_mergeCues_onRealisticSpeech_shouldPreserveTextAndOrdering() {
    let cues = speech_cues(60);
    let config = ResegmentConfig::default();

    let outcome = merge_cues(&cues, &config);

    let input_text: String = cues.iter().map(|c| strip_whitespace(&c.text)).collect();
    let output_text: String = outcome.entries.iter().map(|c| strip_whitespace(&c.text)).collect();
    assert_eq!(output_text, input_text);

    assert_eq!(outcome.input_count, 60);
    assert_eq!(outcome.skipped_empty, 10);

    for (i, entry) in outcome.entries.iter().enumerate() {
        assert_eq!(entry.seq_num, i + 1);
        assert!(entry.start_time_ms <= entry.end_time_ms);
    }
    for pair in outcome.entries.windows(2) {
        assert!(pair[0].start_time_ms <= pair[1].start_time_ms);
    }

    let oversized = outcome.count_notices(NoticeKind::OversizedFragment);
    let too_long = outcome
        .entries
        .iter()
        .filter(|e| char_len(&e.text) > config.max_chars)
        .count();
    assert_eq!(too_long, oversized);
}

#[test]
fn test_mergeCues_withMultilineCues_shouldFlattenText() {
    let cues = vec![
        cue(0, 1000, "First line\nsecond line"),
        cue(1000, 2000, "  third\r\nfourth  "),
    ];
    let outcome = merge_cues(&cues, &ResegmentConfig::new(10, 100, 100));

    assert_eq!(outcome.entries.len(), 2);
    assert_eq!(outcome.entries[0].text, "First line second line");
    assert_eq!(outcome.entries[1].text, "third  fourth");
}

#[test]
fn test_normalizeText_withIndentedLines_shouldKeepInnerSpaces() {
    assert_eq!(normalize_text("a  \n  b"), "a    b");
    assert_eq!(normalize_text("a\r\nb"), "a  b");
    assert_eq!(normalize_text("\n  padded  \n"), "padded");
}

#[test]
fn test_mergeCues_withUnbrokenLongCue_shouldReportForcedCuts() {
    let cues = vec![cue(0, 6000, &"m".repeat(300))];
    let outcome = merge_cues(&cues, &ResegmentConfig::default());

    assert!(outcome.entries.len() >= 3);
    assert!(outcome.count_notices(NoticeKind::ForcedCut) >= 2);
    assert_eq!(outcome.entries[0].start_time_ms, 0);
    assert_eq!(outcome.entries.last().map(|e| e.end_time_ms), Some(6000));
}

#[test]
fn test_resegmentConfig_fromPartialJson_shouldFillDefaults() {
    let config: ResegmentConfig = serde_json::from_str(r#"{"max_chars": 84}"#).unwrap();
    assert_eq!(config, ResegmentConfig::new(80, 84, 100));
}
