/*!
 * Common test utilities for the subreflow test suite
 */

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::fs;
use anyhow::Result;
use tempfile::TempDir;
use subreflow::subtitle_processor::SubtitleEntry;

/// Routes log output through the test harness; set RUST_LOG to see it
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Fragmentary subtitles as produced by speech recognition
pub const FRAGMENTED_SRT: &str = "1
00:00:00,000 --> 00:00:00,300
Hi

2
00:00:00,300 --> 00:00:00,600
there

3
00:00:00,600 --> 00:00:04,000
how are you today my friend
";

/// Creates a sample subtitle file for testing
pub fn create_test_subtitle(dir: &Path, filename: &str) -> Result<PathBuf> {
    let content = r#"1
00:00:01,000 --> 00:00:04,000
This is a test subtitle.

2
00:00:05,000 --> 00:00:09,000
It contains multiple entries.

3
00:00:10,000 --> 00:00:14,000
For testing purposes.
"#;
    create_test_file(dir, filename, content)
}

/// Builds a raw cue; the sequence number is irrelevant to the core
pub fn cue(start_ms: u64, end_ms: u64, text: &str) -> SubtitleEntry {
    SubtitleEntry::new(0, start_ms, end_ms, text.to_string())
}

/// Builds `count` consecutive one-second cues cycling through short phrases
pub fn speech_cues(count: usize) -> Vec<SubtitleEntry> {
    const PHRASES: [&str; 6] = [
        "so I was thinking",
        "that we could go",
        "to the lake tomorrow, if the weather holds.",
        "What do you say?",
        "",
        "I would love that; let me check my calendar first - it might be busy",
    ];

    (0..count)
        .map(|i| {
            let start = i as u64 * 1000;
            cue(start, start + 900, PHRASES[i % PHRASES.len()])
        })
        .collect()
}
