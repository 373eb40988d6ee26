use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Result, Context};
use serde::{Deserialize, Serialize};
use log::{warn, debug};
use crate::app_config::OutputFormat;
use crate::errors::SubtitleError;

// @module: Subtitle file reading and writing

// @const: SRT timing line regex (comma or dot before the milliseconds)
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,3}:\d{2}:\d{2}[,.]\d{3})\s*-->\s*(\d{1,3}:\d{2}:\d{2}[,.]\d{3})")
        .expect("timestamp regex is valid")
});

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleEntry {
    // @field: Sequence number
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Subtitle text
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry
    pub fn new(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: String) -> Self {
        SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text,
        }
    }

    // @creates: Validated subtitle entry
    // @validates: end >= start; text may be empty for raw cues
    pub fn new_validated(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: String) -> Result<Self> {
        if end_time_ms < start_time_ms {
            return Err(SubtitleError::InvalidTimestamp(format!(
                "end time {} < start time {} in entry {}",
                end_time_ms, start_time_ms, seq_num
            )).into());
        }

        Ok(SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text: text.trim().to_string(),
        })
    }

    /// Parse an SRT timestamp (HH:MM:SS,mmm) to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64> {
        let parts: Vec<&str> = timestamp.trim().split(&[':', ',', '.'][..]).collect();

        if parts.len() != 4 {
            return Err(SubtitleError::InvalidTimestamp(timestamp.to_string()).into());
        }

        let hours: u64 = parts[0].parse().context("Failed to parse hours")?;
        let minutes: u64 = parts[1].parse().context("Failed to parse minutes")?;
        let seconds: u64 = parts[2].parse().context("Failed to parse seconds")?;
        let millis: u64 = parts[3].parse().context("Failed to parse milliseconds")?;

        // Validate time components
        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(SubtitleError::InvalidTimestamp(timestamp.to_string()).into());
        }

        Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_time_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_time_ms)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Collection of subtitle entries with metadata
#[derive(Debug, Clone)]
pub struct SubtitleCollection {
    /// Source filename
    pub source_file: PathBuf,

    /// List of subtitle entries
    pub entries: Vec<SubtitleEntry>,
}

// Entry whose timing line has been read but whose text block is still open
struct PendingEntry {
    seq_num: usize,
    start_ms: u64,
    end_ms: u64,
    lines: Vec<String>,
}

impl SubtitleCollection {
    /// Create a new subtitle collection
    pub fn new(source_file: PathBuf) -> Self {
        SubtitleCollection {
            source_file,
            entries: Vec::new(),
        }
    }

    /// Create a collection around existing entries
    pub fn with_entries(source_file: PathBuf, entries: Vec<SubtitleEntry>) -> Self {
        SubtitleCollection {
            source_file,
            entries,
        }
    }

    /// Read and parse an SRT file.
    ///
    /// The file is decoded as UTF-8 (a leading BOM is ignored); if that fails
    /// it is decoded as Latin-1 instead.
    pub fn read_srt_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read subtitle file: {}", path.display()))?;

        let content = Self::decode_bytes(&bytes);
        let entries = Self::parse_srt_string(&content)
            .with_context(|| format!("Failed to parse subtitle file: {}", path.display()))?;

        debug!("Loaded {} subtitles from {}", entries.len(), path.display());

        Ok(SubtitleCollection {
            source_file: path.to_path_buf(),
            entries,
        })
    }

    /// Decode raw file bytes, falling back to Latin-1 when they are not UTF-8
    pub fn decode_bytes(bytes: &[u8]) -> String {
        match std::str::from_utf8(bytes) {
            Ok(text) => text.strip_prefix('\u{feff}').unwrap_or(text).to_string(),
            Err(_) => {
                warn!("UTF-8 decoding failed, trying with latin-1");
                bytes.iter().map(|&b| char::from(b)).collect()
            }
        }
    }

    /// Parse SRT format string into subtitle entries.
    ///
    /// Entries keep their input order. Entries with empty text are kept;
    /// entries whose end precedes their start are skipped with a warning.
    pub fn parse_srt_string(content: &str) -> Result<Vec<SubtitleEntry>> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut entries = Vec::new();
        let mut lines = content.lines().enumerate().peekable();

        let mut pending: Option<PendingEntry> = None;
        let mut seq_num: Option<usize> = None;
        // set while the text of an entry with an unusable timing line is passed over
        let mut skipping_block = false;

        let finalize = |entry: PendingEntry, entries: &mut Vec<SubtitleEntry>| {
            let text = entry.lines.join("\n");
            match SubtitleEntry::new_validated(entry.seq_num, entry.start_ms, entry.end_ms, text) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("Skipping invalid subtitle entry {}: {}", entry.seq_num, e),
            }
        };

        while let Some((line_idx, line)) = lines.next() {
            let trimmed = line.trim();

            // A blank line closes the current entry, whatever its text
            if trimmed.is_empty() {
                if let Some(entry) = pending.take() {
                    finalize(entry, &mut entries);
                }
                seq_num = None;
                skipping_block = false;
                continue;
            }

            // A counter directly followed by a timing line starts a new entry,
            // even when the blank separator line is missing
            if let Ok(num) = trimmed.parse::<usize>() {
                let next_is_timing = lines
                    .peek()
                    .is_some_and(|(_, next)| TIMESTAMP_REGEX.is_match(next.trim()));
                if next_is_timing {
                    if let Some(entry) = pending.take() {
                        finalize(entry, &mut entries);
                    }
                    seq_num = Some(num);
                    skipping_block = false;
                    continue;
                }
            }

            if let Some(entry) = pending.as_mut() {
                entry.lines.push(trimmed.to_string());
                continue;
            }

            if skipping_block {
                continue;
            }

            if let Some(caps) = TIMESTAMP_REGEX.captures(trimmed) {
                let seq = seq_num.take().unwrap_or(entries.len() + 1);
                match (SubtitleEntry::parse_timestamp(&caps[1]), SubtitleEntry::parse_timestamp(&caps[2])) {
                    (Ok(start_ms), Ok(end_ms)) => {
                        pending = Some(PendingEntry {
                            seq_num: seq,
                            start_ms,
                            end_ms,
                            lines: Vec::new(),
                        });
                    }
                    (Err(e), _) | (_, Err(e)) => {
                        warn!("Invalid timestamp format at line {}, skipping entry {}: {}", line_idx + 1, seq, e);
                        skipping_block = true;
                    }
                }
                continue;
            }

            warn!("Unexpected text at line {} before sequence number or timestamp: {}", line_idx + 1, trimmed);
        }

        if let Some(entry) = pending.take() {
            finalize(entry, &mut entries);
        }

        if entries.is_empty() {
            return Err(SubtitleError::NoEntries(
                "no valid subtitle entries were found in the SRT content".to_string(),
            ).into());
        }

        // Check for overlapping entries
        let overlap_count = entries
            .windows(2)
            .filter(|pair| pair[0].end_time_ms > pair[1].start_time_ms)
            .count();
        if overlap_count > 0 {
            warn!("Found {} overlapping subtitle entries", overlap_count);
        }

        // Renumber entries to ensure sequential order
        for (i, entry) in entries.iter_mut().enumerate() {
            entry.seq_num = i + 1;
        }

        Ok(entries)
    }

    /// Render entries as SRT text
    pub fn to_srt_string(&self) -> String {
        self.entries.iter().map(|entry| entry.to_string()).collect()
    }

    /// Render entries as plain text, one cue per line
    pub fn to_plain_text(&self) -> String {
        let mut text = String::new();
        for entry in &self.entries {
            text.push_str(&entry.text);
            text.push('\n');
        }
        text
    }

    /// Write subtitles in the requested format
    pub fn write_as<P: AsRef<Path>>(&self, path: P, format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Srt => self.write_to_srt(path),
            OutputFormat::Txt => self.write_to_txt(path),
            OutputFormat::Json => self.write_to_json(path),
        }
    }

    /// Write subtitles to an SRT file
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = Self::create_output(path.as_ref())?;

        // Write each entry to the file
        for entry in &self.entries {
            write!(writer, "{}", entry)?;
        }
        writer.flush()?;

        Ok(())
    }

    /// Write subtitles as plain text
    pub fn write_to_txt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = Self::create_output(path.as_ref())?;
        writer.write_all(self.to_plain_text().as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Write subtitles as a pretty-printed JSON array
    pub fn write_to_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = Self::create_output(path.as_ref())?;
        serde_json::to_writer_pretty(&mut writer, &self.entries)
            .context("Failed to serialize subtitles to JSON")?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    fn create_output(path: &Path) -> Result<BufWriter<File>> {
        // Create parent directory if needed
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let file = File::create(path)
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;
        Ok(BufWriter::new(file))
    }
}

impl fmt::Display for SubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Collection")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        Ok(())
    }
}
