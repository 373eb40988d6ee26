use anyhow::{Result, Context};
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use indicatif::{ProgressBar, ProgressStyle};
use crate::app_config::Config;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::resegment::{merge_cues_with_progress, Notice, NoticeKind, ResegmentOutcome};
use crate::subtitle_processor::SubtitleCollection;

// @module: Application controller for subtitle resegmentation

/// Name of the issues log written next to the output when notices were raised
pub const ISSUES_LOG_FILE: &str = "subreflow.issues.log";

/// Result of resegmenting one file
#[derive(Debug, Clone)]
pub struct ProcessingSummary {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub input_count: usize,
    pub output_count: usize,
    pub skipped_empty: usize,
    pub notices: Vec<Notice>,
    pub elapsed: Duration,
}

impl ProcessingSummary {
    // @returns: Output cues per input cue
    pub fn compression_ratio(&self) -> f64 {
        if self.input_count == 0 {
            0.0
        } else {
            self.output_count as f64 / self.input_count as f64
        }
    }

    pub fn count_notices(&self, kind: NoticeKind) -> usize {
        self.notices.iter().filter(|n| n.kind == kind).count()
    }
}

/// Counters for a folder run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl FolderSummary {
    pub fn total(&self) -> usize {
        self.processed + self.skipped + self.failed
    }
}

/// Main application controller for subtitle resegmentation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config
            .validate()
            .map_err(|e| AppError::Config(format!("{:#}", e)))?;

        Ok(Self { config })
    }

    /// Create a controller with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resegment one SRT file into `output_path`.
    ///
    /// Returns `Ok(None)` when the output exists and `force_overwrite` is off.
    pub fn run<P1: AsRef<Path>, P2: AsRef<Path>>(
        &self,
        input_path: P1,
        output_path: P2,
        force_overwrite: bool,
    ) -> Result<Option<ProcessingSummary>> {
        self.run_with_progress(input_path.as_ref(), output_path.as_ref(), force_overwrite, true)
    }

    fn run_with_progress(
        &self,
        input_path: &Path,
        output_path: &Path,
        force_overwrite: bool,
        show_progress: bool,
    ) -> Result<Option<ProcessingSummary>> {
        let start_time = Instant::now();

        if output_path.exists() && !force_overwrite {
            warn!(
                "Skipping {}, output already exists (use -f to force overwrite)",
                output_path.display()
            );
            return Ok(None);
        }

        FileManager::check_access(input_path, output_path)?;

        let subtitles = SubtitleCollection::read_srt_file(input_path)
            .map_err(|e| AppError::InputUnreadable(format!("{:#}", e)))?;
        debug!("Read {} cues from {}", subtitles.entries.len(), input_path.display());

        let outcome = self.resegment_with_progress(&subtitles, show_progress);

        self.report_notices(&outcome.notices);

        let output = SubtitleCollection::with_entries(output_path.to_path_buf(), outcome.entries);
        output
            .write_as(output_path, self.config.output_format)
            .map_err(|e| AppError::OutputUnwritable(format!("{:#}", e)))?;

        let summary = ProcessingSummary {
            input_path: input_path.to_path_buf(),
            output_path: output_path.to_path_buf(),
            input_count: outcome.input_count,
            output_count: output.entries.len(),
            skipped_empty: outcome.skipped_empty,
            notices: outcome.notices,
            elapsed: start_time.elapsed(),
        };

        if !summary.notices.is_empty() {
            let log_dir = output_path.parent().unwrap_or_else(|| Path::new("."));
            let log_path = log_dir.join(ISSUES_LOG_FILE);
            let context = format!("{} -> {}", input_path.display(), output_path.display());
            if let Err(e) = Self::write_notices_to_file(&summary.notices, &log_path, &context) {
                warn!("Failed to write issues log: {}", e);
            } else {
                debug!("Issues written to {}", log_path.display());
            }
        }

        info!(
            "Resegmented {} cues into {} ({:.2}x, {} empty skipped) in {}",
            summary.input_count,
            summary.output_count,
            summary.compression_ratio(),
            summary.skipped_empty,
            Self::format_duration(summary.elapsed)
        );
        info!("Success: {}", output_path.display());

        Ok(Some(summary))
    }

    // Merge and split with a per-cue progress bar
    fn resegment_with_progress(&self, subtitles: &SubtitleCollection, show_progress: bool) -> ResegmentOutcome {
        let total = subtitles.entries.len() as u64;
        let progress_bar = if show_progress {
            ProgressBar::new(total)
        } else {
            ProgressBar::hidden()
        };
        progress_bar.set_style(Self::progress_style("cues"));
        progress_bar.set_message("Resegmenting");

        let pb = progress_bar.clone();
        let outcome = merge_cues_with_progress(&subtitles.entries, &self.config.resegment, move |done, _total| {
            pb.set_position(done as u64);
        });

        progress_bar.finish_and_clear();
        outcome
    }

    /// Run in folder mode: every `.srt` file under `input_dir` is written to
    /// the same relative location under `output_dir`, with the configured
    /// format's extension
    pub fn run_folder<P1: AsRef<Path>, P2: AsRef<Path>>(
        &self,
        input_dir: P1,
        output_dir: P2,
        force_overwrite: bool,
    ) -> Result<FolderSummary> {
        let input_dir = input_dir.as_ref();
        let output_dir = output_dir.as_ref();
        let start_time = Instant::now();

        if !FileManager::dir_exists(input_dir) {
            return Err(AppError::InputUnreadable(format!(
                "input directory does not exist: {}",
                input_dir.display()
            )).into());
        }

        let subtitle_files = FileManager::find_files(input_dir, "srt")?;
        if subtitle_files.is_empty() {
            return Err(AppError::InputUnreadable(format!(
                "no subtitle files found in directory: {}",
                input_dir.display()
            )).into());
        }

        FileManager::ensure_dir(output_dir)
            .map_err(|e| AppError::OutputUnwritable(format!("{:#}", e)))?;

        let folder_pb = ProgressBar::new(subtitle_files.len() as u64);
        folder_pb.set_style(Self::progress_style("files"));
        folder_pb.set_message("Processing files");

        let extension = self.config.output_format.extension();
        let mut summary = FolderSummary::default();

        for subtitle_file in &subtitle_files {
            let file_name = subtitle_file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            let output_path = FileManager::mirror_output_path(subtitle_file, input_dir, output_dir, extension);

            match self.run_with_progress(subtitle_file, &output_path, force_overwrite, false) {
                Ok(Some(_)) => summary.processed += 1,
                Ok(None) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing file {}: {:#}", file_name, e);
                    summary.failed += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");

        let summary_message = format!(
            "Folder processing completed: {} processed, {} skipped, {} errors",
            summary.processed, summary.skipped, summary.failed
        );
        info!("{} in {}", summary_message, Self::format_duration(start_time.elapsed()));

        Ok(summary)
    }

    fn progress_style(unit: &str) -> ProgressStyle {
        let template = format!(
            "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{percent}}%) {{msg}} {{eta}}",
            unit
        );
        ProgressStyle::default_bar()
            .template(&template)
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░")
    }

    // Surface core notices through the logger
    fn report_notices(&self, notices: &[Notice]) {
        for notice in notices {
            match notice.kind {
                NoticeKind::CompressedGaps => debug!("{}", notice.message),
                NoticeKind::ForcedCut
                | NoticeKind::OversizedFragment
                | NoticeKind::MalformedInterval => warn!("{}", notice.message),
            }
        }

        let forced = notices.iter().filter(|n| n.kind == NoticeKind::ForcedCut).count();
        if forced > 0 {
            info!("{} cue(s) had no natural break point and were cut mid-word", forced);
        }
    }

    // Format duration in a human-readable format
    pub fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }

    /// Append notices to the issues log
    pub fn write_notices_to_file(notices: &[Notice], file_path: &Path, context: &str) -> Result<()> {
        let mut log_content = format!("Resegment issues - {}", context);
        for notice in notices {
            log_content.push('\n');
            log_content.push_str(&notice.to_string());
        }

        FileManager::append_to_log_file(file_path, &log_content)
            .with_context(|| format!("Failed to write issues to {}", file_path.display()))
    }
}
