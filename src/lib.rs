/*!
 * # subreflow - subtitle resegmentation
 *
 * A Rust library that rewrites subtitle cue sequences into readable ones.
 *
 * ## Features
 *
 * - Merge consecutive short cues until they reach a minimum length
 * - Split over-long cues at sentence, clause or word boundaries
 * - Redistribute timing proportionally to fragment length, with gaps
 * - Structured notices for forced cuts and degenerate intervals
 * - SRT input (UTF-8 or Latin-1) and SRT, plain text or JSON output
 * - Single file and folder processing
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `resegment`: The pure merge/split/timing core:
 *   - `resegment::merger`: Buffering state machine over raw cues
 *   - `resegment::splitter`: Tiered cut point search
 *   - `resegment::timing`: Interval redistribution
 *   - `resegment::notice`: Structured diagnostics
 * - `subtitle_processor`: SRT parsing and output formats
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod subtitle_processor;
pub mod resegment;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::{Config, OutputFormat};
pub use app_controller::Controller;
pub use subtitle_processor::{SubtitleCollection, SubtitleEntry};
pub use resegment::{merge_cues, Notice, NoticeKind, ResegmentConfig, ResegmentOutcome};
pub use errors::{AppError, SubtitleError};
