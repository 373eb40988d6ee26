/*!
 * Tests for error types and conversions
 */

use subreflow::errors::{AppError, SubtitleError};

#[test]
fn test_subtitleError_invalidTimestamp_shouldDisplayCorrectly() {
    let error = SubtitleError::InvalidTimestamp("00:99:00,000".to_string());
    let display = format!("{}", error);
    assert!(display.contains("Invalid timestamp"));
    assert!(display.contains("00:99:00,000"));
}

#[test]
fn test_subtitleError_noEntries_shouldDisplayCorrectly() {
    let error = SubtitleError::NoEntries("empty file".to_string());
    assert_eq!(error.to_string(), "No subtitle entries found: empty file");
}

#[test]
fn test_appError_inputUnreadable_shouldDisplayCorrectly() {
    let error = AppError::InputUnreadable("missing.srt: not found".to_string());
    assert_eq!(error.to_string(), "Input unreadable: missing.srt: not found");
}

#[test]
fn test_appError_outputUnwritable_shouldDisplayCorrectly() {
    let error = AppError::OutputUnwritable("/readonly".to_string());
    assert!(error.to_string().starts_with("Output unwritable"));
}

#[test]
fn test_appError_fromSubtitleError_shouldWrap() {
    let error: AppError = SubtitleError::ParseError("bad block".to_string()).into();
    assert!(matches!(error, AppError::Subtitle(_)));
    assert!(error.to_string().contains("bad block"));
}

#[test]
fn test_appError_fromIoError_shouldBecomeFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let error: AppError = io_error.into();
    assert!(matches!(error, AppError::File(_)));
    assert!(error.to_string().contains("denied"));
}

#[test]
fn test_appError_fromAnyhow_shouldBecomeUnknown() {
    let error: AppError = anyhow::anyhow!("something odd").into();
    assert!(matches!(error, AppError::Unknown(_)));
}

#[test]
fn test_appError_intoAnyhow_shouldBeDowncastable() {
    let error: anyhow::Error = AppError::Config("max_chars too small".to_string()).into();
    assert!(matches!(error.downcast_ref::<AppError>(), Some(AppError::Config(_))));
}
