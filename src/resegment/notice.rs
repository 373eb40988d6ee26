/*!
 * Structured diagnostics emitted by the resegmentation core.
 *
 * The core never logs and never fails. Whenever it has to settle for a
 * degraded result it records a `Notice` and keeps going; the caller decides
 * whether to log, count, or ignore it.
 */

use std::fmt;

/// Kind of degraded outcome the core had to accept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    /// No separator was found near the preferred offset; the text was cut there anyway
    ForcedCut,

    /// The interval was too short for the configured gaps; a smaller gap was used
    CompressedGaps,

    /// A left fragment ended up longer than `max_chars`
    OversizedFragment,

    /// The interval ended before it started, or timing arithmetic overflowed
    MalformedInterval,
}

impl NoticeKind {
    /// Short identifier for reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ForcedCut => "forced-cut",
            Self::CompressedGaps => "compressed-gaps",
            Self::OversizedFragment => "oversized-fragment",
            Self::MalformedInterval => "malformed-interval",
        }
    }
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One diagnostic: what happened and a human readable description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}
