//! # Notices
//!
//! Messages surfaced to the shopper when a check fails.
//!
//! Hosts deliver notices in one of two ways. Newer hosts accept a message
//! with a severity; older ones only keep a list of cart error strings.
//! Both are [`NoticeSink`]s, and [`NoticeChannel::for_host`] picks one
//! from the reported host version so the validator never branches on it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  QuantityValidator ──► &mut dyn NoticeSink                              │
//! │                              │                                          │
//! │            ┌─────────────────┼──────────────────┐                       │
//! │            ▼                 ▼                  ▼                       │
//! │     InlineNotices     LegacyCartErrors       NoticeLog                  │
//! │   (host ≥ 2.1)        (host < 2.1)         (tests, CLI)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::QuantityViolation;
use crate::INLINE_NOTICE_MIN_VERSION;

// =============================================================================
// Notice
// =============================================================================

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Error,
    Notice,
    Success,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NoticeLevel::Error => "error",
            NoticeLevel::Notice => "notice",
            NoticeLevel::Success => "success",
        };
        f.write_str(label)
    }
}

/// A message for the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            message: message.into(),
            level: NoticeLevel::Error,
        }
    }
}

impl From<&QuantityViolation> for Notice {
    fn from(violation: &QuantityViolation) -> Self {
        Notice::error(violation.to_string())
    }
}

/// Anything that can receive notices for the current request.
pub trait NoticeSink {
    fn add(&mut self, notice: Notice);
}

impl<S: NoticeSink + ?Sized> NoticeSink for &mut S {
    fn add(&mut self, notice: Notice) {
        (**self).add(notice)
    }
}

// =============================================================================
// Sinks
// =============================================================================

/// Collects every notice in order.
#[derive(Debug, Clone, Default)]
pub struct NoticeLog {
    notices: Vec<Notice>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn messages(&self) -> Vec<&str> {
        self.notices.iter().map(|n| n.message.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}

impl NoticeSink for NoticeLog {
    fn add(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

/// Newer host API: message plus severity.
#[derive(Debug, Clone, Default)]
pub struct InlineNotices {
    entries: Vec<(String, NoticeLevel)>,
}

impl InlineNotices {
    pub fn entries(&self) -> &[(String, NoticeLevel)] {
        &self.entries
    }
}

impl NoticeSink for InlineNotices {
    fn add(&mut self, notice: Notice) {
        self.entries.push((notice.message, notice.level));
    }
}

/// Older host API: a flat list of cart error strings.
#[derive(Debug, Clone, Default)]
pub struct LegacyCartErrors {
    errors: Vec<String>,
}

impl LegacyCartErrors {
    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

impl NoticeSink for LegacyCartErrors {
    fn add(&mut self, notice: Notice) {
        // the legacy surface has nowhere to put non-errors
        if notice.level == NoticeLevel::Error {
            self.errors.push(notice.message);
        }
    }
}

// =============================================================================
// Host Version & Channel Selection
// =============================================================================

/// Host platform version as `major.minor[.patch]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HostVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl HostVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        HostVersion {
            major,
            minor,
            patch,
        }
    }

    pub fn supports_inline_notices(&self) -> bool {
        let (major, minor) = INLINE_NOTICE_MIN_VERSION;
        *self >= HostVersion::new(major, minor, 0)
    }
}

impl fmt::Display for HostVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Error returned when a host version string cannot be parsed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Invalid host version '{0}'")]
pub struct HostVersionError(pub String);

impl FromStr for HostVersion {
    type Err = HostVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || HostVersionError(s.to_string());

        let mut parts = s.trim().split('.');
        let mut next = |required: bool| -> Result<u32, HostVersionError> {
            match parts.next() {
                Some(part) => part.parse().map_err(|_| invalid()),
                None if required => Err(invalid()),
                None => Ok(0),
            }
        };

        let major = next(true)?;
        let minor = next(false)?;
        let patch = next(false)?;

        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(HostVersion::new(major, minor, patch))
    }
}

/// The notice sink matching a host's calling convention.
#[derive(Debug, Clone)]
pub enum NoticeChannel {
    Inline(InlineNotices),
    Legacy(LegacyCartErrors),
}

impl NoticeChannel {
    pub fn for_host(version: HostVersion) -> Self {
        if version.supports_inline_notices() {
            NoticeChannel::Inline(InlineNotices::default())
        } else {
            NoticeChannel::Legacy(LegacyCartErrors::default())
        }
    }

    /// Delivered messages, in order, regardless of channel.
    pub fn messages(&self) -> Vec<&str> {
        match self {
            NoticeChannel::Inline(inline) => {
                inline.entries().iter().map(|(m, _)| m.as_str()).collect()
            }
            NoticeChannel::Legacy(legacy) => legacy.errors().iter().map(String::as_str).collect(),
        }
    }
}

impl NoticeSink for NoticeChannel {
    fn add(&mut self, notice: Notice) {
        match self {
            NoticeChannel::Inline(inline) => inline.add(notice),
            NoticeChannel::Legacy(legacy) => legacy.add(notice),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_host_version() {
        assert_eq!("2.1".parse::<HostVersion>(), Ok(HostVersion::new(2, 1, 0)));
        assert_eq!("8.4.2".parse::<HostVersion>(), Ok(HostVersion::new(8, 4, 2)));
        assert_eq!("3".parse::<HostVersion>(), Ok(HostVersion::new(3, 0, 0)));

        assert!("".parse::<HostVersion>().is_err());
        assert!("2.x".parse::<HostVersion>().is_err());
        assert!("1.2.3.4".parse::<HostVersion>().is_err());
    }

    #[test]
    fn test_inline_threshold() {
        assert!(HostVersion::new(2, 1, 0).supports_inline_notices());
        assert!(HostVersion::new(9, 0, 0).supports_inline_notices());
        assert!(!HostVersion::new(2, 0, 20).supports_inline_notices());
        assert!(!HostVersion::new(1, 6, 6).supports_inline_notices());
    }

    #[test]
    fn test_channel_for_host() {
        let mut modern = NoticeChannel::for_host(HostVersion::new(2, 1, 0));
        modern.add(Notice::error("too many"));
        assert!(matches!(modern, NoticeChannel::Inline(_)));
        assert_eq!(modern.messages(), vec!["too many"]);

        let mut old = NoticeChannel::for_host(HostVersion::new(2, 0, 0));
        old.add(Notice::error("too few"));
        assert!(matches!(old, NoticeChannel::Legacy(_)));
        assert_eq!(old.messages(), vec!["too few"]);
    }

    #[test]
    fn test_legacy_drops_non_errors() {
        let mut legacy = LegacyCartErrors::default();
        legacy.add(Notice {
            message: "added".to_string(),
            level: NoticeLevel::Success,
        });
        legacy.add(Notice::error("nope"));
        assert_eq!(legacy.errors(), ["nope".to_string()]);
    }

    #[test]
    fn test_inline_keeps_level() {
        let mut inline = InlineNotices::default();
        inline.add(Notice::error("nope"));
        assert_eq!(
            inline.entries(),
            [("nope".to_string(), NoticeLevel::Error)]
        );
    }
}
