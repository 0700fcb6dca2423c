//! Severity levels for diagnostic statuses.

use core::fmt;

/// Severity of a diagnostic status.
///
/// Levels are totally ordered: `Ok < Warn < Error < Stale`. `Stale` marks a
/// status whose source stopped reporting and ranks above `Error`, so checks
/// for "error or worse" should use `>=` against [`Level::Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
#[cfg_attr(feature = "minicbor", derive(minicbor::Encode, minicbor::Decode))]
#[cfg_attr(feature = "minicbor", cbor(index_only))]
pub enum Level {
    #[default]
    #[cfg_attr(feature = "minicbor", n(0))]
    Ok,
    #[cfg_attr(feature = "minicbor", n(1))]
    Warn,
    #[cfg_attr(feature = "minicbor", n(2))]
    Error,
    #[cfg_attr(feature = "minicbor", n(3))]
    Stale,
}

impl Level {
    /// Wire byte used by diagnostics buses (`0..=3`).
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decode a wire byte. Unknown values are treated as `Stale`.
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => Level::Ok,
            1 => Level::Warn,
            2 => Level::Error,
            _ => Level::Stale,
        }
    }

    /// Summary message for an aggregate status at this level.
    ///
    /// Only `Ok` and `Warn` have their own wording; everything above maps to
    /// `"ERROR"`.
    pub const fn summary(self) -> &'static str {
        match self {
            Level::Ok => "OK",
            Level::Warn => "WARN",
            Level::Error | Level::Stale => "ERROR",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Ok => "OK",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Stale => "STALE",
        }
    }

    /// True for `Error` and `Stale`.
    pub fn is_error(self) -> bool {
        self >= Level::Error
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
