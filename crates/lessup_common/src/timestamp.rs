//! Modification and compilation timestamps.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A point in time, stored as nanoseconds since the Unix epoch.
///
/// Both filesystem modification times and compiler provenance times use this
/// type, so staleness checks are a plain integer comparison. Times before the
/// epoch clamp to [`Timestamp::EPOCH`].
#[derive(
    Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The Unix epoch.
    pub const EPOCH: Self = Self(0);

    /// Creates a timestamp from nanoseconds since the epoch.
    pub const fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    /// Creates a timestamp from whole seconds since the epoch.
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs.saturating_mul(1_000_000_000))
    }

    /// Returns the number of nanoseconds since the epoch.
    pub const fn as_nanos(self) -> u64 {
        self.0
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        Self::from_system_time(SystemTime::now())
    }

    /// Converts a [`SystemTime`], saturating at both ends of the range.
    pub fn from_system_time(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(d) => Self(u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)),
            Err(_) => Self::EPOCH,
        }
    }

    /// Converts back into a [`SystemTime`].
    pub fn to_system_time(self) -> SystemTime {
        UNIX_EPOCH + Duration::from_nanos(self.0)
    }

    /// Reads the modification time of the file at `path`.
    pub fn modified(path: &Path) -> io::Result<Self> {
        let meta = std::fs::metadata(path)?;
        Ok(Self::from_system_time(meta.modified()?))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:09}",
            self.0 / 1_000_000_000,
            self.0 % 1_000_000_000
        )
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_follows_nanos() {
        assert!(Timestamp::from_nanos(5) < Timestamp::from_nanos(6));
        assert_eq!(Timestamp::from_secs(2), Timestamp::from_nanos(2_000_000_000));
    }

    #[test]
    fn system_time_roundtrip() {
        let t = Timestamp::from_nanos(1_700_000_000_123_456_789);
        assert_eq!(Timestamp::from_system_time(t.to_system_time()), t);
    }

    #[test]
    fn pre_epoch_clamps() {
        let before = UNIX_EPOCH - Duration::from_secs(10);
        assert_eq!(Timestamp::from_system_time(before), Timestamp::EPOCH);
    }

    #[test]
    fn display_seconds_and_fraction() {
        assert_eq!(Timestamp::from_nanos(1_000_000_042).to_string(), "1.000000042");
    }

    #[test]
    fn modified_reads_file_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.less");
        std::fs::write(&path, "@c: red;").unwrap();
        let t = Timestamp::modified(&path).unwrap();
        assert!(t > Timestamp::EPOCH);
    }

    #[test]
    fn modified_missing_file_errors() {
        assert!(Timestamp::modified(Path::new("/nonexistent/a.less")).is_err());
    }
}
