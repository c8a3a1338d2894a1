//! Disk usage of the photo volume.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Space on the file system holding the photos
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskUsage {
    /// Total bytes
    pub total: u64,
    /// Bytes available to the booth
    pub free: u64,
    /// Bytes in use
    pub used: u64,
    /// Used share in percent (0..=100)
    pub used_percent: f64,
}

impl DiskUsage {
    /// Build from raw totals
    #[must_use]
    pub fn from_totals(total: u64, free: u64) -> Self {
        let free = free.min(total);
        let used = total - free;
        let used_percent = if total == 0 {
            0.0
        } else {
            (used as f64 / total as f64) * 100.0
        };
        Self {
            total,
            free,
            used,
            used_percent,
        }
    }

    /// Query the file system containing `path`
    ///
    /// Walks up to the nearest existing ancestor so a not-yet-created album
    /// directory still reports its volume.
    pub fn for_path(path: &Path) -> Result<Self> {
        let mut probe = path;
        while !probe.exists() {
            match probe.parent() {
                Some(parent) => probe = parent,
                None => break,
            }
        }
        let total = fs2::total_space(probe)?;
        let free = fs2::available_space(probe)?;
        Ok(Self::from_totals(total, free))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_totals() {
        let usage = DiskUsage::from_totals(200, 50);
        assert_eq!(usage.used, 150);
        assert!((usage.used_percent - 75.0).abs() < f64::EPSILON);

        let empty = DiskUsage::from_totals(0, 0);
        assert_eq!(empty.used_percent, 0.0);

        let clamped = DiskUsage::from_totals(10, 20);
        assert_eq!(clamped.free, 10);
        assert_eq!(clamped.used, 0);
    }

    #[test]
    fn test_for_missing_path_uses_ancestor() {
        let tmp = tempfile::TempDir::new().unwrap();
        let usage = DiskUsage::for_path(&tmp.path().join("a/b/c")).unwrap();
        assert!(usage.total > 0);
        assert!(usage.free <= usage.total);
    }
}
