//! Age-based cleanup of old files

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use globset::Glob;
use sha2::{Digest, Sha256};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Minimum time between two cleanup passes over the same folder and pattern.
const CLEANUP_INTERVAL_HOURS: i64 = 24;

/// Modification time to set with [`touch`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchTime {
    /// This long before now
    Ago(Duration),
    At(DateTime<Utc>),
}

/// Create `path` if it does not exist and optionally set its modification
/// time. Existing content is left untouched.
pub fn touch(path: &Path, when: Option<TouchTime>) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed touching {}", path.display()))?;

    if let Some(when) = when {
        let at = match when {
            TouchTime::Ago(ago) => Utc::now() - ago,
            TouchTime::At(at) => at,
        };
        file.set_modified(SystemTime::from(at))
            .with_context(|| format!("Failed setting modification time of {}", path.display()))?;
    }
    Ok(())
}

/// Flag file recording the last cleanup of `folder` + `pattern`.
pub fn cleanup_flag_path(folder: &Path, pattern: &str) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(folder.to_string_lossy().as_bytes());
    hasher.update(pattern.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    std::env::temp_dir().join(format!("dml_housekeeping_{}.flag", &digest[..16]))
}

/// Delete files in `folder` matching the glob `pattern` that were last
/// modified more than `max_age_days` ago.
///
/// Runs at most once a day per folder and pattern; returns the number of
/// files removed (zero when skipped).
pub fn housekeeping_cleanup(folder: &Path, pattern: &str, max_age_days: u32) -> Result<usize> {
    let flag = cleanup_flag_path(folder, pattern);
    if flag_is_fresh(&flag) {
        tracing::debug!("Housekeeping for {} ran recently, skipping", folder.display());
        return Ok(0);
    }

    let removed = remove_older_than(folder, pattern, Duration::days(i64::from(max_age_days)))?;
    touch(&flag, Some(TouchTime::At(Utc::now())))?;
    Ok(removed)
}

fn flag_is_fresh(flag: &Path) -> bool {
    let Ok(modified) = fs::metadata(flag).and_then(|m| m.modified()) else {
        return false;
    };
    Utc::now() - DateTime::<Utc>::from(modified) < Duration::hours(CLEANUP_INTERVAL_HOURS)
}

/// Unconditional part of [`housekeeping_cleanup`].
pub fn remove_older_than(folder: &Path, pattern: &str, max_age: Duration) -> Result<usize> {
    let matcher = Glob::new(pattern)
        .with_context(|| format!("Invalid file pattern: {pattern}"))?
        .compile_matcher();
    let cut_off = SystemTime::from(Utc::now() - max_age);

    let entries = match fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed reading {}", folder.display()));
        }
    };

    let mut removed = 0;
    for entry in entries {
        let entry = entry?;
        if !matcher.is_match(entry.file_name()) {
            continue;
        }
        let metadata = entry.metadata()?;
        if !metadata.is_file() || metadata.modified()? >= cut_off {
            continue;
        }
        fs::remove_file(entry.path())
            .with_context(|| format!("Failed removing {}", entry.path().display()))?;
        tracing::debug!("Removed old file {}", entry.path().display());
        removed += 1;
    }
    Ok(removed)
}
