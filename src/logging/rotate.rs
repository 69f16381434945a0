//! Time-based rotating log file
//!
//! On rollover the live file is renamed to `<name>.<period>` and rotated
//! files beyond `backup_count` are deleted, oldest first.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Timelike, Utc};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// When the log file rolls over. All boundaries are UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Midnight,
    Hourly,
    /// Every N seconds (at least one)
    Every(u64),
    Never,
}

impl Rotation {
    fn next_after(self, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Rotation::Midnight => {
                Some(from.date_naive().succ_opt()?.and_hms_opt(0, 0, 0)?.and_utc())
            }
            Rotation::Hourly => {
                let hour = from.date_naive().and_hms_opt(from.hour(), 0, 0)?.and_utc();
                Some(hour + Duration::hours(1))
            }
            Rotation::Every(seconds) => {
                Some(from + Duration::seconds(seconds.clamp(1, u64::from(u32::MAX)) as i64))
            }
            Rotation::Never => None,
        }
    }

    fn suffix_format(self) -> &'static str {
        match self {
            Rotation::Midnight | Rotation::Never => "%Y-%m-%d",
            Rotation::Hourly => "%Y-%m-%d_%H",
            Rotation::Every(_) => "%Y-%m-%d_%H-%M-%S",
        }
    }

    fn suffix(self, period_start: DateTime<Utc>) -> String {
        period_start.format(self.suffix_format()).to_string()
    }

    /// Whether `suffix` is one this rotation produces.
    fn is_suffix(self, suffix: &str) -> bool {
        match self {
            Rotation::Midnight | Rotation::Never => {
                NaiveDate::parse_from_str(suffix, self.suffix_format()).is_ok()
            }
            // chrono needs a minute to build a time, so parse hours with one added
            Rotation::Hourly => {
                NaiveDateTime::parse_from_str(&format!("{suffix}-00"), "%Y-%m-%d_%H-%M").is_ok()
            }
            Rotation::Every(_) => NaiveDateTime::parse_from_str(suffix, self.suffix_format()).is_ok(),
        }
    }
}

/// Log file that renames itself at period boundaries.
#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    rotation: Rotation,
    backup_count: usize,
    file: File,
    period_start: DateTime<Utc>,
    next_rollover: Option<DateTime<Utc>>,
}

impl RotatingFile {
    /// Open (appending) the log file at `path`. The parent directory must
    /// exist. `backup_count` of zero keeps every rotated file.
    pub fn open(path: impl Into<PathBuf>, rotation: Rotation, backup_count: usize) -> io::Result<Self> {
        Self::open_at(path, rotation, backup_count, Utc::now())
    }

    /// Like [`open`](Self::open) with an explicit current time. An existing
    /// file is considered to belong to the period of its last modification.
    pub fn open_at(
        path: impl Into<PathBuf>,
        rotation: Rotation,
        backup_count: usize,
        now: DateTime<Utc>,
    ) -> io::Result<Self> {
        let path = path.into();
        let period_start = match fs::metadata(&path).and_then(|m| m.modified()) {
            Ok(modified) => DateTime::<Utc>::from(modified).min(now),
            Err(_) => now,
        };
        let file = open_append(&path)?;
        Ok(Self {
            next_rollover: rotation.next_after(period_start),
            path,
            rotation,
            backup_count,
            file,
            period_start,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `buf`, rolling over first if `now` is past the boundary.
    pub fn write_at(&mut self, buf: &[u8], now: DateTime<Utc>) -> io::Result<()> {
        if self.next_rollover.is_some_and(|at| now >= at) {
            self.rotate(now)?;
        }
        self.file.write_all(buf)?;
        self.file.flush()
    }

    fn rotate(&mut self, now: DateTime<Utc>) -> io::Result<()> {
        self.file.flush()?;

        // The live file may have been moved away or deleted; start a new one.
        if self.path.exists() {
            let target = self.rotated_path(&self.rotation.suffix(self.period_start));
            if target.exists() {
                fs::remove_file(&target)?;
            }
            fs::rename(&self.path, &target)?;
        }
        self.file = open_append(&self.path)?;

        self.prune()?;
        self.period_start = now;
        self.next_rollover = self.rotation.next_after(now);
        Ok(())
    }

    fn rotated_path(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".");
        name.push(suffix);
        self.path.with_file_name(name)
    }

    /// Rotated files for this log, oldest first. Only names ending in a
    /// period suffix of the current rotation count.
    pub fn rotated_files(&self) -> io::Result<Vec<PathBuf>> {
        let Some(name) = self.path.file_name().and_then(|n| n.to_str()) else {
            return Ok(Vec::new());
        };
        let prefix = format!("{name}.");
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut rotated = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let is_rotated = entry
                .file_name()
                .to_str()
                .and_then(|n| n.strip_prefix(&prefix))
                .is_some_and(|suffix| self.rotation.is_suffix(suffix));
            if is_rotated {
                rotated.push(entry.path());
            }
        }
        rotated.sort();
        Ok(rotated)
    }

    fn prune(&self) -> io::Result<()> {
        if self.backup_count == 0 {
            return Ok(());
        }
        let rotated = self.rotated_files()?;
        let excess = rotated.len().saturating_sub(self.backup_count);
        for old in &rotated[..excess] {
            fs::remove_file(old)?;
        }
        Ok(())
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// [`MakeWriter`](tracing_subscriber::fmt::MakeWriter) over a shared
/// [`RotatingFile`].
#[derive(Clone)]
pub struct RotatingFileWriter {
    file: Arc<Mutex<RotatingFile>>,
}

impl RotatingFileWriter {
    pub fn new(file: RotatingFile) -> Self {
        Self { file: Arc::new(Mutex::new(file)) }
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for RotatingFileWriter {
    type Writer = RotatingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        RotatingWriter { file: Arc::clone(&self.file), buf: Vec::with_capacity(256) }
    }
}

/// Per-event writer. Buffers one formatted record and appends it to the
/// log file on [`Drop`].
pub struct RotatingWriter {
    file: Arc<Mutex<RotatingFile>>,
    buf: Vec<u8>,
}

impl Write for RotatingWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for RotatingWriter {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let mut file = self.file.lock();
        let _ = file.write_at(&self.buf, Utc::now());
    }
}
