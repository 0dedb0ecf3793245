//! Size- and hour-rotated log files.
//!
//! # Naming
//! ```text
//! <dir>/<prefix>-<YYYY-MM-DD-HH>.log      first file of an hour
//! <dir>/<prefix>-<YYYY-MM-DD-HH>.<n>.log  n-th size overflow in that hour
//! ```
//!
//! # Rotation
//! - Hour change (UTC, via the injected clock): start the new bucket's file
//! - Next line would push the active file past `max_size_bytes`: next index
//! - After opening a file, delete the oldest files beyond `max_files`
//!
//! Files from earlier runs that follow the naming scheme are adopted at open
//! and count toward retention. Restarting within an hour appends.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::clock::Clock;
use crate::sink::SinkError;

pub const DEFAULT_MAX_SIZE_BYTES: u64 = 20 * 1024 * 1024;
pub const DEFAULT_MAX_FILES: usize = 5;
pub const DEFAULT_PREFIX: &str = "service";

const BUCKET_FORMAT: &str = "%Y-%m-%d-%H";

/// Rotation parameters for one file set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationConfig {
    /// Directory holding the file set.
    pub directory: PathBuf,
    /// Leading part of every file name.
    pub prefix: String,
    /// Size bound of a single file.
    pub max_size_bytes: u64,
    /// Number of files kept, the active one included.
    pub max_files: usize,
}

impl RotationConfig {
    pub fn new(directory: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            prefix: prefix.into(),
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            max_files: DEFAULT_MAX_FILES,
        }
    }

    pub fn with_max_size_bytes(mut self, max_size_bytes: u64) -> Self {
        self.max_size_bytes = max_size_bytes;
        self
    }

    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    /// Path of the `index`-th file of `bucket`.
    pub fn file_path(&self, bucket: &str, index: u32) -> PathBuf {
        let name = if index == 0 {
            format!("{}-{}.log", self.prefix, bucket)
        } else {
            format!("{}-{}.{}.log", self.prefix, bucket, index)
        };
        self.directory.join(name)
    }

    /// Inverse of [`file_path`](Self::file_path) for a bare file name.
    fn parse_file_name(&self, name: &str) -> Option<(String, u32)> {
        let rest = name
            .strip_prefix(self.prefix.as_str())?
            .strip_prefix('-')?
            .strip_suffix(".log")?;

        let (bucket, index) = match rest.split_once('.') {
            Some((bucket, index)) => (bucket, index.parse::<u32>().ok().filter(|i| *i > 0)?),
            None => (rest, 0),
        };

        is_bucket(bucket).then(|| (bucket.to_string(), index))
    }
}

/// `YYYY-MM-DD-HH`
fn is_bucket(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 13
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 | 10 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

#[derive(Debug)]
struct ActiveFile {
    path: PathBuf,
    bucket: String,
    index: u32,
    size: u64,
    file: File,
}

#[derive(Debug, Clone)]
struct KnownFile {
    path: PathBuf,
    bucket: String,
    index: u32,
}

enum Next {
    Keep,
    Overflow(u32),
    NewBucket,
}

/// Append-only writer over a rotating file set.
pub struct RotatingFile<C: Clock> {
    config: RotationConfig,
    clock: C,
    active: Option<ActiveFile>,
    /// Files on disk, oldest first. The active file is always last.
    history: VecDeque<KnownFile>,
}

impl<C: Clock> RotatingFile<C> {
    /// Prepare the file set. Never fails: a directory that cannot be created
    /// is reported here and again, as an error, on the first write.
    pub fn open(config: RotationConfig, clock: C) -> Self {
        if let Err(e) = fs::create_dir_all(&config.directory) {
            tracing::warn!(
                directory = %config.directory.display(),
                error = %e,
                "Could not create log directory"
            );
        }

        let history = scan_existing(&config);
        if !history.is_empty() {
            tracing::debug!(
                directory = %config.directory.display(),
                files = history.len(),
                "Adopted existing log files"
            );
        }

        Self {
            config,
            clock,
            active: None,
            history,
        }
    }

    /// Path currently written to, if any file has been opened yet.
    pub fn active_path(&self) -> Option<&Path> {
        self.active.as_ref().map(|a| a.path.as_path())
    }

    /// Files currently retained, oldest first.
    pub fn retained_files(&self) -> Vec<PathBuf> {
        self.history.iter().map(|f| f.path.clone()).collect()
    }

    /// Append `line` plus a newline, rotating first if needed.
    pub fn write_line(&mut self, line: &str) -> Result<(), SinkError> {
        let bucket = self.clock.now().format(BUCKET_FORMAT).to_string();
        let needed = line.len() as u64 + 1;

        let next = match &self.active {
            Some(active) if active.bucket == bucket => {
                if self.fits(active.size, needed) {
                    Next::Keep
                } else {
                    Next::Overflow(active.index + 1)
                }
            }
            _ => Next::NewBucket,
        };

        match next {
            Next::Keep => {}
            Next::Overflow(index) => self.open_file(bucket, index)?,
            Next::NewBucket => {
                let index = self.resume_index(&bucket, needed);
                self.open_file(bucket, index)?;
            }
        }

        let active = match self.active.as_mut() {
            Some(active) => active,
            None => return Ok(()),
        };

        let mut buf = Vec::with_capacity(needed as usize);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');
        active.file.write_all(&buf).map_err(|source| SinkError::Io {
            path: active.path.clone(),
            source,
        })?;
        active.size += needed;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), SinkError> {
        if let Some(active) = self.active.as_mut() {
            active.file.flush().map_err(|source| SinkError::Io {
                path: active.path.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// An empty file always takes the line so oversized lines still land.
    fn fits(&self, size: u64, needed: u64) -> bool {
        size == 0 || size + needed <= self.config.max_size_bytes
    }

    /// Index to continue with when entering `bucket`: the newest existing
    /// file of that bucket if it still has room, otherwise the one after it.
    fn resume_index(&self, bucket: &str, needed: u64) -> u32 {
        let newest = self
            .history
            .iter()
            .filter(|f| f.bucket == bucket)
            .max_by_key(|f| f.index);

        match newest {
            None => 0,
            Some(known) => {
                let size = fs::metadata(&known.path).map(|m| m.len()).unwrap_or(0);
                if self.fits(size, needed) {
                    known.index
                } else {
                    known.index + 1
                }
            }
        }
    }

    fn open_file(&mut self, bucket: String, index: u32) -> Result<(), SinkError> {
        let path = self.config.file_path(&bucket, index);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| SinkError::Io {
                path: path.clone(),
                source,
            })?;
        let size = file.metadata().map(|m| m.len()).unwrap_or(0);

        if let Some(previous) = self.active.take() {
            tracing::debug!(
                from = %previous.path.display(),
                to = %path.display(),
                "Rotating log file"
            );
        }

        self.history.retain(|f| f.path != path);
        self.history.push_back(KnownFile {
            path: path.clone(),
            bucket: bucket.clone(),
            index,
        });
        self.active = Some(ActiveFile {
            path,
            bucket,
            index,
            size,
            file,
        });

        self.enforce_retention();
        Ok(())
    }

    fn enforce_retention(&mut self) {
        let keep = self.config.max_files.max(1);
        while self.history.len() > keep {
            let Some(oldest) = self.history.pop_front() else {
                break;
            };
            match fs::remove_file(&oldest.path) {
                Ok(()) => {
                    tracing::debug!(path = %oldest.path.display(), "Removed old log file");
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(
                        path = %oldest.path.display(),
                        error = %e,
                        "Failed to remove old log file"
                    );
                }
            }
        }
    }
}

/// Files already in the directory that belong to this set, oldest first.
fn scan_existing(config: &RotationConfig) -> VecDeque<KnownFile> {
    let entries = match fs::read_dir(&config.directory) {
        Ok(entries) => entries,
        Err(_) => return VecDeque::new(),
    };

    let mut found: Vec<(SystemTime, KnownFile)> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| {
            let name = entry.file_name();
            let (bucket, index) = config.parse_file_name(name.to_str()?)?;
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            Some((
                modified,
                KnownFile {
                    path: entry.path(),
                    bucket,
                    index,
                },
            ))
        })
        .collect();

    found.sort_by(|(a_time, a), (b_time, b)| {
        a_time
            .cmp(b_time)
            .then_with(|| a.bucket.cmp(&b.bucket))
            .then_with(|| a.index.cmp(&b.index))
    });
    found.into_iter().map(|(_, known)| known).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::{TimeZone, Utc};

    fn clock_at(hour: u32) -> ManualClock {
        ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, hour, 15, 0).unwrap())
    }

    fn names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_file_names() {
        let config = RotationConfig::new("/logs", "web-service");
        assert_eq!(
            config.file_path("2024-05-01-10", 0),
            PathBuf::from("/logs/web-service-2024-05-01-10.log")
        );
        assert_eq!(
            config.file_path("2024-05-01-10", 3),
            PathBuf::from("/logs/web-service-2024-05-01-10.3.log")
        );
    }

    #[test]
    fn test_parse_file_name() {
        let config = RotationConfig::new("/logs", "web-service");
        assert_eq!(
            config.parse_file_name("web-service-2024-05-01-10.log"),
            Some(("2024-05-01-10".to_string(), 0))
        );
        assert_eq!(
            config.parse_file_name("web-service-2024-05-01-10.2.log"),
            Some(("2024-05-01-10".to_string(), 2))
        );
        assert_eq!(config.parse_file_name("web-service-2024-05-01-10.0.log"), None);
        assert_eq!(config.parse_file_name("web-service-latest.log"), None);
        assert_eq!(config.parse_file_name("web-2024-05-01-10.log"), None);
        // Another set whose prefix starts with ours.
        let short = RotationConfig::new("/logs", "web");
        assert_eq!(short.parse_file_name("web-service-2024-05-01-10.log"), None);
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let mut file = RotatingFile::open(RotationConfig::new(&nested, "service"), clock_at(10));
        file.write_line("{}").unwrap();
        assert_eq!(names(&nested), vec!["service-2024-05-01-10.log"]);
    }

    #[test]
    fn test_lazy_open() {
        let dir = tempfile::tempdir().unwrap();
        let file = RotatingFile::open(RotationConfig::new(dir.path(), "service"), clock_at(10));
        assert!(file.active_path().is_none());
        assert!(names(dir.path()).is_empty());
    }

    #[test]
    fn test_size_rotation() {
        let dir = tempfile::tempdir().unwrap();
        // Each line is 10 bytes with its newline: two fit per file.
        let config = RotationConfig::new(dir.path(), "service")
            .with_max_size_bytes(20)
            .with_max_files(10);
        let mut file = RotatingFile::open(config, clock_at(10));

        for _ in 0..5 {
            file.write_line("123456789").unwrap();
        }

        assert_eq!(
            names(dir.path()),
            vec![
                "service-2024-05-01-10.1.log",
                "service-2024-05-01-10.2.log",
                "service-2024-05-01-10.log",
            ]
        );
        let first = fs::read_to_string(dir.path().join("service-2024-05-01-10.log")).unwrap();
        assert_eq!(first, "123456789\n123456789\n");
        let last = fs::read_to_string(dir.path().join("service-2024-05-01-10.2.log")).unwrap();
        assert_eq!(last, "123456789\n");
    }

    #[test]
    fn test_oversized_line_is_not_split() {
        let dir = tempfile::tempdir().unwrap();
        let config = RotationConfig::new(dir.path(), "service").with_max_size_bytes(4);
        let mut file = RotatingFile::open(config, clock_at(10));

        file.write_line("a much longer line").unwrap();
        file.write_line("another long line").unwrap();

        let first = fs::read_to_string(dir.path().join("service-2024-05-01-10.log")).unwrap();
        assert_eq!(first, "a much longer line\n");
        let second = fs::read_to_string(dir.path().join("service-2024-05-01-10.1.log")).unwrap();
        assert_eq!(second, "another long line\n");
    }

    #[test]
    fn test_hour_rotation() {
        let dir = tempfile::tempdir().unwrap();
        let clock = clock_at(10);
        let mut file = RotatingFile::open(RotationConfig::new(dir.path(), "service"), clock.clone());

        file.write_line("ten").unwrap();
        clock.advance(chrono::Duration::minutes(50));
        file.write_line("eleven").unwrap();

        assert_eq!(
            names(dir.path()),
            vec!["service-2024-05-01-10.log", "service-2024-05-01-11.log"]
        );
        assert_eq!(
            file.active_path().unwrap(),
            dir.path().join("service-2024-05-01-11.log")
        );
    }

    #[test]
    fn test_retention_keeps_newest() {
        let dir = tempfile::tempdir().unwrap();
        let clock = clock_at(0);
        let config = RotationConfig::new(dir.path(), "service").with_max_files(3);
        let mut file = RotatingFile::open(config, clock.clone());

        for _ in 0..6 {
            file.write_line("x").unwrap();
            clock.advance(chrono::Duration::hours(1));
        }

        assert_eq!(
            names(dir.path()),
            vec![
                "service-2024-05-01-03.log",
                "service-2024-05-01-04.log",
                "service-2024-05-01-05.log",
            ]
        );
        assert_eq!(file.retained_files().len(), 3);
    }

    #[test]
    fn test_retention_ignores_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "keep me").unwrap();
        fs::write(dir.path().join("other-2024-05-01-01.log"), "keep me").unwrap();

        let clock = clock_at(0);
        let config = RotationConfig::new(dir.path(), "service").with_max_files(1);
        let mut file = RotatingFile::open(config, clock.clone());
        file.write_line("x").unwrap();
        clock.advance(chrono::Duration::hours(1));
        file.write_line("y").unwrap();

        assert_eq!(
            names(dir.path()),
            vec!["notes.txt", "other-2024-05-01-01.log", "service-2024-05-01-01.log"]
        );
    }

    #[test]
    fn test_restart_appends_to_current_bucket() {
        let dir = tempfile::tempdir().unwrap();
        let config = RotationConfig::new(dir.path(), "service");

        let mut first = RotatingFile::open(config.clone(), clock_at(10));
        first.write_line("one").unwrap();
        drop(first);

        let mut second = RotatingFile::open(config, clock_at(10));
        second.write_line("two").unwrap();

        let content = fs::read_to_string(dir.path().join("service-2024-05-01-10.log")).unwrap();
        assert_eq!(content, "one\ntwo\n");
    }

    #[test]
    fn test_restart_continues_after_full_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = RotationConfig::new(dir.path(), "service").with_max_size_bytes(8);
        fs::write(dir.path().join("service-2024-05-01-10.log"), "1234567\n").unwrap();

        let mut file = RotatingFile::open(config, clock_at(10));
        file.write_line("next").unwrap();

        assert_eq!(
            file.active_path().unwrap(),
            dir.path().join("service-2024-05-01-10.1.log")
        );
    }

    #[test]
    fn test_existing_files_count_toward_retention() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("service-2024-04-30-22.log"), "old\n").unwrap();
        fs::write(dir.path().join("service-2024-04-30-23.log"), "old\n").unwrap();

        let config = RotationConfig::new(dir.path(), "service").with_max_files(2);
        let mut file = RotatingFile::open(config, clock_at(10));
        file.write_line("new").unwrap();

        let remaining = names(dir.path());
        assert_eq!(remaining.len(), 2);
        assert!(remaining.contains(&"service-2024-05-01-10.log".to_string()));
    }

    #[test]
    fn test_write_fails_when_directory_unusable() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("logs");
        fs::write(&blocker, "file, not dir").unwrap();

        let mut file = RotatingFile::open(RotationConfig::new(&blocker, "service"), clock_at(10));
        let err = file.write_line("x").unwrap_err();
        match err {
            SinkError::Io { path, .. } => assert!(path.starts_with(&blocker)),
            other => panic!("unexpected error: {other}"),
        }
    }
}
