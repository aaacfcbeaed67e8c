//! Discovery of scheduled PDFs in the base directory
//!
//! A file takes part in the slideshow when its name starts with a date range
//! and, optionally, a display interval in seconds:
//!
//! ```text
//! 20260101-20260131_notice.pdf      shown through January, default interval
//! 20260101-20260131-10_notice.pdf   same range, 10 seconds per page
//! ```
//!
//! The interval takes one or two digits. A longer digit run is not an
//! interval and leaves the default in place.
//!
//! Both dates are inclusive: the range runs from the start of the begin day
//! to the end of the end day.

use crate::types::*;
use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static SCHEDULED_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{8})-(\d{8})(?:-(\d{1,2}))?(?:\D.*)?\.(?:pdf|PDF)$")
        .expect("valid schedule name regex")
});

/// A PDF whose filename carries its display schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledFile {
    pub path: PathBuf,
    pub begin: NaiveDate,
    pub end: NaiveDate,
    /// Interval from the filename, 0 when absent
    pub interval_token: u32,
}

impl ScheduledFile {
    /// Parse the schedule out of a file name. Returns `None` when the name
    /// does not follow the convention or a date is not a calendar date.
    pub fn parse(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        let captures = SCHEDULED_NAME.captures(name)?;

        let begin = NaiveDate::parse_from_str(&captures[1], "%Y%m%d").ok()?;
        let end = NaiveDate::parse_from_str(&captures[2], "%Y%m%d").ok()?;
        let interval_token = match captures.get(3) {
            Some(token) => token.as_str().parse().ok()?,
            None => 0,
        };

        Some(Self {
            path: path.to_path_buf(),
            begin,
            end,
            interval_token,
        })
    }

    /// Whether `now` falls inside the inclusive date range
    pub fn is_active(&self, now: NaiveDateTime) -> bool {
        let start = self.begin.and_time(NaiveTime::MIN);
        let Some(stop) = self.end.checked_add_days(Days::new(1)) else {
            return start <= now;
        };
        start <= now && now <= stop.and_time(NaiveTime::MIN)
    }
}

/// Files directly inside `base_dir`, sorted by name
pub fn list_files(base_dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/*",
        glob::Pattern::escape(&base_dir.to_string_lossy())
    );
    let entries = glob::glob(&pattern)
        .map_err(|e| SlideshowError::Config(format!("Invalid base directory pattern: {}", e)))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(std::io::Error::from)?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Scheduled files in `base_dir` whose date range covers `now`
pub fn select_files(base_dir: &Path, now: NaiveDateTime) -> Result<Vec<ScheduledFile>> {
    let mut selected = Vec::new();

    for path in list_files(base_dir)? {
        let Some(file) = ScheduledFile::parse(&path) else {
            continue;
        };
        if file.is_active(now) {
            log::info!("{}  [Print]", display_name(&path));
            selected.push(file);
        } else {
            log::info!("{}  [DontPrint]", display_name(&path));
        }
    }

    Ok(selected)
}
