use crate::constants::*;
use crate::types::*;
use ini::Ini;
use std::path::{Path, PathBuf};

/// Slideshow configuration: command line plus `config.ini`
#[derive(Debug, Clone, PartialEq)]
pub struct SlideshowOptions {
    // Input
    pub base_dir: PathBuf,
    /// Config file, relative to `base_dir` unless absolute
    pub config_file: PathBuf,

    // Scheduling
    pub interval_secs: u32,

    // Documents
    pub fallback_document: PathBuf,
    pub filler_document: Option<PathBuf>,

    // Output
    pub temp_dir: PathBuf,
    pub show_progress: bool,
}

impl Default for SlideshowOptions {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
            interval_secs: DEFAULT_INTERVAL_SECS,
            fallback_document: PathBuf::from(DEFAULT_FALLBACK_DOCUMENT),
            filler_document: None,
            temp_dir: PathBuf::from(DEFAULT_TEMP_DIR),
            show_progress: false,
        }
    }
}

impl SlideshowOptions {
    pub fn new(base_dir: impl Into<PathBuf>, config_file: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            config_file: config_file.into(),
            ..Default::default()
        }
    }

    /// Full path of the config file
    pub fn config_path(&self) -> PathBuf {
        self.resolve(&self.config_file)
    }

    /// Path of the assembled slideshow
    pub fn final_document(&self) -> PathBuf {
        self.temp_dir.join(FINAL_DOCUMENT_NAME)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Check that the base directory and the config file exist
    pub fn validate(&self) -> Result<()> {
        if !self.base_dir.is_dir() {
            return Err(SlideshowError::MissingBaseDir(self.base_dir.clone()));
        }
        let config = self.config_path();
        if !config.is_file() {
            return Err(SlideshowError::MissingConfig(config));
        }
        Ok(())
    }

    /// Load `config.ini`.
    ///
    /// A missing file is an error; an unparsable one only leaves the defaults
    /// in place, like a missing or invalid `INTERVAL`.
    pub fn load_config(&mut self) -> Result<()> {
        let path = self.config_path();
        if !path.is_file() {
            return Err(SlideshowError::MissingConfig(path));
        }

        match Ini::load_from_file(&path) {
            Ok(ini) => self.apply_ini(&ini),
            Err(e) => {
                log::warn!(
                    "Failed to parse {}: {}, using {}s interval",
                    path.display(),
                    e,
                    DEFAULT_INTERVAL_SECS
                );
                self.interval_secs = DEFAULT_INTERVAL_SECS;
            }
        }
        Ok(())
    }

    /// Apply the `[CONFIG]` section of a parsed INI document
    pub fn apply_ini(&mut self, ini: &Ini) {
        let Some(section) = ini.section(Some(CONFIG_SECTION)) else {
            log::warn!(
                "No [{}] section, using {}s interval",
                CONFIG_SECTION,
                DEFAULT_INTERVAL_SECS
            );
            self.interval_secs = DEFAULT_INTERVAL_SECS;
            return;
        };

        self.interval_secs = match section.get("INTERVAL").map(str::trim) {
            Some(value) => match value.parse::<u32>() {
                Ok(secs) if secs > MAX_INTERVAL_SECS => {
                    log::warn!("INTERVAL {} too long, using {}s", secs, MAX_INTERVAL_SECS);
                    MAX_INTERVAL_SECS
                }
                Ok(secs) if secs > 0 => secs,
                _ => {
                    log::warn!(
                        "Invalid INTERVAL {:?}, using {}s",
                        value,
                        DEFAULT_INTERVAL_SECS
                    );
                    DEFAULT_INTERVAL_SECS
                }
            },
            None => DEFAULT_INTERVAL_SECS,
        };

        if let Some(fallback) = section.get("FALLBACK") {
            self.fallback_document = self.resolve(Path::new(fallback.trim()));
        }
        if let Some(filler) = section.get("FILLER") {
            self.filler_document = Some(self.resolve(Path::new(filler.trim())));
        }
        if let Some(temp_dir) = section.get("TEMP_DIR") {
            self.temp_dir = PathBuf::from(temp_dir.trim());
        }
        if let Some(show_progress) = section.get("SHOW_PROGRESS") {
            self.show_progress = parse_bool(show_progress);
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
