use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlideshowError {
    #[error("Base directory not found: {}", .0.display())]
    MissingBaseDir(PathBuf),
    #[error("Config file not found: {}", .0.display())]
    MissingConfig(PathBuf),
    #[error("Unreadable PDF metadata for {}: {reason}", path.display())]
    UnreadablePdfMetadata { path: PathBuf, reason: String },
    #[error("No documents left after date filtering")]
    EmptyBucketAfterFilter,
    #[error("Composition length mismatch: {expected} output pages but {actual} durations")]
    CompositionLengthMismatch { expected: usize, actual: usize },
    #[error("{tool} failed: {reason}")]
    ExternalToolFailure { tool: String, reason: String },
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SlideshowError {
    /// Whether the driver may still present the fallback document after this error
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, SlideshowError::CompositionLengthMismatch { .. })
    }
}

pub type Result<T> = std::result::Result<T, SlideshowError>;

/// Page orientation of a source document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Portrait: height > width, resized to A4 and shown 2-up
    #[default]
    Portrait,
    /// Landscape: width >= height, resized to the A3-class panel size
    Landscape,
}

/// Resize target for a source document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperTarget {
    /// Portrait pages, later paired 2-up
    A4Portrait,
    /// Landscape pages, fitted to the display panel
    A3Landscape,
}

impl PaperTarget {
    pub fn for_orientation(orientation: Orientation) -> Self {
        match orientation {
            Orientation::Portrait => PaperTarget::A4Portrait,
            Orientation::Landscape => PaperTarget::A3Landscape,
        }
    }
}

/// Physical page size in millimeters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width_mm: f32,
    pub height_mm: f32,
}

impl PageSize {
    /// ISO A4, portrait
    pub const A4: PageSize = PageSize {
        width_mm: 210.0,
        height_mm: 297.0,
    };
}

/// A PDF selected for display, as handed to the layout core
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub page_count: usize,
    pub orientation: Orientation,
    pub interval_secs: u32,
    /// Synthetic blank page used to even out 2-up pairing
    pub filler: bool,
}

impl SourceDocument {
    pub fn new(
        path: impl Into<PathBuf>,
        page_count: usize,
        orientation: Orientation,
        interval_secs: u32,
    ) -> Self {
        Self {
            path: path.into(),
            page_count,
            orientation,
            interval_secs,
            filler: false,
        }
    }

    /// One blank portrait page with no display time of its own
    pub fn filler(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            page_count: 1,
            orientation: Orientation::Portrait,
            interval_secs: 0,
            filler: true,
        }
    }
}

/// Layout bucket a document is grouped into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketKind {
    /// Portrait, one page
    Single,
    /// Portrait, two pages
    Double,
    /// Portrait, three or more pages
    Many,
    /// Any landscape document
    Landscape,
}

impl BucketKind {
    pub fn of(document: &SourceDocument) -> Self {
        match (document.orientation, document.page_count) {
            (Orientation::Landscape, _) => BucketKind::Landscape,
            (Orientation::Portrait, 0 | 1) => BucketKind::Single,
            (Orientation::Portrait, 2) => BucketKind::Double,
            (Orientation::Portrait, _) => BucketKind::Many,
        }
    }
}

/// Which intermediate document a page is concatenated into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    /// Paired two physical pages per output page
    Portrait,
    /// One physical page per output page
    Landscape,
}

/// One physical page in final order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedPage {
    pub source: PathBuf,
    /// 0-based page within the source document
    pub page_index: usize,
    /// 0-based page of the assembled document this page lands on
    pub output_page: usize,
    pub interval_secs: u32,
    pub stream: Stream,
}

/// A placed page joined with the display time of its output page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledPage {
    pub source: PathBuf,
    pub page_index: usize,
    pub output_page: usize,
    pub display_secs: u32,
}

/// Display timing handed to the viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schedule {
    /// Same interval for every page
    Uniform(u32),
    /// One interval per page of the shown document
    PerPage(Vec<u32>),
}

impl Schedule {
    pub fn page_count(&self) -> Option<usize> {
        match self {
            Schedule::Uniform(_) => None,
            Schedule::PerPage(durations) => Some(durations.len()),
        }
    }
}

/// Statistics about an assembled slideshow
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SlideshowStatistics {
    /// Selected documents, fillers excluded
    pub documents: usize,
    /// Physical portrait pages, fillers excluded
    pub portrait_pages: usize,
    /// Physical landscape pages
    pub landscape_pages: usize,
    /// Blank pages added for pairing
    pub filler_pages: usize,
    /// Pages of the assembled document
    pub output_pages: usize,
    /// One full cycle through the slideshow
    pub total_display_secs: u64,
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
