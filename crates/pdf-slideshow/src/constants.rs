//! Shared constants for slideshow assembly
//!
//! This module centralizes magic numbers, tool arguments and file names
//! used throughout the pipeline.

use crate::types::BucketKind;

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4; // ≈ 2.83465

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Convert points to millimeters
#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / 72.0 * 25.4
}

// =============================================================================
// Scheduling
// =============================================================================

/// Display interval used when neither the filename nor the config sets one
pub const DEFAULT_INTERVAL_SECS: u32 = 15;

/// Upper bound for the configured `INTERVAL`
pub const MAX_INTERVAL_SECS: u32 = 3600;

/// Physical portrait pages per output page after 2-up composition
pub const PAGES_PER_SHEET: usize = 2;

/// Fixed concatenation order of the layout buckets.
/// Portrait buckets are paired 2-up, the landscape bucket is appended last.
pub const BUCKET_ORDER: [BucketKind; 4] = [
    BucketKind::Single,
    BucketKind::Double,
    BucketKind::Many,
    BucketKind::Landscape,
];

// =============================================================================
// Display Panel
// =============================================================================

/// `pdfjam` paper spec for landscape documents (the kiosk panel size)
pub const LANDSCAPE_PAPER_SPEC: &str = "{27in,14.73in}";

/// `pdfnup` paper spec for the 2-up sheet, rotated by `--landscape`
pub const TWO_UP_PAPER_SPEC: &str = "{14.73in,27in}";

/// `pdfnup` grid for two pages side by side
pub const TWO_UP_GRID: &str = "2x1";

// =============================================================================
// Files
// =============================================================================

/// Default config file name, relative to the base directory
pub const DEFAULT_CONFIG_FILE: &str = "config.ini";

/// INI section holding every setting
pub const CONFIG_SECTION: &str = "CONFIG";

/// Default directory for the work directory and the final document
pub const DEFAULT_TEMP_DIR: &str = "/tmp";

/// Document shown when nothing else can be
pub const DEFAULT_FALLBACK_DOCUMENT: &str = "/usr/local/share/show-pdf/default.pdf";

/// Default file receiving external tool output
pub const DEFAULT_TOOL_LOG: &str = "./lastlog.txt";

/// Name of the assembled slideshow inside the temp directory
pub const FINAL_DOCUMENT_NAME: &str = "final.pdf";

pub const PORTRAIT_STREAM_NAME: &str = "a4tmp.pdf";
pub const TWO_UP_STREAM_NAME: &str = "a4all.pdf";
pub const LANDSCAPE_STREAM_NAME: &str = "a3tmp.pdf";
pub const FILLER_NAME: &str = "filler.pdf";
