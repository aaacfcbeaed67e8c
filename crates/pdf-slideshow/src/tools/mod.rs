//! External collaborators of the pipeline
//!
//! Every PDF operation the layout core does not perform itself is reached
//! through one of these traits. [`ExternalTools`] implements all of them on
//! top of poppler-utils, pdfjam and jfbview; tests substitute fakes.

mod process;
mod sink;

pub use process::{ExternalTools, PdfInfo, ToolCommands};
pub use sink::ToolLog;

use crate::types::*;
use std::future::Future;
use std::path::{Path, PathBuf};

/// Resize one document to a target paper size
#[derive(Debug, Clone, Copy)]
pub struct ResizeRequest<'a> {
    pub source: &'a Path,
    pub output: &'a Path,
    pub target: PaperTarget,
}

/// Concatenate documents in order
#[derive(Debug, Clone, Copy)]
pub struct ConcatRequest<'a> {
    pub inputs: &'a [PathBuf],
    pub output: &'a Path,
}

/// Lay out every two consecutive pages side by side on one page.
/// The source must have an even page count.
#[derive(Debug, Clone, Copy)]
pub struct TwoUpRequest<'a> {
    pub source: &'a Path,
    pub output: &'a Path,
}

/// Display a document until the viewer exits
#[derive(Debug, Clone, Copy)]
pub struct ShowRequest<'a> {
    pub path: &'a Path,
    pub schedule: &'a Schedule,
    /// Draw the viewer's countdown indicator
    pub show_progress: bool,
}

pub trait PdfMetadata {
    /// Size of the first page, rotation applied
    fn page_size(&self, path: &Path) -> impl Future<Output = Result<PageSize>>;
    fn page_count(&self, path: &Path) -> impl Future<Output = Result<usize>>;

    /// Page size and page count together
    fn page_metadata(&self, path: &Path) -> impl Future<Output = Result<(PageSize, usize)>> {
        async move {
            let size = self.page_size(path).await?;
            let pages = self.page_count(path).await?;
            Ok((size, pages))
        }
    }
}

pub trait PdfResizer {
    fn resize(&self, request: &ResizeRequest<'_>) -> impl Future<Output = Result<()>>;
}

pub trait PdfConcatenator {
    /// Returns `false` without running anything when there is nothing to concatenate
    fn concat(&self, request: &ConcatRequest<'_>) -> impl Future<Output = Result<bool>>;
}

pub trait TwoUpComposer {
    fn compose_two_up(&self, request: &TwoUpRequest<'_>) -> impl Future<Output = Result<()>>;
}

pub trait Viewer {
    fn show(&self, request: &ShowRequest<'_>) -> impl Future<Output = Result<()>>;
    /// Stop any running viewer instance
    fn kill(&self) -> impl Future<Output = Result<()>>;
    fn clear_screen(&self) -> impl Future<Output = Result<()>>;
}

/// Everything the pipeline driver needs
pub trait SlideshowTools:
    PdfMetadata + PdfResizer + PdfConcatenator + TwoUpComposer + Viewer
{
}

impl<T> SlideshowTools for T where
    T: PdfMetadata + PdfResizer + PdfConcatenator + TwoUpComposer + Viewer
{
}
