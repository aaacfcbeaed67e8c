//! Slideshow pipeline driver
//!
//! This module orchestrates one run of the kiosk:
//! 1. Validate the base directory and load `config.ini`
//! 2. Select the PDFs whose date range covers now
//! 3. Classify each by orientation and resize it to A4 or the landscape panel
//! 4. Bucket and compose the page order and display durations
//! 5. Concatenate, pair portrait pages 2-up, concatenate the final document
//! 6. Hand the final document and its durations to the viewer
//!
//! Anything short of a composition error falls back to the static fallback
//! document shown at the default interval.

use crate::constants::*;
use crate::discover::{ScheduledFile, select_files};
use crate::filler::write_blank_a4;
use crate::interval::resolve_interval;
use crate::layout::{Composition, bucketize, compose};
use crate::options::SlideshowOptions;
use crate::stats::calculate_statistics;
use crate::tools::*;
use crate::types::*;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// What was handed to the viewer
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub document: PathBuf,
    pub schedule: Schedule,
    /// `None` when the fallback document is shown
    pub statistics: Option<SlideshowStatistics>,
}

impl Presentation {
    pub fn is_fallback(&self) -> bool {
        self.statistics.is_none()
    }
}

/// Drives the external tools through one slideshow run
pub struct Pipeline<T> {
    options: SlideshowOptions,
    tools: T,
}

impl<T: SlideshowTools> Pipeline<T> {
    pub fn new(options: SlideshowOptions, tools: T) -> Self {
        Self { options, tools }
    }

    pub fn options(&self) -> &SlideshowOptions {
        &self.options
    }

    pub fn tools(&self) -> &T {
        &self.tools
    }

    /// Assemble the slideshow for `now` and show it.
    ///
    /// Only [`SlideshowError::CompositionLengthMismatch`] is returned as an
    /// error; every other failure shows the fallback document instead.
    pub async fn run(&mut self, now: NaiveDateTime) -> Result<Presentation> {
        let presentation = match self.prepare(now).await {
            Ok(presentation) => presentation,
            Err(e) if e.is_recoverable() => {
                log::warn!("{}, showing fallback document", e);
                self.fallback()
            }
            Err(e) => return Err(e),
        };

        self.present(&presentation).await;
        Ok(presentation)
    }

    /// Build the final document without showing it
    pub async fn prepare(&mut self, now: NaiveDateTime) -> Result<Presentation> {
        self.options.validate()?;
        self.options.load_config()?;
        log::info!(
            "Base directory {}, default interval {}s",
            self.options.base_dir.display(),
            self.options.interval_secs
        );

        let final_document = self.options.final_document();
        remove_if_exists(&final_document).await?;

        let files = select_files(&self.options.base_dir, now)?;
        if files.is_empty() {
            return Err(SlideshowError::EmptyBucketAfterFilter);
        }

        // Intermediate files are removed when `work` drops, on every path
        let work = tempfile::Builder::new()
            .prefix("show-pdf-")
            .tempdir_in(&self.options.temp_dir)?;

        let filler = self.prepare_filler(work.path()).await?;
        let documents = self.prepare_documents(&files, work.path()).await;
        if documents.is_empty() {
            return Err(SlideshowError::EmptyBucketAfterFilter);
        }

        let buckets = bucketize(documents, &filler);
        let composition = compose(&buckets, &filler)?;
        let statistics = calculate_statistics(&composition);
        log::info!(
            "{} documents: {} portrait pages, {} landscape pages, {} filler pages -> {} pages, {}s per cycle",
            statistics.documents,
            statistics.portrait_pages,
            statistics.landscape_pages,
            statistics.filler_pages,
            statistics.output_pages,
            statistics.total_display_secs
        );

        let durations = self
            .assemble(&composition, work.path(), &final_document)
            .await?;

        if let Err(e) = work.close() {
            log::warn!("Failed to remove work directory: {}", e);
        }

        Ok(Presentation {
            document: final_document,
            schedule: Schedule::PerPage(durations),
            statistics: Some(statistics),
        })
    }

    fn fallback(&self) -> Presentation {
        Presentation {
            document: self.options.fallback_document.clone(),
            schedule: Schedule::Uniform(self.options.interval_secs),
            statistics: None,
        }
    }

    /// Filler page for 2-up pairing: the configured one resized to A4 when it
    /// has exactly one page, a generated blank A4 page otherwise
    async fn prepare_filler(&self, work: &Path) -> Result<SourceDocument> {
        let output = work.join(FILLER_NAME);

        if let Some(configured) = &self.options.filler_document {
            let request = ResizeRequest {
                source: configured,
                output: &output,
                target: PaperTarget::A4Portrait,
            };
            match self.tools.resize(&request).await {
                // Sheets are paired assuming a one-page filler
                Ok(()) if output.exists() => match self.tools.page_count(&output).await {
                    Ok(1) => return Ok(SourceDocument::filler(output)),
                    Ok(pages) => log::warn!(
                        "Filler {} has {} pages, using a blank page",
                        configured.display(),
                        pages
                    ),
                    Err(e) => log::warn!("Filler {}: {}", configured.display(), e),
                },
                Ok(()) => log::warn!("Filler {} produced no file", configured.display()),
                Err(e) => log::warn!("Filler {}: {}", configured.display(), e),
            }
        }

        write_blank_a4(&output).await?;
        Ok(SourceDocument::filler(output))
    }

    /// Classify and resize every selected file, skipping the ones that fail
    async fn prepare_documents(&self, files: &[ScheduledFile], work: &Path) -> Vec<SourceDocument> {
        let mut documents = Vec::new();

        for (index, file) in files.iter().enumerate() {
            let name = display_name(&file.path);
            let (size, pages) = match self.tools.page_metadata(&file.path).await {
                Ok(metadata) => metadata,
                Err(e) => {
                    log::warn!("Skipping {}: {}", name, e);
                    continue;
                }
            };

            let orientation = size.orientation();
            let target = PaperTarget::for_orientation(orientation);
            let output = work.join(format!("{:02}.pdf", index));
            log::info!("Resize {:?} {} --> {}", target, name, output.display());

            let request = ResizeRequest {
                source: &file.path,
                output: &output,
                target,
            };
            if let Err(e) = self.tools.resize(&request).await {
                log::warn!("Skipping {}: {}", name, e);
                continue;
            }
            if !output.exists() {
                log::warn!("Skipping {}: resize produced no file", name);
                continue;
            }

            let interval = resolve_interval(file.interval_token, self.options.interval_secs);
            documents.push(SourceDocument::new(output, pages, orientation, interval));
        }

        documents
    }

    /// Run the PDF tools over the composition and return the durations of
    /// the pages that made it into the final document
    async fn assemble(
        &self,
        composition: &Composition,
        work: &Path,
        final_document: &Path,
    ) -> Result<Vec<u32>> {
        let mut parts = Vec::new();
        let mut durations = Vec::new();

        let portrait_inputs = stream_paths(&composition.portrait);
        let portrait = work.join(PORTRAIT_STREAM_NAME);
        let two_up = work.join(TWO_UP_STREAM_NAME);
        if self.concat(&portrait_inputs, &portrait).await && self.two_up(&portrait, &two_up).await {
            parts.push(two_up);
            durations.extend(composition.stream_durations(Stream::Portrait));
        }

        let landscape_inputs = stream_paths(&composition.landscape);
        let landscape = work.join(LANDSCAPE_STREAM_NAME);
        if self.concat(&landscape_inputs, &landscape).await {
            parts.push(landscape);
            durations.extend(composition.stream_durations(Stream::Landscape));
        }

        match parts.as_slice() {
            [] => {
                return Err(SlideshowError::ExternalToolFailure {
                    tool: "pdfunite".to_string(),
                    reason: "no document produced".to_string(),
                });
            }
            [single] => tokio::fs::rename(single, final_document).await?,
            _ => {
                if !self.concat(&parts, final_document).await {
                    return Err(SlideshowError::ExternalToolFailure {
                        tool: "pdfunite".to_string(),
                        reason: format!("{} not produced", final_document.display()),
                    });
                }
            }
        }

        Ok(durations)
    }

    /// Concatenate, reporting whether the output exists afterwards
    async fn concat(&self, inputs: &[PathBuf], output: &Path) -> bool {
        let request = ConcatRequest { inputs, output };
        match self.tools.concat(&request).await {
            Ok(false) => false,
            Ok(true) if output.exists() => true,
            Ok(true) => {
                log::warn!("Concatenation produced no {}", output.display());
                false
            }
            Err(e) => {
                log::warn!("{}", e);
                false
            }
        }
    }

    async fn two_up(&self, source: &Path, output: &Path) -> bool {
        let request = TwoUpRequest { source, output };
        match self.tools.compose_two_up(&request).await {
            Ok(()) if output.exists() => true,
            Ok(()) => {
                log::warn!("2-up composition produced no {}", output.display());
                false
            }
            Err(e) => {
                log::warn!("{}", e);
                false
            }
        }
    }

    /// Replace any running viewer with one showing `presentation`
    async fn present(&self, presentation: &Presentation) {
        if let Err(e) = self.tools.kill().await {
            log::warn!("{}", e);
        }

        if !presentation.document.exists() {
            log::error!("{} not found, nothing to show", presentation.document.display());
            return;
        }

        if let Err(e) = self.tools.clear_screen().await {
            log::debug!("{}", e);
        }

        match &presentation.schedule {
            Schedule::Uniform(secs) => log::info!(
                "Show {} interval in {}s",
                presentation.document.display(),
                secs
            ),
            Schedule::PerPage(durations) => log::info!(
                "Show {} intervals {:?}",
                presentation.document.display(),
                durations
            ),
        }

        let request = ShowRequest {
            path: &presentation.document,
            schedule: &presentation.schedule,
            show_progress: self.options.show_progress,
        };
        if let Err(e) = self.tools.show(&request).await {
            log::error!("{}", e);
        }
    }
}

fn stream_paths(documents: &[SourceDocument]) -> Vec<PathBuf> {
    documents.iter().map(|doc| doc.path.clone()).collect()
}

async fn remove_if_exists(path: &Path) -> Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
