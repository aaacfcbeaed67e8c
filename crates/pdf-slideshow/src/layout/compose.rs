//! Page order and display durations of the assembled document
//!
//! A single walk over the buckets in [`BUCKET_ORDER`] places every physical
//! page on an output page. Both the concatenation lists handed to the PDF
//! tools and the duration sequence handed to the viewer are read off that
//! walk, so they cannot disagree about the page count.
//!
//! ## Output pages
//!
//! **Portrait stream** (Single ++ Double ++ Many): two consecutive physical
//! pages share one output page and its duration is the sum of their
//! intervals. A sheet left half-filled by a Many document with an odd page
//! count is closed with a filler page, so the trailing page is shown alone
//! for its own interval.
//!
//! **Landscape stream**: one output page per physical page, shown for the
//! document's interval. Appended after the portrait stream.

use super::buckets::Buckets;
use crate::constants::{BUCKET_ORDER, PAGES_PER_SHEET};
use crate::types::*;

/// The assembled slideshow, before any PDF tool has run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composition {
    /// Documents to concatenate and pair 2-up, fillers included
    pub portrait: Vec<SourceDocument>,
    /// Documents to concatenate unpaired
    pub landscape: Vec<SourceDocument>,
    /// Every physical page in final order
    pub pages: Vec<PlacedPage>,
}

impl Composition {
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Pages of the final assembled document
    pub fn output_page_count(&self) -> usize {
        self.pages.last().map_or(0, |page| page.output_page + 1)
    }

    /// One display duration per output page, in output order
    pub fn durations(&self) -> Vec<u32> {
        fold_durations(self.pages.iter())
    }

    /// Durations of the output pages contributed by one stream
    pub fn stream_durations(&self, stream: Stream) -> Vec<u32> {
        fold_durations(self.pages.iter().filter(|page| page.stream == stream))
    }

    /// Physical pages joined with the duration of their output page
    pub fn assembled_pages(&self) -> Vec<AssembledPage> {
        let durations = self.durations();
        self.pages
            .iter()
            .map(|page| AssembledPage {
                source: page.source.clone(),
                page_index: page.page_index,
                output_page: page.output_page,
                display_secs: durations[page.output_page],
            })
            .collect()
    }

    /// Check the duration count against the page count implied by the
    /// concatenation lists.
    pub fn verify(&self) -> Result<()> {
        let portrait_pages: usize = self.portrait.iter().map(|doc| doc.page_count).sum();
        let landscape_pages: usize = self.landscape.iter().map(|doc| doc.page_count).sum();
        let expected = portrait_pages / PAGES_PER_SHEET + landscape_pages;
        let actual = self.durations().len();

        if portrait_pages % PAGES_PER_SHEET != 0 || expected != actual {
            return Err(SlideshowError::CompositionLengthMismatch { expected, actual });
        }
        Ok(())
    }
}

/// Sum intervals per output page. Pages of one output page are adjacent.
fn fold_durations<'a>(pages: impl Iterator<Item = &'a PlacedPage>) -> Vec<u32> {
    let mut durations: Vec<u32> = Vec::new();
    let mut current = None;

    for page in pages {
        if current != Some(page.output_page) {
            durations.push(0);
            current = Some(page.output_page);
        }
        if let Some(last) = durations.last_mut() {
            *last = last.saturating_add(page.interval_secs);
        }
    }

    durations
}

#[derive(Default)]
struct Walk {
    composition: Composition,
    portrait_pages: usize,
    landscape_pages: usize,
}

impl Walk {
    fn sheet_open(&self) -> bool {
        self.portrait_pages % PAGES_PER_SHEET != 0
    }

    fn push_portrait(&mut self, document: &SourceDocument) {
        for page_index in 0..document.page_count {
            self.composition.pages.push(PlacedPage {
                source: document.path.clone(),
                page_index,
                output_page: self.portrait_pages / PAGES_PER_SHEET,
                interval_secs: document.interval_secs,
                stream: Stream::Portrait,
            });
            self.portrait_pages += 1;
        }
        self.composition.portrait.push(document.clone());
    }

    fn close_sheet(&mut self, filler: &SourceDocument) {
        if self.sheet_open() {
            self.push_portrait(filler);
        }
    }

    fn push_landscape(&mut self, document: &SourceDocument) {
        // Portrait sheets are all closed before the first landscape page
        let sheets = self.portrait_pages / PAGES_PER_SHEET;
        for page_index in 0..document.page_count {
            self.composition.pages.push(PlacedPage {
                source: document.path.clone(),
                page_index,
                output_page: sheets + self.landscape_pages,
                interval_secs: document.interval_secs,
                stream: Stream::Landscape,
            });
            self.landscape_pages += 1;
        }
        self.composition.landscape.push(document.clone());
    }
}

/// Compose the final page order of the assembled document.
///
/// Fails with [`SlideshowError::CompositionLengthMismatch`] if the duration
/// sequence does not cover exactly the output pages.
pub fn compose(buckets: &Buckets, filler: &SourceDocument) -> Result<Composition> {
    let mut walk = Walk::default();

    for kind in BUCKET_ORDER {
        for document in buckets.get(kind) {
            match kind {
                BucketKind::Landscape => walk.push_landscape(document),
                BucketKind::Many => {
                    walk.push_portrait(document);
                    walk.close_sheet(filler);
                }
                BucketKind::Single | BucketKind::Double => walk.push_portrait(document),
            }
        }
        if kind != BucketKind::Landscape {
            walk.close_sheet(filler);
        }
    }

    let composition = walk.composition;
    composition.verify()?;
    Ok(composition)
}

/// Display duration of every output page, in the order of [`compose`].
pub fn sequence_intervals(buckets: &Buckets, filler: &SourceDocument) -> Result<Vec<u32>> {
    Ok(compose(buckets, filler)?.durations())
}
