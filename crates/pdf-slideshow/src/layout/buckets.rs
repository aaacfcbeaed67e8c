//! Bucketing of selected documents
//!
//! Portrait documents are grouped by page count so that the single-page
//! documents can be paired with each other on 2-up sheets:
//!
//! - **Single**: one page, padded to an even count with a filler page
//! - **Double**: two pages, always exactly one sheet
//! - **Many**: three pages or more
//!
//! Landscape documents are never paired and go to their own bucket.
//! Every bucket keeps discovery order.

use crate::constants::PAGES_PER_SHEET;
use crate::types::{BucketKind, SourceDocument, display_name};

/// Documents grouped by layout bucket
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Buckets {
    pub single: Vec<SourceDocument>,
    pub double: Vec<SourceDocument>,
    pub many: Vec<SourceDocument>,
    pub landscape: Vec<SourceDocument>,
}

impl Buckets {
    pub fn get(&self, kind: BucketKind) -> &[SourceDocument] {
        match kind {
            BucketKind::Single => &self.single,
            BucketKind::Double => &self.double,
            BucketKind::Many => &self.many,
            BucketKind::Landscape => &self.landscape,
        }
    }

    fn get_mut(&mut self, kind: BucketKind) -> &mut Vec<SourceDocument> {
        match kind {
            BucketKind::Single => &mut self.single,
            BucketKind::Double => &mut self.double,
            BucketKind::Many => &mut self.many,
            BucketKind::Landscape => &mut self.landscape,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.single.is_empty()
            && self.double.is_empty()
            && self.many.is_empty()
            && self.landscape.is_empty()
    }

    /// Number of documents across all buckets, fillers included
    pub fn len(&self) -> usize {
        self.single.len() + self.double.len() + self.many.len() + self.landscape.len()
    }
}

/// Group documents into layout buckets, padding the single-page bucket.
///
/// Documents without pages are dropped. Order within a bucket is the
/// order of `documents`.
pub fn bucketize(
    documents: impl IntoIterator<Item = SourceDocument>,
    filler: &SourceDocument,
) -> Buckets {
    let mut buckets = Buckets::default();

    for document in documents {
        if document.page_count == 0 {
            log::warn!("{} has no pages, skipped", display_name(&document.path));
            continue;
        }
        let kind = BucketKind::of(&document);
        buckets.get_mut(kind).push(document);
    }

    if buckets.single.len() % PAGES_PER_SHEET != 0 {
        log::debug!(
            "Padding {} single-page documents with a filler page",
            buckets.single.len()
        );
        buckets.single.push(filler.clone());
    }

    buckets
}
