use crate::layout::Composition;
use crate::types::*;

/// Calculate statistics for an assembled slideshow
pub fn calculate_statistics(composition: &Composition) -> SlideshowStatistics {
    let mut stats = SlideshowStatistics::default();

    for document in &composition.portrait {
        if document.filler {
            stats.filler_pages += document.page_count;
        } else {
            stats.documents += 1;
            stats.portrait_pages += document.page_count;
        }
    }

    for document in &composition.landscape {
        stats.documents += 1;
        stats.landscape_pages += document.page_count;
    }

    let durations = composition.durations();
    stats.output_pages = durations.len();
    stats.total_display_secs = durations.iter().map(|&secs| u64::from(secs)).sum();

    stats
}
