use chrono::{NaiveDate, NaiveDateTime};
use pdf_slideshow::tools::*;
use pdf_slideshow::*;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// Content of every file the fake tools write
const PLACEHOLDER: &[u8] = b"%PDF-1.7";

/// Collaborators that write placeholder files and record every call
#[derive(Default)]
struct FakeTools {
    /// Page size and count by source file name
    metadata: HashMap<String, (PageSize, usize)>,
    /// Output file names whose producing tool fails
    failing_outputs: HashSet<String>,
    calls: Mutex<Vec<String>>,
    shown: Mutex<Vec<(PathBuf, Schedule)>>,
}

impl FakeTools {
    fn with_portrait(mut self, name: &str, pages: usize) -> Self {
        let size = PageSize::from_points(595.0, 842.0);
        self.metadata.insert(name.to_string(), (size, pages));
        self
    }

    fn with_landscape(mut self, name: &str, pages: usize) -> Self {
        let size = PageSize::from_points(842.0, 595.0);
        self.metadata.insert(name.to_string(), (size, pages));
        self
    }

    fn failing(mut self, output_name: &str) -> Self {
        self.failing_outputs.insert(output_name.to_string());
        self
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn shown(&self) -> Vec<(PathBuf, Schedule)> {
        self.shown.lock().unwrap().clone()
    }

    fn produce(&self, tool: &str, output: &Path) -> Result<()> {
        let name = file_name(output);
        self.record(format!("{tool} {name}"));
        if self.failing_outputs.contains(&name) {
            return Err(SlideshowError::ExternalToolFailure {
                tool: tool.to_string(),
                reason: "exit status: 1".to_string(),
            });
        }
        std::fs::write(output, PLACEHOLDER)?;
        Ok(())
    }

    fn lookup(&self, path: &Path) -> Result<(PageSize, usize)> {
        self.metadata
            .get(&file_name(path))
            .copied()
            .ok_or_else(|| SlideshowError::UnreadablePdfMetadata {
                path: path.to_path_buf(),
                reason: "no page size reported".to_string(),
            })
    }
}

fn file_name(path: &Path) -> String {
    path.file_name().unwrap().to_string_lossy().into_owned()
}

impl PdfMetadata for FakeTools {
    async fn page_size(&self, path: &Path) -> Result<PageSize> {
        Ok(self.lookup(path)?.0)
    }

    async fn page_count(&self, path: &Path) -> Result<usize> {
        Ok(self.lookup(path)?.1)
    }
}

impl PdfResizer for FakeTools {
    async fn resize(&self, request: &ResizeRequest<'_>) -> Result<()> {
        self.record(format!(
            "resize {:?} {}",
            request.target,
            file_name(request.source)
        ));
        self.produce("pdfjam", request.output)
    }
}

impl PdfConcatenator for FakeTools {
    async fn concat(&self, request: &ConcatRequest<'_>) -> Result<bool> {
        if request.inputs.is_empty() {
            return Ok(false);
        }
        for input in request.inputs {
            if file_name(input) == "filler.pdf" {
                let origin = if std::fs::read(input)? == PLACEHOLDER {
                    "resized"
                } else {
                    "generated"
                };
                self.record(format!("filler {origin}"));
            }
        }
        self.produce("pdfunite", request.output)?;
        Ok(true)
    }
}

impl TwoUpComposer for FakeTools {
    async fn compose_two_up(&self, request: &TwoUpRequest<'_>) -> Result<()> {
        self.produce("pdfnup", request.output)
    }
}

impl Viewer for FakeTools {
    async fn show(&self, request: &ShowRequest<'_>) -> Result<()> {
        self.record("show".to_string());
        self.shown
            .lock()
            .unwrap()
            .push((request.path.to_path_buf(), request.schedule.clone()));
        Ok(())
    }

    async fn kill(&self) -> Result<()> {
        self.record("kill".to_string());
        Ok(())
    }

    async fn clear_screen(&self) -> Result<()> {
        self.record("clear".to_string());
        Ok(())
    }
}

struct Fixture {
    base: TempDir,
    temp: TempDir,
}

impl Fixture {
    /// Base directory with a config.ini pointing TEMP_DIR at a scratch directory
    fn new(settings: &str) -> Self {
        let base = TempDir::new().unwrap();
        let temp = TempDir::new().unwrap();
        let config = format!(
            "[CONFIG]\n{}\nTEMP_DIR={}\nFALLBACK=default.pdf\n",
            settings,
            temp.path().display()
        );
        std::fs::write(base.path().join("config.ini"), config).unwrap();
        std::fs::write(base.path().join("default.pdf"), b"%PDF-1.7").unwrap();
        Self { base, temp }
    }

    fn add(&self, name: &str) {
        std::fs::write(self.base.path().join(name), b"%PDF-1.7").unwrap();
    }

    fn options(&self) -> SlideshowOptions {
        SlideshowOptions::new(self.base.path(), "config.ini")
    }

    fn temp_entries(&self) -> Vec<String> {
        let mut entries: Vec<String> = std::fs::read_dir(self.temp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        entries.sort();
        entries
    }
}

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 6, 15)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

#[tokio::test]
async fn test_full_slideshow() {
    let fixture = Fixture::new("INTERVAL=5");
    fixture.add("20260101-20261231-10_a.pdf");
    fixture.add("20260101-20261231_b.pdf");
    fixture.add("20260101-20261231-6_w.pdf");

    let tools = FakeTools::default()
        .with_portrait("20260101-20261231-10_a.pdf", 1)
        .with_portrait("20260101-20261231_b.pdf", 3)
        .with_landscape("20260101-20261231-6_w.pdf", 2);
    let mut pipeline = Pipeline::new(fixture.options(), tools);

    let presentation = pipeline.run(now()).await.unwrap();

    // a + filler, b pages 1-2, b page 3 + filler, w page 1, w page 2
    assert_eq!(presentation.schedule, Schedule::PerPage(vec![10, 10, 5, 6, 6]));
    assert_eq!(presentation.document, fixture.temp.path().join("final.pdf"));
    assert!(!presentation.is_fallback());

    let stats = presentation.statistics.unwrap();
    assert_eq!(stats.documents, 3);
    assert_eq!(stats.output_pages, 5);
    assert_eq!(stats.filler_pages, 2);

    // Intermediates are gone, only the final document is left
    assert_eq!(fixture.temp_entries(), ["final.pdf"]);

    let calls = pipeline.tools().calls();
    assert!(calls.contains(&"resize A4Portrait 20260101-20261231-10_a.pdf".to_string()));
    assert!(calls.contains(&"resize A3Landscape 20260101-20261231-6_w.pdf".to_string()));
    assert!(calls.contains(&"pdfnup a4all.pdf".to_string()));
    assert!(calls.contains(&"pdfunite final.pdf".to_string()));

    let kill = calls.iter().position(|call| call == "kill").unwrap();
    let show = calls.iter().position(|call| call == "show").unwrap();
    assert!(kill < show);

    let shown = pipeline.tools().shown();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].0, presentation.document);
    assert_eq!(shown[0].1, presentation.schedule);
}

#[tokio::test]
async fn test_portrait_only_moves_two_up_output() {
    let fixture = Fixture::new("INTERVAL=5");
    fixture.add("20260101-20261231-10_a.pdf");
    fixture.add("20260101-20261231_b.pdf");

    let tools = FakeTools::default()
        .with_portrait("20260101-20261231-10_a.pdf", 1)
        .with_portrait("20260101-20261231_b.pdf", 1);
    let mut pipeline = Pipeline::new(fixture.options(), tools);

    let presentation = pipeline.prepare(now()).await.unwrap();

    assert_eq!(presentation.schedule, Schedule::PerPage(vec![15]));
    assert!(presentation.document.exists());
    assert!(!pipeline.tools().calls().contains(&"pdfunite final.pdf".to_string()));
    assert!(pipeline.tools().shown().is_empty());
}

#[tokio::test]
async fn test_no_active_files_shows_fallback() {
    let fixture = Fixture::new("INTERVAL=20");
    fixture.add("20200101-20201231_old.pdf");

    let mut pipeline = Pipeline::new(fixture.options(), FakeTools::default());
    let presentation = pipeline.run(now()).await.unwrap();

    assert!(presentation.is_fallback());
    assert_eq!(presentation.document, fixture.base.path().join("default.pdf"));
    assert_eq!(presentation.schedule, Schedule::Uniform(20));
    assert_eq!(pipeline.tools().shown().len(), 1);
}

#[tokio::test]
async fn test_missing_base_dir_shows_fallback() {
    let fallback = TempDir::new().unwrap();
    let fallback_pdf = fallback.path().join("default.pdf");
    std::fs::write(&fallback_pdf, b"%PDF-1.7").unwrap();

    let mut options = SlideshowOptions::new("/nonexistent/show-pdf/base", "config.ini");
    options.fallback_document = fallback_pdf.clone();
    let mut pipeline = Pipeline::new(options, FakeTools::default());

    let presentation = pipeline.run(now()).await.unwrap();
    assert_eq!(presentation.document, fallback_pdf);
    assert_eq!(presentation.schedule, Schedule::Uniform(15));
    assert_eq!(pipeline.tools().shown().len(), 1);
}

#[tokio::test]
async fn test_missing_config_shows_fallback() {
    let base = TempDir::new().unwrap();
    let fallback_pdf = base.path().join("fallback.pdf");
    std::fs::write(&fallback_pdf, b"%PDF-1.7").unwrap();

    let mut options = SlideshowOptions::new(base.path(), "config.ini");
    options.fallback_document = fallback_pdf.clone();
    let mut pipeline = Pipeline::new(options, FakeTools::default());

    let presentation = pipeline.run(now()).await.unwrap();
    assert_eq!(presentation.document, fallback_pdf);
    assert_eq!(presentation.schedule, Schedule::Uniform(15));
}

#[tokio::test]
async fn test_missing_fallback_document_is_not_shown() {
    let mut options = SlideshowOptions::new("/nonexistent/show-pdf/base", "config.ini");
    options.fallback_document = PathBuf::from("/nonexistent/show-pdf/default.pdf");
    let mut pipeline = Pipeline::new(options, FakeTools::default());

    let presentation = pipeline.run(now()).await.unwrap();
    assert!(presentation.is_fallback());
    assert!(pipeline.tools().shown().is_empty());
}

#[tokio::test]
async fn test_unreadable_metadata_is_skipped() {
    let fixture = Fixture::new("INTERVAL=5");
    fixture.add("20260101-20261231_broken.pdf");
    fixture.add("20260101-20261231_ok.pdf");

    let tools = FakeTools::default().with_landscape("20260101-20261231_ok.pdf", 1);
    let mut pipeline = Pipeline::new(fixture.options(), tools);

    let presentation = pipeline.prepare(now()).await.unwrap();
    assert_eq!(presentation.schedule, Schedule::PerPage(vec![5]));
    assert_eq!(presentation.statistics.unwrap().documents, 1);
}

#[tokio::test]
async fn test_failed_resize_drops_document() {
    let fixture = Fixture::new("INTERVAL=5");
    fixture.add("20260101-20261231-3_a.pdf");
    fixture.add("20260101-20261231-7_b.pdf");

    // Selected files are resized in name order to 00.pdf, 01.pdf
    let tools = FakeTools::default()
        .with_portrait("20260101-20261231-3_a.pdf", 1)
        .with_portrait("20260101-20261231-7_b.pdf", 1)
        .failing("00.pdf");
    let mut pipeline = Pipeline::new(fixture.options(), tools);

    let presentation = pipeline.prepare(now()).await.unwrap();
    // b alone, paired with the filler
    assert_eq!(presentation.schedule, Schedule::PerPage(vec![7]));
}

#[tokio::test]
async fn test_failed_two_up_drops_portrait_stream() {
    let fixture = Fixture::new("INTERVAL=5");
    fixture.add("20260101-20261231_a.pdf");
    fixture.add("20260101-20261231-9_w.pdf");

    let tools = FakeTools::default()
        .with_portrait("20260101-20261231_a.pdf", 2)
        .with_landscape("20260101-20261231-9_w.pdf", 3)
        .failing("a4all.pdf");
    let mut pipeline = Pipeline::new(fixture.options(), tools);

    let presentation = pipeline.prepare(now()).await.unwrap();
    assert_eq!(presentation.schedule, Schedule::PerPage(vec![9, 9, 9]));
    assert!(presentation.document.exists());
}

#[tokio::test]
async fn test_no_stream_produced_shows_fallback() {
    let fixture = Fixture::new("INTERVAL=5");
    fixture.add("20260101-20261231_w.pdf");

    let tools = FakeTools::default()
        .with_landscape("20260101-20261231_w.pdf", 1)
        .failing("a3tmp.pdf");
    let mut pipeline = Pipeline::new(fixture.options(), tools);

    let presentation = pipeline.run(now()).await.unwrap();
    assert!(presentation.is_fallback());
    assert_eq!(presentation.schedule, Schedule::Uniform(5));
    // The work directory is cleaned up on failure too
    assert!(fixture.temp_entries().is_empty());
}

#[tokio::test]
async fn test_configured_filler_is_resized() {
    let fixture = Fixture::new("INTERVAL=5\nFILLER=blank.pdf");
    fixture.add("blank.pdf");
    fixture.add("20260101-20261231_a.pdf");

    let tools = FakeTools::default()
        .with_portrait("20260101-20261231_a.pdf", 1)
        .with_portrait("filler.pdf", 1);
    let mut pipeline = Pipeline::new(fixture.options(), tools);

    let presentation = pipeline.prepare(now()).await.unwrap();
    assert_eq!(presentation.schedule, Schedule::PerPage(vec![5]));

    let calls = pipeline.tools().calls();
    assert!(calls.contains(&"resize A4Portrait blank.pdf".to_string()));
    assert!(calls.contains(&"filler resized".to_string()));
}

#[tokio::test]
async fn test_multi_page_filler_is_replaced_by_blank_page() {
    let fixture = Fixture::new("INTERVAL=5\nFILLER=cover.pdf");
    fixture.add("cover.pdf");
    fixture.add("20260101-20261231_a.pdf");
    fixture.add("20260101-20261231_b.pdf");
    fixture.add("20260101-20261231_c.pdf");

    let tools = FakeTools::default()
        .with_portrait("20260101-20261231_a.pdf", 1)
        .with_portrait("20260101-20261231_b.pdf", 2)
        .with_portrait("20260101-20261231_c.pdf", 3)
        .with_portrait("filler.pdf", 3);
    let mut pipeline = Pipeline::new(fixture.options(), tools);

    let presentation = pipeline.prepare(now()).await.unwrap();

    // a + filler, b, c pages 1-2, c page 3 + filler: one filler page each time
    assert_eq!(presentation.schedule, Schedule::PerPage(vec![5, 10, 10, 5]));
    let calls = pipeline.tools().calls();
    assert!(calls.contains(&"resize A4Portrait cover.pdf".to_string()));
    assert!(calls.contains(&"filler generated".to_string()));
    assert!(!calls.contains(&"filler resized".to_string()));
}

#[tokio::test]
async fn test_unreadable_filler_is_replaced_by_blank_page() {
    let fixture = Fixture::new("INTERVAL=5\nFILLER=cover.pdf");
    fixture.add("cover.pdf");
    fixture.add("20260101-20261231_a.pdf");

    let tools = FakeTools::default().with_portrait("20260101-20261231_a.pdf", 1);
    let mut pipeline = Pipeline::new(fixture.options(), tools);

    let presentation = pipeline.prepare(now()).await.unwrap();
    assert_eq!(presentation.schedule, Schedule::PerPage(vec![5]));
    assert!(
        pipeline
            .tools()
            .calls()
            .contains(&"filler generated".to_string())
    );
}

#[tokio::test]
async fn test_stale_final_document_is_removed() {
    let fixture = Fixture::new("INTERVAL=5");
    let stale = fixture.temp.path().join("final.pdf");
    std::fs::write(&stale, b"stale").unwrap();

    let mut pipeline = Pipeline::new(fixture.options(), FakeTools::default());
    let presentation = pipeline.run(now()).await.unwrap();

    assert!(presentation.is_fallback());
    assert!(!stale.exists());
}
