//! Collaborators backed by external command-line tools
//!
//! Commands are spawned directly with argument vectors; no shell is
//! involved, so paths never need quoting.

use super::*;
use crate::constants::{LANDSCAPE_PAPER_SPEC, TWO_UP_GRID, TWO_UP_PAPER_SPEC};
use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Program names of the external tools
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommands {
    pub pdfinfo: String,
    pub pdfjam: String,
    pub pdfnup: String,
    pub pdfunite: String,
    pub viewer: String,
    pub pkill: String,
    pub clear: String,
}

impl Default for ToolCommands {
    fn default() -> Self {
        Self {
            pdfinfo: "pdfinfo".to_string(),
            pdfjam: "pdfjam".to_string(),
            pdfnup: "pdfnup".to_string(),
            pdfunite: "pdfunite".to_string(),
            viewer: "jfbview".to_string(),
            pkill: "pkill".to_string(),
            clear: "clear".to_string(),
        }
    }
}

/// Fields of `pdfinfo` output used for layout
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PdfInfo {
    pub pages: Option<usize>,
    /// Width and height in points
    pub size_pt: Option<(f32, f32)>,
    pub rotation: i32,
}

impl PdfInfo {
    /// Parse the `Key: value` lines printed by `pdfinfo`
    pub fn parse(output: &str) -> Self {
        let mut info = PdfInfo::default();

        for line in output.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "Pages" => info.pages = value.parse().ok(),
                // "595.276 x 841.89 pts (A4)"
                "Page size" => {
                    let fields: Vec<&str> = value.split_whitespace().collect();
                    if let [width, "x", height, ..] = fields.as_slice() {
                        if let (Ok(w), Ok(h)) = (width.parse(), height.parse()) {
                            info.size_pt = Some((w, h));
                        }
                    }
                }
                "Page rot" => info.rotation = value.parse().unwrap_or(0),
                _ => {}
            }
        }

        info
    }

    pub fn page_size(&self) -> Option<PageSize> {
        self.size_pt
            .map(|(w, h)| PageSize::from_points(w, h).rotated(self.rotation))
    }
}

/// All collaborators, implemented by spawning external programs
#[derive(Debug)]
pub struct ExternalTools {
    commands: ToolCommands,
    log: ToolLog,
}

impl ExternalTools {
    pub fn new(log: ToolLog) -> Self {
        Self::with_commands(ToolCommands::default(), log)
    }

    pub fn with_commands(commands: ToolCommands, log: ToolLog) -> Self {
        Self { commands, log }
    }

    /// Run a program to completion, output going to the tool log
    async fn run<I, S>(&self, program: &str, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(self.log.stdio())
            .stderr(self.log.stdio())
            .status()
            .await
            .map_err(|e| tool_failure(program, e))?;

        if !status.success() {
            return Err(tool_failure(program, status));
        }
        Ok(())
    }

    async fn pdfinfo(&self, path: &Path) -> Result<PdfInfo> {
        let output = Command::new(&self.commands.pdfinfo)
            .arg(path)
            .stdin(Stdio::null())
            .stderr(self.log.stdio())
            .output()
            .await
            .map_err(|e| unreadable(path, e))?;

        if !output.status.success() {
            return Err(unreadable(path, output.status));
        }
        Ok(PdfInfo::parse(&String::from_utf8_lossy(&output.stdout)))
    }
}

fn tool_failure(program: &str, reason: impl std::fmt::Display) -> SlideshowError {
    SlideshowError::ExternalToolFailure {
        tool: program.to_string(),
        reason: reason.to_string(),
    }
}

fn unreadable(path: &Path, reason: impl std::fmt::Display) -> SlideshowError {
    SlideshowError::UnreadablePdfMetadata {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Comma-separated durations as `jfbview -j` expects them
fn join_durations(durations: &[u32]) -> String {
    durations
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

impl PdfMetadata for ExternalTools {
    async fn page_size(&self, path: &Path) -> Result<PageSize> {
        let info = self.pdfinfo(path).await?;
        size_of(path, &info)
    }

    async fn page_count(&self, path: &Path) -> Result<usize> {
        let info = self.pdfinfo(path).await?;
        pages_of(path, &info)
    }

    async fn page_metadata(&self, path: &Path) -> Result<(PageSize, usize)> {
        let info = self.pdfinfo(path).await?;
        Ok((size_of(path, &info)?, pages_of(path, &info)?))
    }
}

fn size_of(path: &Path, info: &PdfInfo) -> Result<PageSize> {
    info.page_size()
        .ok_or_else(|| unreadable(path, "no page size reported"))
}

fn pages_of(path: &Path, info: &PdfInfo) -> Result<usize> {
    info.pages
        .ok_or_else(|| unreadable(path, "no page count reported"))
}

/// `pdfjam` arguments fitting `source` onto the target paper
fn resize_args<'a>(request: &ResizeRequest<'a>) -> Vec<&'a OsStr> {
    let mut args = match request.target {
        PaperTarget::A4Portrait => vec![OsStr::new("--a4paper")],
        PaperTarget::A3Landscape => {
            vec![OsStr::new("--papersize"), OsStr::new(LANDSCAPE_PAPER_SPEC)]
        }
    };
    args.extend([
        request.source.as_os_str(),
        OsStr::new("-o"),
        request.output.as_os_str(),
    ]);
    args
}

fn two_up_args<'a>(request: &TwoUpRequest<'a>) -> [&'a OsStr; 8] {
    [
        OsStr::new("--papersize"),
        OsStr::new(TWO_UP_PAPER_SPEC),
        OsStr::new("--landscape"),
        OsStr::new("--nup"),
        OsStr::new(TWO_UP_GRID),
        request.source.as_os_str(),
        OsStr::new("-o"),
        request.output.as_os_str(),
    ]
}

/// `jfbview` arguments, document last
fn show_args(request: &ShowRequest<'_>) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();
    if request.show_progress {
        args.push("--show_progress".into());
    }
    match request.schedule {
        Schedule::Uniform(secs) => {
            args.push("-i".into());
            args.push(secs.to_string().into());
        }
        Schedule::PerPage(durations) => {
            args.push("-j".into());
            args.push(join_durations(durations).into());
        }
    }
    args.push(request.path.as_os_str().to_owned());
    args
}

impl PdfResizer for ExternalTools {
    async fn resize(&self, request: &ResizeRequest<'_>) -> Result<()> {
        self.run(&self.commands.pdfjam, resize_args(request)).await
    }
}

impl PdfConcatenator for ExternalTools {
    async fn concat(&self, request: &ConcatRequest<'_>) -> Result<bool> {
        if request.inputs.is_empty() {
            return Ok(false);
        }
        let args = request
            .inputs
            .iter()
            .map(|input| input.as_os_str())
            .chain(std::iter::once(request.output.as_os_str()));
        self.run(&self.commands.pdfunite, args).await?;
        Ok(true)
    }
}

impl TwoUpComposer for ExternalTools {
    async fn compose_two_up(&self, request: &TwoUpRequest<'_>) -> Result<()> {
        self.run(&self.commands.pdfnup, two_up_args(request)).await
    }
}

impl Viewer for ExternalTools {
    async fn show(&self, request: &ShowRequest<'_>) -> Result<()> {
        // The viewer reads keys from the terminal, so stdin stays attached
        let status = Command::new(&self.commands.viewer)
            .args(show_args(request))
            .stdout(self.log.stdio())
            .stderr(self.log.stdio())
            .status()
            .await
            .map_err(|e| tool_failure(&self.commands.viewer, e))?;

        if !status.success() {
            return Err(tool_failure(&self.commands.viewer, status));
        }
        Ok(())
    }

    async fn kill(&self) -> Result<()> {
        let status = Command::new(&self.commands.pkill)
            .arg("-x")
            .arg(&self.commands.viewer)
            .stdin(Stdio::null())
            .stdout(self.log.stdio())
            .stderr(self.log.stdio())
            .status()
            .await
            .map_err(|e| tool_failure(&self.commands.pkill, e))?;

        // pkill exits 1 when no process matched
        match status.code() {
            Some(0) | Some(1) => Ok(()),
            _ => Err(tool_failure(&self.commands.pkill, status)),
        }
    }

    async fn clear_screen(&self) -> Result<()> {
        let status = Command::new(&self.commands.clear)
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|e| tool_failure(&self.commands.clear, e))?;

        if !status.success() {
            return Err(tool_failure(&self.commands.clear, status));
        }
        Ok(())
    }
}
