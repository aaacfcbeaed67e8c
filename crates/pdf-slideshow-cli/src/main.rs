mod logger;

use anyhow::Result;
use clap::Parser;
use pdf_slideshow::constants::{DEFAULT_CONFIG_FILE, DEFAULT_TOOL_LOG};
use pdf_slideshow::{ExternalTools, Pipeline, SlideshowOptions, ToolLog};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "show-pdf",
    about = "Assemble scheduled PDFs into a slideshow and show it",
    version
)]
struct Cli {
    /// PDF base directory
    #[arg(long)]
    basedir: Option<PathBuf>,

    /// Config file, relative to the base directory
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logger::ConsoleLogger::from_env().init()?;

    // An absent base directory is reported by the pipeline, which then
    // shows the fallback document
    let base_dir = cli.basedir.unwrap_or_default();
    let options = SlideshowOptions::new(base_dir, cli.config);

    let tool_log = match ToolLog::create(DEFAULT_TOOL_LOG) {
        Ok(tool_log) => tool_log,
        Err(e) => {
            log::warn!("Cannot open {}: {}", DEFAULT_TOOL_LOG, e);
            ToolLog::discard()
        }
    };

    let tools = ExternalTools::new(tool_log);

    let mut pipeline = Pipeline::new(options, tools);
    let now = chrono::Local::now().naive_local();
    let presentation = pipeline.run(now).await?;

    if presentation.is_fallback() {
        log::info!("Fallback {} closed", presentation.document.display());
    } else {
        log::info!("Slideshow {} closed", presentation.document.display());
    }

    Ok(())
}
