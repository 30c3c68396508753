//! PDF command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::document::PdfDocument;
use anyhow::{Context, Result};

/// Print the text of a PDF file.
pub async fn run_pdf(path: &str) -> Result<()> {
    let path = Settings::expand_path(path);
    let display = path.display().to_string();

    let (pages, text) = tokio::task::spawn_blocking(move || -> crate::Result<(usize, String)> {
        let document = PdfDocument::open(&path)?;
        Ok((document.page_count(), document.text()?))
    })
    .await?
    .with_context(|| format!("Failed to read {}", display))?;

    Output::info(&format!("{} ({} page(s))", display, pages));
    println!("{}", text);
    Ok(())
}
