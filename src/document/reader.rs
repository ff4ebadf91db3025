/*!
 * Loading a source (local file or URL) into a `Document`.
 */

use anyhow::{Context, Result};
use log::info;
use std::path::Path;

use crate::errors::DocumentError;
use crate::file_utils::FileManager;

use super::Document;
use super::html;

/// Repair a URL whose scheme lost a slash, e.g. `https:/example.com`
pub fn normalize_url(url: &str) -> String {
    if url.contains("://") {
        url.to_string()
    } else {
        url.replacen(":/", "://", 1)
    }
}

/// Read `input` and split it into paragraphs.
///
/// URLs are downloaded and reduced to readable text. HTML files are reduced
/// the same way and the extracted text is saved next to the source. Other
/// files are read as UTF-8.
pub async fn read_source(input: &str, http: &reqwest::Client) -> Result<Document> {
    if FileManager::is_url(input) {
        let url = normalize_url(input);
        info!("Downloading and extracting text from {}", url);
        let page = download(http, &url).await?;
        let text = html::extract_text(&page)?;
        return Ok(Document::from_text(url, &text));
    }

    let path = Path::new(input);
    let raw = FileManager::read_to_string(path)?;
    let is_html = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html"));

    let text = if is_html {
        info!("Extracting text from HTML file {:?}", path);
        let text = html::extract_text(&raw)?;
        let extracted = FileManager::extracted_path(path);
        FileManager::write_to_file(&extracted, &text)
            .with_context(|| format!("Failed to save extracted text for {:?}", path))?;
        info!("Extracted text saved to {:?}", extracted);
        text
    } else {
        raw
    };

    Ok(Document::from_text(input, &text))
}

async fn download(http: &reqwest::Client, url: &str) -> Result<String, DocumentError> {
    let failed = |e: reqwest::Error| DocumentError::Download {
        url: url.to_string(),
        message: e.to_string(),
    };
    http.get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(failed)?
        .text()
        .await
        .map_err(failed)
}
