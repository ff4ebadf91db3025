use anyhow::{Context, Result};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;
use walkdir::WalkDir;

use crate::document::OutputMode;
use crate::errors::DocumentError;

// @module: File and directory utilities

/// Extensions accepted as translation sources
pub const ALLOWED_FILE_TYPES: &[&str] = &["txt", "md", "rtf", "html"];

/// Outcome of the pre-flight check on a source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileCheck {
    /// Source should be translated
    Process,
    /// Source is skipped, with the reason
    Skip(String),
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @checks: Input names a remote document
    pub fn is_url(input: &str) -> bool {
        input.starts_with("http")
    }

    // @checks: Extension is one of ALLOWED_FILE_TYPES
    pub fn is_allowed_file_type<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| ALLOWED_FILE_TYPES.contains(&ext.as_str()))
    }

    /// Find translatable files under `dir`, recursively and in sorted order.
    ///
    /// With `extension` set only that extension is returned; either way only
    /// allowed types are kept.
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: Option<&str>) -> Result<Vec<PathBuf>> {
        let wanted = extension.map(|ext| ext.trim_start_matches('.').to_lowercase());
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();
            if !path.is_file() || !Self::is_allowed_file_type(path) {
                continue;
            }
            if let Some(wanted) = &wanted {
                let ext = path
                    .extension()
                    .map(|ext| ext.to_string_lossy().to_lowercase())
                    .unwrap_or_default();
                if &ext != wanted {
                    continue;
                }
            }
            result.push(path.to_path_buf());
        }

        Ok(result)
    }

    /// Decide whether a source should be translated.
    ///
    /// An extension that is not allowed is an error; sources that are
    /// outputs themselves, or already have an output for `mode`, are skipped.
    pub fn check_file_path(input: &str, mode: OutputMode) -> Result<FileCheck, DocumentError> {
        if Self::is_url(input) {
            let output = Self::output_path(input, mode);
            if output.exists() {
                let reason = format!("You already have a {} file for {}", mode.suffix(), input);
                warn!("{}, skipping...", reason);
                return Ok(FileCheck::Skip(reason));
            }
            return Ok(FileCheck::Process);
        }

        let path = Path::new(input);
        if !Self::is_allowed_file_type(path) {
            return Err(DocumentError::UnsupportedFileType {
                path: path.to_path_buf(),
            });
        }

        let stem = file_stem(path);
        for existing in [OutputMode::Translated, OutputMode::Bilingual] {
            if stem.ends_with(&format!("_{}", existing.suffix())) {
                let reason = format!("{:?} is already a {} file", path, existing.suffix());
                warn!("{}, skipping...", reason);
                return Ok(FileCheck::Skip(reason));
            }
        }

        let siblings = [
            path.with_file_name(format!("{}_{}.txt", stem, mode.suffix())),
            path.with_file_name(format!("{}_extracted_{}.txt", stem, mode.suffix())),
        ];
        if siblings.iter().any(|sibling| sibling.exists()) {
            let reason = format!("You already have a {} file for {:?}", mode.suffix(), path);
            warn!("{}, skipping...", reason);
            return Ok(FileCheck::Skip(reason));
        }

        Ok(FileCheck::Process)
    }

    /// Where the output for `input` is written.
    ///
    /// Files get `<parent>/<stem>_<suffix>.txt`; URLs get `./<slug>_<suffix>.txt`.
    pub fn output_path(input: &str, mode: OutputMode) -> PathBuf {
        if Self::is_url(input) {
            return PathBuf::from(format!("./{}_{}.txt", url_slug(input), mode.suffix()));
        }
        let path = Path::new(input);
        path.with_file_name(format!("{}_{}.txt", file_stem(path), mode.suffix()))
    }

    /// Where text extracted from an HTML source is saved
    pub fn extracted_path<P: AsRef<Path>>(source: P) -> PathBuf {
        let source = source.as_ref();
        source.with_file_name(format!("{}_extracted.txt", file_stem(source)))
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        info!("Saved {:?}", path.as_ref());
        Ok(())
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Last non-empty path segment without its extension, or the host
fn url_slug(input: &str) -> String {
    let Ok(url) = Url::parse(input) else {
        return sanitize(input);
    };
    let segment = url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(|segment| {
            Path::new(segment)
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_string())
                .unwrap_or_else(|| segment.to_string())
        });
    match segment {
        Some(segment) if !segment.is_empty() => sanitize(&segment),
        _ => sanitize(url.host_str().unwrap_or("download")),
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' { c } else { '_' })
        .collect()
}
