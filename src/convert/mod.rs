//! Batch HTML to markdown conversion
//!
//! Walks a source folder for files with a given extension and writes a
//! markdown rendition of each at the same relative path below an output
//! folder, with the last extension replaced by `.md`.

use crate::MirrorError;
use std::fs;
use std::path::{Path, PathBuf};

/// Default extension of the files to convert
pub const DEFAULT_SOURCE_EXTENSION: &str = ".html";

/// Turns an HTML document into markdown
pub trait Converter {
    fn to_markdown(&self, html: &str) -> String;
}

/// [`Converter`] backed by `html2md`
#[derive(Debug, Default, Clone, Copy)]
pub struct Html2MdConverter;

impl Converter for Html2MdConverter {
    fn to_markdown(&self, html: &str) -> String {
        html2md::parse_html(html)
    }
}

/// Result of a batch conversion
#[derive(Debug, Default)]
pub struct ConvertSummary {
    /// `(source, written)` pairs
    pub converted: Vec<(PathBuf, PathBuf)>,

    /// `(source, reason)` pairs for files that could not be converted
    pub failures: Vec<(PathBuf, String)>,
}

/// Converts every matching file below `source_dir` into `output_dir`
///
/// Per-file read or write failures and unreadable subfolders are collected
/// in the summary.
///
/// # Returns
///
/// * `Ok(ConvertSummary)` - The walk finished
/// * `Err(MirrorError)` - The output folder could not be created or the
///   source folder itself could not be listed
pub fn convert_dir(
    source_dir: &Path,
    output_dir: &Path,
    source_ext: &str,
    converter: &dyn Converter,
) -> Result<ConvertSummary, MirrorError> {
    fs::create_dir_all(output_dir).map_err(|source| MirrorError::File {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let listing = collect_sources(source_dir, source_ext)?;
    let mut summary = ConvertSummary {
        failures: listing.failures,
        ..ConvertSummary::default()
    };
    for src in listing.files {
        let Some(dest) = markdown_path(source_dir, output_dir, &src) else {
            continue;
        };

        match convert_file(&src, &dest, converter) {
            Ok(()) => {
                tracing::info!("Converted {} to {}", src.display(), dest.display());
                summary.converted.push((src, dest));
            }
            Err(e) => {
                tracing::warn!("Failed to convert {}: {}", src.display(), e);
                summary.failures.push((src, e.to_string()));
            }
        }
    }

    Ok(summary)
}

/// Files found by [`collect_sources`]
#[derive(Debug, Default)]
pub struct SourceListing {
    /// Matching files, sorted
    pub files: Vec<PathBuf>,

    /// `(path, reason)` pairs for subfolders or entries that could not be read
    pub failures: Vec<(PathBuf, String)>,
}

/// Lists files below `dir` whose names end with `source_ext`
///
/// Symlinked folders are not descended into; symlinked files are listed.
/// Only failing to read `dir` itself is an error.
pub fn collect_sources(dir: &Path, source_ext: &str) -> Result<SourceListing, MirrorError> {
    let mut listing = SourceListing::default();
    let root = fs::read_dir(dir).map_err(|source| MirrorError::File {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut pending = vec![(dir.to_path_buf(), root)];

    while let Some((current, entries)) = pending.pop() {
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    listing.failures.push((current.clone(), e.to_string()));
                    continue;
                }
            };
            let path = entry.path();

            let is_dir = match entry.file_type() {
                Ok(file_type) if file_type.is_symlink() => false,
                Ok(file_type) => file_type.is_dir(),
                Err(e) => {
                    listing.failures.push((path, e.to_string()));
                    continue;
                }
            };

            if is_dir {
                match fs::read_dir(&path) {
                    Ok(children) => pending.push((path, children)),
                    Err(e) => {
                        tracing::warn!("Failed to read {}: {}", path.display(), e);
                        listing.failures.push((path, e.to_string()));
                    }
                }
            } else if path.is_file() && has_extension(&path, source_ext) {
                listing.files.push(path);
            }
        }
    }

    listing.files.sort();
    Ok(listing)
}

fn has_extension(path: &Path, source_ext: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(source_ext))
}

/// Maps `src` below `source_dir` to its markdown path below `output_dir`
///
/// Returns `None` if `src` is not inside `source_dir`.
pub fn markdown_path(source_dir: &Path, output_dir: &Path, src: &Path) -> Option<PathBuf> {
    let relative = src.strip_prefix(source_dir).ok()?;
    Some(output_dir.join(relative).with_extension("md"))
}

fn convert_file(src: &Path, dest: &Path, converter: &dyn Converter) -> Result<(), MirrorError> {
    let html = fs::read_to_string(src).map_err(|source| MirrorError::File {
        path: src.to_path_buf(),
        source,
    })?;

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|source| MirrorError::File {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(dest, converter.to_markdown(&html)).map_err(|source| MirrorError::File {
        path: dest.to_path_buf(),
        source,
    })
}
