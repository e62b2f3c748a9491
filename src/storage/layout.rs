//! On-disk naming for mirrored pages and resources

use std::io;
use std::path::{Path, PathBuf};
use url::Url;

use crate::storage::Classification;

/// Filename used for the root page
pub const INDEX_FILENAME: &str = "index.html";

/// Splits a filename into stem and extension
///
/// The extension keeps its leading dot. A leading dot alone does not start an
/// extension, so `.htaccess` has none.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 && !name[..idx].chars().all(|c| c == '.') => name.split_at(idx),
        _ => (name, ""),
    }
}

/// Derives the stored filename of a resource
///
/// The last path segment is used; if it is empty, the whole path with `/`
/// replaced by `_` is used instead. The classified extension is appended when
/// the name has no extension of its own.
///
/// # Examples
///
/// ```
/// use site_mirror::storage::{classify, resource_filename};
/// use url::Url;
///
/// let url = Url::parse("https://example.com/img/logo").unwrap();
/// let name = resource_filename(&url, &classify(Some("image/png"), &url));
/// assert_eq!(name, "logo.png");
/// ```
pub fn resource_filename(url: &Url, classification: &Classification) -> String {
    let path = url.path();
    let basename = path.rsplit('/').next().unwrap_or_default();

    let mut filename = if basename.is_empty() {
        path.replace('/', "_")
    } else {
        basename.to_string()
    };

    let (_, existing) = split_extension(&filename);
    if existing.is_empty() {
        filename.push_str(&classification.extension);
    }

    filename
}

/// Derives the stored filename of a page
///
/// The root path maps to `index.html`; any other path has its leading and
/// trailing slashes stripped, its inner slashes replaced by `_`, and `.html`
/// appended.
pub fn page_filename(url: &Url) -> String {
    let slug = url.path().trim_matches('/');
    if slug.is_empty() {
        INDEX_FILENAME.to_string()
    } else {
        format!("{}.html", slug.replace('/', "_"))
    }
}

/// Returns the `n`-th collision candidate for `filename`
///
/// `0` is the filename itself, `n > 0` inserts `_n` before the extension.
pub fn collision_candidate(filename: &str, n: u32) -> String {
    if n == 0 {
        return filename.to_string();
    }
    let (stem, ext) = split_extension(filename);
    format!("{}_{}{}", stem, n, ext)
}

/// Creates the first free `filename`, `stem_1.ext`, `stem_2.ext`, … in `dir`
///
/// Files are opened with create-new semantics, so an existing file is never
/// truncated even if another process races for the same name. Callers within
/// this process additionally serialize on the folder lock.
pub async fn reserve_unique_path(
    dir: &Path,
    filename: &str,
) -> io::Result<(PathBuf, tokio::fs::File)> {
    let mut n = 0;
    loop {
        let candidate = dir.join(collision_candidate(filename, n));
        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
            .await
        {
            Ok(file) => return Ok((candidate, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => n += 1,
            Err(e) => return Err(e),
        }
    }
}
