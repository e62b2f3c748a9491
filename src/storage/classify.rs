//! File classification
//!
//! Maps a downloaded resource to a storage subfolder and a file extension.
//! The declared content type wins over the URL suffix; only a fixed list of
//! extensions get their own subfolder, everything else lands in `other`.

use url::Url;

/// Extensions that get a subfolder of the same name
pub const KNOWN_SUBFOLDERS: &[&str] = &[
    "html", "css", "js", "png", "jpg", "jpeg", "gif", "svg", "mp4", "mp3", "webm", "ogg", "pdf",
];

/// Subfolder for everything outside [`KNOWN_SUBFOLDERS`]
pub const OTHER_SUBFOLDER: &str = "other";

/// MIME type to extension table, first match wins
const MIME_EXTENSIONS: &[(&str, &str)] = &[
    ("text/html", ".html"),
    ("application/xhtml+xml", ".xhtml"),
    ("text/css", ".css"),
    ("text/javascript", ".js"),
    ("application/javascript", ".js"),
    ("application/x-javascript", ".js"),
    ("image/png", ".png"),
    ("image/jpeg", ".jpg"),
    ("image/pjpeg", ".jpg"),
    ("image/gif", ".gif"),
    ("image/svg+xml", ".svg"),
    ("image/webp", ".webp"),
    ("image/avif", ".avif"),
    ("image/bmp", ".bmp"),
    ("image/x-icon", ".ico"),
    ("image/vnd.microsoft.icon", ".ico"),
    ("video/mp4", ".mp4"),
    ("video/webm", ".webm"),
    ("video/ogg", ".ogg"),
    ("audio/mpeg", ".mp3"),
    ("audio/ogg", ".ogg"),
    ("audio/webm", ".webm"),
    ("audio/wav", ".wav"),
    ("application/pdf", ".pdf"),
    ("application/json", ".json"),
    ("application/xml", ".xml"),
    ("text/xml", ".xml"),
    ("text/plain", ".txt"),
    ("text/csv", ".csv"),
    ("font/woff", ".woff"),
    ("font/woff2", ".woff2"),
    ("font/ttf", ".ttf"),
    ("font/otf", ".otf"),
    ("application/font-woff", ".woff"),
    ("application/wasm", ".wasm"),
    ("application/zip", ".zip"),
];

/// Where a resource is stored and which extension it carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Subfolder name below the base folder
    pub subfolder: String,

    /// Extension including its leading dot, or empty if none could be derived
    pub extension: String,
}

/// Classifies a resource from its response content type and source URL
///
/// # Arguments
///
/// * `content_type` - The `Content-Type` header value, if any
/// * `url` - The URL the resource was fetched from
///
/// # Examples
///
/// ```
/// use site_mirror::storage::classify;
/// use url::Url;
///
/// let url = Url::parse("https://example.com/logo").unwrap();
/// let classification = classify(Some("image/png"), &url);
/// assert_eq!(classification.subfolder, "png");
/// assert_eq!(classification.extension, ".png");
/// ```
pub fn classify(content_type: Option<&str>, url: &Url) -> Classification {
    let extension = content_type
        .and_then(extension_for_mime)
        .map(str::to_string)
        .or_else(|| url_extension(url))
        .unwrap_or_default();

    let kind = extension.trim_start_matches('.').to_lowercase();
    let subfolder = if KNOWN_SUBFOLDERS.contains(&kind.as_str()) {
        kind
    } else {
        OTHER_SUBFOLDER.to_string()
    };

    Classification {
        subfolder,
        extension,
    }
}

/// Looks up the extension for a `Content-Type` value
///
/// Parameters such as `; charset=utf-8` are ignored and the comparison is
/// case-insensitive.
pub fn extension_for_mime(content_type: &str) -> Option<&'static str> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    MIME_EXTENSIONS
        .iter()
        .find(|(mime, _)| *mime == essence)
        .map(|(_, ext)| *ext)
}

/// Returns the extension of the last URL path segment, including the dot
pub fn url_extension(url: &Url) -> Option<String> {
    let name = url.path().rsplit('/').next().unwrap_or_default();
    let (_, ext) = crate::storage::split_extension(name);
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_png_content_type_without_url_extension() {
        let c = classify(Some("image/png"), &url("https://example.com/logo"));
        assert_eq!(c.subfolder, "png");
        assert_eq!(c.extension, ".png");
    }

    #[test]
    fn test_unknown_content_type_without_url_extension() {
        let c = classify(
            Some("application/x-unknown"),
            &url("https://example.com/blob"),
        );
        assert_eq!(c.subfolder, "other");
        assert_eq!(c.extension, "");
    }

    #[test]
    fn test_missing_content_type_falls_back_to_url() {
        let c = classify(None, &url("https://example.com/static/site.CSS"));
        assert_eq!(c.subfolder, "css");
        assert_eq!(c.extension, ".CSS");
    }

    #[test]
    fn test_content_type_wins_over_url() {
        let c = classify(Some("image/jpeg"), &url("https://example.com/photo.png"));
        assert_eq!(c.subfolder, "jpg");
        assert_eq!(c.extension, ".jpg");
    }

    #[test]
    fn test_content_type_parameters_ignored() {
        let c = classify(
            Some("Text/CSS; charset=UTF-8"),
            &url("https://example.com/style"),
        );
        assert_eq!(c.subfolder, "css");
    }

    #[test]
    fn test_recognized_but_unlisted_extension_goes_to_other() {
        let c = classify(Some("font/woff2"), &url("https://example.com/font"));
        assert_eq!(c.subfolder, "other");
        assert_eq!(c.extension, ".woff2");
    }

    #[test]
    fn test_unknown_content_type_uses_url_extension() {
        let c = classify(
            Some("application/octet-stream"),
            &url("https://example.com/movie.mp4?t=10"),
        );
        assert_eq!(c.subfolder, "mp4");
        assert_eq!(c.extension, ".mp4");
    }

    #[test]
    fn test_directory_dots_do_not_count_as_extension() {
        assert_eq!(url_extension(&url("https://example.com/v1.2/script")), None);
    }

    #[test]
    fn test_extension_for_mime() {
        assert_eq!(extension_for_mime("text/javascript"), Some(".js"));
        assert_eq!(extension_for_mime("audio/mpeg"), Some(".mp3"));
        assert_eq!(extension_for_mime(""), None);
    }
}
