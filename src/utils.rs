//! Utility functions for string truncation, URL handling and file system checks.
//!
//! All truncation here counts `char`s rather than bytes; article text is
//! mostly CJK and byte slicing would split code points.

use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tracing::{info, instrument};
use url::Url;

/// First `n` characters of `s`.
pub fn take_chars(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with `"…(+N chars)"` appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 chars)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let total = s.chars().count();
    if total <= max {
        s.to_string()
    } else {
        format!("{}…(+{} chars)", take_chars(s, max), total - max)
    }
}

/// Make `url` usable as a base for [`Url::join`].
///
/// Without a trailing slash the last path segment would be replaced.
pub fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Ensure the directory that will hold `file` exists and is writable.
///
/// Creates the directory if needed, then writes and removes a probe file so
/// a long walk does not discover a permission problem only at its first hit.
#[instrument(level = "info", skip_all, fields(file = %file.display()))]
pub fn ensure_parent_writable(file: &Path) -> Result<(), Box<dyn Error>> {
    let dir = match file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    stdfs::create_dir_all(dir)?;

    let probe_path = dir.join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!(dir = %dir.display(), "Output directory is writable");
    Ok(())
}
