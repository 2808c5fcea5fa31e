//! Target key derivation for uploads / 上传目标键派生
//!
//! Keys look like `2026/08/My_Photo-1724567890123.jpg`: a calendar
//! year/month directory, the sanitized stem of the author's filename, the
//! upload timestamp in milliseconds, and the original extension.
//! Uniqueness rests on the millisecond timestamp, not on content hashing;
//! two same-stem uploads inside one millisecond overwrite each other.
//! That race is accepted, same as every deployment of this store so far.

use std::path::Path;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]").unwrap());

/// Calendar directory for an upload happening at `now`, `YYYY/MM/`.
pub fn target_dir(now: DateTime<Utc>) -> String {
    now.format("%Y/%m/").to_string()
}

/// Replace every character outside `[A-Za-z0-9_]` with `_`.
pub fn sanitize_stem(stem: &str) -> String {
    NON_WORD.replace_all(stem, "_").into_owned()
}

/// Split a declared filename into (stem, extension-with-dot).
///
/// Directory components are ignored, only the final path segment counts.
/// A file with no extension gets an empty extension, and dotfiles like
/// `.gitignore` are treated as extensionless.
pub fn split_name(name: &str) -> (&str, String) {
    let path = Path::new(name);
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();
    (stem, ext)
}

/// Full object key for an upload of `name` happening at `now`.
pub fn target_key(name: &str, now: DateTime<Utc>) -> String {
    let (stem, ext) = split_name(name);
    format!(
        "{}{}-{}{}",
        target_dir(now),
        sanitize_stem(stem),
        now.timestamp_millis(),
        ext
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, 25, 12, 30, 45).unwrap()
    }

    #[test]
    fn test_target_dir() {
        assert_eq!(target_dir(at(2026, 8)), "2026/08/");
        assert_eq!(target_dir(at(2025, 1)), "2025/01/");
    }

    #[test]
    fn test_target_key_pattern() {
        let now = at(2026, 8);
        let millis = now.timestamp_millis();
        assert_eq!(
            target_key("My Photo!.jpg", now),
            format!("2026/08/My_Photo_-{}.jpg", millis)
        );
        assert_eq!(
            target_key("header.png", now),
            format!("2026/08/header-{}.png", millis)
        );
        // No extension / 无扩展名
        assert_eq!(target_key("README", now), format!("2026/08/README-{}", millis));
    }

    #[test]
    fn test_sanitize_total() {
        // Every output character is in [A-Za-z0-9_], whatever goes in
        for input in ["café photo", "a/b\\c", "100%!", "_ok_", "中文图片", ""] {
            let out = sanitize_stem(input);
            assert!(
                out.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'),
                "sanitize_stem({:?}) produced {:?}",
                input,
                out
            );
        }
    }

    #[test]
    fn test_sanitize_idempotent() {
        for input in ["my photo", "a.b.c", "weird~name", "plain_name_9"] {
            let once = sanitize_stem(input);
            assert_eq!(sanitize_stem(&once), once);
        }
    }

    #[test]
    fn test_extension_kept_verbatim() {
        let now = at(2026, 8);
        assert!(target_key("shot.JPEG", now).ends_with(".JPEG"));
        // Only the last extension counts, like the stem keeps the rest
        let key = target_key("archive.tar.gz", now);
        assert!(key.ends_with(".gz"));
        assert!(key.contains("archive_tar-"));
    }

    #[test]
    fn test_same_millisecond_same_stem_collides() {
        // Documented race: sanitization maps both names to one stem and
        // the timestamp is shared, so the keys are identical.
        let now = at(2026, 8);
        assert_eq!(target_key("a b.png", now), target_key("a?b.png", now));
    }
}
