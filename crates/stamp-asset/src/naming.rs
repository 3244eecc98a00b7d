//! Logical and physical path construction

use stamp_core::{Fingerprint, Result, StampError};
use std::path::{Component, Path};

/// Insert a fingerprint before the last extension of a file name.
///
/// `a.b.frag` becomes `a.b.<fp>.frag`. Names without an extension, and
/// dotfiles whose only dot is the first character, get the fingerprint
/// appended instead.
pub fn fingerprinted_name(file_name: &str, fingerprint: &Fingerprint) -> String {
    let short = fingerprint.short();
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}.{}.{}", stem, short, ext),
        _ => format!("{}.{}", file_name, short),
    }
}

/// Split a fingerprinted name back into (original name, short fingerprint).
///
/// Returns `None` when the name does not carry an 8-hex-digit fingerprint in
/// the position [`fingerprinted_name`] puts it.
pub fn split_fingerprinted_name(name: &str) -> Option<(String, &str)> {
    let (head, last) = name.rsplit_once('.')?;

    // `name.<fp>` form
    if Fingerprint::is_short_form(last) && !head.is_empty() {
        if let Some((stem, fp)) = head.rsplit_once('.') {
            if Fingerprint::is_short_form(fp) && !stem.is_empty() {
                return Some((format!("{}.{}", stem, last), fp));
            }
        }
        return Some((head.to_string(), last));
    }

    // `stem.<fp>.ext` form
    let (stem, fp) = head.rsplit_once('.')?;
    if Fingerprint::is_short_form(fp) && !stem.is_empty() {
        return Some((format!("{}.{}", stem, last), fp));
    }
    None
}

/// Render a relative path with `/` separators, whatever the host uses.
///
/// Fails with [`StampError::Encoding`] when a component is not UTF-8.
pub fn logical_path(relative: &Path) -> Result<String> {
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                let part = part
                    .to_str()
                    .ok_or_else(|| StampError::Encoding(relative.to_path_buf()))?;
                parts.push(part);
            }
            Component::CurDir => {}
            _ => return Err(StampError::Encoding(relative.to_path_buf())),
        }
    }
    Ok(parts.join("/"))
}

/// Normalize a user-supplied manifest key: `\` becomes `/`, leading `./`
/// and empty segments are dropped.
pub fn normalize_key(key: &str) -> String {
    key.replace('\\', "/")
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fp_x() -> Fingerprint {
        Fingerprint::from_bytes(b"X")
    }

    #[test]
    fn test_simple_name() {
        assert_eq!(fingerprinted_name("tonemap.frag", &fp_x()), "tonemap.4b68ab38.frag");
    }

    #[test]
    fn test_multi_dot_name_splits_on_last_dot() {
        assert_eq!(fingerprinted_name("bloom.v2.frag", &fp_x()), "bloom.v2.4b68ab38.frag");
    }

    #[test]
    fn test_no_extension_appends() {
        assert_eq!(fingerprinted_name("Makefile", &fp_x()), "Makefile.4b68ab38");
        assert_eq!(fingerprinted_name(".glsl", &fp_x()), ".glsl.4b68ab38");
    }

    #[test]
    fn test_split_round_trips() {
        for name in ["tonemap.frag", "bloom.v2.frag", "Makefile", ".glsl"] {
            let hashed = fingerprinted_name(name, &fp_x());
            let (original, fp) = split_fingerprinted_name(&hashed).unwrap();
            assert_eq!(original, name, "for {}", hashed);
            assert_eq!(fp, "4b68ab38");
        }
    }

    #[test]
    fn test_split_rejects_plain_names() {
        assert!(split_fingerprinted_name("tonemap.frag").is_none());
        assert!(split_fingerprinted_name("README").is_none());
        assert!(split_fingerprinted_name("a.ZZZZZZZZ.frag").is_none());
    }

    #[test]
    fn test_logical_path_uses_forward_slashes() {
        let rel: PathBuf = ["shaders", "fx", "bloom.v2.frag"].iter().collect();
        assert_eq!(logical_path(&rel).unwrap(), "shaders/fx/bloom.v2.frag");
    }

    #[test]
    fn test_logical_path_rejects_parent_components() {
        assert!(matches!(
            logical_path(Path::new("../escape.frag")),
            Err(StampError::Encoding(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_logical_path_rejects_non_utf8() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let rel = Path::new(OsStr::from_bytes(b"bad\xff.frag"));
        assert!(matches!(logical_path(rel), Err(StampError::Encoding(_))));
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("./post/tonemap.frag"), "post/tonemap.frag");
        assert_eq!(normalize_key("post\\tonemap.frag"), "post/tonemap.frag");
        assert_eq!(normalize_key("post//tonemap.frag"), "post/tonemap.frag");
    }
}
