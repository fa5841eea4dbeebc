use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Component, Path, PathBuf};

static UNSAFE_FILENAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\x00-\x1f<>:"|?*]"#).unwrap());

pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Reduce a client-supplied filename to a safe final path component.
///
/// Returns `None` when nothing usable is left ("", ".", "..").
pub fn sanitize_filename(raw: &str) -> Option<String> {
    let last = raw.rsplit(['/', '\\']).next().unwrap_or("").trim();
    let cleaned = UNSAFE_FILENAME_CHARS.replace_all(last, "_").to_string();
    match cleaned.as_str() {
        "" | "." | ".." => None,
        _ => Some(cleaned),
    }
}

/// Join `relative` under `root`, refusing absolute paths and `..` segments.
pub fn resolve_within(root: &Path, relative: &str) -> Option<PathBuf> {
    let relative = Path::new(relative);
    let mut resolved = root.to_path_buf();
    let mut pushed = false;
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                resolved.push(part);
                pushed = true;
            }
            Component::CurDir => {}
            _ => return None,
        }
    }
    pushed.then_some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_plain_names() {
        assert_eq!(sanitize_filename("reviews.csv").as_deref(), Some("reviews.csv"));
    }

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(
            sanitize_filename("../../etc/passwd").as_deref(),
            Some("passwd")
        );
        assert_eq!(
            sanitize_filename(r"C:\Users\me\data.csv").as_deref(),
            Some("data.csv")
        );
    }

    #[test]
    fn test_sanitize_rejects_empty_and_dots() {
        assert_eq!(sanitize_filename(""), None);
        assert_eq!(sanitize_filename("   "), None);
        assert_eq!(sanitize_filename(".."), None);
        assert_eq!(sanitize_filename("dir/"), None);
    }

    #[test]
    fn test_sanitize_replaces_reserved_chars() {
        assert_eq!(sanitize_filename("a?b*.csv").as_deref(), Some("a_b_.csv"));
    }

    #[test]
    fn test_resolve_within_rejects_traversal() {
        let root = Path::new("static");
        assert_eq!(
            resolve_within(root, "plots/abc.png"),
            Some(PathBuf::from("static/plots/abc.png"))
        );
        assert_eq!(resolve_within(root, "../secret"), None);
        assert_eq!(resolve_within(root, "/etc/passwd"), None);
        assert_eq!(resolve_within(root, ""), None);
    }
}
