//! Colon-separated HFS path helpers
//!
//! Absolute HFS paths start with the volume name and use `:` as the
//! separator. A path that is just a volume carries a single trailing colon
//! (`Macintosh HD:`); folder paths may carry one too.

/// Path separator
pub const SEPARATOR: char = ':';

/// Canonical form of an absolute path
///
/// Volume paths keep their trailing colon; any other path drops it.
pub fn normalize_path(path: &str) -> &str {
    match path.strip_suffix(SEPARATOR) {
        Some(stripped) if stripped.contains(SEPARATOR) => stripped,
        _ => path,
    }
}

/// Whether `path` names a volume rather than an item on one
pub fn is_volume_path(path: &str) -> bool {
    let path = normalize_path(path);
    path.ends_with(SEPARATOR) && path.find(SEPARATOR) == Some(path.len() - 1)
}

/// Path of the folder containing `path`, or `None` for a volume
pub fn parent_path(path: &str) -> Option<String> {
    let path = normalize_path(path);
    if path.ends_with(SEPARATOR) {
        return None;
    }
    let (parent, _) = path.rsplit_once(SEPARATOR)?;
    if parent.contains(SEPARATOR) {
        Some(parent.to_string())
    } else {
        Some(format!("{parent}{SEPARATOR}"))
    }
}

/// Last component of `path`; the volume name for a volume path
pub fn item_name(path: &str) -> &str {
    let path = path.strip_suffix(SEPARATOR).unwrap_or(path);
    path.rsplit_once(SEPARATOR).map_or(path, |(_, name)| name)
}

/// Every path from the volume down to `path` itself, outermost first
pub fn ancestor_paths(path: &str) -> Vec<String> {
    let mut chain = vec![normalize_path(path).to_string()];
    while let Some(parent) = chain.last().and_then(|last| parent_path(last)) {
        chain.push(parent);
    }
    chain.reverse();
    chain
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_path("Boot:"), "Boot:");
        assert_eq!(normalize_path("Boot:System Folder:"), "Boot:System Folder");
        assert_eq!(normalize_path("Boot:System Folder"), "Boot:System Folder");
    }

    #[test]
    fn test_parent() {
        assert_eq!(parent_path("Boot:"), None);
        assert_eq!(parent_path("Boot:App"), Some("Boot:".to_string()));
        assert_eq!(parent_path("Boot:Apps:App"), Some("Boot:Apps".to_string()));
        assert_eq!(parent_path("Boot:Apps:"), Some("Boot:".to_string()));
    }

    #[test]
    fn test_item_name() {
        assert_eq!(item_name("Boot:"), "Boot");
        assert_eq!(item_name("Boot:Apps:"), "Apps");
        assert_eq!(item_name("Boot:Apps:App"), "App");
    }

    #[test]
    fn test_volume_detection() {
        assert!(is_volume_path("Boot:"));
        assert!(!is_volume_path("Boot:Apps:"));
        assert!(!is_volume_path("Boot:Apps"));
    }

    #[test]
    fn test_ancestors() {
        assert_eq!(
            ancestor_paths("Boot:Apps:Games:Chess"),
            vec!["Boot:", "Boot:Apps", "Boot:Apps:Games", "Boot:Apps:Games:Chess"]
        );
        assert_eq!(ancestor_paths("Boot:"), vec!["Boot:"]);
    }
}
