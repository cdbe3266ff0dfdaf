//! Lexical path normalization.
//!
//! Nothing here touches the filesystem: include roots named in a compilation
//! database need not exist when the database is converted.

use std::path::{Component, Path, PathBuf};

/// Resolve `path` against `base` and collapse `.` and `..` components.
///
/// Absolute paths ignore `base`. A `..` at the root stays at the root.
pub fn normalize(path: impl AsRef<Path>, base: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        collapse(path)
    } else {
        collapse(&base.as_ref().join(path))
    }
}

fn collapse(path: &Path) -> PathBuf {
    let mut components = path.components().peekable();
    let mut ret = if let Some(c @ Component::Prefix(..)) = components.peek() {
        let buf = PathBuf::from(c.as_os_str());
        components.next();
        buf
    } else {
        PathBuf::new()
    };

    for component in components {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last = ret.components().next_back();
                let pops = matches!(last, Some(Component::Normal(_)));
                let at_root = matches!(last, Some(Component::RootDir | Component::Prefix(_)));
                if pops {
                    ret.pop();
                } else if !at_root {
                    // Relative paths keep leading `..` they cannot resolve.
                    ret.push("..");
                }
            }
            Component::Normal(c) => ret.push(c),
            Component::RootDir => ret.push(component.as_os_str()),
            Component::Prefix(_) => unreachable!("prefix only appears first"),
        }
    }

    if ret.as_os_str().is_empty() {
        ret.push(".");
    }
    ret
}

/// Express `path` relative to `dir`, lexically.
///
/// Both are collapsed first. Returns `.` when they name the same directory.
/// If the two share no root (e.g. one relative, one absolute) `path` is
/// returned collapsed but otherwise unchanged.
pub fn relative_to(path: impl AsRef<Path>, dir: impl AsRef<Path>) -> PathBuf {
    let path = collapse(path.as_ref());
    let dir = collapse(dir.as_ref());

    if path.has_root() != dir.has_root() {
        return path;
    }

    let path_parts: Vec<Component<'_>> = path.components().collect();
    let dir_parts: Vec<Component<'_>> = dir
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    let common = path_parts
        .iter()
        .zip(dir_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    // Different drive prefixes.
    if common == 0 && path.has_root() {
        return path;
    }

    let mut rel = PathBuf::new();
    for _ in common..dir_parts.len() {
        rel.push("..");
    }
    for part in &path_parts[common..] {
        if !matches!(part, Component::CurDir) {
            rel.push(part.as_os_str());
        }
    }

    if rel.as_os_str().is_empty() {
        rel.push(".");
    }
    rel
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_is_noop() {
        assert_eq!(normalize("/usr/include", "/proj"), PathBuf::from("/usr/include"));
    }

    #[test]
    fn test_parent_relative_to_base() {
        assert_eq!(normalize("../x", "/a/b"), PathBuf::from("/a/x"));
    }

    #[test]
    fn test_collapse_dots() {
        assert_eq!(
            normalize("./inc/../src/./gen", "/proj/build"),
            PathBuf::from("/proj/build/src/gen")
        );
        assert_eq!(normalize("/a/./b/../../c", "/ignored"), PathBuf::from("/c"));
    }

    #[test]
    fn test_parent_at_root() {
        assert_eq!(normalize("../../../x", "/a"), PathBuf::from("/x"));
    }

    #[test]
    fn test_relative_base_keeps_leading_parent() {
        assert_eq!(normalize("../inc", "build"), PathBuf::from("inc"));
        assert_eq!(normalize("../../inc", "build"), PathBuf::from("../inc"));
    }

    #[test]
    fn test_empty_path_is_base() {
        assert_eq!(normalize("", "/proj"), PathBuf::from("/proj"));
    }

    #[test]
    fn test_relative_to() {
        assert_eq!(relative_to("/proj/inc", "/proj"), PathBuf::from("inc"));
        assert_eq!(relative_to("/proj/inc", "/proj/build"), PathBuf::from("../inc"));
        assert_eq!(relative_to("/usr/include", "/proj/build"), PathBuf::from("../../usr/include"));
        assert_eq!(relative_to("/proj", "/proj"), PathBuf::from("."));
        assert_eq!(relative_to("/proj", "/proj/a/b"), PathBuf::from("../.."));
    }

    #[test]
    fn test_relative_to_mixed_roots() {
        assert_eq!(relative_to("/proj/inc", "build"), PathBuf::from("/proj/inc"));
    }
}
