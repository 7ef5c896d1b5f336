//! Containment checks for archive entry paths and link targets
//!
//! Checks are lexical, but they account for symlinks that earlier entries in
//! the same archive will create: no later entry may be placed under such a
//! link, and no link target may be resolved through one.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

/// Normalize an entry path to a destination-relative path
///
/// Returns `None` for absolute paths and for any `..` component; such
/// entries are rejected outright rather than clamped.
pub fn contained_entry_path(path: &Path) -> Option<PathBuf> {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(normalized)
}

/// Symlinks declared so far in one archive
#[derive(Debug, Default)]
pub struct LinkGuard {
    symlinks: HashSet<PathBuf>,
}

impl LinkGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a validated symlink entry
    pub fn record_symlink(&mut self, relative: &Path) {
        self.symlinks.insert(relative.to_path_buf());
    }

    /// True when `relative` is, or sits below, an earlier symlink entry
    pub fn passes_through_symlink(&self, relative: &Path) -> bool {
        relative
            .ancestors()
            .filter(|ancestor| !ancestor.as_os_str().is_empty())
            .any(|ancestor| self.symlinks.contains(ancestor))
    }

    /// Check that a link target resolves inside the destination
    ///
    /// Symlink targets are relative to the directory holding the link; hard
    /// link targets are relative to the archive root. Resolution fails as
    /// soon as it would step into or out of an earlier symlink, since the
    /// on-disk meaning of that step differs from its text.
    pub fn target_is_contained(&self, entry: &Path, target: &Path, hard_link: bool) -> bool {
        let mut resolved = if hard_link {
            PathBuf::new()
        } else {
            entry.parent().map(Path::to_path_buf).unwrap_or_default()
        };

        for component in target.components() {
            if !resolved.as_os_str().is_empty() && self.symlinks.contains(&resolved) {
                return false;
            }
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    if !resolved.pop() {
                        return false;
                    }
                }
                Component::RootDir | Component::Prefix(_) => return false,
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contained_entry_path() {
        assert_eq!(
            contained_entry_path(Path::new("./five-echo/p06.nii.gz")),
            Some(PathBuf::from("five-echo/p06.nii.gz"))
        );
        assert_eq!(contained_entry_path(Path::new("../evil")), None);
        assert_eq!(contained_entry_path(Path::new("a/../../evil")), None);
        assert_eq!(contained_entry_path(Path::new("/etc/passwd")), None);
    }

    #[test]
    fn test_symlink_targets() {
        let guard = LinkGuard::new();
        let entry = Path::new("data/link");
        assert!(guard.target_is_contained(entry, Path::new("file.nii.gz"), false));
        assert!(guard.target_is_contained(entry, Path::new("../other/file"), false));
        assert!(!guard.target_is_contained(entry, Path::new("../../outside"), false));
        assert!(!guard.target_is_contained(entry, Path::new("/etc/passwd"), false));
    }

    #[test]
    fn test_hard_link_targets_resolve_from_root() {
        let guard = LinkGuard::new();
        let entry = Path::new("data/deep/link");
        assert!(guard.target_is_contained(entry, Path::new("data/file"), true));
        assert!(!guard.target_is_contained(entry, Path::new("../file"), true));
    }

    #[test]
    fn test_entries_below_recorded_symlink() {
        let mut guard = LinkGuard::new();
        guard.record_symlink(Path::new("l"));

        assert!(guard.passes_through_symlink(Path::new("l")));
        assert!(guard.passes_through_symlink(Path::new("l/x")));
        assert!(guard.passes_through_symlink(Path::new("l/x/y")));
        assert!(!guard.passes_through_symlink(Path::new("lx")));
        assert!(!guard.passes_through_symlink(Path::new("data/l")));
    }

    #[test]
    fn test_targets_cannot_resolve_through_symlinks() {
        let mut guard = LinkGuard::new();
        guard.record_symlink(Path::new("l"));

        // Pointing at the link itself is fine.
        assert!(guard.target_is_contained(Path::new("m"), Path::new("l"), false));
        assert!(!guard.target_is_contained(Path::new("m"), Path::new("l/.."), false));
        assert!(!guard.target_is_contained(Path::new("m"), Path::new("l/file"), false));
        assert!(!guard.target_is_contained(Path::new("h"), Path::new("l/file"), true));
    }
}
