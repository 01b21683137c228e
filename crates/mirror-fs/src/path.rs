//! Path rebasing between mirrored roots
//!
//! Relative paths are represented as forward-slash strings regardless of
//! platform, converted to native `PathBuf`s only at I/O boundaries.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Express `path` relative to `root` as a forward-slash string.
pub fn relative_to(path: &Path, root: &Path) -> Result<String> {
    let stripped = path
        .strip_prefix(root)
        .map_err(|_| Error::outside_root(path, root))?;
    let parts: Vec<_> = stripped
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Ok(parts.join("/"))
}

/// Rebuild `path` under `to_root`, substituting it for `from_root`.
pub fn rebase(path: &Path, from_root: &Path, to_root: &Path) -> Result<PathBuf> {
    let rel = relative_to(path, from_root)?;
    Ok(to_root.join(rel))
}

/// Whether `rel` lies strictly under the subtree rooted at `prefix`.
///
/// Both arguments are forward-slash relative paths; `rel == prefix` is not
/// "under".
pub fn is_under(rel: &str, prefix: &str) -> bool {
    rel.len() > prefix.len() && rel.starts_with(prefix) && rel.as_bytes()[prefix.len()] == b'/'
}

/// Rewrite a relative path from one subtree prefix to another.
///
/// Returns `rel` unchanged when it does not start with `old_prefix`.
pub fn reprefix(rel: &str, old_prefix: &str, new_prefix: &str) -> String {
    match rel.strip_prefix(old_prefix) {
        Some(suffix) => format!("{new_prefix}{suffix}"),
        None => rel.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn relative_to_joins_with_forward_slashes() {
        let root = Path::new("/data/in");
        let path = root.join("photos").join("a.txt");
        assert_eq!(relative_to(&path, root).unwrap(), "photos/a.txt");
    }

    #[test]
    fn relative_to_rejects_foreign_paths() {
        let err = relative_to(Path::new("/elsewhere/x"), Path::new("/data/in"));
        assert!(err.is_err());
    }

    #[test]
    fn rebase_substitutes_roots() {
        let rebased = rebase(
            Path::new("/data/in/photos/a.txt"),
            Path::new("/data/in"),
            Path::new("/data/out"),
        )
        .unwrap();
        assert_eq!(rebased, PathBuf::from("/data/out/photos/a.txt"));
    }

    #[rstest]
    #[case("d/c.txt", "d", true)]
    #[case("d/e/f", "d", true)]
    #[case("d", "d", false)]
    #[case("dd/c.txt", "d", false)]
    #[case("other", "d", false)]
    fn is_under_respects_component_boundaries(
        #[case] rel: &str,
        #[case] prefix: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(is_under(rel, prefix), expected);
    }

    #[rstest]
    #[case("d/c.txt", "d", "e", "e/c.txt")]
    #[case("d/x/y", "d", "moved/d2", "moved/d2/x/y")]
    #[case("unrelated", "d", "e", "unrelated")]
    fn reprefix_rewrites_the_leading_segment(
        #[case] rel: &str,
        #[case] old: &str,
        #[case] new: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(reprefix(rel, old, new), expected);
    }
}
