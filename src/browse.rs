//! Finding application bundles on disk, the terminal counterpart of a file picker.

use std::fmt;
use std::path::{Path, PathBuf};
use strsim::levenshtein;
use walkdir::WalkDir;

// Deep enough for folders like /Applications/Utilities/Terminal.app.
const MAX_DEPTH: usize = 3;

/// Describes which entries count as applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleFilter {
    pub description: &'static str,
    pub extension: &'static str,
}

impl BundleFilter {
    pub const fn new(description: &'static str, extension: &'static str) -> Self {
        Self {
            description,
            extension,
        }
    }

    pub fn platform_default() -> Self {
        #[cfg(target_os = "macos")]
        {
            Self::new("Applications", "app")
        }
        #[cfg(target_os = "windows")]
        {
            Self::new("Programs", "exe")
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            Self::new("AppImages", "AppImage")
        }
    }

    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(self.extension))
    }
}

impl fmt::Display for BundleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (*.{})", self.description, self.extension)
    }
}

/// Directories searched when no roots are given explicitly.
pub fn default_roots() -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = Vec::new();

    #[cfg(target_os = "macos")]
    {
        roots.push(PathBuf::from("/Applications"));
        roots.push(PathBuf::from("/System/Applications"));
    }
    #[cfg(target_os = "windows")]
    {
        roots.push(PathBuf::from("C:\\Program Files"));
        roots.push(PathBuf::from("C:\\Program Files (x86)"));
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        roots.push(PathBuf::from("/opt"));
    }

    if let Some(home) = dirs::home_dir() {
        roots.push(home.join("Applications"));
    }

    roots
}

/// Lists every entry under `roots` that passes `filter`, sorted.
///
/// Matched bundles are not descended into, so helper apps nested inside a
/// bundle do not show up. Unreadable entries and missing roots are skipped.
pub fn find_bundles<P: AsRef<Path>>(roots: &[P], filter: &BundleFilter) -> Vec<PathBuf> {
    let mut found = Vec::new();

    for root in roots {
        let root = root.as_ref();
        if !root.exists() {
            continue;
        }

        let mut walker = WalkDir::new(root)
            .min_depth(1)
            .max_depth(MAX_DEPTH)
            .follow_links(true)
            .into_iter();

        while let Some(entry) = walker.next() {
            let Ok(entry) = entry else {
                continue;
            };
            if !filter.matches(entry.path()) {
                continue;
            }
            if entry.file_type().is_dir() {
                walker.skip_current_dir();
            }
            found.push(entry.into_path());
        }
    }

    found.sort();
    found.dedup();
    found
}

/// Picks the candidate that best matches `query`.
///
/// An exact name match (with or without the extension, ignoring case) wins
/// outright. Otherwise the closest name containing the query wins.
pub fn pick<'a>(query: &str, candidates: &'a [PathBuf]) -> Option<&'a Path> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }

    let mut best: Option<(usize, &Path)> = None;
    for candidate in candidates {
        let Some(score) = match_score(candidate, &query) else {
            continue;
        };
        if score == 0 {
            return Some(candidate.as_path());
        }
        if best.map_or(true, |(current, _)| score < current) {
            best = Some((score, candidate.as_path()));
        }
    }

    best.map(|(_, path)| path)
}

/// Scans `roots` and picks the best match for `query`.
pub fn browse<P: AsRef<Path>>(query: &str, roots: &[P], filter: &BundleFilter) -> Option<PathBuf> {
    let bundles = find_bundles(roots, filter);
    pick(query, &bundles).map(Path::to_path_buf)
}

// Lower is better, 0 = exact.
fn match_score(path: &Path, query: &str) -> Option<usize> {
    let name = path.file_name()?.to_string_lossy().to_lowercase();
    let stem = path.file_stem()?.to_string_lossy().to_lowercase();

    if stem == query || name == query {
        return Some(0);
    }

    if stem.contains(query) {
        return Some(levenshtein(&stem, query));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const APPS: BundleFilter = BundleFilter::new("Applications", "app");

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("Calculator.app/Contents/MacOS")).unwrap();
        fs::create_dir_all(root.join("Calculator.app/Contents/Helpers/Helper.app")).unwrap();
        fs::create_dir_all(root.join("Utilities/Terminal.app/Contents")).unwrap();
        fs::create_dir_all(root.join("Chess.APP")).unwrap();
        fs::create_dir_all(root.join("Graphing Calculator.app")).unwrap();
        fs::write(root.join("ReadMe.txt"), "hello").unwrap();
        dir
    }

    #[test]
    fn filter_describes_itself() {
        assert_eq!(APPS.to_string(), "Applications (*.app)");
    }

    #[test]
    fn filter_ignores_extension_case() {
        assert!(APPS.matches(Path::new("/Applications/Chess.APP")));
        assert!(!APPS.matches(Path::new("/Applications/ReadMe.txt")));
        assert!(!APPS.matches(Path::new("/Applications/app")));
    }

    #[test]
    fn finds_bundles_without_entering_them() {
        let dir = fixture();
        let root = dir.path();

        let found = find_bundles(&[root], &APPS);

        let mut expected = vec![
            root.join("Calculator.app"),
            root.join("Chess.APP"),
            root.join("Graphing Calculator.app"),
            root.join("Utilities/Terminal.app"),
        ];
        expected.sort();
        assert_eq!(found, expected);
    }

    #[test]
    fn missing_roots_are_skipped() {
        let dir = fixture();
        let missing = dir.path().join("nowhere");

        let found = find_bundles(&[missing.as_path(), dir.path()], &APPS);
        assert_eq!(found.len(), 4);
    }

    #[test]
    fn exact_name_beats_longer_match() {
        let candidates = vec![
            PathBuf::from("/Applications/Graphing Calculator.app"),
            PathBuf::from("/Applications/Calculator.app"),
        ];

        assert_eq!(
            pick("calculator", &candidates),
            Some(Path::new("/Applications/Calculator.app"))
        );
        assert_eq!(
            pick("Calculator.app", &candidates),
            Some(Path::new("/Applications/Calculator.app"))
        );
    }

    #[test]
    fn closest_substring_match_wins() {
        let candidates = vec![
            PathBuf::from("/Applications/Graphing Calculator.app"),
            PathBuf::from("/Applications/Calculator Pro.app"),
        ];

        assert_eq!(
            pick("calc", &candidates),
            Some(Path::new("/Applications/Calculator Pro.app"))
        );
    }

    #[test]
    fn no_match_and_blank_query_pick_nothing() {
        let candidates = vec![PathBuf::from("/Applications/Calculator.app")];

        assert_eq!(pick("safari", &candidates), None);
        assert_eq!(pick("  ", &candidates), None);
    }

    #[test]
    fn browse_walks_and_picks() {
        let dir = fixture();

        let picked = browse("terminal", &[dir.path()], &APPS);
        assert_eq!(picked, Some(dir.path().join("Utilities/Terminal.app")));
    }
}
