use crate::watch::path_utils::clean_path;

/// Directories that are never watched nor classified.
pub const DEFAULT_IGNORED: [&str; 3] = [".git", "node_modules", "public"];

/// Excludes paths by prefix.
///
/// Both the prefixes and the candidate paths are lower-cased and lexically
/// cleaned, so `NODE_MODULES/x.js` and `./node_modules/../node_modules/x.js`
/// are both ignored by a `node_modules` prefix. Matching is a plain string
/// prefix test on root-relative paths.
#[derive(Debug, Clone)]
pub struct PathFilter {
    prefixes: Vec<String>,
}

impl Default for PathFilter {
    fn default() -> Self {
        Self::new(DEFAULT_IGNORED)
    }
}

impl PathFilter {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let prefixes = prefixes
            .into_iter()
            .map(|p| normalize(p.as_ref()))
            .filter(|p| p != ".")
            .collect();
        Self { prefixes }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn is_ignored(&self, path: &str) -> bool {
        let cleaned = normalize(path);
        self.prefixes.iter().any(|prefix| cleaned.starts_with(prefix.as_str()))
    }
}

fn normalize(path: &str) -> String {
    clean_path(&path.replace('\\', "/").to_lowercase())
}
