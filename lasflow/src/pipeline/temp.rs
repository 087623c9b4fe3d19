//! The shared temp namespace used to pass artifacts between stages.

use super::FilePattern;
use crate::errors::ConfigError;
use crate::reporter::Reporter;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A caller-supplied directory owned by a single run.
///
/// The directory must be empty when the run starts. Nothing prevents two
/// runs from sharing it; doing so corrupts both runs' file sets and is a
/// precondition violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempNamespace {
    dir: PathBuf,
    cleanup: FilePattern,
}

impl TempNamespace {
    /// Checks that the directory exists and is empty, then claims it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingTempDir`] or [`ConfigError::TempDirNotEmpty`].
    pub fn claim(
        dir: impl Into<PathBuf>,
        cleanup: FilePattern,
        reporter: &dyn Reporter,
    ) -> Result<Self, ConfigError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(ConfigError::MissingTempDir { path: dir });
        }
        reporter.message(&format!("Found {} ...", dir.display()));

        let is_empty = fs::read_dir(&dir)
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(false);
        if !is_empty {
            return Err(ConfigError::TempDirNotEmpty { path: dir });
        }
        reporter.message("And it's empty ...");

        Ok(Self { dir, cleanup })
    }

    /// The directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The pattern removed by [`TempNamespace::cleanup`].
    #[must_use]
    pub fn cleanup_pattern(&self) -> FilePattern {
        self.cleanup
    }

    /// The wildcard path handed to external tools.
    #[must_use]
    pub fn glob(&self, pattern: &FilePattern) -> PathBuf {
        self.dir.join(pattern.to_string())
    }

    /// Lists the files currently matching `pattern`, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the directory cannot be read.
    pub fn matching(&self, pattern: &FilePattern) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if entry.file_name().to_str().is_some_and(|name| pattern.matches(name)) {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }

    /// Deletes every file matching the cleanup pattern.
    ///
    /// Returns the number of files removed.
    ///
    /// # Errors
    ///
    /// Returns the first IO error encountered.
    pub fn cleanup(&self) -> io::Result<usize> {
        let files = self.matching(&self.cleanup)?;
        for file in &files {
            debug!(file = %file.display(), "Removing temporary file");
            fs::remove_file(file)?;
        }
        Ok(files.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::CollectingReporter;

    const CLEANUP: FilePattern = FilePattern::new("temp_huge_normalize", ".laz");

    #[test]
    fn test_claim_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let err = TempNamespace::claim(&missing, CLEANUP, &CollectingReporter::new()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingTempDir { .. }));
    }

    #[test]
    fn test_claim_non_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("keep.txt"), b"x").unwrap();

        let err = TempNamespace::claim(dir.path(), CLEANUP, &CollectingReporter::new()).unwrap_err();
        assert!(matches!(err, ConfigError::TempDirNotEmpty { .. }));
    }

    #[test]
    fn test_matching_and_cleanup() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = CollectingReporter::new();
        let ns = TempNamespace::claim(dir.path(), CLEANUP, &reporter).unwrap();
        assert!(reporter.contains("And it's empty"));

        for name in [
            "temp_huge_normalize_0_0.laz",
            "temp_huge_normalize_0_0_g.laz",
            "temp_huge_normalize_0_0_gh.laz",
            "notes.txt",
        ] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        let ground = ns.matching(&FilePattern::new("temp_huge_normalize", "_g.laz")).unwrap();
        assert_eq!(ground.len(), 1);

        assert_eq!(ns.cleanup().unwrap(), 3);
        assert!(dir.path().join("notes.txt").exists());
        assert!(ns.matching(&CLEANUP).unwrap().is_empty());
    }

    #[test]
    fn test_glob_joins_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let ns = TempNamespace::claim(dir.path(), CLEANUP, &CollectingReporter::new()).unwrap();

        assert_eq!(
            ns.glob(&CLEANUP),
            dir.path().join("temp_huge_normalize*.laz")
        );
    }
}
