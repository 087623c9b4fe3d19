//! LAStools installation checks.

use crate::errors::ConfigError;
use crate::reporter::Reporter;
use std::path::{Path, PathBuf};

/// A validated LAStools installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LasToolsInstall {
    root: PathBuf,
    bin_dir: PathBuf,
}

impl LasToolsInstall {
    /// Validates an installation root and locates its `bin` directory.
    ///
    /// The root must not contain spaces or brackets because the external
    /// tools re-split their own command lines naively.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsafeInstallPath`] or
    /// [`ConfigError::MissingBinDir`].
    pub fn open(root: impl Into<PathBuf>, reporter: &dyn Reporter) -> Result<Self, ConfigError> {
        let root = root.into();
        check_install_path(&root)?;

        let bin_dir = root.join("bin");
        if !bin_dir.is_dir() {
            return Err(ConfigError::MissingBinDir { path: bin_dir });
        }
        reporter.message(&format!("Found {} ...", bin_dir.display()));

        Ok(Self { root, bin_dir })
    }

    /// The installation root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The directory holding the executables.
    #[must_use]
    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    /// Expected location of an executable, whether or not it exists.
    #[must_use]
    pub fn executable_path(&self, name: &str) -> PathBuf {
        self.bin_dir
            .join(format!("{name}{}", std::env::consts::EXE_SUFFIX))
    }

    /// Resolves an executable by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingExecutable`] if the file does not exist.
    pub fn executable(&self, name: &str, reporter: &dyn Reporter) -> Result<PathBuf, ConfigError> {
        let path = self.executable_path(name);
        if !path.is_file() {
            return Err(ConfigError::MissingExecutable {
                name: name.to_string(),
                path,
            });
        }
        reporter.message(&format!("Found {} ...", path.display()));
        Ok(path)
    }
}

fn check_install_path(root: &Path) -> Result<(), ConfigError> {
    let text = root.to_string_lossy();
    let what = if text.contains(' ') {
        "spaces"
    } else if text.contains('(') || text.contains(')') {
        "brackets"
    } else {
        return Ok(());
    };

    Err(ConfigError::UnsafeInstallPath {
        path: root.to_path_buf(),
        what,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::CollectingReporter;

    #[test]
    fn test_rejects_spaces_and_brackets() {
        let reporter = CollectingReporter::new();

        let err = LasToolsInstall::open("/opt/my tools/lastools", &reporter).unwrap_err();
        assert!(matches!(err, ConfigError::UnsafeInstallPath { what: "spaces", .. }));

        let err = LasToolsInstall::open("/opt/tools(x86)/lastools", &reporter).unwrap_err();
        assert!(matches!(err, ConfigError::UnsafeInstallPath { what: "brackets", .. }));
        assert!(reporter.is_empty());
    }

    #[test]
    fn test_missing_bin_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = LasToolsInstall::open(dir.path(), &CollectingReporter::new()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingBinDir { .. }));
    }

    #[test]
    fn test_resolves_executables() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("bin")).unwrap();
        let reporter = CollectingReporter::new();
        let install = LasToolsInstall::open(dir.path(), &reporter).unwrap();

        std::fs::write(install.executable_path("lasinfo"), b"").unwrap();

        let found = install.executable("lasinfo", &reporter).unwrap();
        assert_eq!(found, install.executable_path("lasinfo"));
        assert!(reporter.contains("lasinfo"));

        let err = install.executable("lasgrid", &reporter).unwrap_err();
        assert!(matches!(err, ConfigError::MissingExecutable { ref name, .. } if name == "lasgrid"));
    }
}
