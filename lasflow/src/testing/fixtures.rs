//! Fake LAStools installations on disk.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway installation root with a `bin` directory of empty
/// executables, plus an empty temp directory.
pub struct FakeInstall {
    root: TempDir,
    temp: TempDir,
}

impl FakeInstall {
    /// Creates an installation containing the named executables.
    pub fn new(programs: &[&str]) -> Self {
        let root = tempfile::tempdir().expect("create install root");
        let bin = root.path().join("bin");
        std::fs::create_dir(&bin).expect("create bin dir");
        for program in programs {
            let file = bin.join(format!("{program}{}", std::env::consts::EXE_SUFFIX));
            std::fs::write(file, b"").expect("create executable");
        }

        Self {
            root,
            temp: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// The installation root.
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// The (initially empty) temp directory.
    pub fn temp_dir(&self) -> &Path {
        self.temp.path()
    }

    /// The temp directory as a host argument.
    pub fn temp_arg(&self) -> String {
        self.temp_dir().display().to_string()
    }

    /// A path inside the temp directory.
    pub fn temp_file(&self, name: &str) -> PathBuf {
        self.temp_dir().join(name)
    }

    /// Names of the files currently in the temp directory, sorted.
    pub fn temp_contents(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.temp_dir())
            .expect("read temp dir")
            .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

/// Converts string literals into a host argument vector.
pub fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| (*s).to_string()).collect()
}
