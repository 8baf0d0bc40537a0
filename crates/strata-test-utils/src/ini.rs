//! [`IniFixture`] for tests that read INI files from disk.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The classic ssh-style sample: a `DEFAULT` section plus two hosts.
///
/// - `bitbucket.org` only defines `User`
/// - `topsecret.server.com` defines `Port` and overrides `ForwardX11`
pub const HOSTS_INI: &str = "\
[DEFAULT]
ServerAliveInterval = 45
Compression = yes
CompressionLevel = 9
ForwardX11 = yes

[bitbucket.org]
User = hg

[topsecret.server.com]
Port = 50022
ForwardX11 = no
";

/// Sections of [`HOSTS_INI`] in file order.
pub const HOSTS_SECTIONS: [&str; 2] = ["bitbucket.org", "topsecret.server.com"];

/// A temporary directory holding INI files.
///
/// # Example
///
/// ```rust
/// use strata_test_utils::ini::{HOSTS_INI, IniFixture};
///
/// let fixture = IniFixture::with_hosts();
/// assert!(fixture.path().ends_with("config.ini"));
/// assert_eq!(std::fs::read_to_string(fixture.path()).unwrap(), HOSTS_INI);
/// ```
pub struct IniFixture {
    temp_dir: TempDir,
    path: PathBuf,
}

impl IniFixture {
    /// Write `content` to `config.ini` in a fresh temporary directory.
    pub fn new(content: &str) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.ini");
        fs::write(&path, content).unwrap();
        Self { temp_dir, path }
    }

    /// Fixture containing [`HOSTS_INI`].
    pub fn with_hosts() -> Self {
        Self::new(HOSTS_INI)
    }

    /// Path of `config.ini`.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write another file next to `config.ini` and return its path.
    pub fn add_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    /// Path of a file that does not exist in the fixture directory.
    pub fn missing_file(&self) -> PathBuf {
        self.temp_dir.path().join("missing.ini")
    }
}
