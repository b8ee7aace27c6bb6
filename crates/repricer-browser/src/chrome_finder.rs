use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Binary names looked up on `PATH` after the install locations
const PATH_NAMES: [&str; 4] = [
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
];

#[cfg(target_os = "macos")]
const INSTALL_LOCATIONS: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
];

#[cfg(target_os = "linux")]
const INSTALL_LOCATIONS: &[&str] = &[
    "/usr/bin/google-chrome",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
];

#[cfg(target_os = "windows")]
const INSTALL_LOCATIONS: &[&str] = &[
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
];

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
const INSTALL_LOCATIONS: &[&str] = &[];

/// Picks the Chrome binary the automation browser is started from
pub struct ChromeFinder {
    explicit: Option<PathBuf>,
}

impl ChromeFinder {
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self { explicit }
    }

    /// An explicit path must be usable as given; otherwise the first usable
    /// install location or `PATH` entry wins.
    pub fn find(&self) -> Result<PathBuf> {
        if let Some(path) = &self.explicit {
            return usable(path);
        }

        let found = INSTALL_LOCATIONS
            .iter()
            .map(PathBuf::from)
            .chain(PATH_NAMES.iter().filter_map(|name| which::which(name).ok()))
            .find(|path| usable(path).is_ok());

        found.ok_or_else(|| {
            Error::Browser(format!(
                "Chrome not found in {} or on PATH ({}). Pass --chrome-path to point at it.",
                INSTALL_LOCATIONS.join(", "),
                PATH_NAMES.join(", ")
            ))
        })
    }
}

fn usable(path: &Path) -> Result<PathBuf> {
    let metadata = std::fs::metadata(path)
        .map_err(|_| Error::Browser(format!("Chrome not found at: {}", path.display())))?;

    if !metadata.is_file() {
        return Err(Error::Browser(format!("Not a file: {}", path.display())));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if metadata.permissions().mode() & 0o111 == 0 {
            return Err(Error::Browser(format!(
                "Chrome binary not executable: {}",
                path.display()
            )));
        }
    }

    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_is_used_as_given() {
        let temp = tempfile::NamedTempFile::new().unwrap();

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(temp.path(), std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        let finder = ChromeFinder::new(Some(temp.path().to_path_buf()));
        assert_eq!(finder.find().unwrap(), temp.path());
    }

    #[test]
    fn test_missing_explicit_path_is_not_replaced_by_detection() {
        let finder = ChromeFinder::new(Some(PathBuf::from("/nonexistent/chrome")));
        let err = finder.find().unwrap_err();
        assert!(err.to_string().contains("not found at: /nonexistent/chrome"));
    }

    #[test]
    fn test_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let finder = ChromeFinder::new(Some(dir.path().to_path_buf()));
        assert!(finder.find().unwrap_err().to_string().contains("Not a file"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_executable_is_rejected() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::set_permissions(temp.path(), std::fs::Permissions::from_mode(0o644)).unwrap();

        let finder = ChromeFinder::new(Some(temp.path().to_path_buf()));
        assert!(finder.find().unwrap_err().to_string().contains("not executable"));
    }
}
