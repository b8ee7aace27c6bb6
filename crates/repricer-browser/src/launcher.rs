use crate::{Error, Result};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

pub const DEFAULT_DEBUGGING_PORT: u16 = 9222;

/// Starts a visible Chrome with remote debugging enabled.
///
/// The window stays headed: the operator logs in and solves CAPTCHAs in it.
pub struct ChromeLauncher {
    chrome_path: PathBuf,
    profile_path: PathBuf,
    start_url: String,
    debugging_port: u16,
}

impl ChromeLauncher {
    pub fn new(chrome_path: PathBuf, profile_path: PathBuf, start_url: String, debugging_port: u16) -> Self {
        Self {
            chrome_path,
            profile_path,
            start_url,
            debugging_port,
        }
    }

    /// Launch Chrome process
    pub fn launch(&self) -> Result<Child> {
        tracing::debug!(
            "Launching {} on debugging port {}",
            self.chrome_path.display(),
            self.debugging_port
        );

        Command::new(&self.chrome_path)
            .args(self.build_args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::Browser(format!("Failed to launch Chrome: {}", e)))
    }

    fn build_args(&self) -> Vec<String> {
        vec![
            format!("--remote-debugging-port={}", self.debugging_port),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            "--window-size=1920,1080".to_string(),
            "--start-maximized".to_string(),
            format!("--user-data-dir={}", self.profile_path.display()),
            self.start_url.clone(),
        ]
    }

    pub fn debugging_port(&self) -> u16 {
        self.debugging_port
    }
}
