//! Browser detection and install guidance.

use std::path::PathBuf;

/// Known Chromium-based executable names, searched in PATH order.
/// All of these speak CDP.
const CHROMIUM_EXECUTABLES: &[&str] = &[
    "chromium",
    "chromium-browser",
    "chrome",
    "google-chrome",
    "google-chrome-stable",
    "msedge",
    "microsoft-edge-stable",
    "brave-browser",
];

/// Locate a Chromium-based browser.
///
/// Checks (in order): the configured path, the `CHROME` environment
/// variable, then known executable names in `PATH`.
pub fn detect_browser(custom_path: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = custom_path {
        let p = PathBuf::from(path);
        if p.exists() {
            return Some(p);
        }
    }

    if let Ok(path) = std::env::var("CHROME") {
        let p = PathBuf::from(&path);
        if p.exists() {
            return Some(p);
        }
    }

    for name in CHROMIUM_EXECUTABLES {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    None
}

/// Install instructions shown when no browser is found.
pub fn install_hint() -> String {
    "No Chromium-based browser found. Install one:\n\n  \
     Debian/Ubuntu: sudo apt install chromium\n  \
     Fedora:        sudo dnf install chromium\n  \
     Alpine:        apk add chromium\n\n\
     Or point at an existing binary:\n  \
     [browser]\n  \
     chrome_path = \"/path/to/browser\"\n\n\
     Or set the CHROME environment variable."
        .to_string()
}
