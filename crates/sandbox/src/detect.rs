//! Chromium detection and install guidance.
//!
//! The preview backend needs any CDP-capable browser. Discovery order:
//! configured override, `VITRO_BROWSER` / `CHROME` env vars, platform
//! install paths, then executable names on PATH. Platform paths are probed
//! before PATH because PATH can hold broken wrapper scripts.

use std::path::PathBuf;

/// Executable names probed on PATH, in preference order.
const EXECUTABLE_NAMES: &[&str] = &[
    "google-chrome-stable",
    "google-chrome",
    "chromium",
    "chromium-browser",
    "chrome",
    "brave-browser",
    "msedge",
    "microsoft-edge-stable",
];

#[cfg(target_os = "macos")]
const APP_BUNDLE_PATHS: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    "/Applications/Brave Browser.app/Contents/MacOS/Brave Browser",
    "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
];

#[cfg(target_os = "windows")]
const WINDOWS_INSTALL_PATHS: &[&str] = &[
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe",
];

/// Locates a usable browser executable.
///
/// A configured `override_path` wins when it exists; a missing override is
/// logged and detection falls through to the automatic probes.
pub fn find_executable(override_path: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = override_path {
        let p = PathBuf::from(path);
        if p.exists() {
            return Some(p);
        }
        tracing::warn!(path, "configured browser executable not found, probing instead");
    }

    for var in ["VITRO_BROWSER", "CHROME"] {
        if let Ok(path) = std::env::var(var) {
            let p = PathBuf::from(&path);
            if p.exists() {
                return Some(p);
            }
        }
    }

    #[cfg(target_os = "macos")]
    for path in APP_BUNDLE_PATHS {
        let p = PathBuf::from(path);
        if p.exists() {
            return Some(p);
        }
    }

    #[cfg(target_os = "windows")]
    for path in WINDOWS_INSTALL_PATHS {
        let p = PathBuf::from(path);
        if p.exists() {
            return Some(p);
        }
    }

    for name in EXECUTABLE_NAMES {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    None
}

/// Platform-specific install guidance shown when nothing was found.
pub fn install_instructions() -> String {
    let instructions = if cfg!(target_os = "macos") {
        "  brew install --cask google-chrome\n  # or: chromium, brave-browser"
    } else if cfg!(target_os = "linux") {
        "  Debian/Ubuntu: sudo apt install chromium-browser\n  \
         Fedora:         sudo dnf install chromium\n  \
         Arch:           sudo pacman -S chromium"
    } else if cfg!(target_os = "windows") {
        "  winget install Google.Chrome"
    } else {
        "  Download from https://www.google.com/chrome/"
    };

    format!(
        "The preview needs a Chromium-based browser and none was found. To install one:\n\n\
         {instructions}\n\n\
         Any Chromium-based browser works (Chrome, Chromium, Edge, Brave).\n\n\
         Or point vitro at an existing install:\n  \
         [sandbox]\n  \
         executable = \"/path/to/browser\"\n\n\
         Or set the VITRO_BROWSER environment variable."
    )
}

/// Startup availability check. Returns whether a browser was found; warns
/// on stderr and the log when not, so `serve` can still come up with the
/// preview disabled.
pub fn check_and_warn(override_path: Option<&str>) -> bool {
    match find_executable(override_path) {
        Some(path) => {
            tracing::info!(path = %path.display(), "browser executable detected");
            true
        },
        None => {
            eprintln!("\n⚠️  Sandbox preview enabled but Chrome/Chromium not found!");
            eprintln!("{}", install_instructions());
            eprintln!();
            tracing::warn!("no browser executable found; preview rendering disabled");
            false
        },
    }
}
