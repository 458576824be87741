//! Config file discovery and loading.
//!
//! `vitro.toml` is looked up in the working directory first, then in the
//! user config dir (`~/.config/vitro/` on Linux). String values may embed
//! `${ENV_VAR}` placeholders. A missing file means defaults; an unreadable
//! or unparseable file means a warning and defaults — startup never fails
//! on config.

use std::path::{Path, PathBuf};

use {
    serde::Deserialize,
    tracing::{debug, warn},
};

use vitro_sandbox::SandboxConfig;

const CONFIG_FILENAME: &str = "vitro.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VitroConfig {
    pub server: ServerConfig,
    pub sandbox: SandboxConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 4173,
        }
    }
}

/// Load the config, preferring an explicit `--config` path, then the
/// standard locations. Falls back to defaults on any failure.
pub fn load(override_path: Option<&Path>) -> VitroConfig {
    let Some(path) = override_path.map(Path::to_path_buf).or_else(find_config_file) else {
        debug!("no config file found, using defaults");
        return VitroConfig::default();
    };

    match load_from_path(&path) {
        Ok(config) => {
            debug!(path = %path.display(), "loaded config");
            config
        },
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            VitroConfig::default()
        },
    }
}

fn load_from_path(path: &Path) -> anyhow::Result<VitroConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    Ok(toml::from_str(&raw)?)
}

fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILENAME);
    if local.exists() {
        return Some(local);
    }

    if let Some(dirs) = directories::ProjectDirs::from("", "", "vitro") {
        let global = dirs.config_dir().join(CONFIG_FILENAME);
        if global.exists() {
            return Some(global);
        }
    }

    None
}

/// Replace `${ENV_VAR}` placeholders in the raw config text.
///
/// Unresolvable or malformed placeholders are left as-is.
fn substitute_env(input: &str) -> String {
    substitute_env_with(input, |name| std::env::var(name).ok())
}

// Split out so tests can inject a lookup instead of mutating the process
// environment.
fn substitute_env_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) if end > 0 => {
                let name = &after[..end];
                match lookup(name) {
                    Some(value) => result.push_str(&value),
                    None => {
                        result.push_str("${");
                        result.push_str(name);
                        result.push('}');
                    },
                }
                rest = &after[end + 1..];
            },
            // `${}` or an unclosed placeholder: emit literally.
            _ => {
                result.push_str("${");
                rest = after;
            },
        }
    }

    result.push_str(rest);
    result
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_loopback() {
        let config = VitroConfig::default();
        assert_eq!(config.server.bind, "127.0.0.1");
        assert_eq!(config.server.port, 4173);
        assert!(config.sandbox.executable.is_none());
    }

    #[test]
    fn parses_both_sections() {
        let config: VitroConfig = toml::from_str(
            r#"
            [server]
            bind = "0.0.0.0"
            port = 8080

            [sandbox]
            executable = "/usr/bin/chromium"
            viewport_width = 800
            "#,
        )
        .unwrap();
        assert_eq!(config.server.bind, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.sandbox.executable.as_deref(), Some("/usr/bin/chromium"));
        assert_eq!(config.sandbox.viewport_width, 800);
        // Unset fields keep their defaults.
        assert_eq!(config.sandbox.viewport_height, 768);
    }

    #[test]
    fn partial_file_is_fine() {
        let config: VitroConfig = toml::from_str("[server]\nport = 9000\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind, "127.0.0.1");
    }

    #[test]
    fn substitutes_known_var() {
        let lookup = |name: &str| match name {
            "VITRO_TEST_BIND" => Some("0.0.0.0".to_string()),
            _ => None,
        };
        assert_eq!(
            substitute_env_with("bind = \"${VITRO_TEST_BIND}\"", lookup),
            "bind = \"0.0.0.0\"",
        );
    }

    #[test]
    fn leaves_unknown_var_as_placeholder() {
        let lookup = |_: &str| None;
        assert_eq!(
            substitute_env_with("${VITRO_NO_SUCH_VAR}", lookup),
            "${VITRO_NO_SUCH_VAR}",
        );
    }

    #[test]
    fn malformed_placeholders_pass_through() {
        let lookup = |_: &str| Some("x".to_string());
        assert_eq!(substitute_env_with("${}", lookup), "${}");
        assert_eq!(substitute_env_with("tail ${OPEN", lookup), "tail ${OPEN");
        assert_eq!(substitute_env_with("plain text", lookup), "plain text");
    }

    #[test]
    fn loads_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vitro.toml");
        std::fs::write(&path, "[server]\nport = 5151\n").unwrap();

        let config = load_from_path(&path).unwrap();
        assert_eq!(config.server.port, 5151);
    }

    #[test]
    fn unreadable_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_from_path(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn garbage_toml_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vitro.toml");
        std::fs::write(&path, "this is { not toml").unwrap();
        assert!(load_from_path(&path).is_err());
    }
}
