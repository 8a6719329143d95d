//! Locates the `config.toml` that tunes rendering and diagram style.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use armillary::{ArmillaryError, config::AppConfig};

/// Project-relative configuration file, checked before the user-wide one.
const LOCAL_CONFIG: &str = "armillary/config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {}", .0.display())]
    MissingFile(PathBuf),
}

impl From<ConfigError> for ArmillaryError {
    fn from(err: ConfigError) -> Self {
        ArmillaryError::Config(err.to_string())
    }
}

/// Resolves the [`AppConfig`] for a run.
///
/// `--config` wins when given and must exist. Otherwise `armillary/config.toml`
/// under the working directory is used, then `config.toml` in the user's
/// armillary config directory. With none present the built-in defaults apply.
///
/// # Errors
///
/// Returns [`ArmillaryError::Config`] for a missing explicit file or a file
/// whose `[render]`/`[style]` tables do not parse.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, ArmillaryError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path:% = path.display(); "Using configuration given on the command line");
        return read_app_config(path);
    }

    let local = Path::new(LOCAL_CONFIG);
    if local.exists() {
        info!(path:% = local.display(); "Using project configuration");
        return read_app_config(local);
    }

    match ProjectDirs::from("com", "armillary", "armillary") {
        Some(dirs) => {
            let user = dirs.config_dir().join("config.toml");
            if user.exists() {
                info!(path:% = user.display(); "Using user configuration");
                return read_app_config(&user);
            }
            debug!(path:% = user.display(); "No user configuration");
        }
        None => debug!("No home directory, skipping user configuration"),
    }

    debug!("Rendering with default configuration");
    Ok(AppConfig::default())
}

fn read_app_config(path: &Path) -> Result<AppConfig, ArmillaryError> {
    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()).into())
}

#[cfg(test)]
mod tests {
    use armillary::{config::LayoutProgram, model::OutputFormat};
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_explicit_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r##"
[render]
layout_program = "neato"
format = "svg"

[style]
font_name = "DejaVu Sans"
background_color = "#fafafa"
"##,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.render().layout_program(), LayoutProgram::Neato);
        assert_eq!(config.render().format(), Some(OutputFormat::Svg));
        assert_eq!(config.style().font_name(), Some("DejaVu Sans"));
        assert_eq!(
            config.style().background_color().unwrap().map(|c| c.to_hex()),
            Some("#fafafa".to_string())
        );
    }

    #[test]
    fn test_sections_are_optional() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        fs::write(&path, "[style]\nedge_color = \"gray\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.render().layout_program(), LayoutProgram::Dot);
        assert!(config.render().format().is_none());
        assert!(config.style().edge_color().unwrap().is_some());
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempdir().unwrap();
        let err = load_config(Some(dir.path().join("absent.toml"))).unwrap_err();
        let missing = matches!(&err, ArmillaryError::Config(msg) if msg.contains("Missing"));
        assert!(missing);
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[render]\nlayout_program = \"osage\"\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(&err, ArmillaryError::Config(msg) if msg.contains("Failed to parse")));
    }
}
