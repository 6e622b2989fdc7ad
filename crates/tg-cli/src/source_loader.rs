use std::fs;
use std::path::PathBuf;

use tg_core::{AppPreferences, ConfigError};
use tg_parser::{parse_xml_document, XmlDocument};

use crate::prefs::PreferencesSpec;
use crate::{map_cli_prefs_invalid, map_cli_source_path, map_cli_source_read};

pub(crate) fn resolve_source_path(path: &str) -> Result<PathBuf, ConfigError> {
    let path = PathBuf::from(path);
    let absolute = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .map_err(map_cli_source_path)?
            .join(path)
    };

    if !absolute.exists() {
        return Err(ConfigError::new(
            "CLI_SOURCE_NOT_FOUND",
            format!("file does not exist: {}", absolute.display()),
        ));
    }

    if !absolute.is_file() {
        return Err(ConfigError::new(
            "CLI_SOURCE_NOT_FILE",
            format!("path is not a file: {}", absolute.display()),
        ));
    }

    Ok(absolute)
}

fn read_source(path: &str) -> Result<String, ConfigError> {
    let path = resolve_source_path(path)?;
    fs::read_to_string(&path).map_err(map_cli_source_read)
}

pub(crate) fn load_document(path: &str) -> Result<XmlDocument, ConfigError> {
    parse_xml_document(&read_source(path)?)
}

pub(crate) fn load_preferences(path: &str) -> Result<AppPreferences, ConfigError> {
    let spec: PreferencesSpec =
        serde_json::from_str(&read_source(path)?).map_err(map_cli_prefs_invalid)?;
    Ok(spec.into_preferences())
}
