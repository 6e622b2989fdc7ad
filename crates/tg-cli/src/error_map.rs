use std::fmt::Display;

use tg_core::ConfigError;

fn map_error(code: &'static str, error: impl Display) -> ConfigError {
    ConfigError::new(code, error.to_string())
}

pub(crate) fn emit_error(error: ConfigError) -> i32 {
    println!("RESULT:ERROR");
    println!("ERROR_CODE:{}", error.code);
    println!(
        "ERROR_MSG_JSON:{}",
        serde_json::to_string(&error.message).expect("string json")
    );
    1
}

pub(crate) fn map_cli_source_path(error: std::io::Error) -> ConfigError {
    map_error("CLI_SOURCE_PATH", error)
}

pub(crate) fn map_cli_source_read(error: std::io::Error) -> ConfigError {
    map_error("CLI_SOURCE_READ", error)
}

pub(crate) fn map_cli_prefs_invalid(error: serde_json::Error) -> ConfigError {
    map_error("CLI_PREFS_INVALID", error)
}

pub(crate) fn map_cli_output(error: serde_json::Error) -> ConfigError {
    map_error("CLI_OUTPUT", error)
}

#[cfg(test)]
mod error_map_tests {
    use super::*;

    #[test]
    fn emit_error_returns_non_zero_exit_code() {
        let code = emit_error(ConfigError::new("ERR", "failed"));
        assert_eq!(code, 1);
    }

    #[test]
    fn mapping_helpers_keep_error_codes() {
        assert_eq!(
            map_cli_source_path(std::io::Error::other("path")).code,
            "CLI_SOURCE_PATH"
        );
        assert_eq!(
            map_cli_source_read(std::io::Error::other("read")).code,
            "CLI_SOURCE_READ"
        );
        let invalid = serde_json::from_str::<serde_json::Value>("{").expect_err("invalid json");
        assert_eq!(map_cli_prefs_invalid(invalid).code, "CLI_PREFS_INVALID");
    }
}
