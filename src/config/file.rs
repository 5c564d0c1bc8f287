//! File-based configuration input.

use std::path::Path;

use super::format::{parse, Format};
use super::ConfigError;
use crate::value::Value;

/// Reads the file at `path` as UTF-8 text.
pub fn read_config_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound(path.to_path_buf())
        } else {
            ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Resolves the format from the extension, then reads and parses the file.
///
/// Parse failures are reported together with the file path.
pub fn parse_config_file(path: &Path) -> Result<Value, ConfigError> {
    let format = Format::from_path(path)?;
    let contents = read_config_file(path)?;
    parse(format, &contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: Box::new(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_file(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn test_parses_valid_file() {
        let file = config_file(".yml", "key: value\n");
        let value = parse_config_file(file.path()).unwrap();

        assert_eq!(value.get("key"), Some(&Value::from("value")));
    }

    #[test]
    fn test_missing_file() {
        let result = parse_config_file(Path::new("/nonexistent/path/config.yaml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_extension_checked_before_reading() {
        let result = parse_config_file(Path::new("/nonexistent/path/config.ini"));
        assert!(matches!(result, Err(ConfigError::UnsupportedExtension { .. })));
    }

    #[test]
    fn test_parse_error_carries_path() {
        let file = config_file(".json", "{\"key\": ");
        let err = parse_config_file(file.path()).unwrap_err();

        match err {
            ConfigError::ParseError { path, source } => {
                assert_eq!(path, file.path());
                assert!(matches!(*source, ConfigError::Json(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_file() {
        let file = config_file(".toml", "");
        let err = parse_config_file(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ParseError { ref source, .. }
                if matches!(**source, ConfigError::EmptyInput)
        ));
    }
}
