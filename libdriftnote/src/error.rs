//! Error types for Driftnote

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DriftnoteError>;

#[derive(Error, Debug)]
pub enum DriftnoteError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_formatting_config() {
        let config_error = ConfigError::MissingField("relays.default".to_string());
        let error = DriftnoteError::Config(config_error);
        let message = format!("{}", error);
        assert_eq!(
            message,
            "Configuration error: Missing required field: relays.default"
        );
    }

    #[test]
    fn test_config_error_read_error_formatting() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let config_error = ConfigError::ReadError(io_error);
        let message = format!("{}", config_error);
        assert!(message.contains("Failed to read config file"));
    }

    #[test]
    fn test_error_conversion_from_config_error() {
        let config_error = ConfigError::MissingField("test".to_string());
        let error: DriftnoteError = config_error.into();

        match error {
            DriftnoteError::Config(_) => {}
        }
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<String> {
            Ok("success".to_string())
        }

        fn returns_err() -> Result<String> {
            Err(DriftnoteError::Config(ConfigError::MissingField(
                "test".to_string(),
            )))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}
