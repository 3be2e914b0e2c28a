use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum DriftnetError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, DriftnetError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_bad_product_url_surfaces_as_config_error() {
        let mut config = Config::default();
        config.run.product_urls = vec!["shop.test/no-scheme".into()];

        let err: DriftnetError = config.validate().unwrap_err().into();
        assert!(matches!(err, DriftnetError::Config(ConfigError::Invalid(_))));
        assert!(err.to_string().starts_with("Configuration error: Invalid configuration"));
    }
}
