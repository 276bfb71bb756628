//! Store configuration

use crate::format::MarshalFormat;
use serde::{Deserialize, Serialize};

/// SyncVault store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// (Un-)marshal format, JSON unless set otherwise
    pub marshal_format: MarshalFormat,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            marshal_format: MarshalFormat::Json,
        }
    }
}

impl StoreConfig {
    /// Replace the marshal format, accepting a format or its name
    pub fn with_marshal_format(mut self, format: impl Into<MarshalFormat>) -> Self {
        self.marshal_format = format.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_uses_json() {
        assert_eq!(StoreConfig::default().marshal_format, MarshalFormat::Json);
    }

    #[test]
    fn test_config_from_partial_document() {
        let config: StoreConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, StoreConfig::default());

        let config: StoreConfig =
            serde_json::from_str(r#"{"marshal_format":"bincode"}"#).unwrap();
        assert_eq!(config.marshal_format, MarshalFormat::Bincode);
    }

    #[test]
    fn test_config_keeps_unknown_format() {
        let config: StoreConfig = serde_json::from_str(r#"{"marshal_format":"gob"}"#).unwrap();
        assert_eq!(config.marshal_format, MarshalFormat::from("gob"));
        assert!(!config.marshal_format.is_supported());

        // Writing the config back out keeps the format unusable
        let text = serde_json::to_string(&config).unwrap();
        assert_eq!(text, r#"{"marshal_format":"gob"}"#);
        let reloaded: StoreConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_builder() {
        let config = StoreConfig::default().with_marshal_format("bincode");
        assert_eq!(config.marshal_format, MarshalFormat::Bincode);

        let config = StoreConfig::default().with_marshal_format(MarshalFormat::Json);
        assert_eq!(config.marshal_format, MarshalFormat::Json);
    }
}
