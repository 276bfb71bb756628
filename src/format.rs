//! Marshal formats and their codecs
//!
//! Each supported `MarshalFormat` variant dispatches to exactly one `Codec`.
//! The store never touches serialization libraries directly.

use crate::error::{CodecError, Result, SyncVaultError};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Encode/decode pair for one wire representation
pub trait Codec {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> std::result::Result<Vec<u8>, CodecError>;

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> std::result::Result<T, CodecError>;
}

/// Structured text via `serde_json`
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> std::result::Result<Vec<u8>, CodecError> {
        Ok(serde_json::to_vec(value)?)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> std::result::Result<T, CodecError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Compact binary via `bincode`
#[derive(Debug, Default, Clone, Copy)]
pub struct BincodeCodec;

impl Codec for BincodeCodec {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> std::result::Result<Vec<u8>, CodecError> {
        Ok(bincode::serialize(value)?)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> std::result::Result<T, CodecError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Name of a format this build has no codec for.
///
/// Only built by parsing, so it never holds the name of a supported format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedFormat(String);

impl UnsupportedFormat {
    /// Format name as read from configuration, surrounding whitespace removed
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnsupportedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serialization mode of a store, fixed at construction.
///
/// Names coming from configuration that this build has no codec for are kept
/// as `Unsupported` so that the error surfaces on first use of the store
/// rather than while parsing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MarshalFormat {
    #[default]
    Json,
    Bincode,
    Unsupported(UnsupportedFormat),
}

impl MarshalFormat {
    /// Lowercase name for known formats, the configured name otherwise
    pub fn name(&self) -> &str {
        match self {
            MarshalFormat::Json => "json",
            MarshalFormat::Bincode => "bincode",
            MarshalFormat::Unsupported(format) => format.name(),
        }
    }

    /// True when a codec backs this format
    pub fn is_supported(&self) -> bool {
        !matches!(self, MarshalFormat::Unsupported(_))
    }

    /// Serialize `value` with this format's codec
    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        let encoded = match self {
            MarshalFormat::Json => JsonCodec.encode(value),
            MarshalFormat::Bincode => BincodeCodec.encode(value),
            MarshalFormat::Unsupported(format) => {
                return Err(SyncVaultError::Configuration(format.to_string()))
            }
        };
        encoded.map_err(SyncVaultError::Encode)
    }

    /// Deserialize `bytes` with this format's codec
    pub fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        let decoded = match self {
            MarshalFormat::Json => JsonCodec.decode(bytes),
            MarshalFormat::Bincode => BincodeCodec.decode(bytes),
            MarshalFormat::Unsupported(format) => {
                return Err(SyncVaultError::Configuration(format.to_string()))
            }
        };
        decoded.map_err(SyncVaultError::Decode)
    }

    /// Fails with a configuration error if no codec backs this format
    pub fn ensure_supported(&self) -> Result<()> {
        match self {
            MarshalFormat::Unsupported(format) => {
                Err(SyncVaultError::Configuration(format.to_string()))
            }
            _ => Ok(()),
        }
    }
}

impl FromStr for MarshalFormat {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let name = s.trim();
        let format = match name.to_ascii_lowercase().as_str() {
            "json" => MarshalFormat::Json,
            "bincode" => MarshalFormat::Bincode,
            _ => MarshalFormat::Unsupported(UnsupportedFormat(name.to_string())),
        };
        Ok(format)
    }
}

impl From<&str> for MarshalFormat {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(format) => format,
            Err(never) => match never {},
        }
    }
}

impl From<String> for MarshalFormat {
    fn from(s: String) -> Self {
        MarshalFormat::from(s.as_str())
    }
}

impl From<MarshalFormat> for String {
    fn from(format: MarshalFormat) -> Self {
        format.name().to_string()
    }
}

impl fmt::Display for MarshalFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
