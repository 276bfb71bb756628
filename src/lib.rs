//! SyncVault - A concurrent in-process key-value store
//!
//! This library provides a thread-safe store that keeps values serialized:
//! - Any `serde` type can be stored and read back by key
//! - JSON or bincode encoding, chosen once per store
//! - Lock-sharded concurrent map for parallel readers and writers

pub mod config;
pub mod error;
pub mod format;
pub mod store;

pub use config::StoreConfig;
pub use error::{CodecError, Result, SyncVaultError};
pub use format::{BincodeCodec, Codec, JsonCodec, MarshalFormat, UnsupportedFormat};
pub use store::{MemoryStore, Store};
