//! # Storage Error Types Module
//!
//! This module defines the error type returned by key-value store operations.

/// Custom error types for key-value storage operations
#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// Reading or writing the backing file failed
    Io(String),
    /// The backing file could not be encoded or decoded
    Serialization(String),
    /// The store's internal lock was poisoned by a panicking writer
    Poisoned(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(msg) => write!(f, "Storage I/O error: {msg}"),
            StorageError::Serialization(msg) => write!(f, "Storage serialization error: {msg}"),
            StorageError::Poisoned(msg) => write!(f, "Storage lock poisoned: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}
