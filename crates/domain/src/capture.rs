//! Captured values threaded between steps.
//!
//! A capture rule extracts a value from a step's response body and stores
//! it under a key for later steps of the same scenario. The map is
//! write-once per key and private to one scenario run.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A rule that extracts a value from a response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRule {
    /// Key the extracted value is stored under.
    pub key: String,
    /// JSON Pointer into the response body (e.g., `/id`).
    pub pointer: String,
}

impl CaptureRule {
    /// Creates a new capture rule.
    #[must_use]
    pub fn new(key: impl Into<String>, pointer: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            pointer: pointer.into(),
        }
    }

    /// Validates the pointer syntax.
    ///
    /// RFC 6901 pointers are either empty (the whole document) or start
    /// with `/`; anything else can never resolve.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCapturePointer` for a malformed
    /// pointer.
    pub fn validate(&self) -> DomainResult<()> {
        if self.pointer.is_empty() || self.pointer.starts_with('/') {
            Ok(())
        } else {
            Err(DomainError::InvalidCapturePointer {
                key: self.key.clone(),
                pointer: self.pointer.clone(),
            })
        }
    }

    /// Applies this rule to a response body.
    ///
    /// Returns `None` when the pointer does not resolve; the capture is
    /// then simply absent and a dependent step will report the missing
    /// key.
    #[must_use]
    pub fn extract(&self, body: &serde_json::Value) -> Option<serde_json::Value> {
        body.pointer(&self.pointer).cloned()
    }
}

/// Per-scenario mapping from capture key to JSON value.
///
/// Written once by the step that produces a value, read-only thereafter.
#[derive(Debug, Clone, Default)]
pub struct CaptureMap {
    values: HashMap<String, serde_json::Value>,
}

impl CaptureMap {
    /// Creates an empty capture map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a captured value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DuplicateCaptureKey` if the key was already
    /// written during this scenario run.
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) -> DomainResult<()> {
        let key = key.into();
        if self.values.contains_key(&key) {
            return Err(DomainError::DuplicateCaptureKey(key));
        }
        self.values.insert(key, value);
        Ok(())
    }

    /// Looks up a captured value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.values.get(key)
    }

    /// Returns true if the key has been captured.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Returns the number of captured values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing has been captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
