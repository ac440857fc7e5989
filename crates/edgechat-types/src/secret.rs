//! Credential wrapper that keeps shared secrets out of logs.
//!
//! The plugin backend secret, the model API key and the system prompt are
//! all process-wide values loaded from config or the environment. Wrapping
//! them in [`SecretString`] means a stray `debug!(?config)` never leaks them.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A string that never appears in `Debug`, `Display` or serialized output.
///
/// Use [`expose`](SecretString::expose) at the single point where the value
/// is actually needed (an HTTP header, a prompt).
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    /// Wrap a value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The wrapped value.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether no value has been configured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `None` when unset, otherwise the exposed value.
    pub fn non_empty(&self) -> Option<&str> {
        (!self.0.is_empty()).then_some(self.0.as_str())
    }

    fn redacted(&self) -> &'static str {
        if self.0.is_empty() { "" } else { "[REDACTED]" }
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.redacted())
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.redacted())
    }
}

impl Serialize for SecretString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("")
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self)
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}
