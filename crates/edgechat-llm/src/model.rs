//! The closed set of model ids the edge accepts.

use std::fmt;
use std::str::FromStr;

/// A model id a client may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    /// The security assistant model.
    HackerGpt,
}

impl ModelKind {
    /// Every supported model.
    pub const ALL: [ModelKind; 1] = [ModelKind::HackerGpt];

    /// The id clients send in `model`.
    pub fn id(self) -> &'static str {
        match self {
            ModelKind::HackerGpt => "hackergpt",
        }
    }

    /// Tokens the backend accepts per request (prompt + history + answer).
    pub fn token_limit(self) -> usize {
        match self {
            ModelKind::HackerGpt => 8000,
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// The requested id is not in [`ModelKind::ALL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownModel(pub String);

impl FromStr for ModelKind {
    type Err = UnknownModel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelKind::ALL
            .into_iter()
            .find(|m| m.id() == s)
            .ok_or_else(|| UnknownModel(s.to_owned()))
    }
}
