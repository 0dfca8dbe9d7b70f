use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Course subject a question belongs to. Study pools can be narrowed to one subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Economia,
    Marketing,
    Statistica,
    Finanza,
    Diritto,
    Matematica,
    Informatica,
    Altro,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown subject '{0}'")]
pub struct UnknownSubject(pub String);

impl Subject {
    pub const ALL: [Self; 8] = [
        Self::Economia,
        Self::Marketing,
        Self::Statistica,
        Self::Finanza,
        Self::Diritto,
        Self::Matematica,
        Self::Informatica,
        Self::Altro,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Economia => "economia",
            Self::Marketing => "marketing",
            Self::Statistica => "statistica",
            Self::Finanza => "finanza",
            Self::Diritto => "diritto",
            Self::Matematica => "matematica",
            Self::Informatica => "informatica",
            Self::Altro => "altro",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subject {
    type Err = UnknownSubject;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|subject| subject.as_str() == lowered)
            .ok_or_else(|| UnknownSubject(s.to_string()))
    }
}
