use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Access level of a user, resolved once when the token is issued.
///
/// The legacy group names used by the HR team (`RH`, `COORDENADORES`,
/// `COLABORADORES`) parse to the matching variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    None,
    FrontLine,
    Coordinator,
    Hr,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::None => "none",
            Role::FrontLine => "front_line",
            Role::Coordinator => "coordinator",
            Role::Hr => "hr",
            Role::Admin => "admin",
        }
    }

    /// Full visibility plus export, delete and hierarchy management.
    pub fn is_hr_or_admin(self) -> bool {
        matches!(self, Role::Hr | Role::Admin)
    }

    /// Unknown values fall back to [`Role::None`], which only sees its own records.
    pub fn from_stored(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(Role::None),
            "front_line" | "colaboradores" => Ok(Role::FrontLine),
            "coordinator" | "coordenadores" => Ok(Role::Coordinator),
            "hr" | "rh" => Ok(Role::Hr),
            "admin" | "superuser" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}
