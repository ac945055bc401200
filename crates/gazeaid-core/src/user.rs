//! User roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Who a user is in the clinic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Patient,
    Doctor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Doctor => "doctor",
        }
    }

    /// Parse a role, falling back to `Patient` for anything unrecognised.
    pub fn parse_or_patient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "patient" => Ok(Self::Patient),
            "doctor" => Ok(Self::Doctor),
            _ => Err(CoreError::InvalidRole(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roles() {
        assert_eq!("doctor".parse::<Role>(), Ok(Role::Doctor));
        assert_eq!("Patient".parse::<Role>(), Ok(Role::Patient));
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_parse_or_patient() {
        assert_eq!(Role::parse_or_patient("DOCTOR"), Role::Doctor);
        assert_eq!(Role::parse_or_patient("nurse"), Role::Patient);
    }

    #[test]
    fn test_display() {
        assert_eq!(Role::Doctor.to_string(), "doctor");
        assert_eq!(format!("{}", Role::Patient), "patient");
    }
}
