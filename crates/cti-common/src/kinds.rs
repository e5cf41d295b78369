//! Closed vocabularies accepted on the command line.
//!
//! Both enums parse from their exact lowercase spelling only; anything else
//! is reported back as [`UnknownValue`] so the validator can name the
//! offending input.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A string that is not a member of the expected vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value '{0}'")]
pub struct UnknownValue(pub String);

/// Kind of record being imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    /// User profile records.
    #[default]
    Profile,
    /// Event records.
    Event,
}

impl DataType {
    pub fn as_str(self) -> &'static str {
        match self {
            DataType::Profile => "profile",
            DataType::Event => "event",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "profile" => Ok(DataType::Profile),
            "event" => Ok(DataType::Event),
            other => Err(UnknownValue(other.to_string())),
        }
    }
}

/// Data centre hosting the destination account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRegion {
    #[default]
    Eu,
    In,
}

impl AccountRegion {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountRegion::Eu => "eu",
            AccountRegion::In => "in",
        }
    }

    /// Host serving the upload API for accounts in this region.
    pub fn api_host(self) -> &'static str {
        match self {
            AccountRegion::Eu => "eu1.api.clevertap.com",
            AccountRegion::In => "in1.api.clevertap.com",
        }
    }
}

impl fmt::Display for AccountRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountRegion {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eu" => Ok(AccountRegion::Eu),
            "in" => Ok(AccountRegion::In),
            other => Err(UnknownValue(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_type_parses_exact_spelling() {
        assert_eq!("profile".parse::<DataType>(), Ok(DataType::Profile));
        assert_eq!("event".parse::<DataType>(), Ok(DataType::Event));
        assert_eq!(
            "Event".parse::<DataType>(),
            Err(UnknownValue("Event".to_string()))
        );
        assert!("".parse::<DataType>().is_err());
    }

    #[test]
    fn region_parses_exact_spelling() {
        assert_eq!("eu".parse::<AccountRegion>(), Ok(AccountRegion::Eu));
        assert_eq!("in".parse::<AccountRegion>(), Ok(AccountRegion::In));
        assert!("us".parse::<AccountRegion>().is_err());
        assert!(" eu".parse::<AccountRegion>().is_err());
    }

    #[test]
    fn defaults_match_cli_defaults() {
        assert_eq!(DataType::default(), DataType::Profile);
        assert_eq!(AccountRegion::default(), AccountRegion::Eu);
    }

    #[test]
    fn region_hosts() {
        assert_eq!(AccountRegion::Eu.api_host(), "eu1.api.clevertap.com");
        assert_eq!(AccountRegion::In.api_host(), "in1.api.clevertap.com");
    }

    #[test]
    fn serde_uses_cli_spelling() {
        assert_eq!(serde_json::to_string(&DataType::Event).unwrap(), "\"event\"");
        assert_eq!(serde_json::to_string(&AccountRegion::In).unwrap(), "\"in\"");
    }
}
