//! # Sex Markers
//!
//! [`Sex`] is what a NIC encodes; [`DeclaredGender`] is what an applicant
//! writes on the onboarding form. The form also offers `Other`, which no NIC
//! can encode, so the two are kept as separate types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::nic::Nic;

/// Day values strictly above this threshold encode a woman.
pub const FEMALE_DAY_OFFSET: u16 = 500;

/// Sex encoded in a NIC day field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    /// Day value at most 500.
    Male,
    /// Day value above 500.
    Female,
}

impl Sex {
    /// Map a NIC day value to a sex marker.
    ///
    /// `500` is the last male value and `501` the first female one.
    pub fn from_day_value(day_value: u16) -> Self {
        if day_value > FEMALE_DAY_OFFSET {
            Self::Female
        } else {
            Self::Male
        }
    }

    /// Return the capitalized label (`"Male"` / `"Female"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }

    /// Return the lowercase adjective used in policy messages.
    pub fn adjective(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            _ => Err(ValidationError::InvalidSex(s.to_string())),
        }
    }
}

/// Derive the sex encoded in a parsed NIC.
///
/// Total for every [`Nic`]: parsing already guarantees a numeric day field.
pub fn derive_sex(nic: &Nic) -> Sex {
    let sex = nic.sex();
    tracing::trace!(format = %nic.format(), day_value = nic.day_value(), %sex, "derived sex from NIC");
    sex
}

/// Gender as declared by an applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclaredGender {
    /// Declared male.
    Male,
    /// Declared female.
    Female,
    /// Declared neither; never matches a NIC-derived sex.
    Other,
}

impl DeclaredGender {
    /// The sex marker this declaration corresponds to, if any.
    pub fn as_sex(&self) -> Option<Sex> {
        match self {
            Self::Male => Some(Sex::Male),
            Self::Female => Some(Sex::Female),
            Self::Other => None,
        }
    }

    /// Return the capitalized label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

impl From<Sex> for DeclaredGender {
    fn from(sex: Sex) -> Self {
        match sex {
            Sex::Male => Self::Male,
            Sex::Female => Self::Female,
        }
    }
}

impl fmt::Display for DeclaredGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeclaredGender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            _ => Err(ValidationError::InvalidGender(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_boundaries() {
        assert_eq!(Sex::from_day_value(0), Sex::Male);
        assert_eq!(Sex::from_day_value(1), Sex::Male);
        assert_eq!(Sex::from_day_value(366), Sex::Male);
        assert_eq!(Sex::from_day_value(500), Sex::Male);
        assert_eq!(Sex::from_day_value(501), Sex::Female);
        assert_eq!(Sex::from_day_value(866), Sex::Female);
        assert_eq!(Sex::from_day_value(999), Sex::Female);
    }

    #[test]
    fn derive_sex_from_old_format() {
        let nic = Nic::parse("856234567V").unwrap();
        assert_eq!(derive_sex(&nic), Sex::Female);
    }

    #[test]
    fn derive_sex_from_new_format() {
        let nic = Nic::parse("198523445678").unwrap();
        assert_eq!(derive_sex(&nic), Sex::Male);
    }

    #[test]
    fn derive_sex_at_day_boundaries() {
        assert_eq!(derive_sex(&Nic::parse("855004567V").unwrap()), Sex::Male);
        assert_eq!(derive_sex(&Nic::parse("855014567V").unwrap()), Sex::Female);
        assert_eq!(derive_sex(&Nic::parse("199050012345").unwrap()), Sex::Male);
        assert_eq!(derive_sex(&Nic::parse("199050112345").unwrap()), Sex::Female);
        assert_eq!(derive_sex(&Nic::parse("199086612345").unwrap()), Sex::Female);
    }

    #[test]
    fn sex_parses_case_insensitively() {
        assert_eq!("female".parse::<Sex>().unwrap(), Sex::Female);
        assert_eq!(" MALE ".parse::<Sex>().unwrap(), Sex::Male);
        assert!("other".parse::<Sex>().is_err());
        assert!("".parse::<Sex>().is_err());
    }

    #[test]
    fn declared_gender_parses() {
        assert_eq!(
            "Other".parse::<DeclaredGender>().unwrap(),
            DeclaredGender::Other
        );
        assert_eq!(
            "female".parse::<DeclaredGender>().unwrap(),
            DeclaredGender::Female
        );
        assert_eq!(
            "x".parse::<DeclaredGender>().unwrap_err(),
            ValidationError::InvalidGender("x".to_string())
        );
    }

    #[test]
    fn declared_gender_from_sex() {
        assert_eq!(DeclaredGender::from(Sex::Male), DeclaredGender::Male);
        assert_eq!(DeclaredGender::from(Sex::Female).as_sex(), Some(Sex::Female));
        assert_eq!(DeclaredGender::Other.as_sex(), None);
    }

    #[test]
    fn serde_uses_capitalized_labels() {
        assert_eq!(serde_json::to_string(&Sex::Female).unwrap(), "\"Female\"");
        let g: DeclaredGender = serde_json::from_str("\"Other\"").unwrap();
        assert_eq!(g, DeclaredGender::Other);
        assert!(serde_json::from_str::<DeclaredGender>("\"female\"").is_err());
    }

    #[test]
    fn display_labels() {
        assert_eq!(Sex::Male.to_string(), "Male");
        assert_eq!(Sex::Female.adjective(), "female");
        assert_eq!(DeclaredGender::Other.to_string(), "Other");
    }
}
