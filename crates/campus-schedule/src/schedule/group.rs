use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A parsed group identifier such as `I1E3`: optional faculty prefix, year
/// digit, cohort letter and numeric subgroup. Lectures omit the subgroup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupCode {
    pub year: u8,
    pub cohort: Option<char>,
    pub subgroup: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GroupParseError {
    #[error("group identifier is empty")]
    Empty,
    #[error("group identifier '{0}' does not carry a year digit")]
    MissingYear(String),
    #[error("group identifier '{0}' has unexpected trailing characters")]
    Trailing(String),
    #[error("group identifier '{0}' has an out of range subgroup")]
    Subgroup(String),
}

impl GroupCode {
    pub fn parse(raw: &str) -> Result<Self, GroupParseError> {
        let token = raw.trim();
        if token.is_empty() {
            return Err(GroupParseError::Empty);
        }

        let rest = token.trim_start_matches(|c: char| c.is_ascii_alphabetic());
        let mut chars = rest.chars();
        let year = chars
            .next()
            .and_then(|c| c.to_digit(10))
            .ok_or_else(|| GroupParseError::MissingYear(token.to_string()))? as u8;

        let rest = chars.as_str();
        let (cohort, rest) = match rest.chars().next() {
            Some(letter) if letter.is_ascii_alphabetic() => (Some(letter), &rest[1..]),
            _ => (None, rest),
        };

        let subgroup = if rest.is_empty() {
            None
        } else if cohort.is_some() && rest.chars().all(|c| c.is_ascii_digit()) {
            Some(
                rest.parse::<u16>()
                    .map_err(|_| GroupParseError::Subgroup(token.to_string()))?,
            )
        } else {
            return Err(GroupParseError::Trailing(token.to_string()));
        };

        Ok(Self {
            year,
            cohort,
            subgroup,
        })
    }

    pub fn is_in_cohort(&self, cohort: char) -> bool {
        self.cohort == Some(cohort)
    }

    pub fn is_subgroup(&self, cohort: char, subgroup: u16) -> bool {
        self.cohort == Some(cohort) && self.subgroup == Some(subgroup)
    }
}

impl FromStr for GroupCode {
    type Err = GroupParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for GroupCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.year)?;
        if let Some(cohort) = self.cohort {
            write!(f, "{cohort}")?;
        }
        if let Some(subgroup) = self.subgroup {
            write!(f, "{subgroup}")?;
        }
        Ok(())
    }
}

/// The `Grupa` column of a course entry. Keeps the raw text for responses and
/// the parsed codes for matching; a single entry may list several groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupAssignment {
    raw: String,
    codes: Vec<GroupCode>,
}

impl GroupAssignment {
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn codes(&self) -> &[GroupCode] {
        &self.codes
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.raw.contains(needle)
    }
}

impl TryFrom<String> for GroupAssignment {
    type Error = GroupParseError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        let codes = raw
            .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(GroupCode::parse)
            .collect::<Result<Vec<_>, _>>()?;

        if codes.is_empty() {
            return Err(GroupParseError::Empty);
        }

        Ok(Self { raw, codes })
    }
}

impl From<GroupAssignment> for String {
    fn from(value: GroupAssignment) -> Self {
        value.raw
    }
}

/// Group name used by the legacy group route, e.g. `E3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CohortSubgroup {
    pub cohort: char,
    pub subgroup: u16,
}

impl CohortSubgroup {
    pub fn parse(raw: &str) -> Option<Self> {
        let mut chars = raw.trim().chars();
        let cohort = chars.next().filter(|c| c.is_ascii_alphabetic())?;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let subgroup = digits.parse().ok()?;
        Some(Self { cohort, subgroup })
    }
}
