use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use crate::validation::ValidationError;

/// A semester of the degree plan, "1" through "10"
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Semester(u8);

impl Semester {
    pub const FIRST: u8 = 1;
    pub const LAST: u8 = 10;

    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if (Self::FIRST..=Self::LAST).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::InvalidSemester(value.to_string()))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn all() -> Vec<Semester> {
        (Self::FIRST..=Self::LAST).map(Semester).collect()
    }
}

impl FromStr for Semester {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        trimmed
            .parse::<u8>()
            .map_err(|_| ValidationError::InvalidSemester(trimmed.to_owned()))
            .and_then(Self::new)
    }
}

impl Display for Semester {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Semester {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Semester> for String {
    fn from(semester: Semester) -> Self {
        semester.to_string()
    }
}
