use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::rating::{MAX_RATING, MIN_RATING};

pub const MIN_CREDITS: i32 = 1;
pub const MAX_CREDITS: i32 = 10;
pub const MAX_COMMENT_LEN: usize = 500;
pub const MIN_PASSWORD_LEN: usize = 6;

lazy_static! {
    static ref EMAIL: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref SUBJECT_CODE: Regex = Regex::new(r"^[A-Z0-9][A-Z0-9-]*$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("invalid email address")]
    InvalidEmail,
    #[error("credits must be between 1 and 10, got {0}")]
    CreditsOutOfRange(i32),
    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(i32),
    #[error("comment must be at most 500 characters, got {0}")]
    CommentTooLong(usize),
    #[error("invalid semester: {0}")]
    InvalidSemester(String),
    #[error("unknown subject type: {0}")]
    InvalidSubjectType(String),
    #[error("invalid subject code: {0}")]
    InvalidSubjectCode(String),
    #[error("password must be at least 6 characters")]
    PasswordTooShort,
}

/// Trims `value` and rejects it when nothing is left
pub fn require(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(trimmed.to_owned())
    }
}

/// Trims an optional field, mapping blank input to `None`
pub fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Validates and lower-cases an email address
pub fn normalize_email(email: &str) -> Result<String, ValidationError> {
    let email = require("email", email)?.to_lowercase();
    if EMAIL.is_match(&email) {
        Ok(email)
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

pub fn validate_credits(credits: i32) -> Result<i16, ValidationError> {
    if (MIN_CREDITS..=MAX_CREDITS).contains(&credits) {
        Ok(credits as i16)
    } else {
        Err(ValidationError::CreditsOutOfRange(credits))
    }
}

pub fn validate_rating(rating: i32) -> Result<i16, ValidationError> {
    if (i32::from(MIN_RATING)..=i32::from(MAX_RATING)).contains(&rating) {
        Ok(rating as i16)
    } else {
        Err(ValidationError::RatingOutOfRange(rating))
    }
}

/// Trims a review comment and enforces the length limit in characters
pub fn validate_comment(comment: &str) -> Result<String, ValidationError> {
    let comment = require("comment", comment)?;
    let len = comment.chars().count();
    if len > MAX_COMMENT_LEN {
        Err(ValidationError::CommentTooLong(len))
    } else {
        Ok(comment)
    }
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        Err(ValidationError::PasswordTooShort)
    } else {
        Ok(())
    }
}

/// Upper-cases a subject code so that uniqueness is case-insensitive
pub fn normalize_subject_code(code: &str) -> Result<String, ValidationError> {
    let code = require("code", code)?.to_uppercase();
    if SUBJECT_CODE.is_match(&code) {
        Ok(code)
    } else {
        Err(ValidationError::InvalidSubjectCode(code))
    }
}

/// Normalizes every prerequisite code, dropping blanks and repeats
pub fn normalize_prerequisites(codes: &[String]) -> Result<Vec<String>, ValidationError> {
    let mut normalized: Vec<String> = Vec::with_capacity(codes.len());
    for code in codes.iter().filter(|c| !c.trim().is_empty()) {
        let code = normalize_subject_code(code)?;
        if !normalized.contains(&code) {
            normalized.push(code);
        }
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert_eq!(
            normalize_email(" Profe@UANL.edu.mx "),
            Ok("profe@uanl.edu.mx".to_string())
        );
        assert_eq!(normalize_email("no-at-sign.mx"), Err(ValidationError::InvalidEmail));
        assert_eq!(normalize_email("a b@c.mx"), Err(ValidationError::InvalidEmail));
        assert_eq!(normalize_email("   "), Err(ValidationError::Required("email")));
    }

    #[test]
    fn test_credits_range() {
        assert_eq!(validate_credits(1), Ok(1));
        assert_eq!(validate_credits(10), Ok(10));
        assert_eq!(validate_credits(0), Err(ValidationError::CreditsOutOfRange(0)));
        assert_eq!(validate_credits(11), Err(ValidationError::CreditsOutOfRange(11)));
        assert_eq!(validate_credits(-3), Err(ValidationError::CreditsOutOfRange(-3)));
    }

    #[test]
    fn test_rating_range() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
    }

    #[test]
    fn test_comment_length_counts_characters() {
        let accented = "á".repeat(MAX_COMMENT_LEN);
        assert!(validate_comment(&accented).is_ok());
        let too_long = "a".repeat(MAX_COMMENT_LEN + 1);
        assert_eq!(
            validate_comment(&too_long),
            Err(ValidationError::CommentTooLong(MAX_COMMENT_LEN + 1))
        );
        assert_eq!(validate_comment("  "), Err(ValidationError::Required("comment")));
    }

    #[test]
    fn test_subject_code_is_upper_cased() {
        assert_eq!(normalize_subject_code(" mat101 "), Ok("MAT101".to_string()));
        assert_eq!(normalize_subject_code("lab-fis2"), Ok("LAB-FIS2".to_string()));
        assert!(normalize_subject_code("mat 101").is_err());
        assert!(normalize_subject_code("").is_err());
    }

    #[test]
    fn test_prerequisites_are_normalized_and_unique() {
        let codes = vec![
            "mat101".to_string(),
            "MAT101".to_string(),
            " ".to_string(),
            "fis100".to_string(),
        ];
        assert_eq!(
            normalize_prerequisites(&codes),
            Ok(vec!["MAT101".to_string(), "FIS100".to_string()])
        );
    }

    #[test]
    fn test_optional_blank_is_none() {
        assert_eq!(optional(Some("  ")), None);
        assert_eq!(optional(Some(" Dr. ")), Some("Dr.".to_string()));
        assert_eq!(optional(None), None);
    }
}
