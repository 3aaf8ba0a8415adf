//! Form rules checked before a request leaves the client.
//!
//! The server re-validates everything; these checks only spare a round trip
//! and give the caller a field-level message.

use thiserror::Error;

use dreamjournal_types::DreamRatings;
use dreamjournal_types::api::{CreateDreamRequest, UpdateProfileRequest};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const RATING_MIN: u8 = 1;
pub const RATING_MAX: u8 = 10;
pub const MAX_TAG_WORDS: usize = 2;
pub const MAX_DISPLAY_NAME_LEN: usize = 32;
pub const MAX_DESCRIPTION_LEN: usize = 160;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("password must be at least 8 characters")]
    PasswordTooShort,

    #[error("passwords must match")]
    PasswordMismatch,

    #[error("{field} must be between 1 and 10, got {value}")]
    RatingOutOfRange { field: &'static str, value: u8 },

    #[error("tag cannot be empty")]
    EmptyTag,

    #[error("tag '{0}' must be at most 2 words")]
    TagTooLong(String),

    #[error("tag '{0}' is already on this dream")]
    DuplicateTag(String),

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("profile image URL must start with http:// or https://")]
    InvalidUrl,
}

pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    validate_email(email)?;
    if password.is_empty() {
        return Err(ValidationError::Required("password"));
    }
    Ok(())
}

pub fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), ValidationError> {
    if username.trim().is_empty() {
        return Err(ValidationError::Required("username"));
    }
    validate_email(email)?;
    validate_password(password)?;
    if password != confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::Required("password"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

/// Accepts `local@domain.tld` with no whitespace anywhere, including around it.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(ValidationError::Required("email"));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidEmail);
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::InvalidEmail);
    };
    let domain_ok = !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, _)| !host.is_empty())
        && !domain.ends_with('.');

    if local.is_empty() || !domain_ok {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

pub fn validate_dream(req: &CreateDreamRequest) -> Result<(), ValidationError> {
    if req.title.trim().is_empty() {
        return Err(ValidationError::Required("title"));
    }
    if req.text.trim().is_empty() {
        return Err(ValidationError::Required("text"));
    }
    validate_ratings(&req.ratings)
}

pub fn validate_ratings(ratings: &DreamRatings) -> Result<(), ValidationError> {
    for (field, value) in ratings.iter() {
        if !(RATING_MIN..=RATING_MAX).contains(&value) {
            return Err(ValidationError::RatingOutOfRange { field, value });
        }
    }
    Ok(())
}

/// Trims a tag and checks the 1-2 word policy. Returns the trimmed tag.
pub fn normalize_tag(tag: &str) -> Result<String, ValidationError> {
    let tag = tag.trim();
    if tag.is_empty() {
        return Err(ValidationError::EmptyTag);
    }
    if tag.split_whitespace().count() > MAX_TAG_WORDS {
        return Err(ValidationError::TagTooLong(tag.to_string()));
    }
    Ok(tag.to_string())
}

/// Appends `candidate` to `existing`, rejecting exact (case-sensitive) duplicates.
pub fn add_tag(existing: &[String], candidate: &str) -> Result<Vec<String>, ValidationError> {
    let tag = normalize_tag(candidate)?;
    if existing.iter().any(|t| *t == tag) {
        return Err(ValidationError::DuplicateTag(tag));
    }

    let mut tags = existing.to_vec();
    tags.push(tag);
    Ok(tags)
}

/// Validates a full replacement tag list and returns it trimmed.
pub fn validate_tags(tags: &[String]) -> Result<Vec<String>, ValidationError> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        out = add_tag(&out, tag)?;
    }
    Ok(out)
}

pub fn validate_comment(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::Required("comment"));
    }
    Ok(())
}

pub fn validate_profile(req: &UpdateProfileRequest) -> Result<(), ValidationError> {
    if req.display_name.chars().count() > MAX_DISPLAY_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "display name",
            max: MAX_DISPLAY_NAME_LEN,
        });
    }
    if req.description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: "description",
            max: MAX_DESCRIPTION_LEN,
        });
    }

    let url = req.profile_image_url.trim();
    if !url.is_empty() && !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ValidationError::InvalidUrl);
    }
    Ok(())
}
