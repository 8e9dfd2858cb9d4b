//! Input validation, applied before any database or storage call.

use uuid::Uuid;

use crate::config;
use crate::database::models::RequestStatus;
use crate::error::ApiError;

const NAME_MIN: usize = 6;
const NAME_MAX: usize = 18;

pub fn validate_signup(name: &str, password: &str) -> Result<(), ApiError> {
    if name.is_empty() {
        return Err(ApiError::bad_request("invalid parameter: name"));
    }
    if password.is_empty() {
        return Err(ApiError::bad_request("invalid parameter: password"));
    }

    let name_len = name.chars().count();
    let password_len = password.chars().count();
    if !(NAME_MIN..=NAME_MAX).contains(&name_len)
        || !(NAME_MIN..=NAME_MAX).contains(&password_len)
    {
        return Err(ApiError::bad_request("invalid parameter: wrong length"));
    }

    Ok(())
}

pub fn validate_login(name: &str, password: &str) -> Result<(), ApiError> {
    if name.is_empty() {
        return Err(ApiError::bad_request("invalid parameter: name"));
    }
    if password.is_empty() {
        return Err(ApiError::bad_request("invalid parameter: password"));
    }
    Ok(())
}

/// Candidate names are one or two words, each 2-16 letters. Any Unicode
/// letter is accepted.
pub fn validate_person_name(value: &str, field: &str) -> Result<(), ApiError> {
    let words: Vec<&str> = value.split(' ').collect();
    let well_formed = !value.is_empty()
        && words.len() <= 2
        && words.iter().all(|word| {
            let len = word.chars().count();
            (2..=16).contains(&len) && word.chars().all(char::is_alphabetic)
        });

    if !well_formed {
        return Err(ApiError::bad_request(format!(
            "invalid parameter: {} has invalid format",
            field
        )));
    }

    Ok(())
}

/// An absent or empty status means "no filter"; anything else must be one of
/// the three legal states (case-insensitive).
pub fn validate_status_filter(
    status: Option<&str>,
) -> Result<Option<RequestStatus>, ApiError> {
    match status {
        None => Ok(None),
        Some("") => Ok(None),
        Some(value) => RequestStatus::parse(value)
            .map(Some)
            .ok_or_else(|| ApiError::bad_request("invalid parameter: request status")),
    }
}

/// Resolve page number and size, defaulting absent values and rejecting
/// anything that is not a positive integer. Oversized page sizes are capped
/// at the configured maximum.
pub fn validate_pagination(
    page: Option<&str>,
    size: Option<&str>,
) -> Result<(u32, u32), ApiError> {
    let api = &config::config().api;

    let page_number = match page {
        None | Some("") => 1,
        Some(value) => parse_positive(value)
            .ok_or_else(|| ApiError::bad_request("invalid parameter: page"))?,
    };

    let page_size = match size {
        None | Some("") => api.default_page_size,
        Some(value) => parse_positive(value)
            .ok_or_else(|| ApiError::bad_request("invalid parameter: size"))?,
    };

    Ok((page_number, page_size.min(api.max_page_size)))
}

pub fn parse_uuid(value: &str, field: &str) -> Result<Uuid, ApiError> {
    value
        .parse::<Uuid>()
        .map_err(|_| ApiError::bad_request(format!("invalid parameter: {}", field)))
}

/// Strictly positive decimal integer with no sign or leading zero.
fn parse_positive(value: &str) -> Option<u32> {
    if value.is_empty() || value.starts_with('0') || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}
