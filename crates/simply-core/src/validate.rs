//! Client-side check of the deploy domain field.
//!
//! Deliberately loose: anything non-empty without a space is accepted.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainError {
    #[error("Please enter a domain name.")]
    Empty,

    #[error("Domain cannot contain spaces.")]
    ContainsSpace,
}

pub fn validate_domain(value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Empty);
    }
    if value.contains(' ') {
        return Err(DomainError::ContainsSpace);
    }
    Ok(())
}
