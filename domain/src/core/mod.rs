//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level errors
//! - [`string`]: UTF-8 safe truncation helpers used for UI display
//! - [`duration`]: human-readable duration formatting

pub mod duration;
pub mod error;
pub mod string;
