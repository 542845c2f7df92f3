//! Shared utilities: error types and the string transforms used to derive
//! keys, class names and placeholders.

pub mod errors;
pub mod string_utils;
