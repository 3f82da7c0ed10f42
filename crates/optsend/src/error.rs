//! Error types for option declaration, scanning, and dispatch.

use std::io;

use thiserror::Error;

/// The result type used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while declaring options, scanning a command line, or
/// dispatching matched actions.
///
/// Every variant is terminal: an error aborts the current `parse` or `send`
/// call and no further matches are applied.
#[derive(Debug, Error)]
pub enum Error {
    /// A name spec given at registration did not parse.
    #[error("invalid option specification '{spec}'")]
    InvalidSpec { spec: String },

    /// A short or long token named an option nobody registered.
    #[error("invalid argument '{name}'")]
    UnknownOption { name: String },

    /// A required-value option matched without a value.
    #[error("argument '{option}' requires value")]
    MissingValue { option: String },

    /// A value was attached to an option that takes none.
    #[error("argument '{option}' does not accept a value")]
    UnexpectedValue { option: String },

    /// A raw value failed conversion to the bound destination type.
    #[error("could not convert '{value}' to type {target} for option '{option}'")]
    Conversion {
        value: String,
        target: String,
        option: String,
    },

    /// A multi-type binding rejected the value under every candidate type.
    #[error(
        "option '{option}' must be one of the following types: {}",
        join_alternatives(.alternatives)
    )]
    NoMatchingType {
        option: String,
        alternatives: Vec<String>,
    },

    /// Writing help or version text to the caller's sink failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Creates an invalid-name-spec error.
    #[must_use]
    pub fn invalid_spec(spec: impl Into<String>) -> Self {
        Self::InvalidSpec { spec: spec.into() }
    }

    /// Creates an unknown-option error.
    #[must_use]
    pub fn unknown_option(name: impl Into<String>) -> Self {
        Self::UnknownOption { name: name.into() }
    }

    /// Creates a missing-value error.
    #[must_use]
    pub fn missing_value(option: impl Into<String>) -> Self {
        Self::MissingValue {
            option: option.into(),
        }
    }

    /// Creates an unexpected-value error.
    #[must_use]
    pub fn unexpected_value(option: impl Into<String>) -> Self {
        Self::UnexpectedValue {
            option: option.into(),
        }
    }

    /// Creates a conversion error.
    #[must_use]
    pub fn conversion(
        value: impl Into<String>,
        target: impl Into<String>,
        option: impl Into<String>,
    ) -> Self {
        Self::Conversion {
            value: value.into(),
            target: target.into(),
            option: option.into(),
        }
    }

    /// Creates a no-matching-type error over the attempted type names.
    #[must_use]
    pub fn no_matching_type(option: impl Into<String>, alternatives: Vec<String>) -> Self {
        Self::NoMatchingType {
            option: option.into(),
            alternatives,
        }
    }
}

/// Joins type names as natural language: "A", "A or B", "A, B, or C".
fn join_alternatives(alternatives: &[String]) -> String {
    match alternatives {
        [] => String::new(),
        [one] => one.clone(),
        [first, second] => format!("{first} or {second}"),
        [head @ .., last] => format!("{}, or {last}", head.join(", ")),
    }
}
