//! Option descriptors and the name-spec grammar.

use crate::action::ActionKind;
use crate::error::{Error, Result};

/// A declared option: an optional short name, an optional long name, a
/// description, and the arity of its bound action.
///
/// An `Opt` is built once from a name spec at registration time and is
/// immutable afterwards. The accepted specs are `"-d,--dog"` (both names),
/// `"--dog"` (long only), `"-d"` (short only), and `""` (positional, matched
/// against bare tokens). Spaces around each part are trimmed, so padded specs
/// like `"    --help"` are fine.
#[derive(Debug, Clone)]
pub struct Opt {
    short: Option<String>,
    long: Option<String>,
    description: String,
    kind: ActionKind,
}

impl Opt {
    pub(crate) fn new(spec: &str, kind: ActionKind, description: &str) -> Result<Self> {
        let (short, long) = parse_name_spec(spec)?;
        Ok(Self {
            short,
            long,
            description: description.to_string(),
            kind,
        })
    }

    /// The short name including its dash, e.g. `-d`.
    pub fn short_name(&self) -> Option<&str> {
        self.short.as_deref()
    }

    /// The long name including its dashes, e.g. `--dog`.
    pub fn long_name(&self) -> Option<&str> {
        self.long.as_deref()
    }

    /// The description shown in help output.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The arity of the bound action.
    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    /// Whether this option matches bare tokens instead of named ones.
    pub fn is_positional(&self) -> bool {
        self.short.is_none() && self.long.is_none()
    }

    /// The name used when reporting errors about this option: the short name
    /// if present, otherwise the long name.
    pub fn display_name(&self) -> &str {
        self.short
            .as_deref()
            .or(self.long.as_deref())
            .unwrap_or("<<unknown>>")
    }
}

/// Splits a name spec into its short and long names.
///
/// A two-part spec must be short + long in that order. A one-part spec is
/// taken as whichever form it is. An empty spec declares a positional option.
fn parse_name_spec(spec: &str) -> Result<(Option<String>, Option<String>)> {
    match spec.split_once(',') {
        Some((first, second)) => {
            let short = first.trim_matches(' ');
            let long = second.trim_matches(' ');
            if is_short_name(short) && is_long_name(long) {
                Ok((Some(short.to_string()), Some(long.to_string())))
            } else {
                Err(Error::invalid_spec(spec))
            }
        }
        None => {
            let name = spec.trim_matches(' ');
            if name.is_empty() {
                Ok((None, None))
            } else if is_long_name(name) {
                Ok((None, Some(name.to_string())))
            } else if is_short_name(name) {
                Ok((Some(name.to_string()), None))
            } else {
                Err(Error::invalid_spec(spec))
            }
        }
    }
}

/// A valid short name is a dash plus exactly one non-dash character.
fn is_short_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next() == Some('-')
        && matches!(chars.next(), Some(c) if c != '-')
        && chars.next().is_none()
}

/// A valid long name is `--` plus at least one character.
fn is_long_name(name: &str) -> bool {
    name.len() > 2 && name.starts_with("--")
}

/// True for tokens beginning with a single dash, including the bare `-`.
pub(crate) fn is_short_token(token: &str) -> bool {
    token.starts_with('-') && !token.starts_with("--")
}

/// True for tokens beginning with `--`, including the bare `--`.
pub(crate) fn is_long_token(token: &str) -> bool {
    token.starts_with("--")
}
