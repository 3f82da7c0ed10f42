//! Actions bound to options and the arity checking applied at dispatch.

use std::fmt;

use crate::error::{Error, Result};
use crate::opt::Opt;

/// The arity of an action, recorded on the owning [`Opt`].
///
/// The scanner consults this tag to decide whether a matched option should
/// extract a value, and dispatch re-checks it against the value actually
/// collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// The action accepts no value.
    NoValue,
    /// The action requires a value.
    Value,
    /// The action accepts a value when one can be extracted.
    OptionalValue,
    /// The action runs during scanning with a handle to the parser.
    Meta,
}

/// A handler bound to an option.
///
/// The lifetime `'a` lets handlers borrow caller-owned state, which is how
/// the [`bind`](crate::bind) helpers store parsed values into local
/// variables. Handlers run during `send`, in the order their options matched
/// on the command line; meta actions run immediately during `parse` instead.
pub enum Action<'a> {
    /// Called with the matched option only.
    NoValue(Box<dyn FnMut(&Opt) -> Result<()> + 'a>),
    /// Called with the matched option and its extracted value.
    Value(Box<dyn FnMut(&Opt, &str) -> Result<()> + 'a>),
    /// Called with the matched option and its value, if one was extracted.
    OptionalValue(Box<dyn FnMut(&Opt, Option<&str>) -> Result<()> + 'a>),
    /// Called during scanning with a handle to the live parser.
    Meta(Box<dyn FnMut(&Opt, &mut ParserHandle<'_>) -> Result<()> + 'a>),
}

impl<'a> Action<'a> {
    /// Wraps a handler that takes no value.
    pub fn no_value(handler: impl FnMut(&Opt) -> Result<()> + 'a) -> Self {
        Self::NoValue(Box::new(handler))
    }

    /// Wraps a handler that requires a value.
    pub fn value(handler: impl FnMut(&Opt, &str) -> Result<()> + 'a) -> Self {
        Self::Value(Box::new(handler))
    }

    /// Wraps a handler that accepts an optional value.
    pub fn optional(handler: impl FnMut(&Opt, Option<&str>) -> Result<()> + 'a) -> Self {
        Self::OptionalValue(Box::new(handler))
    }

    /// Wraps a meta handler, invoked during scanning.
    pub fn meta(handler: impl FnMut(&Opt, &mut ParserHandle<'_>) -> Result<()> + 'a) -> Self {
        Self::Meta(Box::new(handler))
    }

    /// The arity tag copied onto the owning [`Opt`] at registration.
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::NoValue(_) => ActionKind::NoValue,
            Self::Value(_) => ActionKind::Value,
            Self::OptionalValue(_) => ActionKind::OptionalValue,
            Self::Meta(_) => ActionKind::Meta,
        }
    }

    /// Invokes the handler with a collected value, re-validating arity.
    ///
    /// A no-value action rejects a present value and a required-value action
    /// rejects an absent one; both errors name the option canonically.
    pub(crate) fn apply(&mut self, opt: &Opt, value: Option<&str>) -> Result<()> {
        match self {
            Self::NoValue(handler) => match value {
                None => handler(opt),
                Some(_) => Err(Error::unexpected_value(opt.display_name())),
            },
            Self::Value(handler) => match value {
                Some(value) => handler(opt, value),
                None => Err(Error::missing_value(opt.display_name())),
            },
            Self::OptionalValue(handler) => handler(opt, value),
            // Meta actions are invoked during scanning and never collected.
            Self::Meta(_) => unreachable!("meta actions are not dispatched"),
        }
    }
}

impl fmt::Debug for Action<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Action").field(&self.kind()).finish()
    }
}

/// The restricted view of a parser handed to meta actions.
///
/// A meta action can inspect the registered options and request that
/// scanning and dispatch stop; it cannot re-enter `parse`.
pub struct ParserHandle<'p> {
    opts: &'p [Opt],
    stopped: &'p mut bool,
}

impl<'p> ParserHandle<'p> {
    pub(crate) fn new(opts: &'p [Opt], stopped: &'p mut bool) -> Self {
        Self { opts, stopped }
    }

    /// Every registered option, in registration order.
    pub fn options(&self) -> &[Opt] {
        self.opts
    }

    /// Halts scanning after this action returns and suppresses dispatch.
    pub fn stop(&mut self) {
        *self.stopped = true;
    }
}
