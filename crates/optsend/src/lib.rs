//! Callback-driven command-line option parsing with deferred dispatch.
//!
//! Options are declared on a [`Parser`] with a name spec (`"-q,--quantity"`,
//! `"--help"`, `""` for positionals) and an [`Action`] that says whether the
//! option takes a value. Argument handling is then two-phase:
//!
//! - [`Parser::parse`] scans the tokens, expands short-option bundles,
//!   extracts attached and following-token values, and records the matches.
//!   Only meta actions (help, version) run here.
//! - [`Parser::send`] replays the recorded matches through the bound
//!   actions, in the order they were scanned.
//!
//! The split means an argument vector is validated against the declared
//! option names before any handler runs, and that `--help` can abandon both
//! phases cleanly. Typed destinations are covered by [`bind`] and help
//! output by [`help`].
//!
//! # Example
//!
//! ```
//! use optsend::{Parser, bind};
//!
//! # fn main() -> optsend::Result<()> {
//! let mut qty = 0i64;
//! {
//!     let mut parser = Parser::new();
//!     parser.add("-q,--quantity", "How many to make", bind::store(&mut qty))?;
//!     parser.parse(["tool", "--quantity", "3"])?.send()?;
//! }
//! assert_eq!(qty, 3);
//! # Ok(()) }
//! ```

mod action;
pub mod bind;
mod error;
pub mod help;
mod opt;
mod parser;

pub use action::{Action, ActionKind, ParserHandle};
pub use error::{Error, Result};
pub use opt::Opt;
pub use parser::Parser;
