//! The parser: option registration, scanning, and dispatch.

use crate::action::{Action, ActionKind, ParserHandle};
use crate::error::{Error, Result};
use crate::opt::{Opt, is_long_token, is_short_token};

/// An option parser with deferred dispatch.
///
/// Parsing is two-phase. [`parse`](Parser::parse) scans the token stream
/// left to right and records `(option, value)` matches without running any
/// user code; [`send`](Parser::send) then replays the matches in scan order
/// through the bound actions. Meta actions (help, version) are the
/// exception: they run immediately during the scan and may stop it, in
/// which case the remaining tokens stay unscanned and `send` dispatches
/// nothing.
///
/// Value extraction understands bundled short options (`-abc`), attached
/// values (`-dvalue`, `-d=value`, `--dog=value`), and values in the
/// following token (`-d value`, `--dog value`) provided that token does not
/// itself look like an option. Bare tokens are offered to every positional
/// option, in registration order.
#[derive(Debug, Default)]
pub struct Parser<'a> {
    opts: Vec<Opt>,
    actions: Vec<Action<'a>>,
    matches: Vec<Match>,
    stopped: bool,
}

/// One scan hit: the matched option and the value extracted for it, if any.
#[derive(Debug, Clone)]
struct Match {
    index: usize,
    value: Option<String>,
}

impl<'a> Parser<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an option under `spec` and binds `action` to it.
    ///
    /// The spec grammar is described on [`Opt`]. Registration order decides
    /// help-table order, lookup order for duplicated names, and the order in
    /// which positional options receive bare tokens.
    pub fn add(
        &mut self,
        spec: &str,
        description: &str,
        action: impl Into<Action<'a>>,
    ) -> Result<&mut Self> {
        let action = action.into();
        let opt = Opt::new(spec, action.kind(), description)?;
        self.opts.push(opt);
        self.actions.push(action);
        Ok(self)
    }

    /// Registers a handler for bare tokens.
    ///
    /// Shorthand for [`add`](Parser::add) with an empty name spec and a
    /// required-value action.
    pub fn on_positional(
        &mut self,
        mut handler: impl FnMut(&str) -> Result<()> + 'a,
    ) -> Result<&mut Self> {
        self.add("", "", Action::value(move |_, value| handler(value)))
    }

    /// Every registered option, in registration order.
    pub fn options(&self) -> &[Opt] {
        &self.opts
    }

    /// Whether a meta action stopped the most recent `parse` early.
    pub fn stopped(&self) -> bool {
        self.stopped
    }

    /// Scans `tokens` into a fresh match list.
    ///
    /// `tokens[0]` is taken to be the program name and is skipped. Earlier
    /// matches and the stop flag are cleared first, so a parser can be
    /// reused across argument vectors. Unknown option names fail the scan;
    /// arity mismatches are detected later, by [`send`](Parser::send).
    pub fn parse<I>(&mut self, tokens: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        self.matches.clear();
        self.stopped = false;

        let mut cursor = 1;
        while cursor < tokens.len() && !self.stopped {
            let token = tokens[cursor].as_str();
            if is_short_token(token) {
                cursor = self.scan_short(&tokens, cursor)?;
            } else if is_long_token(token) {
                cursor = self.scan_long(&tokens, cursor)?;
            } else {
                self.scan_positional(token)?;
                cursor += 1;
            }
        }
        Ok(self)
    }

    /// Replays the match list through the bound actions, unless stopped.
    ///
    /// Each match re-validates arity against its action: a no-value action
    /// rejects a collected value and a required-value action rejects a
    /// missing one. The first failing action aborts dispatch.
    pub fn send(&mut self) -> Result<()> {
        if self.stopped {
            return Ok(());
        }
        let Self {
            opts,
            actions,
            matches,
            ..
        } = self;
        for entry in matches.iter() {
            actions[entry.index].apply(&opts[entry.index], entry.value.as_deref())?;
        }
        Ok(())
    }

    /// Scans one short token, expanding bundles left to right.
    ///
    /// Returns the cursor position after this token, which skips the
    /// following token too when it was consumed as a value.
    fn scan_short(&mut self, tokens: &[String], at: usize) -> Result<usize> {
        let Self {
            opts,
            actions,
            matches,
            stopped,
        } = self;
        let token = tokens[at].as_str();
        let mut next = at + 1;

        for (pos, ch) in token.char_indices().skip(1) {
            let compare = format!("-{ch}");
            let Some(index) = opts
                .iter()
                .position(|opt| opt.short_name() == Some(compare.as_str()))
            else {
                return Err(Error::unknown_option(compare));
            };
            let opt = &opts[index];
            let rest = &token[pos + ch.len_utf8()..];

            match opt.kind() {
                ActionKind::Meta => {
                    if rest.starts_with('=') {
                        return Err(Error::unexpected_value(opt.display_name()));
                    }
                    let mut handle = ParserHandle::new(opts, stopped);
                    match &mut actions[index] {
                        Action::Meta(handler) => handler(opt, &mut handle)?,
                        _ => unreachable!("option kind and action variant always agree"),
                    }
                    if *stopped {
                        break;
                    }
                }
                ActionKind::Value | ActionKind::OptionalValue => {
                    if !rest.is_empty() {
                        // The remainder is the value; one leading '=' is
                        // dropped and no further characters are options.
                        let value = rest.strip_prefix('=').unwrap_or(rest);
                        matches.push(Match {
                            index,
                            value: Some(value.to_string()),
                        });
                        break;
                    }
                    let value = match tokens.get(next) {
                        Some(following) if !following.starts_with('-') => {
                            next += 1;
                            Some(following.clone())
                        }
                        _ => None,
                    };
                    matches.push(Match { index, value });
                }
                ActionKind::NoValue => {
                    if let Some(attached) = rest.strip_prefix('=') {
                        // Record the attached value anyway; dispatch rejects it.
                        matches.push(Match {
                            index,
                            value: Some(attached.to_string()),
                        });
                        break;
                    }
                    matches.push(Match { index, value: None });
                }
            }
        }
        Ok(next)
    }

    /// Scans one long token, splitting an attached `=value` off the name.
    fn scan_long(&mut self, tokens: &[String], at: usize) -> Result<usize> {
        let Self {
            opts,
            actions,
            matches,
            stopped,
        } = self;
        let token = tokens[at].as_str();
        let (name, attached) = match token.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (token, None),
        };
        let Some(index) = opts
            .iter()
            .position(|opt| opt.long_name() == Some(name))
        else {
            return Err(Error::unknown_option(name));
        };
        let opt = &opts[index];
        let mut next = at + 1;

        match opt.kind() {
            ActionKind::Meta => {
                if attached.is_some() {
                    return Err(Error::unexpected_value(opt.display_name()));
                }
                let mut handle = ParserHandle::new(opts, stopped);
                match &mut actions[index] {
                    Action::Meta(handler) => handler(opt, &mut handle)?,
                    _ => unreachable!("option kind and action variant always agree"),
                }
            }
            ActionKind::Value | ActionKind::OptionalValue => {
                let value = match attached {
                    Some(value) => Some(value.to_string()),
                    None => match tokens.get(next) {
                        Some(following) if !following.starts_with('-') => {
                            next += 1;
                            Some(following.clone())
                        }
                        _ => None,
                    },
                };
                matches.push(Match { index, value });
            }
            ActionKind::NoValue => {
                matches.push(Match {
                    index,
                    value: attached.map(str::to_string),
                });
            }
        }
        Ok(next)
    }

    /// Offers one bare token to every positional option.
    ///
    /// Positional meta actions run immediately, like named ones.
    fn scan_positional(&mut self, token: &str) -> Result<()> {
        let Self {
            opts,
            actions,
            matches,
            stopped,
        } = self;
        for index in 0..opts.len() {
            if *stopped {
                break;
            }
            let opt = &opts[index];
            if !opt.is_positional() {
                continue;
            }
            if opt.kind() == ActionKind::Meta {
                let mut handle = ParserHandle::new(opts, stopped);
                match &mut actions[index] {
                    Action::Meta(handler) => handler(opt, &mut handle)?,
                    _ => unreachable!("option kind and action variant always agree"),
                }
            } else {
                matches.push(Match {
                    index,
                    value: Some(token.to_string()),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::{bind, help};

    type Log = Rc<RefCell<Vec<String>>>;

    fn log_no_value(log: &Log, tag: &str) -> Action<'static> {
        let log = Rc::clone(log);
        let tag = tag.to_string();
        Action::no_value(move |_| {
            log.borrow_mut().push(tag.clone());
            Ok(())
        })
    }

    fn log_value(log: &Log, tag: &str) -> Action<'static> {
        let log = Rc::clone(log);
        let tag = tag.to_string();
        Action::value(move |_, value| {
            log.borrow_mut().push(format!("{tag}={value}"));
            Ok(())
        })
    }

    fn log_optional(log: &Log, tag: &str) -> Action<'static> {
        let log = Rc::clone(log);
        let tag = tag.to_string();
        Action::optional(move |_, value| {
            log.borrow_mut().push(format!("{tag}={}", value.unwrap_or("?")));
            Ok(())
        })
    }

    fn entries(log: &Log) -> Vec<String> {
        log.borrow().clone()
    }

    #[test]
    fn bundled_short_options_expand_left_to_right() {
        let log: Log = Rc::default();
        let mut parser = Parser::new();
        parser
            .add("-a", "", log_no_value(&log, "a"))
            .unwrap()
            .add("-b", "", log_no_value(&log, "b"))
            .unwrap()
            .add("-c", "", log_value(&log, "c"))
            .unwrap()
            .parse(["prog", "-abc", "X"])
            .unwrap()
            .send()
            .unwrap();
        assert_eq!(entries(&log), ["a", "b", "c=X"]);
    }

    #[test]
    fn short_values_attach_in_every_form() {
        let log: Log = Rc::default();
        let mut parser = Parser::new();
        parser.add("-d,--dog", "", log_value(&log, "d")).unwrap();

        parser.parse(["prog", "-dwoof"]).unwrap().send().unwrap();
        parser.parse(["prog", "-d=woof"]).unwrap().send().unwrap();
        parser.parse(["prog", "-d", "woof"]).unwrap().send().unwrap();
        parser.parse(["prog", "-d="]).unwrap().send().unwrap();
        parser.parse(["prog", "-d", ""]).unwrap().send().unwrap();

        assert_eq!(entries(&log), ["d=woof", "d=woof", "d=woof", "d=", "d="]);
    }

    #[test]
    fn long_equals_and_following_token_match_identically() {
        let log: Log = Rc::default();
        let mut parser = Parser::new();
        parser.add("--name", "", log_value(&log, "name")).unwrap();

        parser.parse(["prog", "--name=value"]).unwrap().send().unwrap();
        parser.parse(["prog", "--name", "value"]).unwrap().send().unwrap();

        assert_eq!(entries(&log), ["name=value", "name=value"]);
    }

    #[test]
    fn missing_value_surfaces_at_dispatch_not_scan() {
        let log: Log = Rc::default();
        let mut parser = Parser::new();
        parser
            .add("--foo", "", log_value(&log, "foo"))
            .unwrap()
            .add("--bar", "", log_no_value(&log, "bar"))
            .unwrap();

        let err = parser
            .parse(["prog", "--foo", "--bar"])
            .unwrap()
            .send()
            .unwrap_err();
        assert_eq!(err.to_string(), "argument '--foo' requires value");
        // Dispatch stops at the failing match, so --bar never runs.
        assert_eq!(entries(&log), Vec::<String>::new());
    }

    #[test]
    fn optional_value_accepts_absence() {
        let log: Log = Rc::default();
        let mut parser = Parser::new();
        parser
            .add("-c,--cat", "", log_optional(&log, "c"))
            .unwrap()
            .add("-s", "", log_no_value(&log, "s"))
            .unwrap();

        parser.parse(["prog", "-c"]).unwrap().send().unwrap();
        parser.parse(["prog", "-c", "meow"]).unwrap().send().unwrap();
        parser.parse(["prog", "-c", "-s"]).unwrap().send().unwrap();

        assert_eq!(entries(&log), ["c=?", "c=meow", "c=?", "s"]);
    }

    #[test]
    fn no_value_option_with_attached_value_fails_dispatch() {
        let log: Log = Rc::default();
        let mut parser = Parser::new();
        parser.add("-s,--snail", "", log_no_value(&log, "s")).unwrap();

        let err = parser
            .parse(["prog", "-s=loud"])
            .unwrap()
            .send()
            .unwrap_err();
        assert_eq!(err.to_string(), "argument '-s' does not accept a value");

        let err = parser
            .parse(["prog", "--snail=loud"])
            .unwrap()
            .send()
            .unwrap_err();
        assert_eq!(err.to_string(), "argument '-s' does not accept a value");

        assert_eq!(entries(&log), Vec::<String>::new());
    }

    #[test]
    fn unknown_options_fail_the_scan() {
        let mut parser = Parser::new();
        parser
            .add("-a", "", Action::no_value(|_| Ok(())))
            .unwrap();

        let err = parser.parse(["prog", "-ax"]).unwrap_err();
        assert_eq!(err.to_string(), "invalid argument '-x'");

        let err = parser.parse(["prog", "--bogus=3"]).unwrap_err();
        assert_eq!(err.to_string(), "invalid argument '--bogus'");

        let err = parser.parse(["prog", "--"]).unwrap_err();
        assert_eq!(err.to_string(), "invalid argument '--'");
    }

    #[test]
    fn bare_dash_matches_nothing() {
        let log: Log = Rc::default();
        let mut parser = Parser::new();
        parser.on_positional({
            let log = Rc::clone(&log);
            move |value| {
                log.borrow_mut().push(value.to_string());
                Ok(())
            }
        })
        .unwrap()
        .parse(["prog", "-"])
        .unwrap()
        .send()
        .unwrap();
        assert_eq!(entries(&log), Vec::<String>::new());
    }

    #[test]
    fn positional_tokens_broadcast_in_registration_order() {
        let log: Log = Rc::default();
        let mut parser = Parser::new();
        parser
            .on_positional({
                let log = Rc::clone(&log);
                move |value| {
                    log.borrow_mut().push(format!("first:{value}"));
                    Ok(())
                }
            })
            .unwrap()
            .add("", "", log_value(&log, "second"))
            .unwrap()
            .parse(["prog", "x", "y"])
            .unwrap()
            .send()
            .unwrap();
        assert_eq!(entries(&log), ["first:x", "second=x", "first:y", "second=y"]);
    }

    #[test]
    fn help_halts_scanning_and_suppresses_dispatch() {
        let log: Log = Rc::default();
        let mut out = Vec::new();
        {
            let mut parser = Parser::new();
            parser
                .add("-d,--dog", "What does the dog say?", log_value(&log, "d"))
                .unwrap()
                .add("--help", "Show this table", help::show(&mut out))
                .unwrap()
                .parse(["prog", "-d", "woof", "--help", "-z"])
                .unwrap()
                .send()
                .unwrap();
            assert!(parser.stopped());
        }
        // -z was never scanned and the dog match was never dispatched.
        assert_eq!(entries(&log), Vec::<String>::new());
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("-d, --dog"));
    }

    #[test]
    fn meta_option_rejects_an_attached_value() {
        let mut out = Vec::new();
        let mut parser = Parser::new();
        parser
            .add("--help", "Show this table", help::show(&mut out))
            .unwrap();

        let err = parser.parse(["prog", "--help=now"]).unwrap_err();
        assert_eq!(err.to_string(), "argument '--help' does not accept a value");
    }

    #[test]
    fn parse_resets_matches_and_stop_flag() {
        let log: Log = Rc::default();
        let mut out = Vec::new();
        let mut parser = Parser::new();
        parser
            .add("-a", "", log_no_value(&log, "a"))
            .unwrap()
            .add("--help", "", help::show(&mut out))
            .unwrap();

        parser.parse(["prog", "--help"]).unwrap();
        assert!(parser.stopped());

        parser.parse(["prog", "-a"]).unwrap().send().unwrap();
        assert!(!parser.stopped());
        assert_eq!(entries(&log), ["a"]);
    }

    #[test]
    fn first_registered_option_wins_duplicate_names() {
        let log: Log = Rc::default();
        let mut parser = Parser::new();
        parser
            .add("-x", "", log_no_value(&log, "first"))
            .unwrap()
            .add("-x", "", log_no_value(&log, "second"))
            .unwrap()
            .parse(["prog", "-x"])
            .unwrap()
            .send()
            .unwrap();
        assert_eq!(entries(&log), ["first"]);
    }

    #[test]
    fn positional_meta_runs_during_scan() {
        let log: Log = Rc::default();
        let mut parser = Parser::new();
        parser
            .add("", "", {
                let log = Rc::clone(&log);
                Action::meta(move |_, parser| {
                    log.borrow_mut().push("meta".to_string());
                    parser.stop();
                    Ok(())
                })
            })
            .unwrap()
            .parse(["prog", "x", "y"])
            .unwrap()
            .send()
            .unwrap();
        assert_eq!(entries(&log), ["meta"]);
    }

    #[test]
    fn stored_destination_round_trips() {
        let mut qty = 0i64;
        {
            let mut parser = Parser::new();
            parser
                .add("-q,--duck", "Duck qty", bind::store(&mut qty))
                .unwrap()
                .parse(["prog", "-q", "42"])
                .unwrap()
                .send()
                .unwrap();
        }
        assert_eq!(qty, 42);
    }
}
