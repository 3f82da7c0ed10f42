//! Binding helpers that store parsed values into caller-owned variables.
//!
//! [`store`] and [`store_opt`] cover the common case of one typed
//! destination; [`one_of`] tries several destination types in order and
//! keeps the first that converts.

use std::any::type_name;
use std::str::FromStr;

use crate::action::Action;
use crate::error::Error;

/// Binds a required-value option to a typed destination.
///
/// The raw value is converted with [`FromStr`]; a failed conversion aborts
/// dispatch with an error naming the value, the target type, and the option.
/// `String` destinations always succeed.
pub fn store<'a, T>(dest: &'a mut T) -> Action<'a>
where
    T: FromStr,
{
    Action::value(move |opt, raw| {
        *dest = raw
            .parse()
            .map_err(|_| Error::conversion(raw, type_label::<T>(), opt.display_name()))?;
        Ok(())
    })
}

/// Binds an optional-value option to an `Option` destination.
///
/// Matching without a value clears the destination; matching with one
/// behaves like [`store`].
pub fn store_opt<'a, T>(dest: &'a mut Option<T>) -> Action<'a>
where
    T: FromStr,
{
    Action::optional(move |opt, raw| {
        *dest = match raw {
            Some(raw) => Some(
                raw.parse()
                    .map_err(|_| Error::conversion(raw, type_label::<T>(), opt.display_name()))?,
            ),
            None => None,
        };
        Ok(())
    })
}

/// Starts a multi-type binding into `dest`.
///
/// Candidate types are added with [`OneOf::or`] and tried in that order;
/// the first successful conversion wins. A `String` candidate always
/// converts, so it only makes sense as the last resort.
///
/// ```
/// use optsend::{Parser, bind};
///
/// #[derive(Debug, PartialEq)]
/// enum Qty {
///     Count(i64),
///     Fraction(f64),
/// }
///
/// # fn main() -> optsend::Result<()> {
/// let mut qty = Qty::Count(0);
/// {
///     let mut parser = Parser::new();
///     parser
///         .add("-q", "", bind::one_of(&mut qty).or(Qty::Count).or(Qty::Fraction))?
///         .parse(["tool", "-q", "2.5"])?
///         .send()?;
/// }
/// assert_eq!(qty, Qty::Fraction(2.5));
/// # Ok(()) }
/// ```
pub fn one_of<V>(dest: &mut V) -> OneOf<'_, V> {
    OneOf {
        dest,
        arms: Vec::new(),
    }
}

/// Builder for a multi-type binding; converts into an [`Action`] at
/// registration.
pub struct OneOf<'a, V> {
    dest: &'a mut V,
    arms: Vec<Arm<'a, V>>,
}

struct Arm<'a, V> {
    label: String,
    convert: Box<dyn Fn(&str) -> Option<V> + 'a>,
}

impl<'a, V> OneOf<'a, V> {
    /// Adds a candidate type, wrapped into the destination by `wrap`.
    #[must_use]
    pub fn or<T>(mut self, wrap: impl Fn(T) -> V + 'a) -> Self
    where
        T: FromStr,
    {
        self.arms.push(Arm {
            label: type_label::<T>(),
            convert: Box::new(move |raw| raw.parse().ok().map(|value| wrap(value))),
        });
        self
    }
}

impl<'a, V> From<OneOf<'a, V>> for Action<'a> {
    fn from(one_of: OneOf<'a, V>) -> Self {
        let OneOf { dest, arms } = one_of;
        Action::value(move |opt, raw| {
            for arm in &arms {
                if let Some(value) = (arm.convert)(raw) {
                    *dest = value;
                    return Ok(());
                }
            }
            Err(Error::no_matching_type(
                opt.display_name(),
                arms.iter().map(|arm| arm.label.clone()).collect(),
            ))
        })
    }
}

/// The type name shown in conversion errors: the last path segment, with
/// string-like types normalized to `string`.
fn type_label<T>() -> String {
    let full = type_name::<T>();
    let name = full.rsplit("::").next().unwrap_or(full);
    if name == "String" {
        "string".to_string()
    } else {
        name.to_string()
    }
}
