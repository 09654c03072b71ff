//! Predefined handlers.
//!
//! Each constructor takes an accessor selecting the field of the context to mutate
//! and returns a closure that can be passed to [`crate::DefinitionBuilder::handler`].
//!
//! ```
//! use argdef::{callbacks, Definition, Definitions, Matcher};
//!
//! #[derive(Default)]
//! struct App { jobs: i32, verbose: i32 }
//!
//! let mut defs = Definitions::new();
//! defs.add(Definition::builder()
//!         .short('j')
//!         .param("N")
//!         .handler(callbacks::set_int(|app: &mut App| &mut app.jobs))
//!         .build().unwrap());
//! defs.add(Definition::builder()
//!         .short('v')
//!         .handler(callbacks::increment(|app: &mut App| &mut app.verbose))
//!         .build().unwrap());
//!
//! let mut app = App::default();
//! Matcher::new(&defs).process_args(&["prog", "-j4", "-v", "-v"], &mut app).unwrap();
//! assert_eq!(4, app.jobs);
//! assert_eq!(2, app.verbose);
//! ```

use std::num::{IntErrorKind, ParseIntError};
use std::str::FromStr;

use crate::definition::Definition;
use crate::error::{HandlerError, HandlerResult};

/// Integer types accepted by [`set_number`], [`increment`] and [`decrement`].
pub trait Integer: Copy + PartialEq + FromStr<Err = ParseIntError> {
    const MIN: Self;
    const MAX: Self;

    fn increment(self) -> Self;

    fn decrement(self) -> Self;
}

macro_rules! impl_integer {
    ($($t:ty),*) => {
        $(
            impl Integer for $t {
                const MIN: Self = <$t>::MIN;
                const MAX: Self = <$t>::MAX;

                fn increment(self) -> Self {
                    self.saturating_add(1)
                }

                fn decrement(self) -> Self {
                    self.saturating_sub(1)
                }
            }
        )*
    };
}

impl_integer!(i8, i16, i32, i64, isize);

/// Store a copy of the value, replacing the previous one.
pub fn set_str<C, F>(field: F) -> impl Fn(&Definition<C>, Option<&str>, &mut C) -> HandlerResult
where
    F: Fn(&mut C) -> &mut Option<String>,
{
    move |_: &Definition<C>, value: Option<&str>, ctx: &mut C| {
        *field(ctx) = value.map(|v| v.to_owned());
        Ok(())
    }
}

/// Store a fixed value, the matched value is ignored.
///
/// Covers the classic "set to 0", "set to 1" and "set to -1" flags.
pub fn set_const<C, F, T>(field: F, constant: T) -> impl Fn(&Definition<C>, Option<&str>, &mut C) -> HandlerResult
where
    F: Fn(&mut C) -> &mut T,
    T: Clone,
{
    move |_: &Definition<C>, _: Option<&str>, ctx: &mut C| {
        *field(ctx) = constant.clone();
        Ok(())
    }
}

/// Parse the value as a decimal integer.
///
/// Fails with:
/// - [`HandlerError::MissingValue`] when the value is absent or empty.
/// - [`HandlerError::NotNumeric`] when the value has trailing content, e.g. `12x`.
/// - [`HandlerError::Underflow`] / [`HandlerError::Overflow`] when the value is out of range
///   or equal to the type's extreme.
pub fn set_number<C, F, T>(field: F) -> impl Fn(&Definition<C>, Option<&str>, &mut C) -> HandlerResult
where
    F: Fn(&mut C) -> &mut T,
    T: Integer,
{
    move |_: &Definition<C>, value: Option<&str>, ctx: &mut C| {
        *field(ctx) = parse_number(value)?;
        Ok(())
    }
}

/// [`set_number`] for `i32` fields.
pub fn set_int<C, F>(field: F) -> impl Fn(&Definition<C>, Option<&str>, &mut C) -> HandlerResult
where
    F: Fn(&mut C) -> &mut i32,
{
    set_number(field)
}

/// [`set_number`] for `i64` fields.
pub fn set_long<C, F>(field: F) -> impl Fn(&Definition<C>, Option<&str>, &mut C) -> HandlerResult
where
    F: Fn(&mut C) -> &mut i64,
{
    set_number(field)
}

pub fn increment<C, F, T>(field: F) -> impl Fn(&Definition<C>, Option<&str>, &mut C) -> HandlerResult
where
    F: Fn(&mut C) -> &mut T,
    T: Integer,
{
    move |_: &Definition<C>, _: Option<&str>, ctx: &mut C| {
        let n = field(ctx);
        *n = n.increment();
        Ok(())
    }
}

pub fn decrement<C, F, T>(field: F) -> impl Fn(&Definition<C>, Option<&str>, &mut C) -> HandlerResult
where
    F: Fn(&mut C) -> &mut T,
    T: Integer,
{
    move |_: &Definition<C>, _: Option<&str>, ctx: &mut C| {
        let n = field(ctx);
        *n = n.decrement();
        Ok(())
    }
}

/// Accept the match and do nothing.
pub fn noop<C>() -> impl Fn(&Definition<C>, Option<&str>, &mut C) -> HandlerResult {
    |_: &Definition<C>, _: Option<&str>, _: &mut C| Ok(())
}

/// Print `message` to stderr and abort processing.
///
/// Useful for deprecated or forbidden flags.
pub fn error<C>(message: &str) -> impl Fn(&Definition<C>, Option<&str>, &mut C) -> HandlerResult {
    let message = message.to_owned();
    move |_: &Definition<C>, _: Option<&str>, _: &mut C| {
        eprintln!("{}", message);
        Err(HandlerError::Message(message.clone()))
    }
}

fn parse_number<T: Integer>(value: Option<&str>) -> Result<T, HandlerError> {
    let text = match value {
        Some(v) if !v.is_empty() => v,
        _ => return Err(HandlerError::MissingValue),
    };
    match text.trim_start().parse::<T>() {
        Ok(n) if n == T::MIN => Err(HandlerError::Underflow(text.to_string())),
        Ok(n) if n == T::MAX => Err(HandlerError::Overflow(text.to_string())),
        Ok(n) => Ok(n),
        Err(e) => Err(match e.kind() {
            IntErrorKind::Empty => HandlerError::MissingValue,
            IntErrorKind::PosOverflow => HandlerError::Overflow(text.to_string()),
            IntErrorKind::NegOverflow => HandlerError::Underflow(text.to_string()),
            _ => HandlerError::NotNumeric(text.to_string()),
        }),
    }
}
