use std::env;

use tracing::{debug, trace};

use crate::definition::{Definition, Definitions};
use crate::env::{env_list, process_env};
use crate::error::{HandlerError, HandlerResult, ProcessErr};

/// Handler for tokens no definition matches. It receives the raw token.
pub type BadArgumentHandler<C> = Box<dyn Fn(&str, &mut C) -> HandlerResult>;

/// Token classes handled by one scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Flags,
    Values,
    Both,
    FindValue,
}

impl Mode {
    fn handles_flags(self) -> bool {
        matches!(self, Mode::Flags | Mode::Both)
    }

    fn handles_values(self) -> bool {
        !matches!(self, Mode::Flags)
    }

    fn is_find_only(self) -> bool {
        self == Mode::FindValue
    }
}

enum Scan {
    Completed,
    Found(usize),
}

enum Match {
    Accepted,
    Rejected,
    Aborted(HandlerError),
}

/// Matches an argument vector against a [`Definitions`] table and runs the handlers.
///
/// Slot 0 of the arguments is the program name and is never matched.
///
/// Tokens are classified in this order:
/// - `-c...` is a short flag. `-c` for a pure flag, `-cVALUE` or `-c VALUE` for a
///   definition with a value.
/// - `--name...` is a long flag. `--name` for a pure flag, `--name=VALUE` for a definition
///   with a value.
/// - anything else, `-` included, is a standalone value for the first positional definition.
///
/// The first definition whose name fits decides: when its form does not fit the token, the
/// token is unrecognized, later definitions are not consulted.
///
/// # Examples
///
/// ```
/// use argdef::{callbacks, Definition, Definitions, Matcher};
///
/// #[derive(Default)]
/// struct App { file: Option<String>, inputs: Vec<String> }
///
/// let mut defs = Definitions::new();
/// defs.add(Definition::builder()
///         .short('f')
///         .long("file")
///         .param("FILE")
///         .handler(callbacks::set_str(|app: &mut App| &mut app.file))
///         .build().unwrap());
/// defs.add(Definition::builder()
///         .param("INPUT")
///         .handler(|_, v, app: &mut App| {
///             app.inputs.extend(v.map(String::from));
///             Ok(())
///         })
///         .build().unwrap());
///
/// let mut app = App::default();
/// let matcher = Matcher::new(&defs);
/// matcher.process_args(&["prog", "a.txt", "--file=out.txt", "b.txt"], &mut app).unwrap();
/// assert_eq!(Some("out.txt".to_string()), app.file);
/// assert_eq!(vec!["a.txt", "b.txt"], app.inputs);
///
/// let err = matcher.process_args(&["prog", "--nope"], &mut app).unwrap_err();
/// assert_eq!(Some(1), err.index());
/// ```
pub struct Matcher<'a, C> {
    definitions: &'a Definitions<C>,
    env_definitions: Option<&'a Definitions<C>>,
    bad_argument: Option<BadArgumentHandler<C>>,
}

/// A builder struct to create [`Matcher`].
pub struct MatcherBuilder<'a, C> {
    definitions: &'a Definitions<C>,
    env_definitions: Option<&'a Definitions<C>>,
    bad_argument: Option<BadArgumentHandler<C>>,
}

impl<'a, C> MatcherBuilder<'a, C> {
    pub fn build(self) -> Matcher<'a, C> {
        Matcher {
            definitions: self.definitions,
            env_definitions: self.env_definitions,
            bad_argument: self.bad_argument,
        }
    }

    /// Set the definitions of environment variables processed by [`Matcher::process`]
    /// and [`Matcher::process_ltr`] before the arguments.
    pub fn env_definitions(mut self, definitions: &'a Definitions<C>) -> Self {
        self.env_definitions = Some(definitions);
        self
    }

    /// Set the handler for unrecognized tokens.
    ///
    /// When it returns `Ok` the token is skipped and processing continues.
    /// Without a handler an unrecognized token stops processing with
    /// [`ProcessErr::BadArgument`].
    pub fn bad_argument<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str, &mut C) -> HandlerResult + 'static,
    {
        self.bad_argument = Some(Box::new(handler));
        self
    }
}

impl<'a, C> Matcher<'a, C> {
    /// Create a matcher without bad argument handler and environment definitions.
    pub fn new(definitions: &'a Definitions<C>) -> Matcher<'a, C> {
        Self::builder(definitions).build()
    }

    /// Get the builder to config the matcher.
    pub fn builder(definitions: &'a Definitions<C>) -> MatcherBuilder<'a, C> {
        MatcherBuilder {
            definitions,
            env_definitions: None,
            bad_argument: None,
        }
    }

    /// Process the environment, then all flags, then all standalone values.
    ///
    /// Every flag handler has run before the first standalone value is handled.
    /// Also see [`Self::process_ltr`].
    pub fn process<S, E>(&self, args: &[S], env: &[E], ctx: &mut C) -> Result<(), ProcessErr>
    where
        S: AsRef<str>,
        E: AsRef<str>,
    {
        if let Some(env_definitions) = self.env_definitions {
            process_env(env, env_definitions, ctx)?;
        }
        self.process_flags(args, ctx)?;
        self.process_values(args, ctx)
    }

    /// Process the environment, then flags and standalone values in their original order.
    ///
    /// Also see [`Self::process`].
    pub fn process_ltr<S, E>(&self, args: &[S], env: &[E], ctx: &mut C) -> Result<(), ProcessErr>
    where
        S: AsRef<str>,
        E: AsRef<str>,
    {
        if let Some(env_definitions) = self.env_definitions {
            process_env(env, env_definitions, ctx)?;
        }
        self.process_args(args, ctx)
    }

    /// [`Self::process`] with the arguments and environment of the running program.
    pub fn process_from_env(&self, ctx: &mut C) -> Result<(), ProcessErr> {
        let args: Vec<String> = env::args_os().map(|a| a.to_string_lossy().into_owned()).collect();
        self.process(&args, &env_list(), ctx)
    }

    /// Handle flags and standalone values in a single left to right pass.
    pub fn process_args<S: AsRef<str>>(&self, args: &[S], ctx: &mut C) -> Result<(), ProcessErr> {
        self.scan(Mode::Both, args, 1, Some(ctx)).map(|_| ())
    }

    /// Handle flags only, standalone values are checked but their handler is not run.
    pub fn process_flags<S: AsRef<str>>(&self, args: &[S], ctx: &mut C) -> Result<(), ProcessErr> {
        self.scan(Mode::Flags, args, 1, Some(ctx)).map(|_| ())
    }

    /// Handle standalone values only, flags are checked but their handler is not run.
    pub fn process_values<S: AsRef<str>>(&self, args: &[S], ctx: &mut C) -> Result<(), ProcessErr> {
        self.scan(Mode::Values, args, 1, Some(ctx)).map(|_| ())
    }

    /// Find the index of the next standalone value after index `after`, pass 0 to start.
    ///
    /// No handler is run. Unrecognized tokens are skipped when a bad argument handler is
    /// registered (it is not called), otherwise [`ProcessErr::BadArgument`] is returned.
    ///
    /// ```
    /// use argdef::{callbacks, Definition, Definitions, Matcher};
    ///
    /// let mut defs: Definitions<()> = Definitions::new();
    /// defs.add(Definition::builder().short('n').param("N").handler(callbacks::noop()).build().unwrap());
    /// defs.add(Definition::builder().param("FILE").handler(callbacks::noop()).build().unwrap());
    ///
    /// let args = ["prog", "-n", "3", "a", "b"];
    /// let matcher = Matcher::new(&defs);
    /// let mut index = 0;
    /// let mut files = vec![];
    /// while let Some(i) = matcher.next_value(index, &args).unwrap() {
    ///     files.push(args[i]);
    ///     index = i;
    /// }
    /// assert_eq!(vec!["a", "b"], files);
    /// ```
    pub fn next_value<S: AsRef<str>>(&self, after: usize, args: &[S]) -> Result<Option<usize>, ProcessErr> {
        match self.scan(Mode::FindValue, args, after.saturating_add(1), None)? {
            Scan::Found(index) => Ok(Some(index)),
            Scan::Completed => Ok(None),
        }
    }

    fn scan<S: AsRef<str>>(
        &self,
        mode: Mode,
        args: &[S],
        start: usize,
        mut ctx: Option<&mut C>,
    ) -> Result<Scan, ProcessErr> {
        let mut positional: Option<Option<&Definition<C>>> = None;
        let mut i = start;

        while i < args.len() {
            let token = args[i].as_ref();

            let outcome = if let Some(name) = token.strip_prefix("--") {
                trace!(index = i, token, "long argument");
                self.match_long(mode, name, ctx.as_deref_mut())
            } else if token.len() > 1 && token.starts_with('-') {
                trace!(index = i, token, "short argument");
                let next = args.get(i + 1).map(|a| a.as_ref());
                let (outcome, consumed) = self.match_short(mode, &token[1..], next, ctx.as_deref_mut());
                if consumed {
                    i += 1;
                }
                outcome
            } else {
                trace!(index = i, token, "standalone value");
                match *positional.get_or_insert_with(|| self.definitions.positional()) {
                    None => Match::Rejected,
                    Some(_) if !mode.handles_values() => Match::Accepted,
                    Some(_) if mode.is_find_only() => return Ok(Scan::Found(i)),
                    Some(def) => Self::dispatch(def, Some(token), ctx.as_deref_mut()),
                }
            };

            match outcome {
                Match::Accepted => {}
                Match::Aborted(source) => {
                    debug!(index = i, token = args[i].as_ref(), error = %source, "handler aborted processing");
                    return Err(ProcessErr::Aborted { index: i, token: args[i].as_ref().to_string(), source });
                }
                Match::Rejected => self.reject(mode, i, token, ctx.as_deref_mut())?,
            }
            i += 1;
        }
        Ok(Scan::Completed)
    }

    fn match_short(&self, mode: Mode, body: &str, next: Option<&str>, ctx: Option<&mut C>) -> (Match, bool) {
        let mut chars = body.chars();
        let Some(c) = chars.next() else {
            return (Match::Rejected, false);
        };
        let attached = chars.as_str();

        let Some(def) = self.definitions.iter().find(|d| d.get_short() == Some(c)) else {
            return (Match::Rejected, false);
        };

        if !def.has_param() {
            if attached.is_empty() {
                (Self::dispatch_flag(mode, def, None, ctx), false)
            } else {
                (Match::Rejected, false)
            }
        } else if !attached.is_empty() {
            (Self::dispatch_flag(mode, def, Some(attached), ctx), false)
        } else if let Some(value) = next {
            (Self::dispatch_flag(mode, def, Some(value), ctx), true)
        } else {
            (Match::Rejected, false)
        }
    }

    fn match_long(&self, mode: Mode, body: &str, ctx: Option<&mut C>) -> Match {
        let found = self.definitions.iter().find_map(|d| {
            let long = d.get_long()?;
            let tail = body.strip_prefix(long)?;
            (tail.is_empty() || tail.starts_with('=')).then_some((d, tail))
        });
        let Some((def, tail)) = found else {
            return Match::Rejected;
        };

        if !def.has_param() {
            if tail.is_empty() {
                Self::dispatch_flag(mode, def, None, ctx)
            } else {
                Match::Rejected
            }
        } else if let Some(value) = tail.strip_prefix('=') {
            Self::dispatch_flag(mode, def, Some(value), ctx)
        } else {
            Match::Rejected
        }
    }

    fn dispatch_flag(mode: Mode, def: &Definition<C>, value: Option<&str>, ctx: Option<&mut C>) -> Match {
        if mode.handles_flags() {
            Self::dispatch(def, value, ctx)
        } else {
            Match::Accepted
        }
    }

    fn dispatch(def: &Definition<C>, value: Option<&str>, ctx: Option<&mut C>) -> Match {
        let Some(ctx) = ctx else {
            return Match::Accepted;
        };
        match def.invoke(value, ctx) {
            Ok(()) => Match::Accepted,
            Err(e) => Match::Aborted(e),
        }
    }

    fn reject(&self, mode: Mode, index: usize, token: &str, ctx: Option<&mut C>) -> Result<(), ProcessErr> {
        let unrecognized = || ProcessErr::BadArgument { index, token: token.to_string() };

        if mode.is_find_only() {
            return if self.bad_argument.is_some() {
                trace!(index, token, "skipping unrecognized argument");
                Ok(())
            } else {
                Err(unrecognized())
            };
        }

        match (&self.bad_argument, ctx) {
            (Some(handler), Some(ctx)) => handler(token, ctx).map_err(|source| {
                debug!(index, token, error = %source, "bad argument handler aborted processing");
                ProcessErr::Aborted { index, token: token.to_string(), source }
            }),
            _ => {
                debug!(index, token, "invalid command line argument");
                Err(unrecognized())
            }
        }
    }
}
