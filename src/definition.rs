use std::fmt::{Debug, Display, Formatter};

use crate::error::{DefinitionErr, HandlerResult};

/// Handler invoked when a [`Definition`] matches.
///
/// It receives the matched definition, the value (if any) and the caller's context.
pub type Handler<C> = Box<dyn Fn(&Definition<C>, Option<&str>, &mut C) -> HandlerResult>;

/// The forms under which a [`Definition`] is recognized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Names {
    /// `-c`, `-cVALUE` or `-c VALUE`.
    Short(char),
    /// `--name` or `--name=VALUE`, also the variable name for environment and config processing.
    Long(String),
    /// Both forms.
    ShortLong(char, String),
    /// A standalone value, any token that is not a flag.
    Positional,
}

impl Names {
    pub fn short(&self) -> Option<char> {
        match self {
            Names::Short(c) | Names::ShortLong(c, _) => Some(*c),
            _ => None,
        }
    }

    pub fn long(&self) -> Option<&str> {
        match self {
            Names::Long(name) | Names::ShortLong(_, name) => Some(name),
            _ => None,
        }
    }

    pub fn is_positional(&self) -> bool {
        matches!(self, Names::Positional)
    }
}

/// One entry of a [`Definitions`] table.
///
/// # Examples
///
/// A flag `-v,--verbose` counting up a field of the context:
/// ```
/// use argdef::Definition;
///
/// #[derive(Default)]
/// struct App { verbose: u32 }
///
/// let def = Definition::builder()
///     .short('v')
///     .long("verbose")
///     .help("print more details")
///     .handler(|_, _, app: &mut App| {
///         app.verbose += 1;
///         Ok(())
///     })
///     .build()
///     .unwrap();
/// assert_eq!(Some('v'), def.get_short());
/// ```
///
/// A definition with neither a short nor a long name receives the standalone values:
/// ```
/// use argdef::{callbacks, Definition};
///
/// #[derive(Default)]
/// struct App { file: Option<String> }
///
/// let def = Definition::builder()
///     .param("FILE")
///     .help("file to process")
///     .handler(callbacks::set_str(|app: &mut App| &mut app.file))
///     .build()
///     .unwrap();
/// assert!(def.is_positional());
/// ```
pub struct Definition<C> {
    names: Names,
    param: Option<String>,
    help: String,
    handler: Handler<C>,
}

/// A builder struct for [`Definition`].
pub struct DefinitionBuilder<C> {
    short: Option<char>,
    long: Option<String>,
    param: Option<String>,
    help: Option<String>,
    handler: Option<Handler<C>>,
}

impl<C> DefinitionBuilder<C> {
    /// Build a [`Definition`] with configured values.
    ///
    /// # Error
    ///
    /// Returns an error if:
    /// - no handler is set.
    /// - the short name is `-`, `=` or whitespace.
    /// - the long name is blank, starts with `-` or contains `=` or whitespace.
    pub fn build(self) -> Result<Definition<C>, DefinitionErr> {
        let handler = self.handler.ok_or(DefinitionErr::MissingHandler)?;
        if let Some(c) = self.short {
            NameValidator::validate_short(c)?;
        }
        if let Some(ref long) = self.long {
            NameValidator::validate_long(long)?;
        }
        let names = match (self.short, self.long) {
            (Some(c), Some(long)) => Names::ShortLong(c, long),
            (Some(c), None) => Names::Short(c),
            (None, Some(long)) => Names::Long(long),
            (None, None) => Names::Positional,
        };
        Ok(Definition {
            names,
            param: self.param,
            help: self.help.unwrap_or_default(),
            handler,
        })
    }

    /// Set the single character matched by `-c`.
    pub fn short(mut self, c: char) -> Self {
        self.short = Some(c);
        self
    }

    /// Set the name matched by `--name`, or the variable name.
    pub fn long(mut self, name: &str) -> Self {
        self.long = Some(name.trim().to_owned());
        self
    }

    /// Set the placeholder shown in help, e.g. `FILE`.
    ///
    /// A definition with a placeholder requires a value.
    pub fn param(mut self, param: &str) -> Self {
        self.param = Some(param.trim().to_owned());
        self
    }

    /// Set the description shown in help.
    pub fn help(mut self, help: &str) -> Self {
        self.help = Some(help.trim().to_owned());
        self
    }

    /// Set the handler invoked on a match.
    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Definition<C>, Option<&str>, &mut C) -> HandlerResult + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }
}

impl<C> Definition<C> {
    /// Create a [`DefinitionBuilder`] to config the definition.
    pub fn builder() -> DefinitionBuilder<C> {
        DefinitionBuilder {
            short: None,
            long: None,
            param: None,
            help: None,
            handler: None,
        }
    }

    pub fn names(&self) -> &Names {
        &self.names
    }

    pub fn get_short(&self) -> Option<char> {
        self.names.short()
    }

    pub fn get_long(&self) -> Option<&str> {
        self.names.long()
    }

    /// The placeholder of the value, [`None`] for a pure flag.
    pub fn get_param(&self) -> Option<&str> {
        self.param.as_deref()
    }

    /// Check whether the definition requires a value.
    pub fn has_param(&self) -> bool {
        self.param.is_some()
    }

    pub fn get_help(&self) -> &str {
        &self.help
    }

    pub fn is_positional(&self) -> bool {
        self.names.is_positional()
    }

    /// Run the handler of this definition.
    pub fn invoke(&self, value: Option<&str>, ctx: &mut C) -> HandlerResult {
        (self.handler)(self, value, ctx)
    }
}

impl<C> Debug for Definition<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Definition")
            .field("names", &self.names)
            .field("param", &self.param)
            .field("help", &self.help)
            .finish_non_exhaustive()
    }
}

impl<C> Display for Definition<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut buf = String::from("[ ");
        match &self.names {
            Names::Short(c) => buf.push_str(&format!("-{}", c)),
            Names::Long(long) => buf.push_str(&format!("--{}", long)),
            Names::ShortLong(c, long) => buf.push_str(&format!("-{} --{}", c, long)),
            Names::Positional => buf.push_str("<positional>"),
        }
        if let Some(param) = &self.param {
            buf.push_str(" ");
            buf.push_str(param);
        }
        buf.push_str(" :: ");
        buf.push_str(&self.help);
        buf.push_str(" ]");
        write!(f, "{}", buf)
    }
}

/// An ordered table of [`Definition`]s.
///
/// Order matters: matching stops at the first definition whose name fits, and only the
/// first positional definition receives standalone values.
///
/// # Examples
///
/// ```
/// use argdef::{callbacks, Definition, Definitions};
///
/// #[derive(Default)]
/// struct App { quiet: bool, output: Option<String> }
///
/// let mut defs = Definitions::new();
/// defs.add(Definition::builder()
///         .short('q')
///         .help("only print errors")
///         .handler(callbacks::set_const(|app: &mut App| &mut app.quiet, true))
///         .build().unwrap());
/// defs.add(Definition::builder()
///         .short('o')
///         .long("output")
///         .param("FILE")
///         .help("write results to FILE")
///         .handler(callbacks::set_str(|app: &mut App| &mut app.output))
///         .build().unwrap());
/// assert_eq!(2, defs.len());
/// ```
pub struct Definitions<C> {
    entries: Vec<Definition<C>>,
}

impl<C> Definitions<C> {
    /// Create an empty table.
    pub fn new() -> Definitions<C> {
        Definitions { entries: Vec::new() }
    }

    /// Append a definition at the end of the table.
    pub fn add(&mut self, definition: Definition<C>) -> &mut Self {
        self.entries.push(definition);
        self
    }

    /// A convenient way to add a definition.
    ///
    /// `param` set to [`None`] makes a pure flag.
    pub fn add_entry<F>(
        &mut self,
        short: Option<char>,
        long: Option<&str>,
        param: Option<&str>,
        help: &str,
        handler: F,
    ) -> Result<&mut Self, DefinitionErr>
    where
        F: Fn(&Definition<C>, Option<&str>, &mut C) -> HandlerResult + 'static,
    {
        let mut builder = Definition::builder().help(help).handler(handler);
        if let Some(c) = short {
            builder = builder.short(c);
        }
        if let Some(long) = long {
            builder = builder.long(long);
        }
        if let Some(param) = param {
            builder = builder.param(param);
        }
        Ok(self.add(builder.build()?))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Definition<C>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The positional definition honored by the matcher, the first one in table order.
    pub fn positional(&self) -> Option<&Definition<C>> {
        self.entries.iter().find(|d| d.is_positional())
    }
}

impl<C> Default for Definitions<C> {
    fn default() -> Self {
        Definitions::new()
    }
}

impl<C> FromIterator<Definition<C>> for Definitions<C> {
    fn from_iter<T: IntoIterator<Item = Definition<C>>>(iter: T) -> Self {
        Definitions { entries: iter.into_iter().collect() }
    }
}

impl<'a, C> IntoIterator for &'a Definitions<C> {
    type Item = &'a Definition<C>;
    type IntoIter = std::slice::Iter<'a, Definition<C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<C> Debug for Definitions<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

struct NameValidator;

impl NameValidator {
    fn is_valid_char(c: char) -> bool {
        !c.is_whitespace() && c != '='
    }

    fn validate_short(c: char) -> Result<(), DefinitionErr> {
        if !Self::is_valid_char(c) || c == '-' {
            return Err(DefinitionErr::IllegalShortName(c));
        }
        Ok(())
    }

    fn validate_long(name: &str) -> Result<(), DefinitionErr> {
        if name.is_empty() {
            return Err(DefinitionErr::BlankLongName);
        }
        if name.starts_with('-') {
            return Err(DefinitionErr::IllegalLongName { name: name.to_string(), ch: '-' });
        }
        if let Some(ch) = name.chars().find(|c| !Self::is_valid_char(*c)) {
            return Err(DefinitionErr::IllegalLongName { name: name.to_string(), ch });
        }
        Ok(())
    }
}
