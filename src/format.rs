use std::io::{self, Write};

use crate::definition::{Definition, Definitions};

pub const DEFAULT_LINE_SEPARATOR: &str = "\n";

pub const DEFAULT_DESC_INDENT: usize = 25;
pub const DEFAULT_WIDTH: usize = 79;
const DEFAULT_PARAM_NAME: &str = "param";
const ARGS_HEADER: &str = "Command line arguments:";
const ENV_HEADER: &str = "Environment variables:";

/// `HelpFormatter` renders usage summaries and help text for [`Definitions`].
///
/// The help output format is like:
/// ```txt
/// Command line arguments:
///   -v, --verbose          <description>
///   -f FILE, --file=FILE   <description wrapped at the configured width and
///                          continued at the description column>
///   --a-very-long-name=VALUE
///                          <description>
///   FILE                   <description>
/// Environment variables:
///   HOME=DIR               <description>
/// ```
///
/// # Examples
///
/// ```
/// use argdef::{callbacks, Definition, Definitions, HelpFormatter};
///
/// let mut defs: Definitions<()> = Definitions::new();
/// defs.add(Definition::builder()
///         .short('v')
///         .long("verbose")
///         .help("print more details")
///         .handler(callbacks::noop())
///         .build().unwrap());
///
/// let formatter = HelpFormatter::new();
/// assert_eq!("[-v|--verbose]", formatter.arg_list(&defs, false));
/// assert_eq!("  -v, --verbose          print more details\n", formatter.arg_help(&defs));
/// ```
#[derive(Clone, Debug)]
pub struct HelpFormatter {
    desc_indent: usize,
    width: usize,
    newline: String,
    param_name: String,
}

impl HelpFormatter {
    /// Create a `HelpFormatter` with default configuration.
    pub fn new() -> HelpFormatter {
        HelpFormatter {
            desc_indent: DEFAULT_DESC_INDENT,
            width: DEFAULT_WIDTH,
            newline: DEFAULT_LINE_SEPARATOR.to_string(),
            param_name: DEFAULT_PARAM_NAME.to_string(),
        }
    }

    /// Get the column where descriptions start.
    pub fn get_desc_indent(&self) -> usize {
        self.desc_indent
    }

    /// Get the max width of the output lines.
    pub fn get_width(&self) -> usize {
        self.width
    }

    pub fn get_newline(&self) -> &str {
        &self.newline
    }

    /// Get the name shown for a positional definition without placeholder.
    pub fn get_param_name(&self) -> &str {
        &self.param_name
    }

    /// Set the column where descriptions start, 0 selects [`DEFAULT_DESC_INDENT`].
    pub fn set_desc_indent(&mut self, indent: usize) {
        self.desc_indent = if indent == 0 { DEFAULT_DESC_INDENT } else { indent };
    }

    /// Set the max width of the output lines, 0 selects [`DEFAULT_WIDTH`].
    pub fn set_width(&mut self, width: usize) {
        self.width = if width == 0 { DEFAULT_WIDTH } else { width };
    }

    /// Set the newline characters.
    pub fn set_newline(&mut self, newline: &str) {
        self.newline = newline.to_string();
    }

    /// Set the name shown for a positional definition without placeholder.
    pub fn set_param_name(&mut self, name: &str) {
        self.param_name = name.to_string();
    }

    fn create_padding(&self, len: usize) -> String {
        " ".repeat(len)
    }

    fn param_or_default<'a, C>(&'a self, definition: &'a Definition<C>) -> &'a str {
        definition.get_param().unwrap_or(&self.param_name)
    }

    /// Single line usage summary, e.g. `[-v|--verbose] [-f FILE|--file=FILE] INPUT`.
    ///
    /// Flags are bracketed, positional definitions show their placeholder.
    /// With `short_only` the long form is left out when a short form exists.
    pub fn arg_list<C>(&self, definitions: &Definitions<C>, short_only: bool) -> String {
        let mut buff = String::new();
        self.render_arg_list(&mut buff, definitions, short_only);
        buff
    }

    pub fn render_arg_list<C>(&self, buff: &mut String, definitions: &Definitions<C>, short_only: bool) {
        for (i, definition) in definitions.iter().enumerate() {
            if i != 0 {
                buff.push(' ');
            }
            if definition.is_positional() {
                buff.push_str(self.param_or_default(definition));
                continue;
            }

            buff.push('[');
            let short = definition.get_short();
            if let Some(c) = short {
                buff.push('-');
                buff.push(c);
                if let Some(param) = definition.get_param() {
                    buff.push(' ');
                    buff.push_str(param);
                }
            }
            if let Some(long) = definition.get_long() {
                if !(short_only && short.is_some()) {
                    if short.is_some() {
                        buff.push('|');
                    }
                    buff.push_str("--");
                    buff.push_str(long);
                    if let Some(param) = definition.get_param() {
                        buff.push('=');
                        buff.push_str(param);
                    }
                }
            }
            buff.push(']');
        }
    }

    /// Single line list of variable names, e.g. `HOME=DIR EDITOR=PROGRAM`.
    ///
    /// With `no_param` only the names are listed.
    pub fn env_list<C>(&self, definitions: &Definitions<C>, no_param: bool) -> String {
        let mut buff = String::new();
        self.render_env_list(&mut buff, definitions, no_param);
        buff
    }

    pub fn render_env_list<C>(&self, buff: &mut String, definitions: &Definitions<C>, no_param: bool) {
        let entries = definitions.iter().filter_map(|d| d.get_long().map(|long| (long, d.get_param())));
        for (i, (long, param)) in entries.enumerate() {
            if i != 0 {
                buff.push(' ');
            }
            buff.push_str(long);
            if let (false, Some(param)) = (no_param, param) {
                buff.push('=');
                buff.push_str(param);
            }
        }
    }

    /// Help text for command line arguments, one entry per definition.
    pub fn arg_help<C>(&self, definitions: &Definitions<C>) -> String {
        let mut buff = String::new();
        self.render_arg_help(&mut buff, definitions);
        buff
    }

    pub fn render_arg_help<C>(&self, buff: &mut String, definitions: &Definitions<C>) {
        for definition in definitions {
            let mut opt_buff = String::from("  ");
            if definition.is_positional() {
                opt_buff.push_str(self.param_or_default(definition));
            } else {
                if let Some(c) = definition.get_short() {
                    opt_buff.push('-');
                    opt_buff.push(c);
                    if let Some(param) = definition.get_param() {
                        opt_buff.push(' ');
                        opt_buff.push_str(param);
                    }
                }
                if let Some(long) = definition.get_long() {
                    if definition.get_short().is_some() {
                        opt_buff.push_str(", ");
                    }
                    opt_buff.push_str("--");
                    opt_buff.push_str(long);
                    if let Some(param) = definition.get_param() {
                        opt_buff.push('=');
                        opt_buff.push_str(param);
                    }
                }
            }
            self.render_entry(buff, &opt_buff, definition.get_help());
        }
    }

    /// Help text for environment variables, one entry per definition.
    pub fn env_help<C>(&self, definitions: &Definitions<C>) -> String {
        let mut buff = String::new();
        self.render_env_help(&mut buff, definitions);
        buff
    }

    pub fn render_env_help<C>(&self, buff: &mut String, definitions: &Definitions<C>) {
        for definition in definitions {
            let mut opt_buff = String::from("  ");
            if definition.is_positional() {
                opt_buff.push(' ');
                opt_buff.push_str(self.param_or_default(definition));
            } else if let Some(long) = definition.get_long() {
                opt_buff.push_str(long);
                if let Some(param) = definition.get_param() {
                    opt_buff.push('=');
                    opt_buff.push_str(param);
                }
            }
            self.render_entry(buff, &opt_buff, definition.get_help());
        }
    }

    /// Full help: a section for the arguments and one for the environment, each optional.
    pub fn help<C>(&self, args: Option<&Definitions<C>>, env: Option<&Definitions<C>>) -> String {
        let mut buff = String::new();
        self.render_help(&mut buff, args, env);
        buff
    }

    pub fn render_help<C>(&self, buff: &mut String, args: Option<&Definitions<C>>, env: Option<&Definitions<C>>) {
        if let Some(args) = args {
            buff.push_str(ARGS_HEADER);
            buff.push_str(self.get_newline());
            self.render_arg_help(buff, args);
        }
        if let Some(env) = env {
            buff.push_str(ENV_HEADER);
            buff.push_str(self.get_newline());
            self.render_env_help(buff, env);
        }
    }

    /// Print [`Self::arg_list`] to the `out` sink.
    pub fn print_arg_list<C, W: Write>(&self, out: &mut W, definitions: &Definitions<C>, short_only: bool) -> io::Result<()> {
        write!(out, "{}", self.arg_list(definitions, short_only))
    }

    /// Print [`Self::env_list`] to the `out` sink.
    pub fn print_env_list<C, W: Write>(&self, out: &mut W, definitions: &Definitions<C>, no_param: bool) -> io::Result<()> {
        write!(out, "{}", self.env_list(definitions, no_param))
    }

    /// Print [`Self::arg_help`] to the `out` sink.
    pub fn print_arg_help<C, W: Write>(&self, out: &mut W, definitions: &Definitions<C>) -> io::Result<()> {
        write!(out, "{}", self.arg_help(definitions))
    }

    /// Print [`Self::env_help`] to the `out` sink.
    pub fn print_env_help<C, W: Write>(&self, out: &mut W, definitions: &Definitions<C>) -> io::Result<()> {
        write!(out, "{}", self.env_help(definitions))
    }

    /// Print [`Self::help`] to the `out` sink.
    ///
    /// # Example
    ///
    /// ```
    /// use std::io::stdout;
    /// use argdef::{Definitions, HelpFormatter};
    ///
    /// let args: Definitions<()> = Definitions::new();
    /// HelpFormatter::new().print_help(&mut stdout(), Some(&args), None).unwrap();
    /// ```
    pub fn print_help<C, W: Write>(
        &self,
        out: &mut W,
        args: Option<&Definitions<C>>,
        env: Option<&Definitions<C>>,
    ) -> io::Result<()> {
        write!(out, "{}", self.help(args, env))
    }

    fn render_entry(&self, buff: &mut String, opt_buff: &str, help: &str) {
        let pos = opt_buff.chars().count();
        buff.push_str(opt_buff);
        if pos + 2 > self.desc_indent {
            buff.push_str(self.get_newline());
            buff.push_str(&self.create_padding(self.desc_indent));
        } else {
            buff.push_str(&self.create_padding(self.desc_indent - pos));
        }
        self.render_wrapped_text(buff, help, self.desc_indent, self.desc_indent);
        buff.push_str(self.get_newline());
    }

    /// Render `text` wrapped at the configured width, see [`wrap_and_indent`].
    pub fn render_wrapped_text(&self, buff: &mut String, text: &str, current_pos: usize, indent_pos: usize) {
        wrap_into(buff, text, current_pos, indent_pos, self.width, self.get_newline());
    }
}

impl Default for HelpFormatter {
    fn default() -> Self {
        HelpFormatter::new()
    }
}

/// Wrap `text` so no line passes column `width` (0 selects [`DEFAULT_WIDTH`]).
///
/// The first line starts at column `current_pos`, continuation lines are indented to
/// `indent_pos`. Words are separated by ASCII whitespace and never split, a word longer
/// than the available room gets a line of its own. A line break in `text` always breaks the
/// line. Whitespace at the start of a continuation line is dropped.
///
/// ```
/// use argdef::wrap_and_indent;
///
/// let mut out = String::new();
/// wrap_and_indent(&mut out, "aaa bbb ccc ddd", 0, 2, 8);
/// assert_eq!("aaa bbb\n  ccc\n  ddd", out);
/// ```
pub fn wrap_and_indent(buff: &mut String, text: &str, current_pos: usize, indent_pos: usize, width: usize) {
    wrap_into(buff, text, current_pos, indent_pos, width, DEFAULT_LINE_SEPARATOR);
}

fn wrap_into(buff: &mut String, text: &str, mut current_pos: usize, indent_pos: usize, width: usize, newline: &str) {
    let width = if width == 0 { DEFAULT_WIDTH } else { width };
    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut start = 0;

    loop {
        let mut end = start;
        let mut pos = start;
        loop {
            while pos < len && !bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            if current_pos + (pos - start) > width {
                if end == start {
                    end = pos;
                }
                break;
            }
            end = pos;

            let blank = pos;
            while pos < len && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            if bytes[blank..pos].contains(&b'\n') {
                break;
            }
            if pos >= len {
                end = len;
                break;
            }
        }

        if end >= len {
            buff.push_str(&text[start..]);
            return;
        }

        buff.push_str(&text[start..end]);
        buff.push_str(newline);
        buff.push_str(&" ".repeat(indent_pos));
        current_pos = indent_pos;

        start = end;
        while start < len && bytes[start].is_ascii_whitespace() {
            start += 1;
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::definition::{Definition, Definitions};
    use crate::format::{wrap_and_indent, HelpFormatter, DEFAULT_DESC_INDENT, DEFAULT_WIDTH};

    fn noop(_: &Definition<()>, _: Option<&str>, _: &mut ()) -> crate::error::HandlerResult {
        Ok(())
    }

    fn arg_definitions() -> Definitions<()> {
        let mut defs = Definitions::new();
        defs.add_entry(Some('v'), Some("verbose"), None, "print more", noop).unwrap();
        defs.add_entry(Some('f'), Some("file"), Some("FILE"), "read input from FILE", noop).unwrap();
        defs.add_entry(None, Some("level"), Some("LEVEL"), "set the level", noop).unwrap();
        defs.add_entry(Some('q'), None, None, "quiet", noop).unwrap();
        defs.add_entry(None, None, Some("INPUT"), "input files", noop).unwrap();
        defs
    }

    fn env_definitions() -> Definitions<()> {
        let mut defs = Definitions::new();
        defs.add_entry(None, Some("HOME"), Some("DIR"), "home directory", noop).unwrap();
        defs.add_entry(Some('x'), None, None, "not a variable", noop).unwrap();
        defs.add_entry(None, Some("PATH"), None, "search path", noop).unwrap();
        defs
    }

    fn wrap(text: &str, current: usize, indent: usize, width: usize) -> String {
        let mut out = String::new();
        wrap_and_indent(&mut out, text, current, indent, width);
        out
    }

    fn line(opt: &str, help: &str) -> String {
        format!("{}{}{}\n", opt, " ".repeat(DEFAULT_DESC_INDENT - opt.len()), help)
    }

    #[test]
    fn test_wrap_greedy() {
        assert_eq!("aaa bbb\n  ccc\n  ddd", wrap("aaa bbb ccc ddd", 0, 2, 8));
        assert_eq!("aaa bbb ccc ddd", wrap("aaa bbb ccc ddd", 0, 2, 15));
        assert_eq!("aaa\n  bbb ccc", wrap("aaa bbb ccc", 4, 2, 10));
    }

    #[test]
    fn test_wrap_long_word() {
        assert_eq!("supercalifragilistic\n    word", wrap("supercalifragilistic word", 0, 4, 10));
        assert_eq!("x\n    supercalifragilistic", wrap("x supercalifragilistic", 0, 4, 10));
    }

    #[test]
    fn test_wrap_line_break() {
        assert_eq!("one\n two three", wrap("one\ntwo three", 0, 1, 79));
        assert_eq!("one\n two", wrap("one  \n\n  two", 0, 1, 79));
    }

    #[test]
    fn test_wrap_edge_cases() {
        assert_eq!("", wrap("", 10, 0, 79));
        assert_eq!("short", wrap("short", 0, 0, 0));
        let long = "word ".repeat(30);
        let wrapped = wrap(long.trim_end(), 0, 0, 0);
        assert!(wrapped.lines().all(|l| l.len() <= DEFAULT_WIDTH));
        assert!(wrapped.lines().count() > 1);
    }

    #[test]
    fn test_arg_list() {
        let formatter = HelpFormatter::new();
        let defs = arg_definitions();
        assert_eq!(
            "[-v|--verbose] [-f FILE|--file=FILE] [--level=LEVEL] [-q] INPUT",
            formatter.arg_list(&defs, false)
        );
        assert_eq!("[-v] [-f FILE] [--level=LEVEL] [-q] INPUT", formatter.arg_list(&defs, true));
    }

    #[test]
    fn test_arg_list_markers_in_table_order() {
        let formatter = HelpFormatter::new();
        let defs = arg_definitions();
        let summary = formatter.arg_list(&defs, false);

        let mut markers = vec![];
        let mut chars = summary.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                ' ' => {}
                '[' => markers.push(chars.by_ref().take_while(|c| *c != ']').collect::<String>()),
                _ => {
                    let mut word = c.to_string();
                    while let Some(next) = chars.next_if(|c| *c != ' ') {
                        word.push(next);
                    }
                    markers.push(word);
                }
            }
        }
        assert_eq!(
            vec!["-v|--verbose", "-f FILE|--file=FILE", "--level=LEVEL", "-q", "INPUT"],
            markers
        );
        assert_eq!(defs.len(), markers.len());
    }

    #[test]
    fn test_positional_default_name() {
        let mut defs = Definitions::new();
        defs.add_entry(None, None, None, "anything", noop).unwrap();
        let mut formatter = HelpFormatter::new();
        assert_eq!("param", formatter.arg_list(&defs, false));
        formatter.set_param_name("ARG");
        assert_eq!("ARG", formatter.arg_list(&defs, false));
    }

    #[test]
    fn test_env_list() {
        let formatter = HelpFormatter::new();
        let defs = env_definitions();
        assert_eq!("HOME=DIR PATH", formatter.env_list(&defs, false));
        assert_eq!("HOME PATH", formatter.env_list(&defs, true));
    }

    #[test]
    fn test_arg_help() {
        let formatter = HelpFormatter::new();
        let expected = [
            line("  -v, --verbose", "print more"),
            line("  -f FILE, --file=FILE", "read input from FILE"),
            line("  --level=LEVEL", "set the level"),
            line("  -q", "quiet"),
            line("  INPUT", "input files"),
        ]
        .concat();
        assert_eq!(expected, formatter.arg_help(&arg_definitions()));
    }

    #[test]
    fn test_arg_help_breaks_long_forms() {
        let mut defs = Definitions::new();
        defs.add_entry(Some('c'), Some("configuration"), Some("CONFIG"), "config file", noop).unwrap();
        defs.add_entry(Some('a'), Some("abcdefghijklmn"), None, "fits exactly", noop).unwrap();
        let formatter = HelpFormatter::new();
        let expected = format!(
            "  -c CONFIG, --configuration=CONFIG\n{}config file\n{}",
            " ".repeat(DEFAULT_DESC_INDENT),
            line("  -a, --abcdefghijklmn", "fits exactly"),
        );
        assert_eq!(expected, formatter.arg_help(&defs));
    }

    #[test]
    fn test_arg_help_wraps_description() {
        let mut defs = Definitions::new();
        defs.add_entry(Some('v'), None, None, "one two three four five six", noop).unwrap();
        let mut formatter = HelpFormatter::new();
        formatter.set_width(40);
        let expected = format!(
            "  -v{}one two three\n{}four five six\n",
            " ".repeat(DEFAULT_DESC_INDENT - 4),
            " ".repeat(DEFAULT_DESC_INDENT),
        );
        assert_eq!(expected, formatter.arg_help(&defs));
    }

    #[test]
    fn test_custom_indent() {
        let mut defs = Definitions::new();
        defs.add_entry(Some('v'), None, None, "verbose", noop).unwrap();
        let mut formatter = HelpFormatter::new();
        formatter.set_desc_indent(8);
        assert_eq!("  -v    verbose\n", formatter.arg_help(&defs));
        formatter.set_desc_indent(0);
        assert_eq!(DEFAULT_DESC_INDENT, formatter.get_desc_indent());
        formatter.set_width(0);
        assert_eq!(DEFAULT_WIDTH, formatter.get_width());
    }

    #[test]
    fn test_env_help() {
        let formatter = HelpFormatter::new();
        let expected = [
            line("  HOME=DIR", "home directory"),
            line("  ", "not a variable"),
            line("  PATH", "search path"),
        ]
        .concat();
        assert_eq!(expected, formatter.env_help(&env_definitions()));
    }

    #[test]
    fn test_help() {
        let formatter = HelpFormatter::new();
        let args = arg_definitions();
        let env = env_definitions();
        let expected = format!(
            "Command line arguments:\n{}Environment variables:\n{}",
            formatter.arg_help(&args),
            formatter.env_help(&env)
        );
        assert_eq!(expected, formatter.help(Some(&args), Some(&env)));
        assert_eq!(format!("Environment variables:\n{}", formatter.env_help(&env)), formatter.help(None, Some(&env)));

        let mut out = Vec::new();
        formatter.print_help(&mut out, Some(&args), None).unwrap();
        assert_eq!(formatter.help(Some(&args), None), String::from_utf8(out).unwrap());
    }

    #[test]
    fn test_newline() {
        let mut defs = Definitions::new();
        defs.add_entry(Some('v'), None, None, "verbose", noop).unwrap();
        let mut formatter = HelpFormatter::new();
        formatter.set_newline("\r\n");
        assert!(formatter.help(Some(&defs), None).ends_with("verbose\r\n"));
    }
}
