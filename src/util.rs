use std::env::consts::EXE_SUFFIX;

/// Version of this library, e.g. `"0.1.0"`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version of this library as `(major, minor, patch)`.
pub fn version() -> (u32, u32, u32) {
    (
        env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap_or(0),
        env!("CARGO_PKG_VERSION_MINOR").parse().unwrap_or(0),
        env!("CARGO_PKG_VERSION_PATCH").parse().unwrap_or(0),
    )
}

/// The file name part of `argv[0]`, see [`program_name`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgramName<'a> {
    text: &'a str,
    len: usize,
}

impl<'a> ProgramName<'a> {
    /// The file name without directories, executable suffix included.
    pub fn as_str(&self) -> &'a str {
        self.text
    }

    /// Length of the name without the platform's executable suffix.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The file name without directories and executable suffix.
    pub fn name(&self) -> &'a str {
        &self.text[..self.len]
    }
}

fn is_separator(c: char) -> bool {
    c == '/' || (cfg!(windows) && (c == '\\' || c == ':'))
}

/// Get the name of the running program from `argv[0]`.
///
/// Directories are stripped (and on Windows drive letters), the platform's executable
/// suffix is excluded from [`ProgramName::len`] but kept in [`ProgramName::as_str`].
/// [`None`] when `argv0` is empty.
///
/// ```
/// use argdef::program_name;
///
/// let name = program_name("/usr/local/bin/tool").unwrap();
/// assert_eq!("tool", name.name());
/// assert!(program_name("").is_none());
/// ```
pub fn program_name(argv0: &str) -> Option<ProgramName<'_>> {
    if argv0.is_empty() {
        return None;
    }
    let start = argv0.rfind(is_separator).map(|i| i + 1).unwrap_or(0);
    let text = &argv0[start..];

    let mut len = text.len();
    if !EXE_SUFFIX.is_empty() && len >= EXE_SUFFIX.len() {
        let suffix_start = len - EXE_SUFFIX.len();
        if text.get(suffix_start..).is_some_and(|s| s.eq_ignore_ascii_case(EXE_SUFFIX)) {
            len = suffix_start;
        }
    }
    Some(ProgramName { text, len })
}
