use std::fs::File;
use std::io::{self, BufRead, BufReader, ErrorKind, Write};
use std::path::Path;

use tracing::{debug, trace, warn};

use crate::definition::Definitions;
use crate::error::ConfigErr;

/// Run handlers for the assignments of a config file.
///
/// A missing file is not an error, nothing is processed. See [`process_config`] for the format.
pub fn process_config_file<C, P: AsRef<Path>>(
    path: P,
    definitions: &Definitions<C>,
    ctx: &mut C,
) -> Result<(), ConfigErr> {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    process_config(BufReader::new(file), definitions, ctx)
}

/// Run handlers for the assignments read from `reader`.
///
/// Each line holds one `name = value` or `name: value` assignment, see [`parse_line`].
/// The name selects the first definition whose long name starts with it. A failing handler
/// stops reading, the failure is logged and `Ok` is still returned.
///
/// # Examples
///
/// ```
/// use argdef::{callbacks, process_config, Definition, Definitions};
///
/// #[derive(Default)]
/// struct App { jobs: i32 }
///
/// let mut defs = Definitions::new();
/// defs.add(Definition::builder()
///         .long("jobs")
///         .param("N")
///         .handler(callbacks::set_int(|app: &mut App| &mut app.jobs))
///         .build().unwrap());
///
/// let mut app = App::default();
/// process_config("; worker count\njobs = 8\n".as_bytes(), &defs, &mut app).unwrap();
/// assert_eq!(8, app.jobs);
/// ```
pub fn process_config<C, R: BufRead>(mut reader: R, definitions: &Definitions<C>, ctx: &mut C) -> Result<(), ConfigErr> {
    let mut buf = Vec::new();
    let mut line_no = 0;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;

        let line = String::from_utf8_lossy(&buf);
        let line = line.strip_suffix('\n').unwrap_or(&line);
        let line = line.strip_suffix('\r').unwrap_or(line);

        let Some((name, value)) = parse_line(line) else {
            trace!(line = line_no, "no assignment");
            continue;
        };
        let Some(definition) = definitions
            .iter()
            .find(|d| d.get_long().is_some_and(|long| long.starts_with(name)))
        else {
            trace!(line = line_no, name, "no definition");
            continue;
        };

        if let Err(e) = definition.invoke(Some(value), ctx) {
            warn!(line = line_no, name, error = %e, "config handler failed, remaining lines skipped");
            break;
        }
    }
    Ok(())
}

/// Split a config line into name and value.
///
/// Leading whitespace is skipped and the first `=`, `:`, `#` or `;` decides: `=` and `:`
/// separate name and value, `#` and `;` make the line a comment. Name and value are trimmed.
/// [`None`] for comments, lines without separator and assignments with an empty name.
///
/// ```
/// use argdef::parse_line;
///
/// assert_eq!(Some(("name", "value")), parse_line("  name : value  "));
/// assert_eq!(None, parse_line("; name = value"));
/// ```
pub fn parse_line(line: &str) -> Option<(&str, &str)> {
    let body = line.trim_start();
    let pos = body.find(|c: char| matches!(c, '=' | ':' | '#' | ';'))?;
    if matches!(body.as_bytes()[pos], b'#' | b';') {
        return None;
    }
    let name = body[..pos].trim_end();
    if name.is_empty() {
        return None;
    }
    Some((name, body[pos + 1..].trim()))
}

/// Write a config template listing every definition with a long name.
///
/// ```txt
/// ; jobs
/// ;   number of workers
/// jobs = N
/// ```
pub fn generate_config<C, W: Write>(out: &mut W, definitions: &Definitions<C>) -> io::Result<()> {
    for definition in definitions {
        if let Some(long) = definition.get_long() {
            writeln!(out, "; {}", long)?;
            writeln!(out, ";   {}", definition.get_help())?;
            writeln!(out, "{} = {}", long, definition.get_param().unwrap_or(""))?;
        }
    }
    Ok(())
}
