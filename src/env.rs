use std::env;

use tracing::{debug, trace};

use crate::definition::Definitions;
use crate::error::ProcessErr;

/// Run handlers for the `NAME=value` entries of `env`.
///
/// Definitions are visited in table order, every definition with a long name runs its
/// handler for each entry whose name is exactly that long name. Entries without a matching
/// definition, and entries without `=`, are ignored. The first failing handler stops
/// processing.
///
/// # Examples
///
/// ```
/// use argdef::{callbacks, process_env, Definition, Definitions};
///
/// #[derive(Default)]
/// struct App { editor: Option<String> }
///
/// let mut defs = Definitions::new();
/// defs.add(Definition::builder()
///         .long("EDITOR")
///         .param("PROGRAM")
///         .handler(callbacks::set_str(|app: &mut App| &mut app.editor))
///         .build().unwrap());
///
/// let mut app = App::default();
/// process_env(&["TERM=xterm", "EDITOR=vi"], &defs, &mut app).unwrap();
/// assert_eq!(Some("vi".to_string()), app.editor);
/// ```
pub fn process_env<C, E: AsRef<str>>(env: &[E], definitions: &Definitions<C>, ctx: &mut C) -> Result<(), ProcessErr> {
    for definition in definitions {
        let Some(long) = definition.get_long() else {
            continue;
        };
        for entry in env {
            let Some((name, value)) = entry.as_ref().split_once('=') else {
                continue;
            };
            if name != long {
                continue;
            }
            trace!(variable = name, "environment variable matched");
            definition.invoke(Some(value), ctx).map_err(|source| {
                debug!(variable = name, error = %source, "handler aborted environment processing");
                ProcessErr::EnvAborted { variable: name.to_string(), source }
            })?;
        }
    }
    Ok(())
}

/// Snapshot of the current process environment as `NAME=value` entries.
///
/// Names and values that are not valid unicode are converted lossily.
pub fn env_list() -> Vec<String> {
    env::vars_os()
        .map(|(name, value)| format!("{}={}", name.to_string_lossy(), value.to_string_lossy()))
        .collect()
}

#[cfg(test)]
mod test {
    use crate::definition::{Definition, Definitions};
    use crate::env::{env_list, process_env};
    use crate::error::{HandlerError, HandlerResult, ProcessErr};

    fn record(label: &'static str) -> impl Fn(&Definition<Vec<String>>, Option<&str>, &mut Vec<String>) -> HandlerResult {
        move |_: &Definition<Vec<String>>, value: Option<&str>, seen: &mut Vec<String>| {
            if value == Some("fail") {
                return Err(HandlerError::Code(5));
            }
            seen.push(format!("{}:{}", label, value.unwrap_or("")));
            Ok(())
        }
    }

    fn definitions() -> Definitions<Vec<String>> {
        let mut defs = Definitions::new();
        defs.add_entry(None, Some("HOME"), Some("DIR"), "home", record("home")).unwrap();
        defs.add_entry(Some('x'), None, None, "short only", record("short")).unwrap();
        defs.add_entry(None, None, Some("VALUE"), "positional", record("pos")).unwrap();
        defs.add_entry(None, Some("PATH"), Some("DIRS"), "path", record("path")).unwrap();
        defs.add_entry(None, Some("HOME"), Some("DIR"), "home again", record("home2")).unwrap();
        defs
    }

    #[test]
    fn test_exact_names_in_table_order() {
        let env = ["PATH=/bin", "HOMEDIR=/nope", "HOME=/root", "HOM=/nope", "NOEQUAL", "HOME=/second"];
        let mut seen = vec![];
        process_env(&env, &definitions(), &mut seen).unwrap();
        assert_eq!(
            vec!["home:/root", "home:/second", "path:/bin", "home2:/root", "home2:/second"],
            seen
        );
    }

    #[test]
    fn test_value_keeps_later_equal_signs() {
        let mut seen = vec![];
        process_env(&["PATH=a=b"], &definitions(), &mut seen).unwrap();
        assert_eq!(vec!["path:a=b"], seen);

        let mut seen = vec![];
        process_env(&["PATH="], &definitions(), &mut seen).unwrap();
        assert_eq!(vec!["path:"], seen);
    }

    #[test]
    fn test_abort() {
        let mut seen = vec![];
        let result = process_env(&["PATH=/bin", "HOME=fail"], &definitions(), &mut seen);
        match result {
            Err(ProcessErr::EnvAborted { variable, source }) => {
                assert_eq!("HOME", variable);
                assert_eq!(5, source.code());
            }
            other => panic!("expected abort, got {:?}", other),
        }
        assert!(seen.is_empty());
    }

    #[test]
    fn test_env_list() {
        let list = env_list();
        assert!(list.iter().all(|entry| entry.contains('=')));
    }
}
