//! # The argdef Library
//!
//! The argdef library processes command line arguments, environment variables and
//! simple config files from one table of definitions, and prints help text from the
//! same table.
//!
//! Each [`Definition`] names a short form (`-f`), a long form (`--file`, also used as the
//! variable name for the environment and config files) or neither (a standalone value), an
//! optional value placeholder and a handler. The handler gets the value and a mutable
//! context owned by the caller.
//!
//! argdef supports these argument forms:
//!
//! - Short flags, for example `-v`
//! - Short flags with a value attached or in the next argument, `-ffile` or `-f file`
//! - Long flags, for example `--verbose`
//! - Long flags with a value, `--file=file`
//! - Standalone values, anything else (a lone `-` included)
//!
//! A typical help message rendered by [`HelpFormatter`] looks like this:
//!
//! ```txt
//! Command line arguments:
//!   -v, --verbose          print more details
//!   -j N, --jobs=N         number of workers
//!   FILE                   file to process
//! Environment variables:
//!   JOBS=N                 number of workers
//! ```
//!
//! # Examples
//!
//! ```
//! use argdef::{callbacks, Definition, Definitions, HelpFormatter, Matcher};
//!
//! #[derive(Default)]
//! struct App {
//!     verbose: i32,
//!     jobs: i32,
//!     files: Vec<String>,
//! }
//!
//! let mut args = Definitions::new();
//! args.add(Definition::builder()
//!         .short('v')
//!         .long("verbose")
//!         .help("print more details")
//!         .handler(callbacks::increment(|app: &mut App| &mut app.verbose))
//!         .build().unwrap());
//! args.add(Definition::builder()
//!         .short('j')
//!         .long("jobs")
//!         .param("N")
//!         .help("number of workers")
//!         .handler(callbacks::set_int(|app: &mut App| &mut app.jobs))
//!         .build().unwrap());
//! args.add(Definition::builder()
//!         .param("FILE")
//!         .help("file to process")
//!         .handler(|_, value, app: &mut App| {
//!             app.files.extend(value.map(String::from));
//!             Ok(())
//!         })
//!         .build().unwrap());
//!
//! let mut env = Definitions::new();
//! env.add(Definition::builder()
//!         .long("JOBS")
//!         .param("N")
//!         .help("number of workers")
//!         .handler(callbacks::set_int(|app: &mut App| &mut app.jobs))
//!         .build().unwrap());
//!
//! let matcher = Matcher::builder(&args)
//!     .env_definitions(&env)
//!     .bad_argument(|token, _: &mut App| {
//!         eprintln!("ignoring unknown argument {}", token);
//!         Ok(())
//!     })
//!     .build();
//!
//! let mut app = App::default();
//! matcher.process(&["demo", "a.txt", "-j", "4", "-vv", "--verbose"], &["JOBS=2"], &mut app).unwrap();
//! assert_eq!(4, app.jobs);
//! assert_eq!(1, app.verbose);
//! assert_eq!(vec!["a.txt"], app.files);
//!
//! let help = HelpFormatter::new().help(Some(&args), Some(&env));
//! assert!(help.starts_with("Command line arguments:\n  -v, --verbose"));
//! ```

pub use config::{generate_config, parse_line, process_config, process_config_file};
pub use definition::{Definition, DefinitionBuilder, Definitions, Handler, Names};
pub use env::{env_list, process_env};
pub use error::{ConfigErr, DefinitionErr, HandlerError, HandlerResult, ProcessErr};
pub use format::{wrap_and_indent, HelpFormatter};
pub use matcher::{BadArgumentHandler, Matcher, MatcherBuilder};
pub use util::{program_name, version, ProgramName, VERSION};

pub mod callbacks;
mod config;
mod definition;
mod env;
mod error;
mod format;
mod matcher;
mod util;
