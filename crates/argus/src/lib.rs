//! Bind command-line tokens onto annotated struct fields.
//!
//! Fields are declared as one of three kinds:
//! - **positional**: taken by position, in ascending `order`. One positional
//!   may be marked `params` to collect every remaining unclaimed token.
//! - **named**: `-d VALUE`, `--date VALUE` or `/date VALUE`; the next token is the value.
//! - **switch**: `-f`, `--force` or `/force`; presence alone sets the field to `true`.
//!
//! ```ignore
//! #[derive(Debug, Default, argus::Arguments)]
//! struct Options {
//!     #[argus(positional(order = 0, name = "ConfigFile", description = "The path to the config file"))]
//!     config_file: String,
//!     #[argus(named(name = "Date", short = 'd', description = "Sets the execution date"))]
//!     date: Option<chrono::NaiveDate>,
//!     #[argus(switch(name = "Force", short = 'f'))]
//!     force: bool,
//!     #[argus(positional(order = 1, params, name = "TargetFiles"))]
//!     target_files: Vec<String>,
//! }
//!
//! let (options, report) = argus::parse::<Options, _, _>(std::env::args().skip(1))?;
//! if !report.success() {
//!     argus::print_usage_stdout::<Options>()?;
//! }
//! ```
//!
//! Lookup rules worth knowing:
//! - Named options match their name or short name ignoring case; switches
//!   match with exact case.
//! - Any token starting with a marker is consumed as an option, even when no
//!   declaration matches it (so `-5` is never a positional value).
//! - A token that fails to convert to its field's type silently stores the
//!   type's default. This does not clear [`ParseReport::success`]; check
//!   [`ParseReport::defaulted`] to detect it.
//!
//! Declaration mistakes (too-short option names, two `params` positionals,
//! a `params` field that is not `Vec<String>`, ...) are returned as
//! [`DeclarationError`] from every entry point. Problems with the tokens
//! themselves only ever clear [`ParseReport::success`].

extern crate self as argus;

pub mod decl;
pub mod parser;
pub mod slot;
pub mod usage;

pub use argus_macros::Arguments;
pub use decl::{Arguments, DeclKind, Declaration, DeclarationError, Schema};
pub use parser::{DEFAULT_MARKERS, MarkerMatch, ParseReport, Parser};
pub use slot::{Coercion, FieldSlot, SlotKind};
pub use usage::UsageError;

/// Bind `tokens` onto a fresh `T` with the default [`Parser`].
pub fn parse<T, I, S>(tokens: I) -> Result<(T, ParseReport), DeclarationError>
where
    T: Arguments + Default,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Parser::new().parse(tokens)
}

/// Bind `tokens` onto `target` in place with the default [`Parser`].
pub fn parse_into<T, I, S>(tokens: I, target: &mut T) -> Result<ParseReport, DeclarationError>
where
    T: Arguments,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Parser::new().parse_into(tokens, target)
}

/// Usage text for `T`, using the file name of `argv[0]` as program name.
pub fn usage<T: Arguments>() -> Result<String, DeclarationError> {
    Parser::new().usage::<T>()
}

pub fn print_usage<T: Arguments, W: std::io::Write>(sink: &mut W) -> Result<(), UsageError> {
    Parser::new().print_usage::<T, W>(sink)
}

pub fn print_usage_stdout<T: Arguments>() -> Result<(), UsageError> {
    Parser::new().print_usage_stdout::<T>()
}
