//! The token scanner that binds argv onto an [`Arguments`] target.
//!
//! Scanning is a single left-to-right pass. Each token is classified as
//! either an option marker (`/name`, `--name`, `-n`), the value of the
//! previously seen named option, or a positional. Malformed input never
//! aborts the scan; it only clears [`ParseReport::success`].

use crate::decl::{Arguments, Declaration, DeclarationError, Schema};
use crate::slot::Coercion;
use crate::usage::{self, UsageError};
use std::collections::VecDeque;
use std::io::Write;
use tracing::{debug, trace};

/// Markers recognized by [`Parser::new`], in test order.
pub const DEFAULT_MARKERS: [&str; 3] = ["/", "--", "-"];

/// How a token that starts with several markers is split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerMatch {
    /// Strip only the longest matching marker: `--date` yields `date`.
    #[default]
    Longest,
    /// Strip every matching marker independently: `--date` yields both
    /// `date` and `-date`, and each is looked up.
    Every,
}

/// Outcome of one bind call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseReport {
    success: bool,
    defaulted: Vec<&'static str>,
}

impl ParseReport {
    fn new() -> Self {
        Self {
            success: true,
            defaulted: Vec::new(),
        }
    }

    /// `false` when the target may be partially or incorrectly populated.
    pub fn success(&self) -> bool {
        self.success
    }

    /// Fields whose token failed to convert and were reset to their default.
    ///
    /// A fallback does not affect [`ParseReport::success`].
    pub fn defaulted(&self) -> &[&'static str] {
        &self.defaulted
    }

    fn fail(&mut self, token: &str, reason: &str) {
        debug!(token, reason, "argument scan failed");
        self.success = false;
    }
}

/// Parser configuration. Immutable once built; cheap to clone.
#[derive(Debug, Clone)]
pub struct Parser {
    markers: Vec<String>,
    marker_match: MarkerMatch,
    program_name: Option<String>,
}

impl Default for Parser {
    fn default() -> Self {
        Self {
            markers: DEFAULT_MARKERS.iter().map(|m| m.to_string()).collect(),
            marker_match: MarkerMatch::default(),
            program_name: None,
        }
    }
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the marker set. Empty markers are ignored.
    pub fn markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.markers = markers
            .into_iter()
            .map(Into::into)
            .filter(|m: &String| !m.is_empty())
            .collect();
        self
    }

    pub fn marker_match(mut self, marker_match: MarkerMatch) -> Self {
        self.marker_match = marker_match;
        self
    }

    /// Program name shown in the usage line. Defaults to the file name of `argv[0]`.
    pub fn program_name(mut self, name: impl Into<String>) -> Self {
        self.program_name = Some(name.into());
        self
    }

    /// Bind `tokens` onto a fresh `T::default()`.
    pub fn parse<T, I, S>(&self, tokens: I) -> Result<(T, ParseReport), DeclarationError>
    where
        T: Arguments + Default,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut target = T::default();
        let report = self.parse_into(tokens, &mut target)?;
        Ok((target, report))
    }

    /// Bind `tokens` onto an existing `target`, leaving unmatched fields as they are.
    pub fn parse_into<T, I, S>(
        &self,
        tokens: I,
        target: &mut T,
    ) -> Result<ParseReport, DeclarationError>
    where
        T: Arguments,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let schema = Schema::of::<T>()?;
        schema.check_target(target)?;

        let mut scan = Scan::new(&schema);
        for token in tokens {
            scan.step(self, token.as_ref(), target);
        }
        Ok(scan.finish())
    }

    /// Render usage text for `T`.
    pub fn usage<T: Arguments>(&self) -> Result<String, DeclarationError> {
        let schema = Schema::of::<T>()?;
        Ok(usage::render(&schema, &self.resolved_program_name()))
    }

    /// Write usage text for `T` to `sink`.
    pub fn print_usage<T: Arguments, W: Write>(&self, sink: &mut W) -> Result<(), UsageError> {
        let text = self.usage::<T>()?;
        sink.write_all(text.as_bytes())?;
        sink.flush()?;
        Ok(())
    }

    pub fn print_usage_stdout<T: Arguments>(&self) -> Result<(), UsageError> {
        self.print_usage::<T, _>(&mut std::io::stdout().lock())
    }

    fn resolved_program_name(&self) -> String {
        if let Some(name) = &self.program_name {
            return name.clone();
        }
        std::env::args_os()
            .next()
            .as_deref()
            .and_then(|arg0| std::path::Path::new(arg0).file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
    }

    /// Option names carried by `token`, one per stripped marker.
    ///
    /// Returns `None` when no marker prefixes the token.
    fn candidates<'t>(&self, token: &'t str) -> Option<Vec<&'t str>> {
        let mut matching = self
            .markers
            .iter()
            .filter(|marker| token.starts_with(marker.as_str()))
            .peekable();
        matching.peek()?;

        let names = match self.marker_match {
            MarkerMatch::Longest => matching
                .max_by_key(|marker| marker.len())
                .map(|marker| vec![&token[marker.len()..]])
                .unwrap_or_default(),
            MarkerMatch::Every => matching.map(|marker| &token[marker.len()..]).collect(),
        };
        Some(names)
    }
}

/// Per-call scan state.
struct Scan<'s> {
    schema: &'s Schema,
    queue: VecDeque<&'s Declaration>,
    awaiting: Option<&'s Declaration>,
    report: ParseReport,
}

impl<'s> Scan<'s> {
    fn new(schema: &'s Schema) -> Self {
        Self {
            schema,
            queue: schema.positionals().iter().collect(),
            awaiting: None,
            report: ParseReport::new(),
        }
    }

    fn step<T: Arguments>(&mut self, parser: &Parser, token: &str, target: &mut T) {
        if let Some(names) = parser.candidates(token) {
            trace!(token, ?names, "option marker");
            for name in names {
                self.option(token, name, target);
            }
            return;
        }

        if let Some(decl) = self.awaiting.take() {
            trace!(token, field = decl.field, "option value");
            self.bind(decl, token, target);
            return;
        }

        if let (1, Some(&params)) = (self.queue.len(), self.queue.front()) {
            if params.is_params() {
                trace!(token, field = params.field, "collected into params");
                self.bind(params, token, target);
                return;
            }
        }

        match self.queue.pop_front() {
            Some(decl) => {
                trace!(token, field = decl.field, "positional");
                self.bind(decl, token, target);
            }
            None => self.report.fail(token, "no positional left to take this value"),
        }
    }

    fn option<T: Arguments>(&mut self, token: &str, name: &str, target: &mut T) {
        let schema = self.schema;
        if let Some(decl) = schema.find_named(name) {
            if let Some(pending) = self.awaiting.replace(decl) {
                debug!(pending = pending.name.as_str(), "named option given without a value");
                self.report.fail(token, "previous named option is still waiting for a value");
            }
        } else if let Some(decl) = schema.find_switch(name) {
            self.bind(decl, "true", target);
        }
    }

    fn bind<T: Arguments>(&mut self, decl: &Declaration, raw: &str, target: &mut T) {
        let Some(slot) = target.slot_mut(decl.field) else {
            return;
        };
        if slot.assign(raw) == Coercion::Defaulted {
            debug!(field = decl.field, value = raw, "value did not convert, using default");
            self.report.defaulted.push(decl.field);
        }
    }

    fn finish(mut self) -> ParseReport {
        if let Some(missing) = self.queue.iter().find(|d| !d.is_params()) {
            self.report.fail(&missing.name, "required positional not supplied");
        }
        if let Some(pending) = self.awaiting {
            self.report.fail(&pending.name, "named option given without a value");
        }
        self.report
    }
}
