//! Usage text rendered from a [`Schema`].

use crate::decl::{Declaration, DeclarationError, Schema};

const PARAMS_NOTE: &str = "collects remaining values";

#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    #[error(transparent)]
    Declaration(#[from] DeclarationError),
    #[error("failed to write usage: {0}")]
    Io(#[from] std::io::Error),
}

/// Render the usage line followed by one description block per group.
///
/// ```text
/// Usage: tool {file} {targets} [Date|d value] [Force|f]
///
/// file:       File to copy
/// targets:    collects remaining values
///
/// -d --date:  Sets the execution date
///
/// -f --force: Forces the operation
/// ```
pub fn render(schema: &Schema, program: &str) -> String {
    let mut out = usage_line(schema, program);
    out.push_str("\n\n");

    let width = schema
        .declarations()
        .map(|d| label(d).chars().count())
        .max()
        .unwrap_or(0);

    for group in [schema.positionals(), schema.named(), schema.switches()] {
        let rows: Vec<String> = group
            .iter()
            .filter_map(|d| {
                let description = description(d)?;
                let label = label(d);
                let pad = width - label.chars().count();
                Some(format!("{label}: {:pad$}{description}\n", ""))
            })
            .collect();
        if rows.is_empty() {
            continue;
        }
        for row in rows {
            out.push_str(&row);
        }
        out.push('\n');
    }

    out
}

fn usage_line(schema: &Schema, program: &str) -> String {
    let mut line = format!("Usage: {program}");
    for d in schema.positionals() {
        line.push_str(&format!(" {{{}}}", d.name));
    }
    for d in schema.named() {
        line.push_str(&format!(" [{} value]", alias_pair(d)));
    }
    for d in schema.switches() {
        line.push_str(&format!(" [{}]", alias_pair(d)));
    }
    line
}

fn alias_pair(d: &Declaration) -> String {
    match d.short_name() {
        Some(short) => format!("{}|{short}", d.name),
        None => d.name.clone(),
    }
}

fn label(d: &Declaration) -> String {
    if d.order().is_some() {
        return d.name.clone();
    }
    let long = format!("--{}", d.name.to_lowercase());
    match d.short_name() {
        Some(short) => format!("-{short} {long}"),
        None => long,
    }
}

/// The description column for `d`, or `None` when the row is omitted.
fn description(d: &Declaration) -> Option<String> {
    let text = d.description.trim();
    match (d.is_params(), text.is_empty()) {
        (true, true) => Some(PARAMS_NOTE.to_string()),
        (true, false) => Some(format!("{text} ({PARAMS_NOTE})")),
        (false, true) => None,
        (false, false) => Some(text.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::SlotKind;

    #[test]
    fn undescribed_positional_has_no_row() {
        let schema = Schema::new(vec![
            Declaration::positional("file", 0, SlotKind::Scalar("String")),
            Declaration::switch("force", "Force", SlotKind::Bool)
                .with_short('f')
                .with_description("Forces the operation"),
        ])
        .unwrap();

        let text = render(&schema, "tool");
        let lines: Vec<&str> = text.lines().filter(|l| !l.is_empty()).collect();
        assert_eq!(
            lines,
            ["Usage: tool {file} [Force|f]", "-f --force: Forces the operation"]
        );
    }

    #[test]
    fn descriptions_share_one_column() {
        let schema = Schema::new(vec![
            Declaration::positional("file", 0, SlotKind::Scalar("String"))
                .with_description("File to copy"),
            Declaration::positional("targets", 1, SlotKind::StringList).params(),
            Declaration::named("date", "Date", SlotKind::Scalar("String"))
                .with_short('d')
                .with_description("Sets the execution date"),
            Declaration::named("when", "When", SlotKind::Scalar("String")),
            Declaration::switch("force", "Force", SlotKind::Bool)
                .with_short('f')
                .with_description("Forces the operation"),
        ])
        .unwrap();

        let text = render(&schema, "tool");
        assert_eq!(
            text,
            "Usage: tool {file} {targets} [Date|d value] [When value] [Force|f]\n\
             \n\
             file:       File to copy\n\
             targets:    collects remaining values\n\
             \n\
             -d --date:  Sets the execution date\n\
             \n\
             -f --force: Forces the operation\n\
             \n"
        );
    }

    #[test]
    fn params_description_keeps_note() {
        let decl = Declaration::positional("rest", 0, SlotKind::StringList)
            .params()
            .with_description("Target files");
        assert_eq!(
            description(&decl).as_deref(),
            Some("Target files (collects remaining values)")
        );
    }

    #[test]
    fn empty_schema_renders_bare_usage() {
        let schema = Schema::new(Vec::new()).unwrap();
        assert_eq!(render(&schema, "tool"), "Usage: tool\n\n");
    }
}
