//! Argument declarations and the validated schema built from them.

use crate::slot::{FieldSlot, SlotKind};
use serde::Serialize;
use std::collections::HashMap;

/// A type whose fields can be bound from command-line tokens.
///
/// Usually generated with `#[derive(Arguments)]`. Hand-written impls must
/// return a slot from [`Arguments::slot_mut`] for every declared field.
pub trait Arguments {
    /// Declarations for every annotated field, in field order.
    fn declarations() -> Vec<Declaration>
    where
        Self: Sized;

    /// The slot backing `field`, or `None` if the type has no such field.
    fn slot_mut(&mut self, field: &str) -> Option<&mut dyn FieldSlot>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case", rename_all_fields = "kebab-case")]
pub enum DeclKind {
    Positional { order: usize, is_params: bool },
    Named { short_name: Option<char> },
    Switch { short_name: Option<char> },
}

/// One argument declaration, paired with the field it annotates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Declaration {
    pub field: &'static str,
    pub name: String,
    pub description: String,
    pub slot: SlotKind,
    #[serde(flatten)]
    pub kind: DeclKind,
}

impl Declaration {
    /// A positional consumed at `order`; named after its field until renamed.
    pub fn positional(field: &'static str, order: usize, slot: SlotKind) -> Self {
        Self {
            field,
            name: field.to_string(),
            description: String::new(),
            slot,
            kind: DeclKind::Positional {
                order,
                is_params: false,
            },
        }
    }

    pub fn named(field: &'static str, name: impl Into<String>, slot: SlotKind) -> Self {
        Self {
            field,
            name: name.into(),
            description: String::new(),
            slot,
            kind: DeclKind::Named { short_name: None },
        }
    }

    pub fn switch(field: &'static str, name: impl Into<String>, slot: SlotKind) -> Self {
        Self {
            field,
            name: name.into(),
            description: String::new(),
            slot,
            kind: DeclKind::Switch { short_name: None },
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the single-character alias. Ignored for positionals.
    pub fn with_short(mut self, short: char) -> Self {
        match &mut self.kind {
            DeclKind::Named { short_name } | DeclKind::Switch { short_name } => {
                *short_name = Some(short)
            }
            DeclKind::Positional { .. } => {}
        }
        self
    }

    /// Mark a positional as collecting every remaining unclaimed token.
    pub fn params(mut self) -> Self {
        if let DeclKind::Positional { is_params, .. } = &mut self.kind {
            *is_params = true;
        }
        self
    }

    pub fn short_name(&self) -> Option<char> {
        match self.kind {
            DeclKind::Named { short_name } | DeclKind::Switch { short_name } => short_name,
            DeclKind::Positional { .. } => None,
        }
    }

    pub fn order(&self) -> Option<usize> {
        match self.kind {
            DeclKind::Positional { order, .. } => Some(order),
            _ => None,
        }
    }

    pub fn is_params(&self) -> bool {
        matches!(self.kind, DeclKind::Positional { is_params: true, .. })
    }

    /// Whether `candidate` names this declaration, ignoring case.
    pub fn matches_ignore_case(&self, candidate: &str) -> bool {
        self.name.to_lowercase() == candidate.to_lowercase()
            || short_matches(self.short_name(), candidate, true)
    }

    /// Whether `candidate` names this declaration with exact case.
    pub fn matches_exact(&self, candidate: &str) -> bool {
        self.name == candidate || short_matches(self.short_name(), candidate, false)
    }
}

fn short_matches(short: Option<char>, candidate: &str, ignore_case: bool) -> bool {
    let Some(short) = short else {
        return false;
    };
    let mut chars = candidate.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if ignore_case => c.to_lowercase().eq(short.to_lowercase()),
        (Some(c), None) => c == short,
        _ => false,
    }
}

/// Programmer errors in a type's declarations. Never caused by user input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeclarationError {
    #[error("declaration on field `{field}` has an empty name")]
    EmptyName { field: &'static str },

    #[error("option name `{name}` on field `{field}` must be at least 2 characters long")]
    NameTooShort { field: &'static str, name: String },

    #[error("positionals `{first}` and `{second}` both collect remaining values; only one may")]
    MultipleParams { first: String, second: String },

    #[error("positional `{name}` collects remaining values, so field `{field}` must be Vec<String>")]
    ParamsNotStringList { field: &'static str, name: String },

    #[error("positionals `{first}` and `{second}` share order {order}")]
    DuplicateOrder {
        order: usize,
        first: String,
        second: String,
    },

    #[error("`{key}` is declared by both `{first}` and `{second}`")]
    Collision {
        key: String,
        first: String,
        second: String,
    },

    #[error("switch `{name}` on field `{field}` must be bool")]
    SwitchNotBool { field: &'static str, name: String },

    #[error("field `{field}` has no slot of the declared type on the target")]
    UnknownField { field: &'static str },
}

/// Validated declarations split into their three groups.
///
/// Positionals are sorted by `order`; named options and switches keep
/// declaration order.
#[derive(Debug, Clone, Serialize)]
pub struct Schema {
    positionals: Vec<Declaration>,
    named: Vec<Declaration>,
    switches: Vec<Declaration>,
}

impl Schema {
    pub fn new(declarations: Vec<Declaration>) -> Result<Self, DeclarationError> {
        let mut positionals = Vec::new();
        let mut named = Vec::new();
        let mut switches = Vec::new();

        for decl in declarations {
            if decl.name.is_empty() {
                return Err(DeclarationError::EmptyName { field: decl.field });
            }
            match decl.kind {
                DeclKind::Positional { .. } => positionals.push(decl),
                DeclKind::Named { .. } => {
                    check_option_name(&decl)?;
                    named.push(decl);
                }
                DeclKind::Switch { .. } => {
                    check_option_name(&decl)?;
                    if decl.slot != SlotKind::Bool {
                        return Err(DeclarationError::SwitchNotBool {
                            field: decl.field,
                            name: decl.name,
                        });
                    }
                    switches.push(decl);
                }
            }
        }

        positionals.sort_by_key(|d| d.order());
        check_positionals(&positionals)?;
        check_collisions(named.iter().chain(switches.iter()))?;

        let schema = Self {
            positionals,
            named,
            switches,
        };
        tracing::debug!(
            positionals = schema.positionals.len(),
            named = schema.named.len(),
            switches = schema.switches.len(),
            "built argument schema"
        );
        Ok(schema)
    }

    /// Build the schema for `T` from its declarations.
    pub fn of<T: Arguments>() -> Result<Self, DeclarationError> {
        Self::new(T::declarations())
    }

    pub fn positionals(&self) -> &[Declaration] {
        &self.positionals
    }

    pub fn named(&self) -> &[Declaration] {
        &self.named
    }

    pub fn switches(&self) -> &[Declaration] {
        &self.switches
    }

    /// Named options match on name or short name, ignoring case.
    pub fn find_named(&self, candidate: &str) -> Option<&Declaration> {
        self.named.iter().find(|d| d.matches_ignore_case(candidate))
    }

    /// Switches match on name or short name with exact case.
    pub fn find_switch(&self, candidate: &str) -> Option<&Declaration> {
        self.switches.iter().find(|d| d.matches_exact(candidate))
    }

    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.positionals
            .iter()
            .chain(self.named.iter())
            .chain(self.switches.iter())
    }

    /// Ensure `target` exposes a slot of the declared kind for every declaration.
    pub fn check_target<T: Arguments>(&self, target: &mut T) -> Result<(), DeclarationError> {
        for decl in self.declarations() {
            match target.slot_mut(decl.field) {
                Some(slot) if slot.kind() == decl.slot => {}
                _ => return Err(DeclarationError::UnknownField { field: decl.field }),
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn check_option_name(decl: &Declaration) -> Result<(), DeclarationError> {
    if decl.name.chars().count() < 2 {
        return Err(DeclarationError::NameTooShort {
            field: decl.field,
            name: decl.name.clone(),
        });
    }
    Ok(())
}

fn check_positionals(positionals: &[Declaration]) -> Result<(), DeclarationError> {
    let mut params: Option<&Declaration> = None;
    for decl in positionals.iter().filter(|d| d.is_params()) {
        if let Some(first) = params {
            return Err(DeclarationError::MultipleParams {
                first: first.name.clone(),
                second: decl.name.clone(),
            });
        }
        if decl.slot != SlotKind::StringList {
            return Err(DeclarationError::ParamsNotStringList {
                field: decl.field,
                name: decl.name.clone(),
            });
        }
        params = Some(decl);
    }

    // Sorted by order, so duplicates are adjacent.
    for pair in positionals.windows(2) {
        if pair[0].order() == pair[1].order() {
            return Err(DeclarationError::DuplicateOrder {
                order: pair[0].order().unwrap_or_default(),
                first: pair[0].name.clone(),
                second: pair[1].name.clone(),
            });
        }
    }
    Ok(())
}

fn check_collisions<'a>(
    options: impl Iterator<Item = &'a Declaration>,
) -> Result<(), DeclarationError> {
    let mut seen: HashMap<String, &'a str> = HashMap::new();
    for decl in options {
        let mut keys = vec![decl.name.to_lowercase()];
        if let Some(short) = decl.short_name() {
            keys.push(short.to_lowercase().collect());
        }
        for key in keys {
            if let Some(first) = seen.insert(key.clone(), decl.name.as_str()) {
                return Err(DeclarationError::Collision {
                    key,
                    first: first.to_string(),
                    second: decl.name.clone(),
                });
            }
        }
    }
    Ok(())
}
