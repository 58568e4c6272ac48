//! Typed storage locations that tokens are bound onto.
//!
//! Every field carrying an `#[argus(..)]` declaration is exposed to the
//! scanner as a `&mut dyn FieldSlot`. The slot owns the conversion from the
//! raw token to its own type; a failed conversion resets the field to its
//! default value and reports [`Coercion::Defaulted`] instead of erroring.

use serde::Serialize;
use std::path::PathBuf;
use std::str::FromStr;

/// The declared type of a slot, as far as binding cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "type")]
pub enum SlotKind {
    /// A plain `bool`; the only kind a switch may bind to.
    Bool,
    /// Any single value parsed from one token. Carries the Rust type name.
    Scalar(&'static str),
    /// `Vec<String>`; the only kind a params positional may bind to.
    StringList,
}

/// Outcome of assigning one raw token to a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    Converted,
    /// The token did not parse; the slot now holds its default value.
    Defaulted,
}

/// A named, typed storage location on the target object.
pub trait FieldSlot {
    /// Kind of the slot type, available without an instance.
    fn declared_kind() -> SlotKind
    where
        Self: Sized;

    fn kind(&self) -> SlotKind;

    /// Convert `raw` and store it. Sequence slots append instead of replacing.
    fn assign(&mut self, raw: &str) -> Coercion;
}

/// Parse `raw` into `slot`, falling back to `T::default()` when it does not parse.
pub fn coerce<T>(slot: &mut T, raw: &str) -> Coercion
where
    T: FromStr + Default,
{
    match raw.parse() {
        Ok(value) => {
            *slot = value;
            Coercion::Converted
        }
        Err(_) => {
            *slot = T::default();
            Coercion::Defaulted
        }
    }
}

/// Implement [`FieldSlot`] for types that are `FromStr + Default`.
///
/// ```ignore
/// #[derive(Default)]
/// struct Level(u8);
/// impl std::str::FromStr for Level { /* .. */ }
///
/// argus::scalar_slot!(Level);
/// ```
#[macro_export]
macro_rules! scalar_slot {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::FieldSlot for $ty {
                fn declared_kind() -> $crate::SlotKind {
                    $crate::SlotKind::Scalar(stringify!($ty))
                }

                fn kind(&self) -> $crate::SlotKind {
                    <Self as $crate::FieldSlot>::declared_kind()
                }

                fn assign(&mut self, raw: &str) -> $crate::Coercion {
                    $crate::slot::coerce(self, raw)
                }
            }
        )+
    };
}

scalar_slot!(
    String, PathBuf, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32,
    f64,
);

impl FieldSlot for bool {
    fn declared_kind() -> SlotKind {
        SlotKind::Bool
    }

    fn kind(&self) -> SlotKind {
        SlotKind::Bool
    }

    fn assign(&mut self, raw: &str) -> Coercion {
        coerce(self, raw)
    }
}

impl<T: FromStr> FieldSlot for Option<T> {
    fn declared_kind() -> SlotKind {
        SlotKind::Scalar(std::any::type_name::<Self>())
    }

    fn kind(&self) -> SlotKind {
        Self::declared_kind()
    }

    fn assign(&mut self, raw: &str) -> Coercion {
        *self = raw.parse().ok();
        if self.is_some() {
            Coercion::Converted
        } else {
            Coercion::Defaulted
        }
    }
}

impl FieldSlot for Vec<String> {
    fn declared_kind() -> SlotKind {
        SlotKind::StringList
    }

    fn kind(&self) -> SlotKind {
        SlotKind::StringList
    }

    fn assign(&mut self, raw: &str) -> Coercion {
        self.push(raw.to_string());
        Coercion::Converted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_failure_falls_back_to_zero() {
        let mut port: u16 = 8080;
        assert_eq!(port.assign("80"), Coercion::Converted);
        assert_eq!(port, 80);
        assert_eq!(port.assign("eighty"), Coercion::Defaulted);
        assert_eq!(port, 0);
    }

    #[test]
    fn bool_only_accepts_literal_spellings() {
        let mut flag = true;
        assert_eq!(flag.assign("yes"), Coercion::Defaulted);
        assert!(!flag);
        assert_eq!(flag.assign("true"), Coercion::Converted);
        assert!(flag);
    }

    #[test]
    fn option_failure_clears_value() {
        let mut level: Option<u8> = Some(3);
        assert_eq!(level.assign("300"), Coercion::Defaulted);
        assert_eq!(level, None);
        assert_eq!(level.assign("7"), Coercion::Converted);
        assert_eq!(level, Some(7));
    }

    #[test]
    fn string_list_appends() {
        let mut items: Vec<String> = Vec::new();
        items.assign("a");
        items.assign("b");
        assert_eq!(items, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(<Vec<String> as FieldSlot>::declared_kind(), SlotKind::StringList);
    }

    #[test]
    fn scalar_kind_carries_type_name() {
        assert_eq!(<PathBuf as FieldSlot>::declared_kind(), SlotKind::Scalar("PathBuf"));
        assert_eq!(<bool as FieldSlot>::declared_kind(), SlotKind::Bool);
    }
}
