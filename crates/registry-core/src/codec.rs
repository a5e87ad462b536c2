//! # Wire Enum Codec
//!
//! Fixed-value fields (party type, sort field, sort direction) have one
//! canonical token per value inside the system and a camelCase token on the
//! wire.
//!
//! ## Conventions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Token Conventions                                 │
//! │                                                                         │
//! │   Canonical (storage, SQL)        Wire (JSON, query strings)            │
//! │   ─────────────────────────       ──────────────────────────            │
//! │   created_at                ◄──►  createdAt                             │
//! │   full_name                 ◄──►  fullName                              │
//! │   legal                     ◄──►  legal                                 │
//! │                                                                         │
//! │   decode: accepts either form, camel is folded to snake first           │
//! │   encode: always emits the camel form                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each enum is declared with [`wire_enum!`], which writes the token table
//! as exhaustive `match` arms, so a variant without tokens does not compile.

use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static SNAKE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z][a-z0-9]*(?:_[a-z0-9]+)*$").expect("snake_case pattern is valid")
});

static CAMEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z]+(?:[A-Z][a-z0-9]*)*$").expect("camelCase pattern is valid")
});

// =============================================================================
// Decode Error
// =============================================================================

/// Returned when a token does not name any member of a wire enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct InvalidEnumValue {
    /// Rust name of the enum (e.g. `PartyType`).
    pub enum_name: &'static str,
    /// The rejected input, verbatim.
    pub value: String,
    /// Every accepted wire spelling, sorted.
    pub allowed: Vec<&'static str>,
    /// True when the input was neither snake_case nor camelCase.
    pub bad_convention: bool,
}

impl fmt::Display for InvalidEnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid {}: {:?}.", self.enum_name, self.value)?;
        if self.bad_convention {
            write!(f, " Only camelCase or snake_case are allowed.")?;
        }
        write!(f, " Allowed: {}", self.allowed.join(", "))
    }
}

// =============================================================================
// WireEnum Trait
// =============================================================================

/// A closed set of values with a canonical token and a wire token per value.
pub trait WireEnum: Sized + Copy + PartialEq + 'static {
    /// Name used in error messages.
    const NAME: &'static str;

    /// Every variant, in declaration order.
    const VARIANTS: &'static [Self];

    /// The internal snake_case token (also the database representation).
    fn canonical(self) -> &'static str;

    /// The camelCase token emitted on the wire. Never fails.
    fn encode(self) -> &'static str;

    /// Parses a token in either convention.
    fn decode(input: &str) -> Result<Self, InvalidEnumValue> {
        let key = match normalize_token(input) {
            Some(key) => key,
            None => return Err(invalid::<Self>(input, true)),
        };

        Self::VARIANTS
            .iter()
            .copied()
            .find(|variant| variant.canonical() == key)
            .ok_or_else(|| invalid::<Self>(input, false))
    }

    /// Sorted wire spellings, for documentation and error messages.
    fn allowed_wire_values() -> Vec<&'static str> {
        let mut values: Vec<&'static str> = Self::VARIANTS.iter().map(|v| v.encode()).collect();
        values.sort_unstable();
        values.dedup();
        values
    }
}

fn invalid<E: WireEnum>(input: &str, bad_convention: bool) -> InvalidEnumValue {
    InvalidEnumValue {
        enum_name: E::NAME,
        value: input.to_string(),
        allowed: E::allowed_wire_values(),
        bad_convention,
    }
}

/// Folds an input token to its snake_case form.
///
/// Returns `None` when the token follows neither convention.
fn normalize_token(input: &str) -> Option<Cow<'_, str>> {
    if SNAKE_RE.is_match(input) {
        return Some(Cow::Borrowed(input));
    }
    if CAMEL_RE.is_match(input) {
        return Some(Cow::Owned(camel_to_snake(input)));
    }
    None
}

/// `fullName` → `full_name`. Input must already match the camel pattern.
pub fn camel_to_snake(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    for ch in input.chars() {
        if ch.is_ascii_uppercase() {
            out.push('_');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// `full_name` → `fullName`.
pub fn snake_to_camel(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut upper_next = false;
    for ch in input.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.push(ch.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

// =============================================================================
// Declaration Macro
// =============================================================================

/// Declares a wire enum together with its token table.
///
/// Generates the enum, its [`WireEnum`] impl, and `Serialize`, `Deserialize`,
/// `Display` and `FromStr` impls that go through the codec.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => ($canonical:literal, $wire:literal)
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $crate::codec::WireEnum for $name {
            const NAME: &'static str = stringify!($name);
            const VARIANTS: &'static [Self] = &[$(Self::$variant),+];

            fn canonical(self) -> &'static str {
                match self {
                    $(Self::$variant => $canonical,)+
                }
            }

            fn encode(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str($crate::codec::WireEnum::encode(*self))
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                <Self as $crate::codec::WireEnum>::decode(&raw).map_err(::serde::de::Error::custom)
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::codec::WireEnum::encode(*self))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::codec::InvalidEnumValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <Self as $crate::codec::WireEnum>::decode(s)
            }
        }
    };
}

pub(crate) use wire_enum;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClientSortBy, PartyType, SortOrder};

    #[test]
    fn test_decode_accepts_both_conventions() {
        assert_eq!(ClientSortBy::decode("created_at").unwrap(), ClientSortBy::CreatedAt);
        assert_eq!(ClientSortBy::decode("createdAt").unwrap(), ClientSortBy::CreatedAt);
        assert_eq!(ClientSortBy::decode("full_name").unwrap(), ClientSortBy::FullName);
        assert_eq!(ClientSortBy::decode("fullName").unwrap(), ClientSortBy::FullName);
        assert_eq!(PartyType::decode("legal").unwrap(), PartyType::Legal);
    }

    #[test]
    fn test_decode_is_case_sensitive() {
        let err = PartyType::decode("Legal").unwrap_err();
        assert!(err.bad_convention);
        assert_eq!(err.allowed, vec!["individual", "legal"]);

        let err = SortOrder::decode("DESC").unwrap_err();
        assert!(err.bad_convention);
    }

    #[test]
    fn test_decode_unknown_member() {
        let err = PartyType::decode("company").unwrap_err();
        assert!(!err.bad_convention);
        assert_eq!(err.to_string(), "Invalid PartyType: \"company\". Allowed: individual, legal");

        // Well-formed camel token that folds to nothing known.
        assert!(ClientSortBy::decode("fullNameX").is_err());
        // Separators in the wrong place.
        assert!(ClientSortBy::decode("created__at").is_err());
        assert!(ClientSortBy::decode("").is_err());
    }

    #[test]
    fn test_encode_is_camel() {
        assert_eq!(ClientSortBy::PartyType.encode(), "partyType");
        assert_eq!(ClientSortBy::ClientId.encode(), "clientId");
        assert_eq!(SortOrder::Desc.encode(), "desc");
    }

    #[test]
    fn test_wire_tokens_match_canonical_tokens() {
        fn check<E: WireEnum>() {
            for variant in E::VARIANTS {
                assert_eq!(snake_to_camel(variant.canonical()), variant.encode());
                assert!(SNAKE_RE.is_match(variant.canonical()));
                assert!(E::decode(variant.encode()) == Ok(*variant));
            }
        }
        check::<PartyType>();
        check::<SortOrder>();
        check::<ClientSortBy>();
    }

    #[test]
    fn test_allowed_values_are_sorted() {
        let allowed = ClientSortBy::allowed_wire_values();
        let mut sorted = allowed.clone();
        sorted.sort();
        assert_eq!(allowed, sorted);
        assert_eq!(allowed.len(), ClientSortBy::VARIANTS.len());
    }

    #[test]
    fn test_serde_goes_through_codec() {
        let json = serde_json::to_string(&ClientSortBy::UpdatedAt).unwrap();
        assert_eq!(json, "\"updatedAt\"");

        let parsed: ClientSortBy = serde_json::from_str("\"updated_at\"").unwrap();
        assert_eq!(parsed, ClientSortBy::UpdatedAt);

        assert!(serde_json::from_str::<PartyType>("\"LEGAL\"").is_err());
    }

    #[test]
    fn test_case_conversion_helpers() {
        assert_eq!(camel_to_snake("parentId"), "parent_id");
        assert_eq!(camel_to_snake("inn"), "inn");
        assert_eq!(snake_to_camel("region_id"), "regionId");
    }
}
