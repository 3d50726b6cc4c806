//! Manifest data model for a single board game.
//!
//! Every record here is a plain value: it can be cloned, compared and
//! defaulted, and carries no identity beyond its fields. Field names map to
//! snake_case JSON keys one-to-one.

mod board;
mod checker;
mod logic;
mod position;

use std::{fmt, marker::PhantomData};

use serde::{
    de::{self, Unexpected, Visitor},
    Deserialize, Deserializer, Serialize,
};

use crate::rules::RuleReport;

pub use board::{BoardConfig, CheckerPieceItem};
pub use checker::{CheckerId, CheckerModel, CheckerType};
pub use logic::{GameWinRule, GameWinType, LogicConfig, MoveGenerationRule, StartingPlayer};
pub use position::{BoardDimensions, Coordinate, WinPositionCombination};

/// Root configuration record for one board game in the library.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryItemManifest {
    /// Catalog identifier. Uniqueness is owned by whatever catalog consumes it.
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// Human-readable game title.
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    /// File name of the cover image shipped next to the manifest.
    #[serde(deserialize_with = "null_as_default")]
    pub cover_image_file_name: String,
    /// Board prefab and piece prefabs.
    pub board_config: BoardConfig,
    /// Setup and rule parameters.
    pub logic_config: LogicConfig,
}

impl LibraryItemManifest {
    /// Returns a user-facing label, falling back to the id when no title is set.
    pub fn display_name(&self) -> String {
        match (self.title.trim(), self.id.trim()) {
            ("", "") => "(untitled)".to_string(),
            ("", id) => id.to_string(),
            (title, _) => title.to_string(),
        }
    }

    /// Advisory check of the whole record. Never mutates and never fails.
    pub fn validate(&self) -> RuleReport {
        crate::rules::validate_manifest(self)
    }
}

/// Enumerations stored in manifests by ordinal.
///
/// Manifests written by the original authoring tools carry enum values as
/// integers, so that is what gets written. Reading also accepts the symbolic
/// name, compared case-insensitively.
pub trait OrdinalEnum: Sized + Copy + PartialEq + 'static {
    /// Type name used in parse errors.
    const TYPE_NAME: &'static str;
    /// Every variant, in ordinal order.
    const ALL: &'static [Self];

    /// Integer written to manifest files.
    fn ordinal(self) -> u8;

    /// Symbolic name of the variant.
    fn name(self) -> &'static str;

    /// Looks up a variant by ordinal.
    fn from_ordinal(value: u64) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|variant| u64::from(variant.ordinal()) == value)
    }

    /// Looks up a variant by symbolic name.
    fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|variant| variant.name().eq_ignore_ascii_case(name))
    }

    /// The following variant, wrapping around after the last one.
    fn next(self) -> Self {
        let index = Self::ALL
            .iter()
            .position(|variant| *variant == self)
            .unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

macro_rules! ordinal_enum {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $crate::models::OrdinalEnum for $ty {
            const TYPE_NAME: &'static str = stringify!($ty);
            const ALL: &'static [Self] = &[$($ty::$variant),+];

            fn ordinal(self) -> u8 {
                self as u8
            }

            fn name(self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::models::OrdinalEnum::name(*self))
            }
        }

        impl serde::Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_u8($crate::models::OrdinalEnum::ordinal(*self))
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                deserializer.deserialize_any($crate::models::OrdinalVisitor::<$ty>::new())
            }
        }
    };
}

pub(crate) use ordinal_enum;

pub(crate) struct OrdinalVisitor<T>(PhantomData<T>);

impl<T> OrdinalVisitor<T> {
    pub(crate) fn new() -> Self {
        Self(PhantomData)
    }
}

impl<'de, T: OrdinalEnum> Visitor<'de> for OrdinalVisitor<T> {
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "an ordinal or variant name of {}", T::TYPE_NAME)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<T, E> {
        T::from_ordinal(value).ok_or_else(|| E::invalid_value(Unexpected::Unsigned(value), &self))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<T, E> {
        match u64::try_from(value) {
            Ok(value) => self.visit_u64(value),
            Err(_) => Err(E::invalid_value(Unexpected::Signed(value), &self)),
        }
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<T, E> {
        T::from_name(value).ok_or_else(|| E::invalid_value(Unexpected::Str(value), &self))
    }
}

/// Treats an explicit `null` the same as a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
