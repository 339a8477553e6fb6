//! Dimension model.
//!
//! A dimension is one independent axis of build variation. Each dimension is
//! a closed enum whose values carry a stable bit (`1 << index`) and a stable
//! display name. A [`DimensionSet`] is a subset of one dimension's values and
//! is only used as template input; a concrete target always holds plain
//! dimension values.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::ops::BitOr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, TargetError};

/// One axis of the target matrix.
pub trait Dimension:
    Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Dimension label used in diagnostics and matrix files.
    const NAME: &'static str;

    /// Every value of the dimension, in ascending bit order.
    const ALL: &'static [Self];

    /// The value's bit.
    fn bit(self) -> u32;

    /// The value's display name.
    fn name(self) -> &'static str;

    /// Checked conversion from a raw bit.
    ///
    /// Zero, multi-bit, and unknown patterns are all rejected.
    fn from_bit(bit: u32) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.bit() == bit)
            .ok_or_else(|| TargetError::UnsupportedValue {
                dimension: Self::NAME,
                value: format!("{bit:#x}"),
            })
    }

    /// Checked conversion from a display name.
    fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.name() == name)
            .ok_or_else(|| TargetError::UnsupportedValue {
                dimension: Self::NAME,
                value: name.to_string(),
            })
    }

    /// Bit mask covering every value of the dimension.
    fn all_bits() -> u32 {
        Self::ALL.iter().fold(0, |acc, v| acc | v.bit())
    }
}

macro_rules! dimension {
    (
        $(#[$meta:meta])*
        $ty:ident, $label:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $name:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $ty {
            $( $(#[$vmeta])* $variant ),+
        }

        impl Dimension for $ty {
            const NAME: &'static str = $label;
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn bit(self) -> u32 {
                1 << (self as u32)
            }

            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = TargetError;

            fn from_str(s: &str) -> Result<Self> {
                Self::from_name(s)
            }
        }

        impl TryFrom<u32> for $ty {
            type Error = TargetError;

            fn try_from(bit: u32) -> Result<Self> {
                Self::from_bit(bit)
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.name())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let name = String::deserialize(deserializer)?;
                Self::from_name(&name).map_err(serde::de::Error::custom)
            }
        }

        impl BitOr for $ty {
            type Output = DimensionSet<$ty>;

            fn bitor(self, rhs: Self) -> DimensionSet<$ty> {
                DimensionSet::single(self).with(rhs)
            }
        }
    };
}

dimension! {
    /// Target platform.
    Platform, "platform" {
        Win32 => "win32",
        Win64 => "win64",
    }
}

dimension! {
    /// C/C++ compiler front end.
    Compiler, "compiler" {
        Msvc => "MSVC",
        ClangCl => "ClangCl",
    }
}

dimension! {
    /// Development environment (Visual Studio release) the project files target.
    DevEnv, "dev-env" {
        Vs2017 => "vs2017",
        Vs2019 => "vs2019",
        Vs2022 => "vs2022",
    }
}

impl Default for DevEnv {
    fn default() -> Self {
        Self::Vs2022
    }
}

dimension! {
    /// Local optimization level.
    Optimization, "optimization" {
        Debug => "Debug",
        Release => "Release",
    }
}

dimension! {
    /// Unity (blob) build mode.
    Blob, "blob" {
        /// Generator-managed unity files.
        Blob => "Blob",
        /// One compilation unit per source file.
        NoBlob => "NoBlob",
        /// Unity files produced by FastBuild.
        FastBuildUnitys => "FastBuildUnitys",
    }
}

dimension! {
    /// Underlying build tool.
    BuildSystem, "build-system" {
        MsBuild => "MSBuild",
        FastBuild => "FastBuild",
    }
}

/// A subset of one dimension's values, backed by a bit mask.
///
/// Iteration always yields values in ascending bit order.
pub struct DimensionSet<D> {
    bits: u32,
    _marker: PhantomData<D>,
}

impl<D: Dimension> DimensionSet<D> {
    /// The empty set.
    pub const fn empty() -> Self {
        Self {
            bits: 0,
            _marker: PhantomData,
        }
    }

    /// A set holding exactly one value.
    pub fn single(value: D) -> Self {
        Self::empty().with(value)
    }

    /// Every value of the dimension.
    pub fn all() -> Self {
        Self {
            bits: D::all_bits(),
            _marker: PhantomData,
        }
    }

    /// Checked conversion from a raw mask. Bits outside the dimension are rejected.
    pub fn from_bits(bits: u32) -> Result<Self> {
        let unknown = bits & !D::all_bits();
        if unknown != 0 {
            return Err(TargetError::UnsupportedValue {
                dimension: D::NAME,
                value: format!("{unknown:#x}"),
            });
        }
        Ok(Self {
            bits,
            _marker: PhantomData,
        })
    }

    /// The raw mask.
    pub fn bits(self) -> u32 {
        self.bits
    }

    /// Add a value in place.
    pub fn insert(&mut self, value: D) {
        self.bits |= value.bit();
    }

    /// Return a copy of the set with `value` added.
    #[must_use]
    pub fn with(mut self, value: D) -> Self {
        self.insert(value);
        self
    }

    pub fn contains(self, value: D) -> bool {
        self.bits & value.bit() != 0
    }

    pub fn len(self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Lowest-bit member, if any.
    pub fn first(self) -> Option<D> {
        self.iter().next()
    }

    /// Members in ascending bit order.
    pub fn iter(self) -> impl Iterator<Item = D> {
        D::ALL.iter().copied().filter(move |v| self.contains(*v))
    }
}

impl<D> Clone for DimensionSet<D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for DimensionSet<D> {}

impl<D> PartialEq for DimensionSet<D> {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<D> Eq for DimensionSet<D> {}

impl<D> Hash for DimensionSet<D> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.bits.hash(state);
    }
}

impl<D: Dimension> Default for DimensionSet<D> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<D: Dimension> fmt::Debug for DimensionSet<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<D: Dimension> fmt::Display for DimensionSet<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(Dimension::name).collect();
        f.write_str(&names.join("|"))
    }
}

impl<D: Dimension> From<D> for DimensionSet<D> {
    fn from(value: D) -> Self {
        Self::single(value)
    }
}

impl<D: Dimension> FromIterator<D> for DimensionSet<D> {
    fn from_iter<I: IntoIterator<Item = D>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl<D: Dimension> BitOr<D> for DimensionSet<D> {
    type Output = Self;

    fn bitor(self, rhs: D) -> Self {
        self.with(rhs)
    }
}

impl<D: Dimension> BitOr for DimensionSet<D> {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            bits: self.bits | rhs.bits,
            _marker: PhantomData,
        }
    }
}

impl<D: Dimension + Serialize> Serialize for DimensionSet<D> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<D> {
    One(D),
    Many(Vec<D>),
}

impl<'de, D> Deserialize<'de> for DimensionSet<D>
where
    D: Dimension + Deserialize<'de>,
{
    fn deserialize<De: Deserializer<'de>>(deserializer: De) -> std::result::Result<Self, De::Error> {
        Ok(match OneOrMany::<D>::deserialize(deserializer)? {
            OneOrMany::One(value) => Self::single(value),
            OneOrMany::Many(values) => values.into_iter().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_follow_declaration_order() {
        assert_eq!(Platform::Win32.bit(), 1);
        assert_eq!(Platform::Win64.bit(), 2);
        assert_eq!(Blob::Blob.bit(), 1);
        assert_eq!(Blob::NoBlob.bit(), 2);
        assert_eq!(Blob::FastBuildUnitys.bit(), 4);
        assert_eq!(DevEnv::all_bits(), 0b111);
    }

    #[test]
    fn names_are_distinct_across_dimensions() {
        let mut names: Vec<&str> = Vec::new();
        names.extend(Platform::ALL.iter().map(|v| v.name()));
        names.extend(Compiler::ALL.iter().map(|v| v.name()));
        names.extend(DevEnv::ALL.iter().map(|v| v.name()));
        names.extend(Optimization::ALL.iter().map(|v| v.name()));
        names.extend(Blob::ALL.iter().map(|v| v.name()));
        names.extend(BuildSystem::ALL.iter().map(|v| v.name()));
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn from_bit_rejects_unknown_and_multi_bit() {
        assert_eq!(Optimization::from_bit(2).unwrap(), Optimization::Release);
        assert!(matches!(
            Optimization::from_bit(0),
            Err(TargetError::UnsupportedValue { dimension: "optimization", .. })
        ));
        assert!(Optimization::from_bit(0b11).is_err());
        assert!(Optimization::try_from(0b100).is_err());
    }

    #[test]
    fn parse_by_name() {
        assert_eq!("ClangCl".parse::<Compiler>().unwrap(), Compiler::ClangCl);
        assert_eq!("MSBuild".parse::<BuildSystem>().unwrap(), BuildSystem::MsBuild);
        let err = "clang".parse::<Compiler>().unwrap_err();
        assert!(err.to_string().contains("unsupported compiler value"));
    }

    #[test]
    fn bitor_builds_sets() {
        let set = Compiler::Msvc | Compiler::ClangCl;
        assert_eq!(set.len(), 2);
        assert_eq!(set.bits(), 0b11);
        assert_eq!(set, DimensionSet::all());

        let blobs = DimensionSet::single(Blob::FastBuildUnitys) | Blob::Blob;
        assert_eq!(blobs.iter().collect::<Vec<_>>(), vec![Blob::Blob, Blob::FastBuildUnitys]);
        assert_eq!(blobs.first(), Some(Blob::Blob));
    }

    #[test]
    fn empty_set() {
        let set = DimensionSet::<Platform>::empty();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert_eq!(set.first(), None);
        assert_eq!(DimensionSet::<Platform>::default(), set);
    }

    #[test]
    fn from_bits_checks_range() {
        let set = DimensionSet::<Blob>::from_bits(0b101).unwrap();
        assert!(set.contains(Blob::Blob));
        assert!(!set.contains(Blob::NoBlob));
        assert!(set.contains(Blob::FastBuildUnitys));
        assert!(DimensionSet::<Blob>::from_bits(0b1000).is_err());
    }

    #[test]
    fn display_joins_with_pipe() {
        let set = Optimization::Debug | Optimization::Release;
        assert_eq!(set.to_string(), "Debug|Release");
        assert_eq!(format!("{:?}", set), "{Debug, Release}");
    }

    #[test]
    fn serde_names() {
        let json = serde_json::to_string(&BuildSystem::FastBuild).unwrap();
        assert_eq!(json, "\"FastBuild\"");
        let set: DimensionSet<Compiler> = serde_json::from_str("[\"ClangCl\", \"MSVC\"]").unwrap();
        assert_eq!(set, Compiler::Msvc | Compiler::ClangCl);
        let single: DimensionSet<Platform> = serde_json::from_str("\"win64\"").unwrap();
        assert_eq!(single, DimensionSet::single(Platform::Win64));
        assert_eq!(serde_json::to_string(&single).unwrap(), "[\"win64\"]");
        assert!(serde_json::from_str::<DimensionSet<Platform>>("\"arm64\"").is_err());
    }
}
