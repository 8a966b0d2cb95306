//! Randomization modes and the synthesis policy each one selects.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

/// How values are synthesized for a case.
///
/// Declaration order matters: the default settings table assigns seeds in
/// this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RandomizationMode {
    /// Uniformly random content and lengths.
    Random,
    /// All-zero content; lists empty, byte lists of length one.
    Zero,
    /// Maximum content and lengths.
    Max,
    /// Zero content and empty collections.
    Nil,
    /// Content of one, collections of length one.
    One,
    /// Maximum lengths filled with random content.
    Lengthy,
}

/// Scalar/byte content policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    Zero,
    One,
    Max,
    Uniform,
}

/// Length policy for bounded collections; `bound` is `min(declared, external)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthRule {
    Empty,
    /// `min(1, bound)`
    Single,
    Bound,
    /// Uniform in `[0, bound]`.
    Uniform,
}

impl LengthRule {
    /// Resolve to a concrete length, drawing from `draw` only for `Uniform`.
    pub fn resolve(self, bound: u64, draw: impl FnOnce(u64) -> u64) -> u64 {
        match self {
            LengthRule::Empty => 0,
            LengthRule::Single => bound.min(1),
            LengthRule::Bound => bound,
            LengthRule::Uniform => draw(bound),
        }
    }
}

/// Synthesis policy selected by a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModePolicy {
    pub fill: Fill,
    /// Length of `List` and `Bitlist` values.
    pub list_length: LengthRule,
    /// Length of `ByteList` values.
    pub byte_list_length: LengthRule,
}

impl RandomizationMode {
    pub const ALL: [RandomizationMode; 6] = [
        RandomizationMode::Random,
        RandomizationMode::Zero,
        RandomizationMode::Max,
        RandomizationMode::Nil,
        RandomizationMode::One,
        RandomizationMode::Lengthy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RandomizationMode::Random => "random",
            RandomizationMode::Zero => "zero",
            RandomizationMode::Max => "max",
            RandomizationMode::Nil => "nil",
            RandomizationMode::One => "one",
            RandomizationMode::Lengthy => "lengthy",
        }
    }

    /// Changing modes produce a different value per case index.
    pub fn is_changing(self) -> bool {
        matches!(self, RandomizationMode::Random | RandomizationMode::Lengthy)
    }

    /// Suite directory name: `ssz_{mode}` with a `_chaos` suffix.
    pub fn suite_name(self, chaos: bool) -> String {
        if chaos {
            format!("ssz_{}_chaos", self.name())
        } else {
            format!("ssz_{}", self.name())
        }
    }

    pub fn policy(self) -> ModePolicy {
        use LengthRule::*;
        let (fill, list_length, byte_list_length) = match self {
            RandomizationMode::Zero => (Fill::Zero, Empty, Single),
            RandomizationMode::Max => (Fill::Max, Bound, Bound),
            RandomizationMode::Nil => (Fill::Zero, Empty, Empty),
            RandomizationMode::One => (Fill::One, Single, Single),
            RandomizationMode::Random => (Fill::Uniform, Uniform, Uniform),
            RandomizationMode::Lengthy => (Fill::Uniform, Bound, Bound),
        };
        ModePolicy {
            fill,
            list_length,
            byte_list_length,
        }
    }
}

impl fmt::Display for RandomizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RandomizationMode {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RandomizationMode::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| GenerationError::UnknownMode(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suite_names() {
        assert_eq!(RandomizationMode::Random.suite_name(false), "ssz_random");
        assert_eq!(RandomizationMode::Random.suite_name(true), "ssz_random_chaos");
        assert_eq!(RandomizationMode::Lengthy.suite_name(false), "ssz_lengthy");
    }

    #[test]
    fn test_changing_modes() {
        let changing: Vec<_> = RandomizationMode::ALL
            .into_iter()
            .filter(|m| m.is_changing())
            .collect();
        assert_eq!(
            changing,
            vec![RandomizationMode::Random, RandomizationMode::Lengthy]
        );
    }

    #[test]
    fn test_parse_roundtrip_and_unknown() {
        for mode in RandomizationMode::ALL {
            assert_eq!(mode.name().parse::<RandomizationMode>().unwrap(), mode);
        }
        assert_eq!(
            "chaotic".parse::<RandomizationMode>().unwrap_err(),
            GenerationError::UnknownMode("chaotic".into())
        );
    }

    #[test]
    fn test_length_rules() {
        fn never(_: u64) -> u64 {
            panic!("no draw expected")
        }
        assert_eq!(LengthRule::Single.resolve(0, never), 0);
        assert_eq!(LengthRule::Single.resolve(7, never), 1);
        assert_eq!(LengthRule::Bound.resolve(7, never), 7);
        assert_eq!(LengthRule::Uniform.resolve(7, |b| b - 2), 5);
    }

    #[test]
    fn test_zero_mode_byte_list_is_single() {
        let policy = RandomizationMode::Zero.policy();
        assert_eq!(policy.list_length, LengthRule::Empty);
        assert_eq!(policy.byte_list_length, LengthRule::Single);
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&RandomizationMode::Lengthy).unwrap();
        assert_eq!(json, "\"lengthy\"");
    }
}
