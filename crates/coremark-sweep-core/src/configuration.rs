//! Processor configurations under benchmark.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Built-in 32-bit sweep, most to least featureful.
pub const RV32_CONFIGURATIONS: [&str; 6] = [
    "rv32gc_zba_zbb_zbc",
    "rv32im_zicsr_zba_zbb_zbc",
    "rv32gc",
    "rv32imc_zicsr",
    "rv32im_zicsr",
    "rv32i_zicsr",
];

/// Built-in 64-bit sweep.
pub const RV64_CONFIGURATIONS: [&str; 6] = [
    "rv64gc_zba_zbb_zbc",
    "rv64im_zicsr_zba_zbb_zbc",
    "rv64gc",
    "rv64imc_zicsr",
    "rv64im_zicsr",
    "rv64i_zicsr",
];

/// Opaque name of one architecture/feature-set variant, passed to the build as `ARCH=`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration(String);

impl Configuration {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name usable as a file stem.
    pub fn file_stem(&self) -> String {
        self.0
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Configuration {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Configuration {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Register width the benchmark is built for (`XLEN=`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Xlen {
    #[default]
    Rv32,
    Rv64,
}

impl Xlen {
    pub fn bits(self) -> u32 {
        match self {
            Xlen::Rv32 => 32,
            Xlen::Rv64 => 64,
        }
    }

    /// The built-in sweep for this width.
    pub fn builtin_configurations(self) -> Vec<Configuration> {
        let names = match self {
            Xlen::Rv32 => RV32_CONFIGURATIONS,
            Xlen::Rv64 => RV64_CONFIGURATIONS,
        };
        names.iter().map(|n| Configuration::from(*n)).collect()
    }
}

impl TryFrom<u32> for Xlen {
    type Error = ConfigError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        match bits {
            32 => Ok(Xlen::Rv32),
            64 => Ok(Xlen::Rv64),
            other => Err(ConfigError::InvalidXlen(other)),
        }
    }
}

impl From<Xlen> for u32 {
    fn from(xlen: Xlen) -> u32 {
        xlen.bits()
    }
}

impl FromStr for Xlen {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bits = s
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::UnparsableXlen(s.to_string()))?;
        Xlen::try_from(bits)
    }
}

impl fmt::Display for Xlen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lists_match_width() {
        for (xlen, prefix) in [(Xlen::Rv32, "rv32"), (Xlen::Rv64, "rv64")] {
            let configs = xlen.builtin_configurations();
            assert_eq!(configs.len(), 6);
            assert!(configs.iter().all(|c| c.as_str().starts_with(prefix)));
        }
    }

    #[test]
    fn xlen_parses_only_32_and_64() {
        assert_eq!("32".parse::<Xlen>().unwrap(), Xlen::Rv32);
        assert_eq!(" 64 ".parse::<Xlen>().unwrap(), Xlen::Rv64);
        assert!(matches!(
            "128".parse::<Xlen>(),
            Err(ConfigError::InvalidXlen(128))
        ));
        let err = "rv32".parse::<Xlen>().unwrap_err();
        assert!(matches!(&err, ConfigError::UnparsableXlen(text) if text == "rv32"));
        assert_eq!(err.to_string(), "unsupported XLEN `rv32` (expected 32 or 64)");
    }

    #[test]
    fn file_stem_replaces_separators() {
        assert_eq!(Configuration::from("rv32gc").file_stem(), "rv32gc");
        assert_eq!(Configuration::from("a/b c").file_stem(), "a_b_c");
    }
}
