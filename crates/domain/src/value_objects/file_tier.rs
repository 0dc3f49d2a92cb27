//! Large file size tiers

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::errors::DomainError;

const MIB: u64 = 1024 * 1024;

/// Fixed size tiers for on-disk large file generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LargeFileTier {
    Mb100,
    Mb500,
    Gb1,
    Gb5,
}

impl LargeFileTier {
    /// All tiers, smallest first
    pub const ALL: [Self; 4] = [Self::Mb100, Self::Mb500, Self::Gb1, Self::Gb5];

    /// Tier label as used in settings and download links
    pub const fn label(self) -> &'static str {
        match self {
            Self::Mb100 => "100mb",
            Self::Mb500 => "500mb",
            Self::Gb1 => "1gb",
            Self::Gb5 => "5gb",
        }
    }

    /// Size of the backing file in MiB blocks
    pub const fn size_mib(self) -> u64 {
        match self {
            Self::Mb100 => 100,
            Self::Mb500 => 500,
            Self::Gb1 => 1024,
            Self::Gb5 => 5 * 1024,
        }
    }

    /// Size of the backing file in bytes
    pub const fn size_bytes(self) -> u64 {
        self.size_mib() * MIB
    }

    /// File name of the backing file
    pub fn file_name(self) -> String {
        format!("large-{}.bin", self.label())
    }
}

impl FromStr for LargeFileTier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::UnknownFileTier(s.to_string()))
    }
}

impl TryFrom<String> for LargeFileTier {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LargeFileTier> for String {
    fn from(value: LargeFileTier) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for LargeFileTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_use_binary_units() {
        assert_eq!(LargeFileTier::Mb100.size_bytes(), 100 * 1_048_576);
        assert_eq!(LargeFileTier::Gb1.size_bytes(), 1_073_741_824);
    }

    #[test]
    fn parses_labels() {
        assert_eq!("1GB".parse::<LargeFileTier>().unwrap(), LargeFileTier::Gb1);
        assert_eq!("500mb".parse::<LargeFileTier>().unwrap(), LargeFileTier::Mb500);
    }

    #[test]
    fn unknown_tier_is_rejected() {
        let err = "7gb".parse::<LargeFileTier>().unwrap_err();
        assert!(matches!(err, DomainError::UnknownFileTier(t) if t == "7gb"));
    }

    #[test]
    fn file_name_contains_label() {
        assert_eq!(LargeFileTier::Gb5.file_name(), "large-5gb.bin");
    }
}
