//! Symbol catalogue

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LrError;

/// One of the fixed reel symbols
///
/// Declaration order is the canonical order used for weight walks, so it must
/// never be reshuffled once weight tables exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SymbolKind {
    #[serde(rename = "J")]
    J = 0,
    #[serde(rename = "N")]
    N = 1,
    #[serde(rename = "T")]
    T = 2,
    #[serde(rename = "M")]
    M = 3,
    /// Stage backdrop
    #[serde(rename = "BJ")]
    Backdrop = 4,
    /// Center-parted hair
    #[serde(rename = "ZFT")]
    CenterPart = 5,
    /// Overalls
    #[serde(rename = "BDK")]
    Overalls = 6,
    /// Basketball
    #[serde(rename = "LQ")]
    Basketball = 7,
    /// Default bonus symbol
    #[serde(rename = "MAN")]
    Man = 8,
    /// Default punishment symbol (lawyer's letter)
    #[serde(rename = "LSH")]
    LawyerLetter = 9,
}

impl SymbolKind {
    /// Number of kinds in the catalogue
    pub const COUNT: usize = 10;

    /// All kinds in canonical order
    pub const ALL: [SymbolKind; Self::COUNT] = [
        Self::J,
        Self::N,
        Self::T,
        Self::M,
        Self::Backdrop,
        Self::CenterPart,
        Self::Overalls,
        Self::Basketball,
        Self::Man,
        Self::LawyerLetter,
    ];

    /// Short persisted code
    pub fn code(self) -> &'static str {
        match self {
            Self::J => "J",
            Self::N => "N",
            Self::T => "T",
            Self::M => "M",
            Self::Backdrop => "BJ",
            Self::CenterPart => "ZFT",
            Self::Overalls => "BDK",
            Self::Basketball => "LQ",
            Self::Man => "MAN",
            Self::LawyerLetter => "LSH",
        }
    }

    /// Display name
    pub fn display_name(self) -> &'static str {
        match self {
            Self::J => "Ji",
            Self::N => "Ni",
            Self::T => "Tai",
            Self::M => "Mei",
            Self::Backdrop => "Backdrop",
            Self::CenterPart => "Center Part",
            Self::Overalls => "Overalls",
            Self::Basketball => "Basketball",
            Self::Man => "Man",
            Self::LawyerLetter => "Lawyer Letter",
        }
    }

    /// Position in the canonical order
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look a kind up by its code (case-insensitive, surrounding whitespace ignored)
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.code().eq_ignore_ascii_case(code))
    }
}

impl FromStr for SymbolKind {
    type Err = LrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| LrError::UnknownSymbol(s.to_string()))
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
