//! Closed enumerations shared by the rule engine, storage and API

use crate::rules::alias::{resolve, Aliased, Lookup};
use serde::{Deserialize, Serialize};

/// Dominant cafe type derived from accumulated review indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CafeType {
    Coffee,
    Spacious,
    CostEffective,
    Noisy,
    #[default]
    None,
}

impl CafeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CafeType::Coffee => "COFFEE",
            CafeType::Spacious => "SPACIOUS",
            CafeType::CostEffective => "COST_EFFECTIVE",
            CafeType::Noisy => "NOISY",
            CafeType::None => "NONE",
        }
    }

    /// Lenient parse; unknown input becomes `NONE`
    pub fn from_alias(input: &str) -> Self {
        resolve(input, Lookup::Fallback(CafeType::None)).unwrap_or_default()
    }
}

impl Aliased for CafeType {
    // Dimension names are accepted so the classifier can map a winning
    // dimension straight to its type.
    const ALIASES: &'static [(Self, &'static [&'static str])] = &[
        (CafeType::Coffee, &["COFFEE", "coffee"]),
        (CafeType::Spacious, &["SPACIOUS", "spacious", "space"]),
        (CafeType::CostEffective, &["COST_EFFECTIVE", "cost_effective", "price"]),
        (CafeType::Noisy, &["NOISY", "noisy", "noise"]),
        (CafeType::None, &["NONE", "none"]),
    ];
}

/// Cafe theme declared by reviewers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CafeTheme {
    Normal,
    Vibe,
    View,
    Pet,
    Hobby,
    Study,
    Kids,
    Etc,
}

impl CafeTheme {
    /// All themes in declaration order
    pub const ALL: [CafeTheme; 8] = [
        CafeTheme::Normal,
        CafeTheme::Vibe,
        CafeTheme::View,
        CafeTheme::Pet,
        CafeTheme::Hobby,
        CafeTheme::Study,
        CafeTheme::Kids,
        CafeTheme::Etc,
    ];

    /// Position in [`CafeTheme::ALL`]
    pub fn ordinal(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CafeTheme::Normal => "NORMAL",
            CafeTheme::Vibe => "VIBE",
            CafeTheme::View => "VIEW",
            CafeTheme::Pet => "PET",
            CafeTheme::Hobby => "HOBBY",
            CafeTheme::Study => "STUDY",
            CafeTheme::Kids => "KIDS",
            CafeTheme::Etc => "ETC",
        }
    }

    /// Lenient parse; unknown input becomes `ETC`
    pub fn from_alias(input: &str) -> Self {
        resolve(input, Lookup::Fallback(CafeTheme::Etc)).unwrap_or(CafeTheme::Etc)
    }
}

impl Aliased for CafeTheme {
    const ALIASES: &'static [(Self, &'static [&'static str])] = &[
        (CafeTheme::Normal, &["NORMAL", "normal"]),
        (CafeTheme::Vibe, &["VIBE", "vibe"]),
        (CafeTheme::View, &["VIEW", "view"]),
        (CafeTheme::Pet, &["PET", "pet"]),
        (CafeTheme::Hobby, &["HOBBY", "hobby"]),
        (CafeTheme::Study, &["STUDY", "study"]),
        (CafeTheme::Kids, &["KIDS", "kids"]),
        (CafeTheme::Etc, &["ETC", "etc"]),
    ];
}

/// Kind of media stored with the object storage provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileType {
    Image,
    Video,
}

impl FileType {
    /// Singular storage form, also accepted by the strict lookup
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Image => "image",
            FileType::Video => "video",
        }
    }

    /// Strict parse; `None` on any unknown spelling
    pub fn parse(input: &str) -> Option<Self> {
        resolve(input, Lookup::Strict)
    }
}

impl Aliased for FileType {
    const ALIASES: &'static [(Self, &'static [&'static str])] = &[
        (FileType::Image, &["image", "images"]),
        (FileType::Video, &["video", "videos"]),
    ];
}

/// Domain record family a stored file belonged to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileDomain {
    Member,
    Review,
    Etc,
}

impl FileDomain {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileDomain::Member => "member",
            FileDomain::Review => "review",
            FileDomain::Etc => "etc",
        }
    }

    /// Strict parse; `None` on any unknown spelling
    pub fn parse(input: &str) -> Option<Self> {
        resolve(input, Lookup::Strict)
    }
}

impl Aliased for FileDomain {
    const ALIASES: &'static [(Self, &'static [&'static str])] = &[
        (FileDomain::Member, &["member", "members"]),
        (FileDomain::Review, &["review", "reviews"]),
        (FileDomain::Etc, &["etc"]),
    ];
}
