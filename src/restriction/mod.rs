// Hidden API restriction module
//
// Answers "how restricted is reflective access to this member?":
// - parser: ingests `owner,member->SEVERITY` text into a RestrictionTable
// - database: writes the table as a sorted binary blob and looks members up
// - cache: keeps the blob on disk, keyed by format and data version

mod cache;
mod database;
mod parser;

pub use cache::RestrictionCache;
pub use database::{write_database, PrivateApiLookup, FORMAT_VERSION};
pub use parser::{ContainerKind, ParseStats, RestrictionParser, RestrictionTable};

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How strongly the platform restricts access to a non-SDK member
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Restriction {
    Unknown,
    /// Public SDK, always allowed
    White,
    /// Blocked for apps
    Black,
    /// Allowed, but not part of the SDK
    Grey,
    /// Allowed only for apps targeting O (27) or lower
    GreyMaxO,
    /// Allowed only for apps targeting P (28) or lower
    GreyMaxP,
}

impl Restriction {
    /// One-byte code stored in the binary database
    pub fn code(&self) -> u8 {
        match self {
            Restriction::Unknown => 0,
            Restriction::White => 1,
            Restriction::Black => 2,
            Restriction::Grey => 3,
            Restriction::GreyMaxO => 4,
            Restriction::GreyMaxP => 5,
        }
    }

    pub fn from_code(code: u8) -> Restriction {
        match code {
            1 => Restriction::White,
            2 => Restriction::Black,
            3 => Restriction::Grey,
            4 => Restriction::GreyMaxO,
            5 => Restriction::GreyMaxP,
            _ => Restriction::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Restriction::Unknown => "UNKNOWN",
            Restriction::White => "WHITE",
            Restriction::Black => "BLACK",
            Restriction::Grey => "GREY",
            Restriction::GreyMaxO => "GREY_MAX_O",
            Restriction::GreyMaxP => "GREY_MAX_P",
        }
    }
}

impl fmt::Display for Restriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Restriction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "UNKNOWN" => Ok(Restriction::Unknown),
            "WHITE" => Ok(Restriction::White),
            "BLACK" => Ok(Restriction::Black),
            "GREY" => Ok(Restriction::Grey),
            "GREY_MAX_O" => Ok(Restriction::GreyMaxO),
            "GREY_MAX_P" => Ok(Restriction::GreyMaxP),
            other => Err(Error::expression(other, "unknown restriction")),
        }
    }
}

/// A member to look up: `descriptor` is `None` for fields
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberRef {
    pub owner: String,
    pub name: String,
    pub descriptor: Option<String>,
}

impl MemberRef {
    pub fn field(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            descriptor: None,
        }
    }

    pub fn method(owner: impl Into<String>, name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            descriptor: Some(descriptor.into()),
        }
    }
}

/// Normalizes `Landroid/app/Activity;`, `android.app.Activity` and
/// `android/app/Activity` to the internal form `android/app/Activity`
pub(crate) fn normalize_owner(owner: &str) -> String {
    let owner = owner.trim();
    let owner = match owner.strip_prefix('L').and_then(|s| s.strip_suffix(';')) {
        Some(inner) => inner,
        None => owner,
    };
    owner.replace('.', "/")
}

/// Splits an internal class name into its container and simple name.
/// Nested classes live in their enclosing class, others in their package.
pub(crate) fn split_owner(owner: &str) -> (&str, &str, ContainerKind) {
    if let Some(index) = owner.rfind('$') {
        (&owner[..index], &owner[index + 1..], ContainerKind::Class)
    } else if let Some(index) = owner.rfind('/') {
        (&owner[..index], &owner[index + 1..], ContainerKind::Package)
    } else {
        ("", owner, ContainerKind::Package)
    }
}

/// Lookup key for a member: method keys keep the parameter list but drop
/// everything after its closing parenthesis
pub(crate) fn member_key(name: &str, descriptor: Option<&str>) -> String {
    let mut key = match descriptor {
        Some(descriptor) => format!("{}{}", name, descriptor),
        None => name.to_string(),
    };
    if key.contains('(') {
        if let Some(close) = key.find(')') {
            key.truncate(close + 1);
        }
    } else if let Some(colon) = key.find(':') {
        key.truncate(colon);
    }
    key
}
