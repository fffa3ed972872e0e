//! The snippet record and the closed enumerations attached to it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A stored text snippet.
///
/// `text`, `created_at` and `expires_at` never change after creation; the
/// remaining flags only move through read-state transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Snippet {
    pub id: String,
    pub text: String,
    pub language: Language,
    pub burn_after_read: bool,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Snippet {
    /// True once `expires_at` has been reached. Snippets without an expiry never expire.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Fixed-width RFC 3339 rendering used for every timestamp column.
///
/// Millisecond precision with a `Z` suffix keeps lexical order equal to
/// chronological order, which the expiry queries rely on.
pub(crate) fn to_db_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn from_db_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|at| at.with_timezone(&Utc))
}

/// How long a snippet stays readable.
///
/// The `Default` is the shortest lifetime and is what unrecognized input maps
/// to in [`ExpiryClass::parse_or_default`]. The tool and CLI surfaces default
/// an omitted expiry to [`ExpiryClass::OneHour`] instead and reject unknown
/// values outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub enum ExpiryClass {
    #[default]
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "1w")]
    OneWeek,
    #[serde(rename = "30d")]
    OneMonth,
    #[serde(rename = "never")]
    Never,
}

impl ExpiryClass {
    pub const ALL: [ExpiryClass; 6] = [
        ExpiryClass::OneMinute,
        ExpiryClass::OneHour,
        ExpiryClass::OneDay,
        ExpiryClass::OneWeek,
        ExpiryClass::OneMonth,
        ExpiryClass::Never,
    ];

    /// Lifetime of the class, or `None` for snippets that never expire.
    pub fn duration(self) -> Option<Duration> {
        match self {
            ExpiryClass::OneMinute => Some(Duration::minutes(1)),
            ExpiryClass::OneHour => Some(Duration::hours(1)),
            ExpiryClass::OneDay => Some(Duration::days(1)),
            ExpiryClass::OneWeek => Some(Duration::weeks(1)),
            ExpiryClass::OneMonth => Some(Duration::days(30)),
            ExpiryClass::Never => None,
        }
    }

    pub fn expires_at(self, created_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.duration().map(|ttl| created_at + ttl)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExpiryClass::OneMinute => "1m",
            ExpiryClass::OneHour => "1h",
            ExpiryClass::OneDay => "1d",
            ExpiryClass::OneWeek => "1w",
            ExpiryClass::OneMonth => "30d",
            ExpiryClass::Never => "never",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExpiryClass::OneMinute => "One Minute",
            ExpiryClass::OneHour => "One Hour",
            ExpiryClass::OneDay => "One Day",
            ExpiryClass::OneWeek => "One Week",
            ExpiryClass::OneMonth => "One Month",
            ExpiryClass::Never => "Never",
        }
    }

    /// Lenient parse: anything unrecognized becomes the shortest lifetime.
    pub fn parse_or_default(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for ExpiryClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected enumeration value, carrying the offending input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized value: {0}")]
pub struct UnknownVariant(pub String);

impl FromStr for ExpiryClass {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExpiryClass::ALL
            .into_iter()
            .find(|class| class.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// Rendering hint for a snippet. The store never interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    #[serde(rename = "txt")]
    Plaintext,
    Bash,
    Css,
    Dockerfile,
    Go,
    Html,
    Javascript,
    Json,
    Lua,
    Nix,
    Python,
    Rust,
    Sql,
    Toml,
    Typescript,
    Yaml,
}

impl Language {
    pub const ALL: [Language; 16] = [
        Language::Plaintext,
        Language::Bash,
        Language::Css,
        Language::Dockerfile,
        Language::Go,
        Language::Html,
        Language::Javascript,
        Language::Json,
        Language::Lua,
        Language::Nix,
        Language::Python,
        Language::Rust,
        Language::Sql,
        Language::Toml,
        Language::Typescript,
        Language::Yaml,
    ];

    /// Tag as stored and accepted on input.
    pub fn tag(self) -> &'static str {
        match self {
            Language::Plaintext => "txt",
            Language::Bash => "bash",
            Language::Css => "css",
            Language::Dockerfile => "dockerfile",
            Language::Go => "go",
            Language::Html => "html",
            Language::Javascript => "javascript",
            Language::Json => "json",
            Language::Lua => "lua",
            Language::Nix => "nix",
            Language::Python => "python",
            Language::Rust => "rust",
            Language::Sql => "sql",
            Language::Toml => "toml",
            Language::Typescript => "typescript",
            Language::Yaml => "yaml",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Language::Plaintext => "Plaintext",
            Language::Bash => "Bash",
            Language::Css => "CSS",
            Language::Dockerfile => "Docker",
            Language::Go => "Go",
            Language::Html => "HTML",
            Language::Javascript => "JavaScript",
            Language::Json => "JSON",
            Language::Lua => "Lua",
            Language::Nix => "Nix",
            Language::Python => "Python",
            Language::Rust => "Rust",
            Language::Sql => "SQL",
            Language::Toml => "TOML",
            Language::Typescript => "TypeScript",
            Language::Yaml => "YAML",
        }
    }

    /// Lenient parse used when reading rows back: unknown tags render as plaintext.
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or_default()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Language {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.tag() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}
