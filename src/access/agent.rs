//! User-agent classification.
//!
//! Access logs carry free-form agent strings, so classification is a set of
//! ordered, case-insensitive substring heuristics rather than a real parser.
//! The first matching rule wins, which is why the order of the checks below
//! matters: Edge and Opera advertise `Chrome` and `Safari` tokens too.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// Browser family detected from an agent string.
///
/// Variants are declared in detection priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum BrowserFamily {
    Edge,
    Firefox,
    Chrome,
    Safari,
    Opera,
    Yandex,
    BingBot,
    GoogleBot,
    YandexBot,
    Other,
    Unknown,
}

impl BrowserFamily {
    /// Detect the browser family of an agent string.
    ///
    /// An empty string is `Unknown`; a non-empty string that matches no rule
    /// is `Other`.
    pub fn detect(agent: &str) -> Self {
        if agent.is_empty() {
            return Self::Unknown;
        }

        let ua = agent.to_lowercase();

        if ua.contains("edge") || ua.contains("edg/") {
            Self::Edge
        } else if ua.contains("firefox") || ua.contains("fxios") {
            Self::Firefox
        } else if ua.contains("chrome") && !ua.contains("chromium") {
            Self::Chrome
        } else if ua.contains("safari") && !ua.contains("chrome") {
            Self::Safari
        } else if ua.contains("opera") || ua.contains("presto") {
            Self::Opera
        } else if ua.contains("yandex") {
            Self::Yandex
        } else if ua.contains("bingbot") {
            Self::BingBot
        } else if ua.contains("googlebot") {
            Self::GoogleBot
        } else if ua.contains("yandexbot") {
            Self::YandexBot
        } else {
            Self::Other
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Edge => "Edge",
            Self::Firefox => "Firefox",
            Self::Chrome => "Chrome",
            Self::Safari => "Safari",
            Self::Opera => "Opera",
            Self::Yandex => "Yandex",
            Self::BingBot => "BingBot",
            Self::GoogleBot => "GoogleBot",
            Self::YandexBot => "YandexBot",
            Self::Other => "Other",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for BrowserFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operating system family detected from an agent string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum OsFamily {
    Windows,
    #[serde(rename = "macOS")]
    MacOs,
    Linux,
    Android,
    #[serde(rename = "iOS")]
    Ios,
    Unknown,
}

impl OsFamily {
    /// Detect the operating system family of an agent string.
    ///
    /// Android agents also mention `Linux`, so Linux only matches when
    /// `android` is absent.
    pub fn detect(agent: &str) -> Self {
        if agent.is_empty() {
            return Self::Unknown;
        }

        let ua = agent.to_lowercase();

        if ua.contains("windows") || ua.contains("win32") || ua.contains("win64") {
            Self::Windows
        } else if ua.contains("mac") || ua.contains("os x") || ua.contains("darwin") {
            Self::MacOs
        } else if ua.contains("linux") && !ua.contains("android") {
            Self::Linux
        } else if ua.contains("android") {
            Self::Android
        } else if ua.contains("ios") || ua.contains("iphone") || ua.contains("ipad") {
            Self::Ios
        } else {
            Self::Unknown
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::MacOs => "macOS",
            Self::Linux => "Linux",
            Self::Android => "Android",
            Self::Ios => "iOS",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Crawlers recognized by the bot detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum BotKind {
    Googlebot,
    YandexBot,
}

impl BotKind {
    pub const ALL: [Self; 2] = [Self::Googlebot, Self::YandexBot];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Googlebot => "Googlebot",
            Self::YandexBot => "YandexBot",
        }
    }

    /// Exact, case-sensitive match against the canonical bot name.
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "Googlebot" => Some(Self::Googlebot),
            "YandexBot" => Some(Self::YandexBot),
            _ => None,
        }
    }
}

impl fmt::Display for BotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static FIRST_COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([^)]+)\)").expect("valid comment regex"));

/// Structured detection from the first parenthesized comment block.
///
/// Crawlers conventionally write `(compatible; Googlebot/2.1; +http://...)`,
/// so the second `;` segment up to its `/` is the candidate name.
pub fn bot_from_comment(agent: &str) -> Option<BotKind> {
    let comment = FIRST_COMMENT_RE.captures(agent)?.get(1)?.as_str();
    let fragment = comment.split(';').nth(1)?.trim();
    let (name, _) = fragment.split_once('/')?;
    BotKind::from_name(name.trim())
}

/// Unstructured detection anywhere in the agent string.
pub fn bot_from_substring(agent: &str) -> Option<BotKind> {
    let ua = agent.to_lowercase();
    if ua.contains("yandexbot") {
        Some(BotKind::YandexBot)
    } else if ua.contains("googlebot") {
        Some(BotKind::Googlebot)
    } else {
        None
    }
}

/// Detect a known crawler, preferring the structured comment over a plain
/// substring hit.
pub fn detect_bot(agent: &str) -> Option<BotKind> {
    bot_from_comment(agent).or_else(|| bot_from_substring(agent))
}

/// Classification derived from a single agent string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentClassification {
    browser: BrowserFamily,
    os: OsFamily,
    bot: Option<BotKind>,
}

impl AgentClassification {
    pub fn classify(agent: &str) -> Self {
        Self {
            browser: BrowserFamily::detect(agent),
            os: OsFamily::detect(agent),
            bot: detect_bot(agent),
        }
    }

    pub const fn browser(&self) -> BrowserFamily {
        self.browser
    }

    pub const fn os(&self) -> OsFamily {
        self.os
    }

    pub const fn bot(&self) -> Option<BotKind> {
        self.bot
    }

    pub const fn is_bot(&self) -> bool {
        self.bot.is_some()
    }
}
