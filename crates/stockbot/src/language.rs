//! Reply language support
//!
//! Labels on the quote card and the error reply are localized. Thai is the
//! default; unknown languages fall back to English labels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Language used for reply labels
///
/// # Examples
///
/// ```
/// use stockbot::Language;
///
/// assert_eq!(Language::from_code("th"), Language::Thai);
/// assert_eq!(Language::from_code("English"), Language::English);
/// assert_eq!(Language::from_code("ja"), Language::Other("ja".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    /// Thai
    #[default]
    Thai,
    /// English
    English,
    /// Other languages (ISO 639-1 code), rendered with English labels
    Other(String),
}

/// Localized labels used by the quote formatter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    pub last_price: &'static str,
    pub change: &'static str,
    pub fetch_error: &'static str,
}

const THAI_LABELS: Labels = Labels {
    last_price: "ราคาล่าสุด",
    change: "เปลี่ยนแปลง",
    fetch_error: "เกิดข้อผิดพลาดในการดึงข้อมูลหุ้น",
};

const ENGLISH_LABELS: Labels = Labels {
    last_price: "Last price",
    change: "Change",
    fetch_error: "Failed to fetch stock data for",
};

impl Language {
    /// Get ISO 639-1 language code
    pub fn code(&self) -> &str {
        match self {
            Language::Thai => "th",
            Language::English => "en",
            Language::Other(code) => code,
        }
    }

    /// Parse from ISO 639-1 code or common name
    pub fn from_code(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "th" | "thai" | "ไทย" | "th-th" => Language::Thai,
            "en" | "english" | "en-us" | "en-gb" => Language::English,
            other => Language::Other(other.to_string()),
        }
    }

    /// Labels for this language
    pub fn labels(&self) -> Labels {
        match self {
            Language::Thai => THAI_LABELS,
            Language::English | Language::Other(_) => ENGLISH_LABELS,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
