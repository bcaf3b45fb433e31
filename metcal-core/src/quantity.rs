//! Sensor Quantity Classification
//!
//! Sensor records carry free-text names and types ("Sensor Suhu Udara",
//! "Wind Speed", "Barometer Digital"), mixing Indonesian and English. The
//! acceptance rules are keyed by physical quantity, so every record has to be
//! mapped onto a [`SensorQuantity`] first.
//!
//! ## Matching Rules
//!
//! - Case-insensitive substring search
//! - Keywords of [`SHORT_KEYWORD_LEN`] characters or fewer ("rh") must match a
//!   whole word, so "Pyrheliometer" is not a humidity sensor
//! - Rules are tried in table order; the first hit wins
//! - No hit yields [`SensorQuantity::Unknown`], never an absent value
//!
//! Order matters: "arah angin" (wind direction) has to be tried before the
//! bare "angin" (wind) keyword, and temperature keywords run before the
//! humidity ones so combined "temperature & humidity" probes classify as
//! temperature.
//!
//! ## Extending the Table
//!
//! ```rust
//! use metcal_core::quantity::{KeywordClassifier, QuantityClassifier, SensorQuantity};
//!
//! let classifier = KeywordClassifier::default()
//!     .with_rule("psychrometer", SensorQuantity::Humidity);
//!
//! assert_eq!(classifier.classify("Assmann Psychrometer"), SensorQuantity::Humidity);
//! assert_eq!(classifier.classify("Sensor Suhu"), SensorQuantity::Temperature);
//! ```

use alloc::string::String;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Maximum number of keyword rules a classifier can hold
pub const MAX_KEYWORD_RULES: usize = 48;

/// Keywords this short only match whole words
pub const SHORT_KEYWORD_LEN: usize = 3;

/// Physical quantity measured by a sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorQuantity {
    /// Air temperature
    Temperature,
    /// Relative humidity
    Humidity,
    /// Barometric pressure
    Pressure,
    /// Wind speed
    WindSpeed,
    /// Wind direction
    WindDirection,
    /// Precipitation amount
    Rainfall,
    /// No keyword matched
    Unknown,
}

impl SensorQuantity {
    /// Display unit used by the fixed rule table
    pub fn unit(&self) -> &'static str {
        match self {
            Self::Temperature => "°C",
            Self::Humidity => "%RH",
            Self::Pressure => "hPa",
            Self::WindSpeed => "m/s",
            Self::WindDirection => "°",
            Self::Rainfall => "mm",
            Self::Unknown => "",
        }
    }

    /// True for every variant except [`SensorQuantity::Unknown`]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for SensorQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Pressure => "pressure",
            Self::WindSpeed => "wind speed",
            Self::WindDirection => "wind direction",
            Self::Rainfall => "rainfall",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Maps free text onto a physical quantity
pub trait QuantityClassifier {
    /// Classify a sensor name or type string
    fn classify(&self, text: &str) -> SensorQuantity;
}

impl<F> QuantityClassifier for F
where
    F: Fn(&str) -> SensorQuantity,
{
    fn classify(&self, text: &str) -> SensorQuantity {
        self(text)
    }
}

/// A single keyword → quantity rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRule {
    keyword: String,
    quantity: SensorQuantity,
}

impl KeywordRule {
    /// Create a rule; the keyword is stored lowercased
    pub fn new(keyword: &str, quantity: SensorQuantity) -> Self {
        Self {
            keyword: keyword.to_lowercase(),
            quantity,
        }
    }

    /// Lowercased keyword
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Quantity assigned on a match
    pub fn quantity(&self) -> SensorQuantity {
        self.quantity
    }

    /// Whether the rule hits an already lowercased text
    pub fn matches(&self, haystack: &str) -> bool {
        if self.keyword.is_empty() {
            return false;
        }
        if self.keyword.chars().count() <= SHORT_KEYWORD_LEN {
            haystack
                .split(|c: char| !c.is_alphanumeric())
                .any(|word| word == self.keyword)
        } else {
            haystack.contains(self.keyword.as_str())
        }
    }
}

/// Ordered keyword table, first match wins
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    rules: heapless::Vec<KeywordRule, MAX_KEYWORD_RULES>,
}

/// Default keyword table in evaluation order
const DEFAULT_RULES: &[(&str, SensorQuantity)] = &[
    ("arah angin", SensorQuantity::WindDirection),
    ("wind direction", SensorQuantity::WindDirection),
    ("wind dir", SensorQuantity::WindDirection),
    ("winddir", SensorQuantity::WindDirection),
    ("kecepatan angin", SensorQuantity::WindSpeed),
    ("wind speed", SensorQuantity::WindSpeed),
    ("windspeed", SensorQuantity::WindSpeed),
    ("anemometer", SensorQuantity::WindSpeed),
    ("angin", SensorQuantity::WindSpeed),
    ("wind", SensorQuantity::WindSpeed),
    ("suhu", SensorQuantity::Temperature),
    ("temp", SensorQuantity::Temperature),
    ("termometer", SensorQuantity::Temperature),
    ("thermometer", SensorQuantity::Temperature),
    ("kelembaban", SensorQuantity::Humidity),
    ("kelembapan", SensorQuantity::Humidity),
    ("humid", SensorQuantity::Humidity),
    ("hygro", SensorQuantity::Humidity),
    ("rh", SensorQuantity::Humidity),
    ("tekanan", SensorQuantity::Pressure),
    ("press", SensorQuantity::Pressure),
    ("barometer", SensorQuantity::Pressure),
    ("hujan", SensorQuantity::Rainfall),
    ("rain", SensorQuantity::Rainfall),
    ("precip", SensorQuantity::Rainfall),
    ("ombrometer", SensorQuantity::Rainfall),
];

impl Default for KeywordClassifier {
    fn default() -> Self {
        let mut classifier = Self::empty();
        for (keyword, quantity) in DEFAULT_RULES {
            // DEFAULT_RULES is well under MAX_KEYWORD_RULES
            let _ = classifier.push_rule(keyword, *quantity);
        }
        classifier
    }
}

impl KeywordClassifier {
    /// Classifier with no rules; everything is `Unknown`
    pub fn empty() -> Self {
        Self {
            rules: heapless::Vec::new(),
        }
    }

    /// Append a rule after the existing ones
    ///
    /// Returns the rule back when the table is full.
    pub fn push_rule(&mut self, keyword: &str, quantity: SensorQuantity) -> Result<(), KeywordRule> {
        self.rules.push(KeywordRule::new(keyword, quantity))
    }

    /// Builder form of [`push_rule`](Self::push_rule); a full table drops the rule
    pub fn with_rule(mut self, keyword: &str, quantity: SensorQuantity) -> Self {
        if let Err(rule) = self.push_rule(keyword, quantity) {
            log_warn!(
                "Keyword table full ({} rules), dropping rule '{}' -> {}",
                MAX_KEYWORD_RULES,
                rule.keyword(),
                rule.quantity()
            );
        }
        self
    }

    /// Rules in evaluation order
    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }
}

impl QuantityClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> SensorQuantity {
        let haystack = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&haystack))
            .map(|rule| rule.quantity)
            .unwrap_or(SensorQuantity::Unknown)
    }
}
