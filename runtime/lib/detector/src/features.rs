//! Lexical feature extraction for request payloads.
//!
//! The layout of [`FeatureVector::to_array`] is the model's input contract:
//! anything trained or scored must go through [`extract_features`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const FEATURE_COUNT: usize = 6;

pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "length",
    "special_density",
    "sql_keywords",
    "xss_keywords",
    "encoded_chars",
    "entropy",
];

const SPECIAL_CHARS: &str = "',<>()[]{}!@#$%^&*+-=/\\|_";

const SQL_KEYWORDS: [&str; 8] = [
    "SELECT", "INSERT", "UPDATE", "DELETE", "DROP", "UNION", "OR 1=1", "--",
];

const XSS_KEYWORDS: [&str; 7] = [
    "<SCRIPT>",
    "ALERT(",
    "ONLOAD=",
    "ONERROR=",
    "JAVASCRIPT:",
    "IMG",
    "SVG",
];

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureVector {
    pub length: f64,
    pub special_density: f64,
    pub sql_keywords: f64,
    pub xss_keywords: f64,
    pub encoded_chars: f64,
    pub entropy: f64,
}

impl FeatureVector {
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.length,
            self.special_density,
            self.sql_keywords,
            self.xss_keywords,
            self.encoded_chars,
            self.entropy,
        ]
    }

    /// Rebuilds a vector from its wire layout. Returns `None` unless the slice
    /// holds exactly [`FEATURE_COUNT`] values.
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        match *values {
            [length, special_density, sql_keywords, xss_keywords, encoded_chars, entropy] => {
                Some(Self {
                    length,
                    special_density,
                    sql_keywords,
                    xss_keywords,
                    encoded_chars,
                    entropy,
                })
            }
            _ => None,
        }
    }
}

pub fn extract_features(payload: &str) -> FeatureVector {
    let length = payload.chars().count();

    let special = payload.chars().filter(|c| SPECIAL_CHARS.contains(*c)).count();
    let special_density = if length > 0 {
        special as f64 / length as f64
    } else {
        0.0
    };

    let upper = payload.to_uppercase();
    let sql_keywords = count_keywords(&upper, &SQL_KEYWORDS);
    let xss_keywords = count_keywords(&upper, &XSS_KEYWORDS);

    let encoded_chars = payload.matches('%').count();

    FeatureVector {
        length: length as f64,
        special_density,
        sql_keywords: sql_keywords as f64,
        xss_keywords: xss_keywords as f64,
        encoded_chars: encoded_chars as f64,
        entropy: shannon_entropy(payload),
    }
}

fn count_keywords(haystack: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|kw| haystack.contains(*kw)).count()
}

/// Shannon entropy (base 2) of the character distribution of `text`.
pub fn shannon_entropy(text: &str) -> f64 {
    let mut counts: HashMap<char, usize> = HashMap::new();
    let mut total = 0usize;
    for c in text.chars() {
        *counts.entry(c).or_insert(0) += 1;
        total += 1;
    }

    if total == 0 {
        return 0.0;
    }

    let mut entropy = 0.0;
    for &count in counts.values() {
        let p = count as f64 / total as f64;
        entropy -= p * p.log2();
    }
    entropy
}
