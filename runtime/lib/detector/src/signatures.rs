//! Known-attack signatures matched against raw payload text.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreatCategory {
    #[serde(rename = "SQL Injection")]
    SqlInjection,
    #[serde(rename = "XSS")]
    Xss,
    #[serde(rename = "Path Traversal")]
    PathTraversal,
    #[serde(rename = "WebShell/RCE")]
    WebShell,
}

/// Checked in order; the first category with a matching pattern wins.
const SIGNATURES: &[(ThreatCategory, &[&str])] = &[
    (
        ThreatCategory::SqlInjection,
        &[
            r"(?i)UNION\s+SELECT",
            r"(?i)OR\s+1=1",
            r"(?i)admin'--",
            r"(?i)DROP\s+TABLE",
            r"(?i)SLEEP\(\d+\)",
            r"(?i)BENCHMARK\(",
            r"(?i)information_schema",
        ],
    ),
    (
        ThreatCategory::Xss,
        &[
            r"(?i)<script.*?>",
            r"(?i)javascript:",
            r"(?i)onerror=",
            r"(?i)onload=",
            r"(?i)eval\(",
            r"(?i)alert\(",
            r"(?i)document\.cookie",
        ],
    ),
    (
        ThreatCategory::PathTraversal,
        &[
            r"\.\./",
            r"(?i)%2e%2e%2f",
            r"(?i)/etc/passwd",
            r"(?i)/windows/system32",
            r"(?i)boot\.ini",
        ],
    ),
    (
        ThreatCategory::WebShell,
        &[
            r"(?i)cmd\.exe",
            r"(?i)bin/sh",
            r"(?i)bin/bash",
            r"(?i)passthru\(",
            r"(?i)exec\(",
            r"(?i)system\(",
            r"(?i)shell_exec\(",
        ],
    ),
];

struct CompiledSignature {
    category: ThreatCategory,
    pattern: Regex,
}

pub struct SignatureEngine {
    signatures: Vec<CompiledSignature>,
}

impl Default for SignatureEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SignatureEngine {
    pub fn new() -> Self {
        let signatures = SIGNATURES
            .iter()
            .flat_map(|(category, patterns)| {
                patterns.iter().filter_map(move |p| match Regex::new(p) {
                    Ok(pattern) => Some(CompiledSignature {
                        category: *category,
                        pattern,
                    }),
                    Err(e) => {
                        warn!(pattern = %p, "Skipping invalid signature: {}", e);
                        None
                    }
                })
            })
            .collect();

        Self { signatures }
    }

    pub fn detect(&self, payload: &str) -> Option<ThreatCategory> {
        self.signatures
            .iter()
            .find(|sig| sig.pattern.is_match(payload))
            .map(|sig| sig.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::KNOWN_ATTACKS;

    #[test]
    fn test_all_patterns_compile() {
        let expected: usize = SIGNATURES.iter().map(|(_, p)| p.len()).sum();
        assert_eq!(SignatureEngine::new().signatures.len(), expected);
    }

    #[test]
    fn test_known_attacks_match() {
        let engine = SignatureEngine::new();
        for attack in KNOWN_ATTACKS {
            assert!(engine.detect(attack).is_some(), "{attack} unmatched");
        }
    }

    #[test]
    fn test_categories() {
        let engine = SignatureEngine::new();
        assert_eq!(
            engine.detect("' or 1=1 --"),
            Some(ThreatCategory::SqlInjection)
        );
        assert_eq!(
            engine.detect("<SCRIPT src=//x>"),
            Some(ThreatCategory::Xss)
        );
        assert_eq!(
            engine.detect("/static/%2E%2E%2Fsecret"),
            Some(ThreatCategory::PathTraversal)
        );
        assert_eq!(
            engine.detect("q=;/bin/sh -i"),
            Some(ThreatCategory::WebShell)
        );
    }

    #[test]
    fn test_benign_paths_do_not_match() {
        let engine = SignatureEngine::new();
        for payload in ["/api/users/42", "/static/app.min.js", "search=union+station", ""] {
            assert_eq!(engine.detect(payload), None, "{payload}");
        }
    }

    #[test]
    fn test_category_wire_names() {
        assert_eq!(
            serde_json::to_string(&ThreatCategory::WebShell).unwrap(),
            "\"WebShell/RCE\""
        );
    }
}
