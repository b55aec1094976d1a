//! Ink usage auditor
//!
//! Line-level pattern matching over raw source text. Runs independently of the
//! structural parser: comment lines are skipped, every other line is checked
//! against the whole pattern table.

pub mod patterns;

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

pub use patterns::{InkPattern, Trigger, INK_PATTERNS};

/// Finding severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One pattern hit on one line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditFinding {
    pub pattern_id: String,
    pub severity: Severity,
    pub title: String,
    pub suggestion: String,
    /// 1-based source line
    pub line: usize,
    /// The offending line, trimmed
    pub code: String,
}

/// Finding counts per severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSummary {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl AuditSummary {
    fn record(&mut self, severity: Severity) {
        match severity {
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditResult {
    pub findings: Vec<AuditFinding>,
    pub summary: AuditSummary,
}

/// Audit source text against [`INK_PATTERNS`].
pub fn analyze_ink_usage(source: &str) -> AuditResult {
    analyze_with(source, &INK_PATTERNS)
}

/// Audit source text against a custom pattern table.
pub fn analyze_with(source: &str, patterns: &[InkPattern]) -> AuditResult {
    let mut findings = Vec::new();

    for (idx, line) in source.lines().enumerate() {
        if line.trim_start().starts_with("//") {
            continue;
        }

        for pattern in patterns {
            if pattern.trigger.is_match(line) {
                findings.push(AuditFinding {
                    pattern_id: pattern.id.to_string(),
                    severity: pattern.severity,
                    title: pattern.title.to_string(),
                    suggestion: pattern.suggestion.to_string(),
                    line: idx + 1,
                    code: line.trim().to_string(),
                });
            }
        }
    }

    let mut summary = AuditSummary::default();
    for finding in &findings {
        summary.record(finding.severity);
    }

    debug!(
        high = summary.high,
        medium = summary.medium,
        low = summary.low,
        "ink audit complete"
    );

    AuditResult { findings, summary }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"use std::collections::HashMap;

#[external]
impl Registry {
    // let names: Vec<String> = Vec::new();
    pub fn label(&self, id: U256) -> String {
        let cached = self.cache.clone();
        format!("{}-{}", id, cached.len())
    }

    pub fn raw(&self) -> Vec<u8> {
        Vec::new()
    }
}
"#;

    #[test]
    fn test_findings_and_summary() {
        let result = analyze_ink_usage(SOURCE);
        let hits: Vec<(&str, usize)> = result
            .findings
            .iter()
            .map(|f| (f.pattern_id.as_str(), f.line))
            .collect();

        assert_eq!(
            hits,
            vec![
                ("hashmap-in-storage", 1),
                ("string-in-storage", 6),
                ("clone-usage", 7),
                ("format-macro", 8),
            ]
        );
        assert_eq!(
            result.summary,
            AuditSummary {
                high: 2,
                medium: 1,
                low: 1
            }
        );
        assert_eq!(result.findings[2].code, "let cached = self.cache.clone();");
    }

    #[test]
    fn test_multiple_patterns_on_one_line() {
        let result = analyze_ink_usage("let b = Box::new(items.clone());");
        let ids: Vec<&str> = result.findings.iter().map(|f| f.pattern_id.as_str()).collect();
        assert_eq!(ids, vec!["clone-usage", "box-new"]);
        assert_eq!(result.summary.medium, 2);
    }

    #[test]
    fn test_clean_source() {
        let result = analyze_ink_usage("sol_storage! {\n    pub struct C {\n        uint256 n;\n    }\n}\n");
        assert!(result.findings.is_empty());
        assert_eq!(result.summary.total(), 0);
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        let result = analyze_ink_usage("x: String");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["findings"][0]["severity"], "high");
        assert_eq!(json["findings"][0]["patternId"], "string-in-storage");
        assert_eq!(json["summary"]["high"], 1);
    }
}
