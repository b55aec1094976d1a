//! Ink cost patterns
//!
//! Each entry pairs a line-level trigger with the advice shown when it fires.
//! Entries are checked in table order.

use regex::Regex;
use std::sync::LazyLock;

use super::Severity;

/// What a pattern looks for on a single line
#[derive(Debug)]
pub enum Trigger {
    /// Any match of the regex
    Matches(Regex),
    /// A match of `pattern` whose following text does not start with `rejected`
    MatchesUnlessFollowedBy { pattern: Regex, rejected: Regex },
}

impl Trigger {
    pub fn is_match(&self, line: &str) -> bool {
        match self {
            Trigger::Matches(re) => re.is_match(line),
            Trigger::MatchesUnlessFollowedBy { pattern, rejected } => pattern
                .find_iter(line)
                .any(|m| !rejected.is_match(&line[m.end()..])),
        }
    }
}

/// A known ink-cost pattern
#[derive(Debug)]
pub struct InkPattern {
    pub id: &'static str,
    pub trigger: Trigger,
    pub severity: Severity,
    pub title: &'static str,
    pub suggestion: &'static str,
}

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid ink pattern {pattern:?}: {e}"))
}

pub static INK_PATTERNS: LazyLock<Vec<InkPattern>> = LazyLock::new(|| {
    vec![
        InkPattern {
            id: "string-in-storage",
            trigger: Trigger::Matches(re(r"\bString\b")),
            severity: Severity::High,
            title: "String used in storage",
            suggestion: "Use `StorageString` from stylus-sdk instead. Heap-allocated String costs significantly more Ink for reads/writes.",
        },
        InkPattern {
            id: "hashmap-in-storage",
            trigger: Trigger::Matches(re(r"\bHashMap\b|\bBTreeMap\b")),
            severity: Severity::High,
            title: "HashMap/BTreeMap used instead of StorageMap",
            suggestion: "Use `StorageMap` via `sol_storage!` macro. Native Rust maps serialize the entire collection on each access, costing O(n) Ink.",
        },
        InkPattern {
            id: "vec-in-storage",
            // `Vec<u8>` is the ABI bytes type and is fine
            trigger: Trigger::MatchesUnlessFollowedBy {
                pattern: re(r"\bVec\s*<"),
                rejected: re(r"^u8\s*>"),
            },
            severity: Severity::High,
            title: "Vec used in storage",
            suggestion: "Use `StorageVec` from stylus-sdk. A standard Vec serializes entirely on each read/write, which is extremely expensive.",
        },
        InkPattern {
            id: "clone-usage",
            trigger: Trigger::Matches(re(r"\.clone\(\)")),
            severity: Severity::Medium,
            title: "Unnecessary .clone() detected",
            suggestion: "Use references (&T) instead of cloning. Each clone allocates memory and copies data, increasing Ink cost.",
        },
        InkPattern {
            id: "unbounded-iter",
            trigger: Trigger::Matches(re(r"\.iter\(\)[\s\S]{0,40}\.collect")),
            severity: Severity::Medium,
            title: "Unbounded iteration with .collect()",
            suggestion: "Add bounds with `.take(n)` before `.collect()`. Unbounded iteration can exhaust the Ink budget and revert.",
        },
        InkPattern {
            id: "box-new",
            trigger: Trigger::Matches(re(r"Box::new\b")),
            severity: Severity::Medium,
            title: "Heap allocation via Box::new",
            suggestion: "Prefer stack-based alternatives. Heap allocations in WASM are costly and increase Ink usage.",
        },
        InkPattern {
            id: "format-macro",
            trigger: Trigger::Matches(re(r"format!\s*\(")),
            severity: Severity::Low,
            title: "format!() macro used",
            suggestion: "Use fixed-size byte arrays or pre-computed values where possible. format! allocates and is expensive in WASM.",
        },
    ]
});
