//! Line scanner primitives
//!
//! Brace counting and the single-line patterns shared by the block extractors.
//! Nothing here keeps state beyond a counter.

use regex::Regex;
use std::sync::LazyLock;

/// `pub struct Name`
pub static STRUCT_DECL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"pub\s+struct\s+(\w+)").expect("struct pattern"));

/// `pub fn ...`
pub static PUB_FN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"pub\s+fn\s+").expect("pub fn pattern"));

/// Net brace delta of a single line (opening minus closing braces).
pub fn brace_delta(line: &str) -> i32 {
    line.chars().fold(0, |depth, ch| match ch {
        '{' => depth + 1,
        '}' => depth - 1,
        _ => depth,
    })
}

/// Running brace depth of a block.
///
/// A block is closed once the depth drops to zero or below after it has been
/// positive at least once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BraceDepth {
    depth: i32,
    opened: bool,
}

impl BraceDepth {
    /// Seed the counter from the line that opens the block.
    pub fn starting_at(line: &str) -> Self {
        let mut depth = BraceDepth::default();
        depth.feed(line);
        depth
    }

    /// Add a line's net delta. Returns the new depth.
    pub fn feed(&mut self, line: &str) -> i32 {
        self.add(brace_delta(line))
    }

    /// Add a precomputed delta. Returns the new depth.
    pub fn add(&mut self, delta: i32) -> i32 {
        self.depth += delta;
        if self.depth > 0 {
            self.opened = true;
        }
        self.depth
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    pub fn is_closed(&self) -> bool {
        self.opened && self.depth <= 0
    }
}

/// Capture `pub struct X` on a line.
pub fn struct_name(line: &str) -> Option<&str> {
    STRUCT_DECL
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
