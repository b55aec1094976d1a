//! Function signature parsing

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use super::{Function, Param, UNIT_TYPE, UNKNOWN_FUNCTION};

/// Groups: 1=name, 2=receiver, 3=remaining params, 4=return type
static SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"pub\s+fn\s+(\w+)\s*\(\s*(&(?:mut\s+)?self)(?:\s*,\s*([\s\S]*?))?\)\s*(?:->\s*([\s\S]*?))?\s*\{",
    )
    .expect("signature pattern")
});

/// Parse one collected function block.
///
/// A block whose signature does not match yields a function named `unknown`
/// with no parameters, unit return type and an immutable receiver.
pub fn parse_function_block(block: &str, line: usize) -> Function {
    let caps = SIGNATURE.captures(block);
    if caps.is_none() {
        debug!(line, "unrecognised function signature");
    }

    let name = caps
        .as_ref()
        .and_then(|c| c.get(1))
        .map_or(UNKNOWN_FUNCTION, |m| m.as_str())
        .to_string();
    let is_mut = caps
        .as_ref()
        .and_then(|c| c.get(2))
        .is_some_and(|m| m.as_str().contains("mut"));
    let raw_params = caps
        .as_ref()
        .and_then(|c| c.get(3))
        .map_or("", |m| m.as_str().trim());
    let return_type = caps
        .as_ref()
        .and_then(|c| c.get(4))
        .map_or(UNIT_TYPE, |m| m.as_str().trim())
        .to_string();

    Function {
        name,
        params: split_params(raw_params),
        return_type,
        is_mut,
        line,
        body: body_of(block),
    }
}

/// Split `a: U256, b: Address` into parameters.
///
/// Commas inside generic arguments are not tracked: `m: HashMap<K, V>` comes
/// out as `m: HashMap<K` and the ` V>` remainder is dropped. Pieces that do
/// not contain exactly one colon are skipped.
fn split_params(raw: &str) -> Vec<Param> {
    if raw.is_empty() {
        return Vec::new();
    }

    raw.split(',')
        .filter_map(|piece| {
            let mut parts = piece.trim().split(':');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(name), Some(ty), None) => Some(Param {
                    name: name.trim().to_string(),
                    ty: ty.trim().to_string(),
                }),
                _ => None,
            }
        })
        .collect()
}

/// Text between the first `{` and the last `}`
fn body_of(block: &str) -> String {
    match (block.find('{'), block.rfind('}')) {
        (Some(start), Some(end)) if end > start => block[start + 1..end].trim().to_string(),
        _ => String::new(),
    }
}
