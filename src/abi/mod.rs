//! Rust → Solidity ABI type mapping
//!
//! Stylus entry points declare Rust types; the manifest describes them with
//! their Solidity equivalents. The mapping is lexical: a type maps through the
//! longest table key it contains.

pub mod encoder;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

pub use encoder::{encode_args, AbiEncoder, EncodeError, Token};

/// Fallback for types with no table entry
pub const DYNAMIC_BYTES: &str = "bytes";

/// One row of the type table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMapping {
    pub rust: &'static str,
    pub solidity: &'static str,
}

const fn mapping(rust: &'static str, solidity: &'static str) -> TypeMapping {
    TypeMapping { rust, solidity }
}

pub const RUST_TO_SOLIDITY: &[TypeMapping] = &[
    mapping("U256", "uint256"),
    mapping("U128", "uint128"),
    mapping("U64", "uint64"),
    mapping("u8", "uint8"),
    mapping("u16", "uint16"),
    mapping("u32", "uint32"),
    mapping("u64", "uint64"),
    mapping("bool", "bool"),
    mapping("Address", "address"),
    mapping("String", "string"),
    mapping("Vec<u8>", "bytes"),
];

static FIXED_BYTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[u8;\s*(\d+)\]").expect("fixed bytes pattern"));

static UNIT_RESULT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Result\s*<\s*\(\)\s*,").expect("unit result pattern"));

static VALUE_RESULT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Result\s*<\s*(.+?)\s*,").expect("result pattern"));

/// A named, typed ABI input or output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiParam {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

/// Map a Rust type to its Solidity ABI type.
pub fn map_type(rust_type: &str) -> String {
    let trimmed = rust_type.trim();

    // `[u8; N]` wins over any table entry
    if let Some(caps) = FIXED_BYTES.captures(trimmed) {
        return match caps[1].parse::<usize>() {
            Ok(n) if n <= 32 => format!("bytes{n}"),
            _ => DYNAMIC_BYTES.to_string(),
        };
    }

    let mut best: Option<&TypeMapping> = None;
    for entry in RUST_TO_SOLIDITY {
        if trimmed.contains(entry.rust) && best.map_or(true, |b| entry.rust.len() > b.rust.len()) {
            best = Some(entry);
        }
    }

    best.map_or(DYNAMIC_BYTES, |entry| entry.solidity).to_string()
}

/// Map a function's return type to ABI outputs.
///
/// `Result<(), E>` and `()` produce no outputs; `Result<T, E>` produces one
/// output typed after `T`.
pub fn map_return_type(return_type: &str) -> Vec<AbiParam> {
    let trimmed = return_type.trim();

    if UNIT_RESULT.is_match(trimmed) {
        return Vec::new();
    }

    if let Some(caps) = VALUE_RESULT.captures(trimmed) {
        return vec![value_output(&caps[1])];
    }

    if trimmed == "()" || trimmed.is_empty() {
        return Vec::new();
    }

    vec![value_output(trimmed)]
}

fn value_output(rust_type: &str) -> AbiParam {
    AbiParam {
        name: "value".to_string(),
        ty: map_type(rust_type),
    }
}
