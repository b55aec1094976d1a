//! Structural parser for Stylus contracts
//!
//! This module contains:
//! - `scan`: brace counting and shared line patterns
//! - `storage`: recovers the contract name and fields of a `sol_storage!` block
//! - `functions`: collects the public functions of `#[external]` / `#[public]` impl blocks
//! - `signature`: parses one collected function into a [`Function`]
//!
//! The parser is line oriented and never fails: malformed input degrades to
//! empty lists and placeholder names.

pub mod functions;
pub mod scan;
pub mod signature;
pub mod storage;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use functions::{extract_function_blocks, FunctionBlock};
pub use signature::parse_function_block;
pub use storage::{extract_storage_fields, StorageLayout};

/// Name used when no storage struct can be found
pub const UNKNOWN_CONTRACT: &str = "UnknownContract";

/// Name used when a function signature cannot be parsed
pub const UNKNOWN_FUNCTION: &str = "unknown";

/// Return type of a function declared without `->`
pub const UNIT_TYPE: &str = "()";

/// A persistent field declared in the storage block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageField {
    pub name: String,
    /// Solidity type as written in `sol_storage!`
    #[serde(rename = "type")]
    pub ty: String,
    /// 1-based source line
    pub line: usize,
}

/// A function parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

/// An externally callable function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Function {
    pub name: String,
    pub params: Vec<Param>,
    /// Raw return type text, `()` when absent
    pub return_type: String,
    /// Takes `&mut self`
    pub is_mut: bool,
    /// First line of the signature
    pub line: usize,
    /// Text between the outermost braces, trimmed
    pub body: String,
}

/// Everything the parser recovers from one source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractInfo {
    pub name: String,
    pub storage_fields: Vec<StorageField>,
    pub functions: Vec<Function>,
}

/// Full parse: contract name, storage fields and external functions.
pub fn parse_contract(source: &str) -> ContractInfo {
    let StorageLayout {
        contract_name,
        fields,
    } = extract_storage_fields(source);

    let functions: Vec<Function> = extract_function_blocks(source)
        .iter()
        .map(|block| parse_function_block(&block.text, block.start_line))
        .collect();

    let name = contract_name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_CONTRACT.to_string());

    debug!(
        contract = %name,
        fields = fields.len(),
        functions = functions.len(),
        "parsed contract"
    );

    ContractInfo {
        name,
        storage_fields: fields,
        functions,
    }
}
