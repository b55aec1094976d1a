//! Storage block extraction
//!
//! Recovers the contract name and the persistent fields declared inside a
//! `sol_storage! { ... }` block.

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, trace};

use super::scan::{struct_name, BraceDepth};
use super::StorageField;

static STORAGE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"sol_storage!\s*\{").expect("storage block pattern"));

/// Solidity-style field declarations such as `uint256 number;`
static FIELD_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s+([\w<>,\s]+?)\s+(\w+)\s*;").expect("field pattern")
});

static STORAGE_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#\[(storage|entrypoint)\]").expect("storage attribute pattern"));

/// What the storage extractor recovered from a source file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageLayout {
    /// Name of the storage struct, if one was declared
    pub contract_name: Option<String>,
    /// Fields in declaration order
    pub fields: Vec<StorageField>,
}

/// Extract the contract name and storage fields from the first `sol_storage!` block.
///
/// Scanning stops once the block's brace depth returns to zero. A block that
/// never closes is read to the end of the input. When the block names no
/// struct, a `#[storage]` / `#[entrypoint]` struct elsewhere in the file is used.
pub fn extract_storage_fields(source: &str) -> StorageLayout {
    let lines: Vec<&str> = source.lines().collect();
    let mut contract_name: Option<String> = None;
    let mut fields = Vec::new();
    let mut block: Option<BraceDepth> = None;

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;

        let Some(depth) = block.as_mut() else {
            if STORAGE_OPEN.is_match(line) {
                let depth = BraceDepth::starting_at(line);
                debug!(line = line_no, depth = depth.depth(), "storage block opened");

                if let Some(name) = struct_name(line) {
                    contract_name = Some(name.to_string());
                }

                // `sol_storage! { }` on a single line
                if depth.depth() <= 0 {
                    debug!(line = line_no, "storage block closed on its opening line");
                    break;
                }
                block = Some(depth);
            }
            continue;
        };

        depth.feed(line);

        let named_here = if contract_name.is_none() {
            match struct_name(line) {
                Some(name) => {
                    debug!(line = line_no, name, "storage struct found");
                    contract_name = Some(name.to_string());
                    true
                }
                None => false,
            }
        } else {
            false
        };

        if !named_here {
            if let Some(field) = field_on_line(line, line_no) {
                trace!(line = line_no, name = %field.name, ty = %field.ty, "storage field");
                fields.push(field);
            }
        }

        if depth.is_closed() {
            debug!(line = line_no, fields = fields.len(), "storage block closed");
            break;
        }
    }

    if contract_name.is_none() {
        contract_name = attribute_struct_name(&lines);
    }

    StorageLayout {
        contract_name,
        fields,
    }
}

fn field_on_line(line: &str, line_no: usize) -> Option<StorageField> {
    let caps = FIELD_DECL.captures(line)?;
    Some(StorageField {
        name: caps[2].to_string(),
        ty: caps[1].trim().to_string(),
        line: line_no,
    })
}

/// `#[storage]` or `#[entrypoint]` followed within two lines by `pub struct X`
fn attribute_struct_name(lines: &[&str]) -> Option<String> {
    lines.iter().enumerate().find_map(|(idx, line)| {
        if !STORAGE_ATTR.is_match(line) {
            return None;
        }
        lines
            .iter()
            .skip(idx + 1)
            .take(2)
            .find_map(|next| struct_name(next))
            .map(str::to_string)
    })
}
