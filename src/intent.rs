//! Natural-language intent resolution
//!
//! Matches a free-text request against a manifest's function names and, when
//! the request carries numbers, encodes them as call arguments.
//!
//! Matching is first-match in manifest order: the first function sharing any
//! name token with the query wins, even if a later one shares more.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

use crate::abi::encoder::encode_args_hex;
use crate::manifest::{AgentManifest, ManifestFunction};

static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").expect("number pattern"));

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentResult {
    pub matched: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
    /// `0x`-prefixed ABI encoding of the arguments, without selector
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calldata: Option<String>,
}

impl IntentResult {
    pub fn unmatched() -> Self {
        IntentResult::default()
    }
}

/// Lowercased name tokens, `transfer_from` → `["transfer", "from"]`
fn name_tokens(name: &str) -> Vec<String> {
    name.to_lowercase()
        .split('_')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

fn match_score(func: &ManifestFunction, query: &str) -> usize {
    name_tokens(&func.name)
        .iter()
        .filter(|token| query.contains(token.as_str()))
        .count()
}

/// Resolve a query against a manifest. No manifest means no match.
pub fn resolve_intent(query: &str, manifest: Option<&AgentManifest>) -> IntentResult {
    let Some(manifest) = manifest else {
        return IntentResult::unmatched();
    };

    let query = query.to_lowercase();
    let query = query.trim();

    let Some(func) = manifest.abi.iter().find(|f| match_score(f, query) >= 1) else {
        debug!(query, "no manifest function matched");
        return IntentResult::unmatched();
    };

    let args: Vec<String> = NUMBER
        .find_iter(query)
        .take(func.inputs.len())
        .map(|m| m.as_str().to_string())
        .collect();

    let calldata = if !func.inputs.is_empty() && !args.is_empty() {
        let types: Vec<&str> = func.inputs.iter().map(|input| input.ty.as_str()).collect();
        let values: Vec<&str> = (0..func.inputs.len())
            .map(|idx| args.get(idx).map_or("0", String::as_str))
            .collect();

        match encode_args_hex(&types, &values) {
            Ok(hex) => Some(hex),
            Err(e) => {
                debug!(function = %func.name, error = %e, "calldata omitted");
                None
            }
        }
    } else {
        None
    };

    debug!(function = %func.name, args = args.len(), "intent matched");

    IntentResult {
        matched: true,
        function_name: Some(func.name.clone()),
        args: Some(args),
        calldata,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::AbiParam;
    use crate::manifest::StateMutability;

    fn entry(name: &str, inputs: &[&str]) -> ManifestFunction {
        ManifestFunction {
            name: name.to_string(),
            description: String::new(),
            inputs: inputs
                .iter()
                .enumerate()
                .map(|(i, ty)| AbiParam {
                    name: format!("arg{i}"),
                    ty: ty.to_string(),
                })
                .collect(),
            outputs: Vec::new(),
            state_mutability: StateMutability::Nonpayable,
        }
    }

    fn manifest(abi: Vec<ManifestFunction>) -> AgentManifest {
        AgentManifest {
            schema: "erc-8004-v1".to_string(),
            name: "Test".to_string(),
            description: String::new(),
            version: "0.1.0".to_string(),
            abi,
        }
    }

    #[test]
    fn test_no_manifest() {
        assert_eq!(resolve_intent("increment", None), IntentResult::unmatched());
    }

    #[test]
    fn test_match_with_calldata() {
        let m = manifest(vec![entry("number", &[]), entry("set_number", &["uint256"])]);
        let result = resolve_intent("Please SET it to 42", Some(&m));
        assert!(result.matched);
        assert_eq!(result.function_name.as_deref(), Some("set_number"));
        assert_eq!(result.args, Some(vec!["42".to_string()]));
        assert_eq!(
            result.calldata.as_deref(),
            Some("0x000000000000000000000000000000000000000000000000000000000000002a")
        );
    }

    #[test]
    fn test_first_match_wins() {
        // `set_number` shares two tokens but `number` comes first
        let m = manifest(vec![entry("number", &[]), entry("set_number", &["uint256"])]);
        let result = resolve_intent("set number to 7", Some(&m));
        assert_eq!(result.function_name.as_deref(), Some("number"));
        assert_eq!(result.args, Some(Vec::new()));
        assert_eq!(result.calldata, None);
    }

    #[test]
    fn test_missing_args_default_to_zero() {
        let m = manifest(vec![entry("transfer", &["uint256", "uint256"])]);
        let result = resolve_intent("transfer 5", Some(&m));
        assert_eq!(result.args, Some(vec!["5".to_string()]));
        let calldata = result.calldata.unwrap();
        assert_eq!(calldata.len(), 2 + 128);
        assert!(calldata.ends_with(&"0".repeat(64)));
    }

    #[test]
    fn test_encoding_failure_omits_calldata() {
        let m = manifest(vec![entry("transfer", &["address", "uint256"])]);
        let result = resolve_intent("transfer 100 tokens", Some(&m));
        assert!(result.matched);
        assert_eq!(result.args, Some(vec!["100".to_string()]));
        assert_eq!(result.calldata, None);
    }

    #[test]
    fn test_only_ascii_digits_are_args() {
        let m = manifest(vec![entry("set_number", &["uint256"])]);
        let result = resolve_intent("set number to ٤٢", Some(&m));
        assert!(result.matched);
        assert_eq!(result.args, Some(Vec::new()));
        assert_eq!(result.calldata, None);
    }

    #[test]
    fn test_no_token_match() {
        let m = manifest(vec![entry("increment", &[])]);
        assert!(!resolve_intent("withdraw everything", Some(&m)).matched);
    }

    #[test]
    fn test_unmatched_json_omits_optionals() {
        let json = serde_json::to_value(IntentResult::unmatched()).unwrap();
        assert_eq!(json, serde_json::json!({ "matched": false }));
    }
}
