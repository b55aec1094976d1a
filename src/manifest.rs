//! Agent manifest generation
//!
//! Describes a contract's callable surface as an ERC-8004 style manifest so
//! agents can discover and invoke it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::abi::{map_return_type, map_type, AbiParam};
use crate::parser::{parse_contract, ContractInfo, Function};

pub const MANIFEST_SCHEMA: &str = "erc-8004-v1";
pub const DEFAULT_VERSION: &str = "0.1.0";

/// One ABI entry of the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestFunction {
    pub name: String,
    pub description: String,
    pub inputs: Vec<AbiParam>,
    pub outputs: Vec<AbiParam>,
    pub state_mutability: StateMutability,
}

/// Solidity state mutability. Generated manifests only use `nonpayable` and
/// `view`; the others are accepted when reading a manifest back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateMutability {
    Nonpayable,
    View,
    Payable,
    Pure,
}

impl From<&Function> for StateMutability {
    fn from(func: &Function) -> Self {
        if func.is_mut {
            StateMutability::Nonpayable
        } else {
            StateMutability::View
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentManifest {
    pub schema: String,
    pub name: String,
    pub description: String,
    pub version: String,
    pub abi: Vec<ManifestFunction>,
}

/// Overrides for the manifest header; unset fields fall back to values
/// derived from the contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestOptions {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// Parse `source` and describe its external functions.
pub fn generate_agent_manifest(source: &str, options: &ManifestOptions) -> AgentManifest {
    manifest_for(&parse_contract(source), options)
}

/// Build a manifest from an already parsed contract.
pub fn manifest_for(contract: &ContractInfo, options: &ManifestOptions) -> AgentManifest {
    let abi: Vec<ManifestFunction> = contract
        .functions
        .iter()
        .map(|func| ManifestFunction {
            name: func.name.clone(),
            description: format!("Calls {} on the {} contract", func.name, contract.name),
            inputs: func
                .params
                .iter()
                .map(|p| AbiParam {
                    name: p.name.clone(),
                    ty: map_type(&p.ty),
                })
                .collect(),
            outputs: map_return_type(&func.return_type),
            state_mutability: StateMutability::from(func),
        })
        .collect();

    debug!(contract = %contract.name, entries = abi.len(), "manifest generated");

    AgentManifest {
        schema: MANIFEST_SCHEMA.to_string(),
        name: options
            .name
            .clone()
            .unwrap_or_else(|| contract.name.clone()),
        description: options.description.clone().unwrap_or_else(|| {
            format!("Agent manifest for the {} Stylus contract", contract.name)
        }),
        version: options
            .version
            .clone()
            .unwrap_or_else(|| DEFAULT_VERSION.to_string()),
        abi,
    }
}
