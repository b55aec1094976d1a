//! Named tool dispatch
//!
//! Every tool takes a JSON object and returns a JSON value. This is the only
//! layer that reports errors: an unknown tool name or an input object of the
//! wrong shape.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

use crate::auditor::analyze_ink_usage;
use crate::intent::resolve_intent;
use crate::manifest::{generate_agent_manifest, AgentManifest, ManifestOptions};
use crate::parser::parse_contract;
use crate::testgen::generate_motsu_tests;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid input for {tool}: {source}")]
    InvalidInput {
        tool: ToolName,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize result: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    AnalyzeInkUsage,
    GenerateMotsuTests,
    GenerateAgentManifest,
    ParseContract,
    ResolveIntent,
}

impl ToolName {
    pub const ALL: [ToolName; 5] = [
        ToolName::AnalyzeInkUsage,
        ToolName::GenerateMotsuTests,
        ToolName::GenerateAgentManifest,
        ToolName::ParseContract,
        ToolName::ResolveIntent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::AnalyzeInkUsage => "analyze_ink_usage",
            ToolName::GenerateMotsuTests => "generate_motsu_tests",
            ToolName::GenerateAgentManifest => "generate_agent_manifest",
            ToolName::ParseContract => "parse_contract",
            ToolName::ResolveIntent => "resolve_intent",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolName::AnalyzeInkUsage => {
                "Scan Stylus Rust source for patterns that waste Ink (gas)"
            }
            ToolName::GenerateMotsuTests => {
                "Generate Motsu framework unit tests for a Stylus Rust smart contract"
            }
            ToolName::GenerateAgentManifest => {
                "Generate an ERC-8004 agent manifest describing a Stylus contract's ABI"
            }
            ToolName::ParseContract => {
                "Extract contract name, storage fields and external functions"
            }
            ToolName::ResolveIntent => {
                "Match a natural-language request to a manifest function and encode its arguments"
            }
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| ToolError::UnknownTool(s.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct SourceInput {
    source_code: String,
}

#[derive(Debug, Deserialize)]
struct ManifestInput {
    source_code: String,
    #[serde(flatten)]
    options: ManifestOptions,
}

#[derive(Debug, Deserialize)]
struct IntentInput {
    query: String,
    #[serde(default)]
    manifest: Option<AgentManifest>,
}

fn input<T: DeserializeOwned>(tool: ToolName, value: Value) -> Result<T, ToolError> {
    serde_json::from_value(value).map_err(|source| ToolError::InvalidInput { tool, source })
}

/// Run a tool by name.
pub fn call_tool(name: &str, value: Value) -> Result<Value, ToolError> {
    let tool = name.parse::<ToolName>().inspect_err(|_| {
        warn!(tool = name, "unknown tool requested");
    })?;
    info!(%tool, "calling tool");

    let output = match tool {
        ToolName::AnalyzeInkUsage => {
            let SourceInput { source_code } = input(tool, value)?;
            serde_json::to_value(analyze_ink_usage(&source_code))?
        }
        ToolName::GenerateMotsuTests => {
            let SourceInput { source_code } = input(tool, value)?;
            serde_json::to_value(generate_motsu_tests(&source_code))?
        }
        ToolName::GenerateAgentManifest => {
            let ManifestInput {
                source_code,
                options,
            } = input(tool, value)?;
            serde_json::to_value(generate_agent_manifest(&source_code, &options))?
        }
        ToolName::ParseContract => {
            let SourceInput { source_code } = input(tool, value)?;
            serde_json::to_value(parse_contract(&source_code))?
        }
        ToolName::ResolveIntent => {
            let IntentInput { query, manifest } = input(tool, value)?;
            serde_json::to_value(resolve_intent(&query, manifest.as_ref()))?
        }
    };

    Ok(output)
}
