//! # stylus-architect
//!
//! Stylus Architect: tooling for Arbitrum Stylus contracts written in Rust.
//!
//! This crate provides:
//! - A structural parser that recovers a contract's name, `sol_storage!` fields
//!   and `#[external]` / `#[public]` entry points from source text
//! - An Ink auditor that flags gas-expensive patterns line by line
//! - Motsu test skeleton and ERC-8004 agent manifest generators
//! - An intent resolver turning free-text requests into ABI calldata
//! - A named tool layer (`call_tool`) exposing all of the above over JSON
//!
//! ## Usage
//!
//! ```rust
//! use stylus_architect::parse_contract;
//!
//! let source = r#"
//! sol_storage! {
//!     #[entrypoint]
//!     pub struct Counter {
//!         uint256 number;
//!     }
//! }
//!
//! #[external]
//! impl Counter {
//!     pub fn increment(&mut self) {
//!         let number = self.number.get();
//!         self.number.set(number + U256::from(1));
//!     }
//! }
//! "#;
//!
//! let contract = parse_contract(source);
//! assert_eq!(contract.name, "Counter");
//! assert_eq!(contract.storage_fields[0].ty, "uint256");
//! assert!(contract.functions[0].is_mut);
//! ```
//!
//! The parser never fails. Input it cannot make sense of yields empty field
//! and function lists and the `UnknownContract` placeholder name.

pub mod abi;
pub mod auditor;
pub mod intent;
pub mod manifest;
pub mod parser;
pub mod testgen;
pub mod tools;

pub use auditor::{analyze_ink_usage, AuditFinding, AuditResult, AuditSummary, Severity};
pub use intent::{resolve_intent, IntentResult};
pub use manifest::{generate_agent_manifest, AgentManifest, ManifestFunction, ManifestOptions};
pub use parser::{parse_contract, ContractInfo, Function, Param, StorageField};
pub use testgen::{generate_motsu_tests, GeneratedTest, TestGeneratorResult};
pub use tools::{call_tool, ToolError, ToolName};
