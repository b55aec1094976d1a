//! Motsu test skeleton generation
//!
//! Renders every scenario in [`TEST_SCENARIOS`] for every external function
//! and assembles the result into one test module.

pub mod templates;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::parser::{parse_contract, ContractInfo};

pub use templates::{default_value_for_type, test_footer, test_header, TestScenario, TEST_SCENARIOS};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedTest {
    /// Scenario label
    pub scenario: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestGeneratorResult {
    pub header: String,
    pub tests: Vec<GeneratedTest>,
    pub full_file: String,
}

pub fn generate_motsu_tests(source: &str) -> TestGeneratorResult {
    tests_for(&parse_contract(source))
}

pub fn tests_for(contract: &ContractInfo) -> TestGeneratorResult {
    let header = test_header(&contract.name);
    let mut tests = Vec::new();

    for func in &contract.functions {
        for scenario in TEST_SCENARIOS {
            let code = (scenario.render)(&contract.name, func);
            if !code.is_empty() {
                tests.push(GeneratedTest {
                    scenario: scenario.label.to_string(),
                    code,
                });
            }
        }
    }

    let mut parts: Vec<&str> = Vec::with_capacity(tests.len() + 3);
    parts.push(&header);
    parts.extend(tests.iter().map(|t| t.code.as_str()));
    parts.push("");
    let footer = test_footer();
    parts.push(&footer);
    let full_file = parts.join("\n");

    debug!(contract = %contract.name, tests = tests.len(), "motsu tests generated");

    TestGeneratorResult {
        header,
        tests,
        full_file,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COUNTER: &str = r#"sol_storage! {
    #[entrypoint]
    pub struct Counter {
        uint256 number;
    }
}

#[external]
impl Counter {
    pub fn number(&self) -> U256 {
        self.number.get()
    }

    pub fn increment(&mut self) {
        let number = self.number.get();
        self.number.set(number + U256::from(1));
    }
}
"#;

    #[test]
    fn test_scenarios_per_function() {
        let result = generate_motsu_tests(COUNTER);
        let labels: Vec<&str> = result.tests.iter().map(|t| t.scenario.as_str()).collect();
        // read-only getter: no reentrancy scenario
        assert_eq!(
            labels,
            vec![
                "Basic function call",
                "State change verification",
                "Basic function call",
                "State change verification",
                "Reentrancy guard",
            ]
        );
    }

    #[test]
    fn test_full_file_layout() {
        let result = generate_motsu_tests(COUNTER);
        assert!(result.full_file.starts_with(&result.header));
        assert!(result.full_file.ends_with("\n\n}\n"));
        assert!(result.full_file.contains("fn test_increment_no_reentrancy(contract: Counter)"));
        assert!(result.full_file.contains("fn test_number_returns_value(contract: Counter)"));
    }

    #[test]
    fn test_no_functions() {
        let result = generate_motsu_tests("");
        assert!(result.tests.is_empty());
        assert_eq!(result.full_file, format!("{}\n\n}}\n", result.header));
    }
}
