//! Function block extraction
//!
//! Collects the source text of every `pub fn` inside an impl block marked
//! `#[external]` or `#[public]`. The scan is a small state machine driven one
//! line at a time; only net brace depth is tracked, so nested blocks and
//! closures inside a body do not split a function.

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, trace};

use super::scan::{BraceDepth, PUB_FN};

static EXTERNAL_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#\[(external|public)\]").expect("marker pattern"));

static IMPL_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*impl(?:\s*<[^>]*>)?\s+\w+").expect("impl pattern"));

/// Raw text of one public function and the line its signature starts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionBlock {
    pub text: String,
    pub start_line: usize,
}

/// Scanner state between two lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanState<'a> {
    /// Not inside an externally callable region
    Outside,
    /// Saw the `#[external]` marker, waiting for its `impl` line
    Armed,
    /// Inside the impl block, between functions
    InRegion { region: BraceDepth },
    /// Accumulating the lines of one function
    Collecting {
        region: BraceDepth,
        function: BraceDepth,
        start_line: usize,
        lines: Vec<&'a str>,
    },
}

impl<'a> ScanState<'a> {
    /// Advance the scanner by one line, returning the next state and any
    /// function completed on this line.
    pub fn step(self, line: &'a str, line_no: usize) -> (ScanState<'a>, Option<FunctionBlock>) {
        match self {
            ScanState::Outside => match EXTERNAL_MARKER.find(line) {
                Some(marker) => {
                    trace!(line = line_no, "external marker");
                    // `#[public] impl Foo {` on one line
                    let rest = &line[marker.end()..];
                    if IMPL_LINE.is_match(rest) {
                        return ScanState::Armed.step(rest, line_no);
                    }
                    (ScanState::Armed, None)
                }
                None => (ScanState::Outside, None),
            },
            ScanState::Armed => {
                if IMPL_LINE.is_match(line) {
                    let region = BraceDepth::starting_at(line);
                    // `impl Foo {}`: nothing to collect
                    if line.contains('{') && region.depth() <= 0 {
                        return (ScanState::Outside, None);
                    }
                    debug!(line = line_no, "external impl block opened");
                    (ScanState::InRegion { region }, None)
                } else if is_preamble(line) {
                    (ScanState::Armed, None)
                } else {
                    (ScanState::Outside, None)
                }
            }
            ScanState::InRegion { mut region } => {
                if PUB_FN.is_match(line) {
                    let function = BraceDepth::starting_at(line);

                    if function.depth() <= 0 && line.contains('{') && line.contains('}') {
                        let block = FunctionBlock {
                            text: line.to_string(),
                            start_line: line_no,
                        };
                        region.add(function.depth());
                        return (after_function(region, line_no), Some(block));
                    }

                    return (
                        ScanState::Collecting {
                            region,
                            function,
                            start_line: line_no,
                            lines: vec![line],
                        },
                        None,
                    );
                }

                region.feed(line);
                if region.is_closed() {
                    debug!(line = line_no, "external impl block closed");
                    (ScanState::Outside, None)
                } else {
                    (ScanState::InRegion { region }, None)
                }
            }
            ScanState::Collecting {
                mut region,
                mut function,
                start_line,
                mut lines,
            } => {
                lines.push(line);
                function.feed(line);

                if !function.is_closed() {
                    return (
                        ScanState::Collecting {
                            region,
                            function,
                            start_line,
                            lines,
                        },
                        None,
                    );
                }

                // Keep the region's depth in step with every line the function consumed.
                region.add(function.depth());
                let block = FunctionBlock {
                    text: lines.join("\n"),
                    start_line,
                };
                (after_function(region, line_no), Some(block))
            }
        }
    }
}

fn after_function<'a>(region: BraceDepth, line_no: usize) -> ScanState<'a> {
    if region.is_closed() {
        debug!(line = line_no, "external impl block closed");
        ScanState::Outside
    } else {
        ScanState::InRegion { region }
    }
}

/// Lines allowed between the marker and its `impl`
fn is_preamble(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.is_empty() || trimmed.starts_with("//") || trimmed.starts_with("#[")
}

/// Extract every public function of the externally callable impl blocks, in
/// source order.
pub fn extract_function_blocks(source: &str) -> Vec<FunctionBlock> {
    let mut state = ScanState::Outside;
    let mut blocks = Vec::new();

    for (idx, line) in source.lines().enumerate() {
        let (next, emitted) = state.step(line, idx + 1);
        state = next;

        if let Some(block) = emitted {
            trace!(line = block.start_line, "function block collected");
            blocks.push(block);
        }
    }

    if let ScanState::Collecting { start_line, .. } = state {
        debug!(line = start_line, "function never closed, dropped");
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start_lines(blocks: &[FunctionBlock]) -> Vec<usize> {
        blocks.iter().map(|b| b.start_line).collect()
    }

    #[test]
    fn test_state_transitions() {
        let (state, _) = ScanState::Outside.step("#[external]", 1);
        assert_eq!(state, ScanState::Armed);

        let (state, _) = state.step("impl Counter {", 2);
        assert!(matches!(state, ScanState::InRegion { region } if region.depth() == 1));

        let (state, _) = state.step("    pub fn get(&self) -> U256 {", 3);
        assert!(matches!(state, ScanState::Collecting { start_line: 3, .. }));

        let (state, emitted) = state.step("        self.value.get()", 4);
        assert!(emitted.is_none());

        let (state, emitted) = state.step("    }", 5);
        let block = emitted.expect("function completes on its closing brace");
        assert_eq!(block.start_line, 3);
        assert_eq!(
            block.text,
            "    pub fn get(&self) -> U256 {\n        self.value.get()\n    }"
        );
        assert!(matches!(state, ScanState::InRegion { region } if region.depth() == 1));

        let (state, _) = state.step("}", 6);
        assert_eq!(state, ScanState::Outside);
    }

    #[test]
    fn test_nested_braces_stay_in_one_function() {
        let source = r#"#[public]
impl Vault {
    pub fn withdraw(&mut self, amount: U256) -> Result<(), Vec<u8>> {
        if amount > self.balance.get() {
            return Err(vec![]);
        } else {
            let f = |x: U256| { x + U256::from(1) };
            self.balance.set(f(amount));
        }
        Ok(())
    }

    pub fn balance(&self) -> U256 {
        self.balance.get()
    }
}
"#;
        let blocks = extract_function_blocks(source);
        assert_eq!(start_lines(&blocks), vec![3, 13]);
        assert!(blocks[0].text.ends_with("        Ok(())\n    }"));
    }

    #[test]
    fn test_single_line_function() {
        let source = "#[external]\nimpl C {\n    pub fn one(&self) -> u8 { 1 }\n    pub fn two(&self) -> u8 { 2 }\n}\n";
        let blocks = extract_function_blocks(source);
        assert_eq!(start_lines(&blocks), vec![3, 4]);
        assert_eq!(blocks[0].text, "    pub fn one(&self) -> u8 { 1 }");
    }

    #[test]
    fn test_functions_outside_region_ignored() {
        let source = r#"impl Helper {
    pub fn helper(&self) {}
}

#[external]
impl Counter {
    pub fn count(&self) -> U256 {
        U256::ZERO
    }
}

impl Other {
    pub fn other(&self) {
        todo!()
    }
}
"#;
        let blocks = extract_function_blocks(source);
        assert_eq!(start_lines(&blocks), vec![7]);
    }

    #[test]
    fn test_marker_with_extra_attributes() {
        let source = "#[public]\n#[inherit(Erc20)]\n\nimpl Token {\n    pub fn total(&self) -> U256 {\n        U256::ZERO\n    }\n}\n";
        assert_eq!(start_lines(&extract_function_blocks(source)), vec![5]);
    }

    #[test]
    fn test_marker_and_impl_on_one_line() {
        let source = "#[public] impl C {\n    pub fn one(&self) -> u8 {\n        1\n    }\n    pub fn two(&self) -> u8 { 2 }\n}\n\npub fn outside(&self) {\n}\n";
        assert_eq!(start_lines(&extract_function_blocks(source)), vec![2, 5]);

        let (state, _) = ScanState::Outside.step("#[external] impl Counter {", 1);
        assert!(matches!(state, ScanState::InRegion { region } if region.depth() == 1));
    }

    #[test]
    fn test_marker_without_impl_disarms() {
        let source = "#[external]\nstruct NotImpl;\nimpl Counter {\n    pub fn count(&self) {\n    }\n}\n";
        assert!(extract_function_blocks(source).is_empty());
    }

    #[test]
    fn test_brace_on_next_line() {
        let source = "#[external]\nimpl Counter\n{\n    pub fn count(&self) -> U256\n    {\n        U256::ZERO\n    }\n}\n";
        let blocks = extract_function_blocks(source);
        assert_eq!(start_lines(&blocks), vec![4]);
        assert_eq!(blocks[0].text.lines().count(), 4);
    }

    #[test]
    fn test_unclosed_function_dropped() {
        let source = "#[external]\nimpl Counter {\n    pub fn broken(&self) {\n        let x = 1;\n";
        assert!(extract_function_blocks(source).is_empty());
    }
}
