//! Output formatting
//!
//! Formats audit results as human-readable text, JSON, JUnit XML or Markdown,
//! and renders the other commands' results.

use stylus_architect::{AuditSummary, ContractInfo, IntentResult, Severity};

use crate::cli::discover::FileAudit;

/// Output format selected with `--format`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
    Junit,
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            "junit" => Ok(OutputFormat::Junit),
            "markdown" => Ok(OutputFormat::Markdown),
            _ => Err(format!(
                "Unknown format: {}. Expected: human, json, junit, markdown",
                s
            )),
        }
    }
}

fn combined_summary(audits: &[FileAudit]) -> AuditSummary {
    audits.iter().fold(AuditSummary::default(), |acc, audit| AuditSummary {
        high: acc.high + audit.result.summary.high,
        medium: acc.medium + audit.result.summary.medium,
        low: acc.low + audit.result.summary.low,
    })
}

fn severity_marker(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "❌",
        Severity::Medium => "⚠️ ",
        Severity::Low => "ℹ️ ",
    }
}

/// Format audit results
pub fn format_audit(audits: &[FileAudit], format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => format_audit_human(audits),
        OutputFormat::Json => format_audit_json(audits),
        OutputFormat::Junit => format_audit_junit(audits),
        OutputFormat::Markdown => format_audit_markdown(audits),
    }
}

fn format_audit_human(audits: &[FileAudit]) -> String {
    let mut output = String::new();
    output.push_str("Running Stylus Ink audit...\n\n");

    for audit in audits {
        output.push_str(&format!("{}\n", audit.file_path.display()));

        if audit.result.findings.is_empty() {
            output.push_str("  ✅ No findings\n\n");
            continue;
        }

        for finding in &audit.result.findings {
            output.push_str(&format!(
                "  {} [{}] line {}: {}\n",
                severity_marker(finding.severity),
                finding.severity,
                finding.line,
                finding.title
            ));
            output.push_str(&format!("    Code: {}\n", finding.code));
            output.push_str(&format!("    Suggestion: {}\n", finding.suggestion));
        }
        output.push('\n');
    }

    let summary = combined_summary(audits);
    output.push_str(&format!(
        "audit result: {}. {} high; {} medium; {} low\n",
        if summary.high > 0 { "FAILED" } else { "ok" },
        summary.high,
        summary.medium,
        summary.low
    ));
    output.push_str(&format!("  Files scanned: {}\n", audits.len()));

    output
}

fn format_audit_json(audits: &[FileAudit]) -> String {
    use serde_json::json;

    let summary = combined_summary(audits);
    let files: Vec<_> = audits
        .iter()
        .map(|audit| {
            json!({
                "file": audit.file_path.to_string_lossy(),
                "findings": audit.result.findings,
                "summary": audit.result.summary,
            })
        })
        .collect();

    let output = json!({
        "summary": {
            "files": audits.len(),
            "high": summary.high,
            "medium": summary.medium,
            "low": summary.low,
        },
        "results": files,
    });

    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// One testsuite per file, one testcase per pattern hit; high severity hits are failures.
fn format_audit_junit(audits: &[FileAudit]) -> String {
    let total: usize = audits.iter().map(|a| a.result.findings.len()).sum();
    let failures = combined_summary(audits).high;

    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!(
        "<testsuites name=\"stylus-architect\" tests=\"{}\" failures=\"{}\" time=\"0.0\">\n",
        total, failures
    ));

    for audit in audits {
        let suite = xml_escape(&audit.file_path.display().to_string());
        xml.push_str(&format!(
            "  <testsuite name=\"{}\" tests=\"{}\" failures=\"{}\" time=\"0.0\">\n",
            suite,
            audit.result.findings.len(),
            audit.result.summary.high
        ));

        for finding in &audit.result.findings {
            xml.push_str(&format!(
                "    <testcase name=\"{}:{}\" classname=\"{}\">\n",
                finding.pattern_id, finding.line, suite
            ));
            if finding.severity == Severity::High {
                xml.push_str(&format!(
                    "      <failure message=\"{}\">{}</failure>\n",
                    xml_escape(&finding.title),
                    xml_escape(&finding.code)
                ));
            } else {
                xml.push_str(&format!(
                    "      <system-out>{}: {}</system-out>\n",
                    finding.severity,
                    xml_escape(&finding.code)
                ));
            }
            xml.push_str("    </testcase>\n");
        }

        xml.push_str("  </testsuite>\n");
    }

    xml.push_str("</testsuites>\n");
    xml
}

fn format_audit_markdown(audits: &[FileAudit]) -> String {
    let mut md = String::new();
    let summary = combined_summary(audits);

    md.push_str("# Stylus Ink Audit Report\n\n");
    md.push_str("## Summary\n\n");
    md.push_str(&format!("- **Files scanned:** {}\n", audits.len()));
    md.push_str(&format!("- **High:** {} ❌\n", summary.high));
    md.push_str(&format!("- **Medium:** {} ⚠️\n", summary.medium));
    md.push_str(&format!("- **Low:** {} ℹ️\n\n", summary.low));

    md.push_str("## Findings\n\n");
    md.push_str("| File | Line | Severity | Pattern | Code |\n");
    md.push_str("|------|------|----------|---------|------|\n");

    for audit in audits {
        let file_name = audit
            .file_path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown");

        for finding in &audit.result.findings {
            md.push_str(&format!(
                "| `{}` | {} | {} | {} | `{}` |\n",
                file_name,
                finding.line,
                finding.severity,
                finding.title,
                finding.code.replace('|', "\\|")
            ));
        }
    }

    let mut seen: Vec<&str> = Vec::new();
    let suggestions: Vec<_> = audits
        .iter()
        .flat_map(|a| &a.result.findings)
        .filter(|f| {
            if seen.contains(&f.pattern_id.as_str()) {
                false
            } else {
                seen.push(f.pattern_id.as_str());
                true
            }
        })
        .collect();

    if !suggestions.is_empty() {
        md.push_str("\n## Suggestions\n\n");
        for finding in suggestions {
            md.push_str(&format!("### {}\n\n{}\n\n", finding.title, finding.suggestion));
        }
    }

    md
}

/// Human-readable contract outline
pub fn format_contract_human(contract: &ContractInfo) -> String {
    let mut output = String::new();
    output.push_str(&format!("Contract: {}\n\n", contract.name));

    output.push_str(&format!("Storage fields ({}):\n", contract.storage_fields.len()));
    for field in &contract.storage_fields {
        output.push_str(&format!(
            "  {:>4}  {} {}\n",
            field.line, field.ty, field.name
        ));
    }

    output.push_str(&format!("\nExternal functions ({}):\n", contract.functions.len()));
    for func in &contract.functions {
        let receiver = if func.is_mut { "&mut self" } else { "&self" };
        let params: Vec<String> = func
            .params
            .iter()
            .map(|p| format!("{}: {}", p.name, p.ty))
            .collect();
        let params = std::iter::once(receiver.to_string())
            .chain(params)
            .collect::<Vec<_>>()
            .join(", ");
        output.push_str(&format!(
            "  {:>4}  fn {}({}) -> {}\n",
            func.line, func.name, params, func.return_type
        ));
    }

    output
}

pub fn format_intent_human(result: &IntentResult) -> String {
    if !result.matched {
        return "No matching function\n".to_string();
    }

    let mut output = String::new();
    if let Some(name) = &result.function_name {
        output.push_str(&format!("Function: {}\n", name));
    }
    if let Some(args) = &result.args {
        output.push_str(&format!("Args: [{}]\n", args.join(", ")));
    }
    match &result.calldata {
        Some(calldata) => output.push_str(&format!("Calldata: {}\n", calldata)),
        None => output.push_str("Calldata: -\n"),
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use stylus_architect::analyze_ink_usage;

    fn audits() -> Vec<FileAudit> {
        vec![FileAudit {
            file_path: PathBuf::from("src/lib.rs"),
            result: analyze_ink_usage("let m: HashMap<u8, u8> = x.clone();\nlet s = format!(\"{}\", 1);"),
        }]
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_human_summary_line() {
        let out = format_audit(&audits(), OutputFormat::Human);
        assert!(out.contains("audit result: FAILED. 1 high; 1 medium; 1 low"));
    }

    #[test]
    fn test_json_summary() {
        let out = format_audit(&audits(), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["summary"]["high"], 1);
        assert_eq!(value["results"][0]["findings"][0]["patternId"], "hashmap-in-storage");
    }

    #[test]
    fn test_junit_failures() {
        let out = format_audit(&audits(), OutputFormat::Junit);
        assert!(out.contains("tests=\"3\" failures=\"1\""));
        assert!(out.contains("<failure message=\"HashMap/BTreeMap used instead of StorageMap\">"));
        assert!(out.contains("&lt;u8, u8&gt;"));
        assert!(out.contains("    <testcase name=\"clone-usage:1\" classname=\"src/lib.rs\">\n"));
        assert_eq!(out.matches("</testcase>\n").count(), 3);
        assert!(out.ends_with("  </testsuite>\n</testsuites>\n"));
    }

    #[test]
    fn test_markdown_suggestions_deduplicated() {
        let out = format_audit(&audits(), OutputFormat::Markdown);
        assert_eq!(out.matches("### Unnecessary .clone() detected").count(), 1);
    }
}
