//! Command-line front end for Stylus Architect
//!
//! Usage: stylus-architect <command> [options]

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

use stylus_architect::manifest::manifest_for;
use stylus_architect::testgen::tests_for;
use stylus_architect::{
    call_tool, parse_contract, resolve_intent, AgentManifest, ManifestOptions, ToolName,
};

mod cli;

use cli::OutputFormat;

#[derive(Parser)]
#[command(name = "stylus-architect")]
#[command(about = "Parse, audit and describe Arbitrum Stylus contracts", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a contract's name, storage fields and external functions
    Parse {
        /// Contract source file (`-` for stdin)
        file: PathBuf,

        /// Output format (human or json)
        #[arg(long, default_value = "human")]
        format: OutputFormat,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Scan sources for Ink-expensive patterns
    Audit {
        /// Files or directories to scan (default: current directory)
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a Motsu test module for a contract
    Tests {
        /// Contract source file (`-` for stdin)
        file: PathBuf,

        /// `human` prints the generated file, `json` the structured result
        #[arg(long, default_value = "human")]
        format: OutputFormat,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate an ERC-8004 agent manifest
    Manifest {
        /// Contract source file (`-` for stdin)
        file: PathBuf,

        /// Manifest name (default: contract name)
        #[arg(long)]
        name: Option<String>,

        /// Manifest description
        #[arg(long)]
        description: Option<String>,

        /// Manifest version (default: 0.1.0)
        #[arg(long)]
        version: Option<String>,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Resolve a natural-language request against a manifest
    Intent {
        /// The request, e.g. "set the number to 42"
        query: String,

        /// Manifest JSON file produced by `manifest`
        #[arg(long)]
        manifest: PathBuf,

        /// Output format (human or json)
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Run a named tool with a JSON input object
    Call {
        /// Tool name, see `tools`
        tool: String,

        /// JSON input file (default: stdin)
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// List the available tools
    Tools,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = cli::init_tracing(cli.verbose) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }

    let result = match cli.command {
        Commands::Parse {
            file,
            format,
            output,
        } => handle_parse(&file, format, output.as_deref()),
        Commands::Audit {
            paths,
            format,
            output,
        } => handle_audit(paths, format, output.as_deref()),
        Commands::Tests {
            file,
            format,
            output,
        } => handle_tests(&file, format, output.as_deref()),
        Commands::Manifest {
            file,
            name,
            description,
            version,
            output,
        } => {
            let options = ManifestOptions {
                name,
                description,
                version,
            };
            handle_manifest(&file, &options, output.as_deref())
        }
        Commands::Intent {
            query,
            manifest,
            format,
        } => handle_intent(&query, &manifest, format),
        Commands::Call { tool, input } => handle_call(&tool, input.as_deref()),
        Commands::Tools => handle_tools(),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            1
        }
    };

    std::process::exit(exit_code);
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn emit(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            debug!(path = %path.display(), "output written");
        }
        None => print!("{content}"),
    }
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    json.push('\n');
    Ok(json)
}

fn handle_parse(file: &Path, format: OutputFormat, output: Option<&Path>) -> Result<i32> {
    let contract = parse_contract(&read_input(file)?);

    let rendered = match format {
        OutputFormat::Human => cli::format_contract_human(&contract),
        OutputFormat::Json => to_json(&contract)?,
        OutputFormat::Markdown | OutputFormat::Junit => {
            bail!("Only human and json formats are supported for parse")
        }
    };

    emit(&rendered, output)?;
    Ok(0)
}

fn handle_audit(paths: Vec<PathBuf>, format: OutputFormat, output: Option<&Path>) -> Result<i32> {
    let paths = if paths.is_empty() {
        vec![std::env::current_dir().context("Failed to resolve current directory")?]
    } else {
        paths
    };

    let audits = cli::audit_paths(&paths)?;
    emit(&cli::format_audit(&audits, format), output)?;

    let high: usize = audits.iter().map(|a| a.result.summary.high).sum();
    Ok(if high > 0 { 1 } else { 0 })
}

fn handle_tests(file: &Path, format: OutputFormat, output: Option<&Path>) -> Result<i32> {
    let result = tests_for(&parse_contract(&read_input(file)?));

    let rendered = match format {
        OutputFormat::Human => format!("{}\n", result.full_file),
        OutputFormat::Json => to_json(&result)?,
        OutputFormat::Markdown | OutputFormat::Junit => {
            bail!("Only human and json formats are supported for tests")
        }
    };

    emit(&rendered, output)?;
    Ok(0)
}

fn handle_manifest(file: &Path, options: &ManifestOptions, output: Option<&Path>) -> Result<i32> {
    let manifest = manifest_for(&parse_contract(&read_input(file)?), options);
    emit(&to_json(&manifest)?, output)?;
    Ok(0)
}

fn handle_intent(query: &str, manifest_path: &Path, format: OutputFormat) -> Result<i32> {
    let manifest: AgentManifest = serde_json::from_str(&read_input(manifest_path)?)
        .with_context(|| format!("Invalid manifest {}", manifest_path.display()))?;
    let result = resolve_intent(query, Some(&manifest));

    let rendered = match format {
        OutputFormat::Human => cli::format_intent_human(&result),
        OutputFormat::Json => to_json(&result)?,
        OutputFormat::Markdown | OutputFormat::Junit => {
            bail!("Only human and json formats are supported for intent")
        }
    };

    print!("{rendered}");
    Ok(0)
}

fn handle_call(tool: &str, input: Option<&Path>) -> Result<i32> {
    let raw = read_input(input.unwrap_or(Path::new("-")))?;
    let value: serde_json::Value = serde_json::from_str(&raw).context("Tool input is not JSON")?;

    let result = call_tool(tool, value)?;
    print!("{}", to_json(&result)?);
    Ok(0)
}

fn handle_tools() -> Result<i32> {
    for tool in ToolName::ALL {
        println!("{:<24} {}", tool.as_str(), tool.description());
    }
    Ok(0)
}
