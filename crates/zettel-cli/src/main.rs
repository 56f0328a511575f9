//! Zettel CLI entry point.

mod visitors;

use std::io::Read;

use clap::{Parser, Subcommand};
use rhizome_zettel_ast::{Env, Node, validate, walk, walk_it};
use rhizome_zettel_sx::{Object, read_all};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use visitors::{Normalize, Stats};

#[derive(Parser)]
#[command(name = "zettel")]
#[command(about = "Inspect zettel documents in s-expression form")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every top-level form
    Check {
        /// Input file (or - for stdin)
        file: String,
    },

    /// Print documents in canonical form
    Fmt {
        /// Input file (or - for stdin)
        file: String,
    },

    /// Count node kinds and nesting depth
    Stats {
        /// Input file (or - for stdin)
        file: String,
    },

    /// Print the typed tree as JSON
    Json {
        /// Input file (or - for stdin)
        file: String,
    },
}

fn read_forms(file: &str) -> Result<Vec<Object>, Box<dyn std::error::Error>> {
    let input = if file == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(file)?
    };
    let forms = read_all(&input)?;
    debug!(file, forms = forms.len(), "read input");
    Ok(forms)
}

/// JSON indent from `ZETTEL_INDENT`; 0 prints compact JSON.
fn json_indent() -> usize {
    std::env::var("ZETTEL_INDENT")
        .ok()
        .and_then(|n| n.parse().ok())
        .unwrap_or(2)
}

fn to_json(value: &impl Serialize, indent: usize) -> Result<String, serde_json::Error> {
    if indent == 0 {
        return serde_json::to_string(value);
    }
    let indent = " ".repeat(indent);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("zettel=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { file } => {
            let forms = read_forms(&file)?;
            let mut failed = 0;
            for (i, form) in forms.iter().enumerate() {
                if let Err(err) = validate(form) {
                    println!("{file}: form {}: {err}", i + 1);
                    failed += 1;
                }
            }
            if failed > 0 {
                info!("{} of {} forms invalid", failed, forms.len());
                std::process::exit(1);
            }
            println!("ok");
        }

        Commands::Fmt { file } => {
            for form in read_forms(&file)? {
                let Some(node) = Node::from_sx(&form) else {
                    continue;
                };
                if let Some(node) = walk(&mut Normalize, &node, &Env::root()) {
                    println!("{}", node.to_sx());
                }
            }
        }

        Commands::Stats { file } => {
            let mut stats = Stats::default();
            for form in read_forms(&file)? {
                if let Some(node) = Node::from_sx(&form) {
                    walk_it(&mut stats, &node, &Env::root());
                }
            }
            println!("{stats}");
        }

        Commands::Json { file } => {
            let indent = json_indent();
            for form in read_forms(&file)? {
                if let Some(node) = Node::from_sx(&form) {
                    println!("{}", to_json(&node, indent)?);
                }
            }
        }
    }

    Ok(())
}
