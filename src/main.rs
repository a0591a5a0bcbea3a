use std::fs;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use squill::query::{self, TermKind};
use squill::{filters, hedges, strategy, Concept};

mod cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = cli::Args::parse();

    match args.command {
        cli::Command::Parse { query } => {
            let seq = query::parse(&query);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&seq)?);
            } else {
                for (i, term) in seq.iter().enumerate() {
                    println!("{i:3}  {}", describe_term(&term.kind));
                }
                println!("canonical: {}", query::serialize(&seq));
            }
        }

        cli::Command::Validate { query } => {
            let validation = query::validate(&query);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&validation)?);
            } else {
                for w in &validation.warnings {
                    println!("{:?}: {} ({})", w.severity, w.code, w.message);
                }
                println!("valid: {}", validation.is_valid);
            }
            if !validation.is_valid {
                std::process::exit(1);
            }
        }

        cli::Command::Synthesize {
            concepts,
            framework,
            hedge,
        } => {
            let raw = fs::read_to_string(&concepts)
                .with_context(|| format!("reading concepts file {}", concepts.display()))?;
            tracing::debug!("read {} bytes from {}", raw.len(), concepts.display());
            let concepts: Vec<Concept> =
                serde_json::from_str(&raw).context("concepts file is not a JSON concept array")?;
            tracing::debug!("deserialized {} concepts", concepts.len());
            let synthesis = strategy::synthesize(&concepts, &framework, hedge.as_deref());
            if args.json {
                println!("{}", serde_json::to_string_pretty(&synthesis)?);
            } else {
                for s in [
                    &synthesis.comprehensive,
                    &synthesis.direct,
                    &synthesis.clinical,
                ] {
                    println!("== {} ({} yield) ==", s.name, s.expected_yield);
                    println!("   {}", s.purpose);
                    if let Some(h) = &s.hedge_applied {
                        println!("   hedge: {h}");
                    }
                    println!("   {}", s.query);
                    println!();
                }
                for w in &synthesis.warnings {
                    println!("{:?}: {} ({})", w.severity, w.code, w.message);
                }
            }
        }

        cli::Command::Hedges {} => {
            let lib = hedges::HedgeLibrary::builtin();
            if args.json {
                println!("{}", serde_json::to_string_pretty(lib.hedges())?);
            } else {
                for h in lib.hedges() {
                    println!("{} ({:?})", h.id, h.hedge_type);
                    println!("   {}", h.fragment);
                    println!("   source: {}", h.source);
                }
            }
        }

        cli::Command::Filters {} => {
            let catalog = filters::FilterCatalog::builtin();
            if args.json {
                println!("{}", serde_json::to_string_pretty(catalog.filters())?);
            } else {
                for f in catalog.filters() {
                    println!("[{}] {}: {}", f.category, f.label, f.fragment);
                }
            }
        }
    }

    Ok(())
}

fn describe_term(kind: &TermKind) -> String {
    match kind {
        TermKind::Operator { op } => format!("operator  {}", op.as_str()),
        TermKind::Group { mark } => format!("group     {mark:?}"),
        TermKind::Clause {
            value, field_tag, ..
        } => match field_tag {
            Some(tag) => format!("clause    {value:?} [{tag}]"),
            None => format!("clause    {value:?}"),
        },
    }
}
