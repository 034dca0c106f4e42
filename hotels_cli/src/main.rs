// hotels_cli/src/main.rs

use std::sync::Arc;

use anyhow::{bail, Context};
use common_utils::{init_tracing, ServiceConfig};
use hotel_catalog::{load_catalog, resolve_catalog_file, CategoryLookup};
use orchestrator::{ChatCompletionsOracle, Orchestrator, SearchOutcome};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use search_core::Catalog;
use tracing::debug;

fn print_ranked(catalog: &Catalog, ids: &[String]) {
    for (rank, id) in ids.iter().enumerate() {
        let ltr = catalog
            .get(id)
            .map(|hotel| format!("{:.3}", hotel.ltr_score()))
            .unwrap_or_else(|| "-".to_string());
        println!("{:>3}. {id}  (ltr_score {ltr})", rank + 1);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("warn");

    let config = ServiceConfig::from_env().context("invalid configuration")?;
    let city = std::env::args().nth(1).unwrap_or_else(|| "Mallorca".to_string());

    let Some(stem) = config.catalog_stem(&city) else {
        let known: Vec<&str> = config.cities().collect();
        bail!("unknown city '{city}', expected one of: {}", known.join(", "));
    };
    let path = resolve_catalog_file(stem)
        .with_context(|| format!("no .csv or .json result list at {}", stem.display()))?;
    let catalog = load_catalog(&path).with_context(|| format!("failed to load {}", path.display()))?;

    let categories = match &config.categories_path {
        Some(path) => CategoryLookup::from_path(path)?,
        None => CategoryLookup::embedded()?,
    };
    let oracle = ChatCompletionsOracle::new(&config.llm)?;
    let orchestrator = Orchestrator::new(Arc::new(oracle), &categories)
        .with_restriction_policy(config.restriction_policy);

    println!("Hotel search for {city} ({} hotels, model {}).", catalog.len(), config.llm.model);
    println!("Describe the hotel you want, or type 'exit' to quit.");

    let mut editor = DefaultEditor::new()?;
    loop {
        let line = match editor.readline("> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };

        let query = line.trim();
        if query.eq_ignore_ascii_case("exit") {
            break;
        }
        if query.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(query);

        debug!(query, "running search");
        match orchestrator.find_matching_hotels(query, &catalog).await {
            Ok(SearchOutcome::Rejected) => println!("That does not look like a hotel search."),
            Ok(SearchOutcome::NoRelevantColumns) => println!("No matching hotels found."),
            Ok(SearchOutcome::Unrestricted(ids) | SearchOutcome::Filtered(ids)) if ids.is_empty() => {
                println!("No matching hotels found.")
            }
            Ok(SearchOutcome::Unrestricted(ids)) => {
                println!("No filters given, showing the top hotels:");
                print_ranked(&catalog, &ids);
            }
            Ok(SearchOutcome::Filtered(ids)) => print_ranked(&catalog, &ids),
            Err(e) => eprintln!("[error] search failed: {:#}", anyhow::Error::from(e)),
        }
    }

    println!("Bye.");
    Ok(())
}
