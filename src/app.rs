//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads API configuration
//! - fetches BLS series for the chosen view
//! - prints reports and writes optional exports

use std::path::Path;

use clap::Parser;
use tracing::info;

use crate::cli::{CatalogArgs, Command, FetchArgs, TuiArgs};
use crate::config::ApiConfig;
use crate::data::SeriesCatalog;
use crate::domain::{FilterSelection, View};
use crate::error::AppError;

pub mod pipeline;
pub mod session;

/// Entry point for the `bls` binary.
pub fn run() -> Result<(), AppError> {
    // We want `bls` and `bls -v` to behave like `bls tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Fetch(args) => {
            crate::logging::init(cli.verbose);
            handle_fetch(args, OutputMode::Full)
        }
        Command::Stats(args) => {
            crate::logging::init(cli.verbose);
            handle_fetch(args, OutputMode::StatsOnly)
        }
        Command::Catalog(args) => {
            crate::logging::init(cli.verbose);
            handle_catalog(args)
        }
        Command::Tui(args) => {
            crate::logging::init_to_file(cli.verbose, Path::new(crate::logging::TUI_LOG_FILE))?;
            handle_tui(args)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    StatsOnly,
}

fn handle_fetch(args: FetchArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = ApiConfig::from_env(args.years.start_year, args.years.end_year)?;
    let (view, selection) = resolve_search(args.view, args.selection(), &args.search);
    info!(view = view.display_name(), "running fetch");

    let run = pipeline::run_fetch(&config, view, &selection, &args.search)?;
    let derived = &run.derived;

    if args.json {
        let json = serde_json::to_string_pretty(&derived.statistics)
            .map_err(|e| AppError::new(4, format!("Failed to serialize statistics: {e}")))?;
        println!("{json}");
    } else {
        if mode == OutputMode::Full {
            print!(
                "{}",
                crate::report::format_run_header(
                    view,
                    &selection,
                    &args.search,
                    &run.acquisition,
                    derived.filtered.len(),
                )
            );
        }
        print!("{}", crate::report::format_statistics(derived.statistics.as_ref()));
        if mode == OutputMode::Full {
            print!("{}", crate::report::format_records(&derived.filtered));
        }
    }

    if run.acquisition.is_degraded() {
        eprint!("{}", crate::report::format_diagnostics(&run.acquisition.diagnostics));
    }

    if let Some(path) = &args.export {
        crate::io::export::write_records_csv(path, &derived.filtered)?;
        info!(path = %path.display(), rows = derived.filtered.len(), "exported records");
    }

    Ok(())
}

/// A search naming a state jumps to that state's series, as in the TUI.
fn resolve_search(view: View, selection: FilterSelection, search: &str) -> (View, FilterSelection) {
    match SeriesCatalog::bls().match_state(search) {
        Some(state) => (
            View::States,
            FilterSelection {
                subcategory: Some(state.to_string()),
                ..FilterSelection::default()
            },
        ),
        None => (view, selection),
    }
}

fn handle_catalog(args: CatalogArgs) -> Result<(), AppError> {
    print!(
        "{}",
        crate::report::format_catalog(SeriesCatalog::bls(), args.category)
    );
    Ok(())
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    let config = ApiConfig::from_env(args.years.start_year, args.years.end_year)?;
    crate::tui::run(config, args.view)
}

/// Rewrite argv so `bls` defaults to `bls tui`.
///
/// Rules:
/// - `bls`                      -> `bls tui`
/// - `bls --view states ...`    -> `bls tui --view states ...`
/// - `bls --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "fetch" | "stats" | "catalog" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_launches_tui() {
        assert_eq!(rewrite_args(argv(&["bls"])), argv(&["bls", "tui"]));
        assert_eq!(rewrite_args(argv(&["bls", "-v"])), argv(&["bls", "tui", "-v"]));
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        assert_eq!(rewrite_args(argv(&["bls", "fetch"])), argv(&["bls", "fetch"]));
        assert_eq!(rewrite_args(argv(&["bls", "--help"])), argv(&["bls", "--help"]));
    }

    #[test]
    fn state_search_switches_to_states_view() {
        let (view, sel) = resolve_search(View::National, FilterSelection::default(), "ohio");
        assert_eq!(view, View::States);
        assert_eq!(sel.subcategory.as_deref(), Some("Ohio"));

        let (_, sel) = resolve_search(View::National, FilterSelection::default(), "West Virginia unemployment");
        assert_eq!(sel.subcategory.as_deref(), Some("West Virginia"));

        let (view, _) = resolve_search(View::National, FilterSelection::default(), "in");
        assert_eq!(view, View::National);

        let (view, sel) = resolve_search(View::National, FilterSelection::default(), "inflation");
        assert_eq!(view, View::National);
        assert_eq!(sel, FilterSelection::default());
    }
}
