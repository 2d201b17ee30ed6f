//! Command-line parsing for the BLS data explorer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the acquisition/filtering code.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::data::bls::{DEFAULT_END_YEAR, DEFAULT_START_YEAR};
use crate::domain::{Category, FilterSelection, View, choice};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "bls",
    version,
    about = "Bureau of Labor Statistics Data Explorer"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch a view from the BLS API, print statistics and records, and optionally export.
    Fetch(FetchArgs),
    /// Print per-series statistics only (useful for scripting).
    Stats(FetchArgs),
    /// List the series catalog.
    Catalog(CatalogArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying pipeline as `bls fetch`, but renders results
    /// in a terminal UI using Ratatui.
    Tui(TuiArgs),
}

/// Year range sent with every series request.
#[derive(Debug, Args, Clone)]
pub struct YearArgs {
    /// First year requested from the API.
    #[arg(long, default_value_t = DEFAULT_START_YEAR)]
    pub start_year: i32,

    /// Last year requested from the API.
    #[arg(long, default_value_t = DEFAULT_END_YEAR)]
    pub end_year: i32,
}

/// Common options for fetching and summarizing.
#[derive(Debug, Args, Clone)]
pub struct FetchArgs {
    /// Which slice of the catalog to fetch.
    #[arg(long, value_enum, default_value_t = View::All)]
    pub view: View,

    /// State used by the `states` view (and as its subcategory filter).
    #[arg(long)]
    pub state: Option<String>,

    /// Category filter ("all", a category name, or a state indicator label).
    #[arg(long, default_value = "all")]
    pub category: String,

    /// Year filter ("all" or e.g. 2024).
    #[arg(long, default_value = "all")]
    pub year: String,

    /// Period filter ("all" or e.g. M01).
    #[arg(long, default_value = "all")]
    pub period: String,

    /// Search text matched against name, value, period name, and year.
    ///
    /// A state name switches to the `states` view for that state.
    #[arg(long, default_value = "")]
    pub search: String,

    #[command(flatten)]
    pub years: YearArgs,

    /// Print statistics as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Export the filtered records to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

impl FetchArgs {
    /// Filter selection for the chosen view.
    ///
    /// Flags left at "all" keep the view defaults (the `states` view starts
    /// on its default state).
    pub fn selection(&self) -> FilterSelection {
        let mut selection = FilterSelection::for_view(self.view);
        if let Some(state) = self.state.as_deref().and_then(choice) {
            selection.subcategory = Some(state);
        }
        selection.category = choice(&self.category);
        selection.year = choice(&self.year);
        selection.period = choice(&self.period);
        selection
    }
}

/// Options for the catalog listing.
#[derive(Debug, Args, Clone)]
pub struct CatalogArgs {
    /// Only list series of this category.
    #[arg(long, value_enum)]
    pub category: Option<Category>,
}

/// Options for the interactive TUI.
#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    /// Tab shown at start-up.
    #[arg(long, value_enum, default_value_t = View::All)]
    pub view: View,

    #[command(flatten)]
    pub years: YearArgs,
}
