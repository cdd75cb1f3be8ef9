use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use soapforge_core::store::Catalog;
use soapforge_schemas::ingredient::{Additive, AdditiveCategory, EssentialOil, Oil, Toxicity};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use workflow::NewIngredient;

mod config;
mod report;
mod workflow;

#[derive(Parser)]
#[command(name = "soapforge", version, about = "Cold-process soap recipe formulation")]
struct Cli {
    /// YAML configuration file.
    #[arg(long, default_value = "soapforge.yaml")]
    config: PathBuf,

    /// Overrides the configured storage root.
    #[arg(long)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate, compute and print a recipe draft.
    Formulate {
        draft: PathBuf,
        /// Archive the computed recipe.
        #[arg(long)]
        save: bool,
    },
    /// Manage saved recipes.
    Recipes {
        #[command(subcommand)]
        action: RecipeAction,
    },
    /// Write the text report of a saved recipe into the exports directory.
    Export { identity: String },
    /// Browse or extend the ingredient catalogs.
    Ingredients {
        #[command(subcommand)]
        action: IngredientAction,
    },
}

#[derive(Subcommand)]
enum RecipeAction {
    List,
    Show { identity: String },
    Delete { identity: String },
    Rename { old: String, new: String },
}

#[derive(Subcommand)]
enum IngredientAction {
    List {
        #[arg(value_enum)]
        catalog: CatalogArg,
    },
    AddOil {
        #[arg(long)]
        name: String,
        /// Grams of NaOH per gram of oil, e.g. 0.135.
        #[arg(long)]
        sap: f64,
        #[arg(long, default_value = "")]
        quality: String,
        #[arg(long, default_value = "")]
        foam: String,
        #[arg(long, default_value = "")]
        recommendation: String,
    },
    AddAdditive {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        notes: String,
        /// Free-form usage hint, e.g. "5-15%".
        #[arg(long, default_value = "")]
        recommended: String,
        /// Offer it as a lye-water substitute.
        #[arg(long)]
        liquid: bool,
    },
    AddEssentialOil {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        notes: String,
        #[arg(long, value_enum, default_value_t = ToxicityArg::None)]
        toxicity: ToxicityArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CatalogArg {
    Oils,
    Additives,
    EssentialOils,
}

impl From<CatalogArg> for Catalog {
    fn from(arg: CatalogArg) -> Self {
        match arg {
            CatalogArg::Oils => Catalog::Oils,
            CatalogArg::Additives => Catalog::Additives,
            CatalogArg::EssentialOils => Catalog::EssentialOils,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ToxicityArg {
    None,
    Low,
    Medium,
    Maternity,
}

impl From<ToxicityArg> for Toxicity {
    fn from(arg: ToxicityArg) -> Self {
        match arg {
            ToxicityArg::None => Toxicity::None,
            ToxicityArg::Low => Toxicity::Low,
            ToxicityArg::Medium => Toxicity::Medium,
            ToxicityArg::Maternity => Toxicity::ContraindicatedMaternity,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = config::AppConfig::load(&cli.config)?;
    if let Some(root) = cli.root {
        config.storage_root = root;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .context("Invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut ws = config::Workspace::open(&config)?;

    match cli.command {
        Command::Formulate { draft, save } => {
            let recipe = workflow::load_draft(&draft)?;
            let outcome = workflow::formulate(&ws, recipe, save, Utc::now())?;
            if let Some(result) = &outcome.recipe.computed {
                print!("\n{}", report::render_text(&outcome.recipe, result));
            }
        }
        Command::Recipes { action } => match action {
            RecipeAction::List => workflow::list_recipes(&ws),
            RecipeAction::Show { identity } => workflow::show_recipe(&ws, &identity)?,
            RecipeAction::Delete { identity } => workflow::delete_recipe(&ws, &identity)?,
            RecipeAction::Rename { old, new } => workflow::rename_recipe(&ws, &old, &new)?,
        },
        Command::Export { identity } => {
            let path = workflow::export_recipe(&ws, &identity, Local::now())?;
            println!("Report written to {}", path.display());
        }
        Command::Ingredients { action } => match action {
            IngredientAction::List { catalog } => workflow::list_catalog(&ws, catalog.into()),
            IngredientAction::AddOil { name, sap, quality, foam, recommendation } => {
                let oil = Oil {
                    name,
                    saponification_value: sap,
                    quality_notes: quality,
                    foam_rating: foam,
                    recommendation,
                };
                workflow::add_ingredient(&mut ws, NewIngredient::Oil(oil))?;
            }
            IngredientAction::AddAdditive { name, notes, recommended, liquid } => {
                let additive = Additive {
                    name,
                    property_notes: notes,
                    recommended_percent: recommended,
                    category: if liquid {
                        AdditiveCategory::Liquid
                    } else {
                        AdditiveCategory::Trace
                    },
                };
                workflow::add_ingredient(&mut ws, NewIngredient::Additive(additive))?;
            }
            IngredientAction::AddEssentialOil { name, notes, toxicity } => {
                let eo = EssentialOil {
                    name,
                    property_notes: notes,
                    toxicity: toxicity.into(),
                };
                workflow::add_ingredient(&mut ws, NewIngredient::EssentialOil(eo))?;
            }
        },
    }

    Ok(())
}
