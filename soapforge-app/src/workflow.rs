use crate::config::Workspace;
use crate::report;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local, Utc};
use soapforge_core::{
    store::{sanitize_name, Catalog},
    validation::{self, Severity},
    EditSession, SoapforgeError,
};
use soapforge_schemas::{
    ingredient::{Additive, EssentialOil, Oil},
    recipe::Recipe,
};
use std::{fs, path::Path, path::PathBuf};
use tracing::info;

/// Result of running a draft through the gates and the engine.
#[derive(Debug)]
pub struct FormulationOutcome {
    pub recipe: Recipe,
    pub identity: Option<String>,
}

/// Reads a YAML recipe draft. A draft without a name gets a dated one.
pub fn load_draft(path: &Path) -> Result<Recipe> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read draft {:?}", path))?;
    let mut recipe: Recipe = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse YAML from {:?}", path))?;
    if recipe.name.trim().is_empty() {
        recipe.name = format!("Recipe of {}", Local::now().format("%Y-%m-%d"));
    }
    Ok(recipe)
}

/// Walks a draft through the three gates, prints advisories, computes it and optionally
/// saves the frozen recipe.
pub fn formulate(
    ws: &Workspace,
    draft: Recipe,
    save: bool,
    now: DateTime<Utc>,
) -> Result<FormulationOutcome> {
    println!("\n--- [Formulate] {} ---", draft.name);

    for name in draft.oil_composition.names() {
        if ws.ingredients.find_oil(name).is_none() {
            println!("Warning: '{name}' is not in the oil catalog, using the default SAP value.");
        }
    }
    if let Some(name) = draft.liquid_substitute.name() {
        if !ws.ingredients.liquid_substitutes().any(|a| a.name == name) {
            println!("Warning: '{name}' is not a liquid additive in the catalog.");
        }
    }

    let mut session = EditSession::with_recipe(draft);
    while !session.is_complete() {
        let gate = session.gate();
        session
            .advance()
            .with_context(|| format!("The recipe did not pass the {gate} gate"))?;
        println!("Gate passed: {gate}");
    }

    for advisory in validation::advisories(session.recipe()) {
        let label = match advisory.severity {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
        };
        println!("{label}: {}", advisory.message);
    }

    let result = session.compute(ws.ingredients.oils())?;
    let recipe = session.freeze(result, now);

    let identity = if save {
        let identity = ws.recipes.save(&recipe.name, &recipe)?;
        println!("Recipe archived as '{identity}'");
        Some(identity)
    } else {
        None
    };

    Ok(FormulationOutcome { recipe, identity })
}

fn load_stored(ws: &Workspace, identity: &str) -> Result<Recipe> {
    match ws.recipes.load(identity)? {
        Some(recipe) => Ok(recipe),
        None => bail!("Recipe '{identity}' not found"),
    }
}

pub fn list_recipes(ws: &Workspace) {
    let identities = ws.recipes.list();
    if identities.is_empty() {
        println!("No saved recipes.");
    }
    for identity in identities {
        println!("{identity}");
    }
}

pub fn show_recipe(ws: &Workspace, identity: &str) -> Result<()> {
    let recipe = load_stored(ws, identity)?;
    match &recipe.computed {
        Some(result) => print!("{}", report::render_text(&recipe, result)),
        None => println!("'{identity}' has no computed result."),
    }
    Ok(())
}

/// Writes the text report of a stored recipe into the exports directory.
pub fn export_recipe(ws: &Workspace, identity: &str, now: DateTime<Local>) -> Result<PathBuf> {
    let recipe = load_stored(ws, identity)?;
    let Some(result) = &recipe.computed else {
        bail!("Recipe '{identity}' has no computed result to export");
    };

    let dir = ws.layout.exports_dir();
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create {:?}", dir))?;
    let file_name = format!(
        "{}_{}.txt",
        sanitize_name(&recipe.name),
        now.format("%Y%m%d_%H%M")
    );
    let path = dir.join(file_name);
    fs::write(&path, report::render_text(&recipe, result))
        .with_context(|| format!("Failed to write report {:?}", path))?;
    info!(path = %path.display(), "report exported");
    Ok(path)
}

pub fn delete_recipe(ws: &Workspace, identity: &str) -> Result<()> {
    ws.recipes.delete(identity)?;
    println!("Deleted '{identity}'");
    Ok(())
}

pub fn rename_recipe(ws: &Workspace, old: &str, new: &str) -> Result<()> {
    match ws.recipes.rename(old, new)? {
        Some(identity) => println!("Renamed '{old}' to '{identity}'"),
        None => println!("'{old}' does not exist, nothing renamed"),
    }
    Ok(())
}

pub fn list_catalog(ws: &Workspace, catalog: Catalog) {
    println!("--- {catalog} ---");
    match catalog {
        Catalog::Oils => {
            for oil in ws.ingredients.oils() {
                println!(
                    "{} (SAP {:.3}) foam: {} | {} | {}",
                    oil.name,
                    oil.saponification_value,
                    oil.foam_rating,
                    oil.quality_notes,
                    oil.recommendation
                );
            }
        }
        Catalog::Additives => {
            for additive in ws.ingredients.additives() {
                let kind = if additive.is_liquid() { "liquid" } else { "trace" };
                println!(
                    "{} [{kind}] {} (advised: {})",
                    additive.name, additive.property_notes, additive.recommended_percent
                );
            }
        }
        Catalog::EssentialOils => {
            for eo in ws.ingredients.essential_oils() {
                println!("{} [toxicity: {}] {}", eo.name, eo.toxicity, eo.property_notes);
            }
        }
    }
}

/// Adds one ingredient; a name already in the catalog is reported, not an error exit.
pub fn add_ingredient(ws: &mut Workspace, record: NewIngredient) -> Result<()> {
    let name = record.name().to_string();
    let outcome = match record {
        NewIngredient::Oil(oil) => ws.ingredients.append_and_persist(oil),
        NewIngredient::Additive(additive) => ws.ingredients.append_and_persist(additive),
        NewIngredient::EssentialOil(eo) => ws.ingredients.append_and_persist(eo),
    };
    match outcome {
        Ok(()) => println!("'{name}' added to the catalog."),
        Err(e @ SoapforgeError::DuplicateIngredient { .. }) => println!("{e}"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

pub enum NewIngredient {
    Oil(Oil),
    Additive(Additive),
    EssentialOil(EssentialOil),
}

impl NewIngredient {
    fn name(&self) -> &str {
        match self {
            NewIngredient::Oil(o) => &o.name,
            NewIngredient::Additive(a) => &a.name,
            NewIngredient::EssentialOil(e) => &e.name,
        }
    }
}
