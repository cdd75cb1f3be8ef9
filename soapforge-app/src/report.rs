use soapforge_schemas::recipe::{ComputedResult, Recipe};
use std::fmt::Write;

const RULE_WIDTH: usize = 60;

/// Renders the recipe card: title and date, parameters, oil phase, lye solution,
/// trace additions and totals, always in that order.
pub fn render_text(recipe: &Recipe, result: &ComputedResult) -> String {
    let mut out = String::new();
    let _ = write_report(&mut out, recipe, result);
    out
}

fn write_report(out: &mut String, recipe: &Recipe, result: &ComputedResult) -> std::fmt::Result {
    let title = if recipe.name.trim().is_empty() {
        "Untitled recipe"
    } else {
        recipe.name.as_str()
    };
    writeln!(out, "RECIPE: {title}")?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    match recipe.creation_date {
        Some(date) => writeln!(out, "Date: {}", date.format("%Y-%m-%d %H:%M"))?,
        None => writeln!(out, "Date: not saved yet")?,
    }
    writeln!(
        out,
        "Superfat: {}% | Liquid: {}%",
        recipe.superfat_percent, recipe.liquid_percent
    )?;
    writeln!(out)?;

    writeln!(out, "[1] OIL PHASE")?;
    for (name, grams) in result.per_oil_weight.iter() {
        writeln!(out, "  - {name}: {grams:.1} g")?;
    }
    writeln!(out)?;

    writeln!(out, "[2] LYE SOLUTION (caustic: wear gloves and goggles)")?;
    writeln!(out, "  - Sodium hydroxide (NaOH): {:.2} g", result.lye_weight)?;
    writeln!(out, "  - Distilled water: {:.1} g", result.water_weight)?;
    if let Some(name) = recipe.liquid_substitute.name() {
        if result.substitute_weight > 0.0 {
            writeln!(out, "  - {name}: {:.1} g", result.substitute_weight)?;
        }
    }
    writeln!(out)?;

    writeln!(out, "[3] TRACE ADDITIONS")?;
    let mut any = false;
    for (name, grams) in recipe.trace_additives.iter().filter(|(_, g)| *g > 0.0) {
        writeln!(out, "  - {name}: {grams} g")?;
        any = true;
    }
    for (name, grams) in recipe.essential_oils.iter().filter(|(_, g)| *g > 0.0) {
        writeln!(out, "  - EO {name}: {grams} g")?;
        any = true;
    }
    if !any {
        writeln!(out, "  - none")?;
    }
    writeln!(out)?;

    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "FRESH PASTE: {:.1} g", result.fresh_weight)?;
    writeln!(out, "AFTER CURE (4-6 weeks): ~{:.1} g", result.cured_weight)?;
    writeln!(out, "MOLD VOLUME: ~{:.0} ml", result.mold_volume_ml)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use soapforge_core::{FormulationEngine, RecipeBuilder};

    fn position(haystack: &str, needle: &str) -> usize {
        haystack
            .find(needle)
            .unwrap_or_else(|| panic!("'{needle}' missing from report:\n{haystack}"))
    }

    #[test]
    fn test_sections_render_in_fixed_order() {
        let recipe = RecipeBuilder::new("Lavender Soap")
            .oil("Olive Oil", 500.0)
            .oil("Coconut Oil", 300.0)
            .substitute("Goat Milk", 50.0)
            .essential_oil("Lavender", 20.0)
            .build();
        let result = FormulationEngine::new(&[]).compute(&recipe).unwrap();
        let text = render_text(&recipe, &result);

        let order = [
            "RECIPE: Lavender Soap",
            "Date: not saved yet",
            "Superfat: 5% | Liquid: 30%",
            "[1] OIL PHASE",
            "  - Olive Oil: 500.0 g",
            "  - Coconut Oil: 300.0 g",
            "[2] LYE SOLUTION",
            "  - Goat Milk: 120.0 g",
            "[3] TRACE ADDITIONS",
            "  - EO Lavender: 20 g",
            "FRESH PASTE",
            "AFTER CURE",
            "MOLD VOLUME",
        ];
        let positions: Vec<usize> = order.iter().map(|n| position(&text, n)).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{text}");
    }

    #[test]
    fn test_empty_trace_section_says_none() {
        let recipe = RecipeBuilder::new("Plain").oil("Olive Oil", 1000.0).build();
        let result = FormulationEngine::new(&[]).compute(&recipe).unwrap();
        let text = render_text(&recipe, &result);
        assert!(text.contains("[3] TRACE ADDITIONS\n  - none\n"));
        assert!(!text.contains("Goat Milk"));
    }
}
