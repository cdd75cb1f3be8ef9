use crate::error::SoapforgeError;
use soapforge_schemas::{
    composition::Composition,
    ingredient::Oil,
    recipe::{ComputedResult, Recipe, WeightMode},
};
use tracing::debug;

/// Saponification value used for oils missing from the catalog.
pub const FALLBACK_SAPONIFICATION_VALUE: f64 = 0.135;

/// Mass of lye and trace additions relative to the oil phase, used to back the oil
/// weight out of a target batch weight. A rule-of-thumb approximation, not a derived
/// physical constant.
pub const LYE_AND_TRACE_MASS_FRACTION: f64 = 0.2;

/// Share of the liquid phase assumed to evaporate over a 4-6 week cure.
pub const CURE_LIQUID_LOSS: f64 = 0.4;

/// Millilitres of mold per gram of fresh paste (paste density is roughly 1.05 g/ml).
pub const MOLD_VOLUME_PER_GRAM: f64 = 0.95;

/// Looks up an oil's saponification value by exact name.
pub fn saponification_value(oils: &[Oil], name: &str) -> f64 {
    match oils.iter().find(|o| o.name == name) {
        Some(oil) => oil.saponification_value,
        None => {
            debug!(oil = name, fallback = FALLBACK_SAPONIFICATION_VALUE, "oil not in catalog");
            FALLBACK_SAPONIFICATION_VALUE
        }
    }
}

/// The oil phase weight every other quantity is scaled from.
pub fn reference_oil_weight(recipe: &Recipe) -> f64 {
    match recipe.mode {
        WeightMode::ByWeight => recipe.oil_composition.total(),
        WeightMode::ByPercent => {
            recipe.target_total_weight
                / (1.0 + recipe.liquid_percent / 100.0 + LYE_AND_TRACE_MASS_FRACTION)
        }
    }
}

/// Derives lye, liquid and mass totals for a recipe. Pure: no I/O, no state.
pub struct FormulationEngine<'a> {
    oils: &'a [Oil],
}

impl<'a> FormulationEngine<'a> {
    pub fn new(oils: &'a [Oil]) -> Self {
        Self { oils }
    }

    pub fn compute(&self, recipe: &Recipe) -> Result<ComputedResult, SoapforgeError> {
        let ph = reference_oil_weight(recipe);
        if ph <= 0.0 || ph.is_nan() {
            return Err(SoapforgeError::ZeroReferenceWeight(ph));
        }

        let per_oil_weight: Composition = recipe
            .oil_composition
            .iter()
            .map(|(name, quantity)| {
                let grams = match recipe.mode {
                    WeightMode::ByWeight => quantity,
                    WeightMode::ByPercent => quantity / 100.0 * ph,
                };
                (name, grams)
            })
            .collect();

        let lye_weight = self.lye_weight(&per_oil_weight, recipe.superfat_percent);

        let liquid_total_weight = ph * recipe.liquid_percent / 100.0;
        let substitute_weight = if recipe.liquid_substitute.is_none() {
            0.0
        } else {
            liquid_total_weight * recipe.substitute_percent / 100.0
        };
        let water_weight = liquid_total_weight - substitute_weight;

        let fresh_weight = ph
            + lye_weight
            + liquid_total_weight
            + recipe.trace_additives.total()
            + recipe.essential_oils.total();
        let cured_weight = fresh_weight - liquid_total_weight * CURE_LIQUID_LOSS;
        let mold_volume_ml = fresh_weight * MOLD_VOLUME_PER_GRAM;

        Ok(ComputedResult {
            reference_oil_weight: ph,
            per_oil_weight,
            lye_weight,
            liquid_total_weight,
            water_weight,
            substitute_weight,
            fresh_weight,
            cured_weight,
            mold_volume_ml,
        })
    }

    fn lye_weight(&self, per_oil_weight: &Composition, superfat_percent: f64) -> f64 {
        let full: f64 = per_oil_weight
            .iter()
            .map(|(name, grams)| grams * saponification_value(self.oils, name))
            .sum();
        full * (1.0 - superfat_percent / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulation::builder::RecipeBuilder;
    use pretty_assertions::assert_eq;

    fn oil(name: &str, sap: f64) -> Oil {
        Oil {
            name: name.to_string(),
            saponification_value: sap,
            quality_notes: String::new(),
            foam_rating: String::new(),
            recommendation: String::new(),
        }
    }

    fn catalog() -> Vec<Oil> {
        vec![oil("OliveOil", 0.134), oil("CoconutOil", 0.183)]
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_olive_coconut_scenario() {
        let recipe = RecipeBuilder::new("Scenario")
            .oil("OliveOil", 500.0)
            .oil("CoconutOil", 300.0)
            .superfat(5.0)
            .liquid_percent(30.0)
            .build();

        let oils = catalog();
        let result = FormulationEngine::new(&oils).compute(&recipe).unwrap();

        assert_close(result.reference_oil_weight, 800.0);
        assert_close(result.lye_weight, 115.705);
        assert_close(result.liquid_total_weight, 240.0);
        assert_close(result.water_weight, 240.0);
        assert_close(result.substitute_weight, 0.0);
        assert_close(result.fresh_weight, 1155.705);
        assert_close(result.cured_weight, 1059.705);
        assert_close(result.mold_volume_ml, 1155.705 * 0.95);
        assert_eq!(result.per_oil_weight.get("OliveOil"), Some(500.0));
    }

    #[test]
    fn test_compute_is_idempotent() {
        let recipe = RecipeBuilder::new("Twice")
            .oil("OliveOil", 333.3)
            .oil("Mystery Butter", 123.4)
            .trace_additive("Kaolin", 12.5)
            .essential_oil("Lavender", 7.0)
            .build();
        let oils = catalog();
        let engine = FormulationEngine::new(&oils);
        assert_eq!(engine.compute(&recipe).unwrap(), engine.compute(&recipe).unwrap());
    }

    #[test]
    fn test_weight_and_percent_modes_agree() {
        let oils = vec![oil("A", 0.15), oil("B", 0.15)];
        let by_weight = RecipeBuilder::new("w").oil("A", 500.0).oil("B", 500.0).build();
        // ph = target / (1 + 0.30 + 0.2) = 1000
        let by_percent = RecipeBuilder::new("p")
            .by_percent(1500.0)
            .oil("A", 50.0)
            .oil("B", 50.0)
            .build();

        let engine = FormulationEngine::new(&oils);
        let w = engine.compute(&by_weight).unwrap();
        let p = engine.compute(&by_percent).unwrap();
        assert_close(p.reference_oil_weight, 1000.0);
        assert_close(w.lye_weight, p.lye_weight);
        assert_close(p.per_oil_weight.get("A").unwrap(), 500.0);
    }

    #[test]
    fn test_unknown_oil_uses_fallback_value() {
        let recipe = RecipeBuilder::new("Unknown").oil("Emu Oil", 1000.0).superfat(0.0).build();
        let result = FormulationEngine::new(&[]).compute(&recipe).unwrap();
        assert_close(result.lye_weight, 135.0);
    }

    #[test]
    fn test_substitute_splits_liquid_phase() {
        let recipe = RecipeBuilder::new("Milk")
            .oil("OliveOil", 1000.0)
            .substitute("Goat Milk", 25.0)
            .build();
        let oils = catalog();
        let result = FormulationEngine::new(&oils).compute(&recipe).unwrap();
        assert_close(result.liquid_total_weight, 300.0);
        assert_close(result.substitute_weight, 75.0);
        assert_close(result.water_weight, 225.0);
    }

    #[test]
    fn test_empty_composition_fails_with_zero_reference_weight() {
        let recipe = Recipe::new("Empty");
        let err = FormulationEngine::new(&[]).compute(&recipe).unwrap_err();
        assert!(matches!(err, SoapforgeError::ZeroReferenceWeight(w) if w == 0.0));
    }
}
