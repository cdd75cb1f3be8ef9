use soapforge_schemas::recipe::{LiquidSubstitute, Recipe, WeightMode};

/// A fluent builder for assembling a `Recipe`.
///
/// Starts from the same defaults as a fresh recipe (by weight, 5% superfat, 30% liquid,
/// no substitute). The builder does not validate; run the gates in `validation` or drive
/// the recipe through an `EditSession` for that.
pub struct RecipeBuilder {
    recipe: Recipe,
}

impl RecipeBuilder {
    /// Creates a builder for a recipe with the given display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            recipe: Recipe::new(name),
        }
    }

    /// Oil quantities are grams.
    pub fn by_weight(mut self) -> Self {
        self.recipe.mode = WeightMode::ByWeight;
        self
    }

    /// Oil quantities are percentages of an oil phase scaled from `target_total_weight`.
    pub fn by_percent(mut self, target_total_weight: f64) -> Self {
        self.recipe.mode = WeightMode::ByPercent;
        self.recipe.target_total_weight = target_total_weight;
        self
    }

    /// Adds an oil, or replaces its quantity if already present.
    pub fn oil(mut self, name: impl Into<String>, quantity: f64) -> Self {
        self.recipe.oil_composition.set(name, quantity);
        self
    }

    pub fn superfat(mut self, percent: f64) -> Self {
        self.recipe.superfat_percent = percent;
        self
    }

    pub fn liquid_percent(mut self, percent: f64) -> Self {
        self.recipe.liquid_percent = percent;
        self
    }

    /// Replaces `percent` of the liquid phase with the named liquid additive.
    pub fn substitute(mut self, name: impl Into<String>, percent: f64) -> Self {
        self.recipe.liquid_substitute = LiquidSubstitute::Additive(name.into());
        self.recipe.substitute_percent = percent;
        self
    }

    pub fn trace_additive(mut self, name: impl Into<String>, grams: f64) -> Self {
        self.recipe.trace_additives.set(name, grams);
        self
    }

    pub fn essential_oil(mut self, name: impl Into<String>, grams: f64) -> Self {
        self.recipe.essential_oils.set(name, grams);
        self
    }

    /// Consumes the builder and returns the recipe as configured.
    pub fn build(self) -> Recipe {
        self.recipe
    }
}
