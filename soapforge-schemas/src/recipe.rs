use crate::composition::Composition;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How the quantities in `Recipe::oil_composition` are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightMode {
    /// Quantities are grams.
    #[default]
    ByWeight,
    /// Quantities are percent of the oil phase, scaled from `target_total_weight`.
    ByPercent,
}

pub const NO_SUBSTITUTE: &str = "None";

/// Liquid additive replacing part of the lye water, or the `"None"` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LiquidSubstitute {
    #[default]
    None,
    Additive(String),
}

impl LiquidSubstitute {
    pub fn is_none(&self) -> bool {
        matches!(self, LiquidSubstitute::None)
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            LiquidSubstitute::None => None,
            LiquidSubstitute::Additive(name) => Some(name),
        }
    }
}

impl From<String> for LiquidSubstitute {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == NO_SUBSTITUTE {
            LiquidSubstitute::None
        } else {
            LiquidSubstitute::Additive(trimmed.to_string())
        }
    }
}

impl From<LiquidSubstitute> for String {
    fn from(value: LiquidSubstitute) -> Self {
        match value {
            LiquidSubstitute::None => NO_SUBSTITUTE.to_string(),
            LiquidSubstitute::Additive(name) => name,
        }
    }
}

impl std::fmt::Display for LiquidSubstitute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name().unwrap_or(NO_SUBSTITUTE))
    }
}

/// Output of the formulation engine. All weights are grams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedResult {
    pub reference_oil_weight: f64,
    pub per_oil_weight: Composition,
    pub lye_weight: f64,
    pub liquid_total_weight: f64,
    pub water_weight: f64,
    pub substitute_weight: f64,
    pub fresh_weight: f64,
    pub cured_weight: f64,
    pub mold_volume_ml: f64,
}

/// The working state of a soap recipe, edited step by step before computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recipe {
    pub name: String,
    pub mode: WeightMode,
    /// Only meaningful in `WeightMode::ByPercent`.
    pub target_total_weight: f64,
    pub oil_composition: Composition,
    pub superfat_percent: f64,
    /// Liquid phase as percent of the reference oil weight.
    pub liquid_percent: f64,
    pub liquid_substitute: LiquidSubstitute,
    /// Share of the liquid phase replaced by the substitute.
    pub substitute_percent: f64,
    pub trace_additives: Composition,
    pub essential_oils: Composition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computed: Option<ComputedResult>,
}

impl Default for Recipe {
    fn default() -> Self {
        Self {
            name: String::new(),
            mode: WeightMode::ByWeight,
            target_total_weight: 0.0,
            oil_composition: Composition::new(),
            superfat_percent: 5.0,
            liquid_percent: 30.0,
            liquid_substitute: LiquidSubstitute::None,
            substitute_percent: 0.0,
            trace_additives: Composition::new(),
            essential_oils: Composition::new(),
            creation_date: None,
            computed: None,
        }
    }
}

impl Recipe {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Selects a substitute; choosing `None` also zeroes the substitute percent.
    pub fn set_substitute(&mut self, substitute: LiquidSubstitute, percent: f64) {
        self.substitute_percent = if substitute.is_none() { 0.0 } else { percent };
        self.liquid_substitute = substitute;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let r = Recipe::new("Castile");
        assert_eq!(r.mode, WeightMode::ByWeight);
        assert_eq!(r.superfat_percent, 5.0);
        assert_eq!(r.liquid_percent, 30.0);
        assert_eq!(r.liquid_substitute, LiquidSubstitute::None);
        assert_eq!(r.substitute_percent, 0.0);
        assert!(r.creation_date.is_none());
        assert!(r.computed.is_none());
    }

    #[test]
    fn test_substitute_sentinel_round_trips_as_plain_string() {
        let mut r = Recipe::new("Milk bar");
        r.set_substitute(LiquidSubstitute::Additive("Goat Milk".into()), 50.0);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["liquid_substitute"], "Goat Milk");
        assert_eq!(json["mode"], "by_weight");
        assert!(json.get("computed").is_none());

        r.set_substitute(LiquidSubstitute::None, 50.0);
        assert_eq!(r.substitute_percent, 0.0);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["liquid_substitute"], "None");
    }

    #[test]
    fn test_partial_document_falls_back_to_defaults() {
        let json = r#"{"name": "Quick", "oil_composition": {"Olive Oil": 1000}}"#;
        let r: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(r.name, "Quick");
        assert_eq!(r.oil_composition.get("Olive Oil"), Some(1000.0));
        assert_eq!(r.liquid_percent, 30.0);
        assert!(r.liquid_substitute.is_none());
    }
}
