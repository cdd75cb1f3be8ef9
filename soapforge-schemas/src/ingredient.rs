use serde::{Deserialize, Serialize};

/// A fat or oil that can be saponified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Oil {
    pub name: String,
    /// Grams of NaOH needed to saponify one gram of this oil.
    pub saponification_value: f64,
    #[serde(default)]
    pub quality_notes: String,
    #[serde(default)]
    pub foam_rating: String,
    #[serde(default)]
    pub recommendation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AdditiveCategory {
    #[serde(rename = "liquid", alias = "Liquid", alias = "LIQUID")]
    Liquid,
    #[serde(rename = "trace", alias = "Trace", alias = "TRACE")]
    #[default]
    Trace,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Additive {
    pub name: String,
    #[serde(default)]
    pub property_notes: String,
    /// Free-form usage hint such as "5-15%".
    #[serde(default)]
    pub recommended_percent: String,
    #[serde(default)]
    pub category: AdditiveCategory,
}

impl Additive {
    /// Only liquid additives may stand in for part of the lye water.
    pub fn is_liquid(&self) -> bool {
        self.category == AdditiveCategory::Liquid
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Toxicity {
    #[serde(rename = "0", alias = "none")]
    #[default]
    None,
    #[serde(rename = "+", alias = "low")]
    Low,
    #[serde(rename = "++", alias = "medium")]
    Medium,
    #[serde(rename = "E", alias = "contraindicated_maternity")]
    ContraindicatedMaternity,
}

impl std::fmt::Display for Toxicity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Toxicity::None => write!(f, "none (0)"),
            Toxicity::Low => write!(f, "low (+)"),
            Toxicity::Medium => write!(f, "medium (++)"),
            Toxicity::ContraindicatedMaternity => write!(f, "contraindicated in pregnancy (E)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EssentialOil {
    pub name: String,
    #[serde(default)]
    pub property_notes: String,
    #[serde(default)]
    pub toxicity: Toxicity,
}
