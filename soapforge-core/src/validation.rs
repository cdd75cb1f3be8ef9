//! Completion gates and advisory checks for a recipe.
//!
//! The three gates run in a fixed order (composition, liquid, additives) and block
//! computation when they fail. Advisories never block; they flag values worth a second look.

use crate::error::ValidationError;
use crate::formulation::engine::reference_oil_weight;
use serde::Serialize;
use soapforge_schemas::recipe::{Recipe, WeightMode};
use tracing::warn;

pub const MIN_TARGET_TOTAL_WEIGHT: f64 = 10.0;
pub const PERCENT_SUM_TOLERANCE: f64 = 0.01;
pub const SUPERFAT_RANGE: (f64, f64) = (0.0, 15.0);
pub const LIQUID_RANGE: (f64, f64) = (25.0, 40.0);

/// Trace additive ceiling, percent of the reference oil weight.
pub const ADDITIVE_CEILING_PERCENT: f64 = 10.0;
/// Essential oil ceiling, percent of the reference oil weight.
pub const ESSENTIAL_OIL_CEILING_PERCENT: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Gate {
    Composition,
    Liquid,
    Additives,
    Complete,
}

impl Gate {
    pub fn next(self) -> Gate {
        match self {
            Gate::Composition => Gate::Liquid,
            Gate::Liquid => Gate::Additives,
            Gate::Additives | Gate::Complete => Gate::Complete,
        }
    }

    pub fn previous(self) -> Gate {
        match self {
            Gate::Composition | Gate::Liquid => Gate::Composition,
            Gate::Additives => Gate::Liquid,
            Gate::Complete => Gate::Additives,
        }
    }
}

impl std::fmt::Display for Gate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gate::Composition => write!(f, "composition"),
            Gate::Liquid => write!(f, "liquid"),
            Gate::Additives => write!(f, "additives"),
            Gate::Complete => write!(f, "complete"),
        }
    }
}

fn is_positive(quantity: f64) -> bool {
    quantity.is_finite() && quantity > 0.0
}

/// Gate 1: oils present, all positive, and for percent mode a valid target and a 100% sum.
pub fn validate_composition(recipe: &Recipe) -> Result<(), ValidationError> {
    if recipe.oil_composition.is_empty() {
        return Err(ValidationError::EmptyComposition);
    }
    if let Some((name, _)) = recipe.oil_composition.iter().find(|(_, q)| !is_positive(*q)) {
        return Err(ValidationError::NonPositiveOil(name.to_string()));
    }
    if recipe.mode == WeightMode::ByPercent {
        let target = recipe.target_total_weight;
        if !target.is_finite() || target <= MIN_TARGET_TOTAL_WEIGHT {
            return Err(ValidationError::InvalidTargetWeight(recipe.target_total_weight));
        }
        let total = recipe.oil_composition.total();
        if (total - 100.0).abs() > PERCENT_SUM_TOLERANCE {
            return Err(ValidationError::PercentSumMismatch(total));
        }
    }
    Ok(())
}

/// Gate 2: lye parameters in range and substitute/percent consistency.
pub fn validate_liquid(recipe: &Recipe) -> Result<(), ValidationError> {
    let in_range = |v: f64, (lo, hi): (f64, f64)| v >= lo && v <= hi;

    if !in_range(recipe.superfat_percent, SUPERFAT_RANGE) {
        return Err(ValidationError::SuperfatOutOfRange(recipe.superfat_percent));
    }
    if !in_range(recipe.liquid_percent, LIQUID_RANGE) {
        return Err(ValidationError::LiquidOutOfRange(recipe.liquid_percent));
    }
    if !in_range(recipe.substitute_percent, (0.0, 100.0)) {
        return Err(ValidationError::SubstitutePercentOutOfRange(
            recipe.substitute_percent,
        ));
    }
    match recipe.liquid_substitute.name() {
        Some(name) if recipe.substitute_percent == 0.0 => {
            Err(ValidationError::SubstituteWithoutPercent(name.to_string()))
        }
        None if recipe.substitute_percent > 0.0 => Err(
            ValidationError::PercentWithoutSubstitute(recipe.substitute_percent),
        ),
        _ => Ok(()),
    }
}

/// Gate 3: every trace additive and essential oil has a positive quantity.
pub fn validate_additives(recipe: &Recipe) -> Result<(), ValidationError> {
    if let Some((name, _)) = recipe.trace_additives.iter().find(|(_, g)| !is_positive(*g)) {
        return Err(ValidationError::NonPositiveAdditive(name.to_string()));
    }
    if let Some((name, _)) = recipe.essential_oils.iter().find(|(_, g)| !is_positive(*g)) {
        return Err(ValidationError::NonPositiveEssentialOil(name.to_string()));
    }
    Ok(())
}

/// Runs the gate for `gate`. `Gate::Complete` runs all three.
pub fn validate_gate(recipe: &Recipe, gate: Gate) -> Result<(), ValidationError> {
    match gate {
        Gate::Composition => validate_composition(recipe),
        Gate::Liquid => validate_liquid(recipe),
        Gate::Additives => validate_additives(recipe),
        Gate::Complete => validate_all(recipe),
    }
}

pub fn validate_all(recipe: &Recipe) -> Result<(), ValidationError> {
    validate_composition(recipe)?;
    validate_liquid(recipe)?;
    validate_additives(recipe)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TraceCatalog {
    Additives,
    EssentialOils,
}

impl std::fmt::Display for TraceCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraceCatalog::Additives => write!(f, "trace additives"),
            TraceCatalog::EssentialOils => write!(f, "essential oils"),
        }
    }
}

/// How much of a trace catalog the recipe uses against its fixed ceiling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceLimitReport {
    pub catalog: TraceCatalog,
    pub total_grams: f64,
    /// Percent of the reference oil weight; 0 when the oil weight is not positive.
    pub percent_of_oils: f64,
    pub ceiling_percent: f64,
    pub max_grams: f64,
    pub exceeded: bool,
}

fn trace_limit(catalog: TraceCatalog, total: f64, ph: f64, ceiling: f64) -> TraceLimitReport {
    let percent = if ph > 0.0 { total / ph * 100.0 } else { 0.0 };
    TraceLimitReport {
        catalog,
        total_grams: total,
        percent_of_oils: percent,
        ceiling_percent: ceiling,
        max_grams: ph.max(0.0) * ceiling / 100.0,
        exceeded: percent > ceiling,
    }
}

/// Advisory ceilings for trace additives (10%) and essential oils (3%). Never blocks.
pub fn trace_limits(recipe: &Recipe) -> [TraceLimitReport; 2] {
    let ph = reference_oil_weight(recipe);
    [
        trace_limit(
            TraceCatalog::Additives,
            recipe.trace_additives.total(),
            ph,
            ADDITIVE_CEILING_PERCENT,
        ),
        trace_limit(
            TraceCatalog::EssentialOils,
            recipe.essential_oils.total(),
            ph,
            ESSENTIAL_OIL_CEILING_PERCENT,
        ),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advisory {
    pub severity: Severity,
    pub code: String,
    pub message: String,
}

pub fn superfat_advice(percent: f64) -> Advisory {
    let (severity, code, message) = if percent <= 2.0 {
        (Severity::Warning, "SUPERFAT_VERY_LOW", "Very low, suited to liquid soap")
    } else if percent <= 4.0 {
        (Severity::Info, "SUPERFAT_LOW", "Low, consider superfatting at trace")
    } else if percent <= 8.0 {
        (Severity::Info, "SUPERFAT_IDEAL", "Ideal for any recipe")
    } else if percent <= 13.0 {
        (Severity::Warning, "SUPERFAT_HIGH", "High, risk of rancidity")
    } else {
        (Severity::Warning, "SUPERFAT_VERY_HIGH", "Very high, check the recipe")
    };
    Advisory {
        severity,
        code: code.to_string(),
        message: format!("Superfat {percent}%: {message}"),
    }
}

pub fn liquid_advice(percent: f64) -> Advisory {
    let message = if percent <= 28.0 {
        "Low, fast trace"
    } else if percent <= 33.0 {
        "Medium, versatile"
    } else if percent <= 36.0 {
        "High, good for swirls"
    } else {
        "Very high, liquid or milk soap"
    };
    Advisory {
        severity: Severity::Info,
        code: "LIQUID_PROPORTION".to_string(),
        message: format!("Liquid {percent}%: {message}"),
    }
}

/// Collects the non-blocking observations about a recipe.
pub fn advisories(recipe: &Recipe) -> Vec<Advisory> {
    let mut out = vec![
        superfat_advice(recipe.superfat_percent),
        liquid_advice(recipe.liquid_percent),
    ];

    for report in trace_limits(recipe) {
        if report.exceeded {
            warn!(
                catalog = %report.catalog,
                percent = report.percent_of_oils,
                ceiling = report.ceiling_percent,
                "trace ceiling exceeded"
            );
            out.push(Advisory {
                severity: Severity::Warning,
                code: match report.catalog {
                    TraceCatalog::Additives => "ADDITIVES_OVER_LIMIT",
                    TraceCatalog::EssentialOils => "ESSENTIAL_OILS_OVER_LIMIT",
                }
                .to_string(),
                message: format!(
                    "{} total {:.1} g is {:.1}% of the oils, above the advised {}% ({:.1} g)",
                    report.catalog,
                    report.total_grams,
                    report.percent_of_oils,
                    report.ceiling_percent,
                    report.max_grams
                ),
            });
        }
    }
    out
}
