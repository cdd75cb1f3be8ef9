pub mod builder;
pub mod engine;

pub use builder::RecipeBuilder;
pub use engine::{reference_oil_weight, saponification_value, FormulationEngine};
