//! Formulation engine and persistence for cold-process soap recipes.
//!
//! The usual flow: open an [`IngredientStore`], edit a recipe through an
//! [`EditSession`], compute it with the [`FormulationEngine`], then hand the frozen
//! recipe to a [`RecipeStore`].

pub mod error;
pub mod formulation;
pub mod session;
pub mod store;
pub mod validation;

pub use error::{SoapforgeError, ValidationError};
pub use formulation::{FormulationEngine, RecipeBuilder};
pub use session::EditSession;
pub use store::{IngredientStore, RecipeStore, StorageLayout};
