use crate::validation::Gate;
use thiserror::Error;

/// A completion gate refused the recipe. Always recoverable: fix the recipe and retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("The recipe has no oils")]
    EmptyComposition,

    #[error("Oil '{0}' needs a quantity greater than zero")]
    NonPositiveOil(String),

    #[error("Target total weight must be greater than 10 g, got {0}")]
    InvalidTargetWeight(f64),

    #[error("Oil percentages must sum to 100%, currently {0}%")]
    PercentSumMismatch(f64),

    #[error("Superfat must be between 0% and 15%, got {0}%")]
    SuperfatOutOfRange(f64),

    #[error("Liquid proportion must be between 25% and 40%, got {0}%")]
    LiquidOutOfRange(f64),

    #[error("Substitute percent must be between 0% and 100%, got {0}%")]
    SubstitutePercentOutOfRange(f64),

    #[error("Liquid substitute '{0}' is selected but its percent is 0")]
    SubstituteWithoutPercent(String),

    #[error("Substitute percent is {0}% but no liquid substitute is selected")]
    PercentWithoutSubstitute(f64),

    #[error("Trace additive '{0}' needs a quantity greater than zero")]
    NonPositiveAdditive(String),

    #[error("Essential oil '{0}' needs a quantity greater than zero")]
    NonPositiveEssentialOil(String),

    #[error("The recipe has not passed the {0} gate yet")]
    Incomplete(Gate),
}

#[derive(Debug, Error)]
pub enum SoapforgeError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Calculation error: zero reference weight ({0} g)")]
    ZeroReferenceWeight(f64),

    #[error("I/O error for file '{0}': {1}")]
    FileIO(String, #[source] std::io::Error),

    #[error("Failed to parse JSON from '{0}': {1}")]
    JsonParsing(String, #[source] serde_json::Error),

    #[error("Failed to rename '{from}' to '{to}': {source}")]
    RenameFailed {
        from: String,
        to: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{0}' is not a recipe identity: expected a plain file name inside the recipe store")]
    InvalidIdentity(String),

    #[error("Cannot rename to '{0}': a recipe with that name already exists")]
    RenameTargetExists(String),

    #[error("'{name}' already exists in the {catalog} catalog")]
    DuplicateIngredient { catalog: String, name: String },

    #[error("Ingredient name must not be empty ({0} catalog)")]
    EmptyIngredientName(String),

    #[error("Resource integrity error: {0}")]
    ResourceIntegrity(String),
}

impl SoapforgeError {
    pub(crate) fn io(path: impl AsRef<std::path::Path>, err: std::io::Error) -> Self {
        SoapforgeError::FileIO(path.as_ref().display().to_string(), err)
    }

    pub(crate) fn json(path: impl AsRef<std::path::Path>, err: serde_json::Error) -> Self {
        SoapforgeError::JsonParsing(path.as_ref().display().to_string(), err)
    }

    /// True for the persistence family: read, write, parse and rename failures.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            SoapforgeError::FileIO(..)
                | SoapforgeError::JsonParsing(..)
                | SoapforgeError::RenameFailed { .. }
                | SoapforgeError::RenameTargetExists(_)
                | SoapforgeError::InvalidIdentity(_)
        )
    }
}
