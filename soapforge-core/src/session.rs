use crate::{
    error::{SoapforgeError, ValidationError},
    formulation::engine::FormulationEngine,
    validation::{self, Gate},
};
use chrono::{DateTime, Utc};
use soapforge_schemas::{
    ingredient::Oil,
    recipe::{ComputedResult, Recipe},
};
use tracing::debug;

/// One caller editing one recipe through the ordered completion gates.
///
/// Any mutable access to the recipe sends the session back to the first gate, so the
/// gates are always passed in order against the recipe as it currently stands.
#[derive(Debug, Clone)]
pub struct EditSession {
    recipe: Recipe,
    gate: Gate,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditSession {
    pub fn new() -> Self {
        Self::with_recipe(Recipe::default())
    }

    /// Resumes editing an existing recipe, e.g. one loaded from the store.
    pub fn with_recipe(recipe: Recipe) -> Self {
        Self {
            recipe,
            gate: Gate::Composition,
        }
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    pub fn recipe_mut(&mut self) -> &mut Recipe {
        self.gate = Gate::Composition;
        &mut self.recipe
    }

    /// The gate the recipe must pass next.
    pub fn gate(&self) -> Gate {
        self.gate
    }

    pub fn is_complete(&self) -> bool {
        self.gate == Gate::Complete
    }

    /// Validates the current gate and moves on to the next one.
    pub fn advance(&mut self) -> Result<Gate, ValidationError> {
        validation::validate_gate(&self.recipe, self.gate)?;
        let next = self.gate.next();
        debug!(from = %self.gate, to = %next, "gate passed");
        self.gate = next;
        Ok(next)
    }

    /// Walks every remaining gate, stopping at the first failure.
    pub fn advance_to_complete(&mut self) -> Result<(), ValidationError> {
        while !self.is_complete() {
            self.advance()?;
        }
        Ok(())
    }

    pub fn back(&mut self) -> Gate {
        self.gate = self.gate.previous();
        self.gate
    }

    pub fn compute(&self, oils: &[Oil]) -> Result<ComputedResult, SoapforgeError> {
        if !self.is_complete() {
            return Err(ValidationError::Incomplete(self.gate).into());
        }
        FormulationEngine::new(oils).compute(&self.recipe)
    }

    /// Ends the session, attaching the result and stamping the creation date once.
    pub fn freeze(self, result: ComputedResult, now: DateTime<Utc>) -> Recipe {
        let mut recipe = self.recipe;
        recipe.computed = Some(result);
        recipe.creation_date.get_or_insert(now);
        recipe
    }

    /// Discards the working recipe and starts again from defaults.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_gates_pass_in_order() {
        let mut session = EditSession::new();
        assert_eq!(session.advance(), Err(ValidationError::EmptyComposition));
        assert_eq!(session.gate(), Gate::Composition);

        session.recipe_mut().oil_composition.set("Olive Oil", 800.0);
        assert_eq!(session.advance(), Ok(Gate::Liquid));
        assert_eq!(session.advance(), Ok(Gate::Additives));
        assert_eq!(session.advance(), Ok(Gate::Complete));
        assert!(session.is_complete());
    }

    #[test]
    fn test_editing_returns_to_first_gate() {
        let mut session = EditSession::new();
        session.recipe_mut().oil_composition.set("Olive Oil", 800.0);
        session.advance_to_complete().unwrap();

        session.recipe_mut().essential_oils.set("Lavender", 0.0);
        assert_eq!(session.gate(), Gate::Composition);
        assert_eq!(
            session.advance_to_complete(),
            Err(ValidationError::NonPositiveEssentialOil("Lavender".into()))
        );
        assert_eq!(session.gate(), Gate::Additives);
        assert_eq!(session.back(), Gate::Liquid);
    }

    #[test]
    fn test_compute_requires_complete_session() {
        let mut session = EditSession::new();
        session.recipe_mut().oil_composition.set("Olive Oil", 800.0);
        let err = session.compute(&[]).unwrap_err();
        assert!(matches!(
            err,
            SoapforgeError::Validation(ValidationError::Incomplete(Gate::Composition))
        ));
    }

    #[test]
    fn test_freeze_stamps_date_once() {
        let mut session = EditSession::new();
        session.recipe_mut().oil_composition.set("Olive Oil", 800.0);
        session.advance_to_complete().unwrap();
        let result = session.compute(&[]).unwrap();

        let first = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let frozen = session.freeze(result.clone(), first);
        assert_eq!(frozen.creation_date, Some(first));
        assert_eq!(frozen.computed.as_ref(), Some(&result));

        let later = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut again = EditSession::with_recipe(frozen);
        again.advance_to_complete().unwrap();
        let refrozen = again.freeze(result, later);
        assert_eq!(refrozen.creation_date, Some(first));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut session = EditSession::new();
        session.recipe_mut().superfat_percent = 8.0;
        session.reset();
        assert_eq!(session.recipe(), &Recipe::default());
        assert_eq!(session.gate(), Gate::Composition);
    }
}
