//! generator::hints
//!
//! Structured metadata a generator attaches to the values it produces.
//!
//! Hints tell the engine what to do around a value: whether the value came
//! from this generator at all (delegation), whether it may be replaced by
//! null, whether record fields should be filled afterwards, and how many
//! elements a list should receive.

use serde::{Deserialize, Serialize};

use crate::core::types::TypeKey;

/// Delegation and nullability hint.
///
/// When `delegating` is true the generator supplies hints only and the value
/// comes from a generator chosen for `target` (or the node's own type when
/// `target` is `None`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorHint {
    pub delegating: bool,
    pub target: Option<TypeKey>,
    pub nullable: bool,
}

impl GeneratorHint {
    /// A hint that delegates value production.
    pub fn delegating() -> Self {
        Self {
            delegating: true,
            ..Default::default()
        }
    }

    pub fn with_target(mut self, target: TypeKey) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }
}

/// What the engine does with a record after a generator produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AfterGenerate {
    /// Leave the value exactly as generated
    DoNotModify,
    /// Fill fields that are absent or null
    PopulateNulls,
    /// Overwrite every field
    PopulateAll,
}

/// Number of elements the engine generates for a list value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionHint {
    pub size: usize,
}

/// All hints carried by one generator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hints {
    generator: Option<GeneratorHint>,
    after_generate: Option<AfterGenerate>,
    collection: Option<CollectionHint>,
}

impl Hints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_generator(mut self, hint: GeneratorHint) -> Self {
        self.generator = Some(hint);
        self
    }

    pub fn with_after_generate(mut self, after: AfterGenerate) -> Self {
        self.after_generate = Some(after);
        self
    }

    pub fn with_collection(mut self, hint: CollectionHint) -> Self {
        self.collection = Some(hint);
        self
    }

    pub fn generator(&self) -> Option<&GeneratorHint> {
        self.generator.as_ref()
    }

    pub fn after_generate(&self) -> Option<AfterGenerate> {
        self.after_generate
    }

    pub fn collection(&self) -> Option<CollectionHint> {
        self.collection
    }

    pub fn is_delegating(&self) -> bool {
        self.generator.as_ref().is_some_and(|h| h.delegating)
    }

    pub fn is_nullable(&self) -> bool {
        self.generator.as_ref().is_some_and(|h| h.nullable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_hints_are_empty() {
        let hints = Hints::default();
        assert!(hints.generator().is_none());
        assert!(!hints.is_delegating());
        assert!(!hints.is_nullable());
        assert_eq!(hints.after_generate(), None);
        assert_eq!(hints.collection(), None);
    }

    #[test]
    fn delegating_hint_with_target() {
        let hints = Hints::new().with_generator(
            GeneratorHint::delegating()
                .with_target(TypeKey::uuid())
                .with_nullable(false),
        );
        assert!(hints.is_delegating());
        assert!(!hints.is_nullable());
        assert_eq!(
            hints.generator().and_then(|h| h.target.clone()),
            Some(TypeKey::uuid())
        );
    }

    #[test]
    fn after_generate_serde_names() {
        let parsed: AfterGenerate = serde_json::from_str("\"populate_nulls\"").unwrap();
        assert_eq!(parsed, AfterGenerate::PopulateNulls);
        assert_eq!(
            serde_json::to_string(&AfterGenerate::DoNotModify).unwrap(),
            "\"do_not_modify\""
        );
    }
}
