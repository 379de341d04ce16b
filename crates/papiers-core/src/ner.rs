//! Named-entity recognition seam.
//!
//! The recognizer model itself is external. The core only needs the person
//! spans it reports, in the order it reports them. A process-wide instance
//! can be installed once with [`initialize`] and fetched with [`instance`];
//! until then a [`NoopRecognizer`] stands in.

use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use crate::error::RecognizerError;

/// A recognized entity span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Span text as it appears in the input.
    pub text: String,
    /// Entity label, e.g. `PER`, `LOC`, `ORG`.
    pub label: String,
}

impl Entity {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }

    /// Whether the label denotes a person (`PER`, `PERSON`, `B-PER`, ...).
    pub fn is_person(&self) -> bool {
        let label = self.label.trim().to_ascii_uppercase();
        let label = label
            .strip_prefix("B-")
            .or_else(|| label.strip_prefix("I-"))
            .unwrap_or(&label);
        matches!(label, "PER" | "PERSON")
    }
}

/// Trait for entity recognizer backends.
pub trait EntityRecognizer: Send + Sync {
    /// Recognize entities in `text`.
    fn recognize(&self, text: &str) -> Result<Vec<Entity>, RecognizerError>;

    /// Person spans only, in the order returned. Failures count as no match.
    fn persons(&self, text: &str) -> Vec<Entity> {
        match self.recognize(text) {
            Ok(entities) => entities.into_iter().filter(Entity::is_person).collect(),
            Err(e) => {
                tracing::warn!("Entity recognizer failed, ignoring: {}", e);
                Vec::new()
            }
        }
    }
}

/// Recognizer that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRecognizer;

impl EntityRecognizer for NoopRecognizer {
    fn recognize(&self, _text: &str) -> Result<Vec<Entity>, RecognizerError> {
        Ok(Vec::new())
    }
}

/// Recognizer returning a fixed entity list whatever the input.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRecognizer {
    entities: Vec<Entity>,
}

impl ScriptedRecognizer {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self { entities }
    }

    /// Single person span.
    pub fn person(text: impl Into<String>) -> Self {
        Self::new(vec![Entity::new(text, "PER")])
    }
}

impl EntityRecognizer for ScriptedRecognizer {
    fn recognize(&self, _text: &str) -> Result<Vec<Entity>, RecognizerError> {
        Ok(self.entities.clone())
    }
}

static SHARED: OnceLock<Arc<dyn EntityRecognizer>> = OnceLock::new();

/// Install the process-wide recognizer. Only the first call succeeds.
pub fn initialize(recognizer: Arc<dyn EntityRecognizer>) -> Result<(), RecognizerError> {
    SHARED
        .set(recognizer)
        .map_err(|_| RecognizerError::AlreadyInitialized)
}

/// The process-wide recognizer, a [`NoopRecognizer`] if none was installed.
pub fn instance() -> Arc<dyn EntityRecognizer> {
    SHARED.get_or_init(|| Arc::new(NoopRecognizer)).clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingRecognizer;

    impl EntityRecognizer for FailingRecognizer {
        fn recognize(&self, _text: &str) -> Result<Vec<Entity>, RecognizerError> {
            Err(RecognizerError::Unavailable("model not loaded".to_string()))
        }
    }

    #[test]
    fn test_person_labels() {
        assert!(Entity::new("Jean Dupont", "PER").is_person());
        assert!(Entity::new("Jean Dupont", "person").is_person());
        assert!(Entity::new("Jean", "B-PER").is_person());
        assert!(!Entity::new("Paris", "LOC").is_person());
        assert!(!Entity::new("ACME", "ORG").is_person());
    }

    #[test]
    fn test_persons_filters_and_keeps_order() {
        let recognizer = ScriptedRecognizer::new(vec![
            Entity::new("Lyon", "LOC"),
            Entity::new("Sophie Martin", "PER"),
            Entity::new("Paul Durand", "PERSON"),
        ]);
        let persons = recognizer.persons("ignored");
        assert_eq!(persons.len(), 2);
        assert_eq!(persons[0].text, "Sophie Martin");
        assert_eq!(persons[1].text, "Paul Durand");
    }

    #[test]
    fn test_failure_is_no_match() {
        assert!(FailingRecognizer.persons("Jean Dupont").is_empty());
    }

    #[test]
    fn test_shared_instance_initializes_once() {
        let first = instance();
        assert!(first.persons("Jean Dupont").is_empty());
        assert!(matches!(
            initialize(Arc::new(NoopRecognizer)),
            Err(RecognizerError::AlreadyInitialized)
        ));
    }
}
