//! WASM bindings for French identity card and résumé extraction.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.
//! OCR and entity recognition run on the JavaScript side; these bindings take
//! their text and person spans.

use std::sync::Arc;

use wasm_bindgen::prelude::*;

use papiers_core::models::config::{ExtractionConfig, PapiersConfig};
use papiers_core::{Entity, ExtractionEngine, NoopRecognizer, ScriptedRecognizer};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Classify OCR text: `"IdentityCard"`, `"Resume"` or `"Unknown"`.
#[wasm_bindgen]
pub fn classify_document(text: &str) -> String {
    engine(ExtractionConfig::default()).classify(text).to_string()
}

/// Extract a record from OCR text.
///
/// Rejects with `"document type not recognized"` when the text is neither
/// an identity card nor a résumé.
#[wasm_bindgen]
pub fn extract_from_text(text: &str) -> Result<JsValue, JsValue> {
    DocumentExtractor::new().extract(text)
}

fn engine(config: ExtractionConfig) -> ExtractionEngine {
    ExtractionEngine::with_config(config).with_recognizer(Arc::new(NoopRecognizer))
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Document extractor class for browser use.
#[wasm_bindgen]
pub struct DocumentExtractor {
    config: ExtractionConfig,
    engine: ExtractionEngine,
}

#[wasm_bindgen]
impl DocumentExtractor {
    /// Create an extractor with default settings.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let config = ExtractionConfig::default();
        Self {
            engine: engine(config.clone()),
            config,
        }
    }

    /// Create an extractor from a JSON configuration (the `papiers` config
    /// file format; only the `extraction` section is used).
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(json: &str) -> Result<DocumentExtractor, JsValue> {
        let config: PapiersConfig =
            serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            engine: engine(config.extraction.clone()),
            config: config.extraction,
        })
    }

    /// Person spans recognized on the JavaScript side, as an array of
    /// `{text, label}` objects. Used for name extraction on later calls.
    #[wasm_bindgen(js_name = setEntities)]
    pub fn set_entities(&mut self, entities: JsValue) -> Result<(), JsValue> {
        let entities: Vec<Entity> = serde_wasm_bindgen::from_value(entities)?;
        self.engine = ExtractionEngine::with_config(self.config.clone())
            .with_recognizer(Arc::new(ScriptedRecognizer::new(entities)));
        Ok(())
    }

    /// Forget entities set with `setEntities`.
    #[wasm_bindgen(js_name = clearEntities)]
    pub fn clear_entities(&mut self) {
        self.engine = engine(self.config.clone());
    }

    /// Classify text.
    #[wasm_bindgen]
    pub fn classify(&self, text: &str) -> String {
        self.engine.classify(text).to_string()
    }

    /// Extract the record from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        let result = self
            .engine
            .extract(text)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        to_js(&result.record)
    }

    /// Extract with document type, missing fields and timing.
    #[wasm_bindgen(js_name = extractWithMetadata)]
    pub fn extract_with_metadata(&self, text: &str) -> Result<JsValue, JsValue> {
        let result = self
            .engine
            .extract(text)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        to_js(&result)
    }
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const IDENTITY: &str = "RÉPUBLIQUE FRANÇAISE\nNOM: MARTIN\nPRÉNOM: Sophie\nSexe: F";

    #[wasm_bindgen_test]
    fn test_classify_document() {
        assert_eq!(classify_document(IDENTITY), "IdentityCard");
        assert_eq!(classify_document("Liste de courses"), "Unknown");
    }

    #[wasm_bindgen_test]
    fn test_extract_from_text() {
        assert!(extract_from_text(IDENTITY).is_ok());
        assert!(extract_from_text("Liste de courses").is_err());
    }

    #[wasm_bindgen_test]
    fn test_from_config() {
        let extractor =
            DocumentExtractor::from_config(r#"{"extraction": {"identity_threshold": 5}}"#).unwrap();
        assert_eq!(extractor.classify(IDENTITY), "Unknown");
        assert!(DocumentExtractor::from_config("not json").is_err());
    }
}
