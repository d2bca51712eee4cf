// SPDX-FileCopyrightText: 2026 Moodwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the hosted inference API.

use serde::{Deserialize, Serialize};

/// Request body for a model invocation.
#[derive(Debug, Clone, Serialize)]
pub struct InferenceRequest<'a> {
    pub inputs: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Parameters>,
    pub options: Options,
}

impl<'a> InferenceRequest<'a> {
    /// A plain request with no model parameters.
    pub fn new(inputs: &'a str) -> Self {
        Self {
            inputs,
            parameters: None,
            options: Options::default(),
        }
    }

    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = Some(parameters);
        self
    }
}

/// Optional model parameters; which fields apply depends on the task.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Parameters {
    /// NER: merge sub-word tokens into whole entities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregation_strategy: Option<&'static str>,
    /// Summarization: upper token bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    /// Summarization: lower token bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    /// Summarization: deterministic decoding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub do_sample: Option<bool>,
}

/// Request options honored by the hosted API.
#[derive(Debug, Clone, Serialize)]
pub struct Options {
    /// Block while a cold model loads instead of returning 503 immediately.
    pub wait_for_model: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            wait_for_model: true,
        }
    }
}

/// One class prediction from a text-classification model.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassPrediction {
    pub label: String,
    pub score: f32,
}

/// Classification responses arrive either flat or nested one level,
/// depending on the model pipeline version.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ClassificationResponse {
    Nested(Vec<Vec<ClassPrediction>>),
    Flat(Vec<ClassPrediction>),
}

impl ClassificationResponse {
    /// The highest-scoring prediction, if any. Predictions arrive sorted
    /// by descending score.
    pub fn into_top(self) -> Option<ClassPrediction> {
        match self {
            ClassificationResponse::Nested(mut outer) => {
                if outer.is_empty() {
                    None
                } else {
                    outer.remove(0).into_iter().next()
                }
            }
            ClassificationResponse::Flat(flat) => flat.into_iter().next(),
        }
    }
}

/// One aggregated entity from a token-classification model.
#[derive(Debug, Clone, Deserialize)]
pub struct NerEntity {
    pub entity_group: String,
    pub word: String,
    #[allow(dead_code)]
    pub score: f32,
}

/// One generated summary from a summarization model.
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryOutput {
    pub summary_text: String,
}

/// Error body the hosted API returns on failure.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_classification_parses() {
        let json = r#"[[{"label":"positive","score":0.98},{"label":"neutral","score":0.01}]]"#;
        let response: ClassificationResponse = serde_json::from_str(json).unwrap();
        let top = response.into_top().unwrap();
        assert_eq!(top.label, "positive");
    }

    #[test]
    fn flat_classification_parses() {
        let json = r#"[{"label":"negative","score":0.77}]"#;
        let response: ClassificationResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.into_top().unwrap().label, "negative");
    }

    #[test]
    fn empty_classification_has_no_top() {
        let json = "[]";
        let response: ClassificationResponse = serde_json::from_str(json).unwrap();
        assert!(response.into_top().is_none());
    }

    #[test]
    fn request_skips_absent_parameters() {
        let request = InferenceRequest::new("hello");
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("parameters"));
        assert!(json.contains("wait_for_model"));
    }

    #[test]
    fn summary_parameters_serialize() {
        let request = InferenceRequest::new("long text").with_parameters(Parameters {
            max_length: Some(50),
            min_length: Some(25),
            do_sample: Some(false),
            ..Parameters::default()
        });
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"max_length\":50"));
        assert!(json.contains("\"do_sample\":false"));
        assert!(!json.contains("aggregation_strategy"));
    }
}
