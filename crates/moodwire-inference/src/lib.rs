// SPDX-FileCopyrightText: 2026 Moodwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hosted inference API analysis stage for Moodwire.
//!
//! Implements [`AnalysisStage`] against the Hugging Face Inference API:
//! one hosted model per sub-analysis (sentiment classification,
//! named-entity recognition, summarization), each independently callable
//! and independently failable.

pub mod client;
pub mod types;

use std::str::FromStr;

use async_trait::async_trait;
use moodwire_config::model::InferenceConfig;
use moodwire_core::{
    Adapter, AdapterType, AnalysisStage, AnalysisStageKind, Entity, HealthStatus,
    MoodwireError, Sentiment, SentimentLabel,
};

use crate::client::InferenceClient;
use crate::types::{
    ClassificationResponse, InferenceRequest, NerEntity, Parameters, SummaryOutput,
};

/// Analysis stage backed by hosted inference models.
pub struct HostedAnalysisStage {
    client: InferenceClient,
    config: InferenceConfig,
}

impl HostedAnalysisStage {
    /// Creates the stage from the inference configuration.
    pub fn new(config: InferenceConfig) -> Result<Self, MoodwireError> {
        let client = InferenceClient::new(&config)?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl Adapter for HostedAnalysisStage {
    fn name(&self) -> &str {
        "hosted-inference"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Analysis
    }

    async fn health_check(&self) -> Result<HealthStatus, MoodwireError> {
        // No dedicated status endpoint; connectivity problems surface on
        // the first analysis call as per-stage errors.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MoodwireError> {
        Ok(())
    }
}

#[async_trait]
impl AnalysisStage for HostedAnalysisStage {
    async fn sentiment(&self, text: &str) -> Result<Sentiment, MoodwireError> {
        let stage = AnalysisStageKind::Sentiment;
        let request = InferenceRequest::new(text);
        let response: ClassificationResponse = self
            .client
            .infer(&self.config.sentiment_model, &request, stage)
            .await?;

        let top = response
            .into_top()
            .ok_or_else(|| MoodwireError::analysis(stage, "classifier returned no predictions"))?;

        let label = SentimentLabel::from_str(&top.label).map_err(|_| {
            MoodwireError::analysis(stage, format!("unrecognized sentiment label `{}`", top.label))
        })?;

        Ok(Sentiment {
            label,
            score: top.score,
        })
    }

    async fn entities(&self, text: &str) -> Result<Vec<Entity>, MoodwireError> {
        let request = InferenceRequest::new(text).with_parameters(Parameters {
            aggregation_strategy: Some("simple"),
            ..Parameters::default()
        });
        let entities: Vec<NerEntity> = self
            .client
            .infer(&self.config.entity_model, &request, AnalysisStageKind::Entities)
            .await?;

        Ok(entities
            .into_iter()
            .map(|e| Entity {
                text: e.word,
                kind: e.entity_group,
            })
            .collect())
    }

    async fn summarize(&self, text: &str) -> Result<String, MoodwireError> {
        let stage = AnalysisStageKind::Summary;
        let request = InferenceRequest::new(text).with_parameters(Parameters {
            max_length: Some(self.config.summary_max_length),
            min_length: Some(self.config.summary_min_length),
            do_sample: Some(false),
            ..Parameters::default()
        });
        let outputs: Vec<SummaryOutput> = self
            .client
            .infer(&self.config.summary_model, &request, stage)
            .await?;

        outputs
            .into_iter()
            .next()
            .map(|o| o.summary_text)
            .ok_or_else(|| MoodwireError::analysis(stage, "summarizer returned no output"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn stage_against(server: &MockServer) -> HostedAnalysisStage {
        let mut config = InferenceConfig::default();
        config.endpoint = server.uri();
        config.sentiment_model = "test/sentiment".to_string();
        config.entity_model = "test/ner".to_string();
        config.summary_model = "test/summary".to_string();
        HostedAnalysisStage::new(config).unwrap()
    }

    #[tokio::test]
    async fn sentiment_parses_top_prediction() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/test/sentiment"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"[[{"label":"positive","score":0.98},{"label":"negative","score":0.01}]]"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let stage = stage_against(&server).await;
        let sentiment = stage.sentiment("great news").await.unwrap();
        assert_eq!(sentiment.label, SentimentLabel::Positive);
        assert!(sentiment.score > 0.9);
    }

    #[tokio::test]
    async fn unrecognized_label_is_an_analysis_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/test/sentiment"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"[[{"label":"LABEL_0","score":0.9}]]"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let stage = stage_against(&server).await;
        let err = stage.sentiment("hmm").await.unwrap_err();
        assert!(err.to_string().contains("LABEL_0"));
    }

    #[tokio::test]
    async fn entities_map_word_and_group() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/test/ner"))
            .and(body_partial_json(serde_json::json!({
                "parameters": {"aggregation_strategy": "simple"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"[{"entity_group":"LOC","word":"Paris","score":0.99},
                    {"entity_group":"PER","word":"Anna","score":0.97}]"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let stage = stage_against(&server).await;
        let entities = stage.entities("Anna went to Paris").await.unwrap();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].text, "Paris");
        assert_eq!(entities[0].kind, "LOC");
        assert_eq!(entities[1].kind, "PER");
    }

    #[tokio::test]
    async fn summarize_forwards_length_bounds() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/test/summary"))
            .and(body_partial_json(serde_json::json!({
                "parameters": {"max_length": 50, "min_length": 25, "do_sample": false}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"[{"summary_text":"a short summary"}]"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let stage = stage_against(&server).await;
        let summary = stage.summarize("a very long chat message").await.unwrap();
        assert_eq!(summary, "a short summary");
    }

    #[tokio::test]
    async fn transient_error_is_retried_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/test/sentiment"))
            .respond_with(ResponseTemplate::new(503).set_body_raw(
                r#"{"error":"model test/sentiment is currently loading"}"#,
                "application/json",
            ))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/models/test/sentiment"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"[[{"label":"neutral","score":0.6}]]"#,
                "application/json",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let stage = stage_against(&server).await;
        let sentiment = stage.sentiment("meh").await.unwrap();
        assert_eq!(sentiment.label, SentimentLabel::Neutral);
    }

    #[tokio::test]
    async fn auth_failure_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/test/summary"))
            .respond_with(ResponseTemplate::new(401).set_body_raw(
                r#"{"error":"invalid token"}"#,
                "application/json",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let stage = stage_against(&server).await;
        let err = stage.summarize("text").await.unwrap_err();
        assert!(err.to_string().contains("invalid token"));
    }
}
