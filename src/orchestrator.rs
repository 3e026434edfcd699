use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    backend::{BackendError, InferenceBackend},
    chart::{count_digit_groups, detect_kind},
    config::Language,
    models::{ChartConfig, ChartKind},
};

/// A chart the user asked for; data extraction happens separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRequest {
    pub kind: ChartKind,
    pub config: ChartConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub response: String,
    pub chart: Option<ChartRequest>,
    /// Set when the reply text is an advisory for an upstream failure.
    pub failure: Option<&'static str>,
}

impl Analysis {
    fn reply(response: String) -> Self {
        Self {
            response,
            chart: None,
            failure: None,
        }
    }

    fn failed(error: &BackendError, language: Language) -> Self {
        Self {
            response: error.advisory(language),
            chart: None,
            failure: Some(error.kind()),
        }
    }
}

pub struct Orchestrator {
    backend: Arc<dyn InferenceBackend>,
    language: Language,
}

impl Orchestrator {
    pub fn new(backend: Arc<dyn InferenceBackend>, language: Language) -> Self {
        Self { backend, language }
    }

    pub async fn analyze(&self, message: &str) -> Analysis {
        let digit_groups = count_digit_groups(message);
        if digit_groups >= 2 {
            let prompt = self.language.classification_prompt(message);
            let reply = match self.backend.generate(&prompt).await {
                Ok(reply) => reply,
                Err(error) => {
                    warn!(error = %error, "chart classification failed");
                    return Analysis::failed(&error, self.language);
                }
            };

            // A silent model still gets the chart; the fallback text stands in.
            if reply.is_empty() || self.is_affirmative(&reply) {
                let kind = detect_kind(message);
                info!(kind = kind.as_str(), digit_groups, "chart requested");
                let response = if reply.is_empty() {
                    self.language.strings().chart_fallback.to_owned()
                } else {
                    reply
                };
                return Analysis {
                    response,
                    chart: Some(ChartRequest {
                        kind,
                        config: ChartConfig::localized(self.language),
                    }),
                    failure: None,
                };
            }
            debug!(digit_groups, "classification was not affirmative");
        }

        let prompt = self.language.conversation_prompt(message);
        match self.backend.generate(&prompt).await {
            Ok(reply) => Analysis::reply(reply),
            Err(error) => {
                warn!(error = %error, "conversation reply failed");
                Analysis::failed(&error, self.language)
            }
        }
    }

    fn is_affirmative(&self, reply: &str) -> bool {
        let lowered = reply.to_lowercase();
        self.language
            .strings()
            .affirmative
            .iter()
            .any(|marker| lowered.contains(*marker))
    }
}
