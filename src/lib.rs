pub mod api;
pub mod assistant;
pub mod config;
pub mod document;
pub mod error;
pub mod llm;
pub mod normalize;
pub mod prompts;
pub mod speech;

use std::sync::Arc;
use assistant::DocumentAssistant;
use config::Config;
use llm::GeminiClient;
use speech::SpeechClient;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub assistant: DocumentAssistant,
    pub speech: SpeechClient,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let assistant = DocumentAssistant::new(GeminiClient::new(config.gemini.clone()));
        let speech = SpeechClient::new(config.speech.clone());
        Self {
            config: Arc::new(config),
            assistant,
            speech,
        }
    }
}
