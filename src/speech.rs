use reqwest::Client;
use serde::Serialize;

use crate::config::SpeechConfig;
use crate::error::{AppError, Result};

pub const DEFAULT_MODEL_ID: &str = "eleven_multilingual_v2";
pub const DEFAULT_OUTPUT_FORMAT: &str = "mp3_44100_128";
pub const AUDIO_MEDIA_TYPE: &str = "audio/mpeg";

#[derive(Debug, Clone)]
pub struct SpeechRequest {
    pub text: String,
    pub model_id: String,
    pub output_format: String,
}

/// Synthesized audio, always a single buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    pub media_type: &'static str,
}

#[derive(Serialize)]
struct ConvertBody<'a> {
    text: &'a str,
    model_id: &'a str,
}

#[derive(Clone)]
pub struct SpeechClient {
    http: Client,
    config: SpeechConfig,
}

impl SpeechClient {
    pub fn new(config: SpeechConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Runs the upstream call on its own task and waits for it; there is no
    /// cancellation once issued.
    pub async fn synthesize(&self, request: SpeechRequest) -> Result<AudioClip> {
        let client = self.clone();
        tokio::spawn(async move { client.convert(&request).await })
            .await
            .map_err(|e| AppError::UpstreamCallFailed(format!("TTS worker failed: {e}")))?
    }

    #[tracing::instrument(skip(self, request), fields(voice_id = %self.config.voice_id, model_id = %request.model_id))]
    async fn convert(&self, request: &SpeechRequest) -> Result<AudioClip> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(AppError::MissingCredential("ELEVENLABS_API_KEY"))?;
        let url = format!(
            "{}/text-to-speech/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.voice_id
        );

        let res = self
            .http
            .post(url)
            .query(&[("output_format", request.output_format.as_str())])
            .header("xi-api-key", api_key)
            .json(&ConvertBody {
                text: &request.text,
                model_id: &request.model_id,
            })
            .send()
            .await
            .map_err(|e| AppError::UpstreamCallFailed(format!("TTS request failed: {e}")))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            tracing::warn!(%status, "speech synthesis rejected");
            return Err(AppError::UpstreamCallFailed(format!(
                "TTS request failed: {} {}",
                status.as_u16(),
                body.trim()
            )));
        }

        let bytes = res.bytes().await?.to_vec();
        if bytes.is_empty() {
            return Err(AppError::EmptyUpstreamReply("Empty audio from speech service".to_string()));
        }

        tracing::debug!(audio_bytes = bytes.len(), "speech synthesized");
        Ok(AudioClip {
            bytes,
            media_type: AUDIO_MEDIA_TYPE,
        })
    }
}
