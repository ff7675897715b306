use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::assistant::AnalysisRequest;
use crate::document::{self, DocumentContent};
use crate::error::Result;
use crate::speech::{SpeechRequest, DEFAULT_MODEL_ID, DEFAULT_OUTPUT_FORMAT};

fn default_mime_type() -> String {
    "text/plain".to_string()
}

fn default_language() -> String {
    "English".to_string()
}

fn default_model_id() -> String {
    DEFAULT_MODEL_ID.to_string()
}

fn default_output_format() -> String {
    DEFAULT_OUTPUT_FORMAT.to_string()
}

#[derive(Debug, Deserialize, Validate)]
pub struct AnalyzeRequest {
    #[serde(alias = "fileContent")]
    #[validate(length(min = 1))]
    pub file_content: String,
    #[serde(default, alias = "isImage")]
    pub is_image: bool,
    #[serde(default = "default_mime_type", alias = "mimeType")]
    pub mime_type: String,
    #[serde(default, alias = "isBase64")]
    pub is_base64: bool,
}

impl AnalyzeRequest {
    /// Base64 text submissions are decoded up front; image payloads stay
    /// encoded and are validated by the preprocessor.
    pub fn into_analysis_request(self) -> Result<AnalysisRequest> {
        let content = if self.is_base64 && !self.is_image {
            DocumentContent::Bytes(document::decode_base64(&self.file_content)?)
        } else {
            DocumentContent::Text(self.file_content)
        };

        Ok(AnalysisRequest {
            content,
            is_image: self.is_image,
            mime_type: self.mime_type,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub model: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SimplifyRequest {
    #[serde(alias = "selectedText")]
    #[validate(length(min = 1))]
    pub selected_text: String,
    #[serde(alias = "documentContext")]
    #[validate(length(min = 1))]
    pub document_context: String,
    pub model: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TranslateRequest {
    #[validate(length(min = 1))]
    pub text: String,
    #[serde(alias = "targetLanguage")]
    #[validate(length(min = 1))]
    pub target_language: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateResponse {
    pub translated_text: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NextStepsRequest {
    #[serde(alias = "formContext")]
    #[validate(length(min = 1))]
    pub form_context: String,
}

#[derive(Debug, Serialize)]
pub struct NextStepsResponse {
    pub steps: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DraftRequest {
    #[serde(alias = "documentType")]
    #[validate(length(min = 1))]
    pub document_type: String,
    #[serde(alias = "documentContext")]
    #[validate(length(min = 1))]
    pub document_context: String,
    #[serde(default = "default_language")]
    #[validate(length(min = 1))]
    pub language: String,
}

#[derive(Debug, Serialize)]
pub struct DraftResponse {
    pub draft: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ImportantInfoRequest {
    #[serde(alias = "documentContext")]
    #[validate(length(min = 1))]
    pub document_context: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1))]
    pub question: String,
    #[serde(alias = "documentContext")]
    #[validate(length(min = 1))]
    pub document_context: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TtsRequest {
    #[validate(length(min = 1))]
    pub text: String,
    #[serde(default = "default_model_id", alias = "modelId")]
    pub model_id: String,
    #[serde(default = "default_output_format", alias = "outputFormat")]
    pub output_format: String,
}

impl From<TtsRequest> for SpeechRequest {
    fn from(req: TtsRequest) -> Self {
        SpeechRequest {
            text: req.text,
            model_id: req.model_id,
            output_format: req.output_format,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
