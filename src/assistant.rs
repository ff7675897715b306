//! One pipeline per capability: assemble the prompt, call the model once,
//! recover the JSON reply and normalize it. Nothing is retried.

use crate::document::{self, DocumentContent};
use crate::error::Result;
use crate::llm::reply::{extract_json_object, ReplyObject};
use crate::llm::{GeminiClient, ModelRequest};
use crate::normalize::{self, fields, DocumentAnalysis, ImportantInfo, SimplifyResult};
use crate::prompts;

/// One document submission.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub content: DocumentContent,
    pub is_image: bool,
    pub mime_type: String,
}

#[derive(Clone)]
pub struct DocumentAssistant {
    model: GeminiClient,
}

impl DocumentAssistant {
    pub fn new(model: GeminiClient) -> Self {
        Self { model }
    }

    async fn ask(&self, request: ModelRequest, model: Option<&str>) -> Result<ReplyObject> {
        let raw = self.model.generate_json(&request, model).await?;
        extract_json_object(&raw)
    }

    #[tracing::instrument(skip(self, request), fields(is_image = request.is_image, mime_type = %request.mime_type))]
    pub async fn analyze(&self, request: AnalysisRequest, model: Option<&str>) -> Result<DocumentAnalysis> {
        let prepared = document::prepare(request.content, request.is_image, &request.mime_type).await?;
        let reply = self.ask(prompts::analysis(&prepared), model).await?;
        let analysis = DocumentAnalysis::from_reply(&reply, prepared.source_text());
        tracing::info!(requirements = analysis.requirements.len(), "document analyzed");
        Ok(analysis)
    }

    #[tracing::instrument(skip_all)]
    pub async fn simplify(
        &self,
        selected_text: &str,
        document_context: &str,
        model: Option<&str>,
    ) -> Result<SimplifyResult> {
        let reply = self.ask(prompts::simplify(selected_text, document_context), model).await?;
        Ok(SimplifyResult::from_reply(&reply))
    }

    #[tracing::instrument(skip(self, text))]
    pub async fn translate(&self, text: &str, target_language: &str) -> Result<String> {
        let reply = self.ask(prompts::translate(text, target_language), None).await?;
        normalize::required_text(&reply, fields::TRANSLATED_TEXT, "Translation not returned")
    }

    #[tracing::instrument(skip_all)]
    pub async fn next_steps(&self, form_context: &str) -> Result<Vec<String>> {
        let reply = self.ask(prompts::next_steps(form_context), None).await?;
        normalize::next_steps(&reply)
    }

    #[tracing::instrument(skip(self, document_context))]
    pub async fn draft_response(
        &self,
        document_type: &str,
        document_context: &str,
        language: &str,
    ) -> Result<String> {
        let request = prompts::draft_response(document_type, document_context, language);
        let reply = self.ask(request, None).await?;
        normalize::required_text(&reply, fields::DRAFT, "Draft response not returned")
    }

    #[tracing::instrument(skip_all)]
    pub async fn important_info(&self, document_context: &str) -> Result<ImportantInfo> {
        let reply = self.ask(prompts::important_info(document_context), None).await?;
        Ok(ImportantInfo::from_reply(&reply))
    }

    #[tracing::instrument(skip_all)]
    pub async fn chat(&self, question: &str, document_context: &str) -> Result<String> {
        let reply = self.ask(prompts::chat(question, document_context), None).await?;
        normalize::required_text(&reply, fields::ANSWER, "Answer not returned")
    }
}
