//! Instruction text for each capability and the request shapes built from it.

use crate::document::PreparedDocument;
use crate::llm::ModelRequest;

const SIMPLIFY_CONTEXT_CHARS: usize = 1000;

pub const ANALYSIS_INSTRUCTIONS: &str = "You are an expert in simplifying bureaucratic, legal, and government forms.\n\
Analyze the following document content.\n\n\
Tasks:\n\
1. Summarize all content of the document touching key points to note.\n\
2. Provide a clear, 'Plain English' summary of the document's main purpose using language that could be understood by a 5th grader or non-native speaker, no long or complex wording.\n\
3. List the key requirements or action items for the user (e.g., 'File at DPS Building', 'Bring birth certificate to file'). Return 0-5 requirements as necessary.\n\n\
Return the response in JSON format with this exact schema:\n\
{\n  \"purpose\": string,\n  \"summary\": string,\n  \"transcribedText\": string,\n  \"requirements\": string[]\n}\n";

pub const SIMPLIFY_SCHEMA: &str = "Return the response in JSON with this exact schema:\n\
{\n  \"explanation\": string,\n  \"keyTerms\": string[]\n}";

pub const NEXT_STEPS_INSTRUCTIONS: &str = "You help people after they fill out legal or government forms. \
Read the form context and write the next steps for the person now that they have completed the form. \
Use very simple, 5th-grade language. Keep each step short and clear. \
Return 3 to 7 steps as a JSON array.\n\n\
Return the response in JSON with this exact schema:\n\
{\n  \"steps\": string[]\n}";

pub const IMPORTANT_INFO_INSTRUCTIONS: &str = "You extract critical information from government or legal documents. \
Read the document and return only the most important details.\n\n\
Return JSON with these lists:\n\
- deadlines: date/time limits or due dates\n\
- notices: warnings, penalties, consequences, or required notices\n\
- rules: eligibility rules, conditions, or requirements\n\
- other: other critical facts (contact info, locations, fees)\n\n\
Return the response in JSON with this exact schema:\n\
{\n  \"deadlines\": string[],\n  \"notices\": string[],\n  \"rules\": string[],\n  \"other\": string[]\n}";

pub const CHAT_INSTRUCTIONS: &str = "You are an expert assistant for government/legal documents. \
Answer the user's question using ONLY the provided document context. \
If the answer is not present, say you don't have enough information. \
Keep the answer concise and in plain language.\n\n\
Return JSON with this exact schema:\n\
{\n  \"answer\": string\n}";

pub fn analysis(document: &PreparedDocument) -> ModelRequest {
    match document {
        PreparedDocument::Image { mime_type, data } => ModelRequest::Inline {
            mime_type: mime_type.clone(),
            data: data.clone(),
            instruction: ANALYSIS_INSTRUCTIONS.to_string(),
        },
        PreparedDocument::Text(text) => {
            ModelRequest::Text(format!("{ANALYSIS_INSTRUCTIONS}\n\nDOCUMENT CONTENT:\n{text}"))
        }
    }
}

pub fn simplify(selected_text: &str, document_context: &str) -> ModelRequest {
    let context: String = document_context.chars().take(SIMPLIFY_CONTEXT_CHARS).collect();
    ModelRequest::Text(format!(
        "The user is reading a bureaucratic document and is confused by this specific text: \"{selected_text}\".\n\n\
Context of the document:\n\
{context}... (truncated for brevity)\n\n\
Task:\n\
1. Explain the selected text in extremely simple, 'Plain English' terms \
(like you are explaining to a 5-year-old or non-native speaker).\n\
2. Identify 1-3 specific legal/complex terms in the selection and define them simply.\n\n\
{SIMPLIFY_SCHEMA}"
    ))
}

pub fn translate(text: &str, target_language: &str) -> ModelRequest {
    ModelRequest::Text(format!(
        "You are a professional translator. Translate the input text from English to {target_language}.\n\n\
Return the response in JSON with this exact schema:\n\
{{\n  \"translatedText\": string\n}}\n\n\
INPUT TEXT:\n{text}"
    ))
}

pub fn next_steps(form_context: &str) -> ModelRequest {
    ModelRequest::Text(format!("{NEXT_STEPS_INSTRUCTIONS}\n\nFORM CONTEXT:\n{form_context}"))
}

pub fn draft_response(document_type: &str, document_context: &str, language: &str) -> ModelRequest {
    ModelRequest::Text(format!(
        "You are a helpful legal aid assistant. Draft a concise response letter based on the \
document type and the provided context. Use a polite, professional tone and plain language. \
If key details are missing (names, dates, addresses), insert short placeholders like \
[Your Name] or [Date]. Keep the response focused on next steps or an appeal.\n\n\
Document type: {document_type}\n\
Language: {language}\n\n\
Return the response in JSON with this exact schema:\n\
{{\n  \"draft\": string\n}}\n\n\
DOCUMENT CONTEXT:\n{document_context}"
    ))
}

pub fn important_info(document_context: &str) -> ModelRequest {
    ModelRequest::Text(format!("{IMPORTANT_INFO_INSTRUCTIONS}\n\nDOCUMENT CONTEXT:\n{document_context}"))
}

pub fn chat(question: &str, document_context: &str) -> ModelRequest {
    ModelRequest::Text(format!(
        "{CHAT_INSTRUCTIONS}\n\nDOCUMENT CONTEXT:\n{document_context}\n\nUSER QUESTION:\n{question}"
    ))
}
