//! Turns submitted document content into something a prompt can carry:
//! plain text for text modality, validated base64 for image modality.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use lopdf::Document;

use crate::error::{AppError, Result};

const PDF_MIME: &str = "application/pdf";
const PDF_MAGIC: &[u8] = b"%PDF";

/// Raw submission as it arrived over the wire.
#[derive(Debug, Clone)]
pub enum DocumentContent {
    Text(String),
    Bytes(Vec<u8>),
}

/// Content ready for the prompt assembler.
#[derive(Debug, Clone, PartialEq)]
pub enum PreparedDocument {
    Text(String),
    Image { mime_type: String, data: String },
}

impl PreparedDocument {
    /// Text that the analysis fallback chain may copy into `transcribedText`.
    pub fn source_text(&self) -> Option<&str> {
        match self {
            PreparedDocument::Text(text) => Some(text.as_str()),
            PreparedDocument::Image { .. } => None,
        }
    }
}

pub async fn prepare(content: DocumentContent, is_image: bool, mime_type: &str) -> Result<PreparedDocument> {
    if is_image {
        let data = match content {
            DocumentContent::Text(text) => {
                let payload = strip_data_url(&text).to_string();
                validate_base64(&payload)?;
                payload
            }
            DocumentContent::Bytes(bytes) => STANDARD.encode(bytes),
        };
        return Ok(PreparedDocument::Image {
            mime_type: mime_type.to_string(),
            data,
        });
    }

    let text = match content {
        DocumentContent::Text(text) => text,
        DocumentContent::Bytes(bytes) if mime_type == PDF_MIME || bytes.starts_with(PDF_MAGIC) => {
            tokio::task::spawn_blocking(move || extract_pdf_text(&bytes))
                .await
                .map_err(|e| AppError::DocumentExtraction(format!("task join error: {e}")))??
        }
        DocumentContent::Bytes(bytes) => decode_utf8_dropping_invalid(&bytes),
    };

    Ok(PreparedDocument::Text(strip_control_chars(&text)))
}

/// Extracts every page's text, each under a `--- Page N ---` header.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| AppError::DocumentExtraction(format!("failed to parse PDF: {e}")))?;

    let pages: Vec<String> = doc
        .get_pages()
        .keys()
        .map(|&number| doc.extract_text(&[number]).unwrap_or_default())
        .collect();

    tracing::debug!(page_count = pages.len(), "PDF text extraction complete");
    Ok(join_pages(&pages))
}

pub fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .enumerate()
        .map(|(index, text)| format!("--- Page {} ---\n{}\n", index + 1, text))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Drops a `data:<mime>;base64,` prefix, if any.
pub fn strip_data_url(data: &str) -> &str {
    match data.split_once(',') {
        Some((_, payload)) => payload,
        None => data,
    }
}

pub fn validate_base64(payload: &str) -> Result<()> {
    STANDARD.decode(payload)?;
    Ok(())
}

pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    Ok(STANDARD.decode(strip_data_url(data))?)
}

/// Removes ASCII control characters other than line breaks and tab.
pub fn strip_control_chars(text: &str) -> String {
    text.chars()
        .filter(|&c| matches!(c, '\n' | '\r' | '\t') || !c.is_ascii_control())
        .collect()
}

fn decode_utf8_dropping_invalid(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    fn build_pdf(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let operations = if text.is_empty() {
                Vec::new()
            } else {
                vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![100.into(), 600.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ]
            };
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn pages_are_joined_with_headers_and_trimmed() {
        let joined = join_pages(&["Hello".to_string(), String::new()]);
        assert_eq!(joined, "--- Page 1 ---\nHello\n\n--- Page 2 ---");
    }

    #[test]
    fn no_pages_yields_empty_text() {
        assert_eq!(join_pages(&[]), "");
    }

    #[test]
    fn pdf_bytes_are_extracted_per_page() {
        let bytes = build_pdf(&["Hello", ""]);
        let text = extract_pdf_text(&bytes).unwrap();

        assert!(text.starts_with("--- Page 1 ---\n"), "{text}");
        assert!(text.contains("Hello"), "{text}");
        assert!(text.ends_with("--- Page 2 ---"), "{text}");
    }

    #[test]
    fn garbage_is_not_a_pdf() {
        let err = extract_pdf_text(b"%PDF-not really").unwrap_err();
        assert!(matches!(err, AppError::DocumentExtraction(_)));
    }

    #[test]
    fn data_url_prefix_is_stripped() {
        assert_eq!(strip_data_url("data:image/png;base64,QUJD"), "QUJD");
        assert_eq!(strip_data_url("QUJD"), "QUJD");
    }

    #[test]
    fn only_the_first_comma_splits() {
        assert_eq!(strip_data_url("a,b,c"), "b,c");
    }

    #[test]
    fn invalid_base64_is_rejected() {
        let err = validate_base64("not base64!!").unwrap_err();
        assert!(matches!(err, AppError::InvalidEncoding(_)));
        assert!(validate_base64("QUJD").is_ok());
    }

    #[test]
    fn decode_base64_accepts_data_urls() {
        assert_eq!(decode_base64("data:text/plain;base64,QUJD").unwrap(), b"ABC");
    }

    #[test]
    fn control_chars_are_removed_except_newline_and_tab() {
        let cleaned = strip_control_chars("a\u{0}b\u{7}\tc\nd\u{1b}e\u{7f}");
        assert_eq!(cleaned, "ab\tc\nde");
        assert_eq!(strip_control_chars("a\rb"), "a\rb");
        assert_eq!(
            strip_control_chars("Line one\rLine two\r\nLine three"),
            "Line one\rLine two\r\nLine three"
        );
    }

    #[test]
    fn invalid_utf8_sequences_are_dropped() {
        assert_eq!(decode_utf8_dropping_invalid(b"ok\xffay"), "okay");
    }

    #[tokio::test]
    async fn image_text_content_is_validated_and_inlined() {
        let prepared = prepare(
            DocumentContent::Text("data:image/png;base64,QUJD".to_string()),
            true,
            "image/png",
        )
        .await
        .unwrap();

        assert_eq!(
            prepared,
            PreparedDocument::Image {
                mime_type: "image/png".to_string(),
                data: "QUJD".to_string(),
            }
        );
        assert_eq!(prepared.source_text(), None);
    }

    #[tokio::test]
    async fn image_bytes_are_encoded() {
        let prepared = prepare(DocumentContent::Bytes(b"ABC".to_vec()), true, "image/jpeg")
            .await
            .unwrap();
        assert!(matches!(prepared, PreparedDocument::Image { ref data, .. } if data == "QUJD"));
    }

    #[tokio::test]
    async fn bad_image_payload_fails_with_invalid_encoding() {
        let err = prepare(DocumentContent::Text("@@@".to_string()), true, "image/png")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidEncoding(_)));
    }

    #[tokio::test]
    async fn pdf_magic_is_sniffed_regardless_of_mime() {
        let bytes = build_pdf(&["Hello"]);
        let prepared = prepare(DocumentContent::Bytes(bytes), false, "application/octet-stream")
            .await
            .unwrap();
        let text = prepared.source_text().unwrap();
        assert!(text.starts_with("--- Page 1 ---"));
    }

    #[tokio::test]
    async fn plain_bytes_are_decoded_and_cleaned() {
        let prepared = prepare(DocumentContent::Bytes(b"Form\x00 A-1\n".to_vec()), false, "text/plain")
            .await
            .unwrap();
        assert_eq!(prepared, PreparedDocument::Text("Form A-1\n".to_string()));
    }
}
