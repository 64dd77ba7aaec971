//! Content negotiation after the fact.
//!
//! The backend does not reliably declare what it sends, so classification
//! degrades from the declared content type to sniffing the payload itself.

use serde::{Deserialize, Serialize};

use crate::constants::wire;
use crate::fetch::{FetchResult, mime_essence};

/// How the shell should present a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderKind {
    /// Drawn by the shell itself; always transformed by pan/zoom
    Image,
    /// Handed to an embedded frame (PDF viewer, external page)
    EmbeddableDocument,
    /// Shown as a "preview not available" placeholder
    Unsupported,
}

impl RenderKind {
    /// Whether the pan/zoom transform applies to this kind.
    ///
    /// Native embedded viewers manage their own zoom, so embedded documents
    /// only follow the transform when the policy asks for it.
    pub fn applies_transform(&self, policy: &TransformPolicy) -> bool {
        match self {
            RenderKind::Image => true,
            RenderKind::EmbeddableDocument => policy.transform_embedded_documents,
            RenderKind::Unsupported => false,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RenderKind::Image => "image",
            RenderKind::EmbeddableDocument => "embedded document",
            RenderKind::Unsupported => "unsupported",
        }
    }
}

/// Which render kinds follow the pan/zoom transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransformPolicy {
    /// Apply pan/zoom to embedded documents too
    #[serde(default)]
    pub transform_embedded_documents: bool,
}

/// Where the content to render lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    /// Externally hosted; never acquired or released locally
    External(String),
    /// Bytes that need a local resource handle
    Payload { data: Vec<u8>, mime: String },
}

impl ContentSource {
    pub fn is_external(&self) -> bool {
        matches!(self, ContentSource::External(_))
    }
}

/// A classified, renderable document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedDocument {
    pub kind: RenderKind,
    pub source: ContentSource,
}

/// Decides a [`RenderKind`] from declared and sniffed content types.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentClassifier {
    /// Recognize image payloads by their magic bytes when the declared type is useless
    sniff_image_signatures: bool,
}

impl ContentClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable magic-byte image detection.
    pub fn with_image_sniffing(mut self, enabled: bool) -> Self {
        self.sniff_image_signatures = enabled;
        self
    }

    /// Render kind of a fetch result. Failures classify as `Unsupported`.
    pub fn classify(&self, result: &FetchResult) -> RenderKind {
        match result {
            FetchResult::JsonUrl { .. } => RenderKind::EmbeddableDocument,
            FetchResult::BinaryPayload {
                data,
                declared_mime_type,
            } => self.classify_payload(data, declared_mime_type).0,
            FetchResult::Failure(_) => RenderKind::Unsupported,
        }
    }

    /// Classify and keep the content, ready for the lifecycle manager.
    ///
    /// Returns `None` for failures.
    pub fn resolve(&self, result: FetchResult) -> Option<ClassifiedDocument> {
        match result {
            FetchResult::JsonUrl { url } => Some(ClassifiedDocument {
                kind: RenderKind::EmbeddableDocument,
                source: ContentSource::External(url),
            }),
            FetchResult::BinaryPayload {
                data,
                declared_mime_type,
            } => {
                let (kind, text_url) = self.classify_payload(&data, &declared_mime_type);
                let source = match text_url {
                    Some(url) => ContentSource::External(url),
                    None => ContentSource::Payload {
                        data,
                        mime: declared_mime_type,
                    },
                };
                Some(ClassifiedDocument { kind, source })
            }
            FetchResult::Failure(_) => None,
        }
    }

    /// Kind of a binary payload, plus the URL when the body turned out to be one.
    fn classify_payload(&self, data: &[u8], declared_mime_type: &str) -> (RenderKind, Option<String>) {
        let mime = mime_essence(declared_mime_type);
        if mime.starts_with("image/") {
            return (RenderKind::Image, None);
        }
        if mime == wire::PDF_MIME {
            return (RenderKind::EmbeddableDocument, None);
        }

        if self.sniff_image_signatures && image::guess_format(data).is_ok() {
            log::debug!("Payload declared as '{}' sniffed as image", declared_mime_type);
            return (RenderKind::Image, None);
        }

        match text_url(data) {
            Some(url) => {
                log::debug!("Payload declared as '{}' is a URL string", declared_mime_type);
                (RenderKind::EmbeddableDocument, Some(url))
            }
            None => (RenderKind::Unsupported, None),
        }
    }
}

/// The payload as a URL string, if it is UTF-8 text starting with `http`.
fn text_url(data: &[u8]) -> Option<String> {
    let text = std::str::from_utf8(data).ok()?.trim();
    text.starts_with("http").then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchFailure;
    use crate::test_support::PNG_BYTES;

    fn payload(mime: &str, data: &[u8]) -> FetchResult {
        FetchResult::BinaryPayload {
            data: data.to_vec(),
            declared_mime_type: mime.to_string(),
        }
    }

    #[test]
    fn test_json_url_is_embeddable() {
        let classifier = ContentClassifier::new();
        let result = FetchResult::JsonUrl {
            url: "https://files/a.pdf".to_string(),
        };
        assert_eq!(classifier.classify(&result), RenderKind::EmbeddableDocument);
    }

    #[test]
    fn test_declared_types() {
        let classifier = ContentClassifier::new();
        assert_eq!(classifier.classify(&payload("image/png", PNG_BYTES)), RenderKind::Image);
        assert_eq!(classifier.classify(&payload("image/jpeg", b"..")), RenderKind::Image);
        assert_eq!(
            classifier.classify(&payload("application/pdf", b"%PDF-1.7")),
            RenderKind::EmbeddableDocument
        );
        assert_eq!(
            classifier.classify(&payload("Application/PDF; name=claim.pdf", b"%PDF-1.7")),
            RenderKind::EmbeddableDocument
        );
    }

    #[test]
    fn test_untyped_url_text_is_embeddable() {
        let classifier = ContentClassifier::new();
        assert_eq!(
            classifier.classify(&payload("", b"https://x/y")),
            RenderKind::EmbeddableDocument
        );
        assert_eq!(
            classifier.classify(&payload("text/plain", b"  http://x/y\n")),
            RenderKind::EmbeddableDocument
        );
    }

    #[test]
    fn test_untyped_binary_is_unsupported() {
        let classifier = ContentClassifier::new();
        assert_eq!(
            classifier.classify(&payload("", &[0xff, 0xfe, 0x00, 0x81])),
            RenderKind::Unsupported
        );
        assert_eq!(
            classifier.classify(&payload("application/octet-stream", b"plain words")),
            RenderKind::Unsupported
        );
    }

    #[test]
    fn test_failure_is_unsupported() {
        let classifier = ContentClassifier::new();
        let result = FetchResult::Failure(FetchFailure::NoUrlInResponse);
        assert_eq!(classifier.classify(&result), RenderKind::Unsupported);
        assert!(classifier.resolve(result).is_none());
    }

    #[test]
    fn test_sniffing_is_opt_in() {
        let plain = ContentClassifier::new();
        let sniffing = ContentClassifier::new().with_image_sniffing(true);
        let untyped_png = payload("application/octet-stream", PNG_BYTES);

        assert_eq!(plain.classify(&untyped_png), RenderKind::Unsupported);
        assert_eq!(sniffing.classify(&untyped_png), RenderKind::Image);
    }

    #[test]
    fn test_resolve_text_url_is_external() {
        let doc = ContentClassifier::new()
            .resolve(payload("", b"https://files/e.pdf"))
            .unwrap();
        assert_eq!(doc.kind, RenderKind::EmbeddableDocument);
        assert_eq!(doc.source, ContentSource::External("https://files/e.pdf".to_string()));
    }

    #[test]
    fn test_resolve_pdf_bytes_is_payload() {
        let doc = ContentClassifier::new()
            .resolve(payload("application/pdf", b"%PDF-1.7"))
            .unwrap();
        assert_eq!(doc.kind, RenderKind::EmbeddableDocument);
        assert!(!doc.source.is_external());
    }

    #[test]
    fn test_transform_policy() {
        let default_policy = TransformPolicy::default();
        let embedded_too = TransformPolicy {
            transform_embedded_documents: true,
        };

        assert!(RenderKind::Image.applies_transform(&default_policy));
        assert!(!RenderKind::EmbeddableDocument.applies_transform(&default_policy));
        assert!(RenderKind::EmbeddableDocument.applies_transform(&embedded_too));
        assert!(!RenderKind::Unsupported.applies_transform(&embedded_too));
    }
}
