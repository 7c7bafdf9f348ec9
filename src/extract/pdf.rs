//! Plain-text and link extraction from registry PDFs via `lopdf`.

use lopdf::{Dictionary, Document, Object};

use crate::error::Result;

/// Text content and metadata pulled out of a PDF.
#[derive(Debug, Clone, Default)]
pub struct PdfText {
    /// Page texts joined in page order.
    pub text: String,
    pub page_count: usize,
    /// `URI` targets of link actions anywhere in the document.
    pub external_links: Vec<String>,
}

/// Load a PDF from memory and extract its text and external links.
///
/// Pages whose text cannot be decoded are skipped with a warning.
pub fn read_document(bytes: &[u8]) -> Result<PdfText> {
    let doc = Document::load_mem(bytes)?;
    let pages = doc.get_pages();

    let mut text = String::new();
    for page_number in pages.keys() {
        match doc.extract_text(&[*page_number]) {
            Ok(page_text) => {
                text.push_str(&page_text);
                if !page_text.ends_with('\n') {
                    text.push('\n');
                }
            }
            Err(e) => log::warn!("Skipping page {} of registry PDF: {}", page_number, e),
        }
    }

    let mut external_links = Vec::new();
    for object in doc.objects.values() {
        collect_uris(object, &mut external_links);
    }

    log::debug!(
        "Read registry PDF: {} pages, {} chars, {} links",
        pages.len(),
        text.len(),
        external_links.len()
    );

    Ok(PdfText {
        text,
        page_count: pages.len(),
        external_links,
    })
}

fn collect_uris(object: &Object, out: &mut Vec<String>) {
    match object {
        Object::Dictionary(dict) => collect_from_dict(dict, out),
        Object::Stream(stream) => collect_from_dict(&stream.dict, out),
        Object::Array(items) => {
            for item in items {
                collect_uris(item, out);
            }
        }
        _ => {}
    }
}

fn collect_from_dict(dict: &Dictionary, out: &mut Vec<String>) {
    if let Ok(Object::String(bytes, _)) = dict.get(b"URI") {
        let uri = String::from_utf8_lossy(bytes).into_owned();
        if !out.contains(&uri) {
            out.push(uri);
        }
    }
    for (_, value) in dict.iter() {
        match value {
            Object::Dictionary(_) | Object::Array(_) => collect_uris(value, out),
            _ => {}
        }
    }
}
