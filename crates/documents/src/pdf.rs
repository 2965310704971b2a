//! Materialization: document description → downloadable bytes.

use std::io::BufWriter;

use async_trait::async_trait;
use printpdf::{BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point};

use crate::document::Document;
use crate::error::RenderError;

/// Turns a [`Document`] into an artifact's bytes.
///
/// Implementations may suspend (blocking work belongs on a blocking task) but
/// must not retry on failure.
#[async_trait]
pub trait Materializer: Send + Sync + 'static {
    /// File extension of the produced artifact, without the dot.
    fn extension(&self) -> &'static str;

    fn content_type(&self) -> &'static str;

    async fn materialize(&self, document: &Document) -> Result<Vec<u8>, RenderError>;
}

/// Single-page A4 PDF using the built-in Helvetica faces.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfMaterializer;

#[async_trait]
impl Materializer for PdfMaterializer {
    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn content_type(&self) -> &'static str {
        "application/pdf"
    }

    async fn materialize(&self, document: &Document) -> Result<Vec<u8>, RenderError> {
        let document = document.clone();
        tokio::task::spawn_blocking(move || render_pdf(&document))
            .await
            .map_err(|e| RenderError::Task(e.to_string()))?
    }
}

const MARGIN: f32 = 20.0;
const VALUE_X: f32 = 90.0;
const ROW_STEP: f32 = 7.0;

/// Built-in PDF fonts only cover Windows-1252.
fn check_encodable(document: &Document) -> Result<(), RenderError> {
    for (field, text) in document.texts() {
        if let Some(character) = text.chars().find(|c| !is_win_ansi(*c)) {
            return Err(RenderError::UnsupportedCharacter { field, character });
        }
    }
    Ok(())
}

fn is_win_ansi(c: char) -> bool {
    matches!(c, ' '..='~' | '\u{A0}'..='\u{FF}')
        || matches!(
            c,
            '€' | '‚' | 'ƒ' | '„' | '…' | '†' | '‡' | 'ˆ' | '‰' | 'Š' | '‹' | 'Œ' | 'Ž' | '‘'
                | '’' | '“' | '”' | '•' | '–' | '—' | '˜' | '™' | 'š' | '›' | 'œ' | 'ž' | 'Ÿ'
        )
}

fn push_text(layer: &PdfLayerReference, font: &IndirectFontRef, text: &str, size: f32, x: f32, y: f32) {
    layer.use_text(text, size, Mm(x), Mm(y), font);
}

fn rule(layer: &PdfLayerReference, y: f32, width: f32) {
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(MARGIN), Mm(y)), false),
            (Point::new(Mm(width - MARGIN), Mm(y)), false),
        ],
        is_closed: false,
    });
}

/// Lay the document out on one A4 page and serialize it.
pub fn render_pdf(document: &Document) -> Result<Vec<u8>, RenderError> {
    check_encodable(document)?;

    let (width, height) = document.page_size.dimensions_mm();
    let (doc, page, layer) = PdfDocument::new(&document.title, Mm(width), Mm(height), "Layer 1");
    let layer = doc.get_page(page).get_layer(layer);

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| RenderError::Backend(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| RenderError::Backend(e.to_string()))?;

    let mut y = height - 25.0;
    push_text(&layer, &bold, &document.title, 20.0, MARGIN, y);
    y -= 14.0;

    for section in &document.sections {
        push_text(&layer, &bold, &section.title, 14.0, MARGIN, y);
        y -= 3.0;
        rule(&layer, y, width);
        y -= ROW_STEP;

        for row in &section.rows {
            if row.emphasized {
                y -= 2.0;
                rule(&layer, y + ROW_STEP - 1.0, width);
                push_text(&layer, &bold, &format!("{}:", row.label), 12.0, MARGIN, y);
                push_text(&layer, &bold, &row.value, 13.0, VALUE_X, y);
            } else {
                push_text(&layer, &font, &format!("{}:", row.label), 11.0, MARGIN, y);
                push_text(&layer, &bold, &row.value, 11.0, VALUE_X, y);
            }
            y -= ROW_STEP;
        }
        y -= 8.0;
    }

    push_text(&layer, &font, &document.footer.text, 9.0, MARGIN, 15.0);

    let mut writer = BufWriter::new(Vec::<u8>::new());
    doc.save(&mut writer)
        .map_err(|e| RenderError::Backend(e.to_string()))?;
    writer
        .into_inner()
        .map_err(|e| RenderError::Backend(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentRenderer;
    use taag_billing::{BrandBillingRecord, CreatorPayoutRecord, InvoiceSummary, samples};

    fn document_for(company: &str) -> Document {
        let brand = BrandBillingRecord::parse(&samples::brand_input().with("companyName", company)).unwrap();
        let creator = CreatorPayoutRecord::parse(&samples::creator_input()).unwrap();
        let summary = InvoiceSummary::compute(&brand);
        DocumentRenderer::default().render(&brand, &creator, &summary)
    }

    #[test]
    fn renders_a_pdf() {
        let bytes = render_pdf(&document_for("Acme Corporation")).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn latin_1_text_is_accepted() {
        assert!(render_pdf(&document_for("Café Société")).is_ok());
    }

    #[test]
    fn non_latin_text_is_a_render_error() {
        let err = render_pdf(&document_for("टाग मीडिया")).unwrap_err();
        match err {
            RenderError::UnsupportedCharacter { field, character } => {
                assert_eq!(field, "Company Name");
                assert_eq!(character, 'ट');
            }
            other => panic!("expected UnsupportedCharacter, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn materializer_runs_on_blocking_pool() {
        let bytes = PdfMaterializer
            .materialize(&document_for("Acme Corporation"))
            .await
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(PdfMaterializer.extension(), "pdf");
    }
}
