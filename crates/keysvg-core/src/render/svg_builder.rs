// Keysvg Renderer - SVG Builder
// Accumulates elements and produces the final document

use crate::config::TextStyle;

const XML_DECLARATION: &str = r#"<?xml version="1.0"?>"#;

pub(super) struct SvgBuilder {
    elements: Vec<String>,
    width: f64,
    height: f64,
}

impl SvgBuilder {
    pub(super) fn new(width: f64, height: f64) -> Self {
        Self {
            elements: Vec::new(),
            width,
            height,
        }
    }

    pub(super) fn len(&self) -> usize {
        self.elements.len()
    }

    pub(super) fn build(self) -> String {
        let mut svg = format!(
            r#"{}<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" viewBox="0 0 {} {}">"#,
            XML_DECLARATION,
            format_coord(self.width),
            format_coord(self.height)
        );
        for el in &self.elements {
            svg.push_str(el);
        }
        svg.push_str("</svg>");
        svg
    }

    pub(super) fn text(&mut self, x: f64, y: f64, content: &str, style: &TextStyle) {
        self.elements.push(format!(
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}" fill="{}">{}</text>"#,
            format_coord(x),
            format_coord(y),
            escape(&style.font_family),
            format_coord(style.font_size),
            escape(&style.fill),
            escape(content)
        ));
    }
}

fn escape(content: &str) -> String {
    content
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Shortest decimal form with at most four fractional digits (`11`, `44.5`)
fn format_coord(value: f64) -> String {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    let text = format!("{:.4}", rounded);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}
