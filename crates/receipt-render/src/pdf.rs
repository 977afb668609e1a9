//! # PDF Backend
//!
//! Replays a [`DocumentPlan`] onto a printpdf document.
//!
//! Builtin Helvetica only covers the WinAnsi character set. Text is passed
//! through [`pdf_safe_text`] right before drawing, so a plan that says `₦`
//! prints `NGN ` while the plan itself stays faithful to the settings.

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color as PdfColor, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference,
    Point, Polygon, Rgb,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::debug;

use crate::error::{RenderError, RenderResult};
use crate::layout::{Align, Color, DocumentPlan, DrawCommand, FontStyle, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use crate::metrics::text_width_mm;

const LAYER_NAME: &str = "Layer 1";

/// Currency symbols outside WinAnsi and their printable codes.
const SYMBOL_SUBSTITUTES: &[(char, &str)] = &[
    ('₦', "NGN "),
    ('₵', "GHS "),
    ('₹', "INR "),
    ('₱', "PHP "),
    ('₩', "KRW "),
    ('₽', "RUB "),
    ('₺', "TRY "),
    ('₴', "UAH "),
];

/// Replaces characters the builtin fonts cannot show.
///
/// ASCII and Latin-1 pass through, known currency symbols become their ISO
/// code and anything else becomes `?`.
pub fn pdf_safe_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if (ch as u32) < 0x100 {
            out.push(ch);
        } else if let Some((_, code)) = SYMBOL_SUBSTITUTES.iter().find(|(c, _)| *c == ch) {
            out.push_str(code);
        } else {
            out.push('?');
        }
    }
    out
}

fn pdf_color(color: Color) -> PdfColor {
    PdfColor::Rgb(Rgb::new(
        f32::from(color.r) / 255.0,
        f32::from(color.g) / 255.0,
        f32::from(color.b) / 255.0,
        None,
    ))
}

/// Writes `plan` to `path`, replacing any existing file.
pub fn write_pdf(plan: &DocumentPlan, title: &str, path: &Path) -> RenderResult<()> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;

    let mut layers: Vec<PdfLayerReference> = vec![doc.get_page(first_page).get_layer(first_layer)];
    for _ in 1..plan.page_count {
        let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);
        layers.push(doc.get_page(page).get_layer(layer));
    }

    for command in &plan.commands {
        let layer = layers
            .get(command.page())
            .ok_or_else(|| RenderError::Pdf(format!("page {} out of range", command.page())))?;
        draw(layer, command, &regular, &bold);
    }

    let file = File::create(path).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    doc.save(&mut writer)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;

    debug!(path = %path.display(), pages = plan.page_count, "PDF written");
    Ok(())
}

fn draw(
    layer: &PdfLayerReference,
    command: &DrawCommand,
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
) {
    match command {
        DrawCommand::Text {
            x,
            y,
            size,
            style,
            align,
            color,
            text,
            ..
        } => {
            let text = pdf_safe_text(text);
            let font = match style {
                FontStyle::Regular => regular,
                FontStyle::Bold => bold,
            };
            let x = match align {
                Align::Left => *x,
                Align::Right => *x - text_width_mm(&text, *size, *style),
            };

            layer.set_fill_color(pdf_color(*color));
            layer.use_text(text, *size, Mm(x), Mm(*y), font);
        }
        DrawCommand::Rule { x1, x2, y, color, .. } => {
            layer.set_outline_color(pdf_color(*color));
            layer.add_line(Line {
                points: vec![
                    (Point::new(Mm(*x1), Mm(*y)), false),
                    (Point::new(Mm(*x2), Mm(*y)), false),
                ],
                is_closed: false,
            });
        }
        DrawCommand::Fill {
            x,
            y,
            width,
            height,
            color,
            ..
        } => {
            layer.set_fill_color(pdf_color(*color));
            layer.add_polygon(Polygon {
                rings: vec![vec![
                    (Point::new(Mm(*x), Mm(*y)), false),
                    (Point::new(Mm(*x + *width), Mm(*y)), false),
                    (Point::new(Mm(*x + *width), Mm(*y + *height)), false),
                    (Point::new(Mm(*x), Mm(*y + *height)), false),
                ]],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_safe_text() {
        assert_eq!(pdf_safe_text("₦50,199.99"), "NGN 50,199.99");
        assert_eq!(pdf_safe_text("$12.00"), "$12.00");
        assert_eq!(pdf_safe_text("£5.00 café"), "£5.00 café");
        assert_eq!(pdf_safe_text("日本"), "??");
    }
}
