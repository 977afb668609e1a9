//! # Layout
//!
//! Turns a receipt into a [`DocumentPlan`]: every string, rule and shaded
//! band with its page and position, computed without touching a file.
//!
//! ## Page Geometry (A4 portrait, millimetres, origin bottom-left)
//! ```text
//!  0                                                               210
//!  ┌─────────────────────────────────────────────────────────────────┐ 297
//!  │     20 ◄─ margin                                 margin ─► 190  │
//!  │      ┌── TOP (277) ─────────────────────────────────────────┐   │
//!  │      │ Organization name                                    │   │
//!  │      │ address / contact                                    │   │
//!  │      │ ──────────────────────────────────────────────────── │   │
//!  │      │ Payment Receipt                    Receipt No: ...   │   │
//!  │      │                                         Date: ...    │   │
//!  │      │ Payer Information / Name / Class / Department        │   │
//!  │      │ ▓▓ Item ▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓ Amount ▓▓ │   │
//!  │      │ row                                          amount  │   │
//!  │      │ ...                                                  │   │
//!  │      ├── PAGE_BREAK (35): a row starting at or below here   │   │
//!  │      │   moves to the next page                              │   │
//!  │      │ Total                                         total  │   │
//!  │      │ footer                                               │   │
//!  └─────────────────────────────────────────────────────────────────┘ 0
//! ```

use receipt_core::{Money, Receipt, Settings};

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 20.0;
pub const TOP_MM: f32 = PAGE_HEIGHT_MM - MARGIN_MM;
pub const RIGHT_MM: f32 = PAGE_WIDTH_MM - MARGIN_MM;

/// A row whose baseline would sit at or below this starts a new page.
pub const PAGE_BREAK_MM: f32 = 35.0;

/// Vertical distance between item rows.
pub const ROW_HEIGHT_MM: f32 = 7.0;

/// Horizontal inset of table text inside the band (4 pt).
pub const CELL_INSET_MM: f32 = 4.0 * 25.4 / 72.0;

const HEADER_BAND_HEIGHT_MM: f32 = 8.0;

// =============================================================================
// Draw Commands
// =============================================================================

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Builds a colour from `0xRRGGBB`.
    pub const fn hex(rgb: u32) -> Self {
        Color {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
        }
    }
}

pub const INK: Color = Color::hex(0x0f172a);
pub const MUTED: Color = Color::hex(0x334155);
pub const DIVIDER: Color = Color::hex(0xcbd5e1);
pub const BAND: Color = Color::hex(0xe2e8f0);
pub const ROW_TEXT: Color = Color::hex(0x111827);
pub const ROW_RULE: Color = Color::hex(0xe5e7eb);
pub const FOOTER: Color = Color::hex(0x475569);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
}

/// Horizontal anchor of a text command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// `x` is where the text starts.
    Left,
    /// `x` is where the text ends.
    Right,
}

/// One drawing operation on one page.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Text {
        page: usize,
        x: f32,
        y: f32,
        size: f32,
        style: FontStyle,
        align: Align,
        color: Color,
        text: String,
    },
    /// Horizontal line from `x1` to `x2` at height `y`.
    Rule {
        page: usize,
        x1: f32,
        x2: f32,
        y: f32,
        color: Color,
    },
    /// Filled rectangle with its lower-left corner at (`x`, `y`).
    Fill {
        page: usize,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
}

impl DrawCommand {
    /// 0-based page the command is drawn on.
    pub fn page(&self) -> usize {
        match self {
            DrawCommand::Text { page, .. }
            | DrawCommand::Rule { page, .. }
            | DrawCommand::Fill { page, .. } => *page,
        }
    }

    /// The text of a `Text` command.
    pub fn text(&self) -> Option<&str> {
        match self {
            DrawCommand::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// The full, ordered drawing of a receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentPlan {
    pub page_count: usize,
    pub commands: Vec<DrawCommand>,
}

impl DocumentPlan {
    /// Commands drawn on `page`, in order.
    pub fn page(&self, page: usize) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(move |c| c.page() == page)
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// Where a row's baseline lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowSlot {
    pub page: usize,
    pub y: f32,
}

/// Places rows of the given heights top to bottom, starting a new page
/// whenever the cursor has reached [`PAGE_BREAK_MM`].
///
/// Rows are never split. Clone the iterator to lay out the same rows again.
#[derive(Debug, Clone)]
pub struct Paginate<I> {
    heights: I,
    page: usize,
    cursor: f32,
}

impl<I> Paginate<I> {
    /// Page and cursor after the rows yielded so far.
    pub fn position(&self) -> RowSlot {
        RowSlot {
            page: self.page,
            y: self.cursor,
        }
    }
}

impl<I: Iterator<Item = f32>> Iterator for Paginate<I> {
    type Item = RowSlot;

    fn next(&mut self) -> Option<RowSlot> {
        let height = self.heights.next()?;

        if self.cursor <= PAGE_BREAK_MM {
            self.page += 1;
            self.cursor = TOP_MM;
        }

        let slot = RowSlot {
            page: self.page,
            y: self.cursor,
        };
        self.cursor -= height;
        Some(slot)
    }
}

/// Starts paginating `heights` from `start`.
///
/// ## Example
/// ```rust
/// use receipt_render::layout::{paginate, RowSlot, TOP_MM};
///
/// let slots: Vec<RowSlot> = paginate([7.0, 7.0], RowSlot { page: 0, y: 40.0 }).collect();
/// assert_eq!(slots[0], RowSlot { page: 0, y: 40.0 });
/// assert_eq!(slots[1], RowSlot { page: 1, y: TOP_MM });
/// ```
pub fn paginate<H>(heights: H, start: RowSlot) -> Paginate<H::IntoIter>
where
    H: IntoIterator<Item = f32>,
{
    Paginate {
        heights: heights.into_iter(),
        page: start.page,
        cursor: start.y,
    }
}

// =============================================================================
// Plan
// =============================================================================

/// Accumulates commands while tracking the current page.
struct Canvas {
    page: usize,
    commands: Vec<DrawCommand>,
}

impl Canvas {
    #[allow(clippy::too_many_arguments)]
    fn text(
        &mut self,
        x: f32,
        y: f32,
        size: f32,
        style: FontStyle,
        align: Align,
        color: Color,
        text: impl Into<String>,
    ) {
        self.commands.push(DrawCommand::Text {
            page: self.page,
            x,
            y,
            size,
            style,
            align,
            color,
            text: text.into(),
        });
    }

    fn rule(&mut self, y: f32, color: Color) {
        self.commands.push(DrawCommand::Rule {
            page: self.page,
            x1: MARGIN_MM,
            x2: RIGHT_MM,
            y,
            color,
        });
    }

    fn fill(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.commands.push(DrawCommand::Fill {
            page: self.page,
            x,
            y,
            width,
            height,
            color,
        });
    }
}

/// Lays out `receipt` with the organization details from `settings`.
///
/// Pure and deterministic: the date printed is the stored `created_at`, the
/// total is the stored `total_cents`.
pub fn plan(receipt: &Receipt, settings: &Settings) -> DocumentPlan {
    use Align::{Left, Right};
    use FontStyle::{Bold, Regular};

    let symbol = settings.currency_symbol.as_str();
    let mut canvas = Canvas {
        page: 0,
        commands: Vec::new(),
    };
    let mut y = TOP_MM;

    // Header
    canvas.text(MARGIN_MM, y, 18.0, Bold, Left, INK, &settings.organization_name);
    y -= 8.0;
    if !settings.organization_address.is_empty() {
        canvas.text(MARGIN_MM, y, 10.0, Regular, Left, MUTED, &settings.organization_address);
        y -= 5.0;
    }
    if !settings.organization_contact.is_empty() {
        canvas.text(MARGIN_MM, y, 10.0, Regular, Left, MUTED, &settings.organization_contact);
        y -= 7.0;
    }
    canvas.rule(y, DIVIDER);
    y -= 10.0;

    // Metadata
    canvas.text(MARGIN_MM, y, 14.0, Bold, Left, INK, "Payment Receipt");
    canvas.text(
        RIGHT_MM,
        y,
        10.0,
        Regular,
        Right,
        INK,
        format!("Receipt No: {}", receipt.receipt_number),
    );
    y -= 6.0;
    canvas.text(
        RIGHT_MM,
        y,
        10.0,
        Regular,
        Right,
        INK,
        format!("Date: {}", receipt.created_at.format("%Y-%m-%d %H:%M")),
    );
    y -= 10.0;

    // Payer
    canvas.text(MARGIN_MM, y, 10.0, Bold, Left, INK, "Payer Information");
    y -= 6.0;
    canvas.text(MARGIN_MM, y, 10.0, Regular, Left, INK, format!("Name: {}", receipt.payer_name));
    y -= 5.5;
    canvas.text(MARGIN_MM, y, 10.0, Regular, Left, INK, format!("Class: {}", receipt.payer_group));
    y -= 5.5;
    let department = if receipt.department.is_empty() {
        "-"
    } else {
        receipt.department.as_str()
    };
    canvas.text(MARGIN_MM, y, 10.0, Regular, Left, INK, format!("Department: {}", department));
    y -= 10.0;

    // Table header band
    canvas.fill(
        MARGIN_MM,
        y - 6.0,
        RIGHT_MM - MARGIN_MM,
        HEADER_BAND_HEIGHT_MM,
        BAND,
    );
    canvas.text(MARGIN_MM + CELL_INSET_MM, y - 2.0, 10.0, Bold, Left, INK, "Item");
    canvas.text(RIGHT_MM - CELL_INSET_MM, y - 2.0, 10.0, Bold, Right, INK, "Amount");
    y -= 10.0;

    // Rows
    let mut rows = paginate(
        receipt.items.iter().map(|_| ROW_HEIGHT_MM),
        RowSlot { page: 0, y },
    );
    for (item, slot) in receipt.items.iter().zip(rows.by_ref()) {
        canvas.page = slot.page;
        canvas.text(MARGIN_MM + CELL_INSET_MM, slot.y, 10.0, Regular, Left, ROW_TEXT, &item.name);
        canvas.text(
            RIGHT_MM - CELL_INSET_MM,
            slot.y,
            10.0,
            Regular,
            Right,
            ROW_TEXT,
            item.amount().format_with_symbol(symbol),
        );
        canvas.rule(slot.y - 2.5, ROW_RULE);
    }
    let end = rows.position();
    canvas.page = end.page;
    y = end.y;

    // Totals
    y -= 1.0;
    canvas.text(MARGIN_MM + CELL_INSET_MM, y, 11.0, Bold, Left, INK, "Total");
    canvas.text(
        RIGHT_MM - CELL_INSET_MM,
        y,
        11.0,
        Bold,
        Right,
        INK,
        Money::from_cents(receipt.total_cents).format_with_symbol(symbol),
    );

    // Footer
    y -= 12.0;
    canvas.text(MARGIN_MM, y, 9.0, Regular, Left, FOOTER, &settings.footer_text);

    DocumentPlan {
        page_count: canvas.page + 1,
        commands: canvas.commands,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use receipt_core::ReceiptItem;

    fn receipt(item_amounts: &[i64]) -> Receipt {
        let items: Vec<ReceiptItem> = item_amounts
            .iter()
            .enumerate()
            .map(|(i, cents)| ReceiptItem {
                id: format!("item-{i}"),
                receipt_id: "r1".to_string(),
                position: i as i64,
                name: format!("Item {}", i + 1),
                amount_cents: *cents,
            })
            .collect();

        Receipt {
            id: "r1".to_string(),
            receipt_number: "RCPT-2024-0001".to_string(),
            payer_name: "Ada Obi".to_string(),
            payer_group: "JSS1".to_string(),
            department: String::new(),
            total_cents: items.iter().map(|i| i.amount_cents).sum(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
            document_path: None,
            items,
        }
    }

    fn settings() -> Settings {
        let mut settings = Settings::defaults("/tmp/pdfs");
        settings.organization_name = "Greenfield College".to_string();
        settings.organization_address = "12 Marina Road".to_string();
        settings.organization_contact = "0800 000 0000".to_string();
        settings
    }

    fn texts(plan: &DocumentPlan) -> Vec<&str> {
        plan.commands.iter().filter_map(DrawCommand::text).collect()
    }

    #[test]
    fn test_short_receipt_fits_one_page() {
        let plan = plan(&receipt(&[5_000_000, 19_999]), &settings());

        assert_eq!(plan.page_count, 1);
        let texts = texts(&plan);
        assert!(texts.contains(&"Receipt No: RCPT-2024-0001"));
        assert!(texts.contains(&"Date: 2024-03-01 09:30"));
        assert!(texts.contains(&"Department: -"));
        assert!(texts.contains(&"₦50,000.00"));
        assert!(texts.contains(&"₦199.99"));
        assert!(texts.contains(&"₦50,199.99"));
    }

    #[test]
    fn test_header_skips_blank_lines() {
        let mut s = settings();
        s.organization_address.clear();
        s.organization_contact.clear();

        let with = plan(&receipt(&[100]), &settings());
        let without = plan(&receipt(&[100]), &s);

        assert_eq!(with.commands.len(), without.commands.len() + 2);
    }

    #[test]
    fn test_amounts_are_right_aligned() {
        let plan = plan(&receipt(&[100]), &settings());

        let amount = plan
            .commands
            .iter()
            .find(|c| c.text() == Some("₦1.00"))
            .unwrap();
        assert!(matches!(
            amount,
            DrawCommand::Text { align: Align::Right, x, .. } if (*x - (RIGHT_MM - CELL_INSET_MM)).abs() < f32::EPSILON
        ));
    }

    #[test]
    fn test_long_receipt_paginates_whole_rows() {
        let amounts: Vec<i64> = (1..=60).map(|i| i * 100).collect();
        let receipt = receipt(&amounts);
        let plan = plan(&receipt, &settings());

        assert!(plan.page_count >= 2);

        let mut last_page = 0;
        for (i, item) in receipt.items.iter().enumerate() {
            let (page, y) = plan
                .commands
                .iter()
                .find_map(|c| match c {
                    DrawCommand::Text { page, y, text, .. } if *text == item.name => Some((*page, *y)),
                    _ => None,
                })
                .unwrap();

            // Each row keeps its name and amount together
            let amount = item.amount().format_with_symbol("₦");
            assert!(plan.commands.iter().any(|c| matches!(
                c,
                DrawCommand::Text { page: p, y: ay, text, .. } if *p == page && *ay == y && *text == amount
            )));

            assert!(page >= last_page, "row {} went backwards", i);
            assert!(y > PAGE_BREAK_MM - ROW_HEIGHT_MM);
            last_page = page;
        }
    }

    #[test]
    fn test_total_appears_once_after_last_row() {
        let amounts: Vec<i64> = (1..=60).map(|i| i * 100).collect();
        let receipt = receipt(&amounts);
        let plan = plan(&receipt, &settings());

        let totals: Vec<_> = plan
            .commands
            .iter()
            .filter(|c| c.text() == Some("Total"))
            .collect();
        assert_eq!(totals.len(), 1);

        let last_row = plan
            .commands
            .iter()
            .position(|c| c.text() == Some("Item 60"))
            .unwrap();
        let total = plan
            .commands
            .iter()
            .position(|c| c.text() == Some("Total"))
            .unwrap();
        assert!(total > last_row);
        assert_eq!(plan.commands[total].page(), plan.page_count - 1);

        let expected = Money::from_cents(receipt.total_cents).format_with_symbol("₦");
        assert_eq!(plan.commands[total + 1].text(), Some(expected.as_str()));
    }

    #[test]
    fn test_plan_is_deterministic() {
        let receipt = receipt(&[1, 2, 3]);
        assert_eq!(plan(&receipt, &settings()), plan(&receipt, &settings()));
    }

    #[test]
    fn test_paginate_breaks_at_threshold() {
        let mut rows = paginate([7.0; 3], RowSlot { page: 0, y: 49.0 });

        assert_eq!(rows.next(), Some(RowSlot { page: 0, y: 49.0 }));
        assert_eq!(rows.next(), Some(RowSlot { page: 0, y: 42.0 }));
        // Cursor is now exactly at the threshold
        assert_eq!(rows.next(), Some(RowSlot { page: 1, y: TOP_MM }));
        assert_eq!(rows.next(), None);
        assert_eq!(rows.position(), RowSlot { page: 1, y: TOP_MM - 7.0 });
    }

    #[test]
    fn test_paginate_is_restartable() {
        let rows = paginate([7.0; 50], RowSlot { page: 0, y: TOP_MM });
        let first: Vec<_> = rows.clone().collect();
        let second: Vec<_> = rows.collect();
        assert_eq!(first, second);
        assert_eq!(first.last().map(|s| s.page), Some(1));
    }
}
