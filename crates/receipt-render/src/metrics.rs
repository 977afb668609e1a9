//! Helvetica advance widths (Adobe AFM, 1/1000 em) for right alignment.
//!
//! Only printable ASCII is tabulated; anything else is measured as a digit.

use crate::layout::FontStyle;

const POINTS_PER_MM: f32 = 72.0 / 25.4;
const FALLBACK_WIDTH: u16 = 556;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    // space ! " # $ % & ' ( ) * + , - . /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // : ; < = > ? @
    278, 278, 584, 584, 584, 556, 1015,
    // A-Z
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [ \ ] ^ _ `
    278, 278, 278, 469, 556, 333,
    // a-z
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // { | } ~
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

fn glyph_width(ch: char, style: FontStyle) -> u16 {
    let table = match style {
        FontStyle::Regular => &HELVETICA,
        FontStyle::Bold => &HELVETICA_BOLD,
    };

    match ch {
        ' '..='~' => table[ch as usize - ' ' as usize],
        _ => FALLBACK_WIDTH,
    }
}

/// Width of `text` in millimetres at `size` points.
pub fn text_width_mm(text: &str, size: f32, style: FontStyle) -> f32 {
    let units: u32 = text.chars().map(|ch| u32::from(glyph_width(ch, style))).sum();
    units as f32 / 1000.0 * size / POINTS_PER_MM
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_share_one_width() {
        let a = text_width_mm("1111", 10.0, FontStyle::Regular);
        let b = text_width_mm("8888", 10.0, FontStyle::Regular);
        assert_eq!(a, b);
    }

    #[test]
    fn test_known_width() {
        // "Total" bold: 611 + 611 + 333 + 556 + 278 = 2389 units
        let width = text_width_mm("Total", 11.0, FontStyle::Bold);
        let expected = 2.389 * 11.0 * 25.4 / 72.0;
        assert!((width - expected).abs() < 1e-3);
    }

    #[test]
    fn test_bold_is_wider() {
        let regular = text_width_mm("Amount", 10.0, FontStyle::Regular);
        let bold = text_width_mm("Amount", 10.0, FontStyle::Bold);
        assert!(bold > regular);
    }
}
