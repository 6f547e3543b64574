//! Annotation text drawn with a built-in scalable 5x7 glyph face, so PNG
//! output never depends on system font discovery.

use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;

const GLYPH_HEIGHT: usize = 7;
const SPACE_ADVANCE: i32 = 3;

#[derive(Clone, Copy)]
struct Glyph {
    width: u8,
    rows: [u8; GLYPH_HEIGHT],
}

/// Horizontal anchoring of a label relative to its position.
#[derive(Debug, Clone, Copy)]
pub enum Anchor {
    Left,
    Center,
}

/// Advance width in pixels of `text` rendered at `px_height`.
pub fn label_width(text: &str, px_height: u32) -> i32 {
    let scale = scale_for(px_height);
    text.chars()
        .map(|ch| match glyph(ch) {
            Some(g) => scale * (g.width as i32 + 1),
            None => scale * SPACE_ADVANCE,
        })
        .sum()
}

/// Draw `text` with its top edge at `pos.1` and its left edge (or center,
/// per `anchor`) at `pos.0`.
pub fn draw_label<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    text: &str,
    pos: (i32, i32),
    px_height: u32,
    color: &RGBColor,
    anchor: Anchor,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let scale = scale_for(px_height);
    let mut x = match anchor {
        Anchor::Left => pos.0,
        Anchor::Center => pos.0 - label_width(text, px_height) / 2,
    };
    let y = pos.1;

    for ch in text.chars() {
        let Some(g) = glyph(ch) else {
            x += scale * SPACE_ADVANCE;
            continue;
        };
        for (row, bits) in g.rows.iter().enumerate() {
            for col in 0..g.width {
                if bits & (1 << (g.width - 1 - col)) != 0 {
                    let px = x + col as i32 * scale;
                    let py = y + row as i32 * scale;
                    area.draw(&Rectangle::new(
                        [(px, py), (px + scale, py + scale)],
                        color.filled(),
                    ))?;
                }
            }
        }
        x += scale * (g.width as i32 + 1);
    }

    Ok(())
}

fn scale_for(px_height: u32) -> i32 {
    ((px_height as f64 / GLYPH_HEIGHT as f64).round() as i32).max(1)
}

fn glyph(ch: char) -> Option<Glyph> {
    let (width, rows): (u8, [u8; GLYPH_HEIGHT]) = match ch.to_ascii_uppercase() {
        'A' => (5, [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
        'B' => (5, [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110]),
        'C' => (5, [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110]),
        'D' => (5, [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110]),
        'E' => (5, [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111]),
        'F' => (5, [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000]),
        'G' => (5, [0b01110, 0b10001, 0b10000, 0b10011, 0b10001, 0b10001, 0b01111]),
        'H' => (5, [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
        'I' => (3, [0b111, 0b010, 0b010, 0b010, 0b010, 0b010, 0b111]),
        'J' => (5, [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100]),
        'K' => (5, [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001]),
        'L' => (5, [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111]),
        'M' => (5, [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001]),
        'N' => (5, [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001]),
        'O' => (5, [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
        'P' => (5, [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000]),
        'Q' => (5, [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101]),
        'R' => (5, [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001]),
        'S' => (5, [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110]),
        'T' => (5, [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100]),
        'U' => (5, [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
        'V' => (5, [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100]),
        'W' => (5, [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b11011, 0b10001]),
        'X' => (5, [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001]),
        'Y' => (5, [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100]),
        'Z' => (5, [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111]),
        '0' => (5, [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110]),
        '1' => (3, [0b010, 0b110, 0b010, 0b010, 0b010, 0b010, 0b111]),
        '2' => (5, [0b01110, 0b10001, 0b00001, 0b00110, 0b01000, 0b10000, 0b11111]),
        '3' => (5, [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110]),
        '4' => (5, [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010]),
        '5' => (5, [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110]),
        '6' => (5, [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110]),
        '7' => (5, [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000]),
        '8' => (5, [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110]),
        '9' => (5, [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100]),
        '(' => (3, [0b001, 0b010, 0b100, 0b100, 0b100, 0b010, 0b001]),
        ')' => (3, [0b100, 0b010, 0b001, 0b001, 0b001, 0b010, 0b100]),
        '-' => (3, [0b000, 0b000, 0b000, 0b111, 0b000, 0b000, 0b000]),
        '.' => (1, [0b0, 0b0, 0b0, 0b0, 0b0, 0b0, 0b1]),
        ':' => (1, [0b0, 0b0, 0b1, 0b0, 0b0, 0b1, 0b0]),
        _ => return None,
    };
    Some(Glyph { width, rows })
}
