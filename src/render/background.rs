//! Parallax starfield
//!
//! Star positions come from an integer hash, not the sim RNG, so the
//! backdrop never perturbs gameplay determinism. Three layers scroll
//! at different rates against `bg_scroll`.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    QueueableCommand,
};

use super::Viewport;

const STARS_PER_LAYER: u32 = 40;

/// (glyph, colour, relative scroll rate) per depth layer, nearest last.
const LAYERS: [(char, Color, f32); 3] = [
    ('·', Color::DarkGrey, 0.25),
    ('.', Color::Grey, 0.5),
    ('*', Color::White, 1.0),
];

fn star_hash(layer: u32, i: u32) -> u32 {
    (layer.wrapping_mul(7919).wrapping_add(i)).wrapping_mul(2654435761)
}

/// Draw the starfield across the playfield rows.
pub fn draw<W: Write>(out: &mut W, view: &Viewport, scroll: f32) -> std::io::Result<()> {
    let cols = view.cols as u32;
    let rows = view.play_rows() as u32;
    if cols == 0 || rows == 0 {
        return Ok(());
    }

    for (layer, (glyph, color, rate)) in LAYERS.iter().enumerate() {
        out.queue(style::SetForegroundColor(*color))?;
        let offset = (scroll * rate) as u32;
        for i in 0..STARS_PER_LAYER {
            let hash = star_hash(layer as u32, i);
            let x = (hash % cols + cols - offset % cols) % cols;
            let y = (hash >> 16) % rows;
            out.queue(cursor::MoveTo(x as u16, view.play_top() + y as u16))?;
            out.queue(Print(glyph))?;
        }
    }
    Ok(())
}
