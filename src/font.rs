//! 3x5 bitmap font. Enough glyphs for the HUD and the overlay messages;
//! anything else renders as a blank cell.

pub const GLYPH_W: i32 = 3;
pub const GLYPH_H: i32 = 5;
/// Horizontal advance per character, including one column of spacing.
pub const ADVANCE: i32 = GLYPH_W + 1;

type Glyph = [u8; 15];

const BLANK: Glyph = [0; 15];

#[rustfmt::skip]
const DIGITS: [Glyph; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

#[rustfmt::skip]
const LETTERS: [Glyph; 26] = [
    [0,1,0, 1,0,1, 1,1,1, 1,0,1, 1,0,1], // A
    [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,1,0], // B
    [0,1,1, 1,0,0, 1,0,0, 1,0,0, 0,1,1], // C
    [1,1,0, 1,0,1, 1,0,1, 1,0,1, 1,1,0], // D
    [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,1,1], // E
    [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,0,0], // F
    [0,1,1, 1,0,0, 1,0,1, 1,0,1, 0,1,1], // G
    [1,0,1, 1,0,1, 1,1,1, 1,0,1, 1,0,1], // H
    [1,1,1, 0,1,0, 0,1,0, 0,1,0, 1,1,1], // I
    [0,0,1, 0,0,1, 0,0,1, 1,0,1, 0,1,0], // J
    [1,0,1, 1,0,1, 1,1,0, 1,0,1, 1,0,1], // K
    [1,0,0, 1,0,0, 1,0,0, 1,0,0, 1,1,1], // L
    [1,0,1, 1,1,1, 1,1,1, 1,0,1, 1,0,1], // M
    [1,1,0, 1,0,1, 1,0,1, 1,0,1, 1,0,1], // N
    [0,1,0, 1,0,1, 1,0,1, 1,0,1, 0,1,0], // O
    [1,1,0, 1,0,1, 1,1,0, 1,0,0, 1,0,0], // P
    [0,1,0, 1,0,1, 1,0,1, 1,1,0, 0,1,1], // Q
    [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,0,1], // R
    [0,1,1, 1,0,0, 0,1,0, 0,0,1, 1,1,0], // S
    [1,1,1, 0,1,0, 0,1,0, 0,1,0, 0,1,0], // T
    [1,0,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // U
    [1,0,1, 1,0,1, 1,0,1, 1,0,1, 0,1,0], // V
    [1,0,1, 1,0,1, 1,1,1, 1,1,1, 1,0,1], // W
    [1,0,1, 1,0,1, 0,1,0, 1,0,1, 1,0,1], // X
    [1,0,1, 1,0,1, 0,1,0, 0,1,0, 0,1,0], // Y
    [1,1,1, 0,0,1, 0,1,0, 1,0,0, 1,1,1], // Z
];

#[rustfmt::skip]
fn glyph(ch: char) -> &'static Glyph {
    match ch {
        '0'..='9' => &DIGITS[ch as usize - '0' as usize],
        'a'..='z' => &LETTERS[ch as usize - 'a' as usize],
        'A'..='Z' => &LETTERS[ch as usize - 'A' as usize],
        ':' => &[0,0,0, 0,1,0, 0,0,0, 0,1,0, 0,0,0],
        '.' => &[0,0,0, 0,0,0, 0,0,0, 0,0,0, 0,1,0],
        '!' => &[0,1,0, 0,1,0, 0,1,0, 0,0,0, 0,1,0],
        '-' => &[0,0,0, 0,0,0, 1,1,1, 0,0,0, 0,0,0],
        _ => &BLANK,
    }
}

/// Width of `text` in glyph pixels, without trailing spacing.
pub fn text_width(text: &str) -> i32 {
    let n = text.chars().count() as i32;
    if n == 0 { 0 } else { n * ADVANCE - 1 }
}

/// Calls `plot` with the glyph-pixel coordinates of every lit pixel of
/// `text`, relative to its top-left corner.
pub fn rasterize(text: &str, mut plot: impl FnMut(i32, i32)) {
    for (i, ch) in text.chars().enumerate() {
        let origin = i as i32 * ADVANCE;
        let g = glyph(ch);
        for row in 0..GLYPH_H {
            for col in 0..GLYPH_W {
                if g[(row * GLYPH_W + col) as usize] == 1 {
                    plot(origin + col, row);
                }
            }
        }
    }
}
