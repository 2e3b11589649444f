//! Software render surface
//!
//! A minimal RGBA8 bitmap carrying exactly the operations the waveform
//! renderer needs: alpha-blended pixels, vertical/horizontal lines, and a
//! tiny right-aligned pixel font for the zoom readout. General 2D rendering
//! is deliberately out of scope; hosts that want more composite this bitmap
//! into their own surface.

use serde::{Deserialize, Serialize};

/// An RGBA colour with straight (non-premultiplied) alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Opaque colour
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Colour with explicit alpha
    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same colour with a replacement alpha
    pub const fn alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

/// An owned RGBA8 pixel surface
#[derive(Debug, Clone)]
pub struct Bitmap {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
}

impl Bitmap {
    /// Create a surface cleared to opaque black
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::new(0, 0, 0); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Fill the whole surface with an opaque colour
    pub fn clear(&mut self, colour: Rgba) {
        self.pixels.fill(colour.alpha(255));
    }

    /// Read one pixel; out-of-range coordinates return opaque black
    pub fn pixel(&self, x: i64, y: i64) -> Rgba {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return Rgba::new(0, 0, 0);
        }
        self.pixels[y as usize * self.width + x as usize]
    }

    /// Blend one pixel (source-over); out-of-range coordinates are ignored
    pub fn put_pixel(&mut self, x: i64, y: i64, colour: Rgba) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let dst = &mut self.pixels[y as usize * self.width + x as usize];
        *dst = blend(*dst, colour);
    }

    /// Vertical line of `len` pixels starting at (x, y), growing downward
    pub fn vline(&mut self, x: i64, y: i64, len: i64, colour: Rgba) {
        for dy in 0..len.max(0) {
            self.put_pixel(x, y + dy, colour);
        }
    }

    /// Horizontal line of `len` pixels starting at (x, y), growing rightward
    pub fn hline(&mut self, x: i64, y: i64, len: i64, colour: Rgba) {
        for dx in 0..len.max(0) {
            self.put_pixel(x + dx, y, colour);
        }
    }

    /// Draw text with its right edge at `x_right` using the built-in 5x7
    /// font. Characters without a glyph are skipped (drawn as space).
    pub fn draw_text_right(&mut self, x_right: i64, y: i64, text: &str, colour: Rgba) {
        let chars = text.chars().count() as i64;
        if chars == 0 {
            return;
        }
        let text_width = chars * (GLYPH_WIDTH + 1) - 1;
        let mut x = x_right - text_width;
        for ch in text.chars() {
            self.draw_glyph(x, y, ch, colour);
            x += GLYPH_WIDTH + 1;
        }
    }

    fn draw_glyph(&mut self, x: i64, y: i64, ch: char, colour: Rgba) {
        let rows = glyph(ch);
        for (dy, row) in rows.iter().enumerate() {
            for dx in 0..GLYPH_WIDTH {
                if row & (1 << (GLYPH_WIDTH - 1 - dx)) != 0 {
                    self.put_pixel(x + dx, y + dy as i64, colour);
                }
            }
        }
    }
}

/// Straight-alpha source-over blend; the surface stays opaque
fn blend(dst: Rgba, src: Rgba) -> Rgba {
    let a = src.a as u32;
    let inv = 255 - a;
    let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * inv + 127) / 255) as u8;
    Rgba::new(mix(src.r, dst.r), mix(src.g, dst.g), mix(src.b, dst.b))
}

const GLYPH_WIDTH: i64 = 5;

/// 5x7 glyphs for the zoom readout ("Zoom: 123.4")
fn glyph(ch: char) -> [u8; 7] {
    match ch {
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
        ':' => [0b00000, 0b01100, 0b01100, 0b00000, 0b01100, 0b01100, 0b00000],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        'o' => [0b00000, 0b00000, 0b01110, 0b10001, 0b10001, 0b10001, 0b01110],
        'm' => [0b00000, 0b00000, 0b11010, 0b10101, 0b10101, 0b10101, 0b10101],
        _ => [0; 7],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_put_pixel_replaces() {
        let mut bmp = Bitmap::new(4, 4);
        bmp.put_pixel(1, 2, Rgba::new(52, 152, 219));
        assert_eq!(bmp.pixel(1, 2), Rgba::new(52, 152, 219));
    }

    #[test]
    fn half_alpha_blends_toward_source() {
        let mut bmp = Bitmap::new(2, 1);
        bmp.clear(Rgba::new(0, 0, 0));
        bmp.put_pixel(0, 0, Rgba::with_alpha(255, 255, 255, 128));
        let px = bmp.pixel(0, 0);
        assert!((px.r as i32 - 128).abs() <= 1, "Got {}", px.r);
        assert_eq!(px.a, 255, "Surface stays opaque");
    }

    #[test]
    fn out_of_range_writes_are_clipped() {
        let mut bmp = Bitmap::new(3, 3);
        bmp.put_pixel(-1, 0, Rgba::new(255, 0, 0));
        bmp.put_pixel(0, 99, Rgba::new(255, 0, 0));
        bmp.vline(5, 0, 10, Rgba::new(255, 0, 0));
        assert!((0..3).all(|x| (0..3).all(|y| bmp.pixel(x, y) == Rgba::new(0, 0, 0))));
    }

    #[test]
    fn vline_spans_requested_rows() {
        let mut bmp = Bitmap::new(1, 8);
        bmp.vline(0, 2, 3, Rgba::new(10, 20, 30));
        assert_eq!(bmp.pixel(0, 1), Rgba::new(0, 0, 0));
        for y in 2..5 {
            assert_eq!(bmp.pixel(0, y), Rgba::new(10, 20, 30));
        }
        assert_eq!(bmp.pixel(0, 5), Rgba::new(0, 0, 0));
    }

    #[test]
    fn text_is_right_aligned_and_visible() {
        let mut bmp = Bitmap::new(80, 12);
        bmp.draw_text_right(75, 2, "Zoom: 2.0", Rgba::new(255, 255, 255));

        let lit = (0..80)
            .flat_map(|x| (0..12).map(move |y| (x, y)))
            .filter(|&(x, y)| bmp.pixel(x, y) == Rgba::new(255, 255, 255))
            .collect::<Vec<_>>();
        assert!(!lit.is_empty(), "Some glyph pixels must be drawn");
        assert!(lit.iter().all(|&(x, _)| x < 75), "Nothing past the right edge");
    }
}
