//! CPU rasterizer for the RGBA framebuffer handed out by `pixels`.
//!
//! Coordinates are signed so callers can draw shapes that hang off the edge;
//! every primitive clips against the buffer bounds.

pub const GLYPH_W: i32 = 3;
pub const GLYPH_H: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterSize {
    pub width: u32,
    pub height: u32,
}

impl RasterSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn rgba_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

pub struct Raster<'a> {
    buf: &'a mut [u8],
    size: RasterSize,
}

impl<'a> Raster<'a> {
    pub fn new(buf: &'a mut [u8], size: RasterSize) -> Self {
        debug_assert_eq!(buf.len(), size.rgba_len());
        Self { buf, size }
    }

    pub fn size(&self) -> RasterSize {
        self.size
    }

    pub fn clear(&mut self, color: [u8; 4]) {
        for px in self.buf.chunks_exact_mut(4) {
            px.copy_from_slice(&color);
        }
    }

    fn put(&mut self, x: i32, y: i32, color: [u8; 4]) {
        if x < 0 || y < 0 || x >= self.size.width as i32 || y >= self.size.height as i32 {
            return;
        }
        let idx = (y as usize * self.size.width as usize + x as usize) * 4;
        self.buf[idx..idx + 4].copy_from_slice(&color);
    }

    fn hline(&mut self, x0: i32, x1: i32, y: i32, color: [u8; 4]) {
        if y < 0 || y >= self.size.height as i32 {
            return;
        }
        let lo = x0.max(0);
        let hi = x1.min(self.size.width as i32 - 1);
        if lo > hi {
            return;
        }
        let row = y as usize * self.size.width as usize;
        for x in lo..=hi {
            let idx = (row + x as usize) * 4;
            self.buf[idx..idx + 4].copy_from_slice(&color);
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: [u8; 4]) {
        for row in y..y + h {
            self.hline(x, x + w - 1, row, color);
        }
    }

    pub fn outline_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: [u8; 4]) {
        if w <= 0 || h <= 0 {
            return;
        }
        self.hline(x, x + w - 1, y, color);
        self.hline(x, x + w - 1, y + h - 1, color);
        for row in y..y + h {
            self.put(x, row, color);
            self.put(x + w - 1, row, color);
        }
    }

    /// Filled circle via per-row spans.
    pub fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: [u8; 4]) {
        if radius <= 0 {
            self.put(cx, cy, color);
            return;
        }
        for dy in -radius..=radius {
            let span = ((radius * radius - dy * dy) as f32).sqrt() as i32;
            self.hline(cx - span, cx + span, cy + dy, color);
        }
    }

    /// 3x5 block-glyph text, uppercase only. Unknown characters render as a
    /// hollow box so missing glyphs are obvious on screen.
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, color: [u8; 4], scale: i32) {
        let scale = scale.max(1);
        let advance = (GLYPH_W + 1) * scale;
        let mut pen_x = x;
        for ch in text.chars() {
            if ch != ' ' {
                let rows = glyph_rows(ch);
                for (gy, bits) in rows.iter().enumerate() {
                    for gx in 0..GLYPH_W {
                        if bits & (0b100 >> gx) != 0 {
                            self.fill_rect(
                                pen_x + gx * scale,
                                y + gy as i32 * scale,
                                scale,
                                scale,
                                color,
                            );
                        }
                    }
                }
            }
            pen_x += advance;
        }
    }

    pub fn text_width(text: &str, scale: i32) -> i32 {
        let scale = scale.max(1);
        text.chars().count() as i32 * (GLYPH_W + 1) * scale
    }
}

fn glyph_rows(ch: char) -> [u8; GLYPH_H as usize] {
    match ch.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b011, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b110, 0b100, 0b110, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'N' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b110, 0b001],
        'R' => [0b110, 0b101, 0b110, 0b110, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'X' => [0b101, 0b010, 0b010, 0b010, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '(' => [0b010, 0b100, 0b100, 0b100, 0b010],
        ')' => [0b010, 0b001, 0b001, 0b001, 0b010],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        _ => [0b111, 0b101, 0b101, 0b101, 0b111],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(buf: &[u8], size: RasterSize, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y * size.width + x) * 4) as usize;
        [buf[idx], buf[idx + 1], buf[idx + 2], buf[idx + 3]]
    }

    #[test]
    fn fill_rect_clips_against_edges() {
        let size = RasterSize::new(8, 8);
        let mut buf = vec![0u8; size.rgba_len()];
        let mut raster = Raster::new(&mut buf, size);
        raster.fill_rect(-2, -2, 4, 4, [255, 0, 0, 255]);

        assert_eq!(pixel(&buf, size, 0, 0), [255, 0, 0, 255]);
        assert_eq!(pixel(&buf, size, 1, 1), [255, 0, 0, 255]);
        assert_eq!(pixel(&buf, size, 2, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn fill_circle_covers_center_and_misses_corner() {
        let size = RasterSize::new(16, 16);
        let mut buf = vec![0u8; size.rgba_len()];
        let mut raster = Raster::new(&mut buf, size);
        raster.fill_circle(8, 8, 5, [0, 255, 0, 255]);

        assert_eq!(pixel(&buf, size, 8, 8), [0, 255, 0, 255]);
        assert_eq!(pixel(&buf, size, 8, 3), [0, 255, 0, 255]);
        assert_eq!(pixel(&buf, size, 0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn draw_text_marks_pixels_inside_glyph_box() {
        let size = RasterSize::new(16, 16);
        let mut buf = vec![0u8; size.rgba_len()];
        let mut raster = Raster::new(&mut buf, size);
        raster.draw_text(0, 0, "I", [255, 255, 255, 255], 1);

        // Top row of 'I' is fully lit.
        for x in 0..3 {
            assert_eq!(pixel(&buf, size, x, 0), [255, 255, 255, 255]);
        }
    }
}
