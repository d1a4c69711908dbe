use crate::surface::SurfaceSize;

pub type Color = [u8; 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub const fn from_size(w: u32, h: u32) -> Self {
        Self { x: 0, y: 0, w, h }
    }

    /// Clips a float-space rect (which may extend past the left/top edge while
    /// the world scrolls) to non-negative pixel space. Returns `None` when
    /// nothing remains visible.
    pub fn clipped_from_f32(x: f32, y: f32, w: f32, h: f32) -> Option<Rect> {
        if w <= 0.0 || h <= 0.0 {
            return None;
        }
        let right = x + w;
        let bottom = y + h;
        if right <= 0.0 || bottom <= 0.0 {
            return None;
        }
        let cx = x.max(0.0);
        let cy = y.max(0.0);
        Some(Rect {
            x: cx as u32,
            y: cy as u32,
            w: (right - cx) as u32,
            h: (bottom - cy) as u32,
        })
    }
}

// A tiny block font (no external deps). Kept deliberately simple; callers
// should upper-case text before drawing.
pub const DEFAULT_TEXT_SCALE: u32 = 2;
const GLYPH_W: u32 = 3;
const GLYPH_H: u32 = 5;

fn glyph_rows(c: char) -> [u8; 5] {
    match c {
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
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b110, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
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
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '>' => [0b100, 0b010, 0b001, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        _ => [0b000; 5],
    }
}

fn glyph_advance_x(scale: u32) -> u32 {
    (GLYPH_W + 1) * scale.max(1)
}

/// Unified 2D rendering interface.
///
/// Game code should only talk to this trait — it must not care whether the
/// frame lands in a window or an offscreen test buffer.
pub trait Renderer2d {
    fn begin_frame(&mut self, size: SurfaceSize);
    fn size(&self) -> SurfaceSize;

    /// Opaque fill.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Alpha-blended rect over existing content (alpha is applied to `color`'s RGB).
    fn blend_rect(&mut self, rect: Rect, color: Color, alpha: u8);

    fn rect_outline(&mut self, rect: Rect, color: Color);
    fn draw_text_scaled(&mut self, x: u32, y: u32, text: &str, color: Color, scale: u32);

    fn draw_text(&mut self, x: u32, y: u32, text: &str, color: Color) {
        self.draw_text_scaled(x, y, text, color, DEFAULT_TEXT_SCALE);
    }

    fn clear(&mut self, color: Color) {
        let s = self.size();
        self.fill_rect(Rect::from_size(s.width, s.height), color);
    }
}

pub fn text_width(text: &str, scale: u32) -> u32 {
    text.chars().count() as u32 * glyph_advance_x(scale)
}

/// CPU renderer that draws into an RGBA frame buffer.
pub struct CpuRenderer<'a> {
    frame: &'a mut [u8],
    size: SurfaceSize,
}

impl<'a> CpuRenderer<'a> {
    pub fn new(frame: &'a mut [u8], size: SurfaceSize) -> Self {
        Self { frame, size }
    }

    fn put_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x >= self.size.width || y >= self.size.height {
            return;
        }
        let idx = (y as usize * self.size.width as usize + x as usize) * 4;
        if idx + 4 <= self.frame.len() {
            self.frame[idx..idx + 4].copy_from_slice(&color);
        }
    }
}

impl Renderer2d for CpuRenderer<'_> {
    fn begin_frame(&mut self, size: SurfaceSize) {
        self.size = size;
    }

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let max_x = rect.x.saturating_add(rect.w).min(self.size.width);
        let max_y = rect.y.saturating_add(rect.h).min(self.size.height);
        if rect.x >= max_x || rect.y >= max_y {
            return;
        }

        let stride = self.size.width as usize * 4;
        if self.frame.len() < self.size.rgba_len() {
            return;
        }

        for y in rect.y..max_y {
            let row_start = y as usize * stride + rect.x as usize * 4;
            let row_end = y as usize * stride + max_x as usize * 4;
            for px in self.frame[row_start..row_end].chunks_exact_mut(4) {
                px.copy_from_slice(&color);
            }
        }
    }

    fn blend_rect(&mut self, rect: Rect, color: Color, alpha: u8) {
        if alpha == 0 {
            return;
        }
        if alpha == 255 {
            self.fill_rect(rect, color);
            return;
        }

        let max_x = rect.x.saturating_add(rect.w).min(self.size.width);
        let max_y = rect.y.saturating_add(rect.h).min(self.size.height);
        if rect.x >= max_x || rect.y >= max_y || self.frame.len() < self.size.rgba_len() {
            return;
        }

        let stride = self.size.width as usize * 4;
        let a = alpha as u32;
        let inv = 255 - a;
        for y in rect.y..max_y {
            let row_start = y as usize * stride + rect.x as usize * 4;
            let row_end = y as usize * stride + max_x as usize * 4;
            for px in self.frame[row_start..row_end].chunks_exact_mut(4) {
                for c in 0..3 {
                    px[c] = ((color[c] as u32 * a + px[c] as u32 * inv) / 255) as u8;
                }
                px[3] = 255;
            }
        }
    }

    fn rect_outline(&mut self, rect: Rect, color: Color) {
        if rect.w == 0 || rect.h == 0 {
            return;
        }
        self.fill_rect(Rect::new(rect.x, rect.y, rect.w, 1), color);
        self.fill_rect(
            Rect::new(rect.x, rect.y.saturating_add(rect.h).saturating_sub(1), rect.w, 1),
            color,
        );
        self.fill_rect(Rect::new(rect.x, rect.y, 1, rect.h), color);
        self.fill_rect(
            Rect::new(rect.x.saturating_add(rect.w).saturating_sub(1), rect.y, 1, rect.h),
            color,
        );
    }

    fn draw_text_scaled(&mut self, x: u32, y: u32, text: &str, color: Color, scale: u32) {
        let scale = scale.max(1);
        let mut pen_x = x;
        for c in text.chars() {
            let rows = glyph_rows(c.to_ascii_uppercase());
            for (row_idx, row) in rows.iter().enumerate() {
                for col in 0..GLYPH_W {
                    if row & (1 << (GLYPH_W - 1 - col)) == 0 {
                        continue;
                    }
                    for dy in 0..scale {
                        for dx in 0..scale {
                            self.put_pixel(
                                pen_x + col * scale + dx,
                                y + row_idx as u32 * scale + dy,
                                color,
                            );
                        }
                    }
                }
            }
            pen_x += glyph_advance_x(scale);
        }
    }
}
