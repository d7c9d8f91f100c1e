//! Border geometry and text placement

/// Width of a character cell at scale 1, including spacing
pub const CHAR_CELL_WIDTH: u32 = 6;

/// Height of a character cell at scale 1
pub const CHAR_CELL_HEIGHT: u32 = 8;

/// Axis-aligned rectangle in surface pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Number of pixels covered
    pub const fn area(&self) -> u32 {
        self.width * self.height
    }

    /// True if the pixel lies inside
    pub const fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// True if the two rectangles share at least one pixel
    pub const fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// Border rectangles in top, right, bottom, left order
///
/// The four pieces wind around the frame so that each corner belongs to
/// exactly one of them. Requires `width, height > 2 * border`.
pub fn border_rects(width: u32, height: u32, border: u32) -> [Rect; 4] {
    [
        Rect::new(0, 0, width, border),
        Rect::new(
            width.saturating_sub(border),
            border,
            border,
            height.saturating_sub(border),
        ),
        Rect::new(
            0,
            height.saturating_sub(border),
            width.saturating_sub(border),
            border,
        ),
        Rect::new(0, border, border, height.saturating_sub(2 * border)),
    ]
}

/// Where the text block starts and how far apart its lines are
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextLayout {
    pub origin_x: u32,
    pub origin_y: u32,
    pub line_height: u32,
}

impl TextLayout {
    /// Text inset from the border and line spacing for a text scale
    pub const fn new(border: u32, scale: u8) -> Self {
        Self {
            origin_x: border * 15,
            origin_y: border * 2,
            line_height: CHAR_CELL_HEIGHT * scale as u32,
        }
    }

    /// Cursor position for the start of line `line` (0-based)
    pub const fn line_start(&self, line: u32) -> (u32, u32) {
        (self.origin_x, self.origin_y + self.line_height * line)
    }
}
