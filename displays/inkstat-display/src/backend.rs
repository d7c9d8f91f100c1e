//! Render surface trait
//!
//! The drawing primitives the reading renderer is written against.

use embedded_graphics::pixelcolor::BinaryColor;
use inkstat_core::traits::DisplayError;

use crate::layout::Rect;

/// Two-tone drawing surface
///
/// `BinaryColor::Off` is the background tone and `BinaryColor::On` the
/// foreground (draw) tone. Drawing calls only touch a buffer; nothing
/// reaches the physical panel until [`display`](Self::display).
pub trait RenderSurface {
    /// Surface width in pixels
    fn width(&self) -> u32;

    /// Surface height in pixels
    fn height(&self) -> u32;

    /// Fill the whole surface
    fn fill_screen(&mut self, color: BinaryColor);

    /// Fill a rectangle
    fn fill_rect(&mut self, rect: Rect, color: BinaryColor);

    /// Move the text cursor (top-left of the next character cell)
    fn set_cursor(&mut self, x: u32, y: u32);

    /// Color used by [`print`](Self::print)
    fn set_text_color(&mut self, color: BinaryColor);

    /// Text magnification; 1 is a 6x8 pixel character cell
    fn set_text_size(&mut self, scale: u8);

    /// Wrap text at the right edge
    fn set_text_wrap(&mut self, wrap: bool);

    /// Draw one character at the cursor and advance it
    fn print(&mut self, c: char);

    /// Commit the buffer to the physical output
    fn display(&mut self) -> Result<(), DisplayError>;
}
