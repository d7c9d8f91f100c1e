//! `RenderSurface` over an `embedded-graphics` panel
//!
//! Glyphs come from the 5x8 mono font, magnified by the text scale, in a
//! 6x8 cell per character. Draw calls cannot fail through the surface
//! interface, so the first draw error is latched and reported by
//! [`RenderSurface::display`].

use embedded_graphics::mono_font::ascii::FONT_5X8;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Baseline, Text};
use inkstat_core::traits::DisplayError;

use crate::backend::RenderSurface;
use crate::layout::{Rect, CHAR_CELL_HEIGHT, CHAR_CELL_WIDTH};

/// Buffered panel that needs an explicit commit
pub trait Flush {
    /// Push the frame buffer to the panel
    fn flush(&mut self) -> Result<(), DisplayError>;
}

/// Adapts a buffered `DrawTarget` into a [`RenderSurface`]
pub struct GraphicsSurface<P> {
    panel: P,
    cursor: Point,
    text_color: BinaryColor,
    scale: u8,
    wrap: bool,
    draw_failed: bool,
}

impl<P> GraphicsSurface<P>
where
    P: DrawTarget<Color = BinaryColor> + Flush,
{
    pub fn new(panel: P) -> Self {
        Self {
            panel,
            cursor: Point::zero(),
            text_color: BinaryColor::On,
            scale: 1,
            wrap: true,
            draw_failed: false,
        }
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }

    pub fn into_inner(self) -> P {
        self.panel
    }

    /// Current text cursor
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    fn advance(&self) -> i32 {
        (CHAR_CELL_WIDTH * u32::from(self.scale)) as i32
    }

    fn line_height(&self) -> i32 {
        (CHAR_CELL_HEIGHT * u32::from(self.scale)) as i32
    }

    fn latch<T, E>(&mut self, result: Result<T, E>) {
        if result.is_err() {
            self.draw_failed = true;
        }
    }

    fn draw_glyph(&mut self, c: char) {
        let mut utf8 = [0u8; 4];
        let glyph: &str = c.encode_utf8(&mut utf8);
        let style = MonoTextStyle::new(&FONT_5X8, self.text_color);
        let mut target = Scaled {
            target: &mut self.panel,
            origin: self.cursor,
            scale: u32::from(self.scale),
        };
        let result =
            Text::with_baseline(glyph, Point::zero(), style, Baseline::Top).draw(&mut target);
        self.latch(result);
    }
}

impl<P> RenderSurface for GraphicsSurface<P>
where
    P: DrawTarget<Color = BinaryColor> + Flush,
{
    fn width(&self) -> u32 {
        self.panel.bounding_box().size.width
    }

    fn height(&self) -> u32 {
        self.panel.bounding_box().size.height
    }

    fn fill_screen(&mut self, color: BinaryColor) {
        let result = self.panel.clear(color);
        self.latch(result);
    }

    fn fill_rect(&mut self, rect: Rect, color: BinaryColor) {
        let area = Rectangle::new(
            Point::new(rect.x as i32, rect.y as i32),
            Size::new(rect.width, rect.height),
        );
        let result = self.panel.fill_solid(&area, color);
        self.latch(result);
    }

    fn set_cursor(&mut self, x: u32, y: u32) {
        self.cursor = Point::new(x as i32, y as i32);
    }

    fn set_text_color(&mut self, color: BinaryColor) {
        self.text_color = color;
    }

    fn set_text_size(&mut self, scale: u8) {
        self.scale = scale.max(1);
    }

    fn set_text_wrap(&mut self, wrap: bool) {
        self.wrap = wrap;
    }

    fn print(&mut self, c: char) {
        match c {
            '\n' => {
                self.cursor.x = 0;
                self.cursor.y += self.line_height();
            }
            '\r' => {}
            _ => {
                if self.wrap && self.cursor.x + self.advance() > self.width() as i32 {
                    self.cursor.x = 0;
                    self.cursor.y += self.line_height();
                }
                self.draw_glyph(c);
                self.cursor.x += self.advance();
            }
        }
    }

    fn display(&mut self) -> Result<(), DisplayError> {
        if core::mem::take(&mut self.draw_failed) {
            return Err(DisplayError::Draw);
        }
        self.panel.flush()
    }
}

/// Draw target that magnifies every pixel into a `scale`-sized square
struct Scaled<'a, P> {
    target: &'a mut P,
    origin: Point,
    scale: u32,
}

impl<P: DrawTarget<Color = BinaryColor>> OriginDimensions for Scaled<'_, P> {
    fn size(&self) -> Size {
        let size = self.target.bounding_box().size;
        Size::new(size.width / self.scale, size.height / self.scale)
    }
}

impl<P: DrawTarget<Color = BinaryColor>> DrawTarget for Scaled<'_, P> {
    type Color = BinaryColor;
    type Error = P::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let scale = self.scale as i32;
        for Pixel(point, color) in pixels {
            let top_left = self.origin + point * scale;
            let block = Rectangle::new(top_left, Size::new_equal(self.scale));
            self.target.fill_solid(&block, color)?;
        }
        Ok(())
    }
}
