//! Reading renderer and render surface abstraction for Inkstat
//!
//! This crate provides:
//! - `RenderSurface`, the small set of drawing primitives the renderer needs
//! - Border geometry and text placement
//! - Reading formatting (Celsius, derived Fahrenheit, humidity)
//! - `Renderer`, which draws the readings and implements `ObservationDisplay`
//! - `GraphicsSurface`, a `RenderSurface` over any `embedded-graphics` panel
//!
//! # Architecture
//!
//! The renderer only talks to a `RenderSurface`. Tests use a recording
//! surface; firmware wraps its panel driver (a `DrawTarget` with a `Flush`
//! step) in a `GraphicsSurface`.

#![cfg_attr(not(test), no_std)]

pub mod backend;
pub mod graphics;
pub mod layout;
pub mod renderer;
pub mod text;

// Re-export key types
pub use backend::RenderSurface;
pub use embedded_graphics::pixelcolor::BinaryColor;
pub use graphics::{Flush, GraphicsSurface};
pub use inkstat_core::traits::DisplayError;
pub use layout::{border_rects, Rect, TextLayout};
pub use renderer::Renderer;
pub use text::{celsius_to_fahrenheit, format_readings, ReadingText, READING_TEXT_CAPACITY};
