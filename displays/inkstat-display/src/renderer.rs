//! Reading renderer
//!
//! Draws the latest readings as a bordered three-line text block.

use embedded_graphics::pixelcolor::BinaryColor;
use inkstat_core::config::MonitorConfig;
use inkstat_core::state::ObservationState;
use inkstat_core::traits::{DisplayError, ObservationDisplay};

use crate::backend::RenderSurface;
use crate::layout::{border_rects, TextLayout};
use crate::text::format_readings;

const BACKGROUND: BinaryColor = BinaryColor::Off;
const FOREGROUND: BinaryColor = BinaryColor::On;

/// Renders readings onto a [`RenderSurface`]
pub struct Renderer<S> {
    surface: S,
    border_width: u32,
    text_scale: u8,
}

impl<S: RenderSurface> Renderer<S> {
    /// Create a renderer using the configured border width and text scale
    pub fn new(surface: S, config: &MonitorConfig) -> Self {
        Self::with_style(surface, config.border_width.into(), config.text_scale)
    }

    pub fn with_style(surface: S, border_width: u32, text_scale: u8) -> Self {
        Self {
            surface,
            border_width,
            text_scale,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_inner(self) -> S {
        self.surface
    }

    /// Draw the readings and commit them
    ///
    /// Returns `Ok(false)` without touching the surface if the readings
    /// could not be formatted.
    pub fn render(&mut self, temperature: f32, humidity: f32) -> Result<bool, DisplayError> {
        let text = format_readings(temperature, humidity);
        if text.is_empty() {
            return Ok(false);
        }

        self.surface.fill_screen(BACKGROUND);
        self.draw_border();
        self.draw_text(&text);
        self.surface.display()?;
        Ok(true)
    }

    fn draw_border(&mut self) {
        let width = self.surface.width();
        let height = self.surface.height();
        for rect in border_rects(width, height, self.border_width) {
            self.surface.fill_rect(rect, FOREGROUND);
        }
    }

    /// Line breaks move the cursor back to the text origin, one line down
    fn draw_text(&mut self, text: &str) {
        let layout = TextLayout::new(self.border_width, self.text_scale);

        self.surface.set_text_wrap(false);
        self.surface.set_text_color(FOREGROUND);
        self.surface.set_text_size(self.text_scale);
        let (x, y) = layout.line_start(0);
        self.surface.set_cursor(x, y);

        let mut line = 0;
        for c in text.chars() {
            if c == '\n' {
                line += 1;
                let (x, y) = layout.line_start(line);
                self.surface.set_cursor(x, y);
            } else {
                self.surface.print(c);
            }
        }
    }
}

impl<S: RenderSurface> ObservationDisplay for Renderer<S> {
    fn show(&mut self, observations: &ObservationState) -> Result<bool, DisplayError> {
        self.render(observations.last_temperature(), observations.last_humidity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Rect;
    use heapless::{String, Vec};
    use inkstat_core::clock::{Interval, Timestamp};
    use inkstat_core::scheduler::{RenderOutcome, Scheduler};
    use inkstat_core::traits::{RemoteSession, SessionError, ValueSink};
    use inkstat_core::{ConnectionState, FeedId};

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Op {
        FillScreen(BinaryColor),
        FillRect(Rect, BinaryColor),
        Cursor(u32, u32),
        TextColor(BinaryColor),
        TextSize(u8),
        Wrap(bool),
        Print(char),
        Display,
    }

    struct RecordingSurface {
        ops: Vec<Op, 64>,
        fail_display: bool,
    }

    impl RecordingSurface {
        fn new() -> Self {
            Self {
                ops: Vec::new(),
                fail_display: false,
            }
        }

        fn printed(&self) -> String<32> {
            let mut out = String::new();
            for op in &self.ops {
                if let Op::Print(c) = op {
                    out.push(*c).unwrap();
                }
            }
            out
        }

        fn cursors(&self) -> Vec<(u32, u32), 8> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Cursor(x, y) => Some((*x, *y)),
                    _ => None,
                })
                .collect()
        }
    }

    impl RenderSurface for RecordingSurface {
        fn width(&self) -> u32 {
            296
        }

        fn height(&self) -> u32 {
            128
        }

        fn fill_screen(&mut self, color: BinaryColor) {
            self.ops.push(Op::FillScreen(color)).unwrap();
        }

        fn fill_rect(&mut self, rect: Rect, color: BinaryColor) {
            self.ops.push(Op::FillRect(rect, color)).unwrap();
        }

        fn set_cursor(&mut self, x: u32, y: u32) {
            self.ops.push(Op::Cursor(x, y)).unwrap();
        }

        fn set_text_color(&mut self, color: BinaryColor) {
            self.ops.push(Op::TextColor(color)).unwrap();
        }

        fn set_text_size(&mut self, scale: u8) {
            self.ops.push(Op::TextSize(scale)).unwrap();
        }

        fn set_text_wrap(&mut self, wrap: bool) {
            self.ops.push(Op::Wrap(wrap)).unwrap();
        }

        fn print(&mut self, c: char) {
            self.ops.push(Op::Print(c)).unwrap();
        }

        fn display(&mut self) -> Result<(), DisplayError> {
            self.ops.push(Op::Display).unwrap();
            if self.fail_display {
                Err(DisplayError::Communication)
            } else {
                Ok(())
            }
        }
    }

    fn renderer() -> Renderer<RecordingSurface> {
        Renderer::new(RecordingSurface::new(), &MonitorConfig::default())
    }

    #[test]
    fn test_render_draw_order() {
        let mut renderer = renderer();
        assert_eq!(renderer.render(21.5, 47.25), Ok(true));

        let ops = &renderer.surface().ops;
        assert_eq!(ops[0], Op::FillScreen(BinaryColor::Off));
        for (i, rect) in border_rects(296, 128, 3).iter().enumerate() {
            assert_eq!(ops[1 + i], Op::FillRect(*rect, BinaryColor::On));
        }
        assert_eq!(ops[5], Op::Wrap(false));
        assert_eq!(ops[6], Op::TextColor(BinaryColor::On));
        assert_eq!(ops[7], Op::TextSize(5));
        assert_eq!(ops[8], Op::Cursor(45, 6));
        assert_eq!(*ops.last().unwrap(), Op::Display);
        assert_eq!(ops.iter().filter(|op| **op == Op::Display).count(), 1);
    }

    #[test]
    fn test_render_text_lines() {
        let mut renderer = renderer();
        renderer.render(21.5, 47.25).unwrap();

        let surface = renderer.surface();
        assert_eq!(surface.printed().as_str(), "21.50 C70.70 F47.25 %");
        assert_eq!(&surface.cursors()[..], &[(45, 6), (45, 46), (45, 86)]);
    }

    #[test]
    fn test_unformattable_readings_leave_surface_untouched() {
        let mut renderer = renderer();
        assert_eq!(renderer.render(1.0e20, 50.0), Ok(false));
        assert!(renderer.surface().ops.is_empty());
    }

    #[test]
    fn test_commit_failure_is_returned() {
        let mut renderer = renderer();
        renderer.surface_mut().fail_display = true;
        assert_eq!(
            renderer.render(20.0, 50.0),
            Err(DisplayError::Communication)
        );
    }

    #[test]
    fn test_show_uses_latest_readings() {
        let mut state = ObservationState::new(-50.0);
        state.update_temperature(10.0);
        state.update_humidity(80.0);

        let mut renderer = renderer();
        assert_eq!(renderer.show(&state), Ok(true));
        assert_eq!(
            renderer.surface().printed().as_str(),
            "10.00 C50.00 F80.00 %"
        );
    }

    #[test]
    fn test_custom_style() {
        let mut renderer = Renderer::with_style(RecordingSurface::new(), 2, 1);
        renderer.render(0.0, 0.0).unwrap();
        let cursors = renderer.into_inner().cursors();
        assert_eq!(&cursors[..], &[(30, 4), (30, 12), (30, 20)]);
    }

    /// Session that hands queued values to the sink on the next pump
    #[derive(Default)]
    struct QueuedSession {
        pending: Vec<(FeedId, &'static [u8]), 4>,
    }

    impl RemoteSession for QueuedSession {
        fn connect(&mut self) -> Result<(), SessionError> {
            Ok(())
        }

        fn status(&mut self) -> ConnectionState {
            ConnectionState::Connected
        }

        fn network_status(&self) -> ConnectionState {
            ConnectionState::NetConnected
        }

        fn service_status(&self) -> ConnectionState {
            ConnectionState::Connected
        }

        fn subscribe(&mut self, _feed: FeedId, _name: &str) -> Result<(), SessionError> {
            Ok(())
        }

        fn pump(&mut self, sink: &mut dyn ValueSink) -> Result<(), SessionError> {
            for (feed, payload) in self.pending.iter() {
                sink.deliver(*feed, payload);
            }
            self.pending.clear();
            Ok(())
        }

        fn request_value(&mut self, _feed: FeedId) -> Result<(), SessionError> {
            Ok(())
        }
    }

    const PUMP: Interval = 5_000;
    const RENDER: Interval = 300_000;

    fn two_values_render_once(start: Timestamp) {
        let config = MonitorConfig::default();
        let mut scheduler = Scheduler::new(&config);
        let mut session = QueuedSession::default();
        let mut state = ObservationState::new(config.sentinel);
        let mut renderer = renderer();

        scheduler.tick(start, &mut session, &mut state, &mut renderer);
        session.pending.push((FeedId::Temperature, b"10.0")).unwrap();
        session.pending.push((FeedId::Humidity, b"80.0")).unwrap();
        scheduler.tick(start.wrapping_add(PUMP), &mut session, &mut state, &mut renderer);
        assert!(renderer.surface().ops.is_empty());

        let outcome = scheduler.tick(
            start.wrapping_add(RENDER),
            &mut session,
            &mut state,
            &mut renderer,
        );
        assert_eq!(outcome.render, RenderOutcome::Rendered);
        assert_eq!(
            renderer.surface().printed().as_str(),
            "10.00 C50.00 F80.00 %"
        );
        let calls = renderer.surface().ops.len();
        let displays = renderer
            .surface()
            .ops
            .iter()
            .filter(|op| **op == Op::Display)
            .count();
        assert_eq!(displays, 1);

        // Later render-due ticks without new data make no surface calls
        for n in 2..5 {
            let now = start.wrapping_add(n * RENDER);
            let outcome = scheduler.tick(now, &mut session, &mut state, &mut renderer);
            assert_eq!(outcome.render, RenderOutcome::Skipped);
        }
        assert_eq!(renderer.surface().ops.len(), calls);
    }

    #[test]
    fn test_scheduled_render_touches_surface_once() {
        two_values_render_once(1_000);
    }

    #[test]
    fn test_scheduled_render_across_counter_wrap() {
        two_values_render_once(u32::MAX - 10);
    }
}
