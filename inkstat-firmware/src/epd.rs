//! SSD1680 e-paper driver
//!
//! Driver for 2.9" 128x296 SSD1680-based black/white e-paper panels via
//! SPI, used in landscape (296x128). Drawing goes to a 1-bpp frame buffer;
//! [`Flush`] writes it to panel RAM and runs a full refresh.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;
use inkstat_display::{DisplayError, Flush};

/// Logical (landscape) dimensions
pub const WIDTH: u32 = 296;
pub const HEIGHT: u32 = 128;

/// Panel-native dimensions: 128 source lines, 296 gate lines
const SOURCES: usize = 128;
const GATES: usize = 296;
const ROW_BYTES: usize = SOURCES / 8;
const BUFFER_SIZE: usize = ROW_BYTES * GATES;

/// BUSY poll period and limit (full refresh takes a few seconds)
const BUSY_POLL_MS: u32 = 10;
const BUSY_TIMEOUT_MS: u32 = 10_000;

/// SSD1680 commands
mod cmd {
    pub const DRIVER_OUTPUT_CONTROL: u8 = 0x01;
    pub const DATA_ENTRY_MODE: u8 = 0x11;
    pub const SW_RESET: u8 = 0x12;
    pub const TEMP_SENSOR: u8 = 0x18;
    pub const MASTER_ACTIVATION: u8 = 0x20;
    pub const DISPLAY_UPDATE_CONTROL_1: u8 = 0x21;
    pub const DISPLAY_UPDATE_CONTROL_2: u8 = 0x22;
    pub const WRITE_RAM_BW: u8 = 0x24;
    pub const BORDER_WAVEFORM: u8 = 0x3C;
    pub const SET_RAM_X_RANGE: u8 = 0x44;
    pub const SET_RAM_Y_RANGE: u8 = 0x45;
    pub const SET_RAM_X_COUNTER: u8 = 0x4E;
    pub const SET_RAM_Y_COUNTER: u8 = 0x4F;
}

/// SSD1680 e-paper driver
pub struct Ssd1680<SPI, DC, RST, BUSY, DELAY> {
    spi: SPI,
    dc: DC,
    rst: RST,
    busy: BUSY,
    delay: DELAY,
    /// Panel-native frame buffer; bit set = white
    buffer: [u8; BUFFER_SIZE],
}

impl<SPI, DC, RST, BUSY, DELAY> Ssd1680<SPI, DC, RST, BUSY, DELAY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
    DELAY: DelayNs,
{
    /// Create a driver with an all-white frame buffer
    pub fn new(spi: SPI, dc: DC, rst: RST, busy: BUSY, delay: DELAY) -> Self {
        Self {
            spi,
            dc,
            rst,
            busy,
            delay,
            buffer: [0xFF; BUFFER_SIZE],
        }
    }

    /// Reset and configure the panel
    pub fn init(&mut self) -> Result<(), DisplayError> {
        self.rst.set_low().map_err(|_| DisplayError::Communication)?;
        self.delay.delay_ms(10);
        self.rst.set_high().map_err(|_| DisplayError::Communication)?;
        self.delay.delay_ms(10);
        self.wait_idle()?;

        self.command(cmd::SW_RESET, &[])?;
        self.wait_idle()?;

        let last_gate = (GATES - 1) as u16;
        self.command(
            cmd::DRIVER_OUTPUT_CONTROL,
            &[last_gate as u8, (last_gate >> 8) as u8, 0x00],
        )?;
        // X then Y increment
        self.command(cmd::DATA_ENTRY_MODE, &[0x03])?;
        self.command(cmd::SET_RAM_X_RANGE, &[0x00, (ROW_BYTES - 1) as u8])?;
        self.command(
            cmd::SET_RAM_Y_RANGE,
            &[0x00, 0x00, last_gate as u8, (last_gate >> 8) as u8],
        )?;
        self.command(cmd::BORDER_WAVEFORM, &[0x05])?;
        self.command(cmd::DISPLAY_UPDATE_CONTROL_1, &[0x00, 0x80])?;
        // Internal temperature sensor
        self.command(cmd::TEMP_SENSOR, &[0x80])?;
        self.wait_idle()
    }

    fn command(&mut self, command: u8, data: &[u8]) -> Result<(), DisplayError> {
        self.dc.set_low().map_err(|_| DisplayError::Communication)?;
        self.spi
            .write(&[command])
            .map_err(|_| DisplayError::Communication)?;
        if !data.is_empty() {
            self.dc.set_high().map_err(|_| DisplayError::Communication)?;
            self.spi
                .write(data)
                .map_err(|_| DisplayError::Communication)?;
        }
        Ok(())
    }

    /// Wait for BUSY to drop
    fn wait_idle(&mut self) -> Result<(), DisplayError> {
        let mut waited = 0;
        while self.busy.is_high().map_err(|_| DisplayError::Communication)? {
            if waited >= BUSY_TIMEOUT_MS {
                return Err(DisplayError::Timeout);
            }
            self.delay.delay_ms(BUSY_POLL_MS);
            waited += BUSY_POLL_MS;
        }
        Ok(())
    }

    /// Map a landscape pixel to its buffer byte and bit mask
    fn locate(x: u32, y: u32) -> (usize, u8) {
        // Rotated 90 degrees: logical rows run along the source lines
        let source = y as usize;
        let gate = GATES - 1 - x as usize;
        (gate * ROW_BYTES + source / 8, 0x80 >> (source % 8))
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: BinaryColor) {
        let (index, mask) = Self::locate(x, y);
        match color {
            // On is ink
            BinaryColor::On => self.buffer[index] &= !mask,
            BinaryColor::Off => self.buffer[index] |= mask,
        }
    }
}

impl<SPI, DC, RST, BUSY, DELAY> OriginDimensions for Ssd1680<SPI, DC, RST, BUSY, DELAY> {
    fn size(&self) -> Size {
        Size::new(WIDTH, HEIGHT)
    }
}

impl<SPI, DC, RST, BUSY, DELAY> DrawTarget for Ssd1680<SPI, DC, RST, BUSY, DELAY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
    DELAY: DelayNs,
{
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            let (x, y) = (point.x as u32, point.y as u32);
            if x < WIDTH && y < HEIGHT {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let fill = match color {
            BinaryColor::On => 0x00,
            BinaryColor::Off => 0xFF,
        };
        self.buffer.fill(fill);
        Ok(())
    }
}

impl<SPI, DC, RST, BUSY, DELAY> Flush for Ssd1680<SPI, DC, RST, BUSY, DELAY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
    DELAY: DelayNs,
{
    /// Write the whole buffer and run a full refresh
    fn flush(&mut self) -> Result<(), DisplayError> {
        self.command(cmd::SET_RAM_X_COUNTER, &[0x00])?;
        self.command(cmd::SET_RAM_Y_COUNTER, &[0x00, 0x00])?;

        self.dc.set_low().map_err(|_| DisplayError::Communication)?;
        self.spi
            .write(&[cmd::WRITE_RAM_BW])
            .map_err(|_| DisplayError::Communication)?;
        self.dc.set_high().map_err(|_| DisplayError::Communication)?;
        self.spi
            .write(&self.buffer)
            .map_err(|_| DisplayError::Communication)?;

        self.command(cmd::DISPLAY_UPDATE_CONTROL_2, &[0xF7])?;
        self.command(cmd::MASTER_ACTIVATION, &[])?;
        self.wait_idle()
    }
}
