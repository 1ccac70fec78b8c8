//! SSD1306 / SH1106 OLED driver
//!
//! Async I2C driver for 128x64 page-addressed OLED controllers. The SH1106
//! has a 132-column RAM with the visible area starting at column 2; the
//! SSD1306 starts at column 0.

use embedded_hal_async::i2c::{I2c, Operation};

use crate::panel::PagePanel;

/// Default I2C address (0x3D with SA0 high)
pub const DEFAULT_ADDRESS: u8 = 0x3C;

/// Control byte: following bytes are commands
const CONTROL_COMMAND: u8 = 0x00;
/// Control byte: following bytes are display data
const CONTROL_DATA: u8 = 0x40;

#[allow(dead_code)]
mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_INVERSE: u8 = 0xA7;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_MEMORY_MODE: u8 = 0x20;
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    pub const SET_PAGE_ADDR: u8 = 0xB0;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
}

/// Controller family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Controller {
    Ssd1306,
    Sh1106,
}

impl Controller {
    /// First visible RAM column
    pub const fn column_offset(self) -> u8 {
        match self {
            Controller::Ssd1306 => 0,
            Controller::Sh1106 => 2,
        }
    }
}

/// 128x64 OLED panel on an async I2C bus
pub struct Ssd1306<I2C> {
    i2c: I2C,
    address: u8,
    controller: Controller,
}

impl<I2C: I2c> Ssd1306<I2C> {
    pub fn new(i2c: I2C, controller: Controller) -> Self {
        Self::with_address(i2c, controller, DEFAULT_ADDRESS)
    }

    pub fn with_address(i2c: I2C, controller: Controller, address: u8) -> Self {
        Self {
            i2c,
            address,
            controller,
        }
    }

    pub fn controller(&self) -> Controller {
        self.controller
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    async fn command(&mut self, cmd: u8) -> Result<(), I2C::Error> {
        self.i2c.write(self.address, &[CONTROL_COMMAND, cmd]).await
    }

    async fn commands(&mut self, cmds: &[u8]) -> Result<(), I2C::Error> {
        for &c in cmds {
            self.command(c).await?;
        }
        Ok(())
    }

    /// Set display contrast (0-255)
    pub async fn set_contrast(&mut self, contrast: u8) -> Result<(), I2C::Error> {
        self.commands(&[cmd::SET_CONTRAST, contrast]).await
    }

    /// Turn display on/off
    pub async fn set_display_on(&mut self, on: bool) -> Result<(), I2C::Error> {
        self.command(if on { cmd::DISPLAY_ON } else { cmd::DISPLAY_OFF })
            .await
    }

    /// Invert display colors
    pub async fn set_inverted(&mut self, inverted: bool) -> Result<(), I2C::Error> {
        self.command(if inverted { cmd::SET_INVERSE } else { cmd::SET_NORMAL })
            .await
    }
}

impl<I2C: I2c> PagePanel for Ssd1306<I2C> {
    type Error = I2C::Error;

    async fn init(&mut self) -> Result<(), Self::Error> {
        self.commands(&[
            cmd::DISPLAY_OFF,
            cmd::SET_CLOCK_DIV,
            0x80,
            cmd::SET_MUX_RATIO,
            0x3F, // 64 lines
            cmd::SET_DISPLAY_OFFSET,
            0x00,
            cmd::SET_START_LINE,
            cmd::SET_CHARGE_PUMP,
            0x14,
        ])
        .await?;

        if self.controller == Controller::Ssd1306 {
            // Page addressing, as on the SH1106
            self.commands(&[cmd::SET_MEMORY_MODE, 0x02]).await?;
        }

        self.commands(&[
            cmd::SET_SEG_REMAP,
            cmd::SET_COM_SCAN_DEC,
            cmd::SET_COM_PINS,
            0x12,
            cmd::SET_CONTRAST,
            0xCF,
            cmd::SET_PRECHARGE,
            0xF1,
            cmd::SET_VCOM_DETECT,
            0x40,
            cmd::SET_NORMAL,
            cmd::DISPLAY_ON,
        ])
        .await
    }

    async fn write_page(&mut self, page: u8, data: &[u8]) -> Result<(), Self::Error> {
        let column = self.controller.column_offset();
        self.commands(&[
            cmd::SET_PAGE_ADDR | (page & 0x07),
            cmd::SET_LOW_COLUMN | (column & 0x0F),
            cmd::SET_HIGH_COLUMN | (column >> 4),
        ])
        .await?;

        // Adjacent writes go out as one bus transfer
        self.i2c
            .transaction(
                self.address,
                &mut [Operation::Write(&[CONTROL_DATA]), Operation::Write(data)],
            )
            .await
    }
}
