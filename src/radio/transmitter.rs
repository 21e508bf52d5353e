// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Controller-side transmitter. TX only, no receive path.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use super::link::{controller_address, RF_CHANNEL, RF_SETUP};
use crate::drivers::nrf24l01::{bits, reg, timing, DriverError, Nrf24};
use crate::protocol::CommandWord;

/// All interrupts masked, CRC on, powered up, PTX.
const CONFIG_TX: u8 = bits::MASK_RX_DR | bits::MASK_TX_DS | bits::MASK_MAX_RT | bits::EN_CRC | bits::PWR_UP;

pub struct RadioTransmitter<SPI, CSN, CE, D> {
    dev: Nrf24<SPI, CSN, CE, D>,
    channel: u8,
}

impl<SPI, CSN, CE, D> RadioTransmitter<SPI, CSN, CE, D>
where
    SPI: SpiBus<u8>,
    CSN: OutputPin,
    CE: OutputPin<Error = CSN::Error>,
    D: DelayNs,
{
    pub fn new(dev: Nrf24<SPI, CSN, CE, D>, channel: u8) -> Self {
        Self { dev, channel }
    }

    pub fn free(self) -> Nrf24<SPI, CSN, CE, D> {
        self.dev
    }

    /// Power-on delay and TX-only bring-up addressed at controller channel `channel`.
    pub fn reset(&mut self) -> Result<(), DriverError<SPI, CSN>> {
        let d = &mut self.dev;
        d.delay_ms(timing::T_POR_MS);
        d.set_enable(false)?;

        d.write_register(reg::CONFIG, CONFIG_TX)?;
        d.write_register(reg::EN_AA, 0x00)?;
        d.write_register(reg::EN_RXADDR, 0x00)?;
        d.write_register(reg::SETUP_AW, bits::AW_3_BYTES)?;
        d.write_register(reg::SETUP_RETR, 0x00)?;
        d.write_register(reg::RF_CH, RF_CHANNEL)?;
        d.write_register(reg::RF_SETUP, RF_SETUP)?;
        d.clear_status(bits::RX_DR | bits::TX_DS | bits::MAX_RT)?;
        d.write_register(reg::DYNPD, 0x00)?;
        d.write_register(reg::FEATURE, 0x00)?;
        d.write_address(reg::TX_ADDR, &controller_address(self.channel))?;
        d.flush_tx()?;

        info!("transmitter up, controller id {=u8}", self.channel);
        Ok(())
    }

    /// Queue one payload and pulse CE for the standby→active window.
    pub fn transmit(&mut self, word: CommandWord) -> Result<(), DriverError<SPI, CSN>> {
        let d = &mut self.dev;
        d.write_payload(&word.to_le_bytes())?;
        d.set_enable(true)?;
        d.delay_us(timing::T_STBY2A_US);
        d.set_enable(false)?;
        d.clear_status(bits::TX_DS)?;
        Ok(())
    }
}
