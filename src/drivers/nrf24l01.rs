// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Nordic nRF24L01+ 2.4 GHz transceiver.
//!
//! Register-level access only: SPI command framing, register reads and writes, payload FIFOs, and
//! the CE line. Link policy (bring-up order, mode switching, packet routing) lives in
//! [`crate::radio`].
//!
//! Every SPI command clocks out the STATUS register on its first byte, so each transaction
//! returns a [`Status`].

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

/// SPI command bytes.
pub mod cmd {
    pub const R_REGISTER: u8 = 0x00;
    pub const W_REGISTER: u8 = 0x20;
    pub const REGISTER_MASK: u8 = 0x1F;
    pub const R_RX_PAYLOAD: u8 = 0x61;
    pub const W_TX_PAYLOAD: u8 = 0xA0;
    pub const FLUSH_TX: u8 = 0xE1;
    pub const FLUSH_RX: u8 = 0xE2;
    pub const NOP: u8 = 0xFF;
}

// Register addresses
pub mod reg {
    pub const CONFIG: u8 = 0x00;
    pub const EN_AA: u8 = 0x01;
    pub const EN_RXADDR: u8 = 0x02;
    pub const SETUP_AW: u8 = 0x03;
    pub const SETUP_RETR: u8 = 0x04;
    pub const RF_CH: u8 = 0x05;
    pub const RF_SETUP: u8 = 0x06;
    pub const STATUS: u8 = 0x07;
    pub const RX_ADDR_P0: u8 = 0x0A;
    pub const RX_ADDR_P1: u8 = 0x0B;
    pub const TX_ADDR: u8 = 0x10;
    pub const RX_PW_P0: u8 = 0x11;
    pub const RX_PW_P1: u8 = 0x12;
    pub const FIFO_STATUS: u8 = 0x17;
    pub const DYNPD: u8 = 0x1C;
    pub const FEATURE: u8 = 0x1D;
}

/// Register bit fields.
pub mod bits {
    // CONFIG
    pub const MASK_RX_DR: u8 = 1 << 6;
    pub const MASK_TX_DS: u8 = 1 << 5;
    pub const MASK_MAX_RT: u8 = 1 << 4;
    pub const EN_CRC: u8 = 1 << 3;
    pub const CRCO: u8 = 1 << 2;
    pub const PWR_UP: u8 = 1 << 1;
    pub const PRIM_RX: u8 = 1 << 0;

    // EN_RXADDR
    pub const ERX_P0: u8 = 1 << 0;
    pub const ERX_P1: u8 = 1 << 1;

    // SETUP_AW
    pub const AW_3_BYTES: u8 = 0b01;

    // RF_SETUP
    pub const RF_DR_HIGH: u8 = 1 << 3;
    pub const RF_PWR_0DBM: u8 = 0b11 << 1;

    // STATUS
    pub const RX_DR: u8 = 1 << 6;
    pub const TX_DS: u8 = 1 << 5;
    pub const MAX_RT: u8 = 1 << 4;
}

/// Datasheet timing parameters.
pub mod timing {
    /// Power-on reset.
    pub const T_POR_MS: u32 = 100;
    /// Standby to TX/RX active.
    pub const T_STBY2A_US: u32 = 130;
    /// CE high to CSN low.
    pub const T_PECE2CSN_US: u32 = 4;
    /// On-air time of one 4-byte payload at 2 Mbps, rounded up.
    pub const T_OA_US: u32 = 50;
}

/// Address width configured by the radio layer.
pub const ADDRESS_WIDTH: usize = 3;

/// Fixed payload width.
pub const PAYLOAD_WIDTH: usize = 4;

/// STATUS register, clocked out on the first byte of every command.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Status {
    raw: u8,
}

impl Status {
    pub const fn from_raw(raw: u8) -> Self {
        Self { raw }
    }

    #[inline]
    pub fn raw(&self) -> u8 {
        self.raw
    }

    /// Data ready in the RX FIFO.
    #[inline]
    pub fn rx_dr(&self) -> bool {
        (self.raw & bits::RX_DR) != 0
    }

    /// Data sent from the TX FIFO.
    #[inline]
    pub fn tx_ds(&self) -> bool {
        (self.raw & bits::TX_DS) != 0
    }

    /// Maximum retransmits reached.
    #[inline]
    pub fn max_rt(&self) -> bool {
        (self.raw & bits::MAX_RT) != 0
    }

    /// Pipe of the payload at the head of the RX FIFO, `None` if the FIFO is empty.
    #[inline]
    pub fn rx_pipe(&self) -> Option<u8> {
        match (self.raw >> 1) & 0b111 {
            0b111 => None,
            pipe => Some(pipe),
        }
    }

    /// TX FIFO full.
    #[inline]
    pub fn tx_full(&self) -> bool {
        (self.raw & (1 << 0)) != 0
    }
}

/// FIFO_STATUS register.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FifoStatus {
    raw: u8,
}

impl FifoStatus {
    pub const fn from_raw(raw: u8) -> Self {
        Self { raw }
    }

    #[inline]
    pub fn raw(&self) -> u8 {
        self.raw
    }

    #[inline]
    pub fn rx_empty(&self) -> bool {
        (self.raw & (1 << 0)) != 0
    }

    #[inline]
    pub fn rx_full(&self) -> bool {
        (self.raw & (1 << 1)) != 0
    }

    #[inline]
    pub fn tx_empty(&self) -> bool {
        (self.raw & (1 << 4)) != 0
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error<S, P> {
    /// SPI bus failure.
    Spi(S),
    /// CSN or CE line failure.
    Pin(P),
}

/// nRF24L01+ on a dedicated SPI bus with manual CSN and CE lines.
pub struct Nrf24<SPI, CSN, CE, D> {
    spi: SPI,
    csn: CSN,
    ce: CE,
    delay: D,
    enabled: bool,
}

/// Error type of a driver built on `SPI` and `CSN`.
pub type DriverError<SPI, CSN> = Error<
    <SPI as embedded_hal::spi::ErrorType>::Error,
    <CSN as embedded_hal::digital::ErrorType>::Error,
>;

impl<SPI, CSN, CE, D> Nrf24<SPI, CSN, CE, D>
where
    SPI: SpiBus<u8>,
    CSN: OutputPin,
    CE: OutputPin<Error = CSN::Error>,
    D: DelayNs,
{
    /// Take ownership of the bus and lines, leaving CSN deasserted and CE low.
    pub fn new(spi: SPI, mut csn: CSN, mut ce: CE, delay: D) -> Result<Self, DriverError<SPI, CSN>> {
        csn.set_high().map_err(Error::Pin)?;
        ce.set_low().map_err(Error::Pin)?;
        Ok(Self {
            spi,
            csn,
            ce,
            delay,
            enabled: false,
        })
    }

    pub fn free(self) -> (SPI, CSN, CE, D) {
        (self.spi, self.csn, self.ce, self.delay)
    }

    /// Drive the CE line.
    pub fn set_enable(&mut self, on: bool) -> Result<(), DriverError<SPI, CSN>> {
        if on {
            self.ce.set_high().map_err(Error::Pin)?;
        } else {
            self.ce.set_low().map_err(Error::Pin)?;
        }
        self.enabled = on;
        Ok(())
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    #[inline]
    pub fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// One CSN-framed command. `data` is transferred in place after the command byte.
    ///
    /// CSN is released even if the transfer fails.
    pub fn transaction(&mut self, command: u8, data: &mut [u8]) -> Result<Status, DriverError<SPI, CSN>> {
        self.csn.set_low().map_err(Error::Pin)?;
        let result = self.exchange(command, data);
        let released = self.csn.set_high().map_err(Error::Pin);
        let status = result?;
        released?;
        Ok(status)
    }

    fn exchange(&mut self, command: u8, data: &mut [u8]) -> Result<Status, DriverError<SPI, CSN>> {
        let mut head = [command];
        self.spi.transfer_in_place(&mut head).map_err(Error::Spi)?;
        if !data.is_empty() {
            self.spi.transfer_in_place(data).map_err(Error::Spi)?;
        }
        self.spi.flush().map_err(Error::Spi)?;
        Ok(Status::from_raw(head[0]))
    }

    /// Single-byte command with no data phase.
    #[inline]
    pub fn command(&mut self, command: u8) -> Result<Status, DriverError<SPI, CSN>> {
        self.transaction(command, &mut [])
    }

    pub fn status(&mut self) -> Result<Status, DriverError<SPI, CSN>> {
        self.command(cmd::NOP)
    }

    pub fn read_register(&mut self, addr: u8) -> Result<u8, DriverError<SPI, CSN>> {
        let mut buf = [0u8];
        self.transaction(cmd::R_REGISTER | (addr & cmd::REGISTER_MASK), &mut buf)?;
        Ok(buf[0])
    }

    pub fn fifo_status(&mut self) -> Result<FifoStatus, DriverError<SPI, CSN>> {
        Ok(FifoStatus::from_raw(self.read_register(reg::FIFO_STATUS)?))
    }

    /// Write a register. Writes are undefined while CE is high, so an enabled device is dropped
    /// to standby for the write and re-enabled afterwards.
    pub fn write_register(&mut self, addr: u8, value: u8) -> Result<(), DriverError<SPI, CSN>> {
        self.write_register_bytes(addr, &[value])
    }

    /// Write a multi-byte address register, least significant byte first.
    pub fn write_address(&mut self, addr: u8, address: &[u8; ADDRESS_WIDTH]) -> Result<(), DriverError<SPI, CSN>> {
        self.write_register_bytes(addr, address)
    }

    pub fn read_address(&mut self, addr: u8) -> Result<[u8; ADDRESS_WIDTH], DriverError<SPI, CSN>> {
        let mut buf = [0u8; ADDRESS_WIDTH];
        self.transaction(cmd::R_REGISTER | (addr & cmd::REGISTER_MASK), &mut buf)?;
        Ok(buf)
    }

    fn write_register_bytes(&mut self, addr: u8, bytes: &[u8]) -> Result<(), DriverError<SPI, CSN>> {
        let mut buf = [0u8; ADDRESS_WIDTH];
        let len = bytes.len().min(ADDRESS_WIDTH);
        buf[..len].copy_from_slice(&bytes[..len]);

        let command = cmd::W_REGISTER | (addr & cmd::REGISTER_MASK);
        if self.enabled {
            self.ce.set_low().map_err(Error::Pin)?;
            let result = self.transaction(command, &mut buf[..len]);
            self.ce.set_high().map_err(Error::Pin)?;
            self.delay.delay_us(timing::T_PECE2CSN_US);
            result?;
        } else {
            self.transaction(command, &mut buf[..len])?;
        }
        Ok(())
    }

    /// Pop one payload from the RX FIFO.
    pub fn read_payload(&mut self) -> Result<[u8; PAYLOAD_WIDTH], DriverError<SPI, CSN>> {
        let mut buf = [0u8; PAYLOAD_WIDTH];
        self.transaction(cmd::R_RX_PAYLOAD, &mut buf)?;
        Ok(buf)
    }

    /// Push one payload onto the TX FIFO.
    pub fn write_payload(&mut self, payload: &[u8; PAYLOAD_WIDTH]) -> Result<Status, DriverError<SPI, CSN>> {
        let mut buf = *payload;
        self.transaction(cmd::W_TX_PAYLOAD, &mut buf)
    }

    pub fn flush_tx(&mut self) -> Result<Status, DriverError<SPI, CSN>> {
        self.command(cmd::FLUSH_TX)
    }

    pub fn flush_rx(&mut self) -> Result<Status, DriverError<SPI, CSN>> {
        self.command(cmd::FLUSH_RX)
    }

    /// Clear STATUS interrupt flags (write-one-to-clear).
    pub fn clear_status(&mut self, flags: u8) -> Result<(), DriverError<SPI, CSN>> {
        self.write_register(reg::STATUS, flags & (bits::RX_DR | bits::TX_DS | bits::MAX_RT))
    }
}
