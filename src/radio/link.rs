// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Robot-side radio link.
//!
//! The transceiver idles in RX mode on two pipes:
//!
//! - pipe 0, the controller channel: address = controller base + channel id
//! - pipe 1, the shared peer channel: fixed broadcast address
//!
//! Reception is interrupt driven ([`RadioLink::receive`] drains the whole RX FIFO per IRQ).
//! Transmission is a short blocking excursion into TX mode on the peer address.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use crate::drivers::nrf24l01::{bits, reg, timing, DriverError, Nrf24, ADDRESS_WIDTH, PAYLOAD_WIDTH};
use crate::protocol::CommandWord;
use crate::radio::Mailbox;
use crate::time::Instant;

/// RF channel, 2400 MHz + 76 MHz.
pub const RF_CHANNEL: u8 = 76;

/// Base address of the controller channel. The channel id is added to the least significant byte.
pub const CONTROLLER_BASE_ADDRESS: [u8; ADDRESS_WIDTH] = [0xC0, 0xE7, 0xE7];

/// Address shared by all robots for peer traffic.
pub const PEER_ADDRESS: [u8; ADDRESS_WIDTH] = [0xA5, 0xC3, 0xC3];

/// Pipe of controller commands.
pub const PIPE_CONTROLLER: u8 = 0;

/// Pipe of peer packets.
pub const PIPE_PEER: u8 = 1;

/// CRC on, 1-byte CRC, powered up, PRX. TX_DS and MAX_RT interrupts masked.
const CONFIG_RX: u8 = bits::MASK_TX_DS | bits::MASK_MAX_RT | bits::EN_CRC | bits::PWR_UP | bits::PRIM_RX;

/// 2 Mbps, 0 dBm.
pub(crate) const RF_SETUP: u8 = bits::RF_DR_HIGH | bits::RF_PWR_0DBM;

/// Address of the controller channel with the given id.
pub fn controller_address(channel: u8) -> [u8; ADDRESS_WIDTH] {
    let mut addr = CONTROLLER_BASE_ADDRESS;
    addr[0] = addr[0].wrapping_add(channel);
    addr
}

pub struct RadioLink<SPI, CSN, CE, D> {
    dev: Nrf24<SPI, CSN, CE, D>,
    channel: u8,
}

impl<SPI, CSN, CE, D> RadioLink<SPI, CSN, CE, D>
where
    SPI: SpiBus<u8>,
    CSN: OutputPin,
    CE: OutputPin<Error = CSN::Error>,
    D: DelayNs,
{
    /// Wrap a driver listening on controller channel `channel`. Call [`reset`](Self::reset)
    /// before use.
    pub fn new(dev: Nrf24<SPI, CSN, CE, D>, channel: u8) -> Self {
        Self { dev, channel }
    }

    #[inline]
    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn device(&mut self) -> &mut Nrf24<SPI, CSN, CE, D> {
        &mut self.dev
    }

    pub fn free(self) -> Nrf24<SPI, CSN, CE, D> {
        self.dev
    }

    /// Power-on delay, full register bring-up, flush both FIFOs, then RX standby with CE high.
    pub fn reset(&mut self) -> Result<(), DriverError<SPI, CSN>> {
        let d = &mut self.dev;
        d.delay_ms(timing::T_POR_MS);
        d.set_enable(false)?;

        d.write_register(reg::CONFIG, CONFIG_RX)?;
        d.write_register(reg::EN_AA, 0x00)?;
        d.write_register(reg::EN_RXADDR, bits::ERX_P0 | bits::ERX_P1)?;
        d.write_register(reg::SETUP_AW, bits::AW_3_BYTES)?;
        d.write_register(reg::SETUP_RETR, 0x00)?;
        d.write_register(reg::RF_CH, RF_CHANNEL)?;
        d.write_register(reg::RF_SETUP, RF_SETUP)?;
        d.clear_status(bits::RX_DR | bits::TX_DS | bits::MAX_RT)?;
        d.write_register(reg::RX_PW_P0, PAYLOAD_WIDTH as u8)?;
        d.write_register(reg::RX_PW_P1, PAYLOAD_WIDTH as u8)?;
        d.write_register(reg::DYNPD, 0x00)?;
        d.write_register(reg::FEATURE, 0x00)?;

        d.write_address(reg::RX_ADDR_P0, &controller_address(self.channel))?;
        d.write_address(reg::RX_ADDR_P1, &PEER_ADDRESS)?;
        d.write_address(reg::TX_ADDR, &PEER_ADDRESS)?;

        d.flush_tx()?;
        d.flush_rx()?;

        d.set_enable(true)?;
        d.delay_us(timing::T_STBY2A_US);

        info!("radio up on channel {=u8}, controller id {=u8}", RF_CHANNEL, self.channel);
        Ok(())
    }

    /// Send one payload on the peer address and return to RX. Blocks for roughly
    /// `2 × Tstby2a + Toa`.
    pub fn transmit(&mut self, word: impl Into<CommandWord>) -> Result<(), DriverError<SPI, CSN>> {
        let word = word.into();
        let d = &mut self.dev;

        d.set_enable(false)?;
        d.write_register(reg::CONFIG, CONFIG_RX & !bits::PRIM_RX)?;
        d.write_payload(&word.to_le_bytes())?;

        d.set_enable(true)?;
        d.delay_us(timing::T_STBY2A_US);
        d.set_enable(false)?;
        d.delay_us(timing::T_OA_US);

        d.write_register(reg::CONFIG, CONFIG_RX)?;
        d.clear_status(bits::TX_DS)?;
        d.set_enable(true)?;
        d.delay_us(timing::T_STBY2A_US);

        trace!("radio tx {=u32:#x}", word.0);
        Ok(())
    }

    /// IRQ handler body. Drains every pending payload, routing controller packets to the
    /// mailbox command slot and peer packets to its ring, then clears RX_DR.
    ///
    /// Returns the number of payloads popped (including dropped ones).
    pub fn receive(&mut self, mailbox: &Mailbox, now: Instant) -> Result<usize, DriverError<SPI, CSN>> {
        let mut count = 0;
        while !self.dev.fifo_status()?.rx_empty() {
            let pipe = self.dev.status()?.rx_pipe();
            let word = u32::from_le_bytes(self.dev.read_payload()?);
            count += 1;

            match pipe {
                Some(PIPE_CONTROLLER) => {
                    trace!("rx controller {=u32:#x}", word);
                    mailbox.post_command(CommandWord(word), now);
                }
                Some(PIPE_PEER) => {
                    trace!("rx peer {=u32:#x}", word);
                    mailbox.push_peer(word);
                }
                _ => trace!("rx dropped on pipe {}", pipe),
            }
        }
        self.dev.clear_status(bits::RX_DR)?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::nrf24l01::cmd;
    use crate::drivers::sim::{SimDelay, SimPin, SimRadio, SimSpi};
    use core::time::Duration;

    type SimLink = RadioLink<SimSpi, SimPin, SimPin, SimDelay>;

    fn link(channel: u8) -> (SimRadio, SimLink) {
        let sim = SimRadio::new();
        let mut link = RadioLink::new(sim.driver(), channel);
        link.reset().unwrap();
        sim.clear_log();
        (sim, link)
    }

    #[test]
    fn reset_programs_receive_mode() {
        let sim = SimRadio::new();
        let mut link = RadioLink::new(sim.driver(), 2);
        link.reset().unwrap();

        let chip = sim.chip();
        assert_eq!(chip.register(reg::CONFIG), 0x3B);
        assert_eq!(chip.register(reg::EN_AA), 0);
        assert_eq!(chip.register(reg::EN_RXADDR), 0b11);
        assert_eq!(chip.register(reg::SETUP_AW), 0b01);
        assert_eq!(chip.register(reg::RF_CH), RF_CHANNEL);
        assert_eq!(chip.register(reg::RF_SETUP), 0x0E);
        assert_eq!(chip.register(reg::RX_PW_P0), 4);
        assert_eq!(chip.register(reg::RX_PW_P1), 4);
        assert_eq!(chip.address(reg::RX_ADDR_P0), [0xC2, 0xE7, 0xE7]);
        assert_eq!(chip.address(reg::RX_ADDR_P1), PEER_ADDRESS);
        assert_eq!(chip.address(reg::TX_ADDR), PEER_ADDRESS);
        assert!(chip.ce_high);
        assert!(chip.delayed_ns >= 100_000_000);
        assert_eq!(chip.writes_while_enabled, 0);

        let flush_tx = chip.commands.iter().position(|&c| c == cmd::FLUSH_TX);
        let flush_rx = chip.commands.iter().position(|&c| c == cmd::FLUSH_RX);
        assert!(flush_tx.is_some() && flush_rx.is_some());
    }

    #[test]
    fn reset_is_idempotent() {
        let (sim, mut link) = link(0);
        link.reset().unwrap();
        assert_eq!(sim.chip().register(reg::CONFIG), 0x3B);
        assert_eq!(sim.chip().writes_while_enabled, 0);
    }

    #[test]
    fn receive_routes_by_pipe() {
        let (sim, mut link) = link(0);
        let mailbox = Mailbox::new(Duration::from_millis(500));
        sim.inject(1, 0x1111_1111);
        sim.inject(0, 0x0000_0040);
        sim.inject(5, 0xDEAD_BEEF);

        let now = Instant::from_millis(1);
        assert_eq!(link.receive(&mailbox, now).unwrap(), 3);

        assert_eq!(mailbox.command(now), CommandWord(0x40));
        assert_eq!(mailbox.peer_messages().as_slice(), &[0x1111_1111]);
        assert_eq!(sim.chip().rx_pending(), 0);
        assert!(!link.device().status().unwrap().rx_dr());
    }

    #[test]
    fn each_packet_replaces_the_command() {
        let (sim, mut link) = link(0);
        let mailbox = Mailbox::new(Duration::from_millis(500));
        sim.inject(0, 0x0000_00FF);
        sim.inject(0, 0x0000_0100);
        link.receive(&mailbox, Instant::ZERO).unwrap();
        assert_eq!(mailbox.command(Instant::ZERO), CommandWord(0x0000_0100));
    }

    #[test]
    fn receive_arms_the_watchdog() {
        let (sim, mut link) = link(0);
        let mailbox = Mailbox::new(Duration::from_millis(500));
        sim.inject(0, 0x0000_0040);
        link.receive(&mailbox, Instant::from_millis(100)).unwrap();
        assert_eq!(mailbox.command(Instant::from_millis(600)), CommandWord(0x40));
        assert_eq!(mailbox.command(Instant::from_millis(601)), CommandWord::STOP);
    }

    #[test]
    fn transmit_goes_on_air_and_returns_to_rx() {
        let (sim, mut link) = link(0);
        link.transmit(0x0403_0201u32).unwrap();

        let chip = sim.chip();
        assert_eq!(chip.air.len(), 1);
        assert_eq!(chip.air[0].payload, [1, 2, 3, 4]);
        assert_eq!(chip.air[0].address, PEER_ADDRESS);
        assert_eq!(chip.register(reg::CONFIG), 0x3B);
        assert_eq!(chip.register(reg::STATUS) & bits::TX_DS, 0);
        assert!(chip.ce_high);
        assert_eq!(chip.writes_while_enabled, 0);
    }

    #[test]
    fn transmit_does_not_disturb_reception() {
        let (sim, mut link) = link(0);
        let mailbox = Mailbox::new(Duration::from_millis(500));
        sim.inject(1, 7);
        link.transmit(CommandWord(9)).unwrap();
        link.receive(&mailbox, Instant::ZERO).unwrap();
        assert_eq!(mailbox.peer_messages().as_slice(), &[7]);
    }
}
