// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Simulated nRF24L01+ behind `embedded-hal` traits, for host tests.
//!
//! Models the register file, 3-deep RX/TX FIFOs, STATUS flags, CSN framing and CE edges. A TX
//! payload goes "on air" on a CE rising edge while powered up in PTX mode.

use std::cell::{Ref, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::spi::{self, SpiBus};

use super::nrf24l01::{bits, cmd, reg, Nrf24, PAYLOAD_WIDTH};

const FIFO_DEPTH: usize = 3;

fn is_address_register(addr: u8) -> bool {
    matches!(addr, reg::RX_ADDR_P0 | reg::RX_ADDR_P1 | reg::TX_ADDR)
}

/// Payload transmitted by the simulated chip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sent {
    pub address: Vec<u8>,
    pub payload: [u8; PAYLOAD_WIDTH],
}

#[derive(Default)]
pub struct Chip {
    regs: [u8; 0x20],
    addresses: BTreeMap<u8, Vec<u8>>,
    flags: u8,
    rx: VecDeque<(u8, [u8; PAYLOAD_WIDTH])>,
    tx: VecDeque<[u8; PAYLOAD_WIDTH]>,
    op: Option<(u8, usize)>,
    reading: [u8; PAYLOAD_WIDTH],
    writing: Vec<u8>,

    pub csn_high: bool,
    pub ce_high: bool,
    pub air: Vec<Sent>,
    pub commands: Vec<u8>,
    pub writes_while_enabled: usize,
    pub delayed_ns: u64,
}

impl Chip {
    pub fn register(&self, addr: u8) -> u8 {
        match addr {
            reg::STATUS => self.status(),
            reg::FIFO_STATUS => self.fifo_status(),
            _ => self.regs[addr as usize],
        }
    }

    pub fn address(&self, addr: u8) -> Vec<u8> {
        self.addresses.get(&addr).cloned().unwrap_or_default()
    }

    pub fn rx_pending(&self) -> usize {
        self.rx.len()
    }

    fn status(&self) -> u8 {
        let pipe = self.rx.front().map_or(0b111, |(pipe, _)| *pipe);
        let full = u8::from(self.tx.len() >= FIFO_DEPTH);
        self.flags | (pipe << 1) | full
    }

    fn fifo_status(&self) -> u8 {
        let mut raw = 0;
        if self.rx.is_empty() {
            raw |= 1 << 0;
        }
        if self.rx.len() >= FIFO_DEPTH {
            raw |= 1 << 1;
        }
        if self.tx.is_empty() {
            raw |= 1 << 4;
        }
        raw
    }

    fn exchange(&mut self, byte: u8) -> u8 {
        assert!(!self.csn_high, "SPI traffic with CSN deasserted");
        match self.op.take() {
            None => {
                let status = self.status();
                self.begin(byte);
                self.op = Some((byte, 0));
                status
            }
            Some((command, index)) => {
                let out = self.data(command, index, byte);
                self.op = Some((command, index + 1));
                out
            }
        }
    }

    fn begin(&mut self, command: u8) {
        self.commands.push(command);
        match command {
            cmd::FLUSH_TX => self.tx.clear(),
            cmd::FLUSH_RX => self.rx.clear(),
            cmd::R_RX_PAYLOAD => {
                self.reading = self.rx.pop_front().map_or([0; PAYLOAD_WIDTH], |(_, p)| p);
            }
            cmd::W_TX_PAYLOAD => self.writing.clear(),
            c if c & 0xE0 == cmd::W_REGISTER && self.ce_high => self.writes_while_enabled += 1,
            _ => {}
        }
    }

    fn data(&mut self, command: u8, index: usize, byte: u8) -> u8 {
        let addr = command & cmd::REGISTER_MASK;
        match command {
            cmd::R_RX_PAYLOAD => self.reading.get(index).copied().unwrap_or(0),
            cmd::W_TX_PAYLOAD => {
                self.writing.push(byte);
                0
            }
            c if c & 0xE0 == cmd::R_REGISTER && is_address_register(addr) => {
                self.address(addr).get(index).copied().unwrap_or(0)
            }
            c if c & 0xE0 == cmd::R_REGISTER => self.register(addr),
            c if c & 0xE0 == cmd::W_REGISTER && is_address_register(addr) => {
                let entry = self.addresses.entry(addr).or_default();
                entry.resize(index + 1, 0);
                entry[index] = byte;
                0
            }
            c if c & 0xE0 == cmd::W_REGISTER && addr == reg::STATUS => {
                self.flags &= !(byte & (bits::RX_DR | bits::TX_DS | bits::MAX_RT));
                0
            }
            c if c & 0xE0 == cmd::W_REGISTER => {
                self.regs[addr as usize] = byte;
                0
            }
            _ => 0,
        }
    }

    fn select(&mut self, selected: bool) {
        if !selected {
            if let Some((cmd::W_TX_PAYLOAD, _)) = self.op {
                let mut payload = [0; PAYLOAD_WIDTH];
                let n = self.writing.len().min(PAYLOAD_WIDTH);
                payload[..n].copy_from_slice(&self.writing[..n]);
                if self.tx.len() < FIFO_DEPTH {
                    self.tx.push_back(payload);
                }
            }
            self.op = None;
        }
        self.csn_high = !selected;
    }

    fn enable(&mut self, high: bool) {
        let rising = high && !self.ce_high;
        self.ce_high = high;
        let config = self.regs[reg::CONFIG as usize];
        if rising && config & bits::PWR_UP != 0 && config & bits::PRIM_RX == 0 {
            let address = self.address(reg::TX_ADDR);
            while let Some(payload) = self.tx.pop_front() {
                self.air.push(Sent {
                    address: address.clone(),
                    payload,
                });
                self.flags |= bits::TX_DS;
            }
        }
    }
}

/// Handle to a simulated chip; hands out the bus, lines, and delay wired to it.
#[derive(Clone)]
pub struct SimRadio {
    chip: Rc<RefCell<Chip>>,
}

pub type SimNrf24 = Nrf24<SimSpi, SimPin, SimPin, SimDelay>;

impl SimRadio {
    pub fn new() -> Self {
        let chip = Chip {
            csn_high: true,
            ..Chip::default()
        };
        Self {
            chip: Rc::new(RefCell::new(chip)),
        }
    }

    pub fn driver(&self) -> SimNrf24 {
        Nrf24::new(
            SimSpi(self.chip.clone()),
            SimPin(self.chip.clone(), Line::Csn),
            SimPin(self.chip.clone(), Line::Ce),
            SimDelay(self.chip.clone()),
        )
        .unwrap()
    }

    pub fn chip(&self) -> Ref<'_, Chip> {
        self.chip.borrow()
    }

    /// Receive a payload on `pipe` and raise RX_DR. Dropped if the RX FIFO is full.
    pub fn inject(&self, pipe: u8, word: u32) {
        let mut chip = self.chip.borrow_mut();
        if chip.rx.len() < FIFO_DEPTH {
            chip.rx.push_back((pipe, word.to_le_bytes()));
        }
        chip.flags |= bits::RX_DR;
    }

    /// Forget recorded traffic.
    pub fn clear_log(&self) {
        let mut chip = self.chip.borrow_mut();
        chip.commands.clear();
        chip.air.clear();
        chip.writes_while_enabled = 0;
        chip.delayed_ns = 0;
    }
}

pub struct SimSpi(Rc<RefCell<Chip>>);

impl spi::ErrorType for SimSpi {
    type Error = Infallible;
}

impl SpiBus<u8> for SimSpi {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Infallible> {
        let mut chip = self.0.borrow_mut();
        for w in words.iter_mut() {
            *w = chip.exchange(0);
        }
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Infallible> {
        let mut chip = self.0.borrow_mut();
        for &w in words {
            chip.exchange(w);
        }
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Infallible> {
        let mut chip = self.0.borrow_mut();
        let len = read.len().max(write.len());
        for i in 0..len {
            let out = chip.exchange(write.get(i).copied().unwrap_or(0));
            if let Some(r) = read.get_mut(i) {
                *r = out;
            }
        }
        Ok(())
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Infallible> {
        let mut chip = self.0.borrow_mut();
        for w in words.iter_mut() {
            *w = chip.exchange(*w);
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

#[derive(Copy, Clone)]
enum Line {
    Csn,
    Ce,
}

pub struct SimPin(Rc<RefCell<Chip>>, Line);

impl digital::ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        let mut chip = self.0.borrow_mut();
        match self.1 {
            Line::Csn => chip.select(true),
            Line::Ce => chip.enable(false),
        }
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        let mut chip = self.0.borrow_mut();
        match self.1 {
            Line::Csn => chip.select(false),
            Line::Ce => chip.enable(true),
        }
        Ok(())
    }
}

pub struct SimDelay(Rc<RefCell<Chip>>);

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().delayed_ns += u64::from(ns);
    }
}
