// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Controller command word.
//!
//! One 32-bit little-endian payload per packet:
//!
//! | Byte | Content |
//! | ---- | ------- |
//! | 0 | x axis, `i8` |
//! | 1 | y axis, `i8` |
//! | 2 | turn axis, `i8` |
//! | 3 | buttons, bit 0 = reset |

/// Raw axis counts inside which an axis reads as zero.
pub const AXIS_DEADZONE: i8 = 8;

/// Full-scale axis reading.
const AXIS_SCALE: f32 = 1.0 / 128.0;

/// Button bits carried in byte 3.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Buttons {
    raw: u8,
}

impl Buttons {
    pub const NONE: Self = Self { raw: 0 };
    pub const RESET: Self = Self { raw: 1 << 0 };

    #[inline]
    pub const fn from_raw(raw: u8) -> Self {
        Self { raw }
    }

    #[inline]
    pub fn raw(&self) -> u8 {
        self.raw
    }

    #[inline]
    pub fn reset(&self) -> bool {
        (self.raw & Self::RESET.raw) != 0
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandWord(pub u32);

impl CommandWord {
    /// All axes centered, no buttons. Also what a stale link reads as.
    pub const STOP: Self = Self(0);

    pub fn new(x: i8, y: i8, turn: i8, buttons: Buttons) -> Self {
        Self::from_le_bytes([x as u8, y as u8, turn as u8, buttons.raw()])
    }

    #[inline]
    pub fn from_le_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_le_bytes(bytes))
    }

    #[inline]
    pub fn to_le_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    #[inline]
    pub fn x(&self) -> i8 {
        self.0 as u8 as i8
    }

    #[inline]
    pub fn y(&self) -> i8 {
        (self.0 >> 8) as u8 as i8
    }

    #[inline]
    pub fn turn(&self) -> i8 {
        (self.0 >> 16) as u8 as i8
    }

    #[inline]
    pub fn buttons(&self) -> Buttons {
        Buttons::from_raw((self.0 >> 24) as u8)
    }
}

impl From<u32> for CommandWord {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Zero readings whose magnitude does not exceed `zone`.
#[inline]
pub fn deadzone(input: i8, zone: i8) -> i8 {
    if input > zone || input < -zone {
        input
    } else {
        0
    }
}

/// Axes in `[-1, 1)`, in the body frame: +x right, +y forward, +turn counter-clockwise.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Axes {
    pub x: f32,
    pub y: f32,
    pub turn: f32,
}

impl Axes {
    /// Deadzone-filter and scale the stick bytes. The y and turn sticks read inverted.
    pub fn decode(word: CommandWord) -> Self {
        let scale = |raw: i8| f32::from(deadzone(raw, AXIS_DEADZONE)) * AXIS_SCALE;
        Self {
            x: scale(word.x()),
            y: -scale(word.y()),
            turn: -scale(word.turn()),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.turn == 0.0
    }
}

/// Map a 12-bit joystick ADC reading, centered at 2048, onto a signed axis byte.
pub fn axis_from_adc(raw: u16) -> i8 {
    let centered = i32::from(raw.min(4095)) - 2048;
    (centered >> 4).clamp(i32::from(i8::MIN), i32::from(i8::MAX)) as i8
}
