use std::fmt;

use crate::error::Hx711Error;

/// HX711 gain; also selects the sampled channel (A for 128/64, B for 32).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Gain {
    #[default]
    Gain128,
    Gain64,
    Gain32,
}

impl Gain {
    /// All supported gains.
    pub const ALL: [Gain; 3] = [Gain::Gain128, Gain::Gain64, Gain::Gain32];

    /// Trailing byte of the request frame.
    #[must_use]
    pub fn command_byte(self) -> u8 {
        match self {
            Gain::Gain128 => 0x80,
            Gain::Gain64 => 0xE0,
            Gain::Gain32 => 0xC0,
        }
    }

    /// Amplification factor.
    #[must_use]
    pub fn factor(self) -> u32 {
        match self {
            Gain::Gain128 => 128,
            Gain::Gain64 => 64,
            Gain::Gain32 => 32,
        }
    }
}

impl TryFrom<u32> for Gain {
    type Error = Hx711Error;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            128 => Ok(Gain::Gain128),
            64 => Ok(Gain::Gain64),
            32 => Ok(Gain::Gain32),
            other => Err(Hx711Error::InvalidGain(other)),
        }
    }
}

impl fmt::Display for Gain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.factor())
    }
}
