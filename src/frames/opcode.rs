/// Frame type tag, the low nibble of the first header byte.
///
/// Reserved nibbles (0x3-0x7, 0xB-0xF) are carried through verbatim;
/// the dispatcher treats them like any other data frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Opcode {
    Cont,
    Text,
    Bin,
    Close,
    Ping,
    Pong,
    Reserved(u8),
}

impl Opcode {
    #[must_use]
    pub const fn from_bits(byte: u8) -> Self {
        match byte & 0x0F {
            0x0 => Self::Cont,
            0x1 => Self::Text,
            0x2 => Self::Bin,
            0x8 => Self::Close,
            0x9 => Self::Ping,
            0xA => Self::Pong,
            reserved => Self::Reserved(reserved),
        }
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::Cont => 0x0,
            Self::Text => 0x1,
            Self::Bin => 0x2,
            Self::Close => 0x8,
            Self::Ping => 0x9,
            Self::Pong => 0xA,
            Self::Reserved(nibble) => nibble,
        }
    }
}
