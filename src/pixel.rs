/// Bi-level sample value for a white pixel.
pub const WHITE: u8 = 0;
/// Bi-level sample value for a black pixel.
pub const BLACK: u8 = 1;

/// Sample serialization used by a PNM file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Plain format (P1, P2, P3): decimal ASCII tokens.
    Text,
    /// Raw format (P4, P5, P6): packed bits or one byte per sample.
    Binary,
}

/// One component of an RGB pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    /// Upper-case name, used as the prefix of channel export files.
    pub fn name(self) -> &'static str {
        match self {
            Channel::Red => "RED",
            Channel::Green => "GREEN",
            Channel::Blue => "BLUE",
        }
    }

    /// Select this component from a pixel.
    pub fn of(self, px: rgb::RGB8) -> u8 {
        match self {
            Channel::Red => px.r,
            Channel::Green => px.g,
            Channel::Blue => px.b,
        }
    }
}
