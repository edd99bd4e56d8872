//! Semantic primitives shared by the SAT data object codecs
//!
//! Data coding scheme, type-of-number / numbering-plan classification,
//! BCD digit strings and GSM 7-bit packing, plus the device identity
//! enumeration used by every command.

use crate::error::{SatError, SatResult};

/// Maximum stored length of a text string (truncation bound, not an error)
pub const TEXT_STRING_MAX: usize = 500;
/// Maximum stored length of a dialing number
pub const DIALING_NUMBER_MAX: usize = 200;
/// Maximum stored length of an alpha identifier
pub const ALPHA_ID_MAX: usize = 255;
/// Maximum stored length of an SS string
pub const SS_STRING_MAX: usize = 160;
/// Maximum stored length of a USSD string
pub const USSD_STRING_MAX: usize = 255;
/// Maximum stored length of a DTMF string
pub const DTMF_STRING_MAX: usize = 30;
/// Maximum stored length of a menu item text
pub const ITEM_TEXT_MAX: usize = 45;
/// Maximum stored length of a URL
pub const URL_MAX: usize = 255;

/// Character alphabet selected by a data coding scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alphabet {
    /// GSM 7-bit default alphabet, packed
    #[default]
    Gsm7Default,
    /// 8-bit data
    EightBit,
    /// UCS2 (UTF-16BE)
    Ucs2,
    /// Reserved coding
    Reserved,
}

/// Message class from a data coding scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageClass {
    Class0,
    Class1,
    Class2,
    Class3,
}

/// Data coding scheme byte (TS 23.038 style)
///
/// Bit 5 carries the compression flag; bit 4 gates the message class in
/// bits 0-1; bits 2-3 select the alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DataCodingScheme {
    pub compressed: bool,
    pub class: Option<MessageClass>,
    pub alphabet: Alphabet,
}

impl DataCodingScheme {
    /// Decode a DCS byte
    pub fn decode(byte: u8) -> Self {
        let compressed = byte & 0x20 != 0;
        let class = if byte & 0x10 != 0 {
            Some(match byte & 0x03 {
                0 => MessageClass::Class0,
                1 => MessageClass::Class1,
                2 => MessageClass::Class2,
                _ => MessageClass::Class3,
            })
        } else {
            None
        };
        let alphabet = match (byte >> 2) & 0x03 {
            0 => Alphabet::Gsm7Default,
            1 => Alphabet::EightBit,
            2 => Alphabet::Ucs2,
            _ => Alphabet::Reserved,
        };
        Self { compressed, class, alphabet }
    }

    /// Encode to a DCS byte
    pub fn encode(&self) -> u8 {
        let mut byte = 0u8;
        if self.compressed {
            byte |= 0x20;
        }
        if let Some(class) = self.class {
            byte |= 0x10;
            byte |= match class {
                MessageClass::Class0 => 0,
                MessageClass::Class1 => 1,
                MessageClass::Class2 => 2,
                MessageClass::Class3 => 3,
            };
        }
        byte |= match self.alphabet {
            Alphabet::Gsm7Default => 0,
            Alphabet::EightBit => 1 << 2,
            Alphabet::Ucs2 => 2 << 2,
            Alphabet::Reserved => 3 << 2,
        };
        byte
    }
}

/// Type of number from an address byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeOfNumber {
    #[default]
    Unknown,
    International,
    National,
    NetworkSpecific,
    DedicatedAccess,
}

impl TypeOfNumber {
    /// Classify the 3-bit TON field, clamping unrecognized values to
    /// `Unknown`.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            1 => Self::International,
            2 => Self::National,
            3 => Self::NetworkSpecific,
            4 => Self::DedicatedAccess,
            _ => Self::Unknown,
        }
    }

    pub fn to_bits(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::International => 1,
            Self::National => 2,
            Self::NetworkSpecific => 3,
            Self::DedicatedAccess => 4,
        }
    }
}

/// Numbering plan identification from an address byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberingPlan {
    #[default]
    Unknown,
    Isdn,
    Data,
    Telex,
    National,
    Private,
}

impl NumberingPlan {
    /// Classify the 4-bit NPI field, clamping unrecognized values to
    /// `Unknown`.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x0F {
            1 => Self::Isdn,
            3 => Self::Data,
            4 => Self::Telex,
            8 => Self::National,
            9 => Self::Private,
            _ => Self::Unknown,
        }
    }

    pub fn to_bits(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Isdn => 1,
            Self::Data => 3,
            Self::Telex => 4,
            Self::National => 8,
            Self::Private => 9,
        }
    }
}

/// Split the TON/NPI byte of an address (extension bit discarded)
pub fn split_ton_npi(byte: u8) -> (TypeOfNumber, NumberingPlan) {
    (
        TypeOfNumber::from_bits((byte >> 4) & 0x07),
        NumberingPlan::from_bits(byte & 0x0F),
    )
}

/// Join TON/NPI back into an address byte with the extension bit set
pub fn join_ton_npi(ton: TypeOfNumber, npi: NumberingPlan) -> u8 {
    0x80 | (ton.to_bits() << 4) | npi.to_bits()
}

/// Expand semi-octet BCD digits to ASCII.
///
/// Low nibble first within each byte; `0xF` terminates (filler in the high
/// nibble of the last byte). Output is bounded by `max_len`.
pub fn bcd_to_ascii(data: &[u8], max_len: usize) -> String {
    let mut out = String::new();
    for &byte in data {
        for nibble in [byte & 0x0F, byte >> 4] {
            if out.len() >= max_len || nibble == 0x0F {
                return out;
            }
            out.push(match nibble {
                0..=9 => (b'0' + nibble) as char,
                0x0A => '*',
                0x0B => '#',
                0x0C => 'a',
                0x0D => 'b',
                _ => 'c',
            });
        }
    }
    out
}

/// Pack an ASCII dialing string into semi-octet BCD, `0xF` filler on odd
/// length. Characters outside the dialing set encode as filler.
pub fn ascii_to_bcd(digits: &str) -> Vec<u8> {
    fn nibble(ch: char) -> u8 {
        match ch {
            '0'..='9' => ch as u8 - b'0',
            '*' => 0x0A,
            '#' => 0x0B,
            'a' => 0x0C,
            'b' => 0x0D,
            'c' => 0x0E,
            _ => 0x0F,
        }
    }
    let mut out = Vec::with_capacity(digits.len().div_ceil(2));
    let mut chars = digits.chars();
    while let Some(lo) = chars.next() {
        let hi = chars.next().map(nibble).unwrap_or(0x0F);
        out.push((hi << 4) | nibble(lo));
    }
    out
}

/// Unpack GSM 7-bit packed septets into a string, bounded by `max_len`.
///
/// Septet values are stored as-is (the profile treats them as ASCII).
/// Trailing NUL septets produced by padding are trimmed.
pub fn unpack_gsm7(data: &[u8], max_len: usize) -> String {
    let mut out = String::new();
    let mut reservoir: u16 = 0;
    let mut bits = 0u8;
    for &byte in data {
        reservoir |= (byte as u16) << bits;
        bits += 8;
        while bits >= 7 {
            let septet = (reservoir & 0x7F) as u8;
            reservoir >>= 7;
            bits -= 7;
            if out.len() < max_len {
                out.push(septet as char);
            }
        }
    }
    while out.ends_with('\0') {
        out.pop();
    }
    out
}

/// Pack a string into GSM 7-bit septets
pub fn pack_gsm7(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 7 / 8 + 1);
    let mut reservoir: u16 = 0;
    let mut bits = 0u8;
    for ch in text.chars() {
        reservoir |= ((ch as u16) & 0x7F) << bits;
        bits += 7;
        while bits >= 8 {
            out.push((reservoir & 0xFF) as u8);
            reservoir >>= 8;
            bits -= 8;
        }
    }
    if bits > 0 {
        out.push((reservoir & 0xFF) as u8);
    }
    out
}

/// Device identity of a command source or destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceIdentity {
    Keypad,
    Display,
    Earpiece,
    /// BIP channel, identifier in 0x21..=0x27
    Channel(u8),
    Sim,
    Me,
    Network,
}

impl DeviceIdentity {
    pub fn from_byte(byte: u8) -> SatResult<Self> {
        match byte {
            0x01 => Ok(Self::Keypad),
            0x02 => Ok(Self::Display),
            0x03 => Ok(Self::Earpiece),
            0x21..=0x27 => Ok(Self::Channel(byte)),
            0x81 => Ok(Self::Sim),
            0x82 => Ok(Self::Me),
            0x83 => Ok(Self::Network),
            _ => Err(SatError::CommandNotUnderstood("unknown device identity")),
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            Self::Keypad => 0x01,
            Self::Display => 0x02,
            Self::Earpiece => 0x03,
            Self::Channel(id) => id,
            Self::Sim => 0x81,
            Self::Me => 0x82,
            Self::Network => 0x83,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dcs_decode_eight_bit_no_class() {
        let dcs = DataCodingScheme::decode(0x04);
        assert!(!dcs.compressed);
        assert_eq!(dcs.class, None);
        assert_eq!(dcs.alphabet, Alphabet::EightBit);
    }

    #[test]
    fn dcs_decode_compressed_ucs2_class2() {
        let dcs = DataCodingScheme::decode(0x20 | 0x10 | 0x08 | 0x02);
        assert!(dcs.compressed);
        assert_eq!(dcs.class, Some(MessageClass::Class2));
        assert_eq!(dcs.alphabet, Alphabet::Ucs2);
    }

    #[test]
    fn dcs_encode_is_inverse_of_decode() {
        for byte in [0x00u8, 0x04, 0x08, 0x0C, 0x12, 0x35] {
            assert_eq!(DataCodingScheme::decode(byte).encode(), byte);
        }
    }

    #[test]
    fn ton_npi_clamp_to_unknown() {
        let (ton, npi) = split_ton_npi(0xF5);
        assert_eq!(ton, TypeOfNumber::Unknown); // 7 is out of range
        assert_eq!(npi, NumberingPlan::Unknown); // 5 is unrecognized

        let (ton, npi) = split_ton_npi(0x91);
        assert_eq!(ton, TypeOfNumber::International);
        assert_eq!(npi, NumberingPlan::Isdn);
    }

    #[test]
    fn bcd_expansion_swaps_semi_octets() {
        // "1234" packed as 21 43
        assert_eq!(bcd_to_ascii(&[0x21, 0x43], 200), "1234");
        // odd length with F filler: "123"
        assert_eq!(bcd_to_ascii(&[0x21, 0xF3], 200), "123");
    }

    #[test]
    fn bcd_extended_digits() {
        assert_eq!(bcd_to_ascii(&[0xBA], 200), "*#");
    }

    #[test]
    fn bcd_respects_max_len() {
        assert_eq!(bcd_to_ascii(&[0x21, 0x43, 0x65], 3), "123");
    }

    #[test]
    fn bcd_round_trip() {
        for number in ["1234567890", "123", "*100#"] {
            assert_eq!(bcd_to_ascii(&ascii_to_bcd(number), 200), number);
        }
    }

    #[test]
    fn gsm7_known_vector() {
        // "hello" packed
        let packed = [0xE8, 0x32, 0x9B, 0xFD, 0x06];
        assert_eq!(unpack_gsm7(&packed, 500), "hello");
        assert_eq!(pack_gsm7("hello"), packed.to_vec());
    }

    #[test]
    fn gsm7_pack_unpack_round_trip() {
        for text in ["", "a", "toolkit", "1234567", "12345678"] {
            assert_eq!(unpack_gsm7(&pack_gsm7(text), 500), text);
        }
    }

    #[test]
    fn device_identity_channel_range() {
        assert_eq!(DeviceIdentity::from_byte(0x21).unwrap(), DeviceIdentity::Channel(0x21));
        assert_eq!(DeviceIdentity::from_byte(0x27).unwrap(), DeviceIdentity::Channel(0x27));
        assert!(DeviceIdentity::from_byte(0x28).is_err());
        assert!(DeviceIdentity::from_byte(0x00).is_err());
    }
}
