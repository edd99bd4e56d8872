//! BER-TLV layer for SAT data objects
//!
//! Based on ETSI TS 102.223 Annex C. Every field of a proactive command,
//! terminal response or envelope is carried as a data object: one tag byte
//! (7-bit identifier plus a comprehension-required flag in bit 8), a length
//! of one byte up to 0x7F or an `0x81`-prefixed byte up to 255, and the raw
//! value. Three-byte lengths (`0x82` prefix) are outside the supported
//! profile and fail decoding.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{SatError, SatResult};

/// Outer tag of a proactive command (SIM -> terminal)
pub const PROACTIVE_COMMAND_TAG: u8 = 0xD0;
/// Outer tag of a menu selection envelope (terminal -> SIM)
pub const MENU_SELECTION_TAG: u8 = 0xD3;
/// Outer tag of an event download envelope (terminal -> SIM)
pub const EVENT_DOWNLOAD_TAG: u8 = 0xD6;

/// Comprehension-required flag on a data object tag
pub const CR_FLAG: u8 = 0x80;

/// Data object tag identifiers (comprehension bit stripped)
pub mod tag {
    pub const COMMAND_DETAILS: u8 = 0x01;
    pub const DEVICE_IDENTITY: u8 = 0x02;
    pub const RESULT: u8 = 0x03;
    pub const DURATION: u8 = 0x04;
    pub const ALPHA_IDENTIFIER: u8 = 0x05;
    pub const ADDRESS: u8 = 0x06;
    pub const CAPABILITY_CONFIG_PARAMS: u8 = 0x07;
    pub const SUB_ADDRESS: u8 = 0x08;
    pub const SS_STRING: u8 = 0x09;
    pub const USSD_STRING: u8 = 0x0A;
    pub const SMS_TPDU: u8 = 0x0B;
    pub const TEXT_STRING: u8 = 0x0D;
    pub const TONE: u8 = 0x0E;
    pub const ITEM: u8 = 0x0F;
    pub const ITEM_IDENTIFIER: u8 = 0x10;
    pub const RESPONSE_LENGTH: u8 = 0x11;
    pub const FILE_LIST: u8 = 0x12;
    pub const HELP_REQUEST: u8 = 0x15;
    pub const DEFAULT_TEXT: u8 = 0x17;
    pub const ITEMS_NEXT_ACTION_INDICATOR: u8 = 0x18;
    pub const EVENT_LIST: u8 = 0x19;
    pub const ICON_IDENTIFIER: u8 = 0x1E;
    pub const ICON_IDENTIFIER_LIST: u8 = 0x1F;
    pub const DATE_TIME_TIMEZONE: u8 = 0x26;
    pub const IMMEDIATE_RESPONSE: u8 = 0x2B;
    pub const DTMF_STRING: u8 = 0x2C;
    pub const LANGUAGE: u8 = 0x2D;
    pub const AID: u8 = 0x2F;
    pub const BROWSER_IDENTITY: u8 = 0x30;
    pub const URL: u8 = 0x31;
    pub const BEARER: u8 = 0x32;
    pub const PROVISIONING_REFERENCE_FILE: u8 = 0x33;
    pub const BROWSER_TERMINATION_CAUSE: u8 = 0x34;
    pub const BEARER_DESCRIPTION: u8 = 0x35;
    pub const CHANNEL_DATA: u8 = 0x36;
    pub const CHANNEL_DATA_LENGTH: u8 = 0x37;
    pub const CHANNEL_STATUS: u8 = 0x38;
    pub const BUFFER_SIZE: u8 = 0x39;
    pub const UICC_ME_TRANSPORT_LEVEL: u8 = 0x3C;
    pub const OTHER_ADDRESS: u8 = 0x3E;
    pub const NETWORK_ACCESS_NAME: u8 = 0x47;
    pub const REMOTE_ENTITY_ADDRESS: u8 = 0x49;
    pub const TEXT_ATTRIBUTE: u8 = 0x50;
    pub const FRAME_IDENTIFIER: u8 = 0x68;
}

/// Tag identifier with the comprehension bit stripped
pub fn tag_value(byte: u8) -> u8 {
    byte & !CR_FLAG
}

/// Whether the comprehension-required flag is set on a tag byte
pub fn comprehension_required(byte: u8) -> bool {
    byte & CR_FLAG != 0
}

/// Decode a BER length field from the cursor.
///
/// One byte for values up to 0x7F; `0x81` followed by one byte for values up
/// to 255. Any other first byte is an unsupported length form. The second
/// byte is only read after confirming it exists.
pub fn decode_ber_length(buf: &mut Bytes) -> SatResult<usize> {
    if buf.remaining() < 1 {
        return Err(SatError::CommandNotUnderstood("length byte missing"));
    }
    let first = buf.get_u8();
    if first <= 0x7F {
        return Ok(first as usize);
    }
    if first == 0x81 {
        if buf.remaining() < 1 {
            return Err(SatError::CommandNotUnderstood("second length byte missing"));
        }
        return Ok(buf.get_u8() as usize);
    }
    Err(SatError::CommandNotUnderstood("unsupported length form"))
}

/// Encode a BER length field, using the `0x81` form above 0x7F.
pub fn encode_ber_length(buf: &mut BytesMut, len: usize) -> SatResult<()> {
    if len <= 0x7F {
        buf.put_u8(len as u8);
    } else if len <= 0xFF {
        buf.put_u8(0x81);
        buf.put_u8(len as u8);
    } else {
        return Err(SatError::InvalidParameter("value length exceeds 255"));
    }
    Ok(())
}

/// Decoded tag + length header of a data object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlvHeader {
    /// Tag identifier, comprehension bit stripped
    pub tag: u8,
    /// Comprehension-required flag from the tag byte
    pub comprehension_required: bool,
    /// Value length in bytes
    pub length: usize,
}

impl TlvHeader {
    /// Read a header whose tag must match `expected`.
    ///
    /// A missing or mismatched tag is a missing mandatory value; a value
    /// that overruns the buffer is a structural error.
    pub fn expect(buf: &mut Bytes, expected: u8) -> SatResult<Self> {
        if buf.remaining() < 2 {
            return Err(SatError::CommandNotUnderstood("data object truncated"));
        }
        let tag_byte = buf.get_u8();
        if tag_value(tag_byte) != expected {
            return Err(SatError::RequiredValueMissing("unexpected data object tag"));
        }
        let length = decode_ber_length(buf)?;
        if buf.remaining() < length {
            return Err(SatError::CommandNotUnderstood("data object value truncated"));
        }
        Ok(Self {
            tag: expected,
            comprehension_required: comprehension_required(tag_byte),
            length,
        })
    }

    /// Read a fixed-length header: the length byte must equal `len` exactly.
    ///
    /// Fixed-size objects skip BER length-form detection; any other length
    /// byte is a structural error.
    pub fn expect_fixed(buf: &mut Bytes, expected: u8, len: usize) -> SatResult<Self> {
        if buf.remaining() < 2 {
            return Err(SatError::CommandNotUnderstood("data object truncated"));
        }
        let tag_byte = buf.get_u8();
        if tag_value(tag_byte) != expected {
            return Err(SatError::RequiredValueMissing("unexpected data object tag"));
        }
        let length = buf.get_u8() as usize;
        if length != len {
            return Err(SatError::CommandNotUnderstood("unexpected fixed object length"));
        }
        if buf.remaining() < length {
            return Err(SatError::CommandNotUnderstood("data object value truncated"));
        }
        Ok(Self {
            tag: expected,
            comprehension_required: comprehension_required(tag_byte),
            length,
        })
    }
}

/// Peek the next tag identifier without consuming it
pub fn peek_tag(buf: &Bytes) -> Option<u8> {
    buf.chunk().first().map(|b| tag_value(*b))
}

/// Skip one data object the decoder does not recognize.
///
/// Unknown trailing objects are tolerated for forward compatibility; a
/// truncated one is still a structural error.
pub fn skip_data_object(buf: &mut Bytes) -> SatResult<()> {
    if buf.remaining() < 2 {
        return Err(SatError::CommandNotUnderstood("data object truncated"));
    }
    buf.advance(1);
    let length = decode_ber_length(buf)?;
    if buf.remaining() < length {
        return Err(SatError::CommandNotUnderstood("data object value truncated"));
    }
    buf.advance(length);
    Ok(())
}

/// Append one data object: tag byte (comprehension bit per `cr`), BER
/// length, value.
pub fn put_data_object(buf: &mut BytesMut, tag: u8, cr: bool, value: &[u8]) -> SatResult<()> {
    buf.put_u8(if cr { tag | CR_FLAG } else { tag });
    encode_ber_length(buf, value.len())?;
    buf.put_slice(value);
    Ok(())
}

/// Prefix an assembled payload with its outer envelope tag and BER length.
pub fn wrap_envelope(outer_tag: u8, payload: &[u8]) -> SatResult<BytesMut> {
    let mut out = BytesMut::with_capacity(payload.len() + 3);
    out.put_u8(outer_tag);
    encode_ber_length(&mut out, payload.len())?;
    out.put_slice(payload);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes_of(data: &[u8]) -> Bytes {
        Bytes::copy_from_slice(data)
    }

    #[test]
    fn short_form_length() {
        let mut buf = bytes_of(&[0x05]);
        assert_eq!(decode_ber_length(&mut buf).unwrap(), 5);
    }

    #[test]
    fn long_form_length() {
        let mut buf = bytes_of(&[0x81, 0xF0]);
        assert_eq!(decode_ber_length(&mut buf).unwrap(), 0xF0);
    }

    #[test]
    fn three_byte_length_is_not_understood() {
        let mut buf = bytes_of(&[0x82, 0x01, 0x00]);
        assert_eq!(
            decode_ber_length(&mut buf),
            Err(SatError::CommandNotUnderstood("unsupported length form"))
        );
    }

    #[test]
    fn long_form_missing_second_byte() {
        let mut buf = bytes_of(&[0x81]);
        assert!(matches!(
            decode_ber_length(&mut buf),
            Err(SatError::CommandNotUnderstood(_))
        ));
    }

    #[test]
    fn encode_inserts_long_form_above_0x7f() {
        let mut buf = BytesMut::new();
        encode_ber_length(&mut buf, 0x80).unwrap();
        assert_eq!(&buf[..], &[0x81, 0x80]);

        let mut buf = BytesMut::new();
        encode_ber_length(&mut buf, 0x7F).unwrap();
        assert_eq!(&buf[..], &[0x7F]);
    }

    #[test]
    fn encode_rejects_oversized_value() {
        let mut buf = BytesMut::new();
        assert!(encode_ber_length(&mut buf, 256).is_err());
    }

    #[test]
    fn expect_reports_missing_tag() {
        let mut buf = bytes_of(&[0x85, 0x01, 0x41]);
        assert_eq!(
            TlvHeader::expect(&mut buf, tag::ADDRESS),
            Err(SatError::RequiredValueMissing("unexpected data object tag"))
        );
    }

    #[test]
    fn expect_strips_comprehension_flag() {
        let mut buf = bytes_of(&[0x86, 0x01, 0x91]);
        let hdr = TlvHeader::expect(&mut buf, tag::ADDRESS).unwrap();
        assert!(hdr.comprehension_required);
        assert_eq!(hdr.length, 1);
    }

    #[test]
    fn expect_detects_overrun() {
        let mut buf = bytes_of(&[0x06, 0x04, 0x91]);
        assert!(matches!(
            TlvHeader::expect(&mut buf, tag::ADDRESS),
            Err(SatError::CommandNotUnderstood(_))
        ));
    }

    #[test]
    fn skip_unknown_object_advances_cursor() {
        let mut buf = bytes_of(&[0x7F, 0x02, 0xAA, 0xBB, 0x1E]);
        skip_data_object(&mut buf).unwrap();
        assert_eq!(peek_tag(&buf), Some(tag::ICON_IDENTIFIER));
    }

    #[test]
    fn wrap_envelope_uses_long_form_for_large_payloads() {
        let payload = vec![0u8; 0x90];
        let out = wrap_envelope(EVENT_DOWNLOAD_TAG, &payload).unwrap();
        assert_eq!(out[0], 0xD6);
        assert_eq!(out[1], 0x81);
        assert_eq!(out[2], 0x90);
        assert_eq!(out.len(), 3 + 0x90);
    }
}
