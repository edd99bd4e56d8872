//! SAT data object codecs
//!
//! One codec per data object of ETSI TS 102.223 Section 8. Decoders consume
//! a complete TLV from the cursor and return the typed value; encoders
//! append the complete TLV. Identifier-like objects (address, sub-address,
//! CCP, alpha identifier, DTMF string, SS string) apply the comprehension
//! policy: empty content fails decoding with a required-value error when the
//! comprehension flag is set, and degrades to an empty value when it is not.

use bytes::{Buf, Bytes, BytesMut};

use crate::error::{SatError, SatResult};
use crate::tlv::{self, tag, TlvHeader};
use crate::types::*;

fn ucs2_to_string(data: &[u8], max_len: usize) -> String {
    let units: Vec<u16> = data
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    let mut text = String::from_utf16_lossy(&units);
    // truncate on a character boundary
    if let Some((idx, _)) = text.char_indices().nth(max_len) {
        text.truncate(idx);
    }
    text
}

fn string_to_ucs2(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 2);
    for unit in text.encode_utf16() {
        out.extend_from_slice(&unit.to_be_bytes());
    }
    out
}

fn latin1_to_string(data: &[u8], max_len: usize) -> String {
    data.iter().take(max_len).map(|&b| b as char).collect()
}

fn string_to_latin1(text: &str) -> Vec<u8> {
    text.chars().map(|c| c as u8).collect()
}

/// Command Details object (tag 0x01, 3 value bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommandDetails {
    /// Comprehension-required flag from the received tag, echoed on the
    /// paired Terminal Response
    pub comprehension_required: bool,
    pub command_number: u8,
    pub command_type: u8,
    pub qualifier: u8,
}

impl CommandDetails {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        let hdr = TlvHeader::expect_fixed(buf, tag::COMMAND_DETAILS, 3)?;
        Ok(Self {
            comprehension_required: hdr.comprehension_required,
            command_number: buf.get_u8(),
            command_type: buf.get_u8(),
            qualifier: buf.get_u8(),
        })
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        let value = [self.command_number, self.command_type, self.qualifier];
        // never exceeds one length byte
        let _ = tlv::put_data_object(buf, tag::COMMAND_DETAILS, self.comprehension_required, &value);
    }
}

/// Device Identities object (tag 0x02, 2 value bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceIdentities {
    pub source: DeviceIdentity,
    pub destination: DeviceIdentity,
}

impl DeviceIdentities {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        TlvHeader::expect_fixed(buf, tag::DEVICE_IDENTITY, 2)?;
        Ok(Self {
            source: DeviceIdentity::from_byte(buf.get_u8())?,
            destination: DeviceIdentity::from_byte(buf.get_u8())?,
        })
    }

    pub fn encode(&self, buf: &mut BytesMut, cr: bool) {
        let value = [self.source.to_byte(), self.destination.to_byte()];
        let _ = tlv::put_data_object(buf, tag::DEVICE_IDENTITY, cr, &value);
    }
}

/// Duration time unit
///
/// Unit coding follows the profile's 1-based table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TimeUnit {
    Minutes = 0x01,
    Seconds = 0x02,
    TenthsOfSeconds = 0x03,
}

impl TryFrom<u8> for TimeUnit {
    type Error = SatError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(Self::Minutes),
            0x02 => Ok(Self::Seconds),
            0x03 => Ok(Self::TenthsOfSeconds),
            _ => Err(SatError::CommandNotUnderstood("unknown duration time unit")),
        }
    }
}

/// Duration object (tag 0x04, 2 value bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duration {
    pub time_unit: TimeUnit,
    pub time_interval: u8,
}

impl Duration {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        TlvHeader::expect_fixed(buf, tag::DURATION, 2)?;
        Ok(Self {
            time_unit: TimeUnit::try_from(buf.get_u8())?,
            time_interval: buf.get_u8(),
        })
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        let value = [self.time_unit as u8, self.time_interval];
        let _ = tlv::put_data_object(buf, tag::DURATION, false, &value);
    }
}

/// Alpha Identifier object (tag 0x05)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AlphaIdentifier {
    pub text: String,
}

impl AlphaIdentifier {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        let hdr = TlvHeader::expect(buf, tag::ALPHA_IDENTIFIER)?;
        let value = buf.copy_to_bytes(hdr.length);
        if value.is_empty() {
            if hdr.comprehension_required {
                return Err(SatError::RequiredValueMissing("empty alpha identifier"));
            }
            return Ok(Self::default());
        }
        // A leading 0x80 marks UCS2 coding of the identifier
        let text = if value[0] == 0x80 {
            ucs2_to_string(&value[1..], ALPHA_ID_MAX)
        } else {
            latin1_to_string(&value, ALPHA_ID_MAX)
        };
        Ok(Self { text })
    }

    pub fn encode(&self, buf: &mut BytesMut) -> SatResult<()> {
        if self.text.is_ascii() {
            tlv::put_data_object(buf, tag::ALPHA_IDENTIFIER, true, self.text.as_bytes())
        } else {
            let mut value = vec![0x80];
            value.extend_from_slice(&string_to_ucs2(&self.text));
            tlv::put_data_object(buf, tag::ALPHA_IDENTIFIER, true, &value)
        }
    }
}

/// Address object (tag 0x06): TON/NPI byte plus BCD dialing number
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Address {
    pub ton: TypeOfNumber,
    pub npi: NumberingPlan,
    pub number: String,
}

impl Address {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        let hdr = TlvHeader::expect(buf, tag::ADDRESS)?;
        let value = buf.copy_to_bytes(hdr.length);
        if value.is_empty() {
            if hdr.comprehension_required {
                return Err(SatError::RequiredValueMissing("empty address"));
            }
            return Ok(Self::default());
        }
        let (ton, npi) = split_ton_npi(value[0]);
        let number = bcd_to_ascii(&value[1..], DIALING_NUMBER_MAX);
        if number.is_empty() && hdr.comprehension_required {
            return Err(SatError::RequiredValueMissing("zero-length dialing number"));
        }
        Ok(Self { ton, npi, number })
    }

    pub fn encode(&self, buf: &mut BytesMut) -> SatResult<()> {
        let mut value = vec![join_ton_npi(self.ton, self.npi)];
        value.extend_from_slice(&ascii_to_bcd(&self.number));
        tlv::put_data_object(buf, tag::ADDRESS, true, &value)
    }
}

/// Capability Configuration Parameters object (tag 0x07)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ccp {
    pub data: Vec<u8>,
}

impl Ccp {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        let hdr = TlvHeader::expect(buf, tag::CAPABILITY_CONFIG_PARAMS)?;
        let value = buf.copy_to_bytes(hdr.length);
        if value.is_empty() && hdr.comprehension_required {
            return Err(SatError::RequiredValueMissing("empty capability configuration"));
        }
        Ok(Self { data: value.to_vec() })
    }

    pub fn encode(&self, buf: &mut BytesMut) -> SatResult<()> {
        tlv::put_data_object(buf, tag::CAPABILITY_CONFIG_PARAMS, true, &self.data)
    }
}

/// Called Party Sub-Address object (tag 0x08)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubAddress {
    pub data: Vec<u8>,
}

impl SubAddress {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        let hdr = TlvHeader::expect(buf, tag::SUB_ADDRESS)?;
        let value = buf.copy_to_bytes(hdr.length);
        if value.is_empty() && hdr.comprehension_required {
            return Err(SatError::RequiredValueMissing("empty sub-address"));
        }
        Ok(Self { data: value.to_vec() })
    }

    pub fn encode(&self, buf: &mut BytesMut) -> SatResult<()> {
        tlv::put_data_object(buf, tag::SUB_ADDRESS, true, &self.data)
    }
}

/// SS String object (tag 0x09): TON/NPI byte plus BCD SS control string
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SsString {
    pub ton: TypeOfNumber,
    pub npi: NumberingPlan,
    pub ss_string: String,
}

impl SsString {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        let hdr = TlvHeader::expect(buf, tag::SS_STRING)?;
        let value = buf.copy_to_bytes(hdr.length);
        if value.is_empty() {
            if hdr.comprehension_required {
                return Err(SatError::RequiredValueMissing("empty SS string"));
            }
            return Ok(Self::default());
        }
        let (ton, npi) = split_ton_npi(value[0]);
        let ss_string = bcd_to_ascii(&value[1..], SS_STRING_MAX);
        if ss_string.is_empty() && hdr.comprehension_required {
            return Err(SatError::RequiredValueMissing("zero-length SS string"));
        }
        Ok(Self { ton, npi, ss_string })
    }

    pub fn encode(&self, buf: &mut BytesMut) -> SatResult<()> {
        let mut value = vec![join_ton_npi(self.ton, self.npi)];
        value.extend_from_slice(&ascii_to_bcd(&self.ss_string));
        tlv::put_data_object(buf, tag::SS_STRING, true, &value)
    }
}

/// USSD String object (tag 0x0A): DCS byte plus coded string
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UssdString {
    pub dcs: DataCodingScheme,
    pub string: String,
}

impl UssdString {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        let hdr = TlvHeader::expect(buf, tag::USSD_STRING)?;
        let value = buf.copy_to_bytes(hdr.length);
        if value.is_empty() {
            return Err(SatError::RequiredValueMissing("empty USSD string"));
        }
        let dcs = DataCodingScheme::decode(value[0]);
        let string = decode_coded_text(dcs, &value[1..], USSD_STRING_MAX);
        Ok(Self { dcs, string })
    }

    pub fn encode(&self, buf: &mut BytesMut) -> SatResult<()> {
        let mut value = vec![self.dcs.encode()];
        value.extend_from_slice(&encode_coded_text(self.dcs, &self.string));
        tlv::put_data_object(buf, tag::USSD_STRING, true, &value)
    }
}

/// SMS TPDU object (tag 0x0B)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SmsTpdu {
    pub data: Vec<u8>,
}

impl SmsTpdu {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        let hdr = TlvHeader::expect(buf, tag::SMS_TPDU)?;
        let value = buf.copy_to_bytes(hdr.length);
        if value.is_empty() {
            return Err(SatError::RequiredValueMissing("empty SMS TPDU"));
        }
        Ok(Self { data: value.to_vec() })
    }

    pub fn encode(&self, buf: &mut BytesMut) -> SatResult<()> {
        tlv::put_data_object(buf, tag::SMS_TPDU, true, &self.data)
    }
}

fn decode_coded_text(dcs: DataCodingScheme, data: &[u8], max_len: usize) -> String {
    match dcs.alphabet {
        Alphabet::Gsm7Default => unpack_gsm7(data, max_len),
        Alphabet::Ucs2 => ucs2_to_string(data, max_len),
        Alphabet::EightBit | Alphabet::Reserved => latin1_to_string(data, max_len),
    }
}

fn encode_coded_text(dcs: DataCodingScheme, text: &str) -> Vec<u8> {
    match dcs.alphabet {
        Alphabet::Gsm7Default => pack_gsm7(text),
        Alphabet::Ucs2 => string_to_ucs2(text),
        Alphabet::EightBit | Alphabet::Reserved => string_to_latin1(text),
    }
}

/// Text String object (tag 0x0D): DCS byte plus coded string
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextString {
    pub dcs: DataCodingScheme,
    pub text: String,
}

impl TextString {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        Self::decode_tagged(buf, tag::TEXT_STRING)
    }

    /// Default Text (tag 0x17) shares the text string layout.
    pub fn decode_tagged(buf: &mut Bytes, object_tag: u8) -> SatResult<Self> {
        let hdr = TlvHeader::expect(buf, object_tag)?;
        let value = buf.copy_to_bytes(hdr.length);
        if value.is_empty() {
            // a null text string is a valid object
            return Ok(Self::default());
        }
        let dcs = DataCodingScheme::decode(value[0]);
        let text = decode_coded_text(dcs, &value[1..], TEXT_STRING_MAX);
        Ok(Self { dcs, text })
    }

    pub fn encode(&self, buf: &mut BytesMut) -> SatResult<()> {
        self.encode_tagged(buf, tag::TEXT_STRING)
    }

    pub fn encode_tagged(&self, buf: &mut BytesMut, object_tag: u8) -> SatResult<()> {
        if self.text.is_empty() {
            return tlv::put_data_object(buf, object_tag, true, &[]);
        }
        let mut value = vec![self.dcs.encode()];
        value.extend_from_slice(&encode_coded_text(self.dcs, &self.text));
        tlv::put_data_object(buf, object_tag, true, &value)
    }
}

/// Tone object (tag 0x0E, 1 value byte)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Tone {
    DialTone = 0x01,
    CalledSubscriberBusy = 0x02,
    Congestion = 0x03,
    RadioPathAck = 0x04,
    RadioPathNotAvailable = 0x05,
    ErrorTone = 0x06,
    CallWaitingTone = 0x07,
    RingingTone = 0x08,
    GeneralBeep = 0x10,
    PositiveAck = 0x11,
    NegativeAck = 0x12,
}

impl TryFrom<u8> for Tone {
    type Error = SatError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(Self::DialTone),
            0x02 => Ok(Self::CalledSubscriberBusy),
            0x03 => Ok(Self::Congestion),
            0x04 => Ok(Self::RadioPathAck),
            0x05 => Ok(Self::RadioPathNotAvailable),
            0x06 => Ok(Self::ErrorTone),
            0x07 => Ok(Self::CallWaitingTone),
            0x08 => Ok(Self::RingingTone),
            0x10 => Ok(Self::GeneralBeep),
            0x11 => Ok(Self::PositiveAck),
            0x12 => Ok(Self::NegativeAck),
            _ => Err(SatError::BeyondMeCapability("unsupported tone")),
        }
    }
}

impl Tone {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        TlvHeader::expect_fixed(buf, tag::TONE, 1)?;
        Self::try_from(buf.get_u8())
    }

    pub fn encode(self, buf: &mut BytesMut) {
        let _ = tlv::put_data_object(buf, tag::TONE, false, &[self as u8]);
    }
}

/// Item object (tag 0x0F): identifier byte plus item text
///
/// A zero-length item is the null item used to remove a menu.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Item {
    pub identifier: u8,
    pub text: String,
}

impl Item {
    pub fn is_null(&self) -> bool {
        self.identifier == 0 && self.text.is_empty()
    }

    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        let hdr = TlvHeader::expect(buf, tag::ITEM)?;
        let value = buf.copy_to_bytes(hdr.length);
        if value.is_empty() {
            return Ok(Self::default());
        }
        Ok(Self {
            identifier: value[0],
            text: latin1_to_string(&value[1..], ITEM_TEXT_MAX),
        })
    }

    pub fn encode(&self, buf: &mut BytesMut) -> SatResult<()> {
        if self.is_null() {
            return tlv::put_data_object(buf, tag::ITEM, true, &[]);
        }
        let mut value = vec![self.identifier];
        value.extend_from_slice(&string_to_latin1(&self.text));
        tlv::put_data_object(buf, tag::ITEM, true, &value)
    }
}

/// Item Identifier object (tag 0x10, 1 value byte)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemIdentifier {
    pub identifier: u8,
}

impl ItemIdentifier {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        TlvHeader::expect_fixed(buf, tag::ITEM_IDENTIFIER, 1)?;
        Ok(Self { identifier: buf.get_u8() })
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        let _ = tlv::put_data_object(buf, tag::ITEM_IDENTIFIER, true, &[self.identifier]);
    }
}

/// Response Length object (tag 0x11, 2 value bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResponseLength {
    pub min: u8,
    pub max: u8,
}

impl ResponseLength {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        TlvHeader::expect_fixed(buf, tag::RESPONSE_LENGTH, 2)?;
        Ok(Self { min: buf.get_u8(), max: buf.get_u8() })
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        let _ = tlv::put_data_object(buf, tag::RESPONSE_LENGTH, true, &[self.min, self.max]);
    }
}

/// Master File identifier
const FID_MF: u16 = 0x3F00;
/// ADF(USIM) placeholder identifier in file paths
const FID_ADF_USIM: u16 = 0x7FFF;
/// DF(GSM)
const FID_DF_GSM: u16 = 0x7F20;
/// DF(TELECOM)
const FID_DF_TELECOM: u16 = 0x7F10;

/// EFs under MF accepted for REFRESH notification
const MF_LEVEL_EFS: &[u16] = &[0x2F00 /* EF_DIR */, 0x2FE2 /* EF_ICCID */];

/// EFs under ADF(USIM)/DF(GSM) accepted for REFRESH notification
const USIM_LEVEL_EFS: &[u16] = &[
    0x6F05, // EF_LI
    0x6F07, // EF_IMSI
    0x6F31, // EF_HPPLMN
    0x6F38, // EF_UST
    0x6F46, // EF_SPN
    0x6F60, // EF_PLMNwAcT
    0x6F61, // EF_OPLMNwAcT
    0x6F78, // EF_ACC
    0x6F7B, // EF_FPLMN
    0x6F7E, // EF_LOCI
    0x6FAD, // EF_AD
    0x6FB7, // EF_ECC
];

/// EFs under DF(TELECOM) accepted for REFRESH notification
const TELECOM_LEVEL_EFS: &[u16] = &[
    0x6F3A, // EF_ADN
    0x6F3B, // EF_FDN
    0x6F3C, // EF_SMS
    0x6F42, // EF_SMSP
    0x6F49, // EF_SDN
];

fn is_refresh_file(path: &[u16]) -> bool {
    match path {
        [FID_MF, ef] => MF_LEVEL_EFS.contains(ef),
        [FID_MF, FID_ADF_USIM | FID_DF_GSM, ef] => USIM_LEVEL_EFS.contains(ef),
        [FID_MF, FID_DF_TELECOM, ef] => TELECOM_LEVEL_EFS.contains(ef),
        _ => false,
    }
}

/// File List object (tag 0x12): full file paths for REFRESH
///
/// Paths not on the REFRESH allow-list are dropped during decode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileList {
    pub files: Vec<Vec<u16>>,
}

impl FileList {
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        let hdr = TlvHeader::expect(buf, tag::FILE_LIST)?;
        let value = buf.copy_to_bytes(hdr.length);
        if value.is_empty() {
            return Err(SatError::RequiredValueMissing("empty file list"));
        }
        let path_bytes = &value[1..]; // leading byte is the declared file count
        if path_bytes.len() % 2 != 0 {
            return Err(SatError::CommandNotUnderstood("odd file path length"));
        }
        let mut files = Vec::new();
        let mut current: Vec<u16> = Vec::new();
        for pair in path_bytes.chunks_exact(2) {
            let fid = u16::from_be_bytes([pair[0], pair[1]]);
            if fid == FID_MF && !current.is_empty() {
                if is_refresh_file(&current) {
                    files.push(std::mem::take(&mut current));
                } else {
                    log::warn!("dropping non-refreshable file path {current:04X?}");
                    current.clear();
                }
            }
            current.push(fid);
        }
        if !current.is_empty() {
            if is_refresh_file(&current) {
                files.push(current);
            } else {
                log::warn!("dropping non-refreshable file path {current:04X?}");
            }
        }
        Ok(Self { files })
    }

    pub fn encode(&self, buf: &mut BytesMut) -> SatResult<()> {
        let mut value = vec![self.files.len() as u8];
        for path in &self.files {
            for fid in path {
                value.extend_from_slice(&fid.to_be_bytes());
            }
        }
        tlv::put_data_object(buf, tag::FILE_LIST, true, &value)
    }
}

/// Help Request object (tag 0x15): presence-only
pub fn decode_help_request(buf: &mut Bytes) -> SatResult<()> {
    let hdr = TlvHeader::expect(buf, tag::HELP_REQUEST)?;
    buf.advance(hdr.length);
    Ok(())
}

/// Immediate Response object (tag 0x2B): presence-only
pub fn decode_immediate_response(buf: &mut Bytes) -> SatResult<()> {
    let hdr = TlvHeader::expect(buf, tag::IMMEDIATE_RESPONSE)?;
    buf.advance(hdr.length);
    Ok(())
}

/// Items Next Action Indicator object (tag 0x18)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemsNextActionIndicator {
    pub list: Vec<u8>,
}

impl ItemsNextActionIndicator {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        let hdr = TlvHeader::expect(buf, tag::ITEMS_NEXT_ACTION_INDICATOR)?;
        Ok(Self { list: buf.copy_to_bytes(hdr.length).to_vec() })
    }

    pub fn encode(&self, buf: &mut BytesMut) -> SatResult<()> {
        tlv::put_data_object(buf, tag::ITEMS_NEXT_ACTION_INDICATOR, false, &self.list)
    }
}

/// Event the terminal can be asked to monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SatEvent {
    MtCall = 0x00,
    CallConnected = 0x01,
    CallDisconnected = 0x02,
    LocationStatus = 0x03,
    UserActivity = 0x04,
    IdleScreenAvailable = 0x05,
    CardReaderStatus = 0x06,
    LanguageSelection = 0x07,
    BrowserTermination = 0x08,
    DataAvailable = 0x09,
    ChannelStatus = 0x0A,
}

impl TryFrom<u8> for SatEvent {
    type Error = SatError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Self::MtCall),
            0x01 => Ok(Self::CallConnected),
            0x02 => Ok(Self::CallDisconnected),
            0x03 => Ok(Self::LocationStatus),
            0x04 => Ok(Self::UserActivity),
            0x05 => Ok(Self::IdleScreenAvailable),
            0x06 => Ok(Self::CardReaderStatus),
            0x07 => Ok(Self::LanguageSelection),
            0x08 => Ok(Self::BrowserTermination),
            0x09 => Ok(Self::DataAvailable),
            0x0A => Ok(Self::ChannelStatus),
            _ => Err(SatError::BeyondMeCapability("unknown event")),
        }
    }
}

/// Event List object (tag 0x19)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventList {
    pub events: Vec<SatEvent>,
}

impl EventList {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        let hdr = TlvHeader::expect(buf, tag::EVENT_LIST)?;
        let value = buf.copy_to_bytes(hdr.length);
        let mut events = Vec::with_capacity(value.len());
        for &byte in value.iter() {
            match SatEvent::try_from(byte) {
                Ok(event) => events.push(event),
                // unknown events are only fatal when comprehension is
                // required; otherwise they are dropped
                Err(err) if hdr.comprehension_required => return Err(err),
                Err(_) => log::warn!("dropping unknown event 0x{byte:02X}"),
            }
        }
        Ok(Self { events })
    }

    pub fn encode(&self, buf: &mut BytesMut) -> SatResult<()> {
        let value: Vec<u8> = self.events.iter().map(|e| *e as u8).collect();
        tlv::put_data_object(buf, tag::EVENT_LIST, true, &value)
    }
}

/// How an icon relates to its accompanying text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IconDisplayMode {
    /// Icon replaces the text
    #[default]
    SelfExplanatory,
    /// Icon is shown together with the text
    WithText,
}

/// Icon Identifier object (tag 0x1E, 2 value bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IconIdentifier {
    pub display_mode: IconDisplayMode,
    pub identifier: u8,
}

impl IconIdentifier {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        TlvHeader::expect_fixed(buf, tag::ICON_IDENTIFIER, 2)?;
        let qualifier = buf.get_u8();
        Ok(Self {
            display_mode: if qualifier & 0x01 == 0 {
                IconDisplayMode::SelfExplanatory
            } else {
                IconDisplayMode::WithText
            },
            identifier: buf.get_u8(),
        })
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        let qualifier = match self.display_mode {
            IconDisplayMode::SelfExplanatory => 0x00,
            IconDisplayMode::WithText => 0x01,
        };
        let _ = tlv::put_data_object(buf, tag::ICON_IDENTIFIER, false, &[qualifier, self.identifier]);
    }
}

/// Icon Identifier List object (tag 0x1F)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IconIdentifierList {
    pub display_mode: IconDisplayMode,
    pub identifiers: Vec<u8>,
}

impl IconIdentifierList {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        let hdr = TlvHeader::expect(buf, tag::ICON_IDENTIFIER_LIST)?;
        let value = buf.copy_to_bytes(hdr.length);
        if value.is_empty() {
            return Err(SatError::CommandNotUnderstood("empty icon identifier list"));
        }
        Ok(Self {
            display_mode: if value[0] & 0x01 == 0 {
                IconDisplayMode::SelfExplanatory
            } else {
                IconDisplayMode::WithText
            },
            identifiers: value[1..].to_vec(),
        })
    }

    pub fn encode(&self, buf: &mut BytesMut) -> SatResult<()> {
        let qualifier = match self.display_mode {
            IconDisplayMode::SelfExplanatory => 0x00,
            IconDisplayMode::WithText => 0x01,
        };
        let mut value = vec![qualifier];
        value.extend_from_slice(&self.identifiers);
        tlv::put_data_object(buf, tag::ICON_IDENTIFIER_LIST, false, &value)
    }
}

fn bcd_swap_decode(byte: u8) -> u8 {
    (byte & 0x0F) * 10 + (byte >> 4)
}

fn bcd_swap_encode(value: u8) -> u8 {
    ((value % 10) << 4) | (value / 10)
}

/// Date-Time and Time Zone object (tag 0x26, 7 value bytes)
///
/// All fields are semi-octet swapped BCD; the time zone byte is kept raw
/// (0xFF means no information).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateTimeTimezone {
    pub year: u8,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub timezone: u8,
}

impl DateTimeTimezone {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        TlvHeader::expect_fixed(buf, tag::DATE_TIME_TIMEZONE, 7)?;
        Ok(Self {
            year: bcd_swap_decode(buf.get_u8()),
            month: bcd_swap_decode(buf.get_u8()),
            day: bcd_swap_decode(buf.get_u8()),
            hour: bcd_swap_decode(buf.get_u8()),
            minute: bcd_swap_decode(buf.get_u8()),
            second: bcd_swap_decode(buf.get_u8()),
            timezone: buf.get_u8(),
        })
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        let value = [
            bcd_swap_encode(self.year),
            bcd_swap_encode(self.month),
            bcd_swap_encode(self.day),
            bcd_swap_encode(self.hour),
            bcd_swap_encode(self.minute),
            bcd_swap_encode(self.second),
            self.timezone,
        ];
        let _ = tlv::put_data_object(buf, tag::DATE_TIME_TIMEZONE, false, &value);
    }
}

/// DTMF String object (tag 0x2C): BCD DTMF digits
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DtmfString {
    pub dtmf: String,
}

impl DtmfString {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        let hdr = TlvHeader::expect(buf, tag::DTMF_STRING)?;
        let value = buf.copy_to_bytes(hdr.length);
        let dtmf = bcd_to_ascii(&value, DTMF_STRING_MAX);
        if dtmf.is_empty() {
            if hdr.comprehension_required {
                return Err(SatError::RequiredValueMissing("empty DTMF string"));
            }
            return Ok(Self::default());
        }
        Ok(Self { dtmf })
    }

    pub fn encode(&self, buf: &mut BytesMut) -> SatResult<()> {
        tlv::put_data_object(buf, tag::DTMF_STRING, true, &ascii_to_bcd(&self.dtmf))
    }
}

/// Language object (tag 0x2D, 2 value bytes): ISO 639 pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language(pub [u8; 2]);

impl Default for Language {
    fn default() -> Self {
        Self(*b"en")
    }
}

impl Language {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        TlvHeader::expect_fixed(buf, tag::LANGUAGE, 2)?;
        Ok(Self([buf.get_u8(), buf.get_u8()]))
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        let _ = tlv::put_data_object(buf, tag::LANGUAGE, false, &self.0);
    }
}

/// Application Identifier object (tag 0x2F)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Aid {
    pub data: Vec<u8>,
}

impl Aid {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        let hdr = TlvHeader::expect(buf, tag::AID)?;
        Ok(Self { data: buf.copy_to_bytes(hdr.length).to_vec() })
    }

    pub fn encode(&self, buf: &mut BytesMut) -> SatResult<()> {
        tlv::put_data_object(buf, tag::AID, true, &self.data)
    }
}

/// Browser Identity object (tag 0x30, 1 value byte); 0 is the default
/// browser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BrowserIdentity {
    pub identity: u8,
}

impl BrowserIdentity {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        TlvHeader::expect_fixed(buf, tag::BROWSER_IDENTITY, 1)?;
        Ok(Self { identity: buf.get_u8() })
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        let _ = tlv::put_data_object(buf, tag::BROWSER_IDENTITY, true, &[self.identity]);
    }
}

/// URL object (tag 0x31); an empty value selects the default URL
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Url {
    pub url: String,
}

impl Url {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        let hdr = TlvHeader::expect(buf, tag::URL)?;
        let value = buf.copy_to_bytes(hdr.length);
        Ok(Self { url: latin1_to_string(&value, URL_MAX) })
    }

    pub fn encode(&self, buf: &mut BytesMut) -> SatResult<()> {
        tlv::put_data_object(buf, tag::URL, true, &string_to_latin1(&self.url))
    }
}

/// Bearer preference for LAUNCH BROWSER
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BearerType {
    Sms = 0x00,
    Csd = 0x01,
    Ussd = 0x02,
    Gprs = 0x03,
}

impl TryFrom<u8> for BearerType {
    type Error = SatError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Self::Sms),
            0x01 => Ok(Self::Csd),
            0x02 => Ok(Self::Ussd),
            0x03 => Ok(Self::Gprs),
            _ => Err(SatError::BeyondMeCapability("unsupported bearer type")),
        }
    }
}

/// Bearer object (tag 0x32): priority-ordered bearer list
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bearer {
    pub list: Vec<BearerType>,
}

impl Bearer {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        let hdr = TlvHeader::expect(buf, tag::BEARER)?;
        let value = buf.copy_to_bytes(hdr.length);
        let mut list = Vec::with_capacity(value.len());
        for &byte in value.iter() {
            list.push(BearerType::try_from(byte)?);
        }
        Ok(Self { list })
    }

    pub fn encode(&self, buf: &mut BytesMut) -> SatResult<()> {
        let value: Vec<u8> = self.list.iter().map(|b| *b as u8).collect();
        tlv::put_data_object(buf, tag::BEARER, false, &value)
    }
}

/// Provisioning Reference File object (tag 0x33)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProvisioningFileRef {
    pub path: Vec<u8>,
}

impl ProvisioningFileRef {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        let hdr = TlvHeader::expect(buf, tag::PROVISIONING_REFERENCE_FILE)?;
        Ok(Self { path: buf.copy_to_bytes(hdr.length).to_vec() })
    }

    pub fn encode(&self, buf: &mut BytesMut) -> SatResult<()> {
        tlv::put_data_object(buf, tag::PROVISIONING_REFERENCE_FILE, false, &self.path)
    }
}

/// Browser Termination Cause object (tag 0x34, 1 value byte)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum BrowserTerminationCause {
    #[default]
    UserTermination = 0x00,
    ErrorTermination = 0x01,
}

impl BrowserTerminationCause {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        TlvHeader::expect_fixed(buf, tag::BROWSER_TERMINATION_CAUSE, 1)?;
        match buf.get_u8() {
            0x00 => Ok(Self::UserTermination),
            0x01 => Ok(Self::ErrorTermination),
            _ => Err(SatError::CommandNotUnderstood("unknown browser termination cause")),
        }
    }

    pub fn encode(self, buf: &mut BytesMut) {
        let _ = tlv::put_data_object(buf, tag::BROWSER_TERMINATION_CAUSE, true, &[self as u8]);
    }
}

/// Bearer kind of a BIP channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BearerKind {
    Csd = 0x01,
    Gprs = 0x02,
    Default = 0x03,
}

impl TryFrom<u8> for BearerKind {
    type Error = SatError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(Self::Csd),
            0x02 => Ok(Self::Gprs),
            0x03 => Ok(Self::Default),
            _ => Err(SatError::BeyondMeCapability("unsupported bearer description")),
        }
    }
}

/// Bearer Description object (tag 0x35): bearer kind plus raw parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerDescription {
    pub kind: BearerKind,
    pub parameters: Vec<u8>,
}

impl BearerDescription {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        let hdr = TlvHeader::expect(buf, tag::BEARER_DESCRIPTION)?;
        let value = buf.copy_to_bytes(hdr.length);
        if value.is_empty() {
            return Err(SatError::RequiredValueMissing("empty bearer description"));
        }
        Ok(Self {
            kind: BearerKind::try_from(value[0])?,
            parameters: value[1..].to_vec(),
        })
    }

    pub fn encode(&self, buf: &mut BytesMut) -> SatResult<()> {
        let mut value = vec![self.kind as u8];
        value.extend_from_slice(&self.parameters);
        tlv::put_data_object(buf, tag::BEARER_DESCRIPTION, true, &value)
    }
}

/// Channel Data object (tag 0x36)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChannelData {
    pub data: Vec<u8>,
}

impl ChannelData {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        let hdr = TlvHeader::expect(buf, tag::CHANNEL_DATA)?;
        Ok(Self { data: buf.copy_to_bytes(hdr.length).to_vec() })
    }

    pub fn encode(&self, buf: &mut BytesMut) -> SatResult<()> {
        tlv::put_data_object(buf, tag::CHANNEL_DATA, true, &self.data)
    }
}

/// Channel Data Length object (tag 0x37, 1 value byte); 0xFF means more
/// than 255 bytes are available
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelDataLength {
    pub length: u8,
}

impl ChannelDataLength {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        TlvHeader::expect_fixed(buf, tag::CHANNEL_DATA_LENGTH, 1)?;
        Ok(Self { length: buf.get_u8() })
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        let _ = tlv::put_data_object(buf, tag::CHANNEL_DATA_LENGTH, true, &[self.length]);
    }
}

/// Channel Status object (tag 0x38, 2 value bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelStatus {
    /// Channel identifier, 3 bits
    pub channel_id: u8,
    pub link_established: bool,
    /// Further info byte; 0x05 signals link dropped
    pub info: u8,
}

impl ChannelStatus {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        TlvHeader::expect_fixed(buf, tag::CHANNEL_STATUS, 2)?;
        let first = buf.get_u8();
        Ok(Self {
            channel_id: first & 0x07,
            link_established: first & 0x80 != 0,
            info: buf.get_u8(),
        })
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        let mut first = self.channel_id & 0x07;
        if self.link_established {
            first |= 0x80;
        }
        let _ = tlv::put_data_object(buf, tag::CHANNEL_STATUS, true, &[first, self.info]);
    }
}

/// Buffer Size object (tag 0x39, 2 value bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BufferSize {
    pub size: u16,
}

impl BufferSize {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        TlvHeader::expect_fixed(buf, tag::BUFFER_SIZE, 2)?;
        Ok(Self { size: buf.get_u16() })
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        let _ = tlv::put_data_object(buf, tag::BUFFER_SIZE, true, &self.size.to_be_bytes());
    }
}

/// Transport protocol of a UICC/ME interface transport level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TransportProtocol {
    Udp = 0x01,
    Tcp = 0x02,
}

/// UICC/ME Interface Transport Level object (tag 0x3C, 3 value bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiccTransportLevel {
    pub protocol: TransportProtocol,
    pub port: u16,
}

impl UiccTransportLevel {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        TlvHeader::expect_fixed(buf, tag::UICC_ME_TRANSPORT_LEVEL, 3)?;
        let protocol = match buf.get_u8() {
            0x01 => TransportProtocol::Udp,
            0x02 => TransportProtocol::Tcp,
            _ => return Err(SatError::BeyondMeCapability("unsupported transport protocol")),
        };
        Ok(Self { protocol, port: buf.get_u16() })
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        let mut value = vec![self.protocol as u8];
        value.extend_from_slice(&self.port.to_be_bytes());
        let _ = tlv::put_data_object(buf, tag::UICC_ME_TRANSPORT_LEVEL, true, &value);
    }
}

/// Other Address object (tag 0x3E): local or destination address of a BIP
/// channel; an empty value requests a dynamically assigned address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OtherAddress {
    #[default]
    Dynamic,
    Ipv4([u8; 4]),
    Ipv6([u8; 16]),
}

impl OtherAddress {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        let hdr = TlvHeader::expect(buf, tag::OTHER_ADDRESS)?;
        let value = buf.copy_to_bytes(hdr.length);
        if value.is_empty() {
            return Ok(Self::Dynamic);
        }
        match value[0] {
            0x21 => {
                if value.len() != 5 {
                    return Err(SatError::CommandNotUnderstood("bad IPv4 address length"));
                }
                let mut addr = [0u8; 4];
                addr.copy_from_slice(&value[1..]);
                Ok(Self::Ipv4(addr))
            }
            0x57 => {
                if value.len() != 17 {
                    return Err(SatError::CommandNotUnderstood("bad IPv6 address length"));
                }
                let mut addr = [0u8; 16];
                addr.copy_from_slice(&value[1..]);
                Ok(Self::Ipv6(addr))
            }
            _ => Err(SatError::BeyondMeCapability("unsupported address type")),
        }
    }

    pub fn encode(&self, buf: &mut BytesMut) -> SatResult<()> {
        match self {
            Self::Dynamic => tlv::put_data_object(buf, tag::OTHER_ADDRESS, true, &[]),
            Self::Ipv4(addr) => {
                let mut value = vec![0x21];
                value.extend_from_slice(addr);
                tlv::put_data_object(buf, tag::OTHER_ADDRESS, true, &value)
            }
            Self::Ipv6(addr) => {
                let mut value = vec![0x57];
                value.extend_from_slice(addr);
                tlv::put_data_object(buf, tag::OTHER_ADDRESS, true, &value)
            }
        }
    }
}

/// Network Access Name object (tag 0x47): label-encoded APN, kept raw
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NetworkAccessName {
    pub name: Vec<u8>,
}

impl NetworkAccessName {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        let hdr = TlvHeader::expect(buf, tag::NETWORK_ACCESS_NAME)?;
        Ok(Self { name: buf.copy_to_bytes(hdr.length).to_vec() })
    }

    pub fn encode(&self, buf: &mut BytesMut) -> SatResult<()> {
        tlv::put_data_object(buf, tag::NETWORK_ACCESS_NAME, true, &self.name)
    }
}

/// Remote Entity Address object (tag 0x49)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemoteEntityAddress {
    pub coding: u8,
    pub data: Vec<u8>,
}

impl RemoteEntityAddress {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        let hdr = TlvHeader::expect(buf, tag::REMOTE_ENTITY_ADDRESS)?;
        let value = buf.copy_to_bytes(hdr.length);
        if value.is_empty() {
            return Err(SatError::RequiredValueMissing("empty remote entity address"));
        }
        Ok(Self { coding: value[0], data: value[1..].to_vec() })
    }

    pub fn encode(&self, buf: &mut BytesMut) -> SatResult<()> {
        let mut value = vec![self.coding];
        value.extend_from_slice(&self.data);
        tlv::put_data_object(buf, tag::REMOTE_ENTITY_ADDRESS, false, &value)
    }
}

/// Text Attribute object (tag 0x50): raw formatting records
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextAttribute {
    pub data: Vec<u8>,
}

impl TextAttribute {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        let hdr = TlvHeader::expect(buf, tag::TEXT_ATTRIBUTE)?;
        Ok(Self { data: buf.copy_to_bytes(hdr.length).to_vec() })
    }

    pub fn encode(&self, buf: &mut BytesMut) -> SatResult<()> {
        tlv::put_data_object(buf, tag::TEXT_ATTRIBUTE, false, &self.data)
    }
}

/// Frame Identifier object (tag 0x68, 1 value byte)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameIdentifier {
    pub identifier: u8,
}

impl FrameIdentifier {
    pub fn decode(buf: &mut Bytes) -> SatResult<Self> {
        TlvHeader::expect_fixed(buf, tag::FRAME_IDENTIFIER, 1)?;
        Ok(Self { identifier: buf.get_u8() })
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        let _ = tlv::put_data_object(buf, tag::FRAME_IDENTIFIER, false, &[self.identifier]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tlv::CR_FLAG;

    fn bytes_of(data: &[u8]) -> Bytes {
        Bytes::copy_from_slice(data)
    }

    #[test]
    fn duration_minutes_round_trip() {
        // tag, len=2, unit=minutes, interval=5
        let mut buf = bytes_of(&[0x04, 0x02, 0x01, 0x05]);
        let duration = Duration::decode(&mut buf).unwrap();
        assert_eq!(duration.time_unit, TimeUnit::Minutes);
        assert_eq!(duration.time_interval, 5);

        let mut out = BytesMut::new();
        duration.encode(&mut out);
        assert_eq!(&out[..], &[0x04, 0x02, 0x01, 0x05]);
    }

    #[test]
    fn duration_rejects_bad_length() {
        let mut buf = bytes_of(&[0x04, 0x03, 0x01, 0x05, 0x00]);
        assert!(matches!(
            Duration::decode(&mut buf),
            Err(SatError::CommandNotUnderstood(_))
        ));
    }

    #[test]
    fn icon_identifier_wrong_length_is_not_understood() {
        let mut buf = bytes_of(&[0x1E, 0x03, 0x00, 0x01, 0x02]);
        assert!(matches!(
            IconIdentifier::decode(&mut buf),
            Err(SatError::CommandNotUnderstood(_))
        ));
    }

    #[test]
    fn icon_identifier_round_trip() {
        let icon = IconIdentifier {
            display_mode: IconDisplayMode::WithText,
            identifier: 7,
        };
        let mut out = BytesMut::new();
        icon.encode(&mut out);
        let mut buf = out.freeze();
        assert_eq!(IconIdentifier::decode(&mut buf).unwrap(), icon);
    }

    #[test]
    fn address_comprehension_policy() {
        // empty dialing number, comprehension required
        let mut buf = bytes_of(&[tag::ADDRESS | CR_FLAG, 0x01, 0x91]);
        assert_eq!(
            Address::decode(&mut buf),
            Err(SatError::RequiredValueMissing("zero-length dialing number"))
        );

        // same bytes without the comprehension flag decode degraded
        let mut buf = bytes_of(&[tag::ADDRESS, 0x01, 0x91]);
        let address = Address::decode(&mut buf).unwrap();
        assert_eq!(address.ton, TypeOfNumber::International);
        assert!(address.number.is_empty());
    }

    #[test]
    fn alpha_identifier_comprehension_policy() {
        let mut buf = bytes_of(&[tag::ALPHA_IDENTIFIER | CR_FLAG, 0x00]);
        assert!(matches!(
            AlphaIdentifier::decode(&mut buf),
            Err(SatError::RequiredValueMissing(_))
        ));

        let mut buf = bytes_of(&[tag::ALPHA_IDENTIFIER, 0x00]);
        assert_eq!(AlphaIdentifier::decode(&mut buf).unwrap(), AlphaIdentifier::default());
    }

    #[test]
    fn dtmf_comprehension_policy() {
        let mut buf = bytes_of(&[tag::DTMF_STRING | CR_FLAG, 0x00]);
        assert!(matches!(
            DtmfString::decode(&mut buf),
            Err(SatError::RequiredValueMissing(_))
        ));

        let mut buf = bytes_of(&[tag::DTMF_STRING, 0x00]);
        assert!(DtmfString::decode(&mut buf).unwrap().dtmf.is_empty());
    }

    #[test]
    fn address_round_trip() {
        let address = Address {
            ton: TypeOfNumber::International,
            npi: NumberingPlan::Isdn,
            number: "123456789".into(),
        };
        let mut out = BytesMut::new();
        address.encode(&mut out).unwrap();
        let mut buf = out.freeze();
        assert_eq!(Address::decode(&mut buf).unwrap(), address);
    }

    #[test]
    fn file_list_keeps_ef_dir() {
        // count=1, path MF/EF_DIR
        let mut buf = bytes_of(&[0x92, 0x05, 0x01, 0x3F, 0x00, 0x2F, 0x00]);
        let list = FileList::decode(&mut buf).unwrap();
        assert_eq!(list.file_count(), 1);
        assert_eq!(list.files[0], vec![0x3F00, 0x2F00]);
    }

    #[test]
    fn file_list_filters_unknown_paths() {
        // MF/EF_DIR followed by MF/0x5F99 (not on the allow-list)
        let mut buf = bytes_of(&[
            0x92, 0x09, 0x02, 0x3F, 0x00, 0x2F, 0x00, 0x3F, 0x00, 0x5F, 0x99,
        ]);
        let list = FileList::decode(&mut buf).unwrap();
        assert_eq!(list.file_count(), 1);
    }

    #[test]
    fn file_list_accepts_usim_imsi() {
        let mut buf = bytes_of(&[0x92, 0x07, 0x01, 0x3F, 0x00, 0x7F, 0xFF, 0x6F, 0x07]);
        let list = FileList::decode(&mut buf).unwrap();
        assert_eq!(list.file_count(), 1);
        assert_eq!(list.files[0], vec![0x3F00, 0x7FFF, 0x6F07]);
    }

    #[test]
    fn text_string_eight_bit() {
        let mut buf = bytes_of(&[0x8D, 0x05, 0x04, b'T', b'e', b's', b't']);
        let text = TextString::decode(&mut buf).unwrap();
        assert_eq!(text.dcs.alphabet, Alphabet::EightBit);
        assert_eq!(text.text, "Test");
    }

    #[test]
    fn text_string_gsm7() {
        let mut value = vec![0x00];
        value.extend_from_slice(&pack_gsm7("hello"));
        let mut raw = vec![0x8D, value.len() as u8];
        raw.extend_from_slice(&value);
        let mut buf = bytes_of(&raw);
        let text = TextString::decode(&mut buf).unwrap();
        assert_eq!(text.dcs.alphabet, Alphabet::Gsm7Default);
        assert_eq!(text.text, "hello");
    }

    #[test]
    fn text_string_ucs2_round_trip() {
        let text = TextString {
            dcs: DataCodingScheme { alphabet: Alphabet::Ucs2, ..Default::default() },
            text: "héllo".into(),
        };
        let mut out = BytesMut::new();
        text.encode(&mut out).unwrap();
        let mut buf = out.freeze();
        assert_eq!(TextString::decode(&mut buf).unwrap(), text);
    }

    #[test]
    fn empty_text_string_is_valid() {
        let mut buf = bytes_of(&[0x0D, 0x00]);
        assert_eq!(TextString::decode(&mut buf).unwrap(), TextString::default());
    }

    #[test]
    fn event_list_unknown_event_policy() {
        // comprehension required: unknown event is beyond ME capability
        let mut buf = bytes_of(&[tag::EVENT_LIST | CR_FLAG, 0x02, 0x04, 0x7E]);
        assert_eq!(
            EventList::decode(&mut buf),
            Err(SatError::BeyondMeCapability("unknown event"))
        );

        // without the flag the unknown event is dropped
        let mut buf = bytes_of(&[tag::EVENT_LIST, 0x02, 0x04, 0x7E]);
        let list = EventList::decode(&mut buf).unwrap();
        assert_eq!(list.events, vec![SatEvent::UserActivity]);
    }

    #[test]
    fn bearer_description_unsupported_kind() {
        let mut buf = bytes_of(&[0xB5, 0x01, 0x09]);
        assert_eq!(
            BearerDescription::decode(&mut buf),
            Err(SatError::BeyondMeCapability("unsupported bearer description"))
        );
    }

    #[test]
    fn other_address_variants() {
        let mut buf = bytes_of(&[0xBE, 0x00]);
        assert_eq!(OtherAddress::decode(&mut buf).unwrap(), OtherAddress::Dynamic);

        let mut buf = bytes_of(&[0xBE, 0x05, 0x21, 10, 0, 0, 1]);
        assert_eq!(
            OtherAddress::decode(&mut buf).unwrap(),
            OtherAddress::Ipv4([10, 0, 0, 1])
        );

        let mut buf = bytes_of(&[0xBE, 0x05, 0x99, 10, 0, 0, 1]);
        assert!(matches!(
            OtherAddress::decode(&mut buf),
            Err(SatError::BeyondMeCapability(_))
        ));
    }

    #[test]
    fn date_time_timezone_round_trip() {
        let dtt = DateTimeTimezone {
            year: 26,
            month: 8,
            day: 26,
            hour: 13,
            minute: 37,
            second: 9,
            timezone: 0xFF,
        };
        let mut out = BytesMut::new();
        dtt.encode(&mut out);
        let mut buf = out.freeze();
        assert_eq!(DateTimeTimezone::decode(&mut buf).unwrap(), dtt);
    }

    #[test]
    fn channel_status_round_trip() {
        let status = ChannelStatus { channel_id: 1, link_established: true, info: 0 };
        let mut out = BytesMut::new();
        status.encode(&mut out);
        let mut buf = out.freeze();
        assert_eq!(ChannelStatus::decode(&mut buf).unwrap(), status);
    }

    #[test]
    fn transport_level_rejects_unknown_protocol() {
        let mut buf = bytes_of(&[0xBC, 0x03, 0x07, 0x1F, 0x90]);
        assert!(matches!(
            UiccTransportLevel::decode(&mut buf),
            Err(SatError::BeyondMeCapability(_))
        ));
    }

    #[test]
    fn transport_level_round_trip() {
        let level = UiccTransportLevel { protocol: TransportProtocol::Tcp, port: 8080 };
        let mut out = BytesMut::new();
        level.encode(&mut out);
        let mut buf = out.freeze();
        assert_eq!(UiccTransportLevel::decode(&mut buf).unwrap(), level);
    }

    #[test]
    fn help_request_is_presence_only() {
        let mut buf = bytes_of(&[0x95, 0x00, 0x1E]);
        decode_help_request(&mut buf).unwrap();
        assert_eq!(crate::tlv::peek_tag(&buf), Some(tag::ICON_IDENTIFIER));
    }

    #[test]
    fn length_field_equivalence() {
        // same alpha identifier with 1-byte and 0x81-prefixed length forms
        let mut short = bytes_of(&[0x05, 0x03, b'a', b'b', b'c']);
        let mut long = bytes_of(&[0x05, 0x81, 0x03, b'a', b'b', b'c']);
        assert_eq!(
            AlphaIdentifier::decode(&mut short).unwrap(),
            AlphaIdentifier::decode(&mut long).unwrap()
        );
    }
}
