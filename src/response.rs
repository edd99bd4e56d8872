//! Terminal Response encoding
//!
//! After executing (or failing to execute) a proactive command the terminal
//! answers with `Command Details | Device Identities | Result |
//! command-specific objects`. The response body has no outer envelope tag;
//! it is carried directly in the TERMINAL RESPONSE APDU.
//!
//! The result object is one general result byte plus additional-information
//! bytes whose presence depends on the general result. The pairing is
//! enforced by the type system: a result that needs a cause byte carries the
//! matching [`AdditionalInfo`] variant, and a mismatched pairing fails the
//! encode with nothing written.

use bytes::BytesMut;

use crate::error::{SatError, SatResult};
use crate::ie::{
    BearerDescription, BufferSize, ChannelData, ChannelDataLength, ChannelStatus, CommandDetails,
    DateTimeTimezone, DeviceIdentities, Language, TextString,
};
use crate::tlv::{self, tag};
use crate::types::DeviceIdentity;

/// General result byte of the Result object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ResultType {
    Success = 0x00,
    SuccessPartialComprehension = 0x01,
    SuccessMissingInfo = 0x02,
    RefreshWithAdditionalEfs = 0x03,
    SuccessIconNotDisplayed = 0x04,
    SuccessModifiedByCallControl = 0x05,
    SuccessLimitedService = 0x06,
    SuccessWithModification = 0x07,
    RefreshUsimNotActive = 0x08,

    SessionTerminatedByUser = 0x10,
    BackwardMoveByUser = 0x11,
    NoResponseFromUser = 0x12,
    HelpInfoRequired = 0x13,
    UssdTransactionTerminatedByUser = 0x14,

    MeUnableToProcess = 0x20,
    NetworkUnableToProcess = 0x21,
    UserDidNotAcceptCall = 0x22,
    UserClearedDownCall = 0x23,
    ContradictionWithTimerState = 0x24,
    InteractionWithCcTemporary = 0x25,
    LaunchBrowserError = 0x26,

    BeyondMeCapabilities = 0x30,
    CommandTypeNotUnderstood = 0x31,
    CommandDataNotUnderstood = 0x32,
    CommandNumberNotKnown = 0x33,
    SsReturnError = 0x34,
    SmsRpError = 0x35,
    RequiredValuesMissing = 0x36,
    UssdReturnError = 0x37,
    InteractionWithCcPermanent = 0x39,
    BipError = 0x3A,
    FramesError = 0x3C,
}

/// ME problem cause for [`ResultType::MeUnableToProcess`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum MeProblem {
    #[default]
    NoCause = 0x00,
    ScreenBusy = 0x01,
    MeBusyOnCall = 0x02,
    MeBusyOnSs = 0x03,
    NoService = 0x04,
    AccessControlClassBar = 0x05,
    RadioResourceNotGranted = 0x06,
    NotInSpeechCall = 0x07,
    MeBusyOnUssd = 0x08,
    MeBusyOnDtmf = 0x09,
}

/// BIP problem cause for [`ResultType::BipError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum BipProblem {
    #[default]
    NoCause = 0x00,
    NoChannelAvailable = 0x01,
    ChannelClosed = 0x02,
    ChannelIdNotValid = 0x03,
    RequestedBufferSizeNotAvailable = 0x04,
    SecurityError = 0x05,
    TransportLevelNotAvailable = 0x06,
    RemoteDeviceNotReachable = 0x07,
    ServiceError = 0x08,
    ServiceIdUnknown = 0x09,
}

/// Call control problem cause for the interaction-with-call-control results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum CcProblem {
    #[default]
    NoCause = 0x00,
    ActionNotAllowed = 0x01,
    RequestTypeChanged = 0x02,
}

/// Browser problem cause for [`ResultType::LaunchBrowserError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum BrowserProblem {
    #[default]
    NoCause = 0x00,
    BearerUnavailable = 0x01,
    BrowserUnavailable = 0x02,
    UnableToReadProvisioningData = 0x03,
}

/// Additional information bytes of the Result object.
///
/// Which variant is valid follows from the general result; see
/// [`CommandResult::result_value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdditionalInfo {
    #[default]
    None,
    Me(MeProblem),
    /// Network cause, coded per TS 24.008 with bit 8 set; 0x00 when no
    /// specific cause is available
    Network(u8),
    /// SS return error code
    Ss(u8),
    /// SMS-RP error cause
    Sms(u8),
    /// USSD return error code
    Ussd(u8),
    Bip(BipProblem),
    CallControl(CcProblem),
    Browser(BrowserProblem),
    /// Frames error cause
    Frames(u8),
}

/// General result plus its additional information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandResult {
    pub result_type: ResultType,
    pub additional_info: AdditionalInfo,
}

impl CommandResult {
    pub fn success() -> Self {
        Self { result_type: ResultType::Success, additional_info: AdditionalInfo::None }
    }

    /// Result for a command that failed to decode
    pub fn from_error(err: &SatError) -> Self {
        Self { result_type: err.general_result(), additional_info: AdditionalInfo::None }
    }

    /// The Result object value bytes: general result plus any cause bytes.
    ///
    /// A pairing the result table does not allow fails with nothing decided
    /// about the output buffer.
    fn result_value(&self) -> SatResult<Vec<u8>> {
        let mut value = vec![self.result_type as u8];
        let extra = match (self.result_type, self.additional_info) {
            (ResultType::MeUnableToProcess, AdditionalInfo::Me(p)) => Some(p as u8),
            (ResultType::NetworkUnableToProcess, AdditionalInfo::Network(cause)) => Some(cause),
            (ResultType::SsReturnError, AdditionalInfo::Ss(code)) => Some(code),
            (ResultType::SmsRpError, AdditionalInfo::Sms(cause)) => Some(cause),
            (ResultType::UssdReturnError, AdditionalInfo::Ussd(code)) => Some(code),
            (ResultType::BipError, AdditionalInfo::Bip(p)) => Some(p as u8),
            (
                ResultType::InteractionWithCcTemporary | ResultType::InteractionWithCcPermanent,
                AdditionalInfo::CallControl(p),
            ) => Some(p as u8),
            (ResultType::LaunchBrowserError, AdditionalInfo::Browser(p)) => Some(p as u8),
            (ResultType::FramesError, AdditionalInfo::Frames(cause)) => Some(cause),
            (
                ResultType::MeUnableToProcess
                | ResultType::NetworkUnableToProcess
                | ResultType::SsReturnError
                | ResultType::SmsRpError
                | ResultType::UssdReturnError
                | ResultType::BipError
                | ResultType::InteractionWithCcTemporary
                | ResultType::InteractionWithCcPermanent
                | ResultType::LaunchBrowserError
                | ResultType::FramesError,
                _,
            ) => return Err(SatError::InvalidParameter("result requires a cause byte")),
            (_, AdditionalInfo::None) => None,
            (_, _) => return Err(SatError::InvalidParameter("result takes no cause byte")),
        };
        if let Some(byte) = extra {
            value.push(byte);
        }
        Ok(value)
    }
}

/// Local information returned by PROVIDE LOCAL INFORMATION
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalInfo {
    DateTimeTimezone(DateTimeTimezone),
    Language(Language),
}

/// Command-specific objects appended after the Result object
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResponsePayload {
    #[default]
    None,
    /// GET INKEY / GET INPUT user input
    Text(TextString),
    /// SELECT ITEM chosen item
    ItemIdentifier(u8),
    /// OPEN CHANNEL outcome; the bearer description and buffer size echo
    /// what was actually granted
    OpenChannel {
        channel_status: ChannelStatus,
        bearer_description: Option<BearerDescription>,
        buffer_size: Option<BufferSize>,
    },
    /// GET CHANNEL STATUS, one object per open channel
    ChannelStatusList(Vec<ChannelStatus>),
    /// SEND DATA remaining transmit buffer space
    SendData { data_length: ChannelDataLength },
    /// RECEIVE DATA payload plus count of bytes still buffered
    ReceiveData { data: ChannelData, remaining: ChannelDataLength },
    /// PROVIDE LOCAL INFORMATION answer
    LocalInfo(LocalInfo),
}

/// A complete Terminal Response ready for encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalResponse {
    pub command_details: CommandDetails,
    pub result: CommandResult,
    pub payload: ResponsePayload,
}

impl TerminalResponse {
    pub fn new(command_details: CommandDetails, result: CommandResult) -> Self {
        Self { command_details, result, payload: ResponsePayload::None }
    }

    /// Encode the response body.
    ///
    /// The comprehension flags on the echoed objects follow the flag
    /// captured from the received Command Details.
    pub fn encode(&self) -> SatResult<BytesMut> {
        // validate the result pairing before touching the buffer
        let result_value = self.result.result_value()?;

        let mut buf = BytesMut::new();
        let cr = self.command_details.comprehension_required;
        self.command_details.encode(&mut buf);
        let devices = DeviceIdentities {
            source: DeviceIdentity::Me,
            destination: DeviceIdentity::Sim,
        };
        devices.encode(&mut buf, cr);
        tlv::put_data_object(&mut buf, tag::RESULT, cr, &result_value)?;

        match &self.payload {
            ResponsePayload::None => {}
            ResponsePayload::Text(text) => text.encode(&mut buf)?,
            ResponsePayload::ItemIdentifier(identifier) => {
                tlv::put_data_object(&mut buf, tag::ITEM_IDENTIFIER, cr, &[*identifier])?;
            }
            ResponsePayload::OpenChannel { channel_status, bearer_description, buffer_size } => {
                channel_status.encode(&mut buf);
                if let Some(bearer_description) = bearer_description {
                    bearer_description.encode(&mut buf)?;
                }
                if let Some(buffer_size) = buffer_size {
                    buffer_size.encode(&mut buf);
                }
            }
            ResponsePayload::ChannelStatusList(list) => {
                for status in list {
                    status.encode(&mut buf);
                }
            }
            ResponsePayload::SendData { data_length } => data_length.encode(&mut buf),
            ResponsePayload::ReceiveData { data, remaining } => {
                data.encode(&mut buf)?;
                remaining.encode(&mut buf);
            }
            ResponsePayload::LocalInfo(LocalInfo::DateTimeTimezone(dtt)) => dtt.encode(&mut buf),
            ResponsePayload::LocalInfo(LocalInfo::Language(language)) => language.encode(&mut buf),
        }
        Ok(buf)
    }
}

/// Encode a Terminal Response body ready for the TERMINAL RESPONSE APDU.
pub fn encode_terminal_response(response: &TerminalResponse) -> SatResult<BytesMut> {
    response.encode()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> CommandDetails {
        CommandDetails {
            comprehension_required: true,
            command_number: 1,
            command_type: 0x21,
            qualifier: 0x00,
        }
    }

    #[test]
    fn success_response_layout() {
        let response = TerminalResponse::new(details(), CommandResult::success());
        let out = response.encode().unwrap();
        assert_eq!(
            &out[..],
            &[
                0x81, 0x03, 0x01, 0x21, 0x00, // command details echo
                0x82, 0x02, 0x82, 0x81, // devices: ME -> SIM
                0x83, 0x01, 0x00, // result: success, no extra byte
            ]
        );
    }

    #[test]
    fn comprehension_flag_is_echoed() {
        let mut d = details();
        d.comprehension_required = false;
        let response = TerminalResponse::new(d, CommandResult::success());
        let out = response.encode().unwrap();
        assert_eq!(out[0], 0x01);
        assert_eq!(out[5], 0x02);
        assert_eq!(out[9], 0x03);
    }

    #[test]
    fn ss_return_error_carries_exactly_one_cause_byte() {
        let response = TerminalResponse::new(
            details(),
            CommandResult {
                result_type: ResultType::SsReturnError,
                additional_info: AdditionalInfo::Ss(0x11),
            },
        );
        let out = response.encode().unwrap();
        assert_eq!(&out[out.len() - 4..], &[0x83, 0x02, 0x34, 0x11]);
    }

    #[test]
    fn missing_cause_byte_fails_encode() {
        let response = TerminalResponse::new(
            details(),
            CommandResult {
                result_type: ResultType::SsReturnError,
                additional_info: AdditionalInfo::None,
            },
        );
        assert_eq!(
            response.encode(),
            Err(SatError::InvalidParameter("result requires a cause byte"))
        );
    }

    #[test]
    fn unexpected_cause_byte_fails_encode() {
        let response = TerminalResponse::new(
            details(),
            CommandResult {
                result_type: ResultType::Success,
                additional_info: AdditionalInfo::Me(MeProblem::ScreenBusy),
            },
        );
        assert!(response.encode().is_err());
    }

    #[test]
    fn me_unable_to_process_with_cause() {
        let response = TerminalResponse::new(
            details(),
            CommandResult {
                result_type: ResultType::MeUnableToProcess,
                additional_info: AdditionalInfo::Me(MeProblem::ScreenBusy),
            },
        );
        let out = response.encode().unwrap();
        assert_eq!(&out[out.len() - 4..], &[0x83, 0x02, 0x20, 0x01]);
    }

    #[test]
    fn inkey_response_appends_text() {
        let response = TerminalResponse {
            command_details: details(),
            result: CommandResult::success(),
            payload: ResponsePayload::Text(TextString {
                dcs: crate::types::DataCodingScheme {
                    alphabet: crate::types::Alphabet::EightBit,
                    ..Default::default()
                },
                text: "y".into(),
            }),
        };
        let out = response.encode().unwrap();
        assert_eq!(&out[out.len() - 4..], &[0x8D, 0x02, 0x04, b'y']);
    }

    #[test]
    fn select_item_response_appends_item_identifier() {
        let response = TerminalResponse {
            command_details: details(),
            result: CommandResult::success(),
            payload: ResponsePayload::ItemIdentifier(0x02),
        };
        let out = response.encode().unwrap();
        assert_eq!(&out[out.len() - 3..], &[0x90, 0x01, 0x02]);
    }

    #[test]
    fn decode_error_maps_into_result() {
        let err = SatError::RequiredValueMissing("menu items");
        let result = CommandResult::from_error(&err);
        assert_eq!(result.result_type, ResultType::RequiredValuesMissing);
        assert_eq!(result.additional_info, AdditionalInfo::None);
    }

    #[test]
    fn open_channel_response_payload() {
        let response = TerminalResponse {
            command_details: CommandDetails {
                comprehension_required: true,
                command_number: 1,
                command_type: 0x40,
                qualifier: 0x03,
            },
            result: CommandResult::success(),
            payload: ResponsePayload::OpenChannel {
                channel_status: ChannelStatus { channel_id: 1, link_established: true, info: 0 },
                bearer_description: None,
                buffer_size: Some(BufferSize { size: 1400 }),
            },
        };
        let out = response.encode().unwrap();
        assert_eq!(&out[out.len() - 8..], &[0xB8, 0x02, 0x81, 0x00, 0xB9, 0x02, 0x05, 0x78]);
    }
}
