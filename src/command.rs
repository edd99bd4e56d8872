//! Proactive command decoding
//!
//! A proactive command arrives as `D0 | length | Command Details | Device
//! Identities | command-specific objects`. [`decode_proactive_command`]
//! validates the outer frame, reads the two leading objects and dispatches
//! on the command type byte. Each command has its own struct whose decoder
//! scans the remaining objects; unknown optional objects are skipped except
//! in the strict UI commands where they fail the decode.

use bytes::{Buf, Bytes};

use crate::error::{SatError, SatResult};
use crate::ie::*;
use crate::tlv::{self, tag, PROACTIVE_COMMAND_TAG};

/// Proactive command type byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    Refresh = 0x01,
    MoreTime = 0x02,
    PollInterval = 0x03,
    PollingOff = 0x04,
    SetupEventList = 0x05,
    SetupCall = 0x10,
    SendSs = 0x11,
    SendUssd = 0x12,
    SendShortMessage = 0x13,
    SendDtmf = 0x14,
    LaunchBrowser = 0x15,
    PlayTone = 0x20,
    DisplayText = 0x21,
    GetInkey = 0x22,
    GetInput = 0x23,
    SelectItem = 0x24,
    SetupMenu = 0x25,
    ProvideLocalInformation = 0x26,
    SetupIdleModeText = 0x28,
    LanguageNotification = 0x35,
    OpenChannel = 0x40,
    CloseChannel = 0x41,
    ReceiveData = 0x42,
    SendData = 0x43,
    GetChannelStatus = 0x44,
}

impl TryFrom<u8> for CommandType {
    type Error = SatError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(Self::Refresh),
            0x02 => Ok(Self::MoreTime),
            0x03 => Ok(Self::PollInterval),
            0x04 => Ok(Self::PollingOff),
            0x05 => Ok(Self::SetupEventList),
            0x10 => Ok(Self::SetupCall),
            0x11 => Ok(Self::SendSs),
            0x12 => Ok(Self::SendUssd),
            0x13 => Ok(Self::SendShortMessage),
            0x14 => Ok(Self::SendDtmf),
            0x15 => Ok(Self::LaunchBrowser),
            0x20 => Ok(Self::PlayTone),
            0x21 => Ok(Self::DisplayText),
            0x22 => Ok(Self::GetInkey),
            0x23 => Ok(Self::GetInput),
            0x24 => Ok(Self::SelectItem),
            0x25 => Ok(Self::SetupMenu),
            0x26 => Ok(Self::ProvideLocalInformation),
            0x28 => Ok(Self::SetupIdleModeText),
            0x35 => Ok(Self::LanguageNotification),
            0x40 => Ok(Self::OpenChannel),
            0x41 => Ok(Self::CloseChannel),
            0x42 => Ok(Self::ReceiveData),
            0x43 => Ok(Self::SendData),
            0x44 => Ok(Self::GetChannelStatus),
            _ => Err(SatError::BeyondMeCapability("unknown command type")),
        }
    }
}

/// REFRESH mode from the command qualifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    InitAndFullFileChange,
    FileChangeNotification,
    InitAndFileChange,
    Init,
    UiccReset,
}

impl TryFrom<u8> for RefreshMode {
    type Error = SatError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Self::InitAndFullFileChange),
            0x01 => Ok(Self::FileChangeNotification),
            0x02 => Ok(Self::InitAndFileChange),
            0x03 => Ok(Self::Init),
            0x04 => Ok(Self::UiccReset),
            _ => Err(SatError::BeyondMeCapability("unknown refresh mode")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refresh {
    pub details: CommandDetails,
    pub devices: DeviceIdentities,
    pub mode: RefreshMode,
    pub file_list: Option<FileList>,
    pub aid: Option<Aid>,
}

impl Refresh {
    fn decode(details: CommandDetails, devices: DeviceIdentities, buf: &mut Bytes) -> SatResult<Self> {
        let mode = RefreshMode::try_from(details.qualifier)?;
        let mut file_list = None;
        let mut aid = None;
        while let Some(t) = tlv::peek_tag(buf) {
            match tlv::tag_value(t) {
                tag::FILE_LIST => file_list = Some(FileList::decode(buf)?),
                tag::AID => aid = Some(Aid::decode(buf)?),
                _ => tlv::skip_data_object(buf)?,
            }
        }
        // file-change modes carry the changed files
        if matches!(mode, RefreshMode::FileChangeNotification | RefreshMode::InitAndFileChange)
            && file_list.is_none()
        {
            return Err(SatError::RequiredValueMissing("refresh file list"));
        }
        Ok(Self { details, devices, mode, file_list, aid })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoreTime {
    pub details: CommandDetails,
    pub devices: DeviceIdentities,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollInterval {
    pub details: CommandDetails,
    pub devices: DeviceIdentities,
    pub duration: Duration,
}

impl PollInterval {
    fn decode(details: CommandDetails, devices: DeviceIdentities, buf: &mut Bytes) -> SatResult<Self> {
        let duration = Duration::decode(buf)?;
        Ok(Self { details, devices, duration })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingOff {
    pub details: CommandDetails,
    pub devices: DeviceIdentities,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupEventList {
    pub details: CommandDetails,
    pub devices: DeviceIdentities,
    pub event_list: EventList,
}

impl SetupEventList {
    fn decode(details: CommandDetails, devices: DeviceIdentities, buf: &mut Bytes) -> SatResult<Self> {
        let event_list = EventList::decode(buf)?;
        Ok(Self { details, devices, event_list })
    }
}

/// SET UP CALL condition from the command qualifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallCondition {
    IfNotBusy,
    IfNotBusyWithRedial,
    PuttingOthersOnHold,
    PuttingOthersOnHoldWithRedial,
    DisconnectingOthers,
    DisconnectingOthersWithRedial,
}

impl TryFrom<u8> for CallCondition {
    type Error = SatError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Self::IfNotBusy),
            0x01 => Ok(Self::IfNotBusyWithRedial),
            0x02 => Ok(Self::PuttingOthersOnHold),
            0x03 => Ok(Self::PuttingOthersOnHoldWithRedial),
            0x04 => Ok(Self::DisconnectingOthers),
            0x05 => Ok(Self::DisconnectingOthersWithRedial),
            _ => Err(SatError::BeyondMeCapability("unknown call condition")),
        }
    }
}

/// SET UP CALL: the first alpha/icon pair belongs to the user confirmation
/// phase, the second to the call set-up phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupCall {
    pub details: CommandDetails,
    pub devices: DeviceIdentities,
    pub condition: CallCondition,
    pub confirm_alpha: Option<AlphaIdentifier>,
    pub address: Address,
    pub ccp: Option<Ccp>,
    pub sub_address: Option<SubAddress>,
    pub duration: Option<Duration>,
    pub setup_alpha: Option<AlphaIdentifier>,
    pub confirm_icon: Option<IconIdentifier>,
    pub setup_icon: Option<IconIdentifier>,
}

impl SetupCall {
    fn decode(details: CommandDetails, devices: DeviceIdentities, buf: &mut Bytes) -> SatResult<Self> {
        let condition = CallCondition::try_from(details.qualifier)?;
        let mut confirm_alpha = None;
        let mut setup_alpha = None;
        let mut address = None;
        let mut ccp = None;
        let mut sub_address = None;
        let mut duration = None;
        let mut confirm_icon = None;
        let mut setup_icon = None;
        while let Some(t) = tlv::peek_tag(buf) {
            match tlv::tag_value(t) {
                tag::ALPHA_IDENTIFIER => {
                    let alpha = Some(AlphaIdentifier::decode(buf)?);
                    if confirm_alpha.is_none() {
                        confirm_alpha = alpha;
                    } else {
                        setup_alpha = alpha;
                    }
                }
                tag::ADDRESS => address = Some(Address::decode(buf)?),
                tag::CAPABILITY_CONFIG_PARAMS => ccp = Some(Ccp::decode(buf)?),
                tag::SUB_ADDRESS => sub_address = Some(SubAddress::decode(buf)?),
                tag::DURATION => duration = Some(Duration::decode(buf)?),
                tag::ICON_IDENTIFIER => {
                    let icon = Some(IconIdentifier::decode(buf)?);
                    if confirm_icon.is_none() {
                        confirm_icon = icon;
                    } else {
                        setup_icon = icon;
                    }
                }
                _ => tlv::skip_data_object(buf)?,
            }
        }
        let address = address.ok_or(SatError::RequiredValueMissing("call address"))?;
        Ok(Self {
            details,
            devices,
            condition,
            confirm_alpha,
            address,
            ccp,
            sub_address,
            duration,
            setup_alpha,
            confirm_icon,
            setup_icon,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendSs {
    pub details: CommandDetails,
    pub devices: DeviceIdentities,
    pub alpha: Option<AlphaIdentifier>,
    pub ss_string: SsString,
    pub icon: Option<IconIdentifier>,
}

impl SendSs {
    fn decode(details: CommandDetails, devices: DeviceIdentities, buf: &mut Bytes) -> SatResult<Self> {
        let mut alpha = None;
        let mut ss_string = None;
        let mut icon = None;
        while let Some(t) = tlv::peek_tag(buf) {
            match tlv::tag_value(t) {
                tag::ALPHA_IDENTIFIER => alpha = Some(AlphaIdentifier::decode(buf)?),
                tag::SS_STRING => ss_string = Some(SsString::decode(buf)?),
                tag::ICON_IDENTIFIER => icon = Some(IconIdentifier::decode(buf)?),
                _ => tlv::skip_data_object(buf)?,
            }
        }
        let ss_string = ss_string.ok_or(SatError::RequiredValueMissing("SS string"))?;
        Ok(Self { details, devices, alpha, ss_string, icon })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendUssd {
    pub details: CommandDetails,
    pub devices: DeviceIdentities,
    pub alpha: Option<AlphaIdentifier>,
    pub ussd_string: UssdString,
    pub icon: Option<IconIdentifier>,
}

impl SendUssd {
    fn decode(details: CommandDetails, devices: DeviceIdentities, buf: &mut Bytes) -> SatResult<Self> {
        let mut alpha = None;
        let mut ussd_string = None;
        let mut icon = None;
        while let Some(t) = tlv::peek_tag(buf) {
            match tlv::tag_value(t) {
                tag::USSD_STRING => ussd_string = Some(UssdString::decode(buf)?),
                tag::ALPHA_IDENTIFIER => alpha = Some(AlphaIdentifier::decode(buf)?),
                tag::ICON_IDENTIFIER => icon = Some(IconIdentifier::decode(buf)?),
                _ => tlv::skip_data_object(buf)?,
            }
        }
        let ussd_string = ussd_string.ok_or(SatError::RequiredValueMissing("USSD string"))?;
        Ok(Self { details, devices, alpha, ussd_string, icon })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendShortMessage {
    pub details: CommandDetails,
    pub devices: DeviceIdentities,
    /// qualifier bit 0: the TPDU needs GSM-7 packing before submission
    pub packing_required: bool,
    pub alpha: Option<AlphaIdentifier>,
    pub address: Option<Address>,
    pub tpdu: SmsTpdu,
    pub icon: Option<IconIdentifier>,
}

impl SendShortMessage {
    fn decode(details: CommandDetails, devices: DeviceIdentities, buf: &mut Bytes) -> SatResult<Self> {
        let mut alpha = None;
        let mut address = None;
        let mut tpdu = None;
        let mut icon = None;
        while let Some(t) = tlv::peek_tag(buf) {
            match tlv::tag_value(t) {
                tag::ALPHA_IDENTIFIER => alpha = Some(AlphaIdentifier::decode(buf)?),
                tag::ADDRESS => address = Some(Address::decode(buf)?),
                tag::SMS_TPDU => tpdu = Some(SmsTpdu::decode(buf)?),
                tag::ICON_IDENTIFIER => icon = Some(IconIdentifier::decode(buf)?),
                _ => tlv::skip_data_object(buf)?,
            }
        }
        let tpdu = tpdu.ok_or(SatError::RequiredValueMissing("SMS TPDU"))?;
        Ok(Self {
            details,
            devices,
            packing_required: details.qualifier & 0x01 != 0,
            alpha,
            address,
            tpdu,
            icon,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendDtmf {
    pub details: CommandDetails,
    pub devices: DeviceIdentities,
    pub alpha: Option<AlphaIdentifier>,
    pub dtmf: DtmfString,
    pub icon: Option<IconIdentifier>,
}

impl SendDtmf {
    fn decode(details: CommandDetails, devices: DeviceIdentities, buf: &mut Bytes) -> SatResult<Self> {
        let mut alpha = None;
        let mut dtmf = None;
        let mut icon = None;
        while let Some(t) = tlv::peek_tag(buf) {
            match tlv::tag_value(t) {
                tag::DTMF_STRING => dtmf = Some(DtmfString::decode(buf)?),
                tag::ALPHA_IDENTIFIER => alpha = Some(AlphaIdentifier::decode(buf)?),
                tag::ICON_IDENTIFIER => icon = Some(IconIdentifier::decode(buf)?),
                _ => tlv::skip_data_object(buf)?,
            }
        }
        let dtmf = dtmf.ok_or(SatError::RequiredValueMissing("DTMF string"))?;
        Ok(Self { details, devices, alpha, dtmf, icon })
    }
}

/// LAUNCH BROWSER mode from the command qualifier; value 0x01 is reserved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchBrowserMode {
    LaunchIfNotRunning,
    UseExistingBrowser,
    CloseAndRelaunch,
}

impl TryFrom<u8> for LaunchBrowserMode {
    type Error = SatError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Self::LaunchIfNotRunning),
            0x02 => Ok(Self::UseExistingBrowser),
            0x03 => Ok(Self::CloseAndRelaunch),
            _ => Err(SatError::BeyondMeCapability("unknown browser launch mode")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchBrowser {
    pub details: CommandDetails,
    pub devices: DeviceIdentities,
    pub mode: LaunchBrowserMode,
    pub browser_identity: Option<BrowserIdentity>,
    pub url: Url,
    pub bearer: Option<Bearer>,
    pub provisioning_files: Vec<ProvisioningFileRef>,
    /// Gateway or proxy identity
    pub gateway_text: Option<TextString>,
    pub alpha: Option<AlphaIdentifier>,
    pub icon: Option<IconIdentifier>,
}

impl LaunchBrowser {
    fn decode(details: CommandDetails, devices: DeviceIdentities, buf: &mut Bytes) -> SatResult<Self> {
        let mode = LaunchBrowserMode::try_from(details.qualifier)?;
        let mut browser_identity = None;
        let mut url = None;
        let mut bearer = None;
        let mut provisioning_files = Vec::new();
        let mut gateway_text = None;
        let mut alpha = None;
        let mut icon = None;
        while let Some(t) = tlv::peek_tag(buf) {
            match tlv::tag_value(t) {
                tag::BROWSER_IDENTITY => browser_identity = Some(BrowserIdentity::decode(buf)?),
                tag::URL => url = Some(Url::decode(buf)?),
                tag::BEARER => bearer = Some(Bearer::decode(buf)?),
                tag::PROVISIONING_REFERENCE_FILE => {
                    provisioning_files.push(ProvisioningFileRef::decode(buf)?)
                }
                tag::TEXT_STRING => gateway_text = Some(TextString::decode(buf)?),
                tag::ALPHA_IDENTIFIER => alpha = Some(AlphaIdentifier::decode(buf)?),
                tag::ICON_IDENTIFIER => icon = Some(IconIdentifier::decode(buf)?),
                _ => tlv::skip_data_object(buf)?,
            }
        }
        let url = url.ok_or(SatError::RequiredValueMissing("browser URL"))?;
        Ok(Self {
            details,
            devices,
            mode,
            browser_identity,
            url,
            bearer,
            provisioning_files,
            gateway_text,
            alpha,
            icon,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayTone {
    pub details: CommandDetails,
    pub devices: DeviceIdentities,
    pub alpha: Option<AlphaIdentifier>,
    pub tone: Option<Tone>,
    pub duration: Option<Duration>,
    pub icon: Option<IconIdentifier>,
}

impl PlayTone {
    fn decode(details: CommandDetails, devices: DeviceIdentities, buf: &mut Bytes) -> SatResult<Self> {
        let mut alpha = None;
        let mut tone = None;
        let mut duration = None;
        let mut icon = None;
        while let Some(t) = tlv::peek_tag(buf) {
            match tlv::tag_value(t) {
                tag::ALPHA_IDENTIFIER => alpha = Some(AlphaIdentifier::decode(buf)?),
                tag::TONE => tone = Some(Tone::decode(buf)?),
                tag::DURATION => duration = Some(Duration::decode(buf)?),
                tag::ICON_IDENTIFIER => icon = Some(IconIdentifier::decode(buf)?),
                _ => tlv::skip_data_object(buf)?,
            }
        }
        Ok(Self { details, devices, alpha, tone, duration, icon })
    }
}

/// DISPLAY TEXT priority from qualifier bit 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextPriority {
    #[default]
    Normal,
    High,
}

/// DISPLAY TEXT clearing behaviour from qualifier bit 7
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClearMode {
    #[default]
    ClearAfterDelay,
    WaitForUserToClear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayText {
    pub details: CommandDetails,
    pub devices: DeviceIdentities,
    pub priority: TextPriority,
    pub clear_mode: ClearMode,
    pub text: TextString,
    pub icon: Option<IconIdentifier>,
    pub immediate_response: bool,
    pub duration: Option<Duration>,
    pub text_attribute: Option<TextAttribute>,
    pub frame: Option<FrameIdentifier>,
}

impl DisplayText {
    fn decode(details: CommandDetails, devices: DeviceIdentities, buf: &mut Bytes) -> SatResult<Self> {
        let text = TextString::decode(buf)?;
        let mut icon = None;
        let mut immediate_response = false;
        let mut duration = None;
        let mut text_attribute = None;
        let mut frame = None;
        while let Some(t) = tlv::peek_tag(buf) {
            match tlv::tag_value(t) {
                tag::ICON_IDENTIFIER => icon = Some(IconIdentifier::decode(buf)?),
                tag::IMMEDIATE_RESPONSE => {
                    decode_immediate_response(buf)?;
                    immediate_response = true;
                }
                tag::DURATION => duration = Some(Duration::decode(buf)?),
                tag::TEXT_ATTRIBUTE => text_attribute = Some(TextAttribute::decode(buf)?),
                tag::FRAME_IDENTIFIER => frame = Some(FrameIdentifier::decode(buf)?),
                // the UI commands are strict about trailing objects
                _ => return Err(SatError::CommandNotUnderstood("unexpected display text object")),
            }
        }
        Ok(Self {
            details,
            devices,
            priority: if details.qualifier & 0x01 != 0 {
                TextPriority::High
            } else {
                TextPriority::Normal
            },
            clear_mode: if details.qualifier & 0x80 != 0 {
                ClearMode::WaitForUserToClear
            } else {
                ClearMode::ClearAfterDelay
            },
            text,
            icon,
            immediate_response,
            duration,
            text_attribute,
            frame,
        })
    }
}

/// Expected GET INKEY response, derived from qualifier bits 0-2
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InkeyResponse {
    Digits,
    SmsDefaultCharacter,
    Ucs2Character,
    YesNo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetInkey {
    pub details: CommandDetails,
    pub devices: DeviceIdentities,
    pub response: InkeyResponse,
    pub help_available: bool,
    pub text: TextString,
    pub icon: Option<IconIdentifier>,
    pub duration: Option<Duration>,
    pub text_attribute: Option<TextAttribute>,
    pub frame: Option<FrameIdentifier>,
}

impl GetInkey {
    fn decode(details: CommandDetails, devices: DeviceIdentities, buf: &mut Bytes) -> SatResult<Self> {
        let text = TextString::decode(buf)?;
        let mut icon = None;
        let mut duration = None;
        let mut text_attribute = None;
        let mut frame = None;
        while let Some(t) = tlv::peek_tag(buf) {
            match tlv::tag_value(t) {
                tag::ICON_IDENTIFIER => icon = Some(IconIdentifier::decode(buf)?),
                tag::DURATION => duration = Some(Duration::decode(buf)?),
                tag::TEXT_ATTRIBUTE => text_attribute = Some(TextAttribute::decode(buf)?),
                tag::FRAME_IDENTIFIER => frame = Some(FrameIdentifier::decode(buf)?),
                _ => return Err(SatError::CommandNotUnderstood("unexpected get inkey object")),
            }
        }
        let q = details.qualifier;
        let response = if q & 0x04 != 0 {
            InkeyResponse::YesNo
        } else if q & 0x01 == 0 {
            InkeyResponse::Digits
        } else if q & 0x02 != 0 {
            InkeyResponse::Ucs2Character
        } else {
            InkeyResponse::SmsDefaultCharacter
        };
        Ok(Self {
            details,
            devices,
            response,
            help_available: q & 0x80 != 0,
            text,
            icon,
            duration,
            text_attribute,
            frame,
        })
    }
}

/// Expected GET INPUT character set, derived from qualifier bits 0-1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Digits,
    SmsDefaultAlphabet,
    Ucs2,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetInput {
    pub details: CommandDetails,
    pub devices: DeviceIdentities,
    pub format: InputFormat,
    /// qualifier bit 2: user input is not echoed
    pub hide_input: bool,
    /// qualifier bit 3: response is returned GSM-7 packed
    pub packed_response: bool,
    pub help_available: bool,
    pub text: TextString,
    pub response_length: ResponseLength,
    pub default_text: Option<TextString>,
    pub icon: Option<IconIdentifier>,
    pub text_attribute: Option<TextAttribute>,
    pub frame: Option<FrameIdentifier>,
}

impl GetInput {
    fn decode(details: CommandDetails, devices: DeviceIdentities, buf: &mut Bytes) -> SatResult<Self> {
        let text = TextString::decode(buf)?;
        let response_length = ResponseLength::decode(buf)?;
        let mut default_text = None;
        let mut icon = None;
        let mut text_attribute = None;
        let mut frame = None;
        while let Some(t) = tlv::peek_tag(buf) {
            match tlv::tag_value(t) {
                tag::DEFAULT_TEXT => {
                    default_text = Some(TextString::decode_tagged(buf, tag::DEFAULT_TEXT)?)
                }
                tag::ICON_IDENTIFIER => icon = Some(IconIdentifier::decode(buf)?),
                tag::TEXT_ATTRIBUTE => text_attribute = Some(TextAttribute::decode(buf)?),
                tag::FRAME_IDENTIFIER => frame = Some(FrameIdentifier::decode(buf)?),
                _ => return Err(SatError::CommandNotUnderstood("unexpected get input object")),
            }
        }
        let q = details.qualifier;
        let format = if q & 0x01 == 0 {
            InputFormat::Digits
        } else if q & 0x02 != 0 {
            InputFormat::Ucs2
        } else {
            InputFormat::SmsDefaultAlphabet
        };
        Ok(Self {
            details,
            devices,
            format,
            hide_input: q & 0x04 != 0,
            packed_response: q & 0x08 != 0,
            help_available: q & 0x80 != 0,
            text,
            response_length,
            default_text,
            icon,
            text_attribute,
            frame,
        })
    }
}

/// SELECT ITEM presentation style from qualifier bits 0-1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresentationStyle {
    #[default]
    Default,
    DataValues,
    NavigationOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectItem {
    pub details: CommandDetails,
    pub devices: DeviceIdentities,
    pub presentation: PresentationStyle,
    pub soft_key_preferred: bool,
    pub help_available: bool,
    pub alpha: Option<AlphaIdentifier>,
    pub items: Vec<Item>,
    pub next_action: Option<ItemsNextActionIndicator>,
    pub default_item: Option<ItemIdentifier>,
    pub icon: Option<IconIdentifier>,
    pub item_icons: Option<IconIdentifierList>,
}

impl SelectItem {
    fn decode(details: CommandDetails, devices: DeviceIdentities, buf: &mut Bytes) -> SatResult<Self> {
        let mut alpha = None;
        let mut items = Vec::new();
        let mut next_action = None;
        let mut default_item = None;
        let mut icon = None;
        let mut item_icons = None;
        while let Some(t) = tlv::peek_tag(buf) {
            match tlv::tag_value(t) {
                tag::ALPHA_IDENTIFIER => alpha = Some(AlphaIdentifier::decode(buf)?),
                tag::ITEM => {
                    let item = Item::decode(buf)?;
                    if !item.is_null() {
                        items.push(item);
                    }
                }
                tag::ITEMS_NEXT_ACTION_INDICATOR => {
                    next_action = Some(ItemsNextActionIndicator::decode(buf)?)
                }
                tag::ITEM_IDENTIFIER => default_item = Some(ItemIdentifier::decode(buf)?),
                tag::ICON_IDENTIFIER => icon = Some(IconIdentifier::decode(buf)?),
                tag::ICON_IDENTIFIER_LIST => item_icons = Some(IconIdentifierList::decode(buf)?),
                _ => tlv::skip_data_object(buf)?,
            }
        }
        if items.is_empty() {
            return Err(SatError::RequiredValueMissing("selectable items"));
        }
        let q = details.qualifier;
        let presentation = if q & 0x01 == 0 {
            PresentationStyle::Default
        } else if q & 0x02 != 0 {
            PresentationStyle::NavigationOptions
        } else {
            PresentationStyle::DataValues
        };
        Ok(Self {
            details,
            devices,
            presentation,
            soft_key_preferred: q & 0x04 != 0,
            help_available: q & 0x80 != 0,
            alpha,
            items,
            next_action,
            default_item,
            icon,
            item_icons,
        })
    }
}

/// SET UP MENU; an empty item list means the existing menu is removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupMenu {
    pub details: CommandDetails,
    pub devices: DeviceIdentities,
    pub soft_key_preferred: bool,
    pub help_available: bool,
    pub alpha: AlphaIdentifier,
    pub items: Vec<Item>,
    pub next_action: Option<ItemsNextActionIndicator>,
    pub icon: Option<IconIdentifier>,
    pub item_icons: Option<IconIdentifierList>,
}

impl SetupMenu {
    pub fn is_menu_removal(&self) -> bool {
        self.items.is_empty()
    }

    fn decode(details: CommandDetails, devices: DeviceIdentities, buf: &mut Bytes) -> SatResult<Self> {
        let mut alpha = None;
        let mut items = Vec::new();
        let mut saw_item = false;
        let mut next_action = None;
        let mut icon = None;
        let mut item_icons = None;
        while let Some(t) = tlv::peek_tag(buf) {
            match tlv::tag_value(t) {
                tag::ALPHA_IDENTIFIER => alpha = Some(AlphaIdentifier::decode(buf)?),
                tag::ITEM => {
                    saw_item = true;
                    let item = Item::decode(buf)?;
                    if !item.is_null() {
                        items.push(item);
                    }
                }
                tag::ITEMS_NEXT_ACTION_INDICATOR => {
                    next_action = Some(ItemsNextActionIndicator::decode(buf)?)
                }
                tag::ICON_IDENTIFIER => icon = Some(IconIdentifier::decode(buf)?),
                tag::ICON_IDENTIFIER_LIST => item_icons = Some(IconIdentifierList::decode(buf)?),
                _ => tlv::skip_data_object(buf)?,
            }
        }
        let alpha = alpha.ok_or(SatError::RequiredValueMissing("menu title"))?;
        if !saw_item {
            return Err(SatError::RequiredValueMissing("menu items"));
        }
        let q = details.qualifier;
        Ok(Self {
            details,
            devices,
            soft_key_preferred: q & 0x01 != 0,
            help_available: q & 0x80 != 0,
            alpha,
            items,
            next_action,
            icon,
            item_icons,
        })
    }
}

/// PROVIDE LOCAL INFORMATION subject from the command qualifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalInfoKind {
    Location,
    Imei,
    NetworkMeasurement,
    DateTimeTimezone,
    Language,
    TimingAdvance,
    AccessTechnology,
}

impl TryFrom<u8> for LocalInfoKind {
    type Error = SatError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Self::Location),
            0x01 => Ok(Self::Imei),
            0x02 => Ok(Self::NetworkMeasurement),
            0x03 => Ok(Self::DateTimeTimezone),
            0x04 => Ok(Self::Language),
            0x05 => Ok(Self::TimingAdvance),
            0x06 => Ok(Self::AccessTechnology),
            _ => Err(SatError::BeyondMeCapability("unknown local information kind")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvideLocalInformation {
    pub details: CommandDetails,
    pub devices: DeviceIdentities,
    pub info: LocalInfoKind,
}

impl ProvideLocalInformation {
    fn decode(details: CommandDetails, devices: DeviceIdentities) -> SatResult<Self> {
        let info = LocalInfoKind::try_from(details.qualifier)?;
        Ok(Self { details, devices, info })
    }
}

/// SET UP IDLE MODE TEXT; an empty text string removes the idle text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupIdleModeText {
    pub details: CommandDetails,
    pub devices: DeviceIdentities,
    pub text: TextString,
    pub icon: Option<IconIdentifier>,
}

impl SetupIdleModeText {
    fn decode(details: CommandDetails, devices: DeviceIdentities, buf: &mut Bytes) -> SatResult<Self> {
        let text = TextString::decode(buf)?;
        let mut icon = None;
        while let Some(t) = tlv::peek_tag(buf) {
            match tlv::tag_value(t) {
                tag::ICON_IDENTIFIER => icon = Some(IconIdentifier::decode(buf)?),
                _ => tlv::skip_data_object(buf)?,
            }
        }
        Ok(Self { details, devices, text, icon })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageNotification {
    pub details: CommandDetails,
    pub devices: DeviceIdentities,
    /// qualifier bit 0: a specific language is notified; otherwise the
    /// notification is non-specific and carries no language object
    pub language: Option<Language>,
}

impl LanguageNotification {
    fn decode(details: CommandDetails, devices: DeviceIdentities, buf: &mut Bytes) -> SatResult<Self> {
        let specific = details.qualifier & 0x01 != 0;
        let mut language = None;
        while let Some(t) = tlv::peek_tag(buf) {
            match tlv::tag_value(t) {
                tag::LANGUAGE => language = Some(Language::decode(buf)?),
                _ => tlv::skip_data_object(buf)?,
            }
        }
        if specific && language.is_none() {
            return Err(SatError::RequiredValueMissing("notified language"));
        }
        if !specific {
            language = None;
        }
        Ok(Self { details, devices, language })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenChannel {
    pub details: CommandDetails,
    pub devices: DeviceIdentities,
    /// qualifier bit 0: establish the link immediately rather than on demand
    pub immediate_link: bool,
    /// qualifier bit 1: reconnect automatically when the link drops
    pub auto_reconnect: bool,
    /// qualifier bit 2: establish in background mode
    pub background: bool,
    pub alpha: Option<AlphaIdentifier>,
    pub icon: Option<IconIdentifier>,
    pub bearer_description: BearerDescription,
    pub buffer_size: BufferSize,
    pub network_access_name: Option<NetworkAccessName>,
    pub local_address: Option<OtherAddress>,
    pub login: Option<TextString>,
    pub password: Option<TextString>,
    pub transport: Option<UiccTransportLevel>,
    pub destination_address: Option<OtherAddress>,
    /// Remote entity address for local-bearer channels
    pub remote_entity: Option<RemoteEntityAddress>,
    pub duration: Option<Duration>,
}

impl OpenChannel {
    fn decode(details: CommandDetails, devices: DeviceIdentities, buf: &mut Bytes) -> SatResult<Self> {
        let mut alpha = None;
        let mut icon = None;
        let mut bearer_description = None;
        let mut buffer_size = None;
        let mut network_access_name = None;
        let mut local_address = None;
        let mut login = None;
        let mut password = None;
        let mut transport = None;
        let mut destination_address = None;
        let mut remote_entity = None;
        let mut duration = None;
        while let Some(t) = tlv::peek_tag(buf) {
            match tlv::tag_value(t) {
                tag::ALPHA_IDENTIFIER => alpha = Some(AlphaIdentifier::decode(buf)?),
                tag::ICON_IDENTIFIER => icon = Some(IconIdentifier::decode(buf)?),
                tag::BEARER_DESCRIPTION => {
                    bearer_description = Some(BearerDescription::decode(buf)?)
                }
                tag::BUFFER_SIZE => buffer_size = Some(BufferSize::decode(buf)?),
                tag::NETWORK_ACCESS_NAME => {
                    network_access_name = Some(NetworkAccessName::decode(buf)?)
                }
                // first address is the local one, second the destination
                tag::OTHER_ADDRESS => {
                    let address = Some(OtherAddress::decode(buf)?);
                    if local_address.is_none() {
                        local_address = address;
                    } else {
                        destination_address = address;
                    }
                }
                // first text string is the login, second the password
                tag::TEXT_STRING => {
                    let text = Some(TextString::decode(buf)?);
                    if login.is_none() {
                        login = text;
                    } else {
                        password = text;
                    }
                }
                tag::UICC_ME_TRANSPORT_LEVEL => {
                    transport = Some(UiccTransportLevel::decode(buf)?)
                }
                tag::REMOTE_ENTITY_ADDRESS => {
                    remote_entity = Some(RemoteEntityAddress::decode(buf)?)
                }
                tag::DURATION => duration = Some(Duration::decode(buf)?),
                _ => tlv::skip_data_object(buf)?,
            }
        }
        let bearer_description =
            bearer_description.ok_or(SatError::RequiredValueMissing("bearer description"))?;
        let buffer_size = buffer_size.ok_or(SatError::RequiredValueMissing("buffer size"))?;
        let q = details.qualifier;
        Ok(Self {
            details,
            devices,
            immediate_link: q & 0x01 != 0,
            auto_reconnect: q & 0x02 != 0,
            background: q & 0x04 != 0,
            alpha,
            icon,
            bearer_description,
            buffer_size,
            network_access_name,
            local_address,
            login,
            password,
            transport,
            destination_address,
            remote_entity,
            duration,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseChannel {
    pub details: CommandDetails,
    pub devices: DeviceIdentities,
    pub alpha: Option<AlphaIdentifier>,
    pub icon: Option<IconIdentifier>,
}

impl CloseChannel {
    fn decode(details: CommandDetails, devices: DeviceIdentities, buf: &mut Bytes) -> SatResult<Self> {
        let mut alpha = None;
        let mut icon = None;
        while let Some(t) = tlv::peek_tag(buf) {
            match tlv::tag_value(t) {
                tag::ALPHA_IDENTIFIER => alpha = Some(AlphaIdentifier::decode(buf)?),
                tag::ICON_IDENTIFIER => icon = Some(IconIdentifier::decode(buf)?),
                _ => tlv::skip_data_object(buf)?,
            }
        }
        Ok(Self { details, devices, alpha, icon })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiveData {
    pub details: CommandDetails,
    pub devices: DeviceIdentities,
    pub alpha: Option<AlphaIdentifier>,
    pub icon: Option<IconIdentifier>,
    pub data_length: ChannelDataLength,
}

impl ReceiveData {
    fn decode(details: CommandDetails, devices: DeviceIdentities, buf: &mut Bytes) -> SatResult<Self> {
        let mut alpha = None;
        let mut icon = None;
        let mut data_length = None;
        while let Some(t) = tlv::peek_tag(buf) {
            match tlv::tag_value(t) {
                tag::ALPHA_IDENTIFIER => alpha = Some(AlphaIdentifier::decode(buf)?),
                tag::ICON_IDENTIFIER => icon = Some(IconIdentifier::decode(buf)?),
                tag::CHANNEL_DATA_LENGTH => data_length = Some(ChannelDataLength::decode(buf)?),
                _ => tlv::skip_data_object(buf)?,
            }
        }
        let data_length = data_length.ok_or(SatError::RequiredValueMissing("channel data length"))?;
        Ok(Self { details, devices, alpha, icon, data_length })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendData {
    pub details: CommandDetails,
    pub devices: DeviceIdentities,
    /// qualifier bit 0: send immediately rather than store in the buffer
    pub send_immediately: bool,
    pub alpha: Option<AlphaIdentifier>,
    pub icon: Option<IconIdentifier>,
    pub data: ChannelData,
}

impl SendData {
    fn decode(details: CommandDetails, devices: DeviceIdentities, buf: &mut Bytes) -> SatResult<Self> {
        let mut alpha = None;
        let mut icon = None;
        let mut data = None;
        while let Some(t) = tlv::peek_tag(buf) {
            match tlv::tag_value(t) {
                tag::ALPHA_IDENTIFIER => alpha = Some(AlphaIdentifier::decode(buf)?),
                tag::ICON_IDENTIFIER => icon = Some(IconIdentifier::decode(buf)?),
                tag::CHANNEL_DATA => data = Some(ChannelData::decode(buf)?),
                _ => tlv::skip_data_object(buf)?,
            }
        }
        let data = data.ok_or(SatError::RequiredValueMissing("channel data"))?;
        Ok(Self {
            details,
            devices,
            send_immediately: details.qualifier & 0x01 != 0,
            alpha,
            icon,
            data,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetChannelStatus {
    pub details: CommandDetails,
    pub devices: DeviceIdentities,
}

/// A syntactically valid command whose type the terminal does not support;
/// the caller answers it with a beyond-capabilities Terminal Response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedCommand {
    pub details: CommandDetails,
    pub devices: DeviceIdentities,
}

/// A decoded proactive command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProactiveCommand {
    Refresh(Refresh),
    MoreTime(MoreTime),
    PollInterval(PollInterval),
    PollingOff(PollingOff),
    SetupEventList(SetupEventList),
    SetupCall(SetupCall),
    SendSs(SendSs),
    SendUssd(SendUssd),
    SendShortMessage(SendShortMessage),
    SendDtmf(SendDtmf),
    LaunchBrowser(LaunchBrowser),
    PlayTone(PlayTone),
    DisplayText(DisplayText),
    GetInkey(GetInkey),
    GetInput(GetInput),
    SelectItem(SelectItem),
    SetupMenu(SetupMenu),
    ProvideLocalInformation(ProvideLocalInformation),
    SetupIdleModeText(SetupIdleModeText),
    LanguageNotification(LanguageNotification),
    OpenChannel(OpenChannel),
    CloseChannel(CloseChannel),
    ReceiveData(ReceiveData),
    SendData(SendData),
    GetChannelStatus(GetChannelStatus),
    Unsupported(UnsupportedCommand),
}

impl ProactiveCommand {
    pub fn command_details(&self) -> &CommandDetails {
        match self {
            Self::Refresh(c) => &c.details,
            Self::MoreTime(c) => &c.details,
            Self::PollInterval(c) => &c.details,
            Self::PollingOff(c) => &c.details,
            Self::SetupEventList(c) => &c.details,
            Self::SetupCall(c) => &c.details,
            Self::SendSs(c) => &c.details,
            Self::SendUssd(c) => &c.details,
            Self::SendShortMessage(c) => &c.details,
            Self::SendDtmf(c) => &c.details,
            Self::LaunchBrowser(c) => &c.details,
            Self::PlayTone(c) => &c.details,
            Self::DisplayText(c) => &c.details,
            Self::GetInkey(c) => &c.details,
            Self::GetInput(c) => &c.details,
            Self::SelectItem(c) => &c.details,
            Self::SetupMenu(c) => &c.details,
            Self::ProvideLocalInformation(c) => &c.details,
            Self::SetupIdleModeText(c) => &c.details,
            Self::LanguageNotification(c) => &c.details,
            Self::OpenChannel(c) => &c.details,
            Self::CloseChannel(c) => &c.details,
            Self::ReceiveData(c) => &c.details,
            Self::SendData(c) => &c.details,
            Self::GetChannelStatus(c) => &c.details,
            Self::Unsupported(c) => &c.details,
        }
    }
}

/// Minimum proactive command body: two fixed leading objects
const MIN_COMMAND_BODY: usize = 9;

/// Decode a complete proactive command from the BER-TLV frame the UICC
/// fetched to the terminal.
pub fn decode_proactive_command(buf: &mut Bytes) -> SatResult<ProactiveCommand> {
    if buf.is_empty() {
        return Err(SatError::InvalidParameter("empty proactive command buffer"));
    }
    if buf.get_u8() != PROACTIVE_COMMAND_TAG {
        return Err(SatError::CommandNotUnderstood("missing proactive command tag"));
    }
    let length = tlv::decode_ber_length(buf)?;
    if buf.remaining() < length {
        return Err(SatError::CommandNotUnderstood("proactive command truncated"));
    }
    if length < MIN_COMMAND_BODY {
        return Err(SatError::CommandNotUnderstood("proactive command too short"));
    }
    let mut body = buf.copy_to_bytes(length);

    let details = CommandDetails::decode(&mut body)?;
    let devices = DeviceIdentities::decode(&mut body)?;
    log::debug!(
        "proactive command type=0x{:02X} number={} qualifier=0x{:02X}",
        details.command_type,
        details.command_number,
        details.qualifier
    );

    let command_type = match CommandType::try_from(details.command_type) {
        Ok(command_type) => command_type,
        Err(_) => {
            log::warn!("unsupported proactive command type 0x{:02X}", details.command_type);
            return Ok(ProactiveCommand::Unsupported(UnsupportedCommand { details, devices }));
        }
    };

    let command = match command_type {
        CommandType::Refresh => {
            ProactiveCommand::Refresh(Refresh::decode(details, devices, &mut body)?)
        }
        CommandType::MoreTime => ProactiveCommand::MoreTime(MoreTime { details, devices }),
        CommandType::PollInterval => {
            ProactiveCommand::PollInterval(PollInterval::decode(details, devices, &mut body)?)
        }
        CommandType::PollingOff => ProactiveCommand::PollingOff(PollingOff { details, devices }),
        CommandType::SetupEventList => {
            ProactiveCommand::SetupEventList(SetupEventList::decode(details, devices, &mut body)?)
        }
        CommandType::SetupCall => {
            ProactiveCommand::SetupCall(SetupCall::decode(details, devices, &mut body)?)
        }
        CommandType::SendSs => ProactiveCommand::SendSs(SendSs::decode(details, devices, &mut body)?),
        CommandType::SendUssd => {
            ProactiveCommand::SendUssd(SendUssd::decode(details, devices, &mut body)?)
        }
        CommandType::SendShortMessage => ProactiveCommand::SendShortMessage(
            SendShortMessage::decode(details, devices, &mut body)?,
        ),
        CommandType::SendDtmf => {
            ProactiveCommand::SendDtmf(SendDtmf::decode(details, devices, &mut body)?)
        }
        CommandType::LaunchBrowser => {
            ProactiveCommand::LaunchBrowser(LaunchBrowser::decode(details, devices, &mut body)?)
        }
        CommandType::PlayTone => {
            ProactiveCommand::PlayTone(PlayTone::decode(details, devices, &mut body)?)
        }
        CommandType::DisplayText => {
            ProactiveCommand::DisplayText(DisplayText::decode(details, devices, &mut body)?)
        }
        CommandType::GetInkey => {
            ProactiveCommand::GetInkey(GetInkey::decode(details, devices, &mut body)?)
        }
        CommandType::GetInput => {
            ProactiveCommand::GetInput(GetInput::decode(details, devices, &mut body)?)
        }
        CommandType::SelectItem => {
            ProactiveCommand::SelectItem(SelectItem::decode(details, devices, &mut body)?)
        }
        CommandType::SetupMenu => {
            ProactiveCommand::SetupMenu(SetupMenu::decode(details, devices, &mut body)?)
        }
        CommandType::ProvideLocalInformation => ProactiveCommand::ProvideLocalInformation(
            ProvideLocalInformation::decode(details, devices)?,
        ),
        CommandType::SetupIdleModeText => ProactiveCommand::SetupIdleModeText(
            SetupIdleModeText::decode(details, devices, &mut body)?,
        ),
        CommandType::LanguageNotification => ProactiveCommand::LanguageNotification(
            LanguageNotification::decode(details, devices, &mut body)?,
        ),
        CommandType::OpenChannel => {
            ProactiveCommand::OpenChannel(OpenChannel::decode(details, devices, &mut body)?)
        }
        CommandType::CloseChannel => {
            ProactiveCommand::CloseChannel(CloseChannel::decode(details, devices, &mut body)?)
        }
        CommandType::ReceiveData => {
            ProactiveCommand::ReceiveData(ReceiveData::decode(details, devices, &mut body)?)
        }
        CommandType::SendData => {
            ProactiveCommand::SendData(SendData::decode(details, devices, &mut body)?)
        }
        CommandType::GetChannelStatus => {
            ProactiveCommand::GetChannelStatus(GetChannelStatus { details, devices })
        }
    };
    Ok(command)
}
