//! Envelope command encoding (terminal -> SIM)
//!
//! Envelopes are the terminal-initiated counterpart of proactive commands:
//! a menu selection when the user picks an entry of the SET UP MENU, and an
//! event download when a monitored event fires. Both are wrapped in their
//! outer envelope tag; every data object inside carries the comprehension
//! flag.

use bytes::BytesMut;

use crate::error::{SatError, SatResult};
use crate::ie::{BrowserTerminationCause, ChannelDataLength, ChannelStatus, Language, SatEvent};
use crate::tlv::{self, tag, EVENT_DOWNLOAD_TAG, MENU_SELECTION_TAG};
use crate::types::DeviceIdentity;

/// ENVELOPE (MENU SELECTION)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuSelection {
    pub item_identifier: u8,
    pub help_requested: bool,
}

impl MenuSelection {
    /// Encode the complete envelope, outer tag included.
    pub fn encode(&self) -> SatResult<BytesMut> {
        let mut payload = BytesMut::new();
        let devices = [DeviceIdentity::Keypad.to_byte(), DeviceIdentity::Sim.to_byte()];
        tlv::put_data_object(&mut payload, tag::DEVICE_IDENTITY, true, &devices)?;
        tlv::put_data_object(&mut payload, tag::ITEM_IDENTIFIER, true, &[self.item_identifier])?;
        if self.help_requested {
            tlv::put_data_object(&mut payload, tag::HELP_REQUEST, true, &[])?;
        }
        tlv::wrap_envelope(MENU_SELECTION_TAG, &payload)
    }
}

/// Event-specific objects of an event download envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventPayload {
    #[default]
    None,
    LanguageSelection(Language),
    BrowserTermination(BrowserTerminationCause),
    ChannelStatus(ChannelStatus),
    DataAvailable { channel_status: ChannelStatus, data_length: ChannelDataLength },
}

/// ENVELOPE (EVENT DOWNLOAD)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventDownload {
    pub event: SatEvent,
    pub payload: EventPayload,
}

impl EventDownload {
    /// The device identity reporting this event
    fn source(&self) -> DeviceIdentity {
        match self.event {
            SatEvent::IdleScreenAvailable => DeviceIdentity::Display,
            _ => DeviceIdentity::Me,
        }
    }

    /// Check the payload variant matches the event before anything is
    /// written.
    fn check_payload(&self) -> SatResult<()> {
        let ok = matches!(
            (self.event, &self.payload),
            (SatEvent::LanguageSelection, EventPayload::LanguageSelection(_))
                | (SatEvent::BrowserTermination, EventPayload::BrowserTermination(_))
                | (SatEvent::ChannelStatus, EventPayload::ChannelStatus(_))
                | (SatEvent::DataAvailable, EventPayload::DataAvailable { .. })
                | (
                    SatEvent::MtCall
                        | SatEvent::CallConnected
                        | SatEvent::CallDisconnected
                        | SatEvent::LocationStatus
                        | SatEvent::UserActivity
                        | SatEvent::IdleScreenAvailable
                        | SatEvent::CardReaderStatus,
                    EventPayload::None
                )
        );
        if ok {
            Ok(())
        } else {
            Err(SatError::InvalidParameter("event payload mismatch"))
        }
    }

    /// Encode the complete envelope, outer tag included.
    pub fn encode(&self) -> SatResult<BytesMut> {
        self.check_payload()?;
        let mut payload = BytesMut::new();
        tlv::put_data_object(&mut payload, tag::EVENT_LIST, true, &[self.event as u8])?;
        let devices = [self.source().to_byte(), DeviceIdentity::Sim.to_byte()];
        tlv::put_data_object(&mut payload, tag::DEVICE_IDENTITY, true, &devices)?;
        match &self.payload {
            EventPayload::None => {}
            EventPayload::LanguageSelection(language) => {
                tlv::put_data_object(&mut payload, tag::LANGUAGE, true, &language.0)?;
            }
            EventPayload::BrowserTermination(cause) => cause.encode(&mut payload),
            EventPayload::ChannelStatus(status) => status.encode(&mut payload),
            EventPayload::DataAvailable { channel_status, data_length } => {
                channel_status.encode(&mut payload);
                data_length.encode(&mut payload);
            }
        }
        tlv::wrap_envelope(EVENT_DOWNLOAD_TAG, &payload)
    }
}

/// A terminal-initiated envelope command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeCommand {
    MenuSelection(MenuSelection),
    EventDownload(EventDownload),
}

/// Encode a complete envelope, outer tag and BER length included.
pub fn encode_envelope_command(envelope: &EnvelopeCommand) -> SatResult<BytesMut> {
    match envelope {
        EnvelopeCommand::MenuSelection(menu) => menu.encode(),
        EnvelopeCommand::EventDownload(event) => event.encode(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_selection_golden_bytes() {
        let envelope = MenuSelection { item_identifier: 0x05, help_requested: false };
        let out = envelope.encode().unwrap();
        assert_eq!(&out[..], &[0xD3, 0x07, 0x82, 0x02, 0x01, 0x81, 0x90, 0x01, 0x05]);
    }

    #[test]
    fn menu_selection_with_help() {
        let envelope = MenuSelection { item_identifier: 0x02, help_requested: true };
        let out = envelope.encode().unwrap();
        assert_eq!(
            &out[..],
            &[0xD3, 0x09, 0x82, 0x02, 0x01, 0x81, 0x90, 0x01, 0x02, 0x95, 0x00]
        );
    }

    #[test]
    fn user_activity_event_download() {
        let envelope = EventDownload { event: SatEvent::UserActivity, payload: EventPayload::None };
        let out = envelope.encode().unwrap();
        assert_eq!(
            &out[..],
            &[0xD6, 0x07, 0x99, 0x01, 0x04, 0x82, 0x02, 0x82, 0x81]
        );
    }

    #[test]
    fn idle_screen_event_reports_display_source() {
        let envelope =
            EventDownload { event: SatEvent::IdleScreenAvailable, payload: EventPayload::None };
        let out = envelope.encode().unwrap();
        assert_eq!(&out[..], &[0xD6, 0x07, 0x99, 0x01, 0x05, 0x82, 0x02, 0x02, 0x81]);
    }

    #[test]
    fn language_selection_event_download() {
        let envelope = EventDownload {
            event: SatEvent::LanguageSelection,
            payload: EventPayload::LanguageSelection(Language(*b"de")),
        };
        let out = envelope.encode().unwrap();
        assert_eq!(
            &out[..],
            &[0xD6, 0x0B, 0x99, 0x01, 0x07, 0x82, 0x02, 0x82, 0x81, 0xAD, 0x02, b'd', b'e']
        );
    }

    #[test]
    fn data_available_event_download() {
        let envelope = EventDownload {
            event: SatEvent::DataAvailable,
            payload: EventPayload::DataAvailable {
                channel_status: ChannelStatus { channel_id: 1, link_established: true, info: 0 },
                data_length: ChannelDataLength { length: 0x10 },
            },
        };
        let out = envelope.encode().unwrap();
        assert_eq!(
            &out[..],
            &[
                0xD6, 0x0E, 0x99, 0x01, 0x09, 0x82, 0x02, 0x82, 0x81, 0xB8, 0x02, 0x81, 0x00,
                0xB7, 0x01, 0x10
            ]
        );
    }

    #[test]
    fn mismatched_event_payload_is_rejected() {
        let envelope = EventDownload {
            event: SatEvent::UserActivity,
            payload: EventPayload::BrowserTermination(BrowserTerminationCause::UserTermination),
        };
        assert_eq!(
            envelope.encode(),
            Err(SatError::InvalidParameter("event payload mismatch"))
        );
    }
}
