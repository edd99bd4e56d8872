//! SIM Application Toolkit proactive command codec
//!
//! Implements the card/terminal signalling of ETSI TS 102.223: decoding of
//! proactive commands fetched from the UICC, and encoding of the Terminal
//! Response and envelope commands the terminal sends back. The wire format
//! is BER-TLV with single-byte tags carrying a comprehension-required flag.
//!
//! Decoding turns raw bytes into one [`ProactiveCommand`] variant per
//! command type; the decode error taxonomy maps directly onto the general
//! result byte the terminal must report, so a failed decode still yields a
//! well-formed Terminal Response:
//!
//! ```
//! use bytes::Bytes;
//! use sat_codec::{
//!     decode_proactive_command, CommandResult, ProactiveCommand, TerminalResponse,
//! };
//!
//! let raw = [
//!     0xD0, 0x10, 0x81, 0x03, 0x01, 0x21, 0x81, 0x82, 0x02, 0x81, 0x02, 0x8D, 0x05, 0x04,
//!     b'T', b'e', b's', b't',
//! ];
//! let mut buf = Bytes::copy_from_slice(&raw);
//! let command = decode_proactive_command(&mut buf)?;
//! assert!(matches!(command, ProactiveCommand::DisplayText(_)));
//!
//! let response = TerminalResponse::new(*command.command_details(), CommandResult::success());
//! let body = response.encode()?;
//! assert_eq!(body[0], 0x81);
//! # Ok::<(), sat_codec::SatError>(())
//! ```

pub mod command;
pub mod envelope;
pub mod error;
pub mod ie;
pub mod response;
pub mod tlv;
pub mod types;

pub use command::{decode_proactive_command, CommandType, ProactiveCommand};
pub use envelope::{
    encode_envelope_command, EnvelopeCommand, EventDownload, EventPayload, MenuSelection,
};
pub use error::{SatError, SatResult};
pub use ie::SatEvent;
pub use response::{
    encode_terminal_response, AdditionalInfo, CommandResult, ResponsePayload, ResultType,
    TerminalResponse,
};

#[cfg(test)]
mod property_tests;
