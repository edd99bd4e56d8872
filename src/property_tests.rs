//! Property-based tests over the codec primitives

use bytes::{Bytes, BytesMut};
use proptest::prelude::*;

use crate::command::decode_proactive_command;
use crate::ie::*;
use crate::response::{AdditionalInfo, CommandResult, ResultType, TerminalResponse};
use crate::types::*;

fn alphabet_strategy() -> impl Strategy<Value = Alphabet> {
    prop_oneof![
        Just(Alphabet::Gsm7Default),
        Just(Alphabet::EightBit),
        Just(Alphabet::Ucs2),
        Just(Alphabet::Reserved),
    ]
}

fn class_strategy() -> impl Strategy<Value = Option<MessageClass>> {
    prop_oneof![
        Just(None),
        Just(Some(MessageClass::Class0)),
        Just(Some(MessageClass::Class1)),
        Just(Some(MessageClass::Class2)),
        Just(Some(MessageClass::Class3)),
    ]
}

fn dcs_strategy() -> impl Strategy<Value = DataCodingScheme> {
    (any::<bool>(), class_strategy(), alphabet_strategy())
        .prop_map(|(compressed, class, alphabet)| DataCodingScheme { compressed, class, alphabet })
}

fn ton_strategy() -> impl Strategy<Value = TypeOfNumber> {
    prop_oneof![
        Just(TypeOfNumber::Unknown),
        Just(TypeOfNumber::International),
        Just(TypeOfNumber::National),
        Just(TypeOfNumber::NetworkSpecific),
        Just(TypeOfNumber::DedicatedAccess),
    ]
}

fn npi_strategy() -> impl Strategy<Value = NumberingPlan> {
    prop_oneof![
        Just(NumberingPlan::Unknown),
        Just(NumberingPlan::Isdn),
        Just(NumberingPlan::Data),
        Just(NumberingPlan::Telex),
        Just(NumberingPlan::National),
        Just(NumberingPlan::Private),
    ]
}

fn time_unit_strategy() -> impl Strategy<Value = TimeUnit> {
    prop_oneof![
        Just(TimeUnit::Minutes),
        Just(TimeUnit::Seconds),
        Just(TimeUnit::TenthsOfSeconds),
    ]
}

fn device_strategy() -> impl Strategy<Value = DeviceIdentity> {
    prop_oneof![
        Just(DeviceIdentity::Keypad),
        Just(DeviceIdentity::Display),
        Just(DeviceIdentity::Earpiece),
        (0x21u8..=0x27).prop_map(DeviceIdentity::Channel),
        Just(DeviceIdentity::Sim),
        Just(DeviceIdentity::Me),
        Just(DeviceIdentity::Network),
    ]
}

fn result_type_strategy() -> impl Strategy<Value = ResultType> {
    prop_oneof![
        Just(ResultType::Success),
        Just(ResultType::SuccessIconNotDisplayed),
        Just(ResultType::NoResponseFromUser),
        Just(ResultType::MeUnableToProcess),
        Just(ResultType::NetworkUnableToProcess),
        Just(ResultType::BeyondMeCapabilities),
        Just(ResultType::CommandDataNotUnderstood),
        Just(ResultType::SsReturnError),
        Just(ResultType::RequiredValuesMissing),
        Just(ResultType::BipError),
    ]
}

fn additional_info_strategy() -> impl Strategy<Value = AdditionalInfo> {
    prop_oneof![
        Just(AdditionalInfo::None),
        Just(AdditionalInfo::Me(crate::response::MeProblem::ScreenBusy)),
        any::<u8>().prop_map(AdditionalInfo::Network),
        any::<u8>().prop_map(AdditionalInfo::Ss),
        Just(AdditionalInfo::Bip(crate::response::BipProblem::ChannelClosed)),
    ]
}

proptest! {
    #[test]
    fn dcs_round_trip(dcs in dcs_strategy()) {
        prop_assert_eq!(DataCodingScheme::decode(dcs.encode()), dcs);
    }

    #[test]
    fn bcd_round_trip(number in "[0-9*#]{1,40}") {
        prop_assert_eq!(bcd_to_ascii(&ascii_to_bcd(&number), DIALING_NUMBER_MAX), number);
    }

    #[test]
    fn gsm7_round_trip(text in "[ -~]{0,120}") {
        prop_assert_eq!(unpack_gsm7(&pack_gsm7(&text), TEXT_STRING_MAX), text);
    }

    #[test]
    fn duration_round_trip(unit in time_unit_strategy(), interval in any::<u8>()) {
        let duration = Duration { time_unit: unit, time_interval: interval };
        let mut out = BytesMut::new();
        duration.encode(&mut out);
        let mut buf = out.freeze();
        prop_assert_eq!(Duration::decode(&mut buf).unwrap(), duration);
        prop_assert!(buf.is_empty());
    }

    #[test]
    fn address_round_trip(
        ton in ton_strategy(),
        npi in npi_strategy(),
        number in "[0-9*#]{1,40}",
    ) {
        let address = Address { ton, npi, number };
        let mut out = BytesMut::new();
        address.encode(&mut out).unwrap();
        let mut buf = out.freeze();
        prop_assert_eq!(Address::decode(&mut buf).unwrap(), address);
    }

    #[test]
    fn text_string_gsm7_round_trip(text in "[ -~]{1,100}") {
        let value = TextString { dcs: DataCodingScheme::default(), text };
        let mut out = BytesMut::new();
        value.encode(&mut out).unwrap();
        let mut buf = out.freeze();
        prop_assert_eq!(TextString::decode(&mut buf).unwrap(), value);
    }

    #[test]
    fn text_string_ucs2_round_trip(text in "\\PC{1,60}") {
        let value = TextString {
            dcs: DataCodingScheme { alphabet: Alphabet::Ucs2, ..Default::default() },
            text,
        };
        let mut out = BytesMut::new();
        if value.encode(&mut out).is_ok() {
            let mut buf = out.freeze();
            prop_assert_eq!(TextString::decode(&mut buf).unwrap(), value);
        }
    }

    #[test]
    fn device_identities_round_trip(
        source in device_strategy(),
        destination in device_strategy(),
        cr in any::<bool>(),
    ) {
        let devices = DeviceIdentities { source, destination };
        let mut out = BytesMut::new();
        devices.encode(&mut out, cr);
        let mut buf = out.freeze();
        prop_assert_eq!(DeviceIdentities::decode(&mut buf).unwrap(), devices);
    }

    #[test]
    fn icon_identifier_round_trip(with_text in any::<bool>(), identifier in any::<u8>()) {
        let icon = IconIdentifier {
            display_mode: if with_text {
                IconDisplayMode::WithText
            } else {
                IconDisplayMode::SelfExplanatory
            },
            identifier,
        };
        let mut out = BytesMut::new();
        icon.encode(&mut out);
        let mut buf = out.freeze();
        prop_assert_eq!(IconIdentifier::decode(&mut buf).unwrap(), icon);
    }

    #[test]
    fn length_forms_decode_identically(text in "[ -~]{0,100}") {
        let value = text.as_bytes();
        let mut short = Vec::with_capacity(value.len() + 2);
        short.push(0x05);
        short.push(value.len() as u8);
        short.extend_from_slice(value);
        let mut long = Vec::with_capacity(value.len() + 3);
        long.push(0x05);
        long.push(0x81);
        long.push(value.len() as u8);
        long.extend_from_slice(value);

        let mut short = Bytes::copy_from_slice(&short);
        let mut long = Bytes::copy_from_slice(&long);
        prop_assert_eq!(
            AlphaIdentifier::decode(&mut short).ok(),
            AlphaIdentifier::decode(&mut long).ok()
        );
    }

    // decoding arbitrary bytes must fail cleanly, never panic
    #[test]
    fn decode_never_panics(data in proptest::collection::vec(any::<u8>(), 0..64)) {
        let mut buf = Bytes::copy_from_slice(&data);
        let _ = decode_proactive_command(&mut buf);
    }

    // any truncation of a valid command is a clean decode error
    #[test]
    fn truncated_command_never_panics(cut in 0usize..18) {
        let raw = [
            0xD0, 0x10, 0x81, 0x03, 0x01, 0x21, 0x81, 0x82, 0x02, 0x81, 0x02, 0x8D, 0x05, 0x04,
            b'T', b'e', b's', b't',
        ];
        let mut buf = Bytes::copy_from_slice(&raw[..cut]);
        if cut < raw.len() {
            prop_assert!(decode_proactive_command(&mut buf).is_err());
        }
    }

    // every result/additional-info pairing either encodes or fails with a
    // parameter error; no partial output either way
    #[test]
    fn terminal_response_pairing(
        result_type in result_type_strategy(),
        additional_info in additional_info_strategy(),
    ) {
        let response = TerminalResponse::new(
            CommandDetails {
                comprehension_required: true,
                command_number: 1,
                command_type: 0x21,
                qualifier: 0,
            },
            CommandResult { result_type, additional_info },
        );
        match response.encode() {
            Ok(out) => prop_assert!(out.len() >= 12),
            Err(err) => prop_assert!(matches!(err, crate::SatError::InvalidParameter(_))),
        }
    }
}
