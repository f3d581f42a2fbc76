// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Eddystone beacon frame decoding.
//!
//! The Eddystone service (`feaa`) carries three plain frame types keyed
//! by the first payload byte: UID (namespace + instance identifiers),
//! URL (a compressed web address) and TLM (beacon telemetry). Encrypted
//! telemetry (eTLM, TLM version 1) is rejected, not decoded.

use crate::core::{ByteCursor, CodecError, Reading, Result};

use super::expand_url;

const MIN_DATA_LENGTH_BYTES: usize = 4;
const UID_FRAME_LENGTH_BYTES: usize = 20;
const TLM_FRAME_LENGTH_BYTES: usize = 14;
const MIN_URL_FRAME_LENGTH_BYTES: usize = 4;

const FRAME_TYPE_UID: u8 = 0x00;
const FRAME_TYPE_URL: u8 = 0x10;
const FRAME_TYPE_TLM: u8 = 0x20;

const TLM_PLAIN_VERSION: u8 = 0x00;
const TLM_ENCRYPTED_VERSION: u8 = 0x01;

const NAMESPACE_LENGTH_BYTES: usize = 10;
const INSTANCE_LENGTH_BYTES: usize = 6;

/// Process Eddystone service data.
///
/// Dispatches on the frame type byte; an unknown frame type or a frame
/// failing its length/content validation yields `None`.
pub fn process(data: &[u8]) -> Option<Reading> {
    if data.len() < MIN_DATA_LENGTH_BYTES {
        return None;
    }

    match data[0] {
        FRAME_TYPE_UID => decode_uid(data).ok(),
        FRAME_TYPE_URL => decode_url(data).ok(),
        FRAME_TYPE_TLM => decode_tlm(data).ok(),
        _ => None,
    }
}

/// Decode an Eddystone-UID frame.
fn decode_uid(data: &[u8]) -> Result<Reading> {
    if data.len() != UID_FRAME_LENGTH_BYTES {
        return Err(CodecError::invalid_frame_length("Eddystone-UID", data.len()));
    }

    let mut cursor = ByteCursor::new(data);
    cursor.skip(1)?;
    let tx_power = cursor.read_i8()?;
    let namespace = cursor.read_hex(NAMESPACE_LENGTH_BYTES)?;
    let instance = cursor.read_hex(INSTANCE_LENGTH_BYTES)?;
    // Two reserved trailing bytes are not interpreted

    let mut reading = Reading::new();
    reading.insert("txPower", tx_power as f64);
    reading.insert("namespace", namespace);
    reading.insert("instance", instance);
    Ok(reading)
}

/// Decode an Eddystone-URL frame.
fn decode_url(data: &[u8]) -> Result<Reading> {
    if data.len() < MIN_URL_FRAME_LENGTH_BYTES {
        return Err(CodecError::invalid_frame_length("Eddystone-URL", data.len()));
    }

    let tx_power = data[1] as i8;
    let url = expand_url(data[2], &data[3..]).ok_or(CodecError::out_of_range("url"))?;

    let mut reading = Reading::new();
    reading.insert("txPower", tx_power as f64);
    reading.insert("url", url);
    Ok(reading)
}

/// Decode an Eddystone-TLM frame.
fn decode_tlm(data: &[u8]) -> Result<Reading> {
    if data.len() != TLM_FRAME_LENGTH_BYTES {
        return Err(CodecError::invalid_frame_length("Eddystone-TLM", data.len()));
    }

    let mut cursor = ByteCursor::new(data);
    cursor.skip(1)?;
    let version = cursor.read_u8()?;
    if version == TLM_ENCRYPTED_VERSION {
        return Err(CodecError::encrypted("Eddystone-TLM"));
    }
    if version != TLM_PLAIN_VERSION {
        return Err(CodecError::unsupported_version("Eddystone-TLM", version));
    }

    let battery_voltage = cursor.read_u16_be()? as f64 / 1000.0;
    let temperature_bytes = cursor.read_bytes(2)?;
    let temperature = crate::codecs::signed_8_8(temperature_bytes[0], temperature_bytes[1]);
    let transmission_count = cursor.read_u32_be()? as f64;
    let uptime = cursor.read_u32_be()? as f64 * 100.0;

    let mut reading = Reading::new();
    reading.insert("batteryVoltage", battery_voltage);
    reading.insert("temperature", temperature);
    reading.insert("transmissionCount", transmission_count);
    reading.insert("uptime", uptime);
    Ok(reading)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(hex: &str) -> Vec<u8> {
        hex::decode(hex).unwrap()
    }

    #[test]
    fn test_uid_frame() {
        let reading = process(&bytes("00fc00112233445566778899aabbccddeeff0000")).unwrap();

        assert_eq!(reading.get("txPower").and_then(|v| v.as_f64()), Some(-4.0));
        assert_eq!(
            reading.get("namespace").and_then(|v| v.as_str()),
            Some("00112233445566778899")
        );
        assert_eq!(
            reading.get("instance").and_then(|v| v.as_str()),
            Some("aabbccddeeff")
        );
    }

    #[test]
    fn test_uid_frame_one_byte_short() {
        assert!(process(&bytes("00fc00112233445566778899aabbccddeeff00")).is_none());
    }

    #[test]
    fn test_url_frame() {
        let reading = process(&bytes("10000367657470617265746f07")).unwrap();

        assert_eq!(reading.get("txPower").and_then(|v| v.as_f64()), Some(0.0));
        assert_eq!(
            reading.get("url").and_then(|v| v.as_str()),
            Some("https://getpareto.com")
        );
    }

    #[test]
    fn test_url_frame_invalid_scheme() {
        assert!(process(&bytes("10000467657470617265746f07")).is_none());
    }

    #[test]
    fn test_url_frame_invalid_character() {
        // 0x20 (space) is not a valid URL character code
        assert!(process(&bytes("10000320")).is_none());
    }

    #[test]
    fn test_tlm_frame() {
        let reading = process(&bytes("20000bb815000000004500000258")).unwrap();

        assert_eq!(
            reading.get("batteryVoltage").and_then(|v| v.as_f64()),
            Some(3.0)
        );
        assert_eq!(reading.get("temperature").and_then(|v| v.as_f64()), Some(21.0));
        assert_eq!(
            reading.get("transmissionCount").and_then(|v| v.as_f64()),
            Some(69.0)
        );
        assert_eq!(reading.get("uptime").and_then(|v| v.as_f64()), Some(60000.0));
    }

    #[test]
    fn test_etlm_frame_is_rejected() {
        // 18-byte eTLM frame with version byte 0x01
        assert!(process(&bytes("2001112233445566778899aabbcc5a17c4ec")).is_none());
        // A 14-byte frame declaring version 0x01 is rejected as encrypted
        assert_eq!(
            decode_tlm(&bytes("20010bb815000000004500000258")).unwrap_err(),
            CodecError::encrypted("Eddystone-TLM")
        );
    }

    #[test]
    fn test_tlm_frame_wrong_length() {
        assert!(process(&bytes("20000bb8150000000045000002")).is_none());
    }

    #[test]
    fn test_unknown_frame_type() {
        assert!(process(&bytes("30000bb815000000004500000258")).is_none());
    }

    #[test]
    fn test_too_short() {
        assert!(process(&bytes("00fc00")).is_none());
        assert!(process(&[]).is_none());
    }
}
