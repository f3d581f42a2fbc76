// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Apple/Google Exposure Notification decoding.
//!
//! The Exposure Notification service (`fd6f`) broadcasts a 16-byte
//! rolling proximity identifier followed by encrypted metadata whose
//! first byte packs the protocol version and whose second byte is the
//! transmit power.

use crate::core::{ByteCursor, CodecError, Reading, Result};

const EXPOSURE_NOTIFICATION_LENGTH_BYTES: usize = 20;
const RPI_LENGTH_BYTES: usize = 16;
const MAJOR_VERSION_MASK: u8 = 0xc0;
const MINOR_VERSION_MASK: u8 = 0x30;
const MAJOR_VERSION_SHIFT: u8 = 6;
const MINOR_VERSION_SHIFT: u8 = 4;

/// Process Exposure Notification service data.
pub fn process(data: &[u8]) -> Option<Reading> {
    decode(data).ok()
}

fn decode(data: &[u8]) -> Result<Reading> {
    if data.len() != EXPOSURE_NOTIFICATION_LENGTH_BYTES {
        return Err(CodecError::invalid_frame_length(
            "Exposure Notification",
            data.len(),
        ));
    }

    let mut cursor = ByteCursor::new(data);
    let rolling_proximity_identifier = cursor.read_hex(RPI_LENGTH_BYTES)?;
    let version_byte = cursor.read_u8()?;
    let version = format!(
        "{}.{}",
        (version_byte & MAJOR_VERSION_MASK) >> MAJOR_VERSION_SHIFT,
        (version_byte & MINOR_VERSION_MASK) >> MINOR_VERSION_SHIFT
    );
    let tx_power = cursor.read_i8()?;

    let mut reading = Reading::new();
    reading.insert("rollingProximityIdentifier", rolling_proximity_identifier);
    reading.insert("version", version);
    reading.insert("txPower", tx_power as f64);
    Ok(reading)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_record() {
        let data = hex::decode("00112233445566778899aabbccddeeff40fc0000").unwrap();
        let reading = process(&data).unwrap();

        assert_eq!(
            reading.get("rollingProximityIdentifier").and_then(|v| v.as_str()),
            Some("00112233445566778899aabbccddeeff")
        );
        assert_eq!(reading.get("version").and_then(|v| v.as_str()), Some("1.0"));
        assert_eq!(reading.get("txPower").and_then(|v| v.as_f64()), Some(-4.0));
    }

    #[test]
    fn test_version_bits() {
        let data = hex::decode("00112233445566778899aabbccddeeff90fc0000").unwrap();
        let reading = process(&data).unwrap();
        // 0x90 = major 2, minor 1
        assert_eq!(reading.get("version").and_then(|v| v.as_str()), Some("2.1"));
    }

    #[test]
    fn test_wrong_length() {
        assert!(process(&hex::decode("ff").unwrap()).is_none());
        // One byte short
        assert!(process(&hex::decode("00112233445566778899aabbccddeeff40fc00").unwrap()).is_none());
        // One byte long
        assert!(
            process(&hex::decode("00112233445566778899aabbccddeeff40fc000000").unwrap()).is_none()
        );
    }
}
