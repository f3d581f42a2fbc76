// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Wiliot relay frame decoding.
//!
//! Wiliot tags (`fdaf`) broadcast opaque cloud-bound payloads. The
//! payload is not interpreted locally; it is re-prefixed with the service
//! UUID in over-the-air byte order so a relay can reconstruct and forward
//! the original advertisement.

use crate::core::{Reading, ReadingValue};

const DATA_LENGTH_BYTES: usize = 27;
/// Service UUID 0xfdaf in over-the-air byte order.
const SERVICE_UUID_RAW: &str = "affd";
const WILIOT_URI: &str = "https://sniffypedia.org/Organization/Wiliot_Ltd/";

/// Process Wiliot service data.
pub fn process(data: &[u8]) -> Option<Reading> {
    if data.len() != DATA_LENGTH_BYTES {
        return None;
    }

    let mut relay = Reading::new();
    relay.insert("type", "wiliot");
    relay.insert("payload", format!("{}{}", SERVICE_UUID_RAW, hex::encode(data)));

    let mut reading = Reading::new();
    reading.insert("relay", ReadingValue::Nested(relay));
    reading.insert("uri", WILIOT_URI);
    Some(reading)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_relay_frame() {
        let data = [0x11u8; 27];
        let reading = process(&data).unwrap();

        let relay = reading.get("relay").and_then(|v| v.as_reading()).unwrap();
        assert_eq!(relay.get("type").and_then(|v| v.as_str()), Some("wiliot"));
        assert_eq!(
            relay.get("payload").and_then(|v| v.as_str()),
            Some(format!("affd{}", "11".repeat(27)).as_str())
        );
        assert_eq!(reading.get("uri").and_then(|v| v.as_str()), Some(WILIOT_URI));
    }

    #[test]
    fn test_wrong_length() {
        assert!(process(&[0u8; 26]).is_none());
        assert!(process(&[0u8; 28]).is_none());
        assert!(process(&[]).is_none());
    }
}
