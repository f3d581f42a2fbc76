// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Minew product frame decoding.
//!
//! Minew sensors (`ffe1`) share a common frame header: the frame type
//! byte 0xa1 followed by a product model byte that selects the fixed
//! layout of the rest of the frame. Every reading carries the Minew
//! vendor URI.

use crate::core::{ByteCursor, CodecError, Reading, ReadingValue, Result};

use crate::codecs::signed_8_8;

const MIN_DATA_LENGTH_BYTES: usize = 2;
const MINEW_FRAME_TYPE: u8 = 0xa1;

const PRODUCT_MODEL_TEMPERATURE_HUMIDITY: u8 = 0x01;
const PRODUCT_MODEL_VISIBLE_LIGHT: u8 = 0x02;
const PRODUCT_MODEL_ACCELERATION: u8 = 0x03;
const PRODUCT_MODEL_INFO: u8 = 0x08;
const PRODUCT_MODEL_PIR: u8 = 0x11;
const PRODUCT_MODEL_VIBRATION: u8 = 0x18;

const TEMPERATURE_HUMIDITY_FRAME_LENGTH_BYTES: usize = 13;
const VISIBLE_LIGHT_FRAME_LENGTH_BYTES: usize = 10;
const ACCELERATION_FRAME_LENGTH_BYTES: usize = 15;
const MIN_INFO_FRAME_LENGTH_BYTES: usize = 9;
const PIR_FRAME_LENGTH_BYTES: usize = 11;
const VIBRATION_FRAME_LENGTH_BYTES: usize = 14;

const VISIBLE_LIGHT_MASK: u8 = 0x01;
const PIR_MASK: u16 = 0x0001;
const VIBRATION_MASK: u8 = 0x01;

const MINEW_URI: &str =
    "https://sniffypedia.org/Organization/Shenzhen_Minew_Technologies_Co_Ltd/";

/// Process Minew service data.
///
/// Validates the frame type byte, then dispatches on the product model
/// byte; an unknown model yields `None`.
pub fn process(data: &[u8]) -> Option<Reading> {
    if data.len() < MIN_DATA_LENGTH_BYTES || data[0] != MINEW_FRAME_TYPE {
        return None;
    }

    match data[1] {
        PRODUCT_MODEL_TEMPERATURE_HUMIDITY => decode_temperature_humidity(data).ok(),
        PRODUCT_MODEL_VISIBLE_LIGHT => decode_visible_light(data).ok(),
        PRODUCT_MODEL_ACCELERATION => decode_acceleration(data).ok(),
        PRODUCT_MODEL_INFO => decode_info(data).ok(),
        PRODUCT_MODEL_PIR => decode_passive_infrared(data).ok(),
        PRODUCT_MODEL_VIBRATION => decode_vibration(data).ok(),
        _ => None,
    }
}

fn decode_temperature_humidity(data: &[u8]) -> Result<Reading> {
    if data.len() != TEMPERATURE_HUMIDITY_FRAME_LENGTH_BYTES {
        return Err(CodecError::invalid_frame_length(
            "Minew temperature/humidity",
            data.len(),
        ));
    }

    let mut cursor = ByteCursor::new(data);
    cursor.skip(2)?;
    let battery_percentage = cursor.read_u8()? as f64;
    let temperature_bytes = cursor.read_bytes(2)?;
    let humidity_bytes = cursor.read_bytes(2)?;

    let mut reading = Reading::new();
    reading.insert("batteryPercentage", battery_percentage);
    reading.insert(
        "temperature",
        signed_8_8(temperature_bytes[0], temperature_bytes[1]),
    );
    reading.insert(
        "relativeHumidity",
        signed_8_8(humidity_bytes[0], humidity_bytes[1]),
    );
    reading.insert("uri", MINEW_URI);
    Ok(reading)
}

fn decode_visible_light(data: &[u8]) -> Result<Reading> {
    if data.len() != VISIBLE_LIGHT_FRAME_LENGTH_BYTES {
        return Err(CodecError::invalid_frame_length(
            "Minew visible light",
            data.len(),
        ));
    }

    let mut cursor = ByteCursor::new(data);
    cursor.skip(2)?;
    let battery_percentage = cursor.read_u8()? as f64;
    let is_visible_light = cursor.read_u8()? & VISIBLE_LIGHT_MASK == VISIBLE_LIGHT_MASK;

    let mut reading = Reading::new();
    reading.insert("batteryPercentage", battery_percentage);
    reading.insert(
        "isContactDetected",
        ReadingValue::Bools(vec![!is_visible_light]),
    );
    reading.insert("uri", MINEW_URI);
    Ok(reading)
}

fn decode_acceleration(data: &[u8]) -> Result<Reading> {
    if data.len() != ACCELERATION_FRAME_LENGTH_BYTES {
        return Err(CodecError::invalid_frame_length(
            "Minew acceleration",
            data.len(),
        ));
    }

    let mut cursor = ByteCursor::new(data);
    cursor.skip(2)?;
    let battery_percentage = cursor.read_u8()? as f64;
    let mut acceleration = Vec::with_capacity(3);
    for _ in 0..3 {
        let axis = cursor.read_bytes(2)?;
        acceleration.push(signed_8_8(axis[0], axis[1]));
    }

    let mut reading = Reading::new();
    reading.insert("batteryPercentage", battery_percentage);
    reading.insert("acceleration", acceleration);
    reading.insert("uri", MINEW_URI);
    Ok(reading)
}

fn decode_info(data: &[u8]) -> Result<Reading> {
    if data.len() < MIN_INFO_FRAME_LENGTH_BYTES {
        return Err(CodecError::invalid_frame_length("Minew info", data.len()));
    }

    let mut cursor = ByteCursor::new(data);
    cursor.skip(2)?;
    let battery_percentage = cursor.read_u8()? as f64;
    // MAC address occupies the six bytes before the name
    cursor.skip(6)?;
    let name = cursor.read_utf8_to_end()?;

    let mut reading = Reading::new();
    reading.insert("batteryPercentage", battery_percentage);
    reading.insert("name", name);
    reading.insert("uri", MINEW_URI);
    Ok(reading)
}

fn decode_passive_infrared(data: &[u8]) -> Result<Reading> {
    if data.len() != PIR_FRAME_LENGTH_BYTES {
        return Err(CodecError::invalid_frame_length("Minew PIR", data.len()));
    }

    let mut cursor = ByteCursor::new(data);
    cursor.skip(2)?;
    let battery_percentage = cursor.read_u8()? as f64;
    let is_infrared_detected = cursor.read_u16_be()? & PIR_MASK == PIR_MASK;

    let mut reading = Reading::new();
    reading.insert("batteryPercentage", battery_percentage);
    reading.insert(
        "isMotionDetected",
        ReadingValue::Bools(vec![is_infrared_detected]),
    );
    reading.insert("uri", MINEW_URI);
    Ok(reading)
}

fn decode_vibration(data: &[u8]) -> Result<Reading> {
    if data.len() != VIBRATION_FRAME_LENGTH_BYTES {
        return Err(CodecError::invalid_frame_length(
            "Minew vibration",
            data.len(),
        ));
    }

    let mut cursor = ByteCursor::new(data);
    cursor.skip(2)?;
    let battery_percentage = cursor.read_u8()? as f64;
    // 32-bit timestamp precedes the vibration flag; not surfaced
    cursor.skip(4)?;
    let is_vibration = cursor.read_u8()? & VIBRATION_MASK == VIBRATION_MASK;

    let mut reading = Reading::new();
    reading.insert("batteryPercentage", battery_percentage);
    reading.insert("isVibration", is_vibration);
    reading.insert("uri", MINEW_URI);
    Ok(reading)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(hex: &str) -> Vec<u8> {
        hex::decode(hex).unwrap()
    }

    #[test]
    fn test_temperature_humidity_frame() {
        let reading = process(&bytes("a1016315803200aabbccddeeff")).unwrap();

        assert_eq!(
            reading.get("batteryPercentage").and_then(|v| v.as_f64()),
            Some(99.0)
        );
        assert_eq!(reading.get("temperature").and_then(|v| v.as_f64()), Some(21.5));
        assert_eq!(
            reading.get("relativeHumidity").and_then(|v| v.as_f64()),
            Some(50.0)
        );
        assert_eq!(reading.get("uri").and_then(|v| v.as_str()), Some(MINEW_URI));
    }

    #[test]
    fn test_visible_light_frame() {
        let reading = process(&bytes("a1024501aabbccddeeff")).unwrap();

        assert_eq!(
            reading.get("batteryPercentage").and_then(|v| v.as_f64()),
            Some(69.0)
        );
        assert_eq!(
            reading.get("isContactDetected").and_then(|v| v.as_bools()),
            Some(&[false][..])
        );
    }

    #[test]
    fn test_acceleration_frame() {
        let reading = process(&bytes("a10364ff8000000080aabbccddeeff")).unwrap();

        assert_eq!(
            reading.get("batteryPercentage").and_then(|v| v.as_f64()),
            Some(100.0)
        );
        assert_eq!(
            reading.get("acceleration").and_then(|v| v.as_numbers()),
            Some(&[-0.5, 0.0, 0.5][..])
        );
    }

    #[test]
    fn test_info_frame() {
        let reading = process(&bytes("a10801aabbccddeeff504c5553")).unwrap();

        assert_eq!(
            reading.get("batteryPercentage").and_then(|v| v.as_f64()),
            Some(1.0)
        );
        assert_eq!(reading.get("name").and_then(|v| v.as_str()), Some("PLUS"));
    }

    #[test]
    fn test_passive_infrared_frame() {
        let reading = process(&bytes("a111500001aabbccddeeff")).unwrap();

        assert_eq!(
            reading.get("isMotionDetected").and_then(|v| v.as_bools()),
            Some(&[true][..])
        );
    }

    #[test]
    fn test_vibration_frame() {
        let reading = process(&bytes("a1185064a1d98f01aabbccddeeff")).unwrap();

        assert_eq!(
            reading.get("batteryPercentage").and_then(|v| v.as_f64()),
            Some(80.0)
        );
        assert_eq!(reading.get("isVibration").and_then(|v| v.as_bool()), Some(true));
    }

    #[test]
    fn test_wrong_frame_type() {
        assert!(process(&bytes("a2016315803200aabbccddeeff")).is_none());
    }

    #[test]
    fn test_unknown_product_model() {
        assert!(process(&bytes("a1ff6315803200aabbccddeeff")).is_none());
    }

    #[test]
    fn test_length_one_byte_short() {
        assert!(process(&bytes("a1016315803200aabbccddee")).is_none());
        assert!(process(&bytes("a1024501aabbccddee")).is_none());
        assert!(process(&bytes("a10364ff8000000080aabbccddee")).is_none());
    }
}
