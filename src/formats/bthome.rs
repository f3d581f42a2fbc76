// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! BTHome v2 sensor data element stream decoding.
//!
//! The BTHome service (`fcd2`) carries a device information byte (version
//! bits, trigger-based flag, encryption flag) followed by a
//! self-describing sequence of `(data type, value)` elements with no
//! fixed count. Only plain version 2 payloads are decoded; the encryption
//! flag rejects the whole payload.
//!
//! The stream is folded element by element: each data type consumes its
//! fixed or length-prefixed width, and an unknown type or short value
//! terminates the fold with whatever was accumulated so far — a partial
//! reading is a valid result, never discarded.
//!
//! Repeated fields are reconciled per field, not by a uniform rule:
//! `temperature` collapses into a `temperatures` list on the second
//! occurrence, `acceleration` and the detection flag fields are
//! list-wrapped from the first occurrence and append, and everything else
//! is last-write-wins.

use byteorder::{ByteOrder, LittleEndian};

use crate::core::{Reading, ReadingValue};

const MIN_DATA_LENGTH_BYTES: usize = 2;
const DEVICE_INFORMATION_OFFSET: usize = 0;
const FIRST_DATA_TYPE_OFFSET: usize = 1;

const VERSION_MASK: u8 = 0xe0;
const VERSION_2: u8 = 0x40;
const ENCRYPTION_MASK: u8 = 0x01;

/// Approximate microgram-per-cubic-metre to ppm conversion for mixed
/// volatile organic compounds.
const VOC_UGM3_PER_PPM: f64 = 4.5;

const STANDARD_GRAVITY_MILLIG: f64 = 9806.65;

const BTHOME_URI: &str = "https://sniffypedia.org/Service/BTHome/";

/// Outcome of decoding a single stream element.
enum ElementOutcome {
    /// The element consumed this many value bytes
    Consumed(usize),
    /// Unknown data type or value too short; terminates the stream
    Invalid,
}

/// Process BTHome service data.
///
/// Rejects payloads that are not plain version 2 (wrong version bits or
/// the encryption flag set), then folds the element stream into a single
/// reading carrying the BTHome URI.
pub fn process(data: &[u8]) -> Option<Reading> {
    if data.len() < MIN_DATA_LENGTH_BYTES {
        return None;
    }

    let device_information = data[DEVICE_INFORMATION_OFFSET];
    if device_information & VERSION_MASK != VERSION_2 {
        return None;
    }
    // Trigger-based flag (0x04) is part of the header but carries no field
    if device_information & ENCRYPTION_MASK != 0 {
        return None;
    }

    let mut reading = Reading::new();
    reading.insert("uri", BTHOME_URI);

    let mut offset = FIRST_DATA_TYPE_OFFSET;
    while offset < data.len() {
        let data_type = data[offset];
        let value = &data[offset + 1..];
        match decode_data_type(data_type, value, &mut reading) {
            ElementOutcome::Consumed(length) => offset += length + 1,
            ElementOutcome::Invalid => break,
        }
    }

    Some(reading)
}

// ============================================================================
// Value readers
// ============================================================================

fn read_u8(value: &[u8]) -> Option<f64> {
    value.first().map(|&b| b as f64)
}

fn read_i8(value: &[u8]) -> Option<f64> {
    value.first().map(|&b| b as i8 as f64)
}

fn read_u16(value: &[u8]) -> Option<f64> {
    value.get(..2).map(|s| LittleEndian::read_u16(s) as f64)
}

fn read_i16(value: &[u8]) -> Option<f64> {
    value.get(..2).map(|s| LittleEndian::read_i16(s) as f64)
}

fn read_u24(value: &[u8]) -> Option<f64> {
    value.get(..3).map(|s| LittleEndian::read_u24(s) as f64)
}

fn read_u32(value: &[u8]) -> Option<f64> {
    value.get(..4).map(|s| LittleEndian::read_u32(s) as f64)
}

fn read_i32(value: &[u8]) -> Option<f64> {
    value.get(..4).map(|s| LittleEndian::read_i32(s) as f64)
}

/// Slice off a length-prefixed value (text and raw data types).
fn read_length_prefixed(value: &[u8]) -> Option<&[u8]> {
    let length = *value.first()? as usize;
    value.get(1..1 + length)
}

// ============================================================================
// Field merge helpers
// ============================================================================

/// Insert a scalar field, last-write-wins.
fn scalar(
    reading: &mut Reading,
    name: &'static str,
    value: Option<f64>,
    width: usize,
) -> ElementOutcome {
    match value {
        Some(v) => {
            reading.insert(name, v);
            ElementOutcome::Consumed(width)
        }
        None => ElementOutcome::Invalid,
    }
}

/// Insert a temperature: scalar on first occurrence, collected into the
/// `temperatures` list from the second occurrence on.
fn temperature(reading: &mut Reading, value: Option<f64>, width: usize) -> ElementOutcome {
    let Some(v) = value else {
        return ElementOutcome::Invalid;
    };
    match reading.remove("temperature") {
        Some(ReadingValue::Number(first)) => {
            reading.push_number("temperatures", first);
            reading.push_number("temperatures", v);
        }
        _ => {
            if reading.contains_field("temperatures") {
                reading.push_number("temperatures", v);
            } else {
                reading.insert("temperature", v);
            }
        }
    }
    ElementOutcome::Consumed(width)
}

/// Append a list-wrapped boolean flag field.
fn flag(reading: &mut Reading, name: &'static str, value: Option<bool>) -> ElementOutcome {
    match value {
        Some(v) => {
            reading.push_bool(name, v);
            ElementOutcome::Consumed(1)
        }
        None => ElementOutcome::Invalid,
    }
}

/// Append a list-wrapped numeric field (acceleration axes).
fn axis(
    reading: &mut Reading,
    name: &'static str,
    value: Option<f64>,
    width: usize,
) -> ElementOutcome {
    match value {
        Some(v) => {
            reading.push_number(name, v);
            ElementOutcome::Consumed(width)
        }
        None => ElementOutcome::Invalid,
    }
}

/// Consume a data type that carries no output field.
fn skip(value: &[u8], width: usize) -> ElementOutcome {
    if value.len() >= width {
        ElementOutcome::Consumed(width)
    } else {
        ElementOutcome::Invalid
    }
}

// ============================================================================
// Data type table
// ============================================================================

/// Decode one stream element into the accumulating reading.
fn decode_data_type(data_type: u8, value: &[u8], reading: &mut Reading) -> ElementOutcome {
    match data_type {
        0x00 => scalar(reading, "txCycle", read_u8(value), 1),
        0x01 => scalar(reading, "batteryPercentage", read_u8(value), 1),
        0x02 => temperature(reading, read_i16(value).map(|v| v / 100.0), 2),
        0x03 => scalar(reading, "relativeHumidity", read_u16(value).map(|v| v / 100.0), 2),
        0x04 => scalar(reading, "pressure", read_u24(value), 3),
        0x05 => scalar(reading, "illuminance", read_u24(value).map(|v| v / 100.0), 3),
        0x06 | 0x07 => skip(value, 2), // mass
        0x08 => skip(value, 2),        // dewpoint
        0x09 => scalar(reading, "count", read_u8(value), 1),
        0x0a => scalar(reading, "energy", read_u24(value).map(|v| v / 1000.0), 3),
        0x0b => scalar(reading, "power", read_u24(value).map(|v| v / 100.0), 3),
        0x0c => scalar(reading, "voltage", read_u16(value).map(|v| v / 1000.0), 2),
        0x0d => scalar(reading, "pm2.5", read_u16(value), 2),
        0x0e => scalar(reading, "pm10", read_u16(value), 2),
        0x0f | 0x10 => skip(value, 1), // generic boolean, power state
        0x11 => flag(reading, "isContactDetected", value.first().map(|&b| b == 0)),
        0x12 => scalar(reading, "carbonDioxideConcentration", read_u16(value), 2),
        0x13 => scalar(
            reading,
            "volatileOrganicCompoundsConcentration",
            read_u16(value).map(|v| (v / VOC_UGM3_PER_PPM).round()),
            2,
        ),
        0x14 => skip(value, 2),                // moisture
        0x15 | 0x16 => skip(value, 1),         // battery state flags
        0x17 => flag(reading, "isCarbonMonoxideDetected", value.first().map(|&b| b > 0)),
        0x18 | 0x19 => skip(value, 1),         // cold, connectivity
        0x1a | 0x1b => flag(reading, "isContactDetected", value.first().map(|&b| b == 0)),
        0x1c => flag(reading, "isGasDetected", value.first().map(|&b| b > 0)),
        0x1d => skip(value, 1), // heat
        0x1e => flag(reading, "isLightDetected", value.first().map(|&b| b > 0)),
        0x1f => skip(value, 1), // lock
        0x20 => flag(reading, "isLiquidDetected", value.first().map(|&b| b > 0)),
        0x21 | 0x22 => flag(reading, "isMotionDetected", value.first().map(|&b| b > 0)),
        0x23 => flag(reading, "isOccupancyDetected", value.first().map(|&b| b > 0)),
        0x24 => skip(value, 1), // plug
        0x25 => flag(reading, "isOccupancyDetected", value.first().map(|&b| b > 0)),
        0x26 => match value.first() {
            Some(&b) => {
                reading.insert("isHealthy", b == 0);
                ElementOutcome::Consumed(1)
            }
            None => ElementOutcome::Invalid,
        },
        0x27 | 0x28 => skip(value, 1), // running, safety
        0x29 => flag(reading, "isSmokeDetected", value.first().map(|&b| b > 0)),
        0x2a => skip(value, 1), // sound
        0x2b => flag(reading, "isTamperDetected", value.first().map(|&b| b > 0)),
        0x2c => flag(reading, "isMotionDetected", value.first().map(|&b| b > 0)),
        0x2d => flag(reading, "isContactDetected", value.first().map(|&b| b == 0)),
        0x2e => scalar(reading, "relativeHumidity", read_u8(value), 1),
        0x2f => skip(value, 1), // moisture flag
        0x3a => flag(reading, "isButtonPressed", value.first().map(|&b| b != 0)),
        0x3c => skip(value, 2), // dimmer
        0x3d => scalar(reading, "count", read_u16(value), 2),
        0x3e => scalar(reading, "count", read_u32(value), 4),
        0x3f => scalar(reading, "angleOfRotation", read_i16(value).map(|v| v / 10.0), 2),
        0x40 => scalar(reading, "distance", read_u16(value).map(|v| v / 1000.0), 2),
        0x41 => scalar(reading, "distance", read_u16(value).map(|v| v / 10.0), 2),
        0x42 => scalar(reading, "duration", read_u24(value).map(|v| v / 1000.0), 3),
        0x43 => scalar(reading, "amperage", read_u16(value).map(|v| v / 1000.0), 2),
        0x44 => scalar(reading, "speed", read_u16(value).map(|v| v / 100.0), 2),
        0x45 => temperature(reading, read_i16(value).map(|v| v / 10.0), 2),
        0x46 => skip(value, 1),        // UV index
        0x47 | 0x48 => skip(value, 2), // volume
        0x49 => skip(value, 2),        // volume flow rate
        0x4a => scalar(reading, "voltage", read_u16(value).map(|v| v / 10.0), 2),
        0x4b => skip(value, 3), // gas volume
        0x4c => skip(value, 4), // gas volume
        0x4d => scalar(reading, "energy", read_u32(value).map(|v| v / 1000.0), 4),
        0x4e | 0x4f => skip(value, 4), // volume, water
        0x50 => skip(value, 4),        // timestamp
        0x51 => axis(
            reading,
            "acceleration",
            read_u16(value).map(|v| v / STANDARD_GRAVITY_MILLIG),
            2,
        ),
        0x52 => scalar(reading, "angularVelocity", read_u16(value).map(|v| v / 1000.0), 2),
        0x53 => match read_length_prefixed(value) {
            Some(text) => {
                let length = text.len();
                reading.insert("text", String::from_utf8_lossy(text).into_owned());
                ElementOutcome::Consumed(length + 1)
            }
            None => ElementOutcome::Invalid,
        },
        0x54 => match read_length_prefixed(value) {
            Some(raw) => {
                let length = raw.len();
                reading.insert("raw", hex::encode(raw));
                ElementOutcome::Consumed(length + 1)
            }
            None => ElementOutcome::Invalid,
        },
        0x55 => skip(value, 4), // volume storage
        0x56 => skip(value, 2), // conductivity
        0x57 => temperature(reading, read_i8(value), 1),
        0x58 => temperature(reading, read_i8(value).map(|v| v * 0.35), 1),
        0x59 => scalar(reading, "count", read_i8(value), 1),
        0x5a => scalar(reading, "count", read_i16(value), 2),
        0x5b => scalar(reading, "count", read_i32(value), 4),
        0x5c => scalar(reading, "power", read_i32(value).map(|v| v / 100.0), 4),
        0x5d => scalar(reading, "amperage", read_i16(value).map(|v| v / 1000.0), 2),
        0x5e => scalar(reading, "heading", read_u16(value).map(|v| v / 100.0), 2),
        0x5f => skip(value, 2), // precipitation
        0x60 => skip(value, 1), // channel
        0x61 => scalar(reading, "angularVelocity", read_u16(value).map(|v| v * 6.0), 2),
        0x62 => scalar(reading, "speed", read_i32(value).map(|v| v / 1_000_000.0), 4),
        0x63 => axis(
            reading,
            "acceleration",
            read_i32(value).map(|v| v / 1_000_000.0),
            4,
        ),
        0xf0 => match value.get(..2) {
            Some(id) => {
                reading.insert("deviceType", format!("{}", LittleEndian::read_u16(id)));
                ElementOutcome::Consumed(2)
            }
            None => ElementOutcome::Invalid,
        },
        0xf1 => match value.get(..4) {
            Some(v) => {
                reading.insert(
                    "firmwareVersion",
                    format!("{}.{}.{}.{}", v[3], v[2], v[1], v[0]),
                );
                ElementOutcome::Consumed(4)
            }
            None => ElementOutcome::Invalid,
        },
        0xf2 => match value.get(..3) {
            Some(v) => {
                reading.insert("firmwareVersion", format!("{}.{}.{}", v[2], v[1], v[0]));
                ElementOutcome::Consumed(3)
            }
            None => ElementOutcome::Invalid,
        },
        _ => ElementOutcome::Invalid,
    }
}
