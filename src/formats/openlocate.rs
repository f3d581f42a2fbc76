// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! HPE Open Locate location element stream decoding.
//!
//! The Open Locate service data (`fd40`, subtype 0x09) carries a two-byte
//! header followed by a sequence of location elements. Each element's
//! leading byte packs a 3-bit tag in the high bits and a 5-bit length in
//! the low bits; the value is the `length` bytes that follow.
//!
//! The element loop is tolerant: a zero length or an element running past
//! the buffer stops the loop with whatever was accumulated, and a
//! per-element decode failure skips only that element. Elements merge
//! last-write-wins into one reading, except device identities, which
//! append to a shared identifier list. A reading without a URL element
//! gets the HPE vendor URI.

use byteorder::{BigEndian, ByteOrder};

use crate::codecs::{altitude, geocoordinate};
use crate::core::{Reading, ReadingValue};

use super::expand_url;

const MIN_DATA_LENGTH_BYTES: usize = 2;
const SUBTYPE_OFFSET: usize = 0;
const FIRST_ELEMENT_OFFSET: usize = 2;

const SUBTYPE_OPEN_LOCATE: u8 = 0x09;

const TAG_MASK: u8 = 0xe0;
const LENGTH_MASK: u8 = 0x1f;
const TAG_SHIFT: u8 = 5;

const TAG_PROPERTIES: u8 = 0;
const TAG_GEOLOCATION: u8 = 1;
const TAG_FLOOR_LOCATION: u8 = 2;
const TAG_IDENTITY: u8 = 3;
const TAG_URL: u8 = 4;
const TAG_SIGNATURE: u8 = 5;

const PROPERTIES_ELEMENT_MIN_LENGTH_BYTES: usize = 2;
const GEOLOCATION_ELEMENT_LENGTH_BYTES: usize = 16;
const FLOOR_LOCATION_ELEMENT_MIN_LENGTH_BYTES: usize = 9;
const IDENTITY_ELEMENT_MIN_LENGTH_BYTES: usize = 2;
const URL_ELEMENT_MIN_LENGTH_BYTES: usize = 3;
const SIGNATURE_ELEMENT_MIN_LENGTH_BYTES: usize = 2;

const GEOLOCATION_VERSION: u8 = 1;
const DATUM_WGS84: u8 = 1;

const ID_TYPE_MAC_ADDRESS_MASK: u8 = 0x01;
const ID_TYPE_TEXT_STRING_MASK: u8 = 0x02;
const ID_TYPE_IBEACON_ID_MASK: u8 = 0x04;

const SIGNATURE_TYPE_HMAC: u8 = 0;
const HMAC_SIGNATURE_ELEMENT_LENGTH_BYTES: usize = 21;

const HPE_URI: &str =
    "https://sniffypedia.org/Organization/Hewlett_Packard_Enterprise_Company/";

/// Process Open Locate service data.
///
/// Dispatches on the subtype byte; an unknown subtype yields `None`.
pub fn process(data: &[u8]) -> Option<Reading> {
    if data.len() < MIN_DATA_LENGTH_BYTES {
        return None;
    }

    match data[SUBTYPE_OFFSET] {
        SUBTYPE_OPEN_LOCATE => Some(decode_open_locate(data)),
        _ => None,
    }
}

/// Fold the location element stream into a single reading.
///
/// Byte 1 packs the sequence number (bits 7-4), fragment number
/// (bits 3-1) and last-fragment flag (bit 0); it routes fragments and
/// contributes no output fields.
fn decode_open_locate(data: &[u8]) -> Reading {
    let mut reading = Reading::new();
    let mut index = FIRST_ELEMENT_OFFSET;

    while index < data.len() {
        let tag = (data[index] & TAG_MASK) >> TAG_SHIFT;
        let length = (data[index] & LENGTH_MASK) as usize;

        // Zero length or overrun: return what was accumulated so far
        if length == 0 || index + length >= data.len() {
            break;
        }

        let element = &data[index + 1..index + 1 + length];
        if let Some(decoded) = decode_element(tag, element) {
            merge_element(&mut reading, decoded);
        }

        index += 1 + length;
    }

    if !reading.contains_field("uri") {
        reading.insert("uri", HPE_URI);
    }
    reading
}

/// Dispatch one element to its per-tag decoder.
///
/// A failed element yields `None` without aborting the outer loop.
fn decode_element(tag: u8, element: &[u8]) -> Option<Reading> {
    match tag {
        TAG_PROPERTIES => decode_properties(element),
        TAG_GEOLOCATION => decode_geolocation(element),
        TAG_FLOOR_LOCATION => decode_floor_location(element),
        TAG_IDENTITY => decode_identity(element),
        TAG_URL => decode_url(element),
        TAG_SIGNATURE => decode_signature(element),
        _ => None,
    }
}

/// Merge a decoded element into the accumulating reading.
///
/// Identity lists append; every other field is last-write-wins.
fn merge_element(reading: &mut Reading, element: Reading) {
    for (name, value) in element {
        if name == "deviceIds" {
            if let ReadingValue::Texts(ids) = value {
                for id in ids {
                    reading.push_text("deviceIds", id);
                }
            }
        } else {
            reading.insert(name, value);
        }
    }
}

/// Properties element: transmit power and motion capability.
fn decode_properties(element: &[u8]) -> Option<Reading> {
    if element.len() < PROPERTIES_ELEMENT_MIN_LENGTH_BYTES {
        return None;
    }

    let tx_power = element[0] as i8;
    let is_stationary = element[1] & 0x01 == 0x00;

    let mut properties = Reading::new();
    properties.insert("txPower", tx_power as f64);
    properties.insert("isStationary", is_stationary);
    Some(properties)
}

/// Geolocation element: bit-packed WGS84 coordinates.
///
/// Latitude and longitude each occupy 34 bits after a 6-bit uncertainty
/// prefix (bytes 0-4 and 5-9); the altitude block (bytes 10-14) packs a
/// 4-bit type, 6-bit uncertainty and 30-bit value; byte 15 carries the
/// version and datum. The output is a composite `position` vector in
/// longitude, latitude order with the altitude appended when its type is
/// supported.
fn decode_geolocation(element: &[u8]) -> Option<Reading> {
    if element.len() != GEOLOCATION_ELEMENT_LENGTH_BYTES {
        return None;
    }

    let version = element[15] >> 6;
    let datum = element[15] & 0x07;
    if version != GEOLOCATION_VERSION || datum != DATUM_WGS84 {
        return None;
    }

    let latitude_whole = ((BigEndian::read_u16(&element[0..2]) >> 1) & 0x1ff) as u64;
    let latitude_fraction = (BigEndian::read_u32(&element[1..5]) & 0x01ff_ffff) as u64;
    let latitude = geocoordinate((latitude_whole << 25) | latitude_fraction);

    let longitude_whole = ((BigEndian::read_u32(&element[4..8]) >> 9) & 0x1ff) as u64;
    let longitude_fraction = (BigEndian::read_u32(&element[6..10]) & 0x01ff_ffff) as u64;
    let longitude = geocoordinate((longitude_whole << 25) | longitude_fraction);

    let altitude_type = element[10] >> 4;
    let altitude_raw = BigEndian::read_u32(&element[11..15]) & 0x3fff_ffff;

    let mut position = vec![longitude, latitude];
    if let Some(altitude) = altitude(altitude_raw, altitude_type) {
        position.push(altitude);
    }

    let mut geolocation = Reading::new();
    geolocation.insert("position", position);
    Some(geolocation)
}

/// Floor location element: building-relative position and floor name.
fn decode_floor_location(element: &[u8]) -> Option<Reading> {
    if element.len() < FLOOR_LOCATION_ELEMENT_MIN_LENGTH_BYTES {
        return None;
    }

    // The top byte of each coordinate word is its uncertainty
    let x = (BigEndian::read_u32(&element[0..4]) & 0x00ff_ffff) as f64 / 100.0;
    let y = (BigEndian::read_u32(&element[4..8]) & 0x00ff_ffff) as f64 / 100.0;
    let floor_id = String::from_utf8_lossy(&element[8..]).into_owned();

    let mut floor = Reading::new();
    floor.insert("position", vec![x, y]);
    floor.insert("floorId", floor_id);
    Some(floor)
}

/// Identity element: a presence bitmask followed by the declared
/// identifier sub-fields in mask order.
///
/// A short remaining slice truncates only this element; the sub-fields
/// already parsed are returned.
fn decode_identity(element: &[u8]) -> Option<Reading> {
    if element.len() < IDENTITY_ELEMENT_MIN_LENGTH_BYTES {
        return None;
    }

    let id_types = element[0];
    let mut offset = 1;
    let mut identity = Reading::new();

    if id_types & ID_TYPE_MAC_ADDRESS_MASK != 0 {
        let Some(mac) = element.get(offset..offset + 6) else {
            return Some(identity);
        };
        identity.push_text("deviceIds", format!("{}/2", hex::encode(mac)));
        offset += 6;
    }

    if id_types & ID_TYPE_TEXT_STRING_MASK != 0 {
        let Some(&string_length) = element.get(offset) else {
            return Some(identity);
        };
        let string_length = string_length as usize;
        let Some(name) = element.get(offset + 1..offset + 1 + string_length) else {
            return Some(identity);
        };
        identity.insert("name", String::from_utf8_lossy(name).into_owned());
        offset += string_length + 1;
    }

    if id_types & ID_TYPE_IBEACON_ID_MASK != 0 {
        let Some(ibeacon) = element.get(offset..offset + 20) else {
            return Some(identity);
        };
        identity.push_text(
            "deviceIds",
            format!(
                "{}/{}/{}",
                hex::encode(&ibeacon[0..16]),
                hex::encode(&ibeacon[16..18]),
                hex::encode(&ibeacon[18..20])
            ),
        );
    }

    Some(identity)
}

/// URL element: a compressed web address identifying the owner.
fn decode_url(element: &[u8]) -> Option<Reading> {
    if element.len() < URL_ELEMENT_MIN_LENGTH_BYTES {
        return None;
    }

    let url = expand_url(element[0], &element[1..])?;

    let mut reading = Reading::new();
    reading.insert("uri", url);
    Some(reading)
}

/// Signature element: an authentication timestamp and message
/// authentication code.
fn decode_signature(element: &[u8]) -> Option<Reading> {
    if element.len() < SIGNATURE_ELEMENT_MIN_LENGTH_BYTES {
        return None;
    }

    match element[0] {
        SIGNATURE_TYPE_HMAC => {
            if element.len() != HMAC_SIGNATURE_ELEMENT_LENGTH_BYTES {
                return None;
            }

            let mut signature = Reading::new();
            signature.insert("timestamp", BigEndian::read_u32(&element[1..5]) as f64);
            signature.insert("messageAuthenticationCode", hex::encode(&element[5..]));

            let mut reading = Reading::new();
            reading.insert("signature", ReadingValue::Nested(signature));
            Some(reading)
        }
        _ => None,
    }
}
