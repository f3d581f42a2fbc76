// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! GATT characteristic decoding.
//!
//! Service data keyed by a standard 16-bit characteristic UUID is decoded
//! per the Bluetooth GATT Specification Supplement. Each characteristic
//! has a fixed layout with an exact or bounded length; multi-field
//! characteristics carry a leading flags field whose bits gate optional
//! fields at cumulative offsets.
//!
//! Sentinel raw values (0xffff "value is not known", medical-float
//! unknowns) and physically impossible magnitudes invalidate the whole
//! record.

use std::collections::HashMap;
use std::sync::LazyLock;

use byteorder::{ByteOrder, LittleEndian};

use crate::codecs::{float32, sfloat16};
use crate::core::{ByteCursor, CodecError, Reading, Result};

type CharacteristicDecoder = fn(&[u8]) -> Result<Reading>;

/// Characteristic decoder registry, resolved once at startup.
static CHARACTERISTIC_REGISTRY: LazyLock<HashMap<&'static str, CharacteristicDecoder>> =
    LazyLock::new(|| {
        let entries: [(&'static str, CharacteristicDecoder); 23] = [
            ("2a19", battery_level),
            ("2a1c", temperature_measurement),
            ("2a37", heart_rate_measurement),
            ("2a67", location_and_speed),
            ("2a6c", elevation),
            ("2a6d", pressure),
            ("2a6e", temperature),
            ("2a6f", humidity),
            ("2a76", uv_index),
            ("2a77", irradiance),
            ("2aa1", magnetic_flux_density_3d),
            ("2afb", illuminance),
            ("2b18", voltage),
            ("2bcf", ammonia_concentration),
            ("2bd0", carbon_monoxide_concentration),
            ("2bd1", methane_concentration),
            ("2bd2", nitrogen_dioxide_concentration),
            ("2bd3", non_methane_voc_concentration),
            ("2bd4", ozone_concentration),
            ("2bd5", pm1_concentration),
            ("2bd6", pm2_5_concentration),
            ("2bd7", pm10_concentration),
            ("2bd8", sulfur_dioxide_concentration),
        ];
        HashMap::from(entries)
    });

const MIN_DATA_LENGTH_BYTES: usize = 1;

/// Process GATT characteristic service data.
///
/// Looks the UUID up in the characteristic registry; an unknown UUID or
/// a characteristic failing its validation yields `None`.
pub fn process(uuid: &str, data: &[u8]) -> Option<Reading> {
    if data.len() < MIN_DATA_LENGTH_BYTES {
        return None;
    }

    let decoder = CHARACTERISTIC_REGISTRY.get(uuid)?;
    decoder(data).ok()
}

// ============================================================================
// Simple single-field characteristics
// ============================================================================

const BATTERY_LEVEL_STRUCT_LENGTH: usize = 1;
const MAX_PERCENTAGE: f64 = 100.0;

/// Battery Level (0x2a19): uint8 percentage.
fn battery_level(data: &[u8]) -> Result<Reading> {
    if data.len() != BATTERY_LEVEL_STRUCT_LENGTH {
        return Err(CodecError::invalid_frame_length("Battery Level", data.len()));
    }

    let battery_percentage = data[0] as f64;
    if battery_percentage > MAX_PERCENTAGE {
        return Err(CodecError::out_of_range("batteryPercentage"));
    }

    let mut reading = Reading::new();
    reading.insert("batteryPercentage", battery_percentage);
    Ok(reading)
}

const ELEVATION_STRUCT_LENGTH: usize = 3;

/// Elevation (0x2a6c): sint24 in centimetres.
fn elevation(data: &[u8]) -> Result<Reading> {
    if data.len() != ELEVATION_STRUCT_LENGTH {
        return Err(CodecError::invalid_frame_length("Elevation", data.len()));
    }

    let mut reading = Reading::new();
    reading.insert("elevation", LittleEndian::read_i24(data) as f64 / 100.0);
    Ok(reading)
}

const PRESSURE_STRUCT_LENGTH: usize = 4;

/// Pressure (0x2a6d): uint32 in 0.1 pascal units.
fn pressure(data: &[u8]) -> Result<Reading> {
    if data.len() != PRESSURE_STRUCT_LENGTH {
        return Err(CodecError::invalid_frame_length("Pressure", data.len()));
    }

    let mut reading = Reading::new();
    reading.insert("pressure", LittleEndian::read_u32(data) as f64 / 10.0);
    Ok(reading)
}

const TEMPERATURE_STRUCT_LENGTH: usize = 2;
const TEMPERATURE_MIN_VALUE: f64 = -273.15;

/// Temperature (0x2a6e): sint16 in hundredths of a degree Celsius.
fn temperature(data: &[u8]) -> Result<Reading> {
    if data.len() != TEMPERATURE_STRUCT_LENGTH {
        return Err(CodecError::invalid_frame_length("Temperature", data.len()));
    }

    let temperature = LittleEndian::read_i16(data) as f64 / 100.0;
    if temperature < TEMPERATURE_MIN_VALUE {
        return Err(CodecError::out_of_range("temperature"));
    }

    let mut reading = Reading::new();
    reading.insert("temperature", temperature);
    Ok(reading)
}

const HUMIDITY_STRUCT_LENGTH: usize = 2;
const HUMIDITY_UNKNOWN: u16 = 0xffff;

/// Humidity (0x2a6f): uint16 in hundredths of a percent.
fn humidity(data: &[u8]) -> Result<Reading> {
    if data.len() != HUMIDITY_STRUCT_LENGTH {
        return Err(CodecError::invalid_frame_length("Humidity", data.len()));
    }

    let raw = LittleEndian::read_u16(data);
    if raw == HUMIDITY_UNKNOWN {
        return Err(CodecError::out_of_range("relativeHumidity"));
    }
    let relative_humidity = raw as f64 / 100.0;
    if relative_humidity > MAX_PERCENTAGE {
        return Err(CodecError::out_of_range("relativeHumidity"));
    }

    let mut reading = Reading::new();
    reading.insert("relativeHumidity", relative_humidity);
    Ok(reading)
}

const UV_INDEX_STRUCT_LENGTH: usize = 1;

/// UV Index (0x2a76): uint8.
fn uv_index(data: &[u8]) -> Result<Reading> {
    if data.len() != UV_INDEX_STRUCT_LENGTH {
        return Err(CodecError::invalid_frame_length("UV Index", data.len()));
    }

    let mut reading = Reading::new();
    reading.insert("uvIndex", data[0] as f64);
    Ok(reading)
}

const IRRADIANCE_STRUCT_LENGTH: usize = 2;

/// Irradiance (0x2a77): uint16 in 0.1 W/m² units.
fn irradiance(data: &[u8]) -> Result<Reading> {
    if data.len() != IRRADIANCE_STRUCT_LENGTH {
        return Err(CodecError::invalid_frame_length("Irradiance", data.len()));
    }

    let mut reading = Reading::new();
    reading.insert("irradiance", LittleEndian::read_u16(data) as f64 / 10.0);
    Ok(reading)
}

const ILLUMINANCE_STRUCT_LENGTH: usize = 3;
const ILLUMINANCE_UNKNOWN: u32 = 0xff_ffff;

/// Illuminance (0x2afb): uint24 in hundredths of a lux.
fn illuminance(data: &[u8]) -> Result<Reading> {
    if data.len() != ILLUMINANCE_STRUCT_LENGTH {
        return Err(CodecError::invalid_frame_length("Illuminance", data.len()));
    }

    let raw = LittleEndian::read_u24(data);
    if raw == ILLUMINANCE_UNKNOWN {
        return Err(CodecError::out_of_range("illuminance"));
    }

    let mut reading = Reading::new();
    reading.insert("illuminance", raw as f64 / 100.0);
    Ok(reading)
}

const VOLTAGE_STRUCT_LENGTH: usize = 2;
const VOLTAGE_UNKNOWN: u16 = 0xffff;
const VOLTAGE_DIVIDER: f64 = 64.0;

/// Voltage (0x2b18): uint16 in 1/64 volt units.
fn voltage(data: &[u8]) -> Result<Reading> {
    if data.len() != VOLTAGE_STRUCT_LENGTH {
        return Err(CodecError::invalid_frame_length("Voltage", data.len()));
    }

    let raw = LittleEndian::read_u16(data);
    if raw == VOLTAGE_UNKNOWN {
        return Err(CodecError::out_of_range("voltage"));
    }

    let mut reading = Reading::new();
    reading.insert("voltage", raw as f64 / VOLTAGE_DIVIDER);
    Ok(reading)
}

const MFD3D_STRUCT_LENGTH: usize = 6;

/// Magnetic Flux Density 3D (0x2aa1): three sint16 axes in milligauss.
fn magnetic_flux_density_3d(data: &[u8]) -> Result<Reading> {
    if data.len() != MFD3D_STRUCT_LENGTH {
        return Err(CodecError::invalid_frame_length(
            "Magnetic Flux Density 3D",
            data.len(),
        ));
    }

    // Units are gauss (not tesla)
    let magnetic_field = vec![
        LittleEndian::read_i16(&data[0..2]) as f64 / 1000.0,
        LittleEndian::read_i16(&data[2..4]) as f64 / 1000.0,
        LittleEndian::read_i16(&data[4..6]) as f64 / 1000.0,
    ];

    let mut reading = Reading::new();
    reading.insert("magneticField", magnetic_field);
    Ok(reading)
}

// ============================================================================
// Flag-gated characteristics
// ============================================================================

const HRM_MIN_STRUCT_LENGTH: usize = 2;
const HRM_MAX_STRUCT_LENGTH: usize = 21; // Assumes 8 RR-intervals (could be higher?)
const HRM_VALUE_FORMAT_UINT16: u8 = 0x01;
const HRM_SENSOR_CONTACT_DETECTED: u8 = 0x02;
const HRM_SENSOR_CONTACT_SUPPORTED: u8 = 0x04;
const HRM_ENERGY_EXPENDED_PRESENT: u8 = 0x08;
const HRM_RR_INTERVALS_PRESENT: u8 = 0x10;
const HRM_RR_INTERVAL_SECONDS_DIVIDER: f64 = 1024.0;

/// Heart Rate Measurement (0x2a37).
///
/// Optional fields follow the flags byte in flag order: heart rate value
/// (8 or 16 bit), energy expended, then RR-intervals filling the rest of
/// the structure.
fn heart_rate_measurement(data: &[u8]) -> Result<Reading> {
    if !(HRM_MIN_STRUCT_LENGTH..=HRM_MAX_STRUCT_LENGTH).contains(&data.len()) {
        return Err(CodecError::invalid_frame_length(
            "Heart Rate Measurement",
            data.len(),
        ));
    }

    let mut cursor = ByteCursor::new(data);
    let flags = cursor.read_u8()?;
    let mut reading = Reading::new();

    let heart_rate = if flags & HRM_VALUE_FORMAT_UINT16 != 0 {
        cursor.read_u16_le()? as f64
    } else {
        cursor.read_u8()? as f64
    };
    reading.insert("heartRate", heart_rate);

    if flags & HRM_SENSOR_CONTACT_SUPPORTED != 0 {
        reading.insert(
            "isSensorContactDetected",
            flags & HRM_SENSOR_CONTACT_DETECTED != 0,
        );
    }

    if flags & HRM_ENERGY_EXPENDED_PRESENT != 0 {
        // Unit is joules
        reading.insert("energyExpended", cursor.read_u16_le()? as f64);
    }

    if flags & HRM_RR_INTERVALS_PRESENT != 0 {
        let mut rr_intervals = Vec::new();
        while cursor.remaining() >= 2 {
            rr_intervals.push(cursor.read_u16_le()? as f64 / HRM_RR_INTERVAL_SECONDS_DIVIDER);
        }
        reading.insert("rrIntervals", rr_intervals);
    }

    Ok(reading)
}

const LAS_MIN_STRUCT_LENGTH: usize = 2;
const LAS_MAX_STRUCT_LENGTH: usize = 28;
const LAS_SPEED_PRESENT: u16 = 0x0001;
const LAS_DISTANCE_PRESENT: u16 = 0x0002;
const LAS_LOCATION_PRESENT: u16 = 0x0004;
const LAS_ELEVATION_PRESENT: u16 = 0x0008;
const LAS_HEADING_PRESENT: u16 = 0x0010;
const LAS_ROLLING_TIME_PRESENT: u16 = 0x0020;
const COORDINATE_DIVIDER: f64 = 10_000_000.0;

/// Location and Speed (0x2a67).
///
/// Optional fields follow the 16-bit flags field in flag order. Latitude
/// precedes longitude on the wire; the output groups them as a
/// `position` vector in longitude, latitude order, with the elevation
/// appended when both are present.
fn location_and_speed(data: &[u8]) -> Result<Reading> {
    if !(LAS_MIN_STRUCT_LENGTH..=LAS_MAX_STRUCT_LENGTH).contains(&data.len()) {
        return Err(CodecError::invalid_frame_length(
            "Location and Speed",
            data.len(),
        ));
    }

    let mut cursor = ByteCursor::new(data);
    let flags = cursor.read_u16_le()?;
    let mut reading = Reading::new();

    if flags & LAS_SPEED_PRESENT != 0 {
        reading.insert("speed", cursor.read_u16_le()? as f64 / 100.0);
    }
    if flags & LAS_DISTANCE_PRESENT != 0 {
        reading.insert("distance", cursor.read_u24_le()? as f64 / 10.0);
    }
    if flags & LAS_LOCATION_PRESENT != 0 {
        let latitude = cursor.read_i32_le()? as f64 / COORDINATE_DIVIDER;
        let longitude = cursor.read_i32_le()? as f64 / COORDINATE_DIVIDER;
        reading.insert("position", vec![longitude, latitude]);
    }
    if flags & LAS_ELEVATION_PRESENT != 0 {
        let elevation = cursor.read_i24_le()? as f64 / 100.0;
        if reading.contains_field("position") {
            reading.push_number("position", elevation);
        } else {
            reading.insert("elevation", elevation);
        }
    }
    if flags & LAS_HEADING_PRESENT != 0 {
        reading.insert("heading", cursor.read_u16_le()? as f64 / 100.0);
    }
    if flags & LAS_ROLLING_TIME_PRESENT != 0 {
        cursor.skip(1)?;
    }
    // UTC time flag: Date/Time characteristic not interpreted

    Ok(reading)
}

// ============================================================================
// Medical-float characteristics
// ============================================================================

const TEMPERATURE_MEASUREMENT_MIN_LENGTH: usize = 5;
const TEMPERATURE_MEASUREMENT_MAX_LENGTH: usize = 13;
const TM_UNIT_FAHRENHEIT: u8 = 0x01;

/// Temperature Measurement (0x2a1c): flags byte plus a 32-bit medical
/// float in degrees Celsius; the Fahrenheit unit flag is not supported.
fn temperature_measurement(data: &[u8]) -> Result<Reading> {
    if !(TEMPERATURE_MEASUREMENT_MIN_LENGTH..=TEMPERATURE_MEASUREMENT_MAX_LENGTH)
        .contains(&data.len())
    {
        return Err(CodecError::invalid_frame_length(
            "Temperature Measurement",
            data.len(),
        ));
    }

    let flags = data[0];
    if flags & TM_UNIT_FAHRENHEIT != 0 {
        return Err(CodecError::unsupported("Fahrenheit temperature unit"));
    }

    let raw = LittleEndian::read_u32(&data[1..5]);
    let temperature = float32(raw).ok_or(CodecError::out_of_range("temperature"))?;
    if !temperature.is_finite() {
        return Err(CodecError::out_of_range("temperature"));
    }

    let mut reading = Reading::new();
    reading.insert("temperature", temperature);
    Ok(reading)
}

const CONCENTRATION_STRUCT_LENGTH: usize = 2;

/// Shared decode for the gas and particulate concentration
/// characteristics: a single 16-bit medical float.
fn concentration(data: &[u8], field: &'static str) -> Result<Reading> {
    if data.len() != CONCENTRATION_STRUCT_LENGTH {
        return Err(CodecError::invalid_frame_length("concentration", data.len()));
    }

    let raw = LittleEndian::read_u16(data);
    let value = sfloat16(raw).ok_or(CodecError::out_of_range(field))?;
    if !value.is_finite() {
        return Err(CodecError::out_of_range(field));
    }

    let mut reading = Reading::new();
    reading.insert(field, value);
    Ok(reading)
}

/// Ammonia Concentration (0x2bcf).
fn ammonia_concentration(data: &[u8]) -> Result<Reading> {
    concentration(data, "ammoniaConcentration")
}

/// Carbon Monoxide Concentration (0x2bd0).
fn carbon_monoxide_concentration(data: &[u8]) -> Result<Reading> {
    concentration(data, "carbonMonoxideConcentration")
}

/// Methane Concentration (0x2bd1).
fn methane_concentration(data: &[u8]) -> Result<Reading> {
    concentration(data, "methaneConcentration")
}

/// Nitrogen Dioxide Concentration (0x2bd2).
fn nitrogen_dioxide_concentration(data: &[u8]) -> Result<Reading> {
    concentration(data, "nitrogenDioxideConcentration")
}

/// Non-Methane Volatile Organic Compounds Concentration (0x2bd3).
fn non_methane_voc_concentration(data: &[u8]) -> Result<Reading> {
    concentration(data, "nonMethaneVolatileOrganicCompoundsConcentration")
}

/// Ozone Concentration (0x2bd4).
fn ozone_concentration(data: &[u8]) -> Result<Reading> {
    concentration(data, "ozoneConcentration")
}

/// Particulate Matter PM1 Concentration (0x2bd5).
fn pm1_concentration(data: &[u8]) -> Result<Reading> {
    concentration(data, "pm1")
}

/// Particulate Matter PM2.5 Concentration (0x2bd6).
fn pm2_5_concentration(data: &[u8]) -> Result<Reading> {
    concentration(data, "pm2.5")
}

/// Particulate Matter PM10 Concentration (0x2bd7).
fn pm10_concentration(data: &[u8]) -> Result<Reading> {
    concentration(data, "pm10")
}

/// Sulfur Dioxide Concentration (0x2bd8).
fn sulfur_dioxide_concentration(data: &[u8]) -> Result<Reading> {
    concentration(data, "sulfurDioxideConcentration")
}
