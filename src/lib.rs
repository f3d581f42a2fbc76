// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Blecodec
//!
//! Bluetooth Low Energy service data codec library.
//!
//! This library decodes raw BLE advertising service data — byte sequences
//! keyed by a service UUID — into normalized structured readings, organized
//! by format:
//! - **Eddystone** beacon frames in [`formats::eddystone`]
//! - **Exposure Notification** records in [`formats::exposure`]
//! - **GATT characteristic** encodings in [`formats::gatt`]
//! - **BTHome v2** sensor streams in [`formats::bthome`]
//! - **Minew** product frames in [`formats::minew`]
//! - **Wiliot** relay frames in [`formats::wiliot`]
//! - **Open Locate** location streams in [`formats::openlocate`]
//!
//! ## Architecture
//!
//! The library is organized into three layers:
//! - `core/` - the reading value model, error type and bounds-checked cursor
//! - `codecs/` - pure numeric codecs (fixed point, medical floats, packed
//!   coordinates) with format-specific sentinel handling
//! - `formats/` - one decoder per wire format, reached through a static
//!   UUID-keyed registry
//!
//! Decoding is synchronous, stateless and allocation-light: every call is a
//! pure function of its input bytes and UUID, failures surface as `None`
//! rather than errors or panics, and the two element-stream formats return
//! partial readings when a stream is truncated or partially unsupported.
//!
//! ## Example: decoding an Eddystone-UID frame
//!
//! ```rust
//! use blecodec::process_service_data;
//!
//! let reading =
//!     process_service_data("feaa", "00fc00112233445566778899aabbccddeeff0000").unwrap();
//! assert_eq!(reading.get("txPower").and_then(|v| v.as_f64()), Some(-4.0));
//! assert_eq!(
//!     reading.get("namespace").and_then(|v| v.as_str()),
//!     Some("00112233445566778899")
//! );
//! ```
//!
//! ## Example: decoding a BTHome sensor stream
//!
//! ```rust
//! use blecodec::process_service_data;
//!
//! let reading = process_service_data("fcd2", "4002c40903bf13").unwrap();
//! assert_eq!(reading.get("temperature").and_then(|v| v.as_f64()), Some(25.0));
//! assert_eq!(
//!     reading.get("relativeHumidity").and_then(|v| v.as_f64()),
//!     Some(50.55)
//! );
//! ```

// Core types
pub mod core;

// Re-export core types for convenience
pub use core::{ByteCursor, CodecError, Reading, ReadingValue, Result};

// Numeric codecs
pub mod codecs;

// Per-format decoders
pub mod formats;

// Input normalization
pub mod normalize;

pub use normalize::RawPayload;

// UUID-keyed dispatch
mod dispatch;

/// Minimum payload length accepted by the dispatcher.
const MIN_DATA_LENGTH_BYTES: usize = 1;

/// Process Bluetooth Low Energy advertising service data.
///
/// `uuid` is a case-insensitive hexadecimal service or characteristic
/// UUID; `data` is the raw service data as a byte buffer or a
/// case-insensitive hexadecimal string.
///
/// Returns the decoded reading, or `None` for unparsable input, an
/// unrecognized UUID, or a payload failing its format's validation. This
/// function never panics on malformed input.
pub fn process_service_data<'a>(uuid: &str, data: impl Into<RawPayload<'a>>) -> Option<Reading> {
    let payload = normalize::to_bytes(data.into())?;
    let uuid = normalize::to_uuid(uuid)?;

    if payload.len() < MIN_DATA_LENGTH_BYTES {
        return None;
    }

    let reading = dispatch::decode(&uuid, &payload);
    tracing::trace!(
        uuid = %uuid,
        payload_length = payload.len(),
        decoded = reading.is_some(),
        "processed service data"
    );
    reading
}
