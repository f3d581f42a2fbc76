// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Signed 8.8 fixed-point decoding.
//!
//! Several sensor formats (Eddystone-TLM temperature, Minew temperature,
//! humidity and acceleration axes) encode physical quantities as a signed
//! integer byte followed by an unsigned fraction byte in 1/256 units.

/// Decode a signed 8.8 fixed-point value from its integer and fraction
/// bytes.
///
/// The integer byte is two's complement; the fraction byte contributes
/// `fraction / 256`, so the value range is [-128.0, 127.996] with a
/// resolution of 1/256.
pub fn signed_8_8(integer: u8, fraction: u8) -> f64 {
    (integer as i8) as f64 + (fraction as f64) / 256.0
}
