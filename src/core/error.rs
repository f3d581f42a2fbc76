// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for blecodec.
//!
//! Provides failure values for service data decoding:
//! - Buffer and frame length validation
//! - Discriminator lookup (UUID, frame type, element tag)
//! - Out-of-range and sentinel-encoded values
//!
//! Decode failures are ordinary values: they are returned, converted to
//! `None` at the public API boundary, and never panicked or logged by the
//! decoders themselves.

use thiserror::Error;

/// Errors that can occur while decoding a service data payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Read past the end of the payload or element buffer
    #[error(
        "buffer too short: requested {requested} bytes at offset {offset}, \
         but only {available} available"
    )]
    BufferTooShort {
        /// Requested bytes
        requested: usize,
        /// Available bytes
        available: usize,
        /// Cursor position when the read was attempted
        offset: usize,
    },

    /// Payload length outside the format's exact or bounded requirement
    #[error("invalid length {actual} for {frame} frame")]
    InvalidFrameLength {
        /// Frame or structure being decoded
        frame: &'static str,
        /// Actual payload length in bytes
        actual: usize,
    },

    /// Unrecognized discriminator byte (frame type, product model, subtype)
    #[error("unknown {context} 0x{value:02x}")]
    UnknownDiscriminator {
        /// What kind of discriminator was read
        context: &'static str,
        /// The unrecognized value
        value: u8,
    },

    /// Decoded value is a sentinel or physically impossible
    #[error("value out of range for field '{field}'")]
    ValueOutOfRange {
        /// Field whose value was rejected
        field: &'static str,
    },

    /// Frame version not supported by this decoder
    #[error("unsupported {context} version {version}")]
    UnsupportedVersion {
        /// Frame or header carrying the version
        context: &'static str,
        /// The declared version
        version: u8,
    },

    /// Payload is encrypted; decryption is out of scope
    #[error("encrypted payload for {context} is not supported")]
    EncryptedPayload {
        /// Format declaring the encryption flag
        context: &'static str,
    },

    /// Declared variant or unit is not supported
    #[error("unsupported feature: {feature}")]
    Unsupported {
        /// What is not supported
        feature: &'static str,
    },
}

impl CodecError {
    /// Create a buffer too short error.
    pub fn buffer_too_short(requested: usize, available: usize, offset: usize) -> Self {
        CodecError::BufferTooShort {
            requested,
            available,
            offset,
        }
    }

    /// Create an invalid frame length error.
    pub fn invalid_frame_length(frame: &'static str, actual: usize) -> Self {
        CodecError::InvalidFrameLength { frame, actual }
    }

    /// Create an unknown discriminator error.
    pub fn unknown_discriminator(context: &'static str, value: u8) -> Self {
        CodecError::UnknownDiscriminator { context, value }
    }

    /// Create a value out of range error.
    pub fn out_of_range(field: &'static str) -> Self {
        CodecError::ValueOutOfRange { field }
    }

    /// Create an unsupported version error.
    pub fn unsupported_version(context: &'static str, version: u8) -> Self {
        CodecError::UnsupportedVersion { context, version }
    }

    /// Create an encrypted payload error.
    pub fn encrypted(context: &'static str) -> Self {
        CodecError::EncryptedPayload { context }
    }

    /// Create an unsupported feature error.
    pub fn unsupported(feature: &'static str) -> Self {
        CodecError::Unsupported { feature }
    }
}

/// Result type for blecodec decode operations.
pub type Result<T> = std::result::Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_too_short() {
        let err = CodecError::buffer_too_short(4, 2, 10);
        assert!(matches!(err, CodecError::BufferTooShort { .. }));
        assert_eq!(
            err.to_string(),
            "buffer too short: requested 4 bytes at offset 10, but only 2 available"
        );
    }

    #[test]
    fn test_invalid_frame_length() {
        let err = CodecError::invalid_frame_length("Eddystone-UID", 19);
        assert_eq!(err.to_string(), "invalid length 19 for Eddystone-UID frame");
    }

    #[test]
    fn test_unknown_discriminator() {
        let err = CodecError::unknown_discriminator("frame type", 0x30);
        assert_eq!(err.to_string(), "unknown frame type 0x30");
    }

    #[test]
    fn test_out_of_range() {
        let err = CodecError::out_of_range("temperature");
        assert_eq!(
            err.to_string(),
            "value out of range for field 'temperature'"
        );
    }

    #[test]
    fn test_unsupported_version() {
        let err = CodecError::unsupported_version("TLM", 1);
        assert_eq!(err.to_string(), "unsupported TLM version 1");
    }

    #[test]
    fn test_encrypted() {
        let err = CodecError::encrypted("BTHome");
        assert_eq!(
            err.to_string(),
            "encrypted payload for BTHome is not supported"
        );
    }

    #[test]
    fn test_unsupported() {
        let err = CodecError::unsupported("Fahrenheit unit");
        assert_eq!(err.to_string(), "unsupported feature: Fahrenheit unit");
    }

    #[test]
    fn test_error_clone_eq() {
        let err = CodecError::out_of_range("pressure");
        assert_eq!(err, err.clone());
    }
}
