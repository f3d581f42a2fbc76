// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! UUID-keyed decoder dispatch.
//!
//! The service registry maps each supported service UUID to its decoder
//! entry point. It is resolved once at startup and immutable thereafter;
//! lookups never rebuild it. UUIDs not in the registry fall through to
//! the GATT characteristic table, which performs its own secondary
//! dispatch.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::core::Reading;
use crate::formats;

type ServiceDecoder = fn(&[u8]) -> Option<Reading>;

/// Hex-string length of a 16-bit characteristic UUID.
const CHARACTERISTIC_UUID_LENGTH: usize = 4;

/// Service decoder registry, resolved once at startup.
static SERVICE_REGISTRY: LazyLock<HashMap<&'static str, ServiceDecoder>> = LazyLock::new(|| {
    let entries: [(&'static str, ServiceDecoder); 6] = [
        ("fcd2", formats::bthome::process),
        ("fd40", formats::openlocate::process),
        ("fd6f", formats::exposure::process),
        ("fdaf", formats::wiliot::process),
        ("feaa", formats::eddystone::process),
        ("ffe1", formats::minew::process),
    ];
    HashMap::from(entries)
});

/// Decode a normalized payload by its normalized UUID.
///
/// An unknown UUID is a failure (`None`), not an error.
pub(crate) fn decode(uuid: &str, data: &[u8]) -> Option<Reading> {
    if let Some(decoder) = SERVICE_REGISTRY.get(uuid) {
        return decoder(data);
    }

    if uuid.len() == CHARACTERISTIC_UUID_LENGTH {
        return formats::gatt::process(uuid, data);
    }

    None
}
