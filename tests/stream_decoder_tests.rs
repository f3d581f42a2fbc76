// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Stream decoder properties: partial results, loop termination and
//! per-field merge rules for the two element-stream formats.

use blecodec::process_service_data;

// ============================================================================
// BTHome element stream
// ============================================================================

#[test]
fn test_bthome_incompatible_version_returns_none() {
    // Version bits 0b001 instead of 0b010
    assert!(process_service_data("fcd2", "2002c409").is_none());
}

#[test]
fn test_bthome_encryption_flag_returns_none() {
    assert!(process_service_data("fcd2", "4102c409").is_none());
}

#[test]
fn test_bthome_unknown_type_keeps_preceding_fields() {
    // One well-formed temperature element, then unknown type 0x99
    let reading = process_service_data("fcd2", "4002c40999bf13").unwrap();

    assert_eq!(
        reading.get("temperature").and_then(|v| v.as_f64()),
        Some(25.0)
    );
    assert!(reading.get("relativeHumidity").is_none());
    assert!(reading.contains_field("uri"));
}

#[test]
fn test_bthome_truncated_element_keeps_preceding_fields() {
    let reading = process_service_data("fcd2", "4002c40903bf").unwrap();

    assert_eq!(
        reading.get("temperature").and_then(|v| v.as_f64()),
        Some(25.0)
    );
    assert!(reading.get("relativeHumidity").is_none());
}

#[test]
fn test_bthome_repeated_temperature_collects_into_list() {
    let reading = process_service_data("fcd2", "4002ca0945110157ea58ea").unwrap();

    // The scalar is replaced by the plural list on the second occurrence
    assert!(reading.get("temperature").is_none());
    assert_eq!(
        reading.get("temperatures").and_then(|v| v.as_numbers()),
        Some(&[25.06, 27.3, -22.0, -7.699999999999999][..])
    );
}

#[test]
fn test_bthome_acceleration_always_list_wrapped() {
    let single = process_service_data("fcd2", "40518756").unwrap();
    assert_eq!(
        single.get("acceleration").and_then(|v| v.as_numbers()),
        Some(&[2.258773383367409][..])
    );

    let triple = process_service_data("fcd2", "40518756518756518756").unwrap();
    assert_eq!(
        triple
            .get("acceleration")
            .and_then(|v| v.as_numbers())
            .map(|v| v.len()),
        Some(3)
    );
}

#[test]
fn test_bthome_repeated_detection_flags_append() {
    // Two opening elements: contact detected, then not detected
    let reading = process_service_data("fcd2", "4011001101").unwrap();

    assert_eq!(
        reading.get("isContactDetected").and_then(|v| v.as_bools()),
        Some(&[true, false][..])
    );
}

#[test]
fn test_bthome_repeated_scalar_overwrites() {
    // Two battery elements: last write wins
    let reading = process_service_data("fcd2", "4001610132").unwrap();

    assert_eq!(
        reading.get("batteryPercentage").and_then(|v| v.as_f64()),
        Some(50.0)
    );
}

// ============================================================================
// Open Locate element stream
// ============================================================================

#[test]
fn test_open_locate_overrunning_element_keeps_parsed_elements() {
    // Properties element, then a geolocation leading byte declaring 16
    // bytes with only 2 remaining
    let reading = process_service_data("fd40", "094002ce00300102").unwrap();

    assert_eq!(reading.get("txPower").and_then(|v| v.as_f64()), Some(-50.0));
    assert!(reading.get("position").is_none());
}

#[test]
fn test_open_locate_default_vendor_uri_attached() {
    let reading = process_service_data("fd40", "094002ce00").unwrap();

    assert_eq!(
        reading.get("uri").and_then(|v| v.as_str()),
        Some("https://sniffypedia.org/Organization/Hewlett_Packard_Enterprise_Company/")
    );
}

#[test]
fn test_open_locate_url_element_suppresses_default_uri() {
    // Single URL element: https:// + "hpe" + .com
    let reading = process_service_data("fd40", "0940850368706507").unwrap();

    assert_eq!(
        reading.get("uri").and_then(|v| v.as_str()),
        Some("https://hpe.com")
    );
}

#[test]
fn test_open_locate_identities_append_across_elements() {
    // Two identity elements, each carrying a MAC address
    let reading =
        process_service_data("fd40", "09406701001122334455670100aabbccddee").unwrap();

    assert_eq!(
        reading.get("deviceIds").and_then(|v| v.as_texts()),
        Some(&["001122334455/2".to_string(), "00aabbccddee/2".to_string()][..])
    );
}

#[test]
fn test_open_locate_failed_element_is_skipped() {
    // A geolocation element with a bad datum fails alone; the trailing
    // properties element still decodes
    let reading = process_service_data(
        "fd40",
        "0940304c4ad6a705470c0ad9ae20000004004202ce00",
    )
    .unwrap();

    assert!(reading.get("position").is_none());
    assert_eq!(reading.get("txPower").and_then(|v| v.as_f64()), Some(-50.0));
}
