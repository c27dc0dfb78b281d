//! Capture tests against simulated devices

use mag_capture::{capture, send_trigger, CaptureConfig, CaptureError, StopSignal};
use mag_protocol::{Record, Sentinel};
use mag_sim::{StreamEnd, VirtualDevice};
use proptest::prelude::*;

fn records(lines: &[&str]) -> Vec<Record> {
    lines.iter().map(|l| Record::new(*l)).collect()
}

#[test]
fn triggered_device_streams_until_sentinel() {
    let mut device = VirtualDevice::new(["1,2", "3,4"]);
    let mut echoed = Vec::new();

    send_trigger(&mut device, "SendData").unwrap();
    let result = capture(
        &mut device,
        &CaptureConfig::default(),
        &mut |r: &Record| echoed.push(r.clone()),
        &StopSignal::new(),
    )
    .unwrap();

    assert_eq!(result.records, records(&["1,2", "3,4"]));
    assert_eq!(echoed, records(&["1,2", "3,4", "DataEND"]));
    assert_eq!(device.received(), b"SendData");
}

#[test]
fn records_after_sentinel_are_not_read() {
    // The sentinel is part of the table, so anything after it stays queued
    let mut device = VirtualDevice::new(["1,2", "3,4", "DataEND", "5,6"])
        .with_end(StreamEnd::Silence)
        .with_chunk_size(1)
        .pre_triggered();

    let result = capture(
        &mut device,
        &CaptureConfig::default(),
        &mut |_: &Record| {},
        &StopSignal::new(),
    )
    .unwrap();

    assert_eq!(result.records, records(&["1,2", "3,4"]));

    let mut rest = Vec::new();
    let mut buf = [0u8; 64];
    while let Ok(n) = std::io::Read::read(&mut device, &mut buf) {
        rest.extend_from_slice(&buf[..n]);
    }
    assert_eq!(rest, b"5,6\r\n");
}

#[test]
fn disconnect_mid_capture_keeps_partial_records() {
    let mut device = VirtualDevice::new(["1,2", "3,4"])
        .with_end(StreamEnd::Disconnect)
        .pre_triggered();

    let err = capture(
        &mut device,
        &CaptureConfig::default(),
        &mut |_: &Record| {},
        &StopSignal::new(),
    )
    .unwrap_err();

    assert!(matches!(err, CaptureError::Stream { .. }));
    assert_eq!(err.into_captured(), records(&["1,2", "3,4"]));
}

#[test]
fn custom_sentinel_marker() {
    let mut device = VirtualDevice::new(["10", "20"])
        .with_end(StreamEnd::Sentinel("#END#".into()))
        .pre_triggered();
    let config = CaptureConfig {
        sentinel: Sentinel::new("#END#").unwrap(),
        ..Default::default()
    };

    let result = capture(&mut device, &config, &mut |_: &Record| {}, &StopSignal::new()).unwrap();

    assert_eq!(result.records, records(&["10", "20"]));
    assert_eq!(result.sentinel.as_str(), "#END#");
}

#[test]
fn overlong_rows_are_split_not_blocked() {
    let long = "x".repeat(250);
    let mut device = VirtualDevice::new([long.as_str()]).pre_triggered();

    let result = capture(
        &mut device,
        &CaptureConfig::default(),
        &mut |_: &Record| {},
        &StopSignal::new(),
    )
    .unwrap();

    let lengths: Vec<usize> = result.records.iter().map(Record::len).collect();
    assert_eq!(lengths, vec![100, 100, 50]);
}

proptest! {
    #[test]
    fn chunking_does_not_change_records(
        rows in prop::collection::vec("[0-9a-z,.]{0,20}", 0..20),
        chunk in 1usize..32,
    ) {
        let mut device = VirtualDevice::new(rows.clone())
            .with_chunk_size(chunk)
            .pre_triggered();

        let result = capture(
            &mut device,
            &CaptureConfig::default(),
            &mut |_: &Record| {},
            &StopSignal::new(),
        )
        .unwrap();

        let expected: Vec<Record> = rows.into_iter().map(Record::new).collect();
        prop_assert_eq!(result.records, expected);
    }
}
