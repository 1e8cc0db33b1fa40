use afsk_frame::prelude::*;
use afsk_modem::config::SAMPLES_PER_BIT;
use afsk_modem::{demodulate, modulate};
use afsk_tools::{read_wav_file, write_wav_file, Receiver, StationConfig, Transmitter};
use quickcheck_macros::quickcheck;
use tempfile::NamedTempFile;

#[test]
fn test_pirate_round_trip() {
    let octets = encode_frame("PIRATE", 1, b">HELLO").expect("Failed to encode frame");
    let samples = modulate(&octets, 8, 3).expect("Failed to modulate");

    let recovered = demodulate(samples.data()).expect("Failed to demodulate");
    assert_eq!(recovered, octets, "Modem round-trip changed the frame");

    let packet = decode_frame(&recovered).expect("Failed to decode frame");
    assert_eq!(packet.callsign(), "PIRATE");
    assert_eq!(packet.ssid(), 1);
    assert_eq!(packet.payload, b">HELLO");
}

#[test]
fn test_tx_wav_rx() {
    let station = StationConfig {
        callsign: "S56SPZ".to_string(),
        ssid: 7,
        path: vec!["WIDE1-1".to_string(), "WIDE2-1".to_string()],
        ..StationConfig::default()
    };
    let message = b"!4603.63N/01430.55E-Test from the workbench";

    let samples = Transmitter::new(station)
        .expect("Failed to create transmitter")
        .transmit(message)
        .expect("Failed to transmit");

    let file = NamedTempFile::new().expect("Failed to create temp file");
    write_wav_file(&samples, file.path()).expect("Failed to write WAV");
    let restored = read_wav_file(file.path()).expect("Failed to read WAV");
    assert_eq!(restored, samples, "WAV round-trip changed the samples");

    let reception = Receiver::new(true)
        .receive(restored.data())
        .expect("Failed to receive");
    assert_eq!(
        reception.to_string(),
        "S56SPZ-7>WIDE1-1,WIDE2-1: !4603.63N/01430.55E-Test from the workbench"
    );
}

#[test]
fn test_truncated_lead_in() {
    let octets = encode_frame("N0CALL", 0, b"truncated lead-in").unwrap();
    let samples = modulate(&octets, 1, 1).unwrap();

    for cut in 0..SAMPLES_PER_BIT {
        let recovered = demodulate(&samples.data()[cut..]).expect("Failed to demodulate");
        assert_eq!(recovered, octets, "cut {}", cut);
    }
}

#[test]
fn test_stuffing_heavy_payload() {
    let payload = vec![0xFF; 64];
    let octets = encode_frame("N0CALL", 15, &payload).unwrap();
    let samples = modulate(&octets, 8, 3).unwrap();

    let packet = decode_frame(&demodulate(samples.data()).unwrap()).unwrap();
    assert_eq!(packet.payload, payload);
    assert_eq!(packet.ssid(), 15);
}

#[quickcheck]
fn prop_packet_survives_the_air(ssid: u8, payload: Vec<u8>, cut: u8) -> bool {
    let octets = encode_frame("QC0TST", ssid, &payload).unwrap();
    let samples = modulate(&octets, 2, 1).unwrap();
    let cut = usize::from(cut) % SAMPLES_PER_BIT;

    demodulate(&samples.data()[cut..])
        .ok()
        .and_then(|octets| decode_frame(&octets).ok())
        .is_some_and(|packet| packet.ssid() == ssid & 0x0F && packet.payload == payload)
}
