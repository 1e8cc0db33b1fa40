//! Common utilities for tools: logging setup and 8-bit WAV I/O

use afsk_core::buffer::PcmBuffer;
use afsk_modem::config::SAMPLE_RATE;
use anyhow::{Context, Result};
use dasp::Sample;
use std::path::Path;
use tracing::info;

/// Log level selected by the global `--debug` / `--verbose` flags
pub fn log_level(verbose: bool, debug: bool) -> tracing::Level {
    if debug {
        tracing::Level::DEBUG
    } else if verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    }
}

/// Install the global tracing subscriber
pub fn init_logging(verbose: bool, debug: bool) {
    tracing_subscriber::fmt()
        .with_max_level(log_level(verbose, debug))
        .with_target(false)
        .init();
}

/// WAV layout for modem output: mono, 8-bit, modem sample rate
pub fn wav_spec() -> hound::WavSpec {
    hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 8,
        sample_format: hound::SampleFormat::Int,
    }
}

/// Write unsigned PCM samples as an 8-bit WAV file
pub fn write_wav_file(samples: &PcmBuffer, path: &Path) -> Result<()> {
    let spec = hound::WavSpec {
        sample_rate: samples.sample_rate(),
        ..wav_spec()
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create WAV file: {:?}", path))?;

    // hound stores 8-bit PCM from signed values
    for sample in samples.to_signed() {
        writer.write_sample(sample)?;
    }

    writer.finalize()?;
    info!("Wrote {} samples to {:?}", samples.len(), path);
    Ok(())
}

/// Read a mono 8- or 16-bit WAV file as unsigned 8-bit PCM at the modem rate
pub fn read_wav_file(path: &Path) -> Result<PcmBuffer> {
    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("Failed to open WAV file: {:?}", path))?;
    let spec = reader.spec();

    if spec.channels != 1 {
        anyhow::bail!("Expected a mono WAV file, got {} channels", spec.channels);
    }

    let samples: Vec<i8> = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Int, 8) => reader
            .samples::<i8>()
            .collect::<std::result::Result<Vec<i8>, _>>(),
        (hound::SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(|s| s.to_sample::<i8>()))
            .collect::<std::result::Result<Vec<i8>, _>>(),
        (format, bits) => {
            anyhow::bail!("Unsupported WAV sample format: {:?} {} bit", format, bits)
        }
    }
    .with_context(|| "Failed to read audio samples")?;

    let buffer = PcmBuffer::from_signed(&samples, spec.sample_rate)?;
    buffer
        .ensure_sample_rate(SAMPLE_RATE)
        .with_context(|| format!("Cannot demodulate {:?}", path))?;

    info!("Read {} samples from {:?}", buffer.len(), path);
    Ok(buffer)
}
