//! afsk - send and receive APRS packets as 1200 baud AFSK audio

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use afsk_modem::config::{
    BAUD_RATE, FLAG, HIGH_TONE_HZ, IDLE, LOW_TONE_HZ, MIN_FRAME_LEN, SAMPLES_PER_BIT, SAMPLE_RATE,
};
use afsk_tools::{
    init_logging, read_wav_file, selftest, write_wav_file, Receiver, RxArgs, SelftestArgs,
    Transmitter, TxArgs,
};

/// AX.25/APRS over 1200 baud AFSK
#[derive(Parser)]
#[command(name = "afsk")]
#[command(about = "AX.25/APRS packets over 1200 baud AFSK audio")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode and modulate a packet into a WAV file
    Tx(TxArgs),
    /// Demodulate and decode a packet from a WAV file
    Rx(RxArgs),
    /// Round-trip a packet through codec and modem at every bit phase
    Selftest(SelftestArgs),
    /// Show modem parameters
    Info,
}

fn show_info() {
    println!("\n=== AFSK Modem ===");
    println!("  Baud rate:       {} Bd", BAUD_RATE);
    println!("  Sample rate:     {} Hz, 8-bit unsigned mono", SAMPLE_RATE);
    println!("  Samples per bit: {}", SAMPLES_PER_BIT);
    println!(
        "  Tones:           {} Hz / {} Hz (NRZI)",
        LOW_TONE_HZ, HIGH_TONE_HZ
    );

    println!("\n=== Framing ===");
    println!(
        "  Flag {:#04x}, idle {:#04x}, HDLC bit stuffing",
        FLAG, IDLE
    );
    println!(
        "  AX.25 UI frames, CRC-16-CCITT, min {} bytes",
        MIN_FRAME_LEN
    );

    println!("\n=== Example Usage ===");
    println!("  Transmit: afsk tx -o out.wav -c N0CALL -s 9 -p WIDE1-1 -m \">Hello\"");
    println!("  Receive:  afsk rx -i out.wav");
    println!("  Selftest: afsk selftest -c N0CALL -m \">Hello\"");
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.debug);

    match cli.command {
        Commands::Tx(args) => {
            let station = args.station()?;
            info!("Transmitting as {}-{}", station.callsign, station.ssid);

            let transmitter = Transmitter::new(station)?;
            let samples = transmitter.transmit(args.message.as_bytes())?;
            write_wav_file(&samples, &args.output)?;

            println!(
                "✓ Transmission complete: {} samples written to {:?}",
                samples.len(),
                args.output
            );
        }

        Commands::Rx(args) => {
            info!("Starting reception from {:?}", args.input);

            let samples = read_wav_file(&args.input)?;
            let reception = Receiver::new(!args.no_fcs_check).receive(samples.data())?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&reception)?);
            } else {
                println!("✓ {}", reception);
            }
        }

        Commands::Selftest(args) => {
            let report = selftest::run(&args)?;
            println!("{}", report);
            if !report.success() {
                anyhow::bail!("Self test failed");
            }
        }

        Commands::Info => show_info(),
    }

    Ok(())
}
