//! Send and receive `EasyTransfer` frames on a serial port.

use std::process::ExitCode;
use std::thread::sleep;
use std::time::Duration;

use clap::{Parser, Subcommand};
use easytransfer::{open, BaudRate, EasyTransfer, HexSlice};
use log::{error, info};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Parser)]
struct Args {
    #[arg(index = 1, help = "path to the serial port")]
    tty: String,
    #[arg(short, long, value_enum, default_value = "9600")]
    baud_rate: BaudRate,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Send a single frame.
    Send {
        /// Payload as hexadecimal bytes, e.g. `0102ff`.
        #[arg(value_parser = parse_hex)]
        payload: Hex,
    },
    /// Print every frame received.
    Listen {
        /// The agreed payload size in bytes.
        size: usize,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let serial_port = match open(args.tty, args.baud_rate) {
        Ok(serial_port) => serial_port,
        Err(error) => {
            error!("{error}");
            return ExitCode::FAILURE;
        }
    };

    let result = match args.command {
        Command::Send {
            payload: Hex(payload),
        } => EasyTransfer::new(serial_port, payload.len())
            .and_then(|mut codec| codec.send(&payload))
            .map(|()| info!("Sent payload: {:#04X}", HexSlice::new(&payload))),
        Command::Listen { size } => EasyTransfer::new(serial_port, size).and_then(listen),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn listen<T>(mut codec: EasyTransfer<T>) -> Result<(), easytransfer::Error>
where
    T: easytransfer::Transport,
{
    let mut payload = vec![0; codec.payload_size()];

    loop {
        if codec.receive(&mut payload)? {
            info!("Received payload: {:#04X}", HexSlice::new(&payload));
            info!("Statistics: {}", codec.statistics());
        } else {
            sleep(POLL_INTERVAL);
        }
    }
}

#[derive(Clone, Debug)]
struct Hex(Vec<u8>);

fn parse_hex(text: &str) -> Result<Hex, String> {
    if text.len() % 2 != 0 {
        return Err(format!("Odd number of hex digits: {}", text.len()));
    }

    text.as_bytes()
        .chunks(2)
        .map(|chunk| u8::from_str_radix(&String::from_utf8_lossy(chunk), 16))
        .collect::<Result<_, _>>()
        .map(Hex)
        .map_err(|error| error.to_string())
}

#[cfg(test)]
mod tests {
    use super::parse_hex;

    #[test]
    fn test_parse_hex() {
        assert_eq!(
            parse_hex("0102ff").map(|hex| hex.0),
            Ok(vec![0x01, 0x02, 0xFF])
        );
        assert!(parse_hex("zz").is_err());
    }

    #[test]
    fn test_parse_hex_rejects_odd_length() {
        assert!(parse_hex("abc").is_err());
        assert!(parse_hex("a").is_err());
    }
}
