//! Offline decoder for a captured nanoflo wire stream: reads raw bytes,
//! finds the handshake, then prints every command that follows it, one
//! per line. Read-only — never builds a `Network`.

use std::io::Read;

use clap::Parser;
use nanoflo_proto::{GraphCmd, CMD_SIZE, MAGIC};

#[derive(Parser)]
#[command(version, propagate_version = true)]
#[command(about = "Decode a captured nanoflo wire stream", long_about = None)]
struct Args {
    /// File to read; omit to read from stdin.
    file: Option<String>,

    /// Print commands seen before the handshake magic too, instead of
    /// discarding them as noise.
    #[arg(long)]
    include_preamble: bool,

    /// Level of verbosity.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    simplelog::TermLogger::init(
        log_level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    let mut bytes = Vec::new();
    match &args.file {
        Some(path) => {
            std::fs::File::open(path)?.read_to_end(&mut bytes)?;
        }
        None => {
            std::io::stdin().read_to_end(&mut bytes)?;
        }
    }

    let body = match find_magic(&bytes) {
        Some(offset) => {
            println!("{:08x}  CommunicationOpen", offset);
            &bytes[offset + MAGIC.len()..]
        }
        None => {
            log::warn!("no handshake magic found in input");
            &bytes[..]
        }
    };

    for (i, chunk) in body.chunks(CMD_SIZE).enumerate() {
        if chunk.len() < CMD_SIZE {
            log::warn!("{} trailing byte(s) after the last whole command, dropped", chunk.len());
            break;
        }
        let cmd = GraphCmd::from_byte(chunk[0]);
        println!("{:08x}  {:?}  {:?}", i * CMD_SIZE, cmd, &chunk[1..]);
    }

    Ok(())
}

/// Find the first occurrence of the handshake magic, reporting the offset
/// of the byte right after it. Bytes before it are preamble noise, exactly
/// as `HostCommunication`'s own parser treats them.
fn find_magic(bytes: &[u8]) -> Option<usize> {
    bytes
        .windows(MAGIC.len())
        .position(|w| w == MAGIC)
        .map(|pos| pos + MAGIC.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_magic_after_noise() {
        let mut stream = vec![0xffu8, 0x00, 0x01];
        stream.extend_from_slice(&MAGIC);
        stream.extend_from_slice(&[GraphCmd::Ping as u8, 0, 0, 0, 0, 0, 0, 0]);
        let offset = find_magic(&stream).unwrap();
        assert_eq!(
            &stream[offset..offset + CMD_SIZE],
            &[GraphCmd::Ping as u8, 0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn returns_none_without_magic() {
        assert_eq!(find_magic(&[1, 2, 3]), None);
    }
}
