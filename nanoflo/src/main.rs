mod config;
mod runtime;

use clap::Parser;

#[derive(Parser)]
#[command(version, propagate_version = true)]
#[command(about = "nanoflo host daemon", long_about = None)]
struct Args {
    /// Serial device to drive the network over, e.g. /dev/ttyUSB0.
    device: Option<String>,

    /// Run an in-process network instead of opening a serial device.
    #[arg(long)]
    sim: bool,

    /// Load configuration from a TOML file; overrides defaults, overridden
    /// by the other flags.
    #[arg(short, long)]
    config: Option<String>,

    /// Baud rate for `device`.
    #[arg(short, long)]
    baud: Option<u32>,

    /// Milliseconds between network ticks.
    #[arg(long)]
    tick_millis: Option<u64>,

    /// Daemonize the service.
    #[arg(long)]
    daemon: bool,

    /// Level of verbosity.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => config::from_toml(path)?,
        None => config::NanofloConfig::default(),
    };

    if args.device.is_some() {
        cfg.device = args.device.clone();
    }
    if let Some(baud) = args.baud {
        cfg.baud = baud;
    }
    if let Some(tick_millis) = args.tick_millis {
        cfg.tick_millis = tick_millis;
    }
    cfg.global.bin_name = "nanoflo".to_string();
    cfg.global.daemon = args.daemon;

    let mut log_config = simplelog::ConfigBuilder::new();
    if args.daemon {
        log_config.set_time_level(log::LevelFilter::Off);
        log_config.set_thread_level(log::LevelFilter::Off);
        log_config.set_target_level(log::LevelFilter::Off);
    } else {
        log_config.set_time_offset_to_local().ok();
        log_config.set_time_format_rfc2822();
    }

    log_config.set_target_level(log::LevelFilter::Off);
    log_config.set_location_level(log::LevelFilter::Off);

    let log_level = if args.daemon {
        log::LevelFilter::Info
    } else {
        match args.verbose {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };

    let color_choice = if args.daemon {
        simplelog::ColorChoice::Never
    } else {
        simplelog::ColorChoice::Auto
    };

    simplelog::TermLogger::init(
        log_level,
        log_config.build(),
        simplelog::TerminalMode::Mixed,
        color_choice,
    )?;

    if args.daemon {
        log::debug!("Running service as daemon");
    }

    log::trace!("{:#?}", cfg);

    if !args.sim && cfg.device.is_none() {
        anyhow::bail!("a serial device is required unless --sim is given");
    }

    runtime::run(&cfg, args.sim)
}
