use std::path::Path;
use std::time::Duration;

use nanoflo_core::{ComponentLibrary, Network};
use nanoflo_proto::{GraphCmd, HostCommunication, HostTransport, LoopbackTransport};
use nanoflo_serial::{BaudRate, Uart};

use crate::config::NanofloConfig;

/// Build the component library every nanoflo daemon starts with.
fn component_library() -> ComponentLibrary {
    let mut library = ComponentLibrary::new();
    nanoflo_components::register_all(&mut library);
    library
}

/// Entry point shared by both transports: open (or simulate) the device,
/// then hand off to the scheduler loop.
pub fn run(config: &NanofloConfig, sim: bool) -> anyhow::Result<()> {
    let library = component_library();
    let tick = Duration::from_millis(config.tick_millis);

    if sim {
        log::info!("Running in simulation mode (in-process loopback transport)");
        let (hc, notifier) = HostCommunication::new(LoopbackTransport::new());
        let network = Network::with_notification_handler(Box::new(notifier));
        drive_loop(hc, network, library, tick)
    } else {
        let device = config
            .device
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("no serial device configured; pass a path or --sim"))?;
        log::info!("Opening serial device {device} at {} baud", config.baud);
        let uart = Uart::open(Path::new(device), BaudRate::BaudOther(config.baud))?;
        let (hc, notifier) = HostCommunication::new(uart);
        let network = Network::with_notification_handler(Box::new(notifier));
        drive_loop(hc, network, library, tick)
    }
}

/// The cooperative scheduler loop: drain whatever bytes the transport has,
/// dispatching any commands they complete, then tick the network. Runs
/// until the process is killed — graph reset is the only in-protocol
/// cancellation primitive, there is no clean-shutdown command.
fn drive_loop<T: HostTransport>(
    mut hc: HostCommunication<T>,
    mut network: Network,
    library: ComponentLibrary,
    tick: Duration,
) -> anyhow::Result<()> {
    loop {
        hc.poll(&mut network, &library);
        network.run_tick();
        std::thread::sleep(tick);
    }
}

/// Print every command a [`LoopbackTransport`] sent, decoded, for `--sim`
/// runs that want to see the protocol traffic a real host would receive.
#[allow(dead_code)]
fn log_sent(transport: &LoopbackTransport) {
    for cmd in &transport.sent {
        log::debug!("-> {:?} {:?}", GraphCmd::from_byte(cmd[0]), &cmd[1..]);
    }
}
