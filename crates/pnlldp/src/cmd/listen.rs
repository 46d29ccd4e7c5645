use crate::cmd::ListenArgs;
use crate::exit::CliResult;
use crate::output::OutputFormat;

#[cfg(target_os = "linux")]
pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    linux::run(args, format)
}

#[cfg(not(target_os = "linux"))]
pub fn run(_args: ListenArgs, _format: OutputFormat) -> CliResult<i32> {
    Err(crate::exit::CliError::new(
        crate::exit::USAGE,
        "listen needs AF_PACKET sockets and is only available on Linux",
    ))
}

#[cfg(target_os = "linux")]
mod linux {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::mpsc::{self, RecvTimeoutError};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use bytes::Bytes;
    use pnlldp_peer::{LldpAgent, LldpQuery, PortNumber, RecvOutcome};
    use pnlldp_transport::{ethernet_payload, InterfaceTransmitter, MacAddr, PacketSocket};
    use serde::Serialize;
    use tracing::{debug, warn};

    use crate::cmd::{load_config, ListenArgs};
    use crate::exit::{
        lldp_error, transport_error, CliError, CliResult, INTERNAL, SUCCESS, USAGE,
    };
    use crate::output::{
        format_management_address, print_json, print_pretty, print_raw, print_table, OutputFormat,
    };

    const READ_TIMEOUT: Duration = Duration::from_millis(200);
    const TICK: Duration = Duration::from_millis(100);
    const MAX_FRAME: usize = 1522;

    #[derive(Serialize)]
    struct NeighborEvent {
        port: u16,
        station_name: String,
        port_id: String,
        management_address: String,
        ttl_secs: u16,
    }

    pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
        let mut config = load_config(&args.config)?;

        let mut sockets = Vec::with_capacity(config.ports.len());
        for (index, port) in config.ports.iter_mut().enumerate() {
            let interface = port.interface.clone().ok_or_else(|| {
                CliError::new(USAGE, format!("port {} has no interface", index + 1))
            })?;
            let socket = PacketSocket::open(&interface)
                .map_err(|err| transport_error("open failed", err))?;
            socket
                .set_read_timeout(READ_TIMEOUT)
                .map_err(|err| transport_error("socket setup failed", err))?;
            port.mac_address.get_or_insert(socket.mac());
            sockets.push(Arc::new(socket));
        }

        let transmitter = Arc::new(InterfaceTransmitter::new(sockets.clone()));
        let agent = Arc::new(
            LldpAgent::new(config, transmitter)
                .map_err(|err| lldp_error("config rejected", err))?,
        );

        let running = Arc::new(AtomicBool::new(true));
        install_ctrlc_handler(running.clone())?;

        let (changes, changed) = mpsc::channel();
        let mut receivers = Vec::with_capacity(sockets.len());
        for (port, socket) in agent.ports().zip(sockets) {
            let agent = agent.clone();
            let running = running.clone();
            let changes = changes.clone();
            receivers.push(thread::spawn(move || {
                receive_loop(&agent, port, &socket, &running, &changes)
            }));
        }
        drop(changes);

        agent.start();
        let mut printed = 0usize;
        while running.load(Ordering::SeqCst) {
            agent.poll_tx();
            match changed.recv_timeout(TICK) {
                Ok(port) => {
                    print_neighbor(agent.as_ref(), port, format);
                    printed = printed.saturating_add(1);
                    if args.count.is_some_and(|count| printed >= count) {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        running.store(false, Ordering::SeqCst);
        for receiver in receivers {
            if receiver.join().is_err() {
                return Err(CliError::new(INTERNAL, "receive thread panicked"));
            }
        }
        Ok(SUCCESS)
    }

    fn receive_loop(
        agent: &LldpAgent,
        port: PortNumber,
        socket: &PacketSocket,
        running: &AtomicBool,
        changes: &mpsc::Sender<PortNumber>,
    ) {
        let own_mac = agent.config().source_mac(port).ok();
        let mut buf = vec![0u8; MAX_FRAME];
        while running.load(Ordering::SeqCst) {
            let len = match socket.recv(&mut buf) {
                Ok(Some(len)) => len,
                Ok(None) => continue,
                Err(err) => {
                    warn!(%port, error = %err, "receive failed");
                    continue;
                }
            };
            let frame = &buf[..len];
            if frame.get(6..12).and_then(MacAddr::from_slice) == own_mac {
                continue;
            }
            let Some(offset) = ethernet_payload(frame) else {
                continue;
            };
            match agent.recv(port, Bytes::copy_from_slice(frame), offset) {
                Ok(RecvOutcome::HandledValid { changed: true, .. }) => {
                    if changes.send(port).is_err() {
                        return;
                    }
                }
                Ok(RecvOutcome::HandledMalformed { reason, .. }) => {
                    debug!(%port, %reason, "ignored malformed LLDPDU");
                }
                Ok(_) => {}
                Err(err) => warn!(%port, error = %err, "LLDP receive failed"),
            }
        }
    }

    fn print_neighbor(agent: &LldpAgent, port: PortNumber, format: OutputFormat) {
        let Ok((info, _)) = agent.peer_snapshot(port) else {
            return;
        };
        let event = NeighborEvent {
            port: port.get(),
            station_name: info.station_name,
            port_id: info.port_id.to_string_lossy().into_owned(),
            management_address: format_management_address(&info.management_address),
            ttl_secs: info.ttl_secs,
        };
        match format {
            OutputFormat::Json => print_json(&event),
            OutputFormat::Pretty => print_pretty(&event),
            OutputFormat::Table => print_table(
                vec!["PORT", "STATION", "PEER PORT", "MGMT ADDRESS", "TTL"],
                vec![vec![
                    event.port.to_string(),
                    event.station_name,
                    event.port_id,
                    event.management_address,
                    event.ttl_secs.to_string(),
                ]],
            ),
            OutputFormat::Raw => print_raw(event.station_name.as_bytes()),
        }
    }

    fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
        ctrlc::set_handler(move || {
            running.store(false, Ordering::SeqCst);
        })
        .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
    }
}
