//! Two simulated devices wired port 1 to port 2, printing the remote
//! table each one builds.
//!
//! ```text
//! cargo run -p pnlldp --example neighbor-table --features mib
//! ```

use std::error::Error;
use std::net::Ipv4Addr;
use std::sync::Arc;

use pnlldp::mib::MibView;
use pnlldp::peer::types::{autoneg, mau};
use pnlldp::peer::{LinkStatus, LldpAgent, LldpConfig, LocalPortConfig, PortNumber};
use pnlldp::transport::{CaptureTransmitter, MacAddr, ETH_HEADER_SIZE};

fn device(station: &str, last_octet: u8, ip: Ipv4Addr) -> LldpConfig {
    let link = LinkStatus {
        autoneg_supported: true,
        autoneg_enabled: true,
        advertised_capabilities: autoneg::CAP_100BASE_TX_HALF_DUPLEX
            | autoneg::CAP_100BASE_TX_FULL_DUPLEX,
        operational_mau_type: mau::COPPER_100BASE_TX_FULL_DUPLEX,
    };
    LldpConfig::new(station, MacAddr([0x02, 0, 0, 0, 0, last_octet]))
        .with_ip_address(ip)
        .with_port(LocalPortConfig::new("port-001").with_link_status(link))
        .with_port(LocalPortConfig::new("port-002").with_link_status(link))
}

/// Deliver every captured frame from `from` to the port it is cabled to.
fn deliver(
    from: &CaptureTransmitter,
    to: &LldpAgent,
    cable: &[(u16, u16)],
) -> Result<(), Box<dyn Error>> {
    for (port, frame) in from.take() {
        let Some(&(_, remote)) = cable.iter().find(|(local, _)| *local == port) else {
            continue;
        };
        to.recv(PortNumber::try_from(remote)?, frame, ETH_HEADER_SIZE)?;
    }
    Ok(())
}

fn print_table(name: &str, agent: &LldpAgent) {
    println!("{name}:");
    for entry in MibView::new(agent).remote_table() {
        println!(
            "  port {} <- {} ({}), mau {}, time mark {}",
            entry.port,
            entry.station_name,
            entry.port_id.to_string_lossy(),
            entry.link_status.oper_mau_type,
            entry.time_mark,
        );
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let wire_a = Arc::new(CaptureTransmitter::with_port_count(2));
    let wire_b = Arc::new(CaptureTransmitter::with_port_count(2));
    let plc = LldpAgent::new(
        device("plc", 0x01, Ipv4Addr::new(192, 168, 0, 1)),
        wire_a.clone(),
    )?;
    let io = LldpAgent::new(
        device("io-device", 0x02, Ipv4Addr::new(192, 168, 0, 2)),
        wire_b.clone(),
    )?;

    plc.start();
    io.start();
    deliver(&wire_a, &io, &[(1, 2)])?;
    deliver(&wire_b, &plc, &[(2, 1)])?;

    print_table("plc", &plc);
    print_table("io-device", &io);
    Ok(())
}
