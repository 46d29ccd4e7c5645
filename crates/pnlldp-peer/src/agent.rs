use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use bytes::Bytes;
use pnlldp_transport::PortTransmitter;
use tracing::{debug, info, warn};

use crate::alarm::{AlarmSink, NoAlarms};
use crate::alias::generate_alias_name;
use crate::builder::build_frame;
use crate::clock::{Clock, UptimeClock};
use crate::config::LldpConfig;
use crate::error::{LldpError, Result};
use crate::parser::{parse_lldpdu, starts_with_lldp, RecvOutcome};
use crate::ports::{PortIter, PortNumber};
use crate::query::LldpQuery;
use crate::scheduler::TxSchedule;
use crate::store::{PeerInfo, PeerPortRecord, PeerStore};
use crate::types::{
    ChassisId, LinkStatus, LocalPortState, ManagementAddress, ManagementPortIndex,
    PortDescription, PortId, SignalDelay, SystemCapabilities,
};

/// Alias buffer size used when the caller does not bring its own.
pub const DEFAULT_ALIAS_CAPACITY: usize = 256;

/// LLDP agent for one device with `N` local ports.
///
/// Owns the per-port local state and neighbor records. Frames go out
/// through a [`PortTransmitter`] and come in through [`recv`](Self::recv).
/// All methods take `&self`; the agent can be shared across threads.
pub struct LldpAgent {
    config: LldpConfig,
    local: Vec<Mutex<LocalPortState>>,
    store: PeerStore,
    schedule: Mutex<TxSchedule>,
    transmitter: Arc<dyn PortTransmitter>,
    alarms: Arc<dyn AlarmSink>,
    clock: Arc<dyn Clock>,
}

impl LldpAgent {
    /// Create an agent for a validated configuration. Nothing is sent yet.
    pub fn new(config: LldpConfig, transmitter: Arc<dyn PortTransmitter>) -> Result<Self> {
        config.validate()?;
        let local = config
            .ports
            .iter()
            .map(|port| {
                Mutex::new(LocalPortState {
                    link_status: port.link_status,
                    signal_delays: port.signal_delays,
                })
            })
            .collect();
        let store = PeerStore::new(config.port_count());
        let schedule = Mutex::new(TxSchedule::new(config.tx_interval()));

        debug!(
            station = %config.station_name,
            ports = config.port_count(),
            "LLDP agent created"
        );
        Ok(Self {
            config,
            local,
            store,
            schedule,
            transmitter,
            alarms: Arc::new(NoAlarms),
            clock: Arc::new(UptimeClock::new()),
        })
    }

    pub fn with_alarm_sink(mut self, alarms: Arc<dyn AlarmSink>) -> Self {
        self.alarms = alarms;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &LldpConfig {
        &self.config
    }

    pub fn port_count(&self) -> u16 {
        self.config.port_count()
    }

    pub fn ports(&self) -> PortIter {
        self.config.ports()
    }

    /// Look up a port by number, checking it exists.
    pub fn port(&self, port: u16) -> Result<PortNumber> {
        let port = PortNumber::try_from(port)?;
        self.check_port(port)?;
        Ok(port)
    }

    pub fn tx_interval(&self) -> Duration {
        self.lock_schedule().interval()
    }

    /// Frames handed to the transmitter since creation.
    pub fn frames_sent(&self) -> u64 {
        self.lock_schedule().sent()
    }

    /// Send on every port now and arm the transmit timer.
    pub fn start(&self) -> usize {
        let sent = self.send_all();
        self.lock_schedule().restart(self.clock.now_10ms());
        sent
    }

    /// Build and send an LLDPDU on every port. Returns how many went out.
    ///
    /// A port that fails is logged and skipped; the next tick retries it.
    pub fn send_all(&self) -> usize {
        let mut sent = 0;
        for port in self.ports() {
            match self.send_port(port) {
                Ok(()) => sent += 1,
                Err(err) => warn!(%port, error = %err, "LLDP transmit failed"),
            }
        }
        sent
    }

    /// Build and send an LLDPDU on one port.
    pub fn send_port(&self, port: PortNumber) -> Result<()> {
        let state = self.local_state(port)?;
        let frame = build_frame(&self.config, port, &state)?;
        let len = frame.len();
        self.transmitter.transmit(port.get(), frame)?;
        let total = self.lock_schedule().record_sent();
        debug!(%port, len, total, "LLDP frame sent");
        Ok(())
    }

    /// Re-arm the transmit timer, sending on all ports first if `send_now`.
    pub fn tx_restart(&self, send_now: bool) {
        if send_now {
            self.send_all();
        }
        self.lock_schedule().restart(self.clock.now_10ms());
    }

    /// Timer expiry: send on all ports and re-arm.
    pub fn on_timer_elapsed(&self) -> usize {
        let sent = self.send_all();
        self.lock_schedule().restart(self.clock.now_10ms());
        sent
    }

    /// Run the timer from a polling loop. Returns true when frames were due.
    pub fn poll_tx(&self) -> bool {
        let due = self.lock_schedule().is_due(self.clock.now_10ms());
        if due {
            self.on_timer_elapsed();
        }
        due
    }

    /// Hand a received frame to the agent.
    ///
    /// `offset` is where the LLDPDU starts (past the Ethernet header).
    /// Frames that do not start with a Chassis ID TLV are returned
    /// untouched in [`RecvOutcome::NotLldp`].
    pub fn recv(&self, port: PortNumber, frame: Bytes, offset: usize) -> Result<RecvOutcome> {
        self.check_port(port)?;
        if !starts_with_lldp(&frame, offset) {
            return Ok(RecvOutcome::NotLldp { frame });
        }

        let info = match parse_lldpdu(&frame, offset) {
            Ok(info) => info,
            Err(reason) => {
                debug!(%port, %reason, "discarding malformed LLDPDU");
                return Ok(RecvOutcome::HandledMalformed { port, reason });
            }
        };
        drop(frame);

        let station = info.station_name.clone();
        let outcome = self.store.update(port, info, self.clock.now_10ms())?;
        if outcome.identity_changed {
            info!(%port, %station, "LLDP neighbor changed");
            self.alarms.peer_changed(port);
        } else if outcome.changed {
            info!(%port, %station, "LLDP neighbor data updated");
        }
        Ok(RecvOutcome::HandledValid {
            port,
            changed: outcome.changed,
        })
    }

    /// Forget the neighbor on `port` (link down, reinitialization).
    pub fn invalidate_peer(&self, port: PortNumber) -> Result<()> {
        if self.store.invalidate(port)? {
            info!(%port, "LLDP neighbor data invalidated");
        }
        Ok(())
    }

    /// Link status reported by the lower layer; sent from the next frame on.
    pub fn update_link_status(&self, port: PortNumber, link_status: LinkStatus) -> Result<()> {
        self.lock_local(port)?.link_status = link_status;
        Ok(())
    }

    /// Measured signal delays; sent from the next frame on.
    pub fn update_signal_delays(&self, port: PortNumber, signal_delays: SignalDelay) -> Result<()> {
        self.lock_local(port)?.signal_delays = signal_delays;
        Ok(())
    }

    /// Alias of the neighbor port, built from its port id and station name.
    pub fn peer_alias_name(&self, port: PortNumber, capacity: usize) -> Result<String> {
        let (port_id, station) = self.store.read(port, |info| {
            (info.port_id.to_string_lossy().into_owned(), info.station_name.clone())
        })?;
        generate_alias_name(&port_id, &station, capacity)
    }

    pub fn peer_ttl(&self, port: PortNumber) -> Result<u16> {
        self.store.read(port, |info| info.ttl_secs)
    }

    pub fn peer_capabilities(&self, port: PortNumber) -> Result<SystemCapabilities> {
        self.store.read(port, |info| info.capabilities)
    }

    /// Full neighbor record of `port`, including the validity flag.
    pub fn peer_record(&self, port: PortNumber) -> Result<PeerPortRecord> {
        self.store.snapshot(port)
    }

    fn local_state(&self, port: PortNumber) -> Result<LocalPortState> {
        Ok(*self.lock_local(port)?)
    }

    fn check_port(&self, port: PortNumber) -> Result<()> {
        if port.get() > self.port_count() {
            return Err(LldpError::InvalidPort(port.get()));
        }
        Ok(())
    }

    fn lock_local(&self, port: PortNumber) -> Result<MutexGuard<'_, LocalPortState>> {
        let slot = self
            .local
            .get(port.index())
            .ok_or(LldpError::InvalidPort(port.get()))?;
        Ok(slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner()))
    }

    fn lock_schedule(&self) -> MutexGuard<'_, TxSchedule> {
        self.schedule
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl fmt::Debug for LldpAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LldpAgent")
            .field("station_name", &self.config.station_name)
            .field("ports", &self.port_count())
            .field("schedule", &*self.lock_schedule())
            .finish_non_exhaustive()
    }
}

impl LldpQuery for LldpAgent {
    fn port_list(&self) -> Vec<PortNumber> {
        self.ports().collect()
    }

    fn chassis_id(&self) -> ChassisId {
        self.config.chassis_id()
    }

    fn peer_chassis_id(&self, port: PortNumber) -> Result<ChassisId> {
        self.store.read(port, |info| info.chassis_id.clone())
    }

    fn port_id(&self, port: PortNumber) -> Result<PortId> {
        self.config.port_id(port)
    }

    fn peer_port_id(&self, port: PortNumber) -> Result<PortId> {
        self.store.read(port, |info| info.port_id.clone())
    }

    fn port_description(&self, port: PortNumber) -> Result<PortDescription> {
        self.config.port_description(port)
    }

    fn peer_port_description(&self, port: PortNumber) -> Result<PortDescription> {
        self.store.read(port, |info| info.port_description.clone())
    }

    fn management_address(&self) -> ManagementAddress {
        self.config.management_address()
    }

    fn peer_management_address(&self, port: PortNumber) -> Result<ManagementAddress> {
        self.store.read(port, |info| info.management_address.clone())
    }

    fn management_port_index(&self) -> ManagementPortIndex {
        self.config.management_port_index()
    }

    fn peer_management_port_index(&self, port: PortNumber) -> Result<ManagementPortIndex> {
        self.store.read(port, |info| info.management_port_index)
    }

    fn peer_station_name(&self, port: PortNumber) -> Result<String> {
        self.store.read(port, |info| info.station_name.clone())
    }

    fn signal_delays(&self, port: PortNumber) -> Result<SignalDelay> {
        Ok(self.local_state(port)?.signal_delays)
    }

    fn peer_signal_delays(&self, port: PortNumber) -> Result<SignalDelay> {
        self.store.read(port, |info| info.signal_delays)
    }

    fn link_status(&self, port: PortNumber) -> Result<LinkStatus> {
        Ok(self.local_state(port)?.link_status)
    }

    fn peer_link_status(&self, port: PortNumber) -> Result<LinkStatus> {
        self.store.read(port, |info| info.link_status)
    }

    fn peer_timestamp(&self, port: PortNumber) -> Result<u32> {
        self.store.timestamp(port)
    }

    fn peer_snapshot(&self, port: PortNumber) -> Result<(PeerInfo, u32)> {
        self.store.current(port)
    }
}

#[cfg(test)]
mod tests {
    use pnlldp_tlv::{LldpduWriter, TLV_CHASSIS_ID, TLV_PORT_ID, TLV_TTL};
    use pnlldp_transport::{CaptureTransmitter, MacAddr, ETH_HEADER_SIZE};

    use super::*;
    use crate::alarm::RecordingAlarms;
    use crate::clock::ManualClock;
    use crate::config::LocalPortConfig;
    use crate::parser::ParseError;

    struct Harness {
        agent: LldpAgent,
        wire: Arc<CaptureTransmitter>,
        clock: Arc<ManualClock>,
        alarms: Arc<RecordingAlarms>,
    }

    fn harness(ports: u16) -> Harness {
        let mut config = LldpConfig::new("dut", MacAddr([0x02, 0, 0, 0, 0, 0x01]));
        for n in 1..=ports {
            config = config.with_port(LocalPortConfig::new(format!("port-{n:03}")));
        }
        let wire = Arc::new(CaptureTransmitter::with_port_count(ports));
        let clock = Arc::new(ManualClock::new(1_000));
        let alarms = Arc::new(RecordingAlarms::new());
        let agent = LldpAgent::new(config, wire.clone())
            .expect("config should be valid")
            .with_clock(clock.clone())
            .with_alarm_sink(alarms.clone());
        Harness {
            agent,
            wire,
            clock,
            alarms,
        }
    }

    fn port(n: u16) -> PortNumber {
        PortNumber::new(n).expect("nonzero port")
    }

    fn neighbor(chassis: &[u8], port_id: &[u8], ttl: u16) -> Bytes {
        let mut writer = LldpduWriter::new();
        writer.put_parts(TLV_CHASSIS_ID, &[&[7], chassis]).unwrap();
        writer.put_parts(TLV_PORT_ID, &[&[7], port_id]).unwrap();
        writer.put_tlv(TLV_TTL, &ttl.to_be_bytes()).unwrap();
        writer.finish()
    }

    #[test]
    fn start_sends_on_every_port() {
        let h = harness(3);
        assert_eq!(h.agent.start(), 3);
        let frames = h.wire.take();
        let ports: Vec<u16> = frames.iter().map(|(port, _)| *port).collect();
        assert_eq!(ports, vec![1, 2, 3]);
        assert_eq!(h.agent.frames_sent(), 3);
    }

    #[test]
    fn poll_tx_follows_interval() {
        let h = harness(2);
        h.agent.start();
        h.wire.take();

        h.clock.advance(499);
        assert!(!h.agent.poll_tx());
        assert!(h.wire.is_empty());

        h.clock.advance(1);
        assert!(h.agent.poll_tx());
        assert_eq!(h.wire.take().len(), 2);

        // Re-armed from the expiry, not from start.
        h.clock.advance(499);
        assert!(!h.agent.poll_tx());
    }

    #[test]
    fn tx_restart_without_send_rearms_only() {
        let h = harness(1);
        assert!(!h.agent.poll_tx(), "timer starts disarmed");
        h.agent.tx_restart(false);
        assert!(h.wire.is_empty());
        h.clock.advance(500);
        assert!(h.agent.poll_tx());
        assert_eq!(h.wire.len(), 1);
    }

    #[test]
    fn sent_frame_reflects_link_status_update() {
        let h = harness(1);
        let status = LinkStatus {
            autoneg_supported: true,
            autoneg_enabled: true,
            advertised_capabilities: 0x0C00,
            operational_mau_type: 0x0010,
        };
        h.agent.update_link_status(port(1), status).unwrap();
        h.agent.send_port(port(1)).unwrap();

        let frame = h.wire.last_for(1).expect("frame sent");
        let info = parse_lldpdu(&frame, ETH_HEADER_SIZE).expect("own frame parses");
        assert_eq!(info.link_status, status);
        assert_eq!(h.agent.link_status(port(1)).unwrap(), status);
    }

    #[test]
    fn non_lldp_frame_is_returned() {
        let h = harness(1);
        let frame = Bytes::from_static(&[0x0C, 0x04, 1, 2, 3, 4]);
        match h.agent.recv(port(1), frame.clone(), 0).unwrap() {
            RecvOutcome::NotLldp { frame: returned } => assert_eq!(returned, frame),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn valid_frame_populates_peer() {
        let h = harness(1);
        assert!(matches!(
            h.agent.peer_chassis_id(port(1)),
            Err(LldpError::NoPeerData(1))
        ));

        let outcome = h
            .agent
            .recv(port(1), neighbor(b"tester", b"port-009", 20), 0)
            .unwrap();
        assert!(matches!(
            outcome,
            RecvOutcome::HandledValid { changed: true, .. }
        ));
        assert_eq!(h.agent.peer_station_name(port(1)).unwrap(), "tester");
        assert_eq!(h.agent.peer_ttl(port(1)).unwrap(), 20);
        assert_eq!(h.agent.peer_timestamp(port(1)).unwrap(), 1_000);
        assert_eq!(
            h.agent
                .peer_alias_name(port(1), DEFAULT_ALIAS_CAPACITY)
                .unwrap(),
            "port-009.tester"
        );
        assert!(h.alarms.is_empty(), "first neighbor is not a change");
    }

    #[test]
    fn repeated_frame_keeps_timestamp() {
        let h = harness(1);
        h.agent
            .recv(port(1), neighbor(b"tester", b"port-009", 20), 0)
            .unwrap();
        h.clock.advance(300);
        let outcome = h
            .agent
            .recv(port(1), neighbor(b"tester", b"port-009", 20), 0)
            .unwrap();
        assert!(matches!(
            outcome,
            RecvOutcome::HandledValid { changed: false, .. }
        ));
        assert_eq!(h.agent.peer_timestamp(port(1)).unwrap(), 1_000);

        h.agent
            .recv(port(1), neighbor(b"tester", b"port-009", 40), 0)
            .unwrap();
        assert_eq!(h.agent.peer_timestamp(port(1)).unwrap(), 1_300);
        assert!(h.alarms.is_empty());
    }

    #[test]
    fn new_neighbor_raises_alarm() {
        let h = harness(2);
        h.agent
            .recv(port(2), neighbor(b"tester", b"port-009", 20), 0)
            .unwrap();
        h.agent
            .recv(port(2), neighbor(b"replacement", b"port-001", 20), 0)
            .unwrap();
        assert_eq!(h.alarms.take(), vec![port(2)]);
    }

    #[test]
    fn malformed_frame_leaves_record_alone() {
        let h = harness(1);
        h.agent
            .recv(port(1), neighbor(b"tester", b"port-009", 20), 0)
            .unwrap();

        let mut writer = LldpduWriter::new();
        writer.put_tlv(TLV_CHASSIS_ID, b"\x07other").unwrap();
        writer.put_tlv(TLV_PORT_ID, b"\x07port-001").unwrap();
        writer.put_tlv(TLV_TTL, &[0, 0, 20]).unwrap();
        let outcome = h.agent.recv(port(1), writer.finish(), 0).unwrap();

        match outcome {
            RecvOutcome::HandledMalformed { reason, .. } => {
                assert_eq!(reason, ParseError::BadLength { name: "TTL", len: 3 })
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(h.agent.peer_station_name(port(1)).unwrap(), "tester");
        assert!(h.alarms.is_empty());
    }

    #[test]
    fn truncated_chassis_tlv_is_handled_as_malformed() {
        let h = harness(1);
        h.agent
            .recv(port(1), neighbor(b"tester", b"port-009", 20), 0)
            .unwrap();
        let before = h.agent.peer_record(port(1)).unwrap();
        h.clock.advance(100);

        // Chassis ID header declares 7 bytes, only 3 follow.
        let frame = Bytes::from_static(&[0x02, 0x07, 0x07, b'd', b'u']);
        let outcome = h.agent.recv(port(1), frame, 0).unwrap();
        assert!(outcome.is_handled());
        assert!(matches!(
            outcome,
            RecvOutcome::HandledMalformed {
                reason: ParseError::Tlv(_),
                ..
            }
        ));

        let after = h.agent.peer_record(port(1)).unwrap();
        assert!(after.valid);
        assert_eq!(after.info, before.info);
        assert_eq!(after.timestamp_10ms, before.timestamp_10ms);
        assert!(h.alarms.is_empty());
    }

    #[test]
    fn snapshot_never_mixes_two_neighbors() {
        let h = harness(1);
        h.agent
            .recv(port(1), neighbor(b"first", b"port-001", 20), 0)
            .unwrap();

        std::thread::scope(|scope| {
            scope.spawn(|| {
                for round in 0..500 {
                    let frame = if round % 2 == 0 {
                        neighbor(b"second", b"port-002", 20)
                    } else {
                        neighbor(b"first", b"port-001", 20)
                    };
                    h.agent.recv(port(1), frame, 0).unwrap();
                }
            });
            for _ in 0..500 {
                let (info, _) = h.agent.peer_snapshot(port(1)).unwrap();
                let expected_port: &[u8] = match info.station_name.as_str() {
                    "first" => b"port-001",
                    "second" => b"port-002",
                    other => panic!("unexpected station {other}"),
                };
                assert_eq!(info.port_id.id, expected_port);
            }
        });
    }

    #[test]
    fn invalidate_clears_peer() {
        let h = harness(1);
        h.agent
            .recv(port(1), neighbor(b"tester", b"port-009", 20), 0)
            .unwrap();
        h.agent.invalidate_peer(port(1)).unwrap();
        assert!(matches!(
            h.agent.peer_port_id(port(1)),
            Err(LldpError::NoPeerData(1))
        ));
        assert!(!h.agent.peer_record(port(1)).unwrap().valid);
    }

    #[test]
    fn out_of_range_ports_are_rejected() {
        let h = harness(2);
        assert!(matches!(h.agent.port(0), Err(LldpError::InvalidPort(0))));
        assert!(matches!(h.agent.port(3), Err(LldpError::InvalidPort(3))));
        assert!(matches!(
            h.agent.recv(port(3), Bytes::new(), 0),
            Err(LldpError::InvalidPort(3))
        ));
        assert!(matches!(
            h.agent.link_status(port(3)),
            Err(LldpError::InvalidPort(3))
        ));
        assert!(matches!(
            h.agent.peer_timestamp(port(3)),
            Err(LldpError::InvalidPort(3))
        ));
    }

    #[test]
    fn local_getters() {
        let h = harness(2);
        assert_eq!(h.agent.port_list(), vec![port(1), port(2)]);
        assert_eq!(h.agent.chassis_id(), ChassisId::new(7, "dut"));
        assert_eq!(h.agent.port_id(port(2)).unwrap().id, b"port-002");
        assert_eq!(h.agent.management_port_index().index, 1);
        assert_eq!(
            h.agent.signal_delays(port(1)).unwrap(),
            SignalDelay::default()
        );
    }
}
