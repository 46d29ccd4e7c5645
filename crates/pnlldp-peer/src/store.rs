use std::sync::{Mutex, MutexGuard};

use serde::Serialize;

use crate::error::{LldpError, Result};
use crate::ports::PortNumber;
use crate::types::{
    ChassisId, LinkStatus, ManagementAddress, ManagementPortIndex, PortDescription, PortId,
    SignalDelay, SystemCapabilities,
};

/// Everything learned from one neighbor LLDPDU.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PeerInfo {
    pub chassis_id: ChassisId,
    pub port_id: PortId,
    pub ttl_secs: u16,
    pub port_description: PortDescription,
    pub capabilities: SystemCapabilities,
    pub management_address: ManagementAddress,
    pub management_port_index: ManagementPortIndex,
    pub station_name: String,
    pub signal_delays: SignalDelay,
    pub link_status: LinkStatus,
}

/// Stored neighbor state of one local port.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PeerPortRecord {
    pub info: PeerInfo,
    /// Tick of the last change, not of the last receipt.
    pub timestamp_10ms: u32,
    pub valid: bool,
}

/// What [`PeerStore::update`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOutcome {
    /// The record contents were replaced.
    pub changed: bool,
    /// A valid record now names a different chassis or port.
    pub identity_changed: bool,
}

/// One neighbor record per local port, each behind its own lock.
#[derive(Debug)]
pub struct PeerStore {
    records: Vec<Mutex<PeerPortRecord>>,
}

impl PeerStore {
    pub fn new(port_count: u16) -> Self {
        Self {
            records: (0..port_count)
                .map(|_| Mutex::new(PeerPortRecord::default()))
                .collect(),
        }
    }

    pub fn port_count(&self) -> u16 {
        u16::try_from(self.records.len()).unwrap_or(u16::MAX)
    }

    /// Store `info` for `port` unless it equals what is already there.
    pub fn update(
        &self,
        port: PortNumber,
        info: PeerInfo,
        now_10ms: u32,
    ) -> Result<UpdateOutcome> {
        let mut record = self.lock(port)?;
        if record.valid && record.info == info {
            return Ok(UpdateOutcome::default());
        }
        let identity_changed = record.valid
            && (record.info.chassis_id != info.chassis_id || record.info.port_id != info.port_id);
        record.info = info;
        record.timestamp_10ms = now_10ms;
        record.valid = true;
        Ok(UpdateOutcome {
            changed: true,
            identity_changed,
        })
    }

    /// Run `f` on the stored neighbor of `port`.
    pub fn read<R>(&self, port: PortNumber, f: impl FnOnce(&PeerInfo) -> R) -> Result<R> {
        let record = self.lock(port)?;
        if !record.valid {
            return Err(LldpError::NoPeerData(port.get()));
        }
        Ok(f(&record.info))
    }

    /// Neighbor data of `port` and the tick it last changed, read under one lock.
    pub fn current(&self, port: PortNumber) -> Result<(PeerInfo, u32)> {
        let record = self.lock(port)?;
        if !record.valid {
            return Err(LldpError::NoPeerData(port.get()));
        }
        Ok((record.info.clone(), record.timestamp_10ms))
    }

    /// Copy of the whole record of `port`, valid or not.
    pub fn snapshot(&self, port: PortNumber) -> Result<PeerPortRecord> {
        Ok(self.lock(port)?.clone())
    }

    pub fn timestamp(&self, port: PortNumber) -> Result<u32> {
        let record = self.lock(port)?;
        if !record.valid {
            return Err(LldpError::NoPeerData(port.get()));
        }
        Ok(record.timestamp_10ms)
    }

    pub fn is_valid(&self, port: PortNumber) -> Result<bool> {
        Ok(self.lock(port)?.valid)
    }

    /// Forget the neighbor of `port`. Returns whether there was one.
    pub fn invalidate(&self, port: PortNumber) -> Result<bool> {
        let mut record = self.lock(port)?;
        let was_valid = record.valid;
        *record = PeerPortRecord::default();
        Ok(was_valid)
    }

    fn lock(&self, port: PortNumber) -> Result<MutexGuard<'_, PeerPortRecord>> {
        let slot = self
            .records
            .get(port.index())
            .ok_or(LldpError::InvalidPort(port.get()))?;
        Ok(slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port(n: u16) -> PortNumber {
        PortNumber::new(n).expect("nonzero port")
    }

    fn peer(chassis: &str, port_id: &str) -> PeerInfo {
        PeerInfo {
            chassis_id: ChassisId::new(7, chassis),
            port_id: PortId::new(7, port_id),
            ttl_secs: 20,
            station_name: chassis.to_string(),
            ..PeerInfo::default()
        }
    }

    #[test]
    fn empty_store_has_no_peer_data() {
        let store = PeerStore::new(2);
        assert!(matches!(
            store.read(port(1), |info| info.ttl_secs),
            Err(LldpError::NoPeerData(1))
        ));
        assert!(matches!(
            store.timestamp(port(2)),
            Err(LldpError::NoPeerData(2))
        ));
        assert!(matches!(
            store.read(port(3), |_| ()),
            Err(LldpError::InvalidPort(3))
        ));
    }

    #[test]
    fn current_returns_info_with_its_tick() {
        let store = PeerStore::new(1);
        assert!(matches!(
            store.current(port(1)),
            Err(LldpError::NoPeerData(1))
        ));

        store.update(port(1), peer("tester", "port-009"), 700).unwrap();
        let (info, tick) = store.current(port(1)).unwrap();
        assert_eq!(info, peer("tester", "port-009"));
        assert_eq!(tick, 700);

        store.invalidate(port(1)).unwrap();
        assert!(store.current(port(1)).is_err());
    }

    #[test]
    fn identical_update_keeps_timestamp() {
        let store = PeerStore::new(1);
        let first = store.update(port(1), peer("tester", "port-001"), 100).unwrap();
        assert_eq!(
            first,
            UpdateOutcome {
                changed: true,
                identity_changed: false
            }
        );

        let again = store.update(port(1), peer("tester", "port-001"), 900).unwrap();
        assert!(!again.changed);
        assert_eq!(store.timestamp(port(1)).unwrap(), 100);
    }

    #[test]
    fn field_change_updates_timestamp() {
        let store = PeerStore::new(1);
        store.update(port(1), peer("tester", "port-001"), 100).unwrap();

        let mut info = peer("tester", "port-001");
        info.ttl_secs = 40;
        let outcome = store.update(port(1), info, 250).unwrap();
        assert!(outcome.changed);
        assert!(!outcome.identity_changed);
        assert_eq!(store.timestamp(port(1)).unwrap(), 250);
        assert_eq!(store.read(port(1), |info| info.ttl_secs).unwrap(), 40);
    }

    #[test]
    fn identity_change_is_flagged() {
        let store = PeerStore::new(1);
        store.update(port(1), peer("tester", "port-001"), 1).unwrap();
        let outcome = store.update(port(1), peer("other", "port-001"), 2).unwrap();
        assert!(outcome.identity_changed);

        let outcome = store.update(port(1), peer("other", "port-002"), 3).unwrap();
        assert!(outcome.identity_changed);
    }

    #[test]
    fn invalidate_resets_record() {
        let store = PeerStore::new(1);
        store.update(port(1), peer("tester", "port-001"), 1).unwrap();
        assert!(store.invalidate(port(1)).unwrap());
        assert!(!store.invalidate(port(1)).unwrap());
        assert!(!store.is_valid(port(1)).unwrap());

        // The next neighbor is a first sighting, not a change.
        let outcome = store.update(port(1), peer("other", "port-009"), 5).unwrap();
        assert!(outcome.changed);
        assert!(!outcome.identity_changed);
    }
}
