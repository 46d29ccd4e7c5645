use pnlldp_peer::types::MAX_MANAGEMENT_ADDRESS_LEN;
use pnlldp_peer::{
    ChassisId, LinkStatus, LldpQuery, ManagementAddress, ManagementPortIndex, PortDescription,
    PortId, PortNumber, SignalDelay,
};
use serde::Serialize;
use tracing::trace;

use crate::encoding::{bits_encode, octet_string, truth_value};
use crate::error::Result;

/// Link status as lldpXdot3PortConfigTable / RemTable columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MibLinkStatus {
    /// TruthValue.
    pub auto_neg_supported: i32,
    /// TruthValue.
    pub auto_neg_enabled: i32,
    /// BITS.
    pub auto_neg_advertised_cap: [u8; 2],
    pub oper_mau_type: u16,
}

impl From<LinkStatus> for MibLinkStatus {
    fn from(status: LinkStatus) -> Self {
        Self {
            auto_neg_supported: truth_value(status.autoneg_supported),
            auto_neg_enabled: truth_value(status.autoneg_enabled),
            auto_neg_advertised_cap: bits_encode(status.advertised_capabilities),
            oper_mau_type: status.operational_mau_type,
        }
    }
}

/// Management address as lldpLocManAddr / lldpRemManAddr.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MibManagementAddress {
    pub subtype: u8,
    /// Length-prefixed address octets.
    pub value: Vec<u8>,
}

impl MibManagementAddress {
    fn encode(address: &ManagementAddress) -> Result<Self> {
        Ok(Self {
            subtype: address.subtype,
            value: octet_string(&address.address, MAX_MANAGEMENT_ADDRESS_LEN)?,
        })
    }

    /// Encoded length, prefix included.
    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// One row of the local port tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalPortEntry {
    pub port: u16,
    pub port_id: PortId,
    pub port_description: PortDescription,
    pub link_status: MibLinkStatus,
    pub signal_delays: SignalDelay,
}

/// One row of the remote tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteEntry {
    pub port: u16,
    /// TimeTicks of the last change.
    pub time_mark: u32,
    pub chassis_id: ChassisId,
    pub port_id: PortId,
    pub port_description: PortDescription,
    pub station_name: String,
    pub management_address: MibManagementAddress,
    pub management_port_index: ManagementPortIndex,
    pub link_status: MibLinkStatus,
    pub signal_delays: SignalDelay,
}

/// MIB-shaped read access to an LLDP agent.
#[derive(Debug)]
pub struct MibView<'a, Q: ?Sized> {
    query: &'a Q,
}

impl<Q: ?Sized> Clone for MibView<'_, Q> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Q: ?Sized> Copy for MibView<'_, Q> {}

impl<'a, Q: LldpQuery + ?Sized> MibView<'a, Q> {
    pub fn new(query: &'a Q) -> Self {
        Self { query }
    }

    pub fn port_list(&self) -> Vec<PortNumber> {
        self.query.port_list()
    }

    pub fn chassis_id(&self) -> ChassisId {
        self.query.chassis_id()
    }

    pub fn peer_chassis_id(&self, port: PortNumber) -> Result<ChassisId> {
        Ok(self.query.peer_chassis_id(port)?)
    }

    pub fn port_id(&self, port: PortNumber) -> Result<PortId> {
        Ok(self.query.port_id(port)?)
    }

    pub fn peer_port_id(&self, port: PortNumber) -> Result<PortId> {
        Ok(self.query.peer_port_id(port)?)
    }

    pub fn port_description(&self, port: PortNumber) -> Result<PortDescription> {
        Ok(self.query.port_description(port)?)
    }

    pub fn peer_port_description(&self, port: PortNumber) -> Result<PortDescription> {
        Ok(self.query.peer_port_description(port)?)
    }

    pub fn management_address(&self) -> Result<MibManagementAddress> {
        MibManagementAddress::encode(&self.query.management_address())
    }

    pub fn peer_management_address(&self, port: PortNumber) -> Result<MibManagementAddress> {
        let address = self.query.peer_management_address(port)?;
        MibManagementAddress::encode(&address)
    }

    pub fn management_port_index(&self) -> ManagementPortIndex {
        self.query.management_port_index()
    }

    pub fn peer_management_port_index(&self, port: PortNumber) -> Result<ManagementPortIndex> {
        Ok(self.query.peer_management_port_index(port)?)
    }

    pub fn peer_station_name(&self, port: PortNumber) -> Result<String> {
        Ok(self.query.peer_station_name(port)?)
    }

    pub fn signal_delays(&self, port: PortNumber) -> Result<SignalDelay> {
        Ok(self.query.signal_delays(port)?)
    }

    pub fn peer_signal_delays(&self, port: PortNumber) -> Result<SignalDelay> {
        Ok(self.query.peer_signal_delays(port)?)
    }

    pub fn link_status(&self, port: PortNumber) -> Result<MibLinkStatus> {
        Ok(self.query.link_status(port)?.into())
    }

    pub fn peer_link_status(&self, port: PortNumber) -> Result<MibLinkStatus> {
        Ok(self.query.peer_link_status(port)?.into())
    }

    /// TimeTicks (hundredths of a second) of the last neighbor change.
    pub fn peer_time_mark(&self, port: PortNumber) -> Result<u32> {
        Ok(self.query.peer_timestamp(port)?)
    }

    pub fn local_port_entry(&self, port: PortNumber) -> Result<LocalPortEntry> {
        Ok(LocalPortEntry {
            port: port.get(),
            port_id: self.port_id(port)?,
            port_description: self.port_description(port)?,
            link_status: self.link_status(port)?,
            signal_delays: self.signal_delays(port)?,
        })
    }

    /// Remote table row for `port`, built from one copy of the neighbor
    /// record. Fails with `NoData` when the port has no neighbor.
    pub fn remote_entry(&self, port: PortNumber) -> Result<RemoteEntry> {
        let (info, time_mark) = self.query.peer_snapshot(port)?;
        trace!(%port, time_mark, "formatting remote entry");
        Ok(RemoteEntry {
            port: port.get(),
            time_mark,
            management_address: MibManagementAddress::encode(&info.management_address)?,
            link_status: info.link_status.into(),
            chassis_id: info.chassis_id,
            port_id: info.port_id,
            port_description: info.port_description,
            station_name: info.station_name,
            management_port_index: info.management_port_index,
            signal_delays: info.signal_delays,
        })
    }

    /// Remote rows of every port that has a neighbor.
    pub fn remote_table(&self) -> Vec<RemoteEntry> {
        self.port_list()
            .into_iter()
            .filter_map(|port| self.remote_entry(port).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use pnlldp_peer::types::mau;
    use pnlldp_peer::{LldpError, PeerInfo};

    use super::*;
    use crate::error::MibError;

    type PeerResult<T> = pnlldp_peer::Result<T>;

    /// Canned agent data; peer getters fail while `peer_valid` is false.
    #[derive(Default)]
    struct MockQuery {
        management_address: ManagementAddress,
        peer_management_address: ManagementAddress,
        link_status: LinkStatus,
        peer_link_status: LinkStatus,
        peer_valid: bool,
        peer_reads: RefCell<usize>,
    }

    impl MockQuery {
        fn peer<T>(&self, port: PortNumber, value: T) -> PeerResult<T> {
            *self.peer_reads.borrow_mut() += 1;
            if self.peer_valid {
                Ok(value)
            } else {
                Err(LldpError::NoPeerData(port.get()))
            }
        }
    }

    impl LldpQuery for MockQuery {
        fn port_list(&self) -> Vec<PortNumber> {
            PortNumber::new(1).into_iter().collect()
        }
        fn chassis_id(&self) -> ChassisId {
            ChassisId::new(7, "dut")
        }
        fn peer_chassis_id(&self, port: PortNumber) -> PeerResult<ChassisId> {
            self.peer(port, ChassisId::new(7, "tester"))
        }
        fn port_id(&self, _port: PortNumber) -> PeerResult<PortId> {
            Ok(PortId::new(7, "port-001"))
        }
        fn peer_port_id(&self, port: PortNumber) -> PeerResult<PortId> {
            self.peer(port, PortId::new(7, "port-002"))
        }
        fn port_description(&self, _port: PortNumber) -> PeerResult<PortDescription> {
            Ok(PortDescription::default())
        }
        fn peer_port_description(&self, port: PortNumber) -> PeerResult<PortDescription> {
            self.peer(port, PortDescription::default())
        }
        fn management_address(&self) -> ManagementAddress {
            self.management_address.clone()
        }
        fn peer_management_address(&self, port: PortNumber) -> PeerResult<ManagementAddress> {
            self.peer(port, self.peer_management_address.clone())
        }
        fn management_port_index(&self) -> ManagementPortIndex {
            ManagementPortIndex {
                subtype: 2,
                index: 1,
            }
        }
        fn peer_management_port_index(&self, port: PortNumber) -> PeerResult<ManagementPortIndex> {
            self.peer(port, ManagementPortIndex::default())
        }
        fn peer_station_name(&self, port: PortNumber) -> PeerResult<String> {
            self.peer(port, "tester".to_string())
        }
        fn signal_delays(&self, _port: PortNumber) -> PeerResult<SignalDelay> {
            Ok(SignalDelay::default())
        }
        fn peer_signal_delays(&self, port: PortNumber) -> PeerResult<SignalDelay> {
            self.peer(port, SignalDelay::default())
        }
        fn link_status(&self, _port: PortNumber) -> PeerResult<LinkStatus> {
            Ok(self.link_status)
        }
        fn peer_link_status(&self, port: PortNumber) -> PeerResult<LinkStatus> {
            self.peer(port, self.peer_link_status)
        }
        fn peer_timestamp(&self, port: PortNumber) -> PeerResult<u32> {
            self.peer(port, 1234)
        }
        fn peer_snapshot(&self, port: PortNumber) -> PeerResult<(PeerInfo, u32)> {
            let info = PeerInfo {
                chassis_id: ChassisId::new(7, "tester"),
                port_id: PortId::new(7, "port-002"),
                management_address: self.peer_management_address.clone(),
                station_name: "tester".to_string(),
                link_status: self.peer_link_status,
                ..PeerInfo::default()
            };
            self.peer(port, (info, 1234))
        }
    }

    fn port1() -> PortNumber {
        PortNumber::new(1).expect("port 1")
    }

    fn ipv4(last: u8) -> ManagementAddress {
        ManagementAddress {
            subtype: 1,
            address: vec![192, 168, 1, last],
        }
    }

    #[test]
    fn management_address_is_length_prefixed() {
        let mock = MockQuery {
            management_address: ipv4(100),
            ..MockQuery::default()
        };
        let address = MibView::new(&mock).management_address().unwrap();
        assert_eq!(address.subtype, 1);
        assert_eq!(address.value, vec![4, 192, 168, 1, 100]);
        assert_eq!(address.len(), 5);
    }

    #[test]
    fn peer_management_address() {
        let mut mock = MockQuery {
            peer_management_address: ipv4(101),
            peer_valid: true,
            ..MockQuery::default()
        };
        let address = MibView::new(&mock).peer_management_address(port1()).unwrap();
        assert_eq!(address.subtype, 1);
        assert_eq!(address.value, vec![4, 192, 168, 1, 101]);
        assert_eq!(address.len(), 5);

        mock.peer_valid = false;
        assert!(matches!(
            MibView::new(&mock).peer_management_address(port1()),
            Err(MibError::NoData { port: 1 })
        ));
    }

    #[test]
    fn oversized_address_is_rejected() {
        let mock = MockQuery {
            management_address: ManagementAddress {
                subtype: 6,
                address: vec![0; 32],
            },
            ..MockQuery::default()
        };
        assert!(matches!(
            MibView::new(&mock).management_address(),
            Err(MibError::AddressTooLong { len: 32, max: 31 })
        ));
    }

    #[test]
    fn link_status_encoding() {
        let mut mock = MockQuery {
            link_status: LinkStatus {
                autoneg_supported: true,
                autoneg_enabled: true,
                advertised_capabilities: 0xF00F,
                operational_mau_type: mau::COPPER_100BASE_TX_FULL_DUPLEX,
            },
            ..MockQuery::default()
        };
        let status = MibView::new(&mock).link_status(port1()).unwrap();
        assert_eq!(status.auto_neg_supported, 1);
        assert_eq!(status.auto_neg_enabled, 1);
        assert_eq!(status.auto_neg_advertised_cap, [0xF0, 0x0F]);
        assert_eq!(status.oper_mau_type, mau::COPPER_100BASE_TX_FULL_DUPLEX);

        mock.link_status = LinkStatus {
            autoneg_supported: true,
            autoneg_enabled: false,
            advertised_capabilities: 1 << 3 | 1 << 5 | 1 << 8 | 1 << 14,
            operational_mau_type: mau::COPPER_100BASE_TX_HALF_DUPLEX,
        };
        let status = MibView::new(&mock).link_status(port1()).unwrap();
        assert_eq!(status.auto_neg_supported, 1);
        assert_eq!(status.auto_neg_enabled, 2);
        assert_eq!(status.auto_neg_advertised_cap, [0x14, 0x82]);
        assert_eq!(status.oper_mau_type, mau::COPPER_100BASE_TX_HALF_DUPLEX);
    }

    #[test]
    fn peer_link_status_encoding() {
        let mut mock = MockQuery {
            peer_link_status: LinkStatus {
                autoneg_supported: true,
                autoneg_enabled: false,
                advertised_capabilities: 1 << 3 | 1 << 5 | 1 << 8 | 1 << 14,
                operational_mau_type: mau::COPPER_100BASE_TX_HALF_DUPLEX,
            },
            peer_valid: true,
            ..MockQuery::default()
        };
        let status = MibView::new(&mock).peer_link_status(port1()).unwrap();
        assert_eq!(status.auto_neg_enabled, 2);
        assert_eq!(status.auto_neg_advertised_cap, [0x14, 0x82]);

        mock.peer_valid = false;
        assert!(matches!(
            MibView::new(&mock).peer_link_status(port1()),
            Err(MibError::NoData { port: 1 })
        ));
    }

    #[test]
    fn remote_entry_stops_at_missing_peer() {
        let mock = MockQuery::default();
        let view = MibView::new(&mock);
        assert!(matches!(
            view.remote_entry(port1()),
            Err(MibError::NoData { port: 1 })
        ));
        assert_eq!(*mock.peer_reads.borrow(), 1);
        assert!(view.remote_table().is_empty());
    }

    #[test]
    fn remote_entry_collects_peer_columns() {
        let mock = MockQuery {
            peer_management_address: ipv4(7),
            peer_valid: true,
            ..MockQuery::default()
        };
        let entry = MibView::new(&mock).remote_entry(port1()).unwrap();
        assert_eq!(*mock.peer_reads.borrow(), 1, "row comes from a single read");
        assert_eq!(entry.time_mark, 1234);
        assert_eq!(entry.port_id.id, b"port-002");
        assert_eq!(entry.station_name, "tester");
        assert_eq!(entry.management_address.value, vec![4, 192, 168, 1, 7]);

        let local = MibView::new(&mock).local_port_entry(port1()).unwrap();
        assert_eq!(local.port_id.id, b"port-001");
        assert_eq!(local.link_status.auto_neg_supported, 2);
    }
}
