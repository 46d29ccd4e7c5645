use std::net::Ipv4Addr;
use std::path::Path;
use std::time::Duration;

use pnlldp_tlv::types::{
    ADDRESS_FAMILY_802, ADDRESS_FAMILY_IPV4, CHASSIS_SUBTYPE_LOCAL, CHASSIS_SUBTYPE_MAC,
    INTERFACE_SUBTYPE_IFINDEX, PORT_SUBTYPE_LOCAL,
};
use pnlldp_transport::MacAddr;
use serde::{Deserialize, Serialize};

use crate::error::{LldpError, Result};
use crate::ports::{PortIter, PortNumber};
use crate::types::{
    ChassisId, LinkStatus, ManagementAddress, ManagementPortIndex, PortDescription, PortId,
    SignalDelay, MAX_ID_LEN,
};

/// Default transmit interval in seconds.
pub const DEFAULT_TX_INTERVAL_SECS: u16 = 5;

/// Default time-to-live advertised to neighbors.
pub const DEFAULT_TTL_SECS: u16 = 20;

/// Longest PROFINET station name.
pub const MAX_STATION_NAME_LEN: usize = 240;

/// Most ports a device may declare.
pub const MAX_PORTS: usize = 64;

/// Device-wide LLDP settings plus one entry per local port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LldpConfig {
    /// PROFINET station name, sent as the chassis id when set.
    pub station_name: String,
    pub mac_address: MacAddr,
    pub ip_address: Option<Ipv4Addr>,
    /// ifIndex advertised with the management address.
    pub management_port_index: u32,
    pub system_capabilities: u16,
    pub enabled_capabilities: u16,
    pub tx_interval_secs: u16,
    pub ttl_secs: u16,
    pub ports: Vec<LocalPortConfig>,
}

impl Default for LldpConfig {
    fn default() -> Self {
        Self {
            station_name: String::new(),
            mac_address: MacAddr::default(),
            ip_address: None,
            management_port_index: 1,
            system_capabilities: 0,
            enabled_capabilities: 0,
            tx_interval_secs: DEFAULT_TX_INTERVAL_SECS,
            ttl_secs: DEFAULT_TTL_SECS,
            ports: Vec::new(),
        }
    }
}

/// Settings of one physical port.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalPortConfig {
    pub port_id: String,
    pub port_description: String,
    /// OS interface the port is bound to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    /// Source MAC for frames sent on this port; the device MAC when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<MacAddr>,
    pub link_status: LinkStatus,
    pub signal_delays: SignalDelay,
}

impl LocalPortConfig {
    pub fn new(port_id: impl Into<String>) -> Self {
        Self {
            port_id: port_id.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.port_description = description.into();
        self
    }

    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interface = Some(interface.into());
        self
    }

    pub fn with_link_status(mut self, link_status: LinkStatus) -> Self {
        self.link_status = link_status;
        self
    }

    pub fn with_signal_delays(mut self, signal_delays: SignalDelay) -> Self {
        self.signal_delays = signal_delays;
        self
    }
}

impl LldpConfig {
    pub fn new(station_name: impl Into<String>, mac_address: MacAddr) -> Self {
        Self {
            station_name: station_name.into(),
            mac_address,
            ..Self::default()
        }
    }

    pub fn with_ip_address(mut self, ip_address: Ipv4Addr) -> Self {
        self.ip_address = Some(ip_address);
        self
    }

    pub fn with_port(mut self, port: LocalPortConfig) -> Self {
        self.ports.push(port);
        self
    }

    pub fn with_tx_interval_secs(mut self, secs: u16) -> Self {
        self.tx_interval_secs = secs;
        self
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LldpError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.station_name.len() > MAX_STATION_NAME_LEN {
            return Err(LldpError::Config(format!(
                "station_name is {} bytes, max {MAX_STATION_NAME_LEN}",
                self.station_name.len()
            )));
        }
        if self.tx_interval_secs == 0 {
            return Err(LldpError::Config(
                "tx_interval_secs must be at least 1".to_string(),
            ));
        }
        if self.ttl_secs < self.tx_interval_secs {
            return Err(LldpError::Config(format!(
                "ttl_secs ({}) is shorter than tx_interval_secs ({})",
                self.ttl_secs, self.tx_interval_secs
            )));
        }
        if self.ports.is_empty() || self.ports.len() > MAX_PORTS {
            return Err(LldpError::Config(format!(
                "expected 1..={MAX_PORTS} ports, got {}",
                self.ports.len()
            )));
        }
        for (index, port) in self.ports.iter().enumerate() {
            let number = index + 1;
            if port.port_id.is_empty() || port.port_id.len() > MAX_ID_LEN {
                return Err(LldpError::Config(format!(
                    "port {number}: port_id must be 1..={MAX_ID_LEN} bytes"
                )));
            }
            if port.port_description.len() > MAX_ID_LEN {
                return Err(LldpError::Config(format!(
                    "port {number}: port_description is longer than {MAX_ID_LEN} bytes"
                )));
            }
        }
        Ok(())
    }

    pub fn port_count(&self) -> u16 {
        // validate() caps the list at MAX_PORTS.
        u16::try_from(self.ports.len()).unwrap_or(u16::MAX)
    }

    pub fn ports(&self) -> PortIter {
        PortIter::new(self.port_count())
    }

    pub fn port(&self, port: PortNumber) -> Result<&LocalPortConfig> {
        self.ports
            .get(port.index())
            .ok_or(LldpError::InvalidPort(port.get()))
    }

    pub fn tx_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.tx_interval_secs))
    }

    /// Chassis id sent by this device: the station name when set, else the MAC.
    pub fn chassis_id(&self) -> ChassisId {
        if self.station_name.is_empty() {
            ChassisId::new(CHASSIS_SUBTYPE_MAC, self.mac_address.octets())
        } else {
            ChassisId::new(CHASSIS_SUBTYPE_LOCAL, self.station_name.as_bytes())
        }
    }

    pub fn port_id(&self, port: PortNumber) -> Result<PortId> {
        let local = self.port(port)?;
        Ok(PortId::new(PORT_SUBTYPE_LOCAL, local.port_id.as_bytes()))
    }

    pub fn port_description(&self, port: PortNumber) -> Result<PortDescription> {
        let local = self.port(port)?;
        Ok(PortDescription(local.port_description.as_bytes().to_vec()))
    }

    /// Management address: the IPv4 address when set, else the MAC.
    pub fn management_address(&self) -> ManagementAddress {
        match self.ip_address {
            Some(ip) => ManagementAddress {
                subtype: ADDRESS_FAMILY_IPV4,
                address: ip.octets().to_vec(),
            },
            None => ManagementAddress {
                subtype: ADDRESS_FAMILY_802,
                address: self.mac_address.octets().to_vec(),
            },
        }
    }

    pub fn management_port_index(&self) -> ManagementPortIndex {
        ManagementPortIndex {
            subtype: INTERFACE_SUBTYPE_IFINDEX,
            index: self.management_port_index,
        }
    }

    /// Source MAC for frames leaving `port`.
    pub fn source_mac(&self, port: PortNumber) -> Result<MacAddr> {
        Ok(self.port(port)?.mac_address.unwrap_or(self.mac_address))
    }
}
