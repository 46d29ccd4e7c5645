use crate::error::Result;
use crate::ports::PortNumber;
use crate::store::PeerInfo;
use crate::types::{
    ChassisId, LinkStatus, ManagementAddress, ManagementPortIndex, PortDescription, PortId,
    SignalDelay,
};

/// Read access to the local and neighbor data of an LLDP agent.
///
/// Local getters fail only for a port outside `1..=N`. Peer getters also fail
/// with [`LldpError::NoPeerData`](crate::LldpError::NoPeerData) while nothing
/// has been received on the port. Every getter returns a copy.
pub trait LldpQuery {
    fn port_list(&self) -> Vec<PortNumber>;

    fn chassis_id(&self) -> ChassisId;
    fn peer_chassis_id(&self, port: PortNumber) -> Result<ChassisId>;

    fn port_id(&self, port: PortNumber) -> Result<PortId>;
    fn peer_port_id(&self, port: PortNumber) -> Result<PortId>;

    fn port_description(&self, port: PortNumber) -> Result<PortDescription>;
    fn peer_port_description(&self, port: PortNumber) -> Result<PortDescription>;

    fn management_address(&self) -> ManagementAddress;
    fn peer_management_address(&self, port: PortNumber) -> Result<ManagementAddress>;

    fn management_port_index(&self) -> ManagementPortIndex;
    fn peer_management_port_index(&self, port: PortNumber) -> Result<ManagementPortIndex>;

    fn peer_station_name(&self, port: PortNumber) -> Result<String>;

    fn signal_delays(&self, port: PortNumber) -> Result<SignalDelay>;
    fn peer_signal_delays(&self, port: PortNumber) -> Result<SignalDelay>;

    fn link_status(&self, port: PortNumber) -> Result<LinkStatus>;
    fn peer_link_status(&self, port: PortNumber) -> Result<LinkStatus>;

    /// Tick (10 ms) at which the neighbor data last changed.
    fn peer_timestamp(&self, port: PortNumber) -> Result<u32>;

    /// All neighbor fields of `port` with their change tick, copied in one
    /// read so a frame received meanwhile cannot mix two neighbors.
    fn peer_snapshot(&self, port: PortNumber) -> Result<(PeerInfo, u32)>;
}
