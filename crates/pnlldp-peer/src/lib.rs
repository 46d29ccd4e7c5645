//! LLDP agent: frame building, peer tracking and per-port neighbor state.
//!
//! This is the layer the rest of a device stack talks to. It transmits an
//! LLDPDU on every local port when the timer says so, parses what the
//! directly attached neighbor sends, and keeps one record per port with
//! the neighbor's identity and link data.

pub mod agent;
pub mod alarm;
pub mod alias;
pub mod builder;
pub mod clock;
pub mod config;
pub mod error;
pub mod parser;
pub mod ports;
pub mod query;
pub mod scheduler;
pub mod store;
pub mod types;

pub use agent::{LldpAgent, DEFAULT_ALIAS_CAPACITY};
pub use alarm::{AlarmSink, NoAlarms, RecordingAlarms};
pub use alias::{generate_alias_name, ALIAS_SEPARATOR};
pub use builder::{build_frame, build_lldpdu, build_lldpdu_with_budget};
pub use clock::{Clock, ManualClock, UptimeClock};
pub use config::{LldpConfig, LocalPortConfig};
pub use error::{LldpError, Result};
pub use parser::{parse_lldpdu, starts_with_lldp, ParseError, RecvOutcome};
pub use ports::{PortIter, PortNumber};
pub use query::LldpQuery;
pub use scheduler::TxSchedule;
#[cfg(feature = "async")]
pub use scheduler::TxTask;
pub use store::{PeerInfo, PeerPortRecord, PeerStore, UpdateOutcome};
pub use types::{
    ChassisId, LinkStatus, LocalPortState, ManagementAddress, ManagementPortIndex,
    PortDescription, PortId, SignalDelay, SystemCapabilities,
};
