use std::fmt;
use std::io;

use pnlldp_mib::MibError;
use pnlldp_peer::{LldpError, ParseError};
use pnlldp_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const CONFIG_INVALID: i32 = 78;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => USAGE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Open { source, .. } | TransportError::Io(source) => {
            io_error(context, source)
        }
        TransportError::InterfaceNotFound(_) | TransportError::InvalidMac(_) => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn lldp_error(context: &str, err: LldpError) -> CliError {
    match err {
        LldpError::Transport(err) => transport_error(context, err),
        LldpError::ConfigIo { source, .. } => io_error(context, source),
        LldpError::Config(_) | LldpError::Json(_) => {
            CliError::new(CONFIG_INVALID, format!("{context}: {err}"))
        }
        LldpError::InvalidPort(_) | LldpError::InvalidAlias(_) => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
        LldpError::BufferTooSmall { .. }
        | LldpError::BuildOverflow { .. }
        | LldpError::Tlv(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        LldpError::NoPeerData(_) => CliError::new(FAILURE, format!("{context}: {err}")),
    }
}

pub fn mib_error(context: &str, err: MibError) -> CliError {
    match err {
        MibError::Query(err) => lldp_error(context, err),
        MibError::InvalidPort(_) => CliError::new(USAGE, format!("{context}: {err}")),
        MibError::AddressTooLong { .. } => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        MibError::NoData { .. } => CliError::new(FAILURE, format!("{context}: {err}")),
    }
}

pub fn parse_error(context: &str, err: ParseError) -> CliError {
    CliError::new(DATA_INVALID, format!("{context}: {err}"))
}
