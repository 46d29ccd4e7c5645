use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

use pnlldp_peer::{LldpConfig, PortNumber};

use crate::exit::{io_error, lldp_error, CliResult};
use crate::output::{parse_hex, OutputFormat};

pub mod alias;
pub mod build;
pub mod decode;
pub mod listen;
pub mod mib;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the LLDPDU a configured device sends on one port.
    Build(BuildArgs),
    /// Decode an LLDPDU or Ethernet frame from a file.
    Decode(DecodeArgs),
    /// Show LLDP-MIB values for one port.
    Mib(MibArgs),
    /// Print the alias name of a neighbor port.
    Alias(AliasArgs),
    /// Run the agent on the configured interfaces and print neighbor changes.
    Listen(ListenArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Build(args) => build::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Mib(args) => mib::run(args, format),
        Command::Alias(args) => alias::run(args, format),
        Command::Listen(args) => listen::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Device configuration (JSON).
    #[arg(long, value_name = "FILE")]
    pub config: PathBuf,
    /// Local port to build for.
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: u16,
    /// Prepend the Ethernet header.
    #[arg(long)]
    pub ethernet: bool,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// File with the frame, as hex text or raw bytes.
    pub file: PathBuf,
    /// Byte offset of the LLDPDU. Default: after the Ethernet header if present.
    #[arg(long)]
    pub offset: Option<usize>,
}

#[derive(Args, Debug)]
pub struct MibArgs {
    /// Device configuration (JSON).
    #[arg(long, value_name = "FILE")]
    pub config: PathBuf,
    /// Local port to show.
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: u16,
    /// Neighbor frame to feed to the port first (hex text or raw bytes).
    #[arg(long, value_name = "FILE")]
    pub frame: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct AliasArgs {
    /// Neighbor port id.
    pub port_id: String,
    /// Neighbor chassis id (station name).
    pub chassis_id: String,
    /// Buffer size including the terminating NUL.
    #[arg(long, default_value = "256")]
    pub capacity: usize,
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Device configuration (JSON); every port needs an `interface`.
    #[arg(long, value_name = "FILE")]
    pub config: PathBuf,
    /// Exit after N neighbor changes.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub(crate) fn load_config(path: &Path) -> CliResult<LldpConfig> {
    LldpConfig::from_path(path).map_err(|err| lldp_error("config rejected", err))
}

pub(crate) fn config_port(config: &LldpConfig, port: u16) -> CliResult<PortNumber> {
    let port = PortNumber::try_from(port).map_err(|err| lldp_error("bad port", err))?;
    config
        .port(port)
        .map_err(|err| lldp_error("bad port", err))?;
    Ok(port)
}

/// Read a frame file holding either hex text or raw bytes.
pub(crate) fn read_frame_file(path: &Path) -> CliResult<Vec<u8>> {
    let bytes = std::fs::read(path)
        .map_err(|err| io_error(&format!("failed to read {}", path.display()), err))?;
    let hex = std::str::from_utf8(&bytes).ok().and_then(parse_hex);
    Ok(hex.unwrap_or(bytes))
}
