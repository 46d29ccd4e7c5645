use pnlldp_peer::{build_frame, build_lldpdu, LocalPortState};
use pnlldp_transport::ETH_HEADER_SIZE;
use serde::Serialize;

use crate::cmd::{config_port, load_config, BuildArgs};
use crate::exit::{lldp_error, CliResult, SUCCESS};
use crate::output::{
    describe_tlvs, hex, print_json, print_pretty, print_raw, print_tlv_table, OutputFormat,
};

#[derive(Serialize)]
struct BuildOutput {
    port: u16,
    ethernet: bool,
    length: usize,
    hex: String,
}

pub fn run(args: BuildArgs, format: OutputFormat) -> CliResult<i32> {
    let config = load_config(&args.config)?;
    let port = config_port(&config, args.port)?;
    let local = config
        .port(port)
        .map_err(|err| lldp_error("bad port", err))?;
    let state = LocalPortState {
        link_status: local.link_status,
        signal_delays: local.signal_delays,
    };

    let bytes = if args.ethernet {
        build_frame(&config, port, &state)
    } else {
        build_lldpdu(&config, port, &state)
    }
    .map_err(|err| lldp_error("build failed", err))?;

    match format {
        OutputFormat::Json => print_json(&BuildOutput {
            port: port.get(),
            ethernet: args.ethernet,
            length: bytes.len(),
            hex: hex(&bytes),
        }),
        OutputFormat::Table => {
            let offset = if args.ethernet { ETH_HEADER_SIZE } else { 0 };
            print_tlv_table(&describe_tlvs(&bytes, offset));
        }
        OutputFormat::Pretty => print_pretty(&BuildOutput {
            port: port.get(),
            ethernet: args.ethernet,
            length: bytes.len(),
            hex: hex(&bytes),
        }),
        OutputFormat::Raw => print_raw(&bytes),
    }
    Ok(SUCCESS)
}
