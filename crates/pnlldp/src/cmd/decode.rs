use pnlldp_peer::{parse_lldpdu, starts_with_lldp, PeerInfo};
use pnlldp_transport::ethernet_payload;
use serde::Serialize;

use crate::cmd::{read_frame_file, DecodeArgs};
use crate::exit::{CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{
    describe_tlvs, format_management_address, print_json, print_pretty, print_raw, print_table,
    print_tlv_table, OutputFormat, TlvRow,
};

#[derive(Serialize)]
struct DecodeOutput {
    offset: usize,
    tlvs: Vec<TlvRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    peer: Option<PeerInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let bytes = read_frame_file(&args.file)?;
    let offset = args
        .offset
        .unwrap_or_else(|| ethernet_payload(&bytes).unwrap_or(0));
    if !starts_with_lldp(&bytes, offset) {
        return Err(CliError::new(
            DATA_INVALID,
            format!("no LLDPDU at offset {offset}"),
        ));
    }

    let (peer, error) = match parse_lldpdu(&bytes, offset) {
        Ok(peer) => (Some(peer), None),
        Err(err) => (None, Some(err.to_string())),
    };
    let code = if error.is_some() { DATA_INVALID } else { SUCCESS };
    let out = DecodeOutput {
        offset,
        tlvs: describe_tlvs(&bytes, offset),
        peer,
        error,
    };

    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Pretty => print_pretty(&out),
        OutputFormat::Table => {
            print_tlv_table(&out.tlvs);
            if let Some(peer) = &out.peer {
                print_table(vec!["FIELD", "VALUE"], peer_rows(peer));
            }
            if let Some(error) = &out.error {
                eprintln!("malformed LLDPDU: {error}");
            }
        }
        OutputFormat::Raw => print_raw(&bytes[offset..]),
    }
    Ok(code)
}

fn peer_rows(peer: &PeerInfo) -> Vec<Vec<String>> {
    vec![
        vec!["station name".into(), peer.station_name.clone()],
        vec!["chassis id".into(), peer.chassis_id.to_string_lossy().into_owned()],
        vec!["port id".into(), peer.port_id.to_string_lossy().into_owned()],
        vec!["ttl".into(), format!("{} s", peer.ttl_secs)],
        vec![
            "port description".into(),
            peer.port_description.to_string_lossy().into_owned(),
        ],
        vec![
            "management address".into(),
            format_management_address(&peer.management_address),
        ],
        vec![
            "cable delay".into(),
            format!("{} ns", peer.signal_delays.cable_delay_local),
        ],
        vec![
            "mau type".into(),
            format!("0x{:04x}", peer.link_status.operational_mau_type),
        ],
    ]
}
