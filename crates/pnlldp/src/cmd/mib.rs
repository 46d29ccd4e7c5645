use std::sync::Arc;

use bytes::Bytes;
use pnlldp_mib::{LocalPortEntry, MibError, MibManagementAddress, MibView, RemoteEntry};
use pnlldp_peer::{LldpAgent, ManagementPortIndex, RecvOutcome};
use pnlldp_transport::{ethernet_payload, CaptureTransmitter};
use serde::Serialize;

use crate::cmd::{load_config, read_frame_file, MibArgs};
use crate::exit::{lldp_error, mib_error, parse_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{hex, print_json, print_pretty, print_raw, print_table, OutputFormat};

#[derive(Serialize)]
struct MibOutput {
    chassis_id: String,
    management_address: MibManagementAddress,
    management_port_index: ManagementPortIndex,
    local: LocalPortEntry,
    remote: Option<RemoteEntry>,
}

pub fn run(args: MibArgs, format: OutputFormat) -> CliResult<i32> {
    let config = load_config(&args.config)?;
    let port_count = config.port_count();
    let agent = LldpAgent::new(
        config,
        Arc::new(CaptureTransmitter::with_port_count(port_count)),
    )
    .map_err(|err| lldp_error("config rejected", err))?;
    let port = agent
        .port(args.port)
        .map_err(|err| lldp_error("bad port", err))?;

    if let Some(path) = &args.frame {
        let bytes = read_frame_file(path)?;
        let offset = ethernet_payload(&bytes).unwrap_or(0);
        let outcome = agent
            .recv(port, Bytes::from(bytes), offset)
            .map_err(|err| lldp_error("receive failed", err))?;
        match outcome {
            RecvOutcome::NotLldp { .. } => {
                return Err(CliError::new(
                    DATA_INVALID,
                    format!("{} is not an LLDP frame", path.display()),
                ));
            }
            RecvOutcome::HandledMalformed { reason, .. } => {
                return Err(parse_error("malformed LLDPDU", reason));
            }
            RecvOutcome::HandledValid { .. } => {}
        }
    }

    let view = MibView::new(&agent);
    let remote = match view.remote_entry(port) {
        Ok(entry) => Some(entry),
        Err(MibError::NoData { .. }) => None,
        Err(err) => return Err(mib_error("remote entry", err)),
    };
    let out = MibOutput {
        chassis_id: view.chassis_id().to_string_lossy().into_owned(),
        management_address: view
            .management_address()
            .map_err(|err| mib_error("management address", err))?,
        management_port_index: view.management_port_index(),
        local: view
            .local_port_entry(port)
            .map_err(|err| mib_error("local entry", err))?,
        remote,
    };

    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Pretty => print_pretty(&out),
        OutputFormat::Raw => print_raw(&out.management_address.value),
        OutputFormat::Table => print_table(vec!["OBJECT", "VALUE"], table_rows(&out)),
    }
    Ok(SUCCESS)
}

fn table_rows(out: &MibOutput) -> Vec<Vec<String>> {
    let mut rows = vec![
        vec!["lldpLocChassisId".into(), out.chassis_id.clone()],
        vec![
            "lldpLocManAddr".into(),
            format!(
                "subtype {} {}",
                out.management_address.subtype,
                hex(&out.management_address.value)
            ),
        ],
        vec![
            "lldpLocManAddrIfId".into(),
            out.management_port_index.index.to_string(),
        ],
        vec![
            "lldpLocPortId".into(),
            out.local.port_id.to_string_lossy().into_owned(),
        ],
        vec![
            "lldpXdot3LocPortAutoNegSupported".into(),
            out.local.link_status.auto_neg_supported.to_string(),
        ],
        vec![
            "lldpXdot3LocPortAutoNegAdvertisedCap".into(),
            hex(&out.local.link_status.auto_neg_advertised_cap),
        ],
        vec![
            "lldpXdot3LocPortOperMauType".into(),
            out.local.link_status.oper_mau_type.to_string(),
        ],
    ];
    match &out.remote {
        Some(remote) => rows.extend([
            vec!["lldpRemTimeMark".into(), remote.time_mark.to_string()],
            vec![
                "lldpRemChassisId".into(),
                remote.chassis_id.to_string_lossy().into_owned(),
            ],
            vec![
                "lldpRemPortId".into(),
                remote.port_id.to_string_lossy().into_owned(),
            ],
            vec!["lldpRemSysName".into(), remote.station_name.clone()],
            vec![
                "lldpRemManAddr".into(),
                hex(&remote.management_address.value),
            ],
            vec![
                "lldpXdot3RemPortOperMauType".into(),
                remote.link_status.oper_mau_type.to_string(),
            ],
        ]),
        None => rows.push(vec!["lldpRemTable".into(), "(no neighbor)".into()]),
    }
    rows
}
