use pnlldp_peer::generate_alias_name;
use serde::Serialize;

use crate::cmd::AliasArgs;
use crate::exit::{lldp_error, CliResult, SUCCESS};
use crate::output::{print_json, print_pretty, print_raw, OutputFormat};

#[derive(Serialize)]
struct AliasOutput<'a> {
    port_id: &'a str,
    chassis_id: &'a str,
    alias: &'a str,
}

pub fn run(args: AliasArgs, format: OutputFormat) -> CliResult<i32> {
    let alias = generate_alias_name(&args.port_id, &args.chassis_id, args.capacity)
        .map_err(|err| lldp_error("alias failed", err))?;

    let out = AliasOutput {
        port_id: &args.port_id,
        chassis_id: &args.chassis_id,
        alias: &alias,
    };
    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Pretty => print_pretty(&out),
        OutputFormat::Table => println!("{alias}"),
        OutputFormat::Raw => print_raw(alias.as_bytes()),
    }
    Ok(SUCCESS)
}
