use std::fmt::Write as _;
use std::io::{IsTerminal, Write};
use std::net::Ipv4Addr;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use pnlldp_peer::ManagementAddress;
use pnlldp_tlv::types::{ADDRESS_FAMILY_802, ADDRESS_FAMILY_IPV4};
use pnlldp_tlv::{org_tlv_name, tlv_type_name, TlvReader};
use pnlldp_transport::MacAddr;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// One decoded TLV, for display.
#[derive(Debug, Serialize)]
pub struct TlvRow {
    pub offset: usize,
    #[serde(rename = "type")]
    pub tlv_type: u8,
    pub name: &'static str,
    pub length: usize,
    pub value: String,
}

/// List the TLVs at `buf[offset..]`, stopping at End or the first error.
pub fn describe_tlvs(buf: &[u8], offset: usize) -> Vec<TlvRow> {
    let mut reader = TlvReader::at(buf, offset);
    let mut rows = Vec::new();
    loop {
        let at = reader.offset();
        let Some(Ok(tlv)) = reader.next() else {
            break;
        };
        let name = match tlv.org() {
            Some(org) => org_tlv_name(&org),
            None => tlv_type_name(tlv.tlv_type),
        };
        rows.push(TlvRow {
            offset: at,
            tlv_type: tlv.tlv_type,
            name,
            length: tlv.value.len(),
            value: hex(tlv.value),
        });
    }
    rows
}

pub fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn print_pretty<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn print_table(header: Vec<&str>, rows: Vec<Vec<String>>) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    for row in rows {
        table.add_row(row);
    }
    println!("{table}");
}

pub fn print_tlv_table(rows: &[TlvRow]) {
    print_table(
        vec!["OFFSET", "TYPE", "NAME", "LEN", "VALUE"],
        rows.iter()
            .map(|row| {
                vec![
                    row.offset.to_string(),
                    row.tlv_type.to_string(),
                    row.name.to_string(),
                    row.length.to_string(),
                    row.value.clone(),
                ]
            })
            .collect(),
    );
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

pub fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Parse hex text, ignoring whitespace. `None` if it is not hex.
pub fn parse_hex(text: &str) -> Option<Vec<u8>> {
    let digits: Vec<u8> = text
        .bytes()
        .filter(|byte| !byte.is_ascii_whitespace())
        .collect();
    if digits.is_empty() || digits.len() % 2 != 0 {
        return None;
    }
    digits
        .chunks_exact(2)
        .map(|pair| {
            let text = std::str::from_utf8(pair).ok()?;
            u8::from_str_radix(text, 16).ok()
        })
        .collect()
}

/// Human-readable management address: dotted IPv4, colon MAC, else hex.
pub fn format_management_address(address: &ManagementAddress) -> String {
    match (address.subtype, address.address.as_slice()) {
        (ADDRESS_FAMILY_IPV4, &[a, b, c, d]) => Ipv4Addr::new(a, b, c, d).to_string(),
        (ADDRESS_FAMILY_802, bytes) => match MacAddr::from_slice(bytes) {
            Some(mac) => mac.to_string(),
            None => hex(bytes),
        },
        (_, bytes) => hex(bytes),
    }
}
