#![cfg(feature = "cli")]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "pnlldp-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn write_config(dir: &Path, name: &str, station: &str, mac: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(
        &path,
        format!(
            r#"{{
                "station_name": "{station}",
                "mac_address": "{mac}",
                "ip_address": "192.168.0.50",
                "ports": [
                    {{
                        "port_id": "port-001",
                        "port_description": "X1 P1",
                        "link_status": {{
                            "autoneg_supported": true,
                            "autoneg_enabled": true,
                            "advertised_capabilities": 3072,
                            "operational_mau_type": 16
                        }}
                    }},
                    {{ "port_id": "port-002" }}
                ]
            }}"#
        ),
    )
    .expect("config should be writable");
    path
}

fn pnlldp(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pnlldp"))
        .arg("--log-level")
        .arg("error")
        .arg("--format")
        .arg("json")
        .args(args)
        .output()
        .expect("pnlldp should run")
}

fn json_stdout(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

fn build_hex(config: &Path, port: &str) -> String {
    let output = pnlldp(&[
        "build",
        "--config",
        config.to_str().expect("utf-8 path"),
        "--port",
        port,
        "--ethernet",
    ]);
    assert_eq!(output.status.code(), Some(0));
    json_stdout(&output)["hex"]
        .as_str()
        .expect("hex should be a string")
        .to_string()
}

#[test]
fn build_outputs_frame_hex() {
    let dir = unique_temp_dir("build");
    let config = write_config(&dir, "dut.json", "dut", "02:00:00:00:00:01");

    let output = pnlldp(&[
        "build",
        "--config",
        config.to_str().expect("utf-8 path"),
        "--port",
        "1",
        "--ethernet",
    ]);
    assert_eq!(output.status.code(), Some(0));

    let json = json_stdout(&output);
    assert_eq!(json["port"], 1);
    assert_eq!(json["ethernet"], true);
    let hex = json["hex"].as_str().expect("hex should be a string");
    // Multicast destination, then the port's source MAC, then 0x88cc.
    assert!(hex.starts_with("0180c200000e02000000000188cc"));
    assert_eq!(json["length"].as_u64(), Some(hex.len() as u64 / 2));
}

#[test]
fn decode_reads_built_frame() {
    let dir = unique_temp_dir("decode");
    let config = write_config(&dir, "dut.json", "dut", "02:00:00:00:00:01");
    let frame = dir.join("frame.hex");
    std::fs::write(&frame, build_hex(&config, "1")).expect("frame should be writable");

    let output = pnlldp(&["decode", frame.to_str().expect("utf-8 path")]);
    assert_eq!(output.status.code(), Some(0));

    let json = json_stdout(&output);
    assert_eq!(json["offset"], 14);
    assert_eq!(json["tlvs"][0]["name"], "CHASSIS_ID");
    assert_eq!(json["peer"]["station_name"], "dut");
    assert_eq!(json["peer"]["ttl_secs"], 20);
    assert!(json.get("error").is_none());
}

#[test]
fn decode_reports_malformed_lldpdu() {
    let dir = unique_temp_dir("malformed");
    let frame = dir.join("no-ttl.hex");
    // Chassis ID, Port ID, End: the TTL TLV is missing.
    std::fs::write(&frame, "0204076475740405077030303100 00").expect("frame should be writable");

    let output = pnlldp(&["decode", frame.to_str().expect("utf-8 path")]);
    assert_eq!(output.status.code(), Some(60));

    let json = json_stdout(&output);
    assert!(json.get("peer").is_none());
    assert!(json["error"].as_str().is_some());
}

#[test]
fn decode_reports_truncated_chassis_tlv() {
    let dir = unique_temp_dir("truncated");
    let frame = dir.join("truncated.hex");
    // Chassis ID header declares 7 bytes, only 3 follow.
    std::fs::write(&frame, "0207076475").expect("frame should be writable");

    let output = pnlldp(&["decode", frame.to_str().expect("utf-8 path")]);
    assert_eq!(output.status.code(), Some(60));

    let json = json_stdout(&output);
    assert_eq!(json["offset"], 0);
    assert!(json.get("peer").is_none());
    assert!(json["error"].as_str().is_some());
}

#[test]
fn decode_rejects_non_lldp_data() {
    let dir = unique_temp_dir("not-lldp");
    let frame = dir.join("junk.hex");
    std::fs::write(&frame, "ffff").expect("frame should be writable");

    let output = pnlldp(&["decode", frame.to_str().expect("utf-8 path")]);
    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn alias_joins_port_and_chassis() {
    let output = pnlldp(&["alias", "port-001", "dut"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(json_stdout(&output)["alias"], "port-001.dut");

    let dotted = pnlldp(&["alias", "port-001.other", "dut"]);
    assert_eq!(json_stdout(&dotted)["alias"], "port-001.other");
}

#[test]
fn alias_failures_map_to_exit_codes() {
    let too_small = pnlldp(&["alias", "--capacity", "12", "port-001", "dut"]);
    assert_eq!(too_small.status.code(), Some(60));

    let empty = pnlldp(&["alias", "", "dut"]);
    assert_eq!(empty.status.code(), Some(64));
}

#[test]
fn mib_shows_neighbor_from_frame() {
    let dir = unique_temp_dir("mib");
    let local = write_config(&dir, "dut.json", "dut", "02:00:00:00:00:01");
    let neighbor = write_config(&dir, "tester.json", "tester", "02:00:00:00:00:02");
    let frame = dir.join("tester.hex");
    std::fs::write(&frame, build_hex(&neighbor, "2")).expect("frame should be writable");

    let output = pnlldp(&[
        "mib",
        "--config",
        local.to_str().expect("utf-8 path"),
        "--port",
        "1",
        "--frame",
        frame.to_str().expect("utf-8 path"),
    ]);
    assert_eq!(output.status.code(), Some(0));

    let json = json_stdout(&output);
    assert_eq!(json["local"]["port"], 1);
    assert_eq!(json["local"]["link_status"]["auto_neg_supported"], 1);
    assert_eq!(json["local"]["link_status"]["oper_mau_type"], 16);
    assert_eq!(json["remote"]["station_name"], "tester");
    assert_eq!(json["remote"]["management_address"]["value"][0], 4);
}

#[test]
fn mib_without_frame_has_no_remote_entry() {
    let dir = unique_temp_dir("mib-empty");
    let local = write_config(&dir, "dut.json", "dut", "02:00:00:00:00:01");

    let output = pnlldp(&[
        "mib",
        "--config",
        local.to_str().expect("utf-8 path"),
        "--port",
        "2",
    ]);
    assert_eq!(output.status.code(), Some(0));
    assert!(json_stdout(&output)["remote"].is_null());
}

#[test]
fn invalid_config_exits_78() {
    let dir = unique_temp_dir("bad-config");
    let config = dir.join("bad.json");
    std::fs::write(
        &config,
        r#"{
            "station_name": "dut",
            "tx_interval_secs": 5,
            "ttl_secs": 1,
            "ports": [{"port_id": "p"}]
        }"#,
    )
    .expect("config should be writable");

    let output = pnlldp(&[
        "build",
        "--config",
        config.to_str().expect("utf-8 path"),
        "--port",
        "1",
    ]);
    assert_eq!(output.status.code(), Some(78));
}

#[test]
fn unknown_port_is_a_usage_error() {
    let dir = unique_temp_dir("bad-port");
    let config = write_config(&dir, "dut.json", "dut", "02:00:00:00:00:01");

    let output = pnlldp(&[
        "build",
        "--config",
        config.to_str().expect("utf-8 path"),
        "--port",
        "3",
    ]);
    assert_eq!(output.status.code(), Some(64));
}
