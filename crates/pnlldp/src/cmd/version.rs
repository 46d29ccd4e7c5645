use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("pnlldp {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: pnlldp");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "build_target: {}",
        option_env!("PNLLDP_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "rustc: {}",
        option_env!("RUSTC_VERSION").unwrap_or("unknown")
    );
    println!("git_hash: {}", option_env!("GIT_HASH").unwrap_or("unknown"));
    println!(
        "features: peer={}, mib={}, async={}, cli=true",
        cfg!(feature = "peer"),
        cfg!(feature = "mib"),
        cfg!(feature = "async")
    );
    println!(
        "packet_sockets: {}",
        if cfg!(target_os = "linux") {
            "available"
        } else {
            "unavailable"
        }
    );

    Ok(SUCCESS)
}
