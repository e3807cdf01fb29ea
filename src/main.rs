#![warn(clippy::all)]

use {
    clap::Parser,
    log::{info, warn},
    member_address::{args::Args, get_server_fixed_ip},
    std::process::ExitCode,
};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    let options = match args.load_options(std::env::vars()).await {
        Ok(options) => options,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let validated = match options.validate() {
        Ok(validated) => validated,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let addresses = match args.load_server_addresses().await {
        Ok(addresses) => addresses,
        Err(e) => {
            eprintln!("Error: Unable to read addresses from {}: {e}", args.addresses_file);
            return ExitCode::FAILURE;
        }
    };

    let address = match get_server_fixed_ip(&addresses, &args.server_name, &validated.network_cidrs) {
        Ok(address) => address,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(ip_filter) = validated.ip_filter {
        if !ip_filter.contains(&address) {
            warn!("Address {address} for server {} is outside of IP filter {ip_filter}", args.server_name);
        }
    }

    info!("Using address {address} for server {}", args.server_name);
    println!("{address}");
    ExitCode::SUCCESS
}
