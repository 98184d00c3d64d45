//! reftrack-admin CLI tool
//!
//! Talks to a running bot over its admin socket.
//!
//! Usage:
//!   reftrack-admin count <referrer_id>
//!   reftrack-admin forget <user_id>
//!   reftrack-admin ping

use reftrack_bot::admin_socket::{AdminCommand, AdminResponse};
use reftrack_bot::config::DEFAULT_ADMIN_SOCKET;
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;

fn print_usage() {
    eprintln!("reftrack-admin - Inspect and repair the referral ledger");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  reftrack-admin count <referrer_id>   Show how many users a referrer brought in");
    eprintln!("  reftrack-admin forget <user_id>      Remove every credit of a user");
    eprintln!("  reftrack-admin ping                  Check if the bot is running");
    eprintln!();
    eprintln!("Environment:");
    eprintln!(
        "  REFTRACK_SOCKET  Path to admin socket (default: ./{})",
        DEFAULT_ADMIN_SOCKET
    );
}

fn get_socket_path() -> PathBuf {
    std::env::var("REFTRACK_SOCKET")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_ADMIN_SOCKET))
}

fn send_command(cmd: AdminCommand) -> Result<AdminResponse, String> {
    let socket_path = get_socket_path();

    let mut stream = UnixStream::connect(&socket_path).map_err(|e| {
        format!(
            "Failed to connect to reftrack-bot at {:?}: {}\n\
             Is the bot running?",
            socket_path, e
        )
    })?;

    // Send command
    let cmd_json = serde_json::to_string(&cmd).map_err(|e| e.to_string())?;
    writeln!(stream, "{}", cmd_json).map_err(|e| e.to_string())?;

    // Read response
    let mut reader = BufReader::new(&stream);
    let mut response_line = String::new();
    reader
        .read_line(&mut response_line)
        .map_err(|e| e.to_string())?;

    serde_json::from_str(&response_line).map_err(|e| format!("Invalid response: {}", e))
}

/// Parse the id argument of `command`, exiting with a message if absent or invalid.
fn id_arg(args: &[String], command: &str, name: &str) -> u64 {
    let Some(raw) = args.get(2) else {
        eprintln!("Error: {} requires a {} argument", command, name);
        std::process::exit(1);
    };
    match raw.parse() {
        Ok(id) => id,
        Err(_) => {
            eprintln!("Error: {} is not a valid {}", raw, name);
            std::process::exit(1);
        }
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let cmd = match args[1].as_str() {
        "count" => AdminCommand::Count {
            referrer_id: id_arg(&args, "count", "referrer_id"),
        },
        "forget" => AdminCommand::Forget {
            user_id: id_arg(&args, "forget", "user_id"),
        },
        "ping" => AdminCommand::Ping,
        "-h" | "--help" | "help" => {
            print_usage();
            std::process::exit(0);
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            std::process::exit(1);
        }
    };

    match send_command(cmd) {
        Ok(response) => match response {
            AdminResponse::Count { value } => println!("{}", value),
            AdminResponse::Removed { value } => println!("Removed {} referral(s)", value),
            AdminResponse::Error { error } => {
                eprintln!("Error: {}", error);
                std::process::exit(1);
            }
            AdminResponse::Pong => println!("pong - reftrack-bot is running"),
        },
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
