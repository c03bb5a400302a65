//! Command-line interface for ecs
//! This binary inspects Echoview calibration supplement (ECS) files.
//!
//! Usage:
//!   ecs parse `<path>`                                      - Parse and print the document as JSON
//!   ecs resolve `<path>` [--localcal `<name>`]                - Print the resolved per-source settings
//!   ecs project `<path>` --channels a,b,c [--localcal `<name>`] - Print generic parameter tables

use clap::{Arg, Command};

fn main() {
    tracing_subscriber::fmt::init();

    let matches = Command::new("ecs")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting Echoview calibration supplement (ECS) files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("parse")
                .about("Parse an ECS file and print the parameter tree as JSON")
                .arg(
                    Arg::new("path")
                        .help("Path to the ECS file")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("resolve")
                .about("Resolve the FileSet/SourceCal/LocalCal hierarchy")
                .arg(
                    Arg::new("path")
                        .help("Path to the ECS file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("localcal")
                        .long("localcal")
                        .short('l')
                        .help("LocalCal setting to apply (default: first in the file)"),
                ),
        )
        .subcommand(
            Command::new("project")
                .about("Project resolved parameters onto generic calibration/environmental tables")
                .arg(
                    Arg::new("path")
                        .help("Path to the ECS file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("channels")
                        .long("channels")
                        .short('c')
                        .required(true)
                        .help("Comma-separated channel ids, one per source in file order"),
                )
                .arg(
                    Arg::new("localcal")
                        .long("localcal")
                        .short('l')
                        .help("LocalCal setting to apply (default: first in the file)"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("parse", sub)) => {
            let document = load(sub.get_one::<String>("path").unwrap());
            print_json(&document);
        }
        Some(("resolve", sub)) => {
            let document = load(sub.get_one::<String>("path").unwrap());
            let localcal = sub.get_one::<String>("localcal").map(String::as_str);
            let resolved = ecs::resolve(&document, localcal).unwrap_or_else(|e| {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            });
            print_json(&resolved);
        }
        Some(("project", sub)) => {
            let document = load(sub.get_one::<String>("path").unwrap());
            let localcal = sub.get_one::<String>("localcal").map(String::as_str);
            let channels: Vec<String> = sub
                .get_one::<String>("channels")
                .unwrap()
                .split(',')
                .map(str::to_string)
                .collect();
            let resolved = ecs::resolve(&document, localcal).unwrap_or_else(|e| {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            });
            let (calibration, environment) =
                ecs::project(&resolved, &channels).unwrap_or_else(|e| {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                });
            print_json(&serde_json::json!({
                "calibration": calibration,
                "environment": environment,
            }));
        }
        _ => unreachable!(),
    }
}

/// Read and parse an ECS file, exiting on failure.
fn load(path: &str) -> ecs::ParsedDocument {
    let source = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file: {}", e);
        std::process::exit(1);
    });
    ecs::parse(&source).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    })
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
