//! creditline-engine CLI
//!
//! Route trades across a credit-line network from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Best credit routes from GFI for spot swaps
//! creditline-engine route --input lines.json --source GFI
//!
//! # A different tenor, extra switchers, JSON output
//! creditline-engine route --input lines.json --source GFI --tenor 1m --switchers ICAP,BGC --format json
//!
//! # Generate a random line table for testing
//! creditline-engine generate --houses 12 --density 0.4 --switchers 3
//! ```
//!
//! Set `RUST_LOG=debug` for routing diagnostics.

use creditline_engine::core::capacity::GradeSchedule;
use creditline_engine::core::house::HouseId;
use creditline_engine::core::table::{CreditLineTable, LineTableFile, LineTableRow};
use creditline_engine::graph::credit_graph::{CreditGraph, GraphConfig};
use creditline_engine::report::RoutingReport;
use creditline_engine::simulation::network::{generate_random_network, NetworkConfig};
use log::info;
use std::collections::BTreeMap;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"creditline-engine — credit-line switch routing for FX brokerage

USAGE:
    creditline-engine <COMMAND> [OPTIONS]

COMMANDS:
    route       Compute best credit routes from a source house
    generate    Generate a random line table (for testing)
    help        Show this message

OPTIONS (route):
    --input <FILE>        Path to JSON line table
    --source <HOUSE>      House to route from
    --product <NAME>      Product (default: swap)
    --tenor <CODE>        Tenor (default: spot)
    --switchers <LIST>    Comma-separated extra switch houses
    --config <FILE>       JSON config with "graph" and "grades" sections
    --format <FORMAT>     Output format: text (default) or json

OPTIONS (generate):
    --houses <N>          Number of houses (default: 10)
    --density <F>         Probability of a line per house pair (default: 0.3)
    --switchers <N>       Number of switch houses (default: 2)
    --output <FILE>       Write to file instead of stdout

EXAMPLES:
    creditline-engine route --input lines.json --source GFI
    creditline-engine route --input lines.json --source GFI --tenor 1m --format json
    creditline-engine generate --houses 20 --density 0.2 --output lines.json"#
    );
}

/// JSON schema for the optional engine config.
#[derive(serde::Deserialize, Default)]
#[serde(default)]
struct EngineConfig {
    graph: GraphConfig,
    grades: GradeSchedule,
}

fn load_config(path: Option<&str>) -> EngineConfig {
    let Some(path) = path else {
        return EngineConfig::default();
    };
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading config '{}': {}", path, e);
        process::exit(1);
    });
    serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        process::exit(1);
    })
}

/// Pull the value following a flag, exiting if it is missing.
fn flag_value(args: &[String], i: usize, flag: &str, what: &str) -> String {
    args.get(i).cloned().unwrap_or_else(|| {
        eprintln!("{} requires {}", flag, what);
        process::exit(1);
    })
}

fn cmd_route(args: &[String]) {
    let mut input_path = None;
    let mut source = None;
    let mut product = "swap".to_string();
    let mut tenor = "spot".to_string();
    let mut extra_switchers = Vec::new();
    let mut config_path = None;
    let mut format = "text".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(flag_value(args, i, "--input", "a file path"));
            }
            "--source" => {
                i += 1;
                source = Some(HouseId::new(flag_value(args, i, "--source", "a house code")));
            }
            "--product" => {
                i += 1;
                product = flag_value(args, i, "--product", "a product name");
            }
            "--tenor" => {
                i += 1;
                tenor = flag_value(args, i, "--tenor", "a tenor code");
            }
            "--switchers" => {
                i += 1;
                extra_switchers = flag_value(args, i, "--switchers", "a comma-separated list")
                    .split(',')
                    .filter(|s| !s.trim().is_empty())
                    .map(HouseId::new)
                    .collect();
            }
            "--config" => {
                i += 1;
                config_path = Some(flag_value(args, i, "--config", "a file path"));
            }
            "--format" => {
                i += 1;
                format = flag_value(args, i, "--format", "'text' or 'json'");
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });
    let source = source.unwrap_or_else(|| {
        eprintln!("Error: --source <HOUSE> is required");
        process::exit(1);
    });

    let config = load_config(config_path.as_deref());
    let mut table = CreditLineTable::from_json_file(&path, &config.grades).unwrap_or_else(|e| {
        eprintln!("Error loading '{}': {}", path, e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "rows": [
    {{ "from": "GFI", "to": "ICAP", "product": "swap", "tenors": {{ "spot": "B", "1m": "20?" }}, "can_switch": false }}
  ],
  "switchers": ["BGC"]
}}"#
        );
        process::exit(1);
    });
    for house in extra_switchers {
        table.add_switcher(house);
    }
    info!("Loaded {} credit lines from {}", table.len(), path);

    let graph = CreditGraph::from_table(&table, source, &product, &tenor, config.graph)
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        });
    let report = RoutingReport::from_graph(&graph);

    if format == "json" {
        let json = serde_json::to_string_pretty(&report).unwrap_or_else(|e| {
            eprintln!("Error serializing report: {}", e);
            process::exit(1);
        });
        println!("{}", json);
    } else {
        println!("{}", report);
    }
}

fn cmd_generate(args: &[String]) {
    let mut houses = 10usize;
    let mut density = 0.3f64;
    let mut switchers = 2usize;
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--houses" => {
                i += 1;
                houses = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--houses requires a number");
                        process::exit(1);
                    });
            }
            "--density" => {
                i += 1;
                density = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .filter(|d: &f64| (0.0..=1.0).contains(d))
                    .unwrap_or_else(|| {
                        eprintln!("--density requires a number between 0 and 1");
                        process::exit(1);
                    });
            }
            "--switchers" => {
                i += 1;
                switchers = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--switchers requires a number");
                        process::exit(1);
                    });
            }
            "--output" => {
                i += 1;
                output_path = Some(flag_value(args, i, "--output", "a file path"));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = NetworkConfig {
        house_count: houses,
        line_density: density,
        switcher_count: switchers,
        ..Default::default()
    };
    let table = generate_random_network(&config);

    let output = LineTableFile {
        rows: table
            .lines()
            .map(|line| LineTableRow {
                from: line.source().to_string(),
                to: line.destination().to_string(),
                product: line.product().to_lowercase(),
                tenors: BTreeMap::from([(line.tenor().to_lowercase(), line.capacity().to_string())]),
                can_switch: line.can_switch(),
                allows_switch: line.allows_switch(),
            })
            .collect(),
        switchers: table.switchers().into_iter().map(String::from).collect(),
    };

    let json = serde_json::to_string_pretty(&output).unwrap_or_else(|e| {
        eprintln!("Error serializing line table: {}", e);
        process::exit(1);
    });

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} credit lines across {} houses → {}",
            table.len(),
            houses,
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "route" => cmd_route(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
