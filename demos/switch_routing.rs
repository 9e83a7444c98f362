//! Switch routing example.
//!
//! Two houses with no line between them trade through a switch house that
//! holds credit both ways with each of them. Consuming credit on one line
//! and rebuilding the graph shows how the routes shift.

use creditline_engine::prelude::*;

const JSON: &str = r#"{
    "rows": [
        { "from": "alpha",  "to": "switch", "tenors": { "spot": "A", "1m": "B" } },
        { "from": "switch", "to": "alpha",  "tenors": { "spot": "B", "1m": "B" } },
        { "from": "switch", "to": "omega",  "tenors": { "spot": "S", "1m": "20?" } },
        { "from": "omega",  "to": "switch", "tenors": { "spot": "C" } },
        { "from": "alpha",  "to": "beta",   "tenors": { "spot": "D" } },
        { "from": "beta",   "to": "omega",  "tenors": { "spot": "150" } }
    ],
    "switchers": ["switch"]
}"#;

fn print_routes(table: &CreditLineTable, tenor: &str) {
    match CreditGraph::from_table(table, HouseId::new("ALPHA"), "swap", tenor, GraphConfig::default()) {
        Ok(graph) => println!("{}", RoutingReport::from_graph(&graph)),
        Err(e) => eprintln!("Routing failed: {}", e),
    }
}

fn main() {
    env_logger::init();

    println!("╔═════════════════════════════════════════════╗");
    println!("║  creditline-engine: Switch Routing Example  ║");
    println!("╚═════════════════════════════════════════════╝\n");

    let mut table = match CreditLineTable::from_json_str(JSON, &GradeSchedule::default()) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("Bad line table: {}", e);
            return;
        }
    };

    println!("━━━ Spot ━━━\n");
    print_routes(&table, "spot");

    println!("━━━ One month ━━━\n");
    print_routes(&table, "1m");

    println!("━━━ Spot, after BETA uses its line to OMEGA ━━━\n");
    if let Some(line) = table.get_mut("BETA", "OMEGA", "swap", "spot") {
        match line.use_credit(150) {
            Ok(remaining) => println!("BETA → OMEGA remaining: {}\n", remaining),
            Err(e) => eprintln!("{}", e),
        }
    }
    print_routes(&table, "spot");
}
