//! Direct credit routing example.
//!
//! Builds a small network of one-way credit lines and shows the best route
//! from one house to every other.

use creditline_engine::prelude::*;

fn main() {
    env_logger::init();

    println!("╔════════════════════════════════════════════╗");
    println!("║  creditline-engine: Basic Routing Example  ║");
    println!("╚════════════════════════════════════════════╝\n");

    let h = HouseId::new;
    let lines = vec![
        CreditLine::new(h("GFI"), h("ICAP"), "swap", "spot", 3),
        CreditLine::new(h("GFI"), h("BGC"), "swap", "spot", 1),
        CreditLine::new(h("BGC"), h("TULLETT"), "swap", "spot", 2),
        CreditLine::new(h("TULLETT"), h("TRADITION"), "swap", "spot", 7),
    ];
    let houses = ["GFI", "ICAP", "BGC", "TULLETT", "TRADITION", "MAREX"].map(h);

    for line in &lines {
        println!(
            "  {:<8} → {:<10} capacity {:>4}",
            line.source().as_str(),
            line.destination().as_str(),
            line.capacity()
        );
    }
    println!();

    let graph = match CreditGraph::build(h("GFI"), houses, &lines, Vec::new(), GraphConfig::default()) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("Routing failed: {}", e);
            return;
        }
    };

    println!("{}", RoutingReport::from_graph(&graph));
}
