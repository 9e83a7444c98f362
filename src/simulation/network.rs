//! Random credit networks for benchmarks, demos and the CLI `generate`
//! command.

use crate::core::house::HouseId;
use crate::core::line::CreditLine;
use crate::core::table::CreditLineTable;
use rand::seq::SliceRandom;
use rand::Rng;

/// Configuration for generating a random credit network.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Number of houses in the network.
    pub house_count: usize,
    /// Probability that any ordered pair of houses has a line.
    pub line_density: f64,
    /// Number of houses flagged as switchers.
    pub switcher_count: usize,
    pub product: String,
    pub tenor: String,
    /// Smallest capacity a line may be given.
    pub min_capacity: i64,
    /// Largest capacity a line may be given.
    pub max_capacity: i64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            house_count: 10,
            line_density: 0.3,
            switcher_count: 2,
            product: "SWAP".to_string(),
            tenor: "SPOT".to_string(),
            min_capacity: 5,
            max_capacity: 100,
        }
    }
}

/// House codes `H000`, `H001`, ...
pub fn house_codes(count: usize) -> Vec<HouseId> {
    (0..count).map(|i| HouseId::new(format!("H{:03}", i))).collect()
}

/// Generate a random credit network.
pub fn generate_random_network(config: &NetworkConfig) -> CreditLineTable {
    let mut rng = rand::thread_rng();
    let houses = house_codes(config.house_count);
    let density = config.line_density.clamp(0.0, 1.0);
    let (low, high) = (
        config.min_capacity.max(0),
        config.max_capacity.max(config.min_capacity.max(0)),
    );

    let mut table = CreditLineTable::new();
    for from in &houses {
        for to in &houses {
            if from == to || !rng.gen_bool(density) {
                continue;
            }
            let capacity = rng.gen_range(low..=high);
            table.insert(CreditLine::new(
                from.clone(),
                to.clone(),
                &config.product,
                &config.tenor,
                capacity,
            ));
        }
    }

    for house in houses.choose_multiple(&mut rng, config.switcher_count) {
        table.add_switcher(house.clone());
    }

    table
}
