//! Interactions command implementation.
//!
//! Prints the spin-glass interactions of a sequence and the couplers they
//! aggregate into.

use anyhow::Result;
use console::style;

use paintshop_core::{Coupling, Interaction, IsingModel};

use super::common::load_sequence;
use crate::OutputFormat;

/// Execute the interactions command.
pub fn execute(sequence: &str, format: OutputFormat) -> Result<()> {
    let sequence = load_sequence(sequence)?;
    let interactions: Vec<Interaction> = sequence.interactions().collect();

    match format {
        OutputFormat::Json => {
            let triples: Vec<(u32, u32, i32)> =
                interactions.iter().map(Interaction::as_triple).collect();
            println!("{}", serde_json::to_string(&triples)?);
        }
        OutputFormat::Table => {
            println!(
                "{} {} interactions over {} cars",
                style("→").cyan().bold(),
                interactions.len(),
                sequence.num_cars()
            );
            for interaction in &interactions {
                let label = match interaction.coupling {
                    Coupling::Ferromagnetic => style(interaction.coupling.label()).green(),
                    Coupling::Antiferromagnetic => style(interaction.coupling.label()).red(),
                };
                println!("  {interaction}  {label}");
            }

            let model = IsingModel::from_sequence(&sequence);
            println!("\n{} Couplers:", style("✓").green().bold());
            for coupler in model.couplers() {
                println!(
                    "  J[{}, {}] = {:+}",
                    sequence.cars()[coupler.a],
                    sequence.cars()[coupler.b],
                    coupler.j
                );
            }
        }
    }

    Ok(())
}
