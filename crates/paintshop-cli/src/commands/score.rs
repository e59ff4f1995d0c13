//! Score command implementation.

use anyhow::Result;
use console::style;

use paintshop_core::{IsingModel, paint_changes};

use super::common::{load_sequence, parse_colors, print_paint_line};

/// Execute the score command.
pub fn execute(sequence: &str, colors: &str) -> Result<()> {
    let sequence = load_sequence(sequence)?;
    let coloring = parse_colors(colors)?;

    let changes = paint_changes(&sequence, &coloring)?;
    let energy = IsingModel::from_sequence(&sequence).energy(&coloring.spins())?;

    print_paint_line(&sequence, &coloring)?;
    println!(
        "\n{} {} color changes (Ising energy {})",
        style("✓").green().bold(),
        style(changes).yellow().bold(),
        energy
    );

    Ok(())
}
