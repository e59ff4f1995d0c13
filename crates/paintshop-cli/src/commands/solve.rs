//! Solve command implementation.
//!
//! Runs the greedy baseline and, on request, exhaustive search.

use anyhow::{Context, Result};
use console::style;

use paintshop_core::{Solution, solver};

use super::common::{load_sequence, print_paint_line};

/// Execute the solve command.
pub fn execute(sequence: &str, exhaustive: bool) -> Result<()> {
    let sequence = load_sequence(sequence)?;

    let greedy = solver::greedy(&sequence)?;
    print_solution("Greedy", &greedy);
    print_paint_line(&sequence, &greedy.coloring)?;

    if exhaustive {
        let best = solver::exhaustive(&sequence).context("Exhaustive search failed")?;
        println!();
        print_solution("Optimal", &best);
        print_paint_line(&sequence, &best.coloring)?;
    }

    Ok(())
}

fn print_solution(label: &str, solution: &Solution) {
    println!(
        "{} {}: {} color changes, first colors {:?}",
        style("✓").green().bold(),
        label,
        style(solution.changes).yellow().bold(),
        solution.coloring.colors()
    );
}
