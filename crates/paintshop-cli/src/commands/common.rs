//! Shared helpers for CLI commands.

use std::fs;

use anyhow::{Context, Result};
use console::style;

use paintshop_core::{Coloring, Sequence, paint_colors};

/// Read a sequence given inline or, with an `@` prefix, from a file.
pub fn load_sequence(arg: &str) -> Result<Sequence> {
    let source = match arg.strip_prefix('@') {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?
        }
        None => arg.to_string(),
    };
    let sequence = Sequence::parse(&source).context("Invalid sequence")?;
    tracing::debug!(
        slots = sequence.len(),
        cars = sequence.num_cars(),
        "loaded sequence"
    );
    Ok(sequence)
}

/// Parse first-occurrence colors: `"0,1,1"`, `"0 1 1"` or compact `"011"`.
///
/// Colors are listed by car index, left to right.
pub fn parse_colors(text: &str) -> Result<Coloring> {
    let text = text.trim();
    let separated = text.contains(|c: char| c == ',' || c.is_whitespace());

    let colors = if separated {
        text.split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .map(parse_color)
            .collect::<Result<Vec<u8>>>()?
    } else {
        text.chars()
            .map(|c| parse_color(c.encode_utf8(&mut [0; 4])))
            .collect::<Result<Vec<u8>>>()?
    };

    Ok(Coloring::from_colors(colors)?)
}

fn parse_color(token: &str) -> Result<u8> {
    match token {
        "0" => Ok(0),
        "1" => Ok(1),
        other => anyhow::bail!("Invalid color '{other}': colors are 0 or 1"),
    }
}

/// Print the painted sequence, one colored cell per slot.
pub fn print_paint_line(sequence: &Sequence, coloring: &Coloring) -> Result<()> {
    let colors = paint_colors(sequence, coloring)?;
    let cars: Vec<String> = sequence.as_slice().iter().map(u32::to_string).collect();
    let width = cars.iter().map(String::len).max().unwrap_or(1);

    let car_line: Vec<String> = cars.iter().map(|c| format!("{c:>width$}")).collect();
    let paint_line: Vec<String> = colors
        .iter()
        .map(|&c| {
            let cell = format!("{c:>width$}");
            if c == 0 {
                style(cell).cyan().to_string()
            } else {
                style(cell).magenta().to_string()
            }
        })
        .collect();

    println!("  cars:  {}", car_line.join(" "));
    println!("  paint: {}", paint_line.join(" "));
    Ok(())
}
