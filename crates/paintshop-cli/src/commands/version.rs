//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - binary paintshop as an Ising spin glass",
        style("Paintshop").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  paintshop-core     Interactions, scoring, QAOA circuits");
    println!("  paintshop-collect  Checkpointed task store and configuration");
    println!("  paintshop-cli      Command-line interface");
    println!();
    println!("License: {}", style("Apache-2.0").dim());
}
