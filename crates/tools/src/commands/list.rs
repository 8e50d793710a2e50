use minipic_validation::registry;

/// Print every registered scenario with its summary.
pub fn run() -> Result<(), String> {
    let scenarios = registry::all();
    let width = scenarios.iter().map(|d| d.name.len()).max().unwrap_or(0);
    for descriptor in scenarios {
        println!("{:<width$}  {}", descriptor.name, descriptor.summary);
    }
    Ok(())
}
