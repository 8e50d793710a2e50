use std::path::PathBuf;

use clap::Args;

use crate::inspect::helpers::fmt_value;
use crate::inspect::types::FileSummary;
use crate::inspect::{KindArg, summarize};

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Binary diagnostic file to decode
    pub file: PathBuf,

    /// Record shape; `auto` infers it from the file name
    #[arg(short, long, value_enum, default_value_t = KindArg::Auto)]
    pub kind: KindArg,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: InspectArgs) -> Result<(), String> {
    let summary = summarize(&args.file, args.kind).map_err(|e| e.to_string())?;

    if args.json {
        let json = serde_json::to_string_pretty(&summary)
            .map_err(|e| format!("Failed to serialize summary: {}", e))?;
        println!("{}", json);
    } else {
        print_summary(&args.file, &summary);
    }
    Ok(())
}

fn print_summary(file: &std::path::Path, summary: &FileSummary) {
    println!("{} ({})", file.display(), summary.kind);
    for (name, size) in &summary.shape {
        println!("  {}: {}", name, size);
    }

    println!();
    println!(
        "  {:<12} {:>8} {:>12} {:>12} {:>12}",
        "channel", "count", "min", "max", "mean"
    );
    for channel in &summary.channels {
        match &channel.stats {
            Some(s) => println!(
                "  {:<12} {:>8} {:>12} {:>12} {:>12}",
                channel.name,
                s.count,
                fmt_value(s.min),
                fmt_value(s.max),
                fmt_value(s.mean)
            ),
            None => println!("  {:<12} {:>8}", channel.name, 0),
        }
    }

    println!();
    for (name, value) in &summary.derived {
        // Full precision: these are the values golden tables are built from.
        println!("  {} = {:e}", name, value);
    }
    println!("  sha256: {}", summary.sha256);
}
