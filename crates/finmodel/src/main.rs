use clap::Parser;
use finmodel::util::format_currency;
use finmodel::{init_logging, run_scenario};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "finmodel")]
#[command(about = "A week-by-week household finance simulator")]
struct Args {
    /// Scenario file (YAML); built-in defaults when omitted
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Directory holding one transaction log per category
    #[arg(short, long, default_value = "input_files")]
    input_dir: PathBuf,

    /// Directory the ledgers are written to
    #[arg(short, long, default_value = "output_files")]
    output_dir: PathBuf,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(&args.log_level, args.log_file.as_deref())?;

    let result = run_scenario(args.scenario.as_deref(), &args.input_dir, &args.output_dir)?;

    println!("Weeks simulated: {}", result.num_weeks);
    println!("Final cash:      {}", format_currency(result.final_cash()));
    println!("Final net worth: {}", format_currency(result.final_net_worth()));
    println!("Total tax:       {}", format_currency(result.total_tax()));

    Ok(())
}
