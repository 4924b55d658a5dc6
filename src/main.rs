mod cli;
mod data;
mod error;
mod report;

use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use log::warn;

use cli::Cli;
use data::filter::compute_subsets;
use data::loader::load_file;
use report::write_report;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.pipeline();

    let set = load_file(&cli.path).map_err(|err| {
        let action = if err.is_parse() { "parsing" } else { "reading" };
        anyhow::Error::new(err).context(format!(
            "{action} submissions from {}",
            cli.path.display()
        ))
    })?;

    if set.is_empty() {
        warn!("{} contains no submissions", cli.path.display());
    }
    if let Some(name) = config.subcommittee() {
        if !set.subcommittees.contains(name) {
            warn!("no submission belongs to subcommittee '{name}'");
        }
    }

    let subsets = compute_subsets(&set, &config);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, &set, &subsets, cli.report_options()).context("writing report")?;
    out.flush().context("writing report")?;
    Ok(())
}
