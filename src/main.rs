mod cli;
mod execute;

use clap::Parser;
use zig_setup::logging::init_logging;
use crate::cli::CLI;
use anyhow::Result;

fn main() -> Result<()>{
    let cli = CLI::parse();
    init_logging(cli.verbose);
    execute::execute(cli)
}
