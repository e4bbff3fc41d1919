use clap::Parser;
use link_globs::cli::{Cli, Output};

fn main() {
    let cli = Cli::parse();
    let quiet = cli.quiet;

    if let Err(err) = cli.run() {
        Output::new(false, quiet).error(&format!("{:#}", err));
        std::process::exit(1);
    }
}
