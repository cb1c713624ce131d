use clap::Parser;

use fundtrace::cli::{self, Cli};
use fundtrace::observability::init_logging;

fn main() {
    init_logging();

    let parsed = Cli::parse();
    match cli::run(parsed) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
