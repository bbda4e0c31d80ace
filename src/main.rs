use clap::Parser;
use ewotrader::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
