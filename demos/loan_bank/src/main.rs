use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    cakerouter::cli::run(loan_bank::registry())
}
