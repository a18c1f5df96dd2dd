use std::process::ExitCode;

fn main() -> ExitCode {
    tripbasket_cli::run()
}
