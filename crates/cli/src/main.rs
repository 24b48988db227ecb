use std::process::ExitCode;

fn main() -> ExitCode {
    corpay_cli::run()
}
