use std::process::ExitCode;

fn main() -> ExitCode {
    callerctx_cli::run()
}
