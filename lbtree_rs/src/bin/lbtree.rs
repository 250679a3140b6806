use std::process::ExitCode;

fn main() -> ExitCode {
    lbtree::cli::entrypoint::run()
}
