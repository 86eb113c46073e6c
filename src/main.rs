//! Binary entrypoint for the memory gateway HTTP server.

use std::process::ExitCode;

use memory_gateway::start_gateway;

fn main() -> ExitCode {
    start_gateway::run()
}
