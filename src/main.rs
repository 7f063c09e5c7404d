// Purpose: Provide the depsync binary entry point.
// Inputs/Outputs: Forwards argv to the CLI dispatcher and exits with its status code.
// Invariants: Main must not bypass centralized CLI argument/error handling.
// Gotchas: Any flag or mode change belongs in cli/mod.rs, not this shim.

fn main() {
    let code = depsync::cli::run_cli(std::env::args().skip(1));
    std::process::exit(code);
}
