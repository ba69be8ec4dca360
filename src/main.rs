//! aircap CLI entry point.
//!
//! Builds the process-wide configuration, reporting registry, and command
//! table once, dispatches the verb, and converts the result into an exit
//! status. The cleanup scope lives on this stack frame and is dropped before
//! `process::exit`, so transient artifacts are removed on every exit path.

use env_logger::Env;

use aircap::cleanup::CleanupScope;
use aircap::commands::{command_table, dispatch, Ctx};
use aircap::hints::HintResolver;
use aircap::report::{Channel, Registry};
use aircap::utils::config::Config;

fn main() {
    let config = Config::from_env();

    env_logger::Builder::from_env(Env::new().filter_or("AIRCAP_LOG", "info")).init();

    let registry = Registry::from_config(&config);
    let table = command_table();
    let argv: Vec<String> = std::env::args().skip(1).collect();

    let code = {
        let cleanup = CleanupScope::new();
        let hints = HintResolver::new(&config.sources_file);
        let ctx = Ctx {
            config: &config,
            registry: &registry,
            cleanup: &cleanup,
            hints: &hints,
        };

        match dispatch(&table, &argv, &ctx) {
            Ok(()) => 0,
            Err(err) => {
                registry.report(Channel::Error, &format!("{err:#}"));
                err.exit_code()
            }
        }
        // `cleanup` drops here, before the exit below.
    };

    std::process::exit(code);
}
