use anyhow::Result;
use mdbatch_cli::run_cli;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    run_cli()
}
