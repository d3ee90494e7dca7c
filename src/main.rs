use clap::Parser;

use ruHiC::params::Parameters;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let params = Parameters::parse();
    ruHiC::run(&params)?;
    Ok(())
}
