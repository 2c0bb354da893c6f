use anyhow::Result;
use clap::Parser;

use wireline::args::Cli;
use wireline::config::Config;
use wireline::{logging, theme};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_from_env(cli.debug);
    theme::init_color(cli.no_color);

    let mut config = Config::load(cli.config_path())?;
    cli.apply_overrides(&mut config);

    if cli.plain {
        return wireline::repl::run(config, cli.debug).await;
    }

    run_tui(config, cli.debug).await
}

#[cfg(feature = "tui")]
async fn run_tui(config: Config, _debug: bool) -> Result<()> {
    let mut app = wireline::app::App::new(config)?;
    app.run().await
}

#[cfg(not(feature = "tui"))]
async fn run_tui(config: Config, debug: bool) -> Result<()> {
    wireline::repl::run(config, debug).await
}
