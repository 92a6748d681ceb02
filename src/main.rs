use clap::Parser;
use color_eyre::eyre::Result;
use tokio::io::BufReader;

use toaster::{
    infrastructure::{cli::Cli, config::Config},
    integration::{app_runner::AppRunner, input::spawn_reader, renderer::stdout_renderer},
    utils::{initialize_logging, initialize_panic_handler},
};

async fn tokio_main() -> Result<()> {
    let log_path = initialize_logging()?;

    initialize_panic_handler()?;

    let args = <Cli as Parser>::parse();

    let mut config = Config::new()?;
    args.apply_to(&mut config)?;
    log::info!(
        "Starting with capacity {} at {} fps, logging to {}",
        config.queue.max_capacity,
        config.runtime.frame_rate,
        log_path.display()
    );

    let mut runner = AppRunner::new(&config, stdout_renderer(config.runtime.format));
    let cancel = runner.cancel_token();

    let input = spawn_reader(BufReader::new(tokio::io::stdin()), cancel.clone());

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Interrupted");
            cancel.cancel();
        }
    });

    runner.run(input).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = tokio_main().await {
        eprintln!("{} error: Something went wrong", env!("CARGO_PKG_NAME"));
        Err(e)
    } else {
        Ok(())
    }
}
