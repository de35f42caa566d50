use clap::Parser;
use flexi_logger::{AdaptiveFormat, Logger, WriteMode};
use lib_blokus::prelude::*;

fn main() -> Result<()> {
    // Initialize program options and environment.
    dotenvy::dotenv().ok();
    let options = DTPServerOptions::parse();
    let _logger = Logger::try_with_env_or_str(options.log_level.clone().unwrap_or("info".into()).as_str())?
        .write_mode(WriteMode::BufferAndFlush)
        .log_to_stderr()
        .adaptive_format_for_stderr(
            match cfg!(debug_assertions) {
                true => AdaptiveFormat::WithThread,
                _    => AdaptiveFormat::Default
            })
        .set_palette("b196;208;195;111;67".to_owned())
        .start()?;

    // Serve DTP and the heuristic engine.
    if let Err(e) = DTPServer::new(options)?.run() {
        log::error!("fatal error: {}", e);
        return Err(e);
    }
    Ok(())
}
