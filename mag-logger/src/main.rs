//! Magnetar Logger
//!
//! Finds the data logger on a serial port, asks it for its table, echoes the
//! rows as they arrive and saves them to an xlsx workbook with a "Last Run:"
//! stamp.

mod console;
mod error;
mod session;
mod settings;

use std::process::ExitCode;

use console::{wait_for_enter, Console, Terminal};
use mag_detect::{PortScanner, SerialOpener};
use session::Session;
use settings::Settings;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    // Logs go to stderr so stdout carries only the prompt and record echo
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "magnetar_logger=info,mag_protocol=info,mag_detect=info,mag_capture=info,mag_grid=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting Magnetar Logger v{}", env!("CARGO_PKG_VERSION"));

    let settings = Settings::load();
    if let Err(e) = PortScanner::new().enumerate_ports() {
        warn!("Could not list serial ports: {}", e);
    }

    let mut terminal = Terminal;
    let opener = SerialOpener::with_timeout(settings.read_timeout());
    let mut session = Session::new(&settings, opener, &mut terminal);

    // First Ctrl+C ends the capture cleanly, a second one quits outright
    let stop = session.stop_signal();
    if let Err(e) = ctrlc::set_handler(move || {
        if stop.is_stopped() {
            std::process::exit(130);
        }
        warn!("Interrupted, stopping capture (press Ctrl+C again to quit)");
        stop.stop();
    }) {
        warn!("Could not install Ctrl+C handler: {}", e);
    }

    let outcome = session.run();
    debug!("Session ended in {}", session.state());
    drop(session);

    let code = match outcome {
        Ok(summary) => {
            let _ = terminal.println(&format!(
                "Saved {} row(s) from {} to {}",
                summary.rows,
                summary.address,
                summary.path.display()
            ));
            ExitCode::SUCCESS
        }
        Err(e) => {
            let _ = terminal.println("");
            let _ = terminal.println(&e.user_message());
            ExitCode::FAILURE
        }
    };

    if let Err(e) = wait_for_enter(&mut terminal) {
        warn!("Console closed: {}", e);
    }
    code
}
