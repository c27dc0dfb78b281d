//! One logging session, from probing to saving
//!
//! ```text
//! Idle → Probing → Connecting → Capturing → Decoding → Assembling → Persisting → Closed
//!           │           │            │
//!           └───────────┴────────────┴──────────→ Closed (fatal, reported, no retry)
//! ```
//!
//! The device handle lives only inside the capture scope, so it is closed on
//! every path out of capturing.

use std::fmt;
use std::io::{Read, Write};
use std::path::PathBuf;

use mag_capture::{capture, send_trigger, CaptureConfig, CaptureError, StopSignal};
use mag_detect::{connect, DeviceAddress, PortOpener, PortProber};
use mag_grid::{document_path, write_grid, Document, GridAssembler, SessionStamp, XlsxDocument};
use mag_protocol::{Record, RowDecoder};
use tracing::{debug, info, warn};

use crate::console::{prompt_document_name, Console};
use crate::error::SessionError;
use crate::settings::Settings;

/// Shown before the table is requested
const ATTRIBUTION: [&str; 3] = [
    "Written by John Simonis",
    "Copyright(C) 2023",
    "Magnetar (The Ohio State University)",
];

/// Session lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Probing,
    Connecting,
    Capturing,
    Decoding,
    Assembling,
    Persisting,
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// What a completed session produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    /// Port the table was read from
    pub address: DeviceAddress,
    /// Saved document
    pub path: PathBuf,
    /// Data rows written
    pub rows: usize,
}

/// A single capture-and-save run
pub struct Session<'a, O> {
    settings: &'a Settings,
    opener: O,
    console: &'a mut dyn Console,
    stop: StopSignal,
    state: SessionState,
}

impl<'a, O> Session<'a, O>
where
    O: PortOpener,
    O::Port: Read + Write,
{
    /// Create a session in the `Idle` state
    pub fn new(settings: &'a Settings, opener: O, console: &'a mut dyn Console) -> Self {
        Self {
            settings,
            opener,
            console,
            stop: StopSignal::new(),
            state: SessionState::Idle,
        }
    }

    /// Handle that cancels the capture when raised
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    fn enter(&mut self, state: SessionState) {
        debug!("Session {} -> {}", self.state, state);
        self.state = state;
    }

    /// Run the session to completion
    ///
    /// Always ends in `Closed`; fatal errors are returned for the caller to
    /// report.
    pub fn run(&mut self) -> Result<SessionSummary, SessionError> {
        let result = self.run_stages();
        if let Err(e) = &result {
            warn!("Session aborted in {}: {}", self.state, e);
        }
        self.enter(SessionState::Closed);
        result
    }

    fn run_stages(&mut self) -> Result<SessionSummary, SessionError> {
        // Validate everything up front so bad settings never touch the device
        let capture_config = self.settings.capture_config()?;
        let decoder = self.settings.row_decoder()?;
        let assembler = GridAssembler::with_layout(self.settings.grid_layout()?);

        self.enter(SessionState::Probing);
        let address = self.locate()?;

        self.enter(SessionState::Connecting);
        let mut port = connect(&self.opener, &address, self.settings.session_baud)
            .map_err(SessionError::Connect)?;
        self.console.println(&format!("Successful connection to: {}", address))?;

        let path = document_path(&prompt_document_name(&mut *self.console)?);
        let mut document = XlsxDocument::open_or_create(&path, &self.settings.sheet)?;

        self.print_banner()?;
        std::thread::sleep(self.settings.settle_delay());

        self.enter(SessionState::Capturing);
        let captured = self.capture_table(&mut port, &capture_config);
        drop(port);
        debug!("Closed {}", address);

        let records = match captured {
            Ok(records) => records,
            Err(e) => {
                if self.settings.save_partial_on_error && !e.captured().is_empty() {
                    warn!("Saving {} record(s) captured before the fault", e.captured().len());
                    self.persist(e.captured(), &decoder, &assembler, &mut document)?;
                }
                return Err(e.into());
            }
        };

        let rows = self.persist(&records, &decoder, &assembler, &mut document)?;
        info!("Logged {} row(s) from {} to {}", rows, address, path.display());

        Ok(SessionSummary {
            address,
            path,
            rows,
        })
    }

    fn locate(&mut self) -> Result<DeviceAddress, SessionError> {
        if let Some(address) = self.settings.forced_address() {
            info!("Using configured port {}", address);
            return Ok(address);
        }

        let template = self.settings.address_template();
        let prober = PortProber::new(&self.opener, template.clone())
            .with_first_index(self.settings.first_port);

        match prober.discover(self.settings.candidate_count, self.settings.probe_baud) {
            Some(address) => {
                self.console.println(&format!("Device likely located on: {}", address))?;
                Ok(address)
            }
            None => {
                let last = self
                    .settings
                    .first_port
                    .saturating_add(self.settings.candidate_count.saturating_sub(1));
                Err(SessionError::DiscoveryExhausted {
                    first: template.address(self.settings.first_port).to_string(),
                    last: template.address(last).to_string(),
                })
            }
        }
    }

    fn print_banner(&mut self) -> Result<(), SessionError> {
        self.console.println("")?;
        for line in ATTRIBUTION {
            self.console.println(line)?;
        }
        Ok(())
    }

    fn capture_table(
        &mut self,
        port: &mut O::Port,
        config: &CaptureConfig,
    ) -> Result<Vec<Record>, CaptureError> {
        send_trigger(port, &self.settings.trigger)?;

        let console = &mut *self.console;
        let mut echo_failed = false;
        let mut echo = |record: &Record| {
            if console.println(record.as_str()).is_err() {
                echo_failed = true;
            }
        };
        let result = capture(port, config, &mut echo, &self.stop)?;
        if echo_failed {
            warn!("Console echo failed during capture");
        }
        Ok(result.records)
    }

    fn persist(
        &mut self,
        records: &[Record],
        decoder: &RowDecoder,
        assembler: &GridAssembler,
        document: &mut XlsxDocument,
    ) -> Result<usize, SessionError> {
        self.enter(SessionState::Decoding);
        let rows = decoder.decode_all(records);

        self.enter(SessionState::Assembling);
        let grid = assembler.assemble(&rows, &SessionStamp::now())?;

        self.enter(SessionState::Persisting);
        write_grid(document, &grid)?;
        document.save()?;
        Ok(rows.len())
    }
}
