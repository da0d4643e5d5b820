//! Session lifecycle: start, stop, status, wait.
//!
//! At most one session runs at a time. The controller's lock is held only
//! while flags and handles are swapped, never across the scan itself.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::ScannerConfig;
use crate::io::{
    ClientError, HttpRoverClient, RetryingClient, RoverTransport, SessionLogSink,
};
use crate::sensors::SampleValidator;
use crate::state::{
    ScanReport, SessionStatus, SharedStatusHandle, create_shared_status, read_status,
};
use crate::threads::{ScanThread, SessionOutputs};

/// Builds a fresh transport for each session.
pub type TransportFactory =
    Box<dyn Fn(&ScannerConfig) -> Result<Box<dyn RoverTransport>, ClientError> + Send + Sync>;

/// Result of a start request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new session was spawned.
    Started,
    /// A session was already running; nothing changed.
    AlreadyRunning,
}

struct ControllerInner {
    running: Arc<AtomicBool>,
    worker: Option<ScanThread>,
    last_report: Option<ScanReport>,
}

/// Owns the single-session guard and the worker handle.
pub struct SessionController {
    config: Arc<ScannerConfig>,
    connector: TransportFactory,
    log_sink: Option<SessionLogSink>,
    status: SharedStatusHandle,
    inner: Mutex<ControllerInner>,
}

impl SessionController {
    /// Create a controller that opens transports with `connector`.
    pub fn new<F>(config: ScannerConfig, connector: F) -> Self
    where
        F: Fn(&ScannerConfig) -> Result<Box<dyn RoverTransport>, ClientError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            config: Arc::new(config),
            connector: Box::new(connector),
            log_sink: None,
            status: create_shared_status(),
            inner: Mutex::new(ControllerInner {
                running: Arc::new(AtomicBool::new(false)),
                worker: None,
                last_report: None,
            }),
        }
    }

    /// Controller talking HTTP to the configured rover.
    pub fn http(config: ScannerConfig) -> Self {
        Self::new(config, |config: &ScannerConfig| {
            let client = HttpRoverClient::new(config.rover.clone())?;
            Ok(Box::new(client) as Box<dyn RoverTransport>)
        })
    }

    /// Open a per-session log file through `sink` on every start.
    pub fn with_log_sink(mut self, sink: SessionLogSink) -> Self {
        self.log_sink = Some(sink);
        self
    }

    /// Get configuration.
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, ControllerInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Start a new session unless one is already running.
    ///
    /// Fails only if the transport cannot be created.
    pub fn start(&self) -> Result<StartOutcome, ClientError> {
        let mut inner = self.lock();
        if inner.running.load(Ordering::Relaxed) {
            log::warn!("Scan is already in progress.");
            return Ok(StartOutcome::AlreadyRunning);
        }

        // Reap the previous worker so its log session is closed first
        if let Some(worker) = inner.worker.take()
            && let Some(report) = worker.join()
        {
            inner.last_report = Some(report);
        }

        let transport = (self.connector)(&self.config)?;
        let client = RetryingClient::new(
            transport,
            self.config.retry_policy(),
            SampleValidator::new(self.config.sensor),
        );
        let outputs = self.open_outputs();

        let running = Arc::new(AtomicBool::new(true));
        inner.running = running.clone();
        inner.worker = Some(ScanThread::spawn(
            self.config.clone(),
            client,
            running,
            self.status.clone(),
            outputs,
        ));
        Ok(StartOutcome::Started)
    }

    fn open_outputs(&self) -> SessionOutputs {
        let Some(sink) = &self.log_sink else {
            return SessionOutputs::default();
        };
        match sink.open_session(&self.config.session.log_dir) {
            Ok(path) => {
                log::info!("Logging session to {}", path.display());
                SessionOutputs {
                    report_path: Some(path.with_extension("json")),
                    log_sink: Some(sink.clone()),
                }
            }
            Err(e) => {
                log::warn!(
                    "Failed to open session log in {}: {}",
                    self.config.session.log_dir.display(),
                    e
                );
                SessionOutputs::default()
            }
        }
    }

    /// Request the running session to stop.
    ///
    /// Returns whether a session was running. The worker notices at the top
    /// of its next iteration.
    pub fn stop(&self) -> bool {
        let inner = self.lock();
        if inner.running.swap(false, Ordering::Relaxed) {
            log::info!("Stopping scan...");
            true
        } else {
            log::info!("No scan in progress.");
            false
        }
    }

    /// Block until the current session ends and return its report.
    ///
    /// Without an active worker, returns the last finished report.
    pub fn wait(&self) -> Option<ScanReport> {
        let worker = self.lock().worker.take();
        let Some(worker) = worker else {
            return self.last_report();
        };
        let report = worker.join();
        let mut inner = self.lock();
        if report.is_some() {
            inner.last_report = report.clone();
        }
        report
    }

    /// Stop any running session and wait for it.
    pub fn shutdown(&self) -> Option<ScanReport> {
        self.stop();
        self.wait()
    }

    /// Whether a session is running.
    pub fn is_running(&self) -> bool {
        self.lock().running.load(Ordering::Relaxed)
    }

    /// Snapshot of the active or last session.
    pub fn status(&self) -> SessionStatus {
        read_status(&self.status)
    }

    /// Report of the last finished session collected by this controller.
    pub fn last_report(&self) -> Option<ScanReport> {
        self.lock().last_report.clone()
    }
}
