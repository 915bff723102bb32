//! Background worker thread. Every service call runs here.
//!
//! Pages stay on the main thread: they plan batches, ship them here and
//! apply the responses drained each frame. The worker drives a
//! current-thread runtime, so the calls of one batch interleave on a
//! single thread and a slow batch never blocks the next one.

use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use serde_json::Value;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::LocalSet;

use workforce_core::payload::ExportReceipt;
use workforce_core::settings::ServiceSettings;
use workforce_core::{ExportArgs, FetchError, ThemeTokens};
use workforce_runner::{
    Batch, BatchResponse, ExportService, MethodClient, NavigationService, QueryService,
    SampleBackend, ThemeService,
};

/// Where the worker sends its calls.
#[derive(Debug, Clone)]
pub enum Backend {
    /// Seeded offline dataset; exports land in `export_dir`.
    Sample { export_dir: PathBuf },
    Http(ServiceSettings),
}

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    Run(Batch),
    Export(ExportArgs),
    Navigation,
    Theme,
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug)]
pub enum WorkerResponse {
    Settled(BatchResponse),
    Exported(Result<ExportReceipt, FetchError>),
    Navigation(Result<Value, FetchError>),
    Theme(Result<ThemeTokens, FetchError>),
    /// The worker could not start; nothing will be answered.
    Failed { message: String },
}

/// Spawn the background worker thread.
pub fn spawn_worker(
    backend: Backend,
    rx: UnboundedReceiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("workforce-worker".into())
        .spawn(move || worker_main(backend, rx, tx))
}

fn worker_main(backend: Backend, rx: UnboundedReceiver<WorkerCommand>, tx: Sender<WorkerResponse>) {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            let _ = tx.send(WorkerResponse::Failed {
                message: format!("worker runtime: {e}"),
            });
            return;
        }
    };

    match backend {
        Backend::Sample { export_dir } => {
            tracing::info!(dir = %export_dir.display(), "worker using offline dataset");
            serve(&runtime, SampleBackend::new(export_dir), rx, tx);
        }
        Backend::Http(settings) => match MethodClient::new(&settings) {
            Ok(client) => {
                tracing::info!(base_url = %settings.base_url, "worker using dashboard service");
                serve(&runtime, client, rx, tx);
            }
            Err(e) => {
                let _ = tx.send(WorkerResponse::Failed {
                    message: format!("http client: {e}"),
                });
            }
        },
    }
}

fn serve<S>(
    runtime: &Runtime,
    service: S,
    mut rx: UnboundedReceiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) where
    S: QueryService + ExportService + NavigationService + ThemeService + 'static,
{
    let service = Rc::new(service);
    let local = LocalSet::new();
    local.block_on(runtime, async move {
        while let Some(cmd) = rx.recv().await {
            if matches!(cmd, WorkerCommand::Shutdown) {
                break;
            }
            tokio::task::spawn_local(handle_command(cmd, Rc::clone(&service), tx.clone()));
        }
    });
    tracing::debug!("worker stopped");
}

async fn handle_command<S>(cmd: WorkerCommand, service: Rc<S>, tx: Sender<WorkerResponse>)
where
    S: QueryService + ExportService + NavigationService + ThemeService,
{
    let response = match cmd {
        WorkerCommand::Run(batch) => WorkerResponse::Settled(batch.run(&*service).await),
        WorkerCommand::Export(args) => WorkerResponse::Exported(service.export(args).await),
        WorkerCommand::Navigation => WorkerResponse::Navigation(service.navigation().await),
        WorkerCommand::Theme => WorkerResponse::Theme(service.theme().await),
        WorkerCommand::Shutdown => return,
    };
    // The UI may already be gone during shutdown.
    let _ = tx.send(response);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    use workforce_core::settings::DashboardSettings;
    use workforce_core::{FilterContext, FilterKey};
    use workforce_runner::{DashboardPage, EmployeeListPage};

    fn start(dir: &std::path::Path) -> (
        tokio::sync::mpsc::UnboundedSender<WorkerCommand>,
        mpsc::Receiver<WorkerResponse>,
        JoinHandle<()>,
    ) {
        let (cmd_tx, cmd_rx) = tokio::sync::mpsc::unbounded_channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let handle = spawn_worker(
            Backend::Sample {
                export_dir: dir.to_path_buf(),
            },
            cmd_rx,
            resp_tx,
        )
        .unwrap();
        (cmd_tx, resp_rx, handle)
    }

    #[test]
    fn batch_round_trips_through_worker() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx, handle) = start(dir.path());

        let company = SampleBackend::companies().next().unwrap();
        let mut page = EmployeeListPage::new(
            FilterContext::today().with(FilterKey::Company, company),
            &DashboardSettings::default(),
        );
        let batch = page.begin_refresh().unwrap();
        let epoch = batch.epoch();
        tx.send(WorkerCommand::Run(batch)).unwrap();

        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            WorkerResponse::Settled(response) => {
                assert_eq!(response.epoch, epoch);
                assert!(response.result.is_ok());
                assert!(page.apply(response).changed);
            }
            other => panic!("unexpected response: {other:?}"),
        }

        tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn navigation_and_theme_are_answered() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx, handle) = start(dir.path());
        tx.send(WorkerCommand::Navigation).unwrap();
        tx.send(WorkerCommand::Theme).unwrap();

        let mut got_navigation = false;
        let mut got_theme = false;
        for _ in 0..2 {
            match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
                WorkerResponse::Navigation(result) => got_navigation = result.is_ok(),
                WorkerResponse::Theme(result) => got_theme = result.is_ok(),
                other => panic!("unexpected response: {other:?}"),
            }
        }
        assert!(got_navigation && got_theme);

        tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn dropping_the_sender_stops_the_worker() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, _rx, handle) = start(dir.path());
        drop(tx);
        handle.join().unwrap();
    }
}
