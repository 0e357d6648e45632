use std::process::ExitCode;

use dotenvy::dotenv;
use tokio::runtime::Runtime;
use tracing::{error, info};
use uuid::Uuid;

/// Per-process identity attached to lifecycle events.
#[derive(Clone, Copy)]
struct ProcessInfo {
    service_id: Uuid,
    pid: u32,
}

fn init_logging() {
    // .env first so RUST_LOG / LOG_FORMAT apply
    dotenv().ok();
    common::utils::logging::init_logging_from_env();
    info!(service = "peluqueria", event = "logger_init", "tracing subscriber initialized");
}

fn install_panic_hook(proc_info: ProcessInfo) {
    std::panic::set_hook(Box::new(move |panic| {
        error!(
            service = "peluqueria",
            event = "panic",
            service_id = %proc_info.service_id,
            pid = proc_info.pid,
            message = %panic,
            "unhandled panic"
        );
    }));
}

/// Worker count comes from config.toml or `TOKIO_WORKER_THREADS`; a config
/// error here is reported again, with context, by `server::run`.
fn build_runtime() -> std::io::Result<(Runtime, Option<usize>)> {
    let worker_threads = configs::AppConfig::load_or_env().ok().and_then(|cfg| cfg.server.worker_threads);
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads {
        builder.worker_threads(w);
    }
    Ok((builder.build()?, worker_threads))
}

async fn serve_until_ctrl_c(proc_info: ProcessInfo) -> ExitCode {
    let ProcessInfo { service_id, pid } = proc_info;
    let server_task = tokio::spawn(server::run());

    tokio::select! {
        joined = server_task => match joined {
            Ok(Ok(())) => {
                info!(service = "peluqueria", event = "stop", %service_id, pid, "server stopped");
                ExitCode::SUCCESS
            }
            Ok(Err(e)) => {
                // includes a missing or invalid config.json
                error!(service = "peluqueria", event = "run_failed", error = %format!("{e:#}"), "server failed");
                ExitCode::FAILURE
            }
            Err(e) => {
                error!(service = "peluqueria", event = "task_join_error", error = %e, "server task aborted");
                ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            info!(service = "peluqueria", event = "shutdown_signal", %service_id, pid, "Ctrl+C received, shutting down");
            ExitCode::SUCCESS
        }
    }
}

fn main() -> ExitCode {
    init_logging();

    let proc_info = ProcessInfo { service_id: Uuid::new_v4(), pid: std::process::id() };
    install_panic_hook(proc_info);

    let (rt, worker_threads) = match build_runtime() {
        Ok(built) => built,
        Err(e) => {
            error!(service = "peluqueria", event = "runtime_build_failed", error = %e, "cannot build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = "peluqueria",
        event = "start",
        service_id = %proc_info.service_id,
        pid = proc_info.pid,
        version = env!("CARGO_PKG_VERSION"),
        threads = worker_threads.unwrap_or_default(),
        "booking server starting"
    );

    rt.block_on(serve_until_ctrl_c(proc_info))
}
