use std::path::PathBuf;

use streammux::config;
use streammux::router::Router;
use streammux::status::StatusPublisher;
use streammux::supervisor::Supervisor;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = config::cli::parse_args();

    let supervisor = match Supervisor::build(&args.streams, &args.muxes) {
        Ok(s) => s,
        Err(errors) => {
            for e in &errors {
                tracing::error!("{e}");
            }
            std::process::exit(1);
        }
    };

    let router = Router::new(supervisor.clone());
    router.wire_observers();

    tracing::info!(streams = supervisor.streams.len(), muxes = supervisor.muxes.len(), "starting streams");
    for stream in &supervisor.streams {
        stream.transport.start();
    }

    let report_path = args.report.map(PathBuf::from);
    let (status_publisher, status_rx) = StatusPublisher::new(supervisor.clone(), report_path);
    let status_task = tokio::spawn(status_publisher.run());

    let api_task = match &args.api {
        Some(spec) => match config::api_spec::parse_api_spec(spec) {
            Ok(api_spec) => {
                let state = streammux::api::AppState {
                    supervisor: supervisor.clone(),
                    status_rx,
                    version: streammux::version::info(),
                };
                let assets_dir = args.assets.clone().map(PathBuf::from);
                let app = streammux::api::build_router(state, assets_dir);
                let bind_addr = api_spec.bind_addr();
                match tokio::net::TcpListener::bind(&bind_addr).await {
                    Ok(listener) => {
                        tracing::info!(%bind_addr, "control API listening");
                        Some(tokio::spawn(async move {
                            let _ = axum::serve(listener, app).await;
                        }))
                    }
                    Err(e) => {
                        tracing::error!(%bind_addr, error = %e, "failed to bind control API");
                        std::process::exit(1);
                    }
                }
            }
            Err(e) => {
                tracing::error!("{e}");
                std::process::exit(1);
            }
        },
        None => None,
    };

    let router_result = tokio::select! {
        result = router.run() => result,
        _ = shutdown_signal() => {
            router.request_abort();
            Ok(())
        }
    };

    status_task.abort();
    if let Some(task) = api_task {
        task.abort();
    }
    tracing::info!("stopping streams");
    for stream in &supervisor.streams {
        stream.transport.stop();
    }

    match router_result {
        Ok(()) => {}
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

