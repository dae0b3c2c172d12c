//! Default mode: build the pipeline and serve it.

use std::net::SocketAddr;

use crate::cli::Cli;
use crate::config::{self, model::total_steps};
use crate::error::HttpDebugError;
use crate::pipeline::build_service;
use crate::{handler, logging, middleware, server};

pub async fn execute(cli: Cli) -> Result<(), HttpDebugError> {
    logging::init(&cli.log_level, logging::resolve_format(cli.pretty, cli.json));

    let table = config::parse_args(&cli.config)?;
    let service = build_service(&table, &middleware::registry(), &handler::registry())?;
    let router = server::build_router(service, cli.max_body);

    let listener = tokio::net::TcpListener::bind(cli.addr).await?;
    let addr = listener.local_addr()?;

    tracing::info!(
        addr = %addr,
        paths = table.len(),
        steps = total_steps(&table),
        "httpdebug started"
    );

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(server::shutdown_signal())
    .await?;

    tracing::info!("httpdebug stopped");
    Ok(())
}
