pub mod api;
pub mod assets;
pub mod router;

use anyhow::Result;

use crate::app::SharedState;

/// Start the axum HTTP server. Runs until Ctrl+C.
pub async fn start_server(state: SharedState) -> Result<()> {
    let port = state.server_port();
    let app = router::create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Subdeck listening on http://{}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}
