use imwarp_app::{config::ServeArgs, server::build_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: ServeArgs = argh::from_env();
    let addr = args.addr();

    log::info!("🚀 Starting the server");
    log::info!("🔥 Listening on: http://{addr}");
    log::info!(
        "🔧 Upload limit {} MB, {:?} interpolation. Press Ctrl+C to stop the server",
        args.max_upload_mb,
        args.interpolation
    );

    let app = build_router(&args);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
