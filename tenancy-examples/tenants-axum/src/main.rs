use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let app = tenants_axum::build(tenants_axum::load_config())?;

    let host = app
        .config
        .get_string("http.host")
        .unwrap_or_else(|| "127.0.0.1".to_string());

    let port = app
        .config
        .get_string("http.port")
        .unwrap_or_else(|| "3036".to_string());

    let addr = format!("{host}:{port}");

    println!("[tenants] listening on http://{addr}");

    app.listen(addr).await?;

    Ok(())
}
