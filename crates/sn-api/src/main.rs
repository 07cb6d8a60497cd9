#[tokio::main]
async fn main() {
    if let Err(err) = sn_api::run().await {
        tracing::error!(error = %err, "sn-api failed");
        eprintln!("sn-api failed: {err}");
        std::process::exit(1);
    }
}
