#[tokio::main]
async fn main() {
    if let Err(err) = jb_api::run().await {
        tracing::error!(error = %err, "jb-api failed");
        std::process::exit(1);
    }
}
