#[tokio::main]
async fn main() {
    if let Err(e) = capsmooth::cli::run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
