#[tokio::main]
async fn main() {
    if let Err(e) = ratings_backend::start_server().await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
