#[tokio::main]
async fn main() {
    qms::start_server().await;
}
