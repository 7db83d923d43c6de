#[tokio::main]
async fn main() {
    if let Err(err) = gym_booking::run().await {
        eprintln!("gym-booking failed: {err}");
        std::process::exit(1);
    }
}
