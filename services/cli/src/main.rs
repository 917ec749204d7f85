use talent_onboarding_cli::{failure_report, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{}", failure_report(&err));
        std::process::exit(1);
    }
}
