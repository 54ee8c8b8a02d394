use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = sravni::cli::Cli::parse();
    if let Err(e) = sravni::cli::run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
