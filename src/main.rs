use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = httpdebug::cli::Cli::parse();
    if let Err(e) = httpdebug::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
