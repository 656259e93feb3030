use calcdesk::api::cli::{self, Cli, Command};
use clap::Parser;

#[tokio::main]
async fn main() {
    env_logger::init();

    match Cli::parse().command {
        Command::Serve { port, faq_file } => {
            let catalog = cli::faq_catalog(faq_file.as_deref());
            if let Err(e) = calcdesk::api::run_http_server(port, catalog).await {
                eprintln!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Command::Calc(command) => match cli::run(command) {
            Ok(output) => println!("{output}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
    }
}
