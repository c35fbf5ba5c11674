// src/main.rs

use confexec::{cli, logging, run};

#[tokio::main]
async fn main() {
    let args = cli::parse();
    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("confexec: {err:?}");
    }

    match run(args).await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            tracing::error!(error = %err, "confexec failed");
            eprintln!("confexec error: {err}");
            std::process::exit(err.exit_code());
        }
    }
}
