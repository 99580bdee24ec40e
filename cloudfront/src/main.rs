use std::process::ExitCode;

use cloudfront_cert::{execute, provider::cli::AwsCliProvider};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
pub async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let mut stdout = std::io::stdout();
    match execute(|key| std::env::var_os(key), AwsCliProvider::from_config, &mut stdout).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            println!("{}", e.report_line());
            ExitCode::FAILURE
        }
    }
}
