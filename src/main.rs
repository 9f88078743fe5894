//! `nbpilot` 바이너리 진입점.

use nbpilot::interface::cli::{AppComposition, Cli, error_kind, report_mismatch, run_action};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let action = match Cli::parse_action() {
        Ok(action) => action,
        Err(msg) => {
            eprintln!("error: {msg}");
            std::process::exit(2);
        }
    };

    let composition = AppComposition::default();

    if let Err(err) = run_action(&composition, action).await {
        if !report_mismatch(&err) {
            match error_kind(&err) {
                Some(kind) => eprintln!("error[{kind}]: {err:#}"),
                None => eprintln!("error: {err:#}"),
            }
        }
        std::process::exit(1);
    }
}
