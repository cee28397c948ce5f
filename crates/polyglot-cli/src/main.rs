use std::process::ExitCode;

use polyglot_cli::app;

#[tokio::main]
async fn main() -> ExitCode {
    match app::run(std::env::args_os()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("polyglot: {e} [{}]", e.code());
            ExitCode::from(app::exit_status(&e))
        }
    }
}
