use std::process::ExitCode;

#[actix_web::main]
async fn main() -> ExitCode {
    match datafill_lib::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "datafill stopped");
            ExitCode::FAILURE
        }
    }
}
