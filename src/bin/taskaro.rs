use anyhow::Result;
use taskaro::cli::{
    actions::{server, Action},
    start, telemetry,
};

#[tokio::main]
async fn main() -> Result<()> {
    let action = start::start()?;

    let result = match action {
        Action::Server(args) => server::execute(args).await,
    };

    telemetry::shutdown_tracer();

    result
}
