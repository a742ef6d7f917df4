use aws_config::BehaviorVersion;
use aws_lambda_events::event::sns::SnsEvent;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use newrelic_event_forwarder::clients::Clients;
use newrelic_event_forwarder::config::Config;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    newrelic_event_forwarder::set_up_logging();

    info!(
        "Initializing {} version {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let clients = Clients::new(&aws_config)?;
    let config = Config::load_from_env();

    run(service_fn(|request: LambdaEvent<SnsEvent>| {
        newrelic_event_forwarder::function_handler(
            &clients.secrets,
            &clients.http,
            &config,
            request,
        )
    }))
    .await
}
