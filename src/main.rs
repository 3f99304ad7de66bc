use act_zero::runtimes::tokio::spawn_actor;
use act_zero::call;
use external_agent::config::load_config;
use external_agent::registry::{report_status, NodeRegistry};
use tracing::subscriber::set_global_default;
use tracing::{error, info, info_span, warn};
use tracing_error::ErrorLayer;
use tracing_futures::Instrument;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

fn init_logging() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

    let subscriber = Registry::default()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer);

    set_global_default(subscriber)?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;
    let config = load_config()?;

    let node_registry = spawn_actor(NodeRegistry::new(config.node_registry.clone()));

    for agent in &config.agents {
        let node = match agent.build_node() {
            Ok(node) => node,
            Err(e) => {
                warn!(name = %agent.name, error = %e, "Skipping agent");
                continue;
            }
        };

        if let Err(e) = call!(node_registry.register_node(node)).await {
            error!(name = %agent.name, "Failed to register agent {:?}", e);
        }
    }

    let status_report = report_status(node_registry.downgrade(), config.status_report.interval)
        .instrument(info_span!("status_report"));

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("Shutting down");
        }
        result = status_report => {
            error!("Status report stopped, shutting down");
            result?;
        }
    }

    Ok(())
}
