use crate::node::{ExternalNode, ValidationError};
use crate::AppConfig;
use anyhow::Context;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use std::time::Duration;

#[derive(Deserialize, Debug)]
pub struct Config {
    pub node_registry: NodeRegistry,
    pub status_report: StatusReport,
    #[serde(default)]
    pub agents: Vec<Agent>,
}

#[derive(Clone, Deserialize, Debug)]
pub struct NodeRegistry {
    #[serde(with = "humantime_serde")]
    pub retention_check_interval: Duration,
}

#[derive(Clone, Deserialize, Debug)]
pub struct StatusReport {
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
}

#[derive(Clone, Deserialize, Debug)]
pub struct Agent {
    pub name: String,
    #[serde(default)]
    pub host: Option<String>,
}

impl Agent {
    pub fn build_node(&self) -> Result<ExternalNode, ValidationError> {
        ExternalNode::new(&self.name, self.host.as_deref().unwrap_or_default())
    }
}

pub fn load_config() -> anyhow::Result<AppConfig> {
    let config_path = get_config_path();
    let file = File::open(&config_path)
        .with_context(|| format!("Failed to open config file {}", &config_path))?;

    let config = serde_yaml::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse config file {}", &config_path))?;

    Ok(Arc::new(config))
}

fn get_config_path() -> String {
    use std::env;
    use tracing::info;

    env::var("APP_CONFIG").unwrap_or_else(|e| {
        info!(
            error = %e,
            "Missing or invalid APP_CONFIG env var, fallback to config.yml"
        );
        "config.yml".to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
node_registry:
  retention_check_interval: 30s
status_report:
  interval: 1m
agents:
  - name: w1
    host: " h1 "
  - name: w2
  - name: "  "
    host: h3
"#;

    #[test]
    fn test_parse_config() -> Result<(), Box<dyn std::error::Error>> {
        let config: Config = serde_yaml::from_str(CONFIG)?;

        assert_eq!(
            Duration::from_secs(30),
            config.node_registry.retention_check_interval
        );
        assert_eq!(Duration::from_secs(60), config.status_report.interval);
        assert_eq!(3, config.agents.len());

        let w1 = config.agents[0].build_node()?;
        assert_eq!("w1", w1.name());
        assert_eq!(Some("h1"), w1.host());

        let w2 = config.agents[1].build_node()?;
        assert_eq!(None, w2.host());

        assert_eq!(
            ValidationError::BlankName,
            config.agents[2].build_node().unwrap_err()
        );

        Ok(())
    }

    #[test]
    fn test_agents_are_optional() -> Result<(), Box<dyn std::error::Error>> {
        let config: Config = serde_yaml::from_str(
            "node_registry:\n  retention_check_interval: 5s\nstatus_report:\n  interval: 10s\n",
        )?;

        assert!(config.agents.is_empty());

        Ok(())
    }
}
