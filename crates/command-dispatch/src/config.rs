use crate::{Dispatcher, DEFAULT_DRIVE_SPEED_MMPS};
use anyhow::Context;
use line_transport::{Result as TransportResult, TcpTransport};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Robot-side link settings, usually loaded from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Name this robot answers to in the target field
    pub robot_name: String,
    /// Controller host to connect to
    pub host: String,
    pub port: u16,
    pub drive_speed_mmps: f64,
    /// Upper bound on each actuator action; unset waits forever
    pub action_timeout_ms: Option<u64>,
    pub connect_timeout_ms: Option<u64>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            robot_name: "CozmoName".to_string(),
            host: "127.0.0.1".to_string(),
            port: 5000,
            drive_speed_mmps: DEFAULT_DRIVE_SPEED_MMPS,
            action_timeout_ms: None,
            connect_timeout_ms: None,
        }
    }
}

impl LinkConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(self.robot_name.clone())
            .with_drive_speed(self.drive_speed_mmps)
            .with_action_timeout(self.action_timeout_ms.map(Duration::from_millis))
    }

    /// Connect to the controller. Failure is final; no retry is attempted.
    pub fn connect(&self) -> TransportResult<TcpTransport> {
        TcpTransport::connect(
            &self.addr(),
            self.connect_timeout_ms.map(Duration::from_millis),
        )
    }
}

pub fn load_config(path: impl AsRef<Path>) -> anyhow::Result<LinkConfig> {
    let path = path.as_ref();
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading config: {}", path.display()))?;
    let config: LinkConfig =
        serde_yaml::from_str(&raw).with_context(|| format!("parsing yaml: {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = LinkConfig::default();
        assert_eq!(config.addr(), "127.0.0.1:5000");
        assert_eq!(config.dispatcher().local_name(), "CozmoName");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "robot_name: Rover\nport: 6001\naction_timeout_ms: 2500")?;
        let config = load_config(file.path())?;
        assert_eq!(config.robot_name, "Rover");
        assert_eq!(config.port, 6001);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.action_timeout_ms, Some(2500));
        assert_eq!(config.drive_speed_mmps, DEFAULT_DRIVE_SPEED_MMPS);
        Ok(())
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = load_config("/definitely/not/here.yaml").unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/not/here.yaml"));
    }

    #[test]
    fn test_connect_failure_surfaces() -> anyhow::Result<()> {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
            listener.local_addr()?.port()
        };
        let config = LinkConfig {
            port,
            connect_timeout_ms: Some(1000),
            ..LinkConfig::default()
        };
        assert!(matches!(
            config.connect(),
            Err(line_transport::TransportError::ConnectFailed { .. })
        ));
        Ok(())
    }
}
