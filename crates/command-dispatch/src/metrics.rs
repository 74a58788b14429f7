use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

#[derive(Clone)]
pub struct SessionMetrics {
    pub registry: Registry,
    pub sessions: IntCounter,
    pub received: IntCounter,
    pub dispatched: IntCounter,
    pub ignored: IntCounter,
    pub rejected: IntCounter,
}

impl SessionMetrics {
    pub fn new() -> Result<Self, String> {
        let counter = |name: &str, help: &str| {
            IntCounter::new(name, help).map_err(|e| format!("metrics init error: {e}"))
        };
        let sessions = counter("robot_link_sessions", "Sessions started")?;
        let received = counter("robot_link_frames_received", "Frames received from the peer")?;
        let dispatched = counter(
            "robot_link_commands_dispatched",
            "Commands executed and acknowledged",
        )?;
        let ignored = counter(
            "robot_link_commands_ignored",
            "Commands addressed to another robot",
        )?;
        let rejected = counter(
            "robot_link_frames_rejected",
            "Frames discarded as malformed or invalid",
        )?;

        let registry = Registry::new();
        for c in [&sessions, &received, &dispatched, &ignored, &rejected] {
            let _ = registry.register(Box::new(c.clone()));
        }
        Ok(Self {
            registry,
            sessions,
            received,
            dispatched,
            ignored,
            rejected,
        })
    }

    pub fn encode_text(&self) -> String {
        let mut buf = Vec::new();
        let encoder = TextEncoder::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buf) {
            return format!("error encoding metrics: {e}");
        }
        String::from_utf8(buf).unwrap_or_default()
    }
}
