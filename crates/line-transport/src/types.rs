use time::OffsetDateTime;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Timestamp(pub OffsetDateTime);

impl Timestamp {
    pub fn now() -> Self {
        Timestamp(OffsetDateTime::now_utc())
    }
}

/// One received frame. Lives for a single receive cycle.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawMessage {
    pub payload: Vec<u8>,
    pub received_at: Timestamp,
}

impl RawMessage {
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: payload.into(),
            received_at: Timestamp::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Lossy text view for logging.
    pub fn text_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }
}
