#[derive(Debug, Clone)]
pub struct CloseEvent {
    pub status_code: u16,
    pub error: String,
}

impl CloseEvent {
    pub fn new(status_code: u16, error: String) -> Self {
        Self { status_code, error }
    }

    /// Authentication failures, bad shard or intent configuration: reconnecting can't help
    pub fn should_reconnect(&self) -> bool {
        !matches!(self.status_code, 4004 | 4010 | 4011 | 4012 | 4013 | 4014)
    }

    /// Whether the session survives this close and can be RESUMEd
    pub fn can_resume(&self) -> bool {
        !matches!(self.status_code, 1000 | 1001 | 4007 | 4009)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_codes() {
        assert!(!CloseEvent::new(4004, "Authentication failed.".into()).should_reconnect());
        assert!(!CloseEvent::new(4014, "Disallowed intent(s).".into()).should_reconnect());
        assert!(CloseEvent::new(4000, "Unknown error".into()).should_reconnect());
    }

    #[test]
    fn test_resumable_codes() {
        assert!(!CloseEvent::new(4009, "Session timed out.".into()).can_resume());
        assert!(CloseEvent::new(4008, "Rate limited.".into()).can_resume());
    }
}
