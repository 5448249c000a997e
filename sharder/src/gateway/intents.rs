use serde::{Serialize, Serializer};

/// Gateway intent bits sent with IDENTIFY. Slash commands only need `GUILDS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intents(pub u64);

impl Intents {
    pub const GUILDS: Intents = Intents(1 << 0);
}

impl Serialize for Intents {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.0)
    }
}
