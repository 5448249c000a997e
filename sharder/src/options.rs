use crate::gateway::Intents;

pub struct Options {
    pub token: Box<str>,
    pub intents: Intents,
}

impl Options {
    pub fn new(token: impl Into<Box<str>>) -> Options {
        Options {
            token: token.into(),
            intents: Intents::GUILDS,
        }
    }
}
