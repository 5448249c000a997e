use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct InvalidSession {
    #[serde(rename = "d", default)]
    pub is_resumable: bool,
}
