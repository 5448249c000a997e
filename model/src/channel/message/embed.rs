use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const COLOR_BLUE: u32 = 0x3498db;

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub embed_type: Option<EmbedType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<EmbedThumbnail>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum EmbedType {
    Rich,
    Image,
    Video,
    Gifv,
    Article,
    Link,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EmbedFooter {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EmbedThumbnail {
    pub url: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

impl Embed {
    pub fn new(title: impl Into<String>) -> Embed {
        Embed {
            title: Some(title.into()),
            embed_type: Some(EmbedType::Rich),
            ..Default::default()
        }
    }

    pub fn color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn thumbnail(mut self, url: Option<String>) -> Self {
        self.thumbnail = url.map(|url| EmbedThumbnail { url });
        self
    }

    pub fn inline_field(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.to_string(),
            inline: true,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_skips_empty_fields() {
        let embed = Embed::new("Info").color(COLOR_BLUE).inline_field("Roles", 3);
        let json = serde_json::to_value(&embed).unwrap();

        assert_eq!(json["type"], "rich");
        assert_eq!(json["fields"][0]["value"], "3");
        assert_eq!(json["fields"][0]["inline"], true);
        assert!(json.get("thumbnail").is_none());
        assert!(json.get("footer").is_none());
    }
}
