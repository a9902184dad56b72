use chrono::DateTime;

use crate::ItemRecord;

/// Discord rejects embeds with more fields than this.
pub const MAX_FIELDS: usize = 25;

pub const BRAND_NAME: &str = "GW2 Gemstore Notifier";
pub const BRAND_URL: &str = "https://github.com/TJEEPOT/GW2-Gemstore-Notifier";
pub const BRAND_ICON_URL: &str = "https://wiki.guildwars2.com/images/e/eb/Gem.png";
/// Gem blue.
pub const MESSAGE_COLOR: u32 = 0x2B_73_C8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branding {
    pub name: String,
    pub url: String,
    pub icon_url: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            name: BRAND_NAME.to_string(),
            url: BRAND_URL.to_string(),
            icon_url: BRAND_ICON_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Channel-agnostic notification payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub title: String,
    pub description: String,
    pub url: String,
    pub color: u32,
    pub author: Branding,
    pub fields: Vec<MessageField>,
}

pub fn compose(matched: &[ItemRecord], source_url: &str, last_updated: &str) -> Message {
    let title = match matched.len() {
        1 => "1 item on your watch-list is on sale!".to_string(),
        n => format!("{n} items on your watch-list are on sale!"),
    };

    let fields = matched
        .iter()
        .take(MAX_FIELDS)
        .map(|record| MessageField {
            name: record.name.clone(),
            value: format!("{} Gems", record.cost),
            inline: true,
        })
        .collect::<Vec<_>>();

    let mut description = String::new();
    let overflow = matched.len().saturating_sub(MAX_FIELDS);
    if overflow > 0 {
        description.push_str(&format!("...and {overflow} more.\n\n"));
    }
    description.push_str(&format!(
        "Gem store data last updated {}.\n\
         Remove anything you have already bought from your watch-list to avoid repeat alerts.",
        display_timestamp(last_updated)
    ));

    Message {
        title,
        description,
        url: source_url.to_string(),
        color: MESSAGE_COLOR,
        author: Branding::default(),
        fields,
    }
}

/// `2023-08-25T14:03:11Z` -> `2023-08-25 14:03 UTC`; anything unparsable is shown as-is.
pub fn display_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(parsed) => parsed
            .with_timezone(&chrono::Utc)
            .format("%Y-%m-%d %H:%M UTC")
            .to_string(),
        Err(_) => raw.to_string(),
    }
}
