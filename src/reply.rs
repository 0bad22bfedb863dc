//! Outgoing chat payload produced by every game operation.

use serde::{Deserialize, Serialize};

/// A message the transport should post back into the chat.
///
/// `mentions` carries full player ids so the transport can turn `@name` text into real
/// mentions. `image` is a best-effort board picture link; `board_text` is the monospace
/// fallback that is always available.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mentions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_text: Option<String>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Reply {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_mentions<I, S>(mut self, mentions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mentions = mentions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }

    pub fn with_board_text(mut self, board: String) -> Self {
        self.board_text = Some(board);
        self
    }
}

/// Display handle for a player id: the part before `@`.
pub fn mention_name(player_id: &str) -> &str {
    player_id.split('@').next().unwrap_or(player_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mention_name_strips_server_suffix() {
        assert_eq!(mention_name("5511999990000@s.whatsapp.net"), "5511999990000");
        assert_eq!(mention_name("plain"), "plain");
    }

    #[test]
    fn empty_extras_are_not_serialized() {
        let json = serde_json::to_string(&Reply::text("hi")).unwrap();
        assert_eq!(json, r#"{"text":"hi"}"#);
    }
}
