//! Shared plumbing for board pictures.
//!
//! Renderers turn a position into an image link served by an outside service. They run
//! after a move has been committed and never influence game state: any failure is logged
//! and the reply simply goes out without a picture.

use log::warn;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use thiserror::Error;

/// Upper bound for a generated image link; chat transports reject longer previews.
pub const MAX_LINK_BYTES: usize = 32 * 1024;

/// Characters escaped when embedding a document in a query string.
pub const QUERY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b'+')
    .add(b'/')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("image link is {len} bytes, limit is {limit}")]
    LinkTooLong { len: usize, limit: usize },
    #[error("cannot render position: {0}")]
    InvalidPosition(String),
    #[error("renderer unavailable: {0}")]
    Unavailable(String),
}

pub fn encode_query_value(raw: &str) -> String {
    utf8_percent_encode(raw, QUERY_VALUE).to_string()
}

/// Reject links longer than [MAX_LINK_BYTES].
pub fn checked_link(link: String) -> Result<String, RenderError> {
    if link.len() > MAX_LINK_BYTES {
        return Err(RenderError::LinkTooLong {
            len: link.len(),
            limit: MAX_LINK_BYTES,
        });
    }
    Ok(link)
}

/// Collapse a render result into an optional link, logging the failure path.
pub fn best_effort(game: &str, result: Result<String, RenderError>) -> Option<String> {
    match result {
        Ok(link) => Some(link),
        Err(e) => {
            warn!("{}: board render failed, replying without image: {}", game, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_encoding_escapes_markup() {
        let enc = encode_query_value("<svg width=\"4\"/>");
        assert!(!enc.contains('<'));
        assert!(!enc.contains('"'));
        assert!(enc.starts_with("%3Csvg%20width%3D%224%22"));
    }

    #[test]
    fn oversized_links_are_rejected() {
        let long = "x".repeat(MAX_LINK_BYTES + 1);
        assert!(matches!(
            checked_link(long),
            Err(RenderError::LinkTooLong { .. })
        ));
        assert_eq!(checked_link("ok".into()).unwrap(), "ok");
    }

    #[test]
    fn best_effort_drops_errors() {
        assert_eq!(best_effort("t", Ok("u".into())), Some("u".into()));
        assert_eq!(
            best_effort("t", Err(RenderError::Unavailable("down".into()))),
            None
        );
    }
}
