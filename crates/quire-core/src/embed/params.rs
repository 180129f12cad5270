use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Flags carried by an embed directive's query string
///
/// A flag is on when its key is present at all, whatever its value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedParams {
    /// Show the memo's snippet instead of its content
    pub snippet: bool,
    /// Drop the card framing and line clamp
    pub inline: bool,
}

impl EmbedParams {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let mut params = Self::default();

        for pair in raw.split('&').filter(|p| !p.is_empty()) {
            let key = pair.split_once('=').map_or(pair, |(k, _)| k);
            match decode_component(key).as_ref() {
                "snippet" => params.snippet = true,
                "inline" => params.inline = true,
                _ => {}
            }
        }
        params
    }
}

/// Form-urlencoded decoding: `+` is a space, bad UTF-8 is replaced
fn decode_component(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['%', '+']) {
        return Cow::Borrowed(raw);
    }
    let spaced = raw.replace('+', " ");
    Cow::Owned(String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned())
}

impl fmt::Display for EmbedParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.snippet, self.inline) {
            (true, true) => f.write_str("snippet&inline"),
            (true, false) => f.write_str("snippet"),
            (false, true) => f.write_str("inline"),
            (false, false) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(EmbedParams::parse(""), EmbedParams::default());
        assert_eq!(EmbedParams::parse("?"), EmbedParams::default());
    }

    #[test]
    fn test_flags_are_independent() {
        let p = EmbedParams::parse("snippet");
        assert!(p.snippet && !p.inline);

        let p = EmbedParams::parse("inline");
        assert!(!p.snippet && p.inline);

        let p = EmbedParams::parse("?snippet&inline");
        assert!(p.snippet && p.inline);
    }

    #[test]
    fn test_presence_not_value() {
        assert!(EmbedParams::parse("snippet=").snippet);
        assert!(EmbedParams::parse("snippet=0").snippet);
        assert!(EmbedParams::parse("snippet=false&&inline=no").inline);
    }

    #[test]
    fn test_keys_are_decoded() {
        assert!(EmbedParams::parse("%73nippet").snippet);
        assert!(!EmbedParams::parse("snip+pet").snippet);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        assert_eq!(EmbedParams::parse("full&width=3"), EmbedParams::default());
    }

    #[test]
    fn test_display_round_trips() {
        for raw in ["", "snippet", "inline", "snippet&inline"] {
            assert_eq!(EmbedParams::parse(raw).to_string(), raw);
        }
    }
}
