use std::collections::HashMap;

use base64::engine::{Engine, general_purpose::STANDARD as BASE64};
use sha1::{Digest, Sha1};

use crate::error::HandshakeError;

/// Fixed GUID concatenated with the client's key before hashing, per
/// [RFC 6455](https://www.rfc-editor.org/rfc/rfc6455#section-1.3).
const MAGIC_GUID: &str = "258EAFA5-E914-47DA-95CA-C5AB0DC85B11";

/// Request headers with lowercased names; values are kept verbatim.
pub(crate) type Headers = HashMap<String, String>;

/// Validates the upgrade headers and derives the accept key.
///
/// Header values are matched exactly: `Connection: Upgrade` and
/// `Upgrade: websocket`, no token-list parsing.
pub(crate) fn upgrade(headers: &Headers) -> Result<String, HandshakeError> {
    if headers.get("connection").map(String::as_str) != Some("Upgrade")
        || headers.get("upgrade").map(String::as_str) != Some("websocket")
    {
        return Err(HandshakeError::NotAnUpgradeRequest);
    }

    let key = headers
        .get("sec-websocket-key")
        .filter(|k| !k.is_empty())
        .ok_or(HandshakeError::MissingHandshakeKey)?;

    Ok(accept_key(key))
}

/// Derives `Sec-WebSocket-Accept` from the client's `Sec-WebSocket-Key`.
#[must_use]
pub fn accept_key(sec_websocket_key: &str) -> String {
    let mut sha = Sha1::new();
    sha.update(sec_websocket_key.as_bytes());
    sha.update(MAGIC_GUID.as_bytes());
    BASE64.encode(sha.finalize())
}

/// Renders the switching-protocols response for a derived accept key.
pub(crate) fn switching_protocols(accept_key: &str) -> String {
    format!(
        "HTTP/1.1 101 Switching Protocols\r\n\
         Upgrade: websocket\r\n\
         Connection: Upgrade\r\n\
         Sec-WebSocket-Accept: {accept_key}\r\n\r\n",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(entries: &[(&str, &str)]) -> Headers {
        entries
            .iter()
            .map(|(k, v)| (k.to_lowercase(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn rfc6455_sample_key() {
        // canonical vector from RFC 6455 section 1.3
        assert_eq!(
            accept_key("dGhlIHNhbXBsZSBub25jZQ=="),
            "s3pPLMBiTxaQ9kYGzzhZRbK+xOo="
        );
    }

    #[test]
    fn valid_upgrade_yields_accept_key() {
        let h = headers(&[
            ("Connection", "Upgrade"),
            ("Upgrade", "websocket"),
            ("Sec-WebSocket-Key", "dGhlIHNhbXBsZSBub25jZQ=="),
        ]);
        assert_eq!(upgrade(&h).unwrap(), "s3pPLMBiTxaQ9kYGzzhZRbK+xOo=");
    }

    #[test]
    fn missing_or_wrong_upgrade_headers_refused() {
        let cases = [
            headers(&[("Sec-WebSocket-Key", "abc")]),
            headers(&[("Connection", "Upgrade"), ("Sec-WebSocket-Key", "abc")]),
            headers(&[("Upgrade", "websocket"), ("Sec-WebSocket-Key", "abc")]),
            // values are matched case-sensitively
            headers(&[
                ("Connection", "upgrade"),
                ("Upgrade", "websocket"),
                ("Sec-WebSocket-Key", "abc"),
            ]),
            headers(&[
                ("Connection", "Upgrade"),
                ("Upgrade", "WebSocket"),
                ("Sec-WebSocket-Key", "abc"),
            ]),
            // token lists are not parsed
            headers(&[
                ("Connection", "keep-alive, Upgrade"),
                ("Upgrade", "websocket"),
                ("Sec-WebSocket-Key", "abc"),
            ]),
        ];
        for h in cases {
            assert!(matches!(
                upgrade(&h),
                Err(HandshakeError::NotAnUpgradeRequest)
            ));
        }
    }

    #[test]
    fn absent_or_empty_key_refused() {
        let absent = headers(&[("Connection", "Upgrade"), ("Upgrade", "websocket")]);
        assert!(matches!(
            upgrade(&absent),
            Err(HandshakeError::MissingHandshakeKey)
        ));

        let empty = headers(&[
            ("Connection", "Upgrade"),
            ("Upgrade", "websocket"),
            ("Sec-WebSocket-Key", ""),
        ]);
        assert!(matches!(
            upgrade(&empty),
            Err(HandshakeError::MissingHandshakeKey)
        ));
    }

    #[test]
    fn response_carries_accept_key() {
        let resp = switching_protocols("s3pPLMBiTxaQ9kYGzzhZRbK+xOo=");
        assert!(resp.starts_with("HTTP/1.1 101 Switching Protocols\r\n"));
        assert!(resp.contains("Upgrade: websocket\r\n"));
        assert!(resp.contains("Connection: Upgrade\r\n"));
        assert!(resp.contains("Sec-WebSocket-Accept: s3pPLMBiTxaQ9kYGzzhZRbK+xOo=\r\n"));
        assert!(resp.ends_with("\r\n\r\n"));
    }
}
