//! JSONP wire codec.

use serde_json::Value;
use siga_types::SigaError;

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonpBody {
    /// `<callback>(<json>)`.
    Callback {
        /// Name the server invoked.
        name: String,
        /// Argument passed to the callback.
        payload: Value,
    },
    /// A plain JSON document, as sent by backends that ignore `callback`.
    Bare(Value),
}

/// Append `callback=<id>` to `url`, using `&` when a query string is present.
pub fn with_callback(url: &str, id: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}callback={id}")
}

/// Decode a response body into a callback invocation or a bare document.
///
/// Accepts an optional `/**/` prefix, surrounding whitespace and a trailing
/// `;`, which is what script-serving backends commonly emit.
pub fn decode(body: &str) -> Result<JsonpBody, SigaError> {
    let mut text = body.trim();
    text = text.strip_prefix("/**/").unwrap_or(text).trim_start();
    text = text.strip_suffix(';').unwrap_or(text).trim_end();

    if text.is_empty() {
        return Err(SigaError::transport("empty response body"));
    }

    if text.starts_with('{') || text.starts_with('[') {
        let payload = serde_json::from_str(text)
            .map_err(|e| SigaError::transport(format!("invalid JSON body: {e}")))?;
        return Ok(JsonpBody::Bare(payload));
    }

    let open = text
        .find('(')
        .ok_or_else(|| SigaError::transport("response is neither JSON nor a callback invocation"))?;
    let name = text[..open].trim();
    if !is_callback_name(name) {
        return Err(SigaError::transport(format!("invalid callback name: {name:?}")));
    }
    let args = text[open + 1..]
        .strip_suffix(')')
        .ok_or_else(|| SigaError::transport("unterminated callback invocation"))?;
    let payload = serde_json::from_str(args.trim())
        .map_err(|e| SigaError::transport(format!("invalid callback payload: {e}")))?;

    Ok(JsonpBody::Callback { name: name.to_string(), payload })
}

fn is_callback_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.'))
}
