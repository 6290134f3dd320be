//! Dual-form identifier resolution
//!
//! The API exposes the same entities through a plain integer-keyed type and
//! a relay-style node type whose ids are opaque base64 tokens of
//! `"TypeName:databaseId"`. Mutations accept identifiers in either form;
//! [`resolve_id`] collapses both into the internal numeric primary key.

use crate::core::error::{CrmResult, IdentifierError};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

/// Encode a relay-style global identifier
pub fn encode_global_id(type_name: &str, id: i64) -> String {
    STANDARD.encode(format!("{}:{}", type_name, id))
}

/// Decode a relay-style global identifier into (type name, database id).
///
/// Splits on the last `:` so type names containing colons still resolve.
/// Returns `None` for anything that is not base64 of `"TypeName:integer"`.
pub fn decode_global_id(token: &str) -> Option<(String, i64)> {
    let bytes = STANDARD.decode(token).ok()?;
    let decoded = String::from_utf8(bytes).ok()?;
    let (type_name, raw_id) = decoded.rsplit_once(':')?;
    if type_name.is_empty() {
        return None;
    }
    let id = raw_id.parse::<i64>().ok()?;
    Some((type_name.to_string(), id))
}

/// Resolve a client-supplied identifier into a database id.
///
/// Resolution order: plain integer (JSON number or digit string) first,
/// then global-id decoding. The embedded type name is not checked against
/// `label`: either exposed form of any entity id is accepted wherever an
/// id is expected, and the caller's referential lookup is the authority on
/// whether the row exists.
pub fn resolve_id(raw: Option<&Value>, label: &str) -> CrmResult<i64> {
    let value = match raw {
        None | Some(Value::Null) => {
            return Err(IdentifierError::Missing {
                label: label.to_string(),
            }
            .into());
        }
        Some(value) => value,
    };

    match value {
        Value::Number(n) => n.as_i64().ok_or_else(|| {
            IdentifierError::Malformed {
                label: label.to_string(),
            }
            .into()
        }),
        Value::String(s) => {
            if s.is_empty() {
                return Err(IdentifierError::Missing {
                    label: label.to_string(),
                }
                .into());
            }
            if let Ok(id) = s.parse::<i64>() {
                return Ok(id);
            }
            decode_global_id(s).map(|(_, id)| id).ok_or_else(|| {
                IdentifierError::Malformed {
                    label: label.to_string(),
                }
                .into()
            })
        }
        _ => Err(IdentifierError::Malformed {
            label: label.to_string(),
        }
        .into()),
    }
}
