//! Masking rules for personal data

use crate::core::{format_by_key, Attr, Formatter, Value, DEFAULT_MAX_RESOLVE_DEPTH};

/// Replacement written in place of masked data
pub const MASK: &str = "*******";

/// Strings up to this many characters are masked entirely
const FULL_MASK_MAX_CHARS: usize = 5;

/// Leading characters kept visible on longer strings
const VISIBLE_CHARS: usize = 4;

/// Replace the value of every attribute named `key` with [`MASK`]
pub fn ip_address_formatter(key: impl Into<String>) -> Formatter {
    format_by_key(key, |_| Value::string(MASK))
}

/// Mask the value under `key`, walking into groups field by field
///
/// Fields named `id`, `*_id` or `*-id` (any case) are kept. Other strings
/// keep their first four characters unless they are five characters or
/// shorter; every other kind is masked entirely.
///
/// ```
/// use rust_log_formatter::prelude::*;
///
/// let rule = pii_formatter("user");
/// let user = Attr::group("user", vec![
///     Attr::new("id", "abc-123"),
///     Attr::new("email", "foobar@example.com"),
/// ]);
///
/// let masked = rule.apply(&[], &user).unwrap().unwrap();
/// assert_eq!(masked, Value::group(vec![
///     Attr::new("id", "abc-123"),
///     Attr::new("email", "foob*******"),
/// ]));
/// ```
pub fn pii_formatter(key: impl Into<String>) -> Formatter {
    let key = key.into();
    let anchor = key.clone();
    format_by_key(key, move |value| hide_pii(&anchor, value.clone()))
}

fn is_identifier(key: &str) -> bool {
    let key = key.to_lowercase();
    key == "id" || key.ends_with("_id") || key.ends_with("-id")
}

fn hide_pii(key: &str, value: Value) -> Value {
    let value = match value.resolve(DEFAULT_MAX_RESOLVE_DEPTH) {
        Ok(value) => value,
        Err(_) => return Value::string(MASK),
    };

    if let Value::Group(children) = value {
        return Value::Group(
            children
                .into_iter()
                .map(|child| {
                    let masked = hide_pii(&child.key, child.value);
                    Attr {
                        key: child.key,
                        value: masked,
                    }
                })
                .collect(),
        );
    }

    if is_identifier(key) {
        return value;
    }

    match value {
        Value::String(s) if s.chars().count() > FULL_MASK_MAX_CHARS => {
            let visible: String = s.chars().take(VISIBLE_CHARS).collect();
            Value::String(visible + MASK)
        }
        _ => Value::string(MASK),
    }
}
