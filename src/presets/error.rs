//! Rendering of logged errors

use crate::core::{format_by_field_type, Attr, Formatter, LoggedError, Value};

/// Expand the error stored under `key` into `{message, type, sources}`
///
/// `sources` lists the messages of the `source()` chain, outermost first.
///
/// ```
/// use rust_log_formatter::prelude::*;
///
/// let err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
/// let rule = error_formatter("error");
///
/// let rendered = rule.apply(&[], &Attr::error("error", err)).unwrap().unwrap();
/// assert_eq!(rendered.group_attrs()[0], Attr::new("message", "disk full"));
/// ```
pub fn error_formatter(key: impl Into<String>) -> Formatter {
    format_by_field_type::<LoggedError, _>(key, |err| {
        let sources = err
            .sources
            .iter()
            .enumerate()
            .map(|(index, source)| Attr::new(index.to_string(), source.as_str()));

        Value::group(vec![
            Attr::new("message", err.message.as_str()),
            Attr::new("type", err.type_name),
            Attr::group("sources", sources),
        ])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Outer(std::io::Error);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "could not close reader")
        }
    }

    impl std::error::Error for Outer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_error_rendered_as_group() {
        let err = Outer(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "file already closed",
        ));
        let rule = error_formatter("error");

        let rendered = rule.apply(&[], &Attr::error("error", err)).unwrap().unwrap();
        let attrs = rendered.group_attrs();

        assert_eq!(attrs[0], Attr::new("message", "could not close reader"));
        assert_eq!(attrs[1].key, "type");
        assert!(attrs[1].value.as_str().unwrap().ends_with("Outer"));
        assert_eq!(
            attrs[2],
            Attr::group("sources", vec![Attr::new("0", "file already closed")])
        );
    }

    #[test]
    fn test_other_keys_and_kinds_untouched() {
        let rule = error_formatter("error");
        let io = std::io::Error::new(std::io::ErrorKind::Other, "x");

        assert_eq!(rule.apply(&[], &Attr::error("cause", io)).unwrap(), None);
        assert_eq!(rule.apply(&[], &Attr::new("error", "text")).unwrap(), None);
    }
}
