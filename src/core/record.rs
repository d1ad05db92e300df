//! Log record structure

use super::attr::Attr;
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};

/// A log record: message, level and its attribute tree
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub time: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    pub attrs: Vec<Attr>,
}

impl Record {
    /// Record stamped with the current time; the message is kept verbatim
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            time: Utc::now(),
            level,
            message: message.into(),
            attrs: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attrs(mut self, attrs: impl IntoIterator<Item = Attr>) -> Self {
        self.attrs.extend(attrs);
        self
    }

    pub fn add_attr(&mut self, attr: Attr) {
        self.attrs.push(attr);
    }

    /// Same time, level and message with a different attribute list
    pub fn with_replaced_attrs(&self, attrs: Vec<Attr>) -> Self {
        Self {
            time: self.time,
            level: self.level,
            message: self.message.clone(),
            attrs,
        }
    }

    /// First top-level attribute named `key`
    pub fn attr(&self, key: &str) -> Option<&Attr> {
        self.attrs.iter().find(|attr| attr.key == key)
    }

    /// Render as a JSON object: `time`, `level`, `msg`, then the attributes
    pub fn to_json_value(&self) -> serde_json::Value {
        let mut object = serde_json::Map::new();
        object.insert(
            "time".to_string(),
            serde_json::Value::String(self.time.to_rfc3339()),
        );
        object.insert(
            "level".to_string(),
            serde_json::Value::String(self.level.as_str().to_string()),
        );
        object.insert(
            "msg".to_string(),
            serde_json::Value::String(self.message.clone()),
        );
        for attr in &self.attrs {
            object.insert(attr.key.clone(), attr.value.to_json_value());
        }
        serde_json::Value::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_kept_verbatim() {
        let record = Record::new(LogLevel::Info, "line1\nline2\tx");
        assert_eq!(record.message, "line1\nline2\tx");
        assert!(record.attrs.is_empty());
    }

    #[test]
    fn test_attr_lookup() {
        let record = Record::new(LogLevel::Warn, "m")
            .with_attrs(vec![Attr::new("a", 1), Attr::new("b", 2)]);
        assert_eq!(record.attr("b"), Some(&Attr::new("b", 2)));
        assert!(record.attr("c").is_none());
    }

    #[test]
    fn test_to_json_value() {
        let record = Record::new(LogLevel::Error, "boom").with_attrs(vec![Attr::group(
            "user",
            vec![Attr::new("id", 7)],
        )]);
        let json = record.to_json_value();
        assert_eq!(json["level"], "ERROR");
        assert_eq!(json["msg"], "boom");
        assert_eq!(json["user"]["id"], 7);
    }
}
