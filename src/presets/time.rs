//! Rules for `Time` values

use crate::core::{format_by_kind, Formatter, Kind, TimestampFormat, Value};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Resolution of a numeric Unix timestamp
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimestampPrecision {
    #[default]
    Seconds,
    Millis,
    Micros,
    Nanos,
}

impl TimestampPrecision {
    /// `None` when the instant does not fit an `i64` at this precision
    pub fn timestamp(&self, time: &DateTime<FixedOffset>) -> Option<i64> {
        match self {
            TimestampPrecision::Seconds => Some(time.timestamp()),
            TimestampPrecision::Millis => Some(time.timestamp_millis()),
            TimestampPrecision::Micros => Some(time.timestamp_micros()),
            TimestampPrecision::Nanos => time.timestamp_nanos_opt(),
        }
    }
}

/// Render every `Time` value as a string, optionally shifted to `offset` first
pub fn time_formatter(format: TimestampFormat, offset: Option<FixedOffset>) -> Formatter {
    format_by_kind(Kind::Time, move |value| match value.as_time() {
        Some(time) => {
            let time = offset.map_or(*time, |offset| time.with_timezone(&offset));
            Value::String(format.format(&time))
        }
        None => value.clone(),
    })
}

/// Replace every `Time` value with a Unix timestamp
///
/// Instants outside the representable range keep their original value.
pub fn unix_timestamp_formatter(precision: TimestampPrecision) -> Formatter {
    format_by_kind(Kind::Time, move |value| {
        match value.as_time().and_then(|time| precision.timestamp(time)) {
            Some(timestamp) => Value::Int64(timestamp),
            None => value.clone(),
        }
    })
}

/// Shift every `Time` value to `offset`, UTC when `None`
pub fn timezone_converter(offset: Option<FixedOffset>) -> Formatter {
    let offset = offset.unwrap_or_else(|| Utc.fix());
    format_by_kind(Kind::Time, move |value| match value.as_time() {
        Some(time) => Value::Time(time.with_timezone(&offset)),
        None => value.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Attr;
    use chrono::TimeZone;

    fn sample() -> DateTime<FixedOffset> {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        offset.with_ymd_and_hms(2023, 4, 10, 14, 0, 0).unwrap()
    }

    fn apply(rule: &Formatter, attr: &Attr) -> Option<Value> {
        rule.apply(&[], attr).unwrap()
    }

    #[test]
    fn test_time_formatter_in_original_offset() {
        let rule = time_formatter(TimestampFormat::Rfc3339, None);
        assert_eq!(
            apply(&rule, &Attr::time("at", sample())),
            Some(Value::from("2023-04-10T14:00:00+02:00"))
        );
    }

    #[test]
    fn test_time_formatter_shifted() {
        let rule = time_formatter(TimestampFormat::Rfc3339, Some(Utc.fix()));
        assert_eq!(
            apply(&rule, &Attr::time("at", sample())),
            Some(Value::from("2023-04-10T12:00:00+00:00"))
        );
    }

    #[test]
    fn test_time_formatter_nested_and_ignores_other_kinds() {
        let rule = time_formatter(TimestampFormat::Custom("%H:%M".to_string()), None);
        let attr = Attr::group(
            "job",
            vec![Attr::time("started", sample()), Attr::new("name", "sync")],
        );

        assert_eq!(
            apply(&rule, &attr),
            Some(Value::group(vec![
                Attr::new("started", "14:00"),
                Attr::new("name", "sync"),
            ]))
        );
        assert_eq!(apply(&rule, &Attr::new("name", "sync")), None);
    }

    #[test]
    fn test_unix_timestamp_precisions() {
        let attr = Attr::time("at", sample());
        let seconds = sample().timestamp();

        let cases = [
            (TimestampPrecision::Seconds, seconds),
            (TimestampPrecision::Millis, seconds * 1_000),
            (TimestampPrecision::Micros, seconds * 1_000_000),
            (TimestampPrecision::Nanos, seconds * 1_000_000_000),
        ];
        for (precision, expected) in cases {
            let rule = unix_timestamp_formatter(precision);
            assert_eq!(apply(&rule, &attr), Some(Value::Int64(expected)));
        }
    }

    #[test]
    fn test_timezone_converter_defaults_to_utc() {
        let rule = timezone_converter(None);
        let converted = apply(&rule, &Attr::time("at", sample())).unwrap();

        let time = converted.as_time().unwrap();
        assert_eq!(time.offset().local_minus_utc(), 0);
        assert_eq!(*time, sample());
    }

    #[test]
    fn test_timezone_converter_to_offset() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let rule = timezone_converter(Some(tokyo));
        let converted = apply(&rule, &Attr::time("at", sample())).unwrap();

        assert_eq!(converted.as_time().unwrap().offset(), &tokyo);
    }
}
