use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Distinguishes an omitted field (`None`) from an explicit `null` (`Some(None)`).
pub fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Lenient timestamp parsing. Anything unparseable becomes `None`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Resolves a patch timestamp: omitted stays omitted, null or garbage clears.
pub fn patch_timestamp(field: &Option<Option<String>>) -> Option<Option<DateTime<Utc>>> {
    field
        .as_ref()
        .map(|value| value.as_deref().and_then(parse_timestamp))
}

pub fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "nullable")]
        notas: Option<Option<String>>,
    }

    #[test]
    fn omitted_null_and_value_are_distinct() {
        let omitted: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(omitted.notas, None);
        let cleared: Patch = serde_json::from_str(r#"{"notas": null}"#).unwrap();
        assert_eq!(cleared.notas, Some(None));
        let set: Patch = serde_json::from_str(r#"{"notas": "tela azul"}"#).unwrap();
        assert_eq!(set.notas, Some(Some("tela azul".into())));
    }

    #[test]
    fn parses_common_timestamp_shapes() {
        let rfc = parse_timestamp("2026-03-01T10:30:00-06:00").unwrap();
        assert_eq!(rfc.hour(), 16);
        let spaced = parse_timestamp("2026-03-01 08:15:00").unwrap();
        assert_eq!(spaced.minute(), 15);
        let date_only = parse_timestamp("2026-03-01").unwrap();
        assert_eq!((date_only.month(), date_only.day(), date_only.hour()), (3, 1, 0));
    }

    #[test]
    fn invalid_dates_become_absent() {
        assert_eq!(parse_timestamp("next tuesday"), None);
        assert_eq!(parse_timestamp("2026-13-45"), None);
        assert_eq!(parse_timestamp("   "), None);
        assert_eq!(
            patch_timestamp(&Some(Some("not a date".into()))),
            Some(None)
        );
        assert_eq!(patch_timestamp(&None), None);
    }

    #[test]
    fn trims_blank_strings_away() {
        assert_eq!(trimmed(Some("  ".into())), None);
        assert_eq!(trimmed(Some(" Ana ".into())), Some("Ana".into()));
    }
}
