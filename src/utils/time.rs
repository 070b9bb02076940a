use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

pub fn to_rfc3339(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

pub fn from_rfc3339(s: &str) -> anyhow::Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc))
}

/// Accepts either a calendar date (`2024-03-01`, read as midnight UTC) or a
/// full RFC 3339 timestamp.
pub fn parse_flexible(s: &str) -> anyhow::Result<DateTime<Utc>> {
    let trimmed = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    from_rfc3339(trimmed)
}

pub fn to_date_string(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d").to_string()
}

pub mod flexible_date {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::to_rfc3339(*dt))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_flexible(&raw).map_err(serde::de::Error::custom)
    }
}
