use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub const ANONYMOUS_NAME: &str = "Anonymous";
pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 10;

/// A rating as returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub name: String,
    pub rating: i32,
    pub created_at: String,
}

/// A validated rating ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRating {
    pub id: i64,
    pub name: String,
    pub rating: i32,
}

/// A row as read back from the store, before timestamp normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingRow {
    pub name: String,
    pub rating: i32,
    pub created_at: StoredTimestamp,
}

/// The shapes a `created_at` value can arrive in.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredTimestamp {
    Temporal(DateTime<Utc>),
    EpochSeconds(f64),
    EpochMicros(i64),
    Unreadable(String),
}

impl StoredTimestamp {
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            StoredTimestamp::Temporal(dt) => Some(*dt),
            StoredTimestamp::EpochSeconds(secs) => {
                if !secs.is_finite() {
                    return None;
                }
                let whole = secs.floor();
                if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
                    return None;
                }
                let nanos = ((secs - whole) * 1_000_000_000.0).round() as u32;
                // Rounding can land exactly on the next second.
                let (whole, nanos) = if nanos >= 1_000_000_000 {
                    (whole as i64 + 1, 0)
                } else {
                    (whole as i64, nanos)
                };
                DateTime::from_timestamp(whole, nanos)
            }
            StoredTimestamp::EpochMicros(micros) => DateTime::from_timestamp_micros(*micros),
            StoredTimestamp::Unreadable(_) => None,
        }
    }

    /// Canonical UTC string for this value, or `now` when it cannot be read.
    pub fn normalize(&self, now: DateTime<Utc>) -> String {
        let dt = self.to_utc().unwrap_or_else(|| {
            tracing::warn!("Error converting timestamp {:?}, using current time", self);
            now
        });
        format_timestamp(dt)
    }
}

/// RFC 3339 in UTC with a `Z` suffix and either no fraction or exactly six
/// fractional digits.
pub fn format_timestamp(dt: DateTime<Utc>) -> String {
    let format = if dt.timestamp_subsec_micros() == 0 {
        SecondsFormat::Secs
    } else {
        SecondsFormat::Micros
    };
    dt.to_rfc3339_opts(format, true)
}

impl RatingRow {
    pub fn into_rating(self, now: DateTime<Utc>) -> Rating {
        Rating {
            created_at: self.created_at.normalize(now),
            name: self.name,
            rating: self.rating,
        }
    }
}
