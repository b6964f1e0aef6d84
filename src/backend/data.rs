//! Demo data generation for `/api/data`.

use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::utils::iso_timestamp;

/// Items generated when no `count` is supplied.
pub const DEFAULT_COUNT: usize = 10;

/// Probability that a generated item is flagged as an error.
pub const ERROR_RATE: f64 = 0.2;

/// Status of a generated item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ItemStatus {
    /// Healthy item.
    Ok,
    /// Simulated failure.
    Error,
}

/// One generated record. Never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataItem {
    /// 1-based position in the batch.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Generation time.
    pub timestamp: String,
    /// Simulated outcome.
    pub status: ItemStatus,
}

/// A generated batch and how many of its items are errors.
#[derive(Debug, Clone, PartialEq)]
pub struct DataBatch {
    /// Generated items.
    pub items: Vec<DataItem>,
    /// Number of items with [`ItemStatus::Error`].
    pub errors: u64,
}

/// Parse the `count` query value.
///
/// Behaves like a lenient base-10 integer parse: leading whitespace is
/// skipped, an optional sign is accepted and parsing stops at the first
/// non-digit (`"12abc"` is 12). Input without leading digits and negative
/// values yield 0 rather than an error. A missing value yields
/// [`DEFAULT_COUNT`]. The result never exceeds `max`.
pub fn parse_count(raw: Option<&str>, max: usize) -> usize {
    let Some(raw) = raw else {
        return DEFAULT_COUNT.min(max);
    };

    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digit_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digit_len == 0 || negative {
        return 0;
    }

    // Only overflow can fail here.
    rest[..digit_len]
        .parse::<usize>()
        .unwrap_or(usize::MAX)
        .min(max)
}

/// Generate `count` items, each independently flagged as an error with
/// probability `error_rate`.
pub fn generate_items<R: Rng>(count: usize, error_rate: f64, rng: &mut R) -> DataBatch {
    let error_rate = error_rate.clamp(0.0, 1.0);
    let timestamp = iso_timestamp();

    let items: Vec<DataItem> = (1..=count as u64)
        .map(|id| DataItem {
            id,
            name: format!("Item {}", id),
            timestamp: timestamp.clone(),
            status: if rng.gen_bool(error_rate) {
                ItemStatus::Error
            } else {
                ItemStatus::Ok
            },
        })
        .collect();

    let errors = items
        .iter()
        .filter(|item| item.status == ItemStatus::Error)
        .count() as u64;

    DataBatch { items, errors }
}
