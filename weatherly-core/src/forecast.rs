//! Reduction of a flat 3-hour forecast feed into per-day and hourly views.
//!
//! Days are grouped by local calendar date rather than by a fixed stride
//! through the feed, so a change in the provider's sampling interval does
//! not shift which sample represents which day.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, TimeZone, Timelike};

use crate::model::{DayBucket, WeatherSample};

/// Days shown by the daily forecast unless the caller asks otherwise.
pub const DEFAULT_FORECAST_DAYS: usize = 7;

/// Slots shown by the hourly strip.
pub const DEFAULT_HOURLY_SLOTS: usize = 12;

const NOON: i32 = 12;

/// Pick one representative sample per calendar day, starting tomorrow.
///
/// `now` fixes both the reference instant and the viewer's time zone. For
/// each of the `days_requested` dates from tomorrow onward, the sample whose
/// local hour is closest to noon is kept; on a tie the one that appears first
/// in `samples` wins. Dates without samples are skipped, so the result may be
/// shorter than `days_requested`.
pub fn bucketize_daily<Tz: TimeZone>(
    samples: &[WeatherSample],
    days_requested: usize,
    now: &DateTime<Tz>,
) -> Vec<DayBucket> {
    let tz = now.timezone();
    let Some(tomorrow) = now.date_naive().succ_opt() else {
        return Vec::new();
    };

    // date -> (distance from noon, sample)
    let mut best: BTreeMap<NaiveDate, (i32, &WeatherSample)> = BTreeMap::new();

    for sample in samples {
        let Some(local) = sample.local_time(&tz) else {
            continue;
        };
        let date = local.date_naive();
        if date < tomorrow {
            continue;
        }
        let offset = (date - tomorrow).num_days();
        if offset >= days_requested as i64 {
            continue;
        }

        let distance = (local.hour() as i32 - NOON).abs();
        best.entry(date)
            .and_modify(|current| {
                if distance < current.0 {
                    *current = (distance, sample);
                }
            })
            .or_insert((distance, sample));
    }

    best.into_iter()
        .map(|(date, (_, sample))| DayBucket {
            day_offset: (date - tomorrow).num_days() as u32,
            date,
            representative_sample: sample.clone(),
        })
        .collect()
}

/// The next `count` slots of the feed, in feed order.
pub fn hourly_window(samples: &[WeatherSample], count: usize) -> &[WeatherSample] {
    &samples[..count.min(samples.len())]
}
