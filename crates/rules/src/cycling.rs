//! Transition counting over fixed time buckets.
//!
//! Works on a plain time-ordered sequence of `(timestamp, on)` samples and
//! knows nothing about tables. Rising edges (off→on) are found on the whole
//! series first, so a sample that opens a bucket is compared against the
//! last sample of the previous bucket. Each edge is then counted in the
//! bucket its timestamp falls into.
//!
//! Buckets are aligned to multiples of the width since the Unix epoch, so
//! hourly buckets start on the hour. Every bucket between the first and the
//! last sample is reported, including empty ones.

use chrono::{DateTime, Duration, Utc};
use hwplant_core::{FaultError, Result};

/// Width of the cycling rules' buckets.
pub fn hourly() -> Duration {
    Duration::hours(1)
}

/// Transitions observed in one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketCount {
    pub start: DateTime<Utc>,
    pub transitions: u32,
}

/// Mark each sample that is on while the sample before it is not.
///
/// The first sample has no predecessor and counts as an edge when on.
pub fn rising_edges(states: &[bool]) -> Vec<bool> {
    states
        .iter()
        .enumerate()
        .map(|(i, &on)| on && (i == 0 || !states[i - 1]))
        .collect()
}

/// Start of the bucket containing `ts`.
pub fn bucket_start(ts: DateTime<Utc>, width: Duration) -> Result<DateTime<Utc>> {
    let secs = width.num_seconds();
    if secs <= 0 {
        return Err(FaultError::Table(format!(
            "bucket width must be at least one second, got {width}"
        )));
    }
    let start = ts.timestamp().div_euclid(secs) * secs;
    DateTime::from_timestamp(start, 0)
        .ok_or_else(|| FaultError::Table(format!("timestamp {ts} is out of range")))
}

/// Start of every bucket spanned by a sorted index, first to last inclusive.
pub fn bucket_starts(index: &[DateTime<Utc>], width: Duration) -> Result<Vec<DateTime<Utc>>> {
    let (Some(&first), Some(&last)) = (index.first(), index.last()) else {
        return Ok(Vec::new());
    };
    let first = bucket_start(first, width)?;
    let last = bucket_start(last, width)?;
    if last < first {
        return Err(FaultError::Table("index is not sorted".to_string()));
    }

    let count = (last - first).num_seconds() / width.num_seconds() + 1;
    let mut starts = Vec::with_capacity(count as usize);
    let mut current = first;
    while current <= last {
        starts.push(current);
        current += width;
    }
    Ok(starts)
}

/// Count rising edges per bucket.
///
/// `samples` must be sorted by timestamp. The result has one entry per
/// bucket from [`bucket_starts`].
pub fn count_transitions(
    samples: &[(DateTime<Utc>, bool)],
    width: Duration,
) -> Result<Vec<BucketCount>> {
    if let Some(pos) = samples.windows(2).position(|w| w[1].0 < w[0].0) {
        return Err(FaultError::Table(format!(
            "samples are not sorted: {} follows {}",
            samples[pos + 1].0,
            samples[pos].0
        )));
    }

    let index: Vec<DateTime<Utc>> = samples.iter().map(|(ts, _)| *ts).collect();
    let mut buckets: Vec<BucketCount> = bucket_starts(&index, width)?
        .into_iter()
        .map(|start| BucketCount {
            start,
            transitions: 0,
        })
        .collect();
    let Some(first) = buckets.first().map(|b| b.start) else {
        return Ok(buckets);
    };

    let states: Vec<bool> = samples.iter().map(|(_, on)| *on).collect();
    let width_secs = width.num_seconds();
    for (ts, edge) in index.iter().zip(rising_edges(&states)) {
        if !edge {
            continue;
        }
        let offset = (bucket_start(*ts, width)? - first).num_seconds() / width_secs;
        buckets[offset as usize].transitions += 1;
    }
    Ok(buckets)
}
