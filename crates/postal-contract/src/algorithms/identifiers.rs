//! # Identifier Synthesis
//!
//! Tracking number layout (fixed widths):
//!
//! ```text
//! RR 17102026 001 344000 000001
//! |  |        |   |      +-- last 6 chars of the destination address
//! |  |        |   +--------- office code without its 2-char prefix, last 6 chars
//! |  |        +------------- shipmentCount + 1, zero padded to 3
//! |  +---------------------- creation date, DDMMYYYY (UTC)
//! +------------------------- prefix
//! ```
//!
//! Transfer ids are `<prefix><transferCount + 1>_<timestamp ms>`.

use crate::domain::{LedgerError, TrackNumber, TransferId};
use chrono::DateTime;

/// Width of the office and destination suffixes.
pub const SUFFIX_WIDTH: usize = 6;

/// Last `width` chars of `value`, left-padded with '0'.
fn fixed_suffix(value: &str, width: usize) -> String {
    let chars: Vec<char> = value.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(width)..].iter().collect();
    format!("{tail:0>width$}")
}

/// Office part of a tracking number.
fn office_suffix(office_id: &str) -> String {
    let code: String = office_id.chars().skip(2).collect();
    fixed_suffix(&code, SUFFIX_WIDTH)
}

/// Build a tracking number.
///
/// `sequence` is the post-increment shipment counter.
pub fn track_number(
    prefix: &str,
    now_secs: u64,
    sequence: u64,
    office_id: &str,
    to_address: &str,
) -> Result<TrackNumber, LedgerError> {
    let date = i64::try_from(now_secs)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(|| LedgerError::invalid(format!("timestamp {now_secs} out of range")))?;

    Ok(TrackNumber::new(format!(
        "{prefix}{}{sequence:03}{}{}",
        date.format("%d%m%Y"),
        office_suffix(office_id),
        fixed_suffix(to_address, SUFFIX_WIDTH),
    )))
}

/// Build a transfer id. `sequence` is the post-increment transfer counter.
pub fn transfer_id(prefix: &str, sequence: u64, timestamp_ms: u64) -> TransferId {
    TransferId::new(format!("{prefix}{sequence}_{timestamp_ms}"))
}
