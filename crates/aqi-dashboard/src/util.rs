//! Small shared helpers.

use chrono::Local;
use time::UtcOffset;

/// The viewer's current UTC offset, or UTC if it cannot be represented.
pub fn local_offset() -> UtcOffset {
    let seconds = Local::now().offset().local_minus_utc();
    UtcOffset::from_whole_seconds(seconds).unwrap_or(UtcOffset::UTC)
}
