//! Classic Mac timestamps
//!
//! A Mac timestamp counts seconds since 1904-01-01 00:00:00 in local time,
//! stored as an unsigned 32-bit value. Conversions here work on naive
//! local wall-clock times, matching how the Finder and HFS record dates.

use chrono::{DateTime, Local, NaiveDateTime};

/// Seconds between 1904-01-01 and 1970-01-01
pub const MAC_EPOCH_OFFSET: i64 = 2_082_844_800;

/// Mac timestamp of a local wall-clock time, if it falls in the representable range
pub fn mac_timestamp_from_local(local: NaiveDateTime) -> Option<u32> {
    u32::try_from(local.and_utc().timestamp() + MAC_EPOCH_OFFSET).ok()
}

/// Local wall-clock time of a Mac timestamp
pub fn local_from_mac_timestamp(timestamp: u32) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(i64::from(timestamp) - MAC_EPOCH_OFFSET, 0).map(|dt| dt.naive_utc())
}

/// Mac timestamp of a Unix timestamp, taken in the local time zone
pub fn mac_timestamp_from_unix(unix: i64) -> Option<u32> {
    let local = DateTime::from_timestamp(unix, 0)?.with_timezone(&Local);
    mac_timestamp_from_local(local.naive_local())
}

/// Current time as a Mac timestamp
///
/// Saturates at the ends of the representable range.
pub fn mac_timestamp_now() -> u32 {
    let seconds = Local::now().naive_local().and_utc().timestamp() + MAC_EPOCH_OFFSET;
    seconds.clamp(0, i64::from(u32::MAX)) as u32
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, min, sec)
            .unwrap()
    }

    #[test]
    fn test_epochs() {
        assert_eq!(mac_timestamp_from_local(at(1904, 1, 1, 0, 0, 0)), Some(0));
        assert_eq!(
            mac_timestamp_from_local(at(1970, 1, 1, 0, 0, 0)),
            Some(MAC_EPOCH_OFFSET as u32)
        );
        assert_eq!(mac_timestamp_from_local(at(1903, 12, 31, 23, 59, 59)), None);
        assert_eq!(mac_timestamp_from_local(at(2040, 2, 6, 6, 28, 15)), Some(u32::MAX));
    }

    #[test]
    fn test_round_trip() {
        let moment = at(2012, 9, 23, 19, 14, 47);
        let timestamp = mac_timestamp_from_local(moment).unwrap();
        assert_eq!(local_from_mac_timestamp(timestamp), Some(moment));
    }

    #[test]
    fn test_now_is_recent() {
        // Anything after 2020-01-01
        assert!(mac_timestamp_now() > 3_660_681_600);
    }
}
