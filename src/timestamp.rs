//! Classic Mac OS timestamps: unsigned seconds since 1904-01-01 00:00:00 UTC.

/// Seconds between 1904-01-01 and 1970-01-01.
pub const MAC_TO_UNIX_EPOCH: i64 = 2_082_844_800;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Calendar date for a count of days since 1970-01-01 (proleptic Gregorian).
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

/// Formats as `MMM dd, yyyy, hh:mm:ss AM UTC`.
pub fn format_mac_timestamp(seconds: u32) -> String {
    let unix = seconds as i64 - MAC_TO_UNIX_EPOCH;
    let (year, month, day) = civil_from_days(unix.div_euclid(86_400));
    let secs_of_day = unix.rem_euclid(86_400);

    let hour = secs_of_day / 3600;
    let minute = (secs_of_day % 3600) / 60;
    let second = secs_of_day % 60;
    let (hour12, meridiem) = match hour {
        0 => (12, "AM"),
        1..=11 => (hour, "AM"),
        12 => (12, "PM"),
        _ => (hour - 12, "PM"),
    };

    format!(
        "{} {:02}, {}, {:02}:{:02}:{:02} {} UTC",
        MONTHS[(month - 1) as usize],
        day,
        year,
        hour12,
        minute,
        second,
        meridiem
    )
}
