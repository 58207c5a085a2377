//! DateTime display utilities.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

use crate::models::filters::parse_instant;

/// A wrapper around `Timestamp` that formats it in the system timezone as
/// `YYYY-MM-DD HH:MM:SS TZ`.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl<'a> fmt::Display for LocalDateTime<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M:%S %Z")
        )
    }
}

/// A trip date as sent by the server, shown as `YYYY-MM-DD`.
///
/// Values that are neither RFC 3339 timestamps nor plain dates are printed
/// unchanged.
pub struct TripDate<'a>(pub &'a str);

impl<'a> fmt::Display for TripDate<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match parse_instant(self.0) {
            Some(instant) => write!(f, "{}", instant.to_zoned(TimeZone::UTC).strftime("%Y-%m-%d")),
            None => write!(f, "{}", self.0),
        }
    }
}
