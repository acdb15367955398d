// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2018-2026 Meridian Markets Pty Ltd. All rights reserved.
//  https://meridianmarkets.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Common datetime conversion functions.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::nanos::UnixNanos;

/// The number of milliseconds in one second.
pub const MILLISECONDS_IN_SECOND: u64 = 1_000;

/// The number of nanoseconds in one second.
pub const NANOSECONDS_IN_SECOND: u64 = 1_000_000_000;

/// The number of nanoseconds in one millisecond.
pub const NANOSECONDS_IN_MILLISECOND: u64 = 1_000_000;

/// The number of nanoseconds in one microsecond.
pub const NANOSECONDS_IN_MICROSECOND: u64 = 1_000;

/// Converts seconds to nanoseconds (ns).
#[must_use]
pub fn secs_to_nanos(secs: f64) -> u64 {
    (secs * NANOSECONDS_IN_SECOND as f64) as u64
}

/// Converts milliseconds (ms) to nanoseconds (ns).
#[must_use]
pub fn millis_to_nanos(millis: f64) -> u64 {
    (millis * NANOSECONDS_IN_MILLISECOND as f64) as u64
}

/// Converts nanoseconds (ns) to seconds.
#[must_use]
pub fn nanos_to_secs(nanos: u64) -> f64 {
    nanos as f64 / NANOSECONDS_IN_SECOND as f64
}

/// Converts nanoseconds (ns) to milliseconds (ms).
#[must_use]
pub const fn nanos_to_millis(nanos: u64) -> u64 {
    nanos / NANOSECONDS_IN_MILLISECOND
}

/// Converts a UNIX nanoseconds timestamp to an ISO 8601 (RFC 3339) format string.
#[must_use]
pub fn unix_nanos_to_iso8601(unix_nanos: UnixNanos) -> String {
    let datetime: DateTime<Utc> = unix_nanos.to_datetime_utc();
    datetime.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0.0, 0)]
    #[case(1.0, 1_000_000_000)]
    #[case(1.5, 1_500_000_000)]
    fn test_secs_to_nanos(#[case] value: f64, #[case] expected: u64) {
        assert_eq!(secs_to_nanos(value), expected);
    }

    #[rstest]
    #[case(0.0, 0)]
    #[case(1.0, 1_000_000)]
    #[case(250.0, 250_000_000)]
    fn test_millis_to_nanos(#[case] value: f64, #[case] expected: u64) {
        assert_eq!(millis_to_nanos(value), expected);
    }

    #[rstest]
    fn test_nanos_to_millis() {
        assert_eq!(nanos_to_millis(1_000_000_000), 1_000);
    }

    #[rstest]
    fn test_unix_nanos_to_iso8601() {
        let iso = unix_nanos_to_iso8601(UnixNanos::from(1_000_000_000));
        assert_eq!(iso, "1970-01-01T00:00:01.000000000Z");
    }
}
