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

//! Real-time and static clocks for driving component timestamps.

use std::fmt::Debug;

use chrono::Utc;
use meridian_core::{UnixNanos, datetime::NANOSECONDS_IN_MILLISECOND};

/// Provides a common clock abstraction for components.
pub trait Clock: Debug {
    /// Returns the current UNIX timestamp in nanoseconds.
    fn timestamp_ns(&self) -> UnixNanos;

    /// Returns the current UNIX timestamp in milliseconds.
    fn timestamp_ms(&self) -> u64 {
        self.timestamp_ns().as_u64() / NANOSECONDS_IN_MILLISECOND
    }

    /// Returns the current UNIX timestamp in seconds.
    fn timestamp(&self) -> f64 {
        self.timestamp_ns().as_f64() / 1e9
    }
}

/// A static test clock with a settable time.
#[derive(Debug, Default)]
pub struct TestClock {
    time: UnixNanos,
}

impl TestClock {
    /// Creates a new [`TestClock`] instance at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the clock to the given `to_time_ns`.
    pub fn set_time(&mut self, to_time_ns: UnixNanos) {
        self.time = to_time_ns;
    }

    /// Advances the clock by the given `delta_ns`.
    pub fn advance_time(&mut self, delta_ns: u64) {
        self.time += delta_ns;
    }
}

impl Clock for TestClock {
    fn timestamp_ns(&self) -> UnixNanos {
        self.time
    }
}

/// A real-time clock reading the system wall clock.
#[derive(Debug, Default)]
pub struct LiveClock;

impl LiveClock {
    /// Creates a new [`LiveClock`] instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for LiveClock {
    fn timestamp_ns(&self) -> UnixNanos {
        UnixNanos::from(Utc::now())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_test_clock_set_and_advance() {
        let mut clock = TestClock::new();
        assert_eq!(clock.timestamp_ns(), UnixNanos::default());

        clock.set_time(UnixNanos::from(1_000_000_000));
        assert_eq!(clock.timestamp_ns(), UnixNanos::from(1_000_000_000));
        assert_eq!(clock.timestamp_ms(), 1_000);

        clock.advance_time(500_000_000);
        assert_eq!(clock.timestamp_ns(), UnixNanos::from(1_500_000_000));
    }

    #[rstest]
    fn test_live_clock_monotonic_enough() {
        let clock = LiveClock::new();
        let t1 = clock.timestamp_ns();
        let t2 = clock.timestamp_ns();
        assert!(t2 >= t1);
    }
}
