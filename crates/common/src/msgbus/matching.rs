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

//! Topic pattern matching for message bus subscriptions.

use ustr::Ustr;

/// Returns whether the `topic` matches the subscription `pattern`.
///
/// The pattern may contain the wildcards:
/// - `*` matching any sequence of characters (including none).
/// - `?` matching any single character.
#[must_use]
pub fn is_matching(topic: &Ustr, pattern: &Ustr) -> bool {
    let topic = topic.as_bytes();
    let pattern = pattern.as_bytes();

    let mut t = 0;
    let mut p = 0;
    let mut star: Option<(usize, usize)> = None;

    while t < topic.len() {
        if p < pattern.len() && (pattern[p] == b'?' || pattern[p] == topic[t]) {
            t += 1;
            p += 1;
        } else if p < pattern.len() && pattern[p] == b'*' {
            star = Some((p, t));
            p += 1;
        } else if let Some((star_p, star_t)) = star {
            // Backtrack: let the last star consume one more character
            p = star_p + 1;
            t = star_t + 1;
            star = Some((star_p, star_t + 1));
        } else {
            return false;
        }
    }

    while p < pattern.len() && pattern[p] == b'*' {
        p += 1;
    }

    p == pattern.len()
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("events.order.SIM", "events.order.*", true)]
    #[case("events.order.SIM.001", "events.order.*", true)]
    #[case("events.position.SIM", "events.order.*", false)]
    #[case("data.quotes.SIM.AUD/USD", "data.quotes.*", true)]
    #[case("data.bars.AUD/USD.SIM-1-MINUTE-BID-EXTERNAL", "data.bars.*EXTERNAL", true)]
    #[case("data.bars.AUD/USD.SIM-1-MINUTE-BID-INTERNAL", "data.bars.*EXTERNAL", false)]
    #[case("events.account.SIM-001", "events.account.*", true)]
    #[case("a.b", "a.?", true)]
    #[case("a.bc", "a.?", false)]
    #[case("exact.topic", "exact.topic", true)]
    #[case("exact.topic2", "exact.topic", false)]
    fn test_is_matching(#[case] topic: &str, #[case] pattern: &str, #[case] expected: bool) {
        assert_eq!(
            is_matching(&Ustr::from(topic), &Ustr::from(pattern)),
            expected
        );
    }
}
