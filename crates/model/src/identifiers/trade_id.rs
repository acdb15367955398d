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

//! Represents a valid trade match ID.

use std::fmt::{Debug, Display, Formatter};

use meridian_core::correctness::{FAILED, check_valid_string};
use ustr::Ustr;

define_identifier!(
    TradeId,
    "Represents a valid trade match ID (assigned by a trading venue)."
);

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::TradeId;

    #[rstest]
    fn test_string_reprs() {
        let id = TradeId::new("T-001");
        assert_eq!(id.as_str(), "T-001");
        assert_eq!(format!("{id}"), "T-001");
    }
}
