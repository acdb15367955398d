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

//! Represents a valid strategy ID.

use std::fmt::{Debug, Display, Formatter};

use meridian_core::correctness::{FAILED, check_valid_string};
use ustr::Ustr;

define_identifier!(
    StrategyId,
    "Represents a valid strategy ID.\n\nMust be correctly formatted with two valid strings either side of a hyphen."
);

impl StrategyId {
    /// Returns an external strategy identifier.
    #[must_use]
    pub fn external() -> Self {
        Self(Ustr::from("EXTERNAL"))
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::StrategyId;

    #[rstest]
    fn test_string_reprs() {
        let id = StrategyId::new("EMA-CROSS-001");
        assert_eq!(id.as_str(), "EMA-CROSS-001");
        assert_eq!(format!("{id}"), "EMA-CROSS-001");
    }

    #[rstest]
    fn test_external() {
        assert_eq!(StrategyId::external().as_str(), "EXTERNAL");
    }
}
