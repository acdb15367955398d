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

//! Represents a valid ticker symbol ID for a tradable instrument.

use std::fmt::{Debug, Display, Formatter};

use meridian_core::correctness::{FAILED, check_valid_string};
use ustr::Ustr;

define_identifier!(
    Symbol,
    "Represents a valid ticker symbol ID for a tradable instrument."
);

impl Symbol {
    /// Returns true if the symbol string contains a forward slash (`/`),
    /// indicating a currency-pair style symbol such as `EUR/USD`.
    #[must_use]
    pub fn is_currency_pair(&self) -> bool {
        self.as_str().contains('/')
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::Symbol;

    #[rstest]
    fn test_string_reprs() {
        let symbol = Symbol::new("AUD/USD");
        assert_eq!(symbol.as_str(), "AUD/USD");
        assert_eq!(format!("{symbol}"), "AUD/USD");
        assert_eq!(format!("{symbol:?}"), "\"AUD/USD\"");
    }

    #[rstest]
    fn test_is_currency_pair() {
        assert!(Symbol::new("EUR/USD").is_currency_pair());
        assert!(!Symbol::new("AAPL").is_currency_pair());
    }

    #[rstest]
    #[should_panic(expected = "Condition failed")]
    fn test_empty_symbol_panics() {
        let _ = Symbol::new("");
    }
}
