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

//! Configuration for `Portfolio` instances.

use serde::{Deserialize, Serialize};

/// Configuration for `Portfolio` instances.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioConfig {
    /// If a verbose per-calculation log trace is emitted.
    pub debug: bool,
    /// If mark prices are preferred over bid/ask/last when pricing open positions.
    pub use_mark_prices: bool,
    /// If mark exchange rates are used instead of venue quote-driven rates.
    pub use_mark_xrates: bool,
    /// If all aggregate results are converted into the account base currency.
    pub convert_to_account_base_currency: bool,
    /// If external bars are subscribed to and bar-close prices tracked.
    pub bar_updates: bool,
    /// The throttle interval (milliseconds) for account-state log lines.
    pub min_account_state_logging_interval_ms: u64,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            debug: false,
            use_mark_prices: false,
            use_mark_xrates: false,
            convert_to_account_base_currency: true,
            bar_updates: true,
            min_account_state_logging_interval_ms: 1_000,
        }
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
    fn test_default() {
        let config = PortfolioConfig::default();
        assert!(!config.debug);
        assert!(!config.use_mark_prices);
        assert!(!config.use_mark_xrates);
        assert!(config.convert_to_account_base_currency);
        assert!(config.bar_updates);
        assert_eq!(config.min_account_state_logging_interval_ms, 1_000);
    }

    #[rstest]
    fn test_deserialize_partial() {
        let config: PortfolioConfig =
            serde_json::from_str(r#"{"use_mark_prices": true}"#).unwrap();
        assert!(config.use_mark_prices);
        assert!(config.convert_to_account_base_currency);
    }
}
