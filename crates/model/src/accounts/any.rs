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

//! A tagged variant wrapping all account types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{CashAccount, MarginAccount};
use crate::{
    enums::AccountType,
    events::AccountState,
    identifiers::AccountId,
    types::{AccountBalance, Currency, Money},
};

/// Wraps an account allowing polymorphism over the account family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AccountAny {
    /// A cash account.
    Cash(CashAccount),
    /// A margin account.
    Margin(MarginAccount),
}

impl AccountAny {
    /// Creates a new [`AccountAny`] instance for the given `event`.
    ///
    /// Betting accounts are represented by the cash variant (unleveraged
    /// assets with a settlement currency).
    #[must_use]
    pub fn new(event: AccountState, calculate_account_state: bool) -> Self {
        match event.account_type {
            AccountType::Cash | AccountType::Betting => {
                Self::Cash(CashAccount::new(event, calculate_account_state))
            }
            AccountType::Margin => Self::Margin(MarginAccount::new(event, calculate_account_state)),
        }
    }

    /// Returns the account ID.
    #[must_use]
    pub fn id(&self) -> AccountId {
        match self {
            Self::Cash(account) => account.id,
            Self::Margin(account) => account.id,
        }
    }

    /// Returns the account type.
    #[must_use]
    pub fn account_type(&self) -> AccountType {
        match self {
            Self::Cash(account) => account.account_type,
            Self::Margin(account) => account.account_type,
        }
    }

    /// Returns the account base currency (if applicable).
    #[must_use]
    pub fn base_currency(&self) -> Option<Currency> {
        match self {
            Self::Cash(account) => account.base_currency,
            Self::Margin(account) => account.base_currency,
        }
    }

    /// Returns whether the account state is calculated by the system.
    #[must_use]
    pub fn calculate_account_state(&self) -> bool {
        match self {
            Self::Cash(account) => account.calculate_account_state,
            Self::Margin(account) => account.calculate_account_state,
        }
    }

    /// Returns whether this is a margin account.
    #[must_use]
    pub fn is_margin_account(&self) -> bool {
        matches!(self, Self::Margin(_))
    }

    /// Applies the given `event` to the account.
    pub fn apply(&mut self, event: AccountState) {
        match self {
            Self::Cash(account) => account.apply(event),
            Self::Margin(account) => account.apply(event),
        }
    }

    /// Returns the most recent account state event (if any).
    #[must_use]
    pub fn last_event(&self) -> Option<AccountState> {
        match self {
            Self::Cash(account) => account.base_last_event(),
            Self::Margin(account) => account.base_last_event(),
        }
    }

    /// Returns the account state event history.
    #[must_use]
    pub fn events(&self) -> Vec<AccountState> {
        match self {
            Self::Cash(account) => account.events.clone(),
            Self::Margin(account) => account.events.clone(),
        }
    }

    /// Returns the current balances per currency.
    #[must_use]
    pub fn balances(&self) -> HashMap<Currency, AccountBalance> {
        match self {
            Self::Cash(account) => account.balances.clone(),
            Self::Margin(account) => account.balances.clone(),
        }
    }

    /// Returns the total balances per currency.
    #[must_use]
    pub fn balances_total(&self) -> HashMap<Currency, Money> {
        match self {
            Self::Cash(account) => account.base_balances_total(),
            Self::Margin(account) => account.base_balances_total(),
        }
    }

    /// Returns the locked balances per currency.
    #[must_use]
    pub fn balances_locked(&self) -> HashMap<Currency, Money> {
        match self {
            Self::Cash(account) => account.base_balances_locked(),
            Self::Margin(account) => account.base_balances_locked(),
        }
    }

    /// Returns the free balances per currency.
    #[must_use]
    pub fn balances_free(&self) -> HashMap<Currency, Money> {
        match self {
            Self::Cash(account) => account.base_balances_free(),
            Self::Margin(account) => account.base_balances_free(),
        }
    }

    /// Purges account state events outside the lookback window.
    pub fn purge_account_events(&mut self, ts_now: meridian_core::UnixNanos, lookback_secs: u64) {
        match self {
            Self::Cash(account) => account.base_purge_account_events(ts_now, lookback_secs),
            Self::Margin(account) => account.base_purge_account_events(ts_now, lookback_secs),
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
    use crate::accounts::stubs::{cash_account_state, margin_account_state};

    #[rstest]
    fn test_new_dispatches_by_account_type() {
        let cash = AccountAny::new(cash_account_state(), true);
        assert!(matches!(cash, AccountAny::Cash(_)));
        assert!(!cash.is_margin_account());

        let margin = AccountAny::new(margin_account_state(), true);
        assert!(matches!(margin, AccountAny::Margin(_)));
        assert!(margin.is_margin_account());
    }

    #[rstest]
    fn test_apply_records_event() {
        let mut account = AccountAny::new(cash_account_state(), true);
        let event = cash_account_state();
        account.apply(event.clone());
        assert_eq!(account.events().len(), 2);
        assert_eq!(account.last_event(), Some(event));
    }
}
