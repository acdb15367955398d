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

//! Common state and behavior shared by all account implementations.

use std::collections::HashMap;

use meridian_core::{UnixNanos, datetime::secs_to_nanos};
use serde::{Deserialize, Serialize};

use crate::{
    enums::AccountType,
    events::AccountState,
    identifiers::AccountId,
    types::{AccountBalance, Currency, Money},
};

/// Common state shared by all account implementations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseAccount {
    /// The account ID.
    pub id: AccountId,
    /// The account type.
    pub account_type: AccountType,
    /// The base currency for the account (if applicable).
    pub base_currency: Option<Currency>,
    /// Whether the account state is calculated by the system (as opposed to
    /// being authoritative from the venue).
    pub calculate_account_state: bool,
    /// The account state event history.
    pub events: Vec<AccountState>,
    /// The cumulative commissions per currency.
    pub commissions: HashMap<Currency, Money>,
    /// The current balances per currency.
    pub balances: HashMap<Currency, AccountBalance>,
    /// The starting balances per currency.
    pub balances_starting: HashMap<Currency, Money>,
}

impl BaseAccount {
    /// Creates a new [`BaseAccount`] instance from the given `event`.
    pub fn new(event: AccountState, calculate_account_state: bool) -> Self {
        let mut balances_starting: HashMap<Currency, Money> = HashMap::new();
        let mut balances: HashMap<Currency, AccountBalance> = HashMap::new();
        event.balances.iter().for_each(|balance| {
            balances_starting.insert(balance.currency, balance.total);
            balances.insert(balance.currency, *balance);
        });
        Self {
            id: event.account_id,
            account_type: event.account_type,
            base_currency: event.base_currency,
            calculate_account_state,
            events: vec![event],
            commissions: HashMap::new(),
            balances,
            balances_starting,
        }
    }

    /// Returns the total `Money` balance for the specified currency, or `None` if absent.
    ///
    /// # Panics
    ///
    /// Panics if `currency` is `None` and `self.base_currency` is `None`.
    #[must_use]
    pub fn base_balance_total(&self, currency: Option<Currency>) -> Option<Money> {
        let currency = currency
            .or(self.base_currency)
            .expect("Currency must be specified");
        self.balances.get(&currency).map(|balance| balance.total)
    }

    /// Returns the total balances per currency.
    #[must_use]
    pub fn base_balances_total(&self) -> HashMap<Currency, Money> {
        self.balances
            .iter()
            .map(|(currency, balance)| (*currency, balance.total))
            .collect()
    }

    /// Returns the free `Money` balance for the specified currency, or `None` if absent.
    ///
    /// # Panics
    ///
    /// Panics if `currency` is `None` and `self.base_currency` is `None`.
    #[must_use]
    pub fn base_balance_free(&self, currency: Option<Currency>) -> Option<Money> {
        let currency = currency
            .or(self.base_currency)
            .expect("Currency must be specified");
        self.balances.get(&currency).map(|balance| balance.free)
    }

    /// Returns the free balances per currency.
    #[must_use]
    pub fn base_balances_free(&self) -> HashMap<Currency, Money> {
        self.balances
            .iter()
            .map(|(currency, balance)| (*currency, balance.free))
            .collect()
    }

    /// Returns the locked `Money` balance for the specified currency, or `None` if absent.
    ///
    /// # Panics
    ///
    /// Panics if `currency` is `None` and `self.base_currency` is `None`.
    #[must_use]
    pub fn base_balance_locked(&self, currency: Option<Currency>) -> Option<Money> {
        let currency = currency
            .or(self.base_currency)
            .expect("Currency must be specified");
        self.balances.get(&currency).map(|balance| balance.locked)
    }

    /// Returns the locked balances per currency.
    #[must_use]
    pub fn base_balances_locked(&self) -> HashMap<Currency, Money> {
        self.balances
            .iter()
            .map(|(currency, balance)| (*currency, balance.locked))
            .collect()
    }

    /// Returns the most recent account state event (if any).
    #[must_use]
    pub fn base_last_event(&self) -> Option<AccountState> {
        self.events.last().cloned()
    }

    /// Updates the account balances with the provided list of `AccountBalance` instances.
    ///
    /// # Panics
    ///
    /// Panics if any updated `AccountBalance` has a total less than zero.
    pub fn update_balances(&mut self, balances: Vec<AccountBalance>) {
        for balance in balances {
            assert!(
                balance.total.raw >= 0,
                "Cannot update balances with total less than 0.0"
            );
            self.balances.insert(balance.currency, balance);
        }
    }

    /// Adds the given `commission` to the cumulative totals.
    pub fn update_commissions(&mut self, commission: Money) {
        if commission.is_zero() {
            return;
        }

        let currency = commission.currency;
        let total = self
            .commissions
            .get(&currency)
            .copied()
            .unwrap_or_else(|| Money::zero(currency));
        self.commissions.insert(currency, total + commission);
    }

    /// Applies the given `event`, updating balances and recording the event.
    pub fn base_apply(&mut self, event: AccountState) {
        self.update_balances(event.balances.clone());
        self.events.push(event);
    }

    /// Purges all account state events which are outside the lookback window.
    ///
    /// Guaranteed to retain at least the latest event.
    pub fn base_purge_account_events(&mut self, ts_now: UnixNanos, lookback_secs: u64) {
        let lookback_ns = UnixNanos::from(secs_to_nanos(lookback_secs as f64));

        let mut retained_events = Vec::new();
        for event in &self.events {
            if event.ts_event + lookback_ns.as_u64() > ts_now {
                retained_events.push(event.clone());
            }
        }

        if retained_events.is_empty()
            && let Some(last) = self.events.last()
        {
            retained_events.push(last.clone());
        }

        self.events = retained_events;
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use meridian_core::UUID4;
    use rstest::rstest;

    use super::*;
    use crate::accounts::stubs::cash_account_state;

    fn state_at(ts: u64) -> AccountState {
        let mut event = cash_account_state();
        event.event_id = UUID4::new();
        event.ts_event = UnixNanos::from(ts);
        event.ts_init = UnixNanos::from(ts);
        event
    }

    #[rstest]
    fn test_apply_is_idempotent_at_balance_level() {
        let event = cash_account_state();
        let mut account = BaseAccount::new(event.clone(), true);
        let balances_once = account.base_balances_total();
        account.base_apply(event);
        assert_eq!(account.base_balances_total(), balances_once);
        assert_eq!(account.events.len(), 2);
    }

    #[rstest]
    fn test_purge_account_events_retains_latest_when_all_purged() {
        let mut account = BaseAccount::new(state_at(100_000_000), true);
        account.base_apply(state_at(200_000_000));
        account.base_apply(state_at(300_000_000));
        assert_eq!(account.events.len(), 3);

        account.base_purge_account_events(UnixNanos::from(1_000_000_000), 0);

        assert_eq!(account.events.len(), 1);
        assert_eq!(
            account.base_last_event().unwrap().ts_event,
            UnixNanos::from(300_000_000)
        );
    }

    #[rstest]
    fn test_update_commissions_accumulates() {
        let mut account = BaseAccount::new(cash_account_state(), true);
        account.update_commissions(Money::from("2.00 USD"));
        account.update_commissions(Money::from("3.00 USD"));
        assert_eq!(
            account.commissions.get(&Currency::USD()),
            Some(&Money::from("5.00 USD"))
        );
    }
}
