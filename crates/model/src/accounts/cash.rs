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

//! An account with unleveraged cash assets.

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use super::BaseAccount;
use crate::{
    enums::{AccountType, OrderSide},
    events::{AccountState, OrderFilled},
    instruments::{Instrument, InstrumentAny},
    position::Position,
    types::{AccountBalance, Currency, Money, Price, Quantity},
};

/// Provides a cash account (unleveraged assets only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashAccount {
    base: BaseAccount,
}

impl CashAccount {
    /// Creates a new [`CashAccount`] instance from the given `event`.
    #[must_use]
    pub fn new(event: AccountState, calculate_account_state: bool) -> Self {
        Self {
            base: BaseAccount::new(event, calculate_account_state),
        }
    }

    /// Returns whether this is a cash account.
    #[must_use]
    pub fn is_cash_account(&self) -> bool {
        self.account_type == AccountType::Cash || self.account_type == AccountType::Betting
    }

    /// Returns whether this is a margin account.
    #[must_use]
    pub fn is_margin_account(&self) -> bool {
        self.account_type == AccountType::Margin
    }

    /// Applies the given `event` to the account.
    pub fn apply(&mut self, event: AccountState) {
        self.base.base_apply(event);
    }

    /// Sets the locked balance for the given `currency`, deriving the free
    /// balance from the current total.
    pub fn update_balance_locked(&mut self, currency: Currency, locked: Money) {
        let total = match self.balances.get(&currency) {
            Some(balance) => balance.total,
            None => return,
        };
        let free = Money::from_raw(total.raw - locked.raw, currency);
        let new_balance = AccountBalance::new(total, locked, free);
        self.base.balances.insert(currency, new_balance);
    }

    /// Recalculates the balance for the given `currency` from the current
    /// locked amount.
    pub fn recalculate_balance(&mut self, currency: Currency) {
        let current_balance = match self.balances.get(&currency) {
            Some(balance) => *balance,
            None => return,
        };

        let locked = current_balance.locked;
        let free = Money::from_raw(current_balance.total.raw - locked.raw, currency);
        let new_balance = AccountBalance::new(current_balance.total, locked, free);
        self.base.balances.insert(currency, new_balance);
    }

    /// Calculates the amount of balance to lock for a new order with the given
    /// side, quantity, and price.
    ///
    /// # Panics
    ///
    /// Panics if `side` is not [`OrderSide::Buy`] or [`OrderSide::Sell`].
    #[must_use]
    pub fn calculate_balance_locked(
        &self,
        instrument: &InstrumentAny,
        side: OrderSide,
        quantity: Quantity,
        price: Price,
    ) -> Money {
        let base_currency = instrument
            .base_currency()
            .unwrap_or(instrument.quote_currency());
        let quote_currency = instrument.quote_currency();

        match side {
            OrderSide::Buy => {
                let notional = instrument.calculate_notional_value(quantity, price, None);
                Money::new(notional.as_f64(), quote_currency)
            }
            OrderSide::Sell => Money::new(quantity.as_f64(), base_currency),
            OrderSide::NoOrderSide => {
                panic!("Invalid `OrderSide` in `calculate_balance_locked`")
            }
        }
    }

    /// Calculates the profit and loss amounts for a filled order.
    ///
    /// # Panics
    ///
    /// Panics if `fill.order_side` is neither [`OrderSide::Buy`] nor [`OrderSide::Sell`].
    #[must_use]
    pub fn calculate_pnls(
        &self,
        instrument: &InstrumentAny,
        fill: &OrderFilled,
        position: Option<&Position>,
    ) -> Vec<Money> {
        let mut pnls: Vec<Money> = Vec::new();
        let base_currency = instrument.base_currency();

        let fill_qty = position.map_or(fill.last_qty.as_f64(), |pos| {
            pos.quantity.as_f64().min(fill.last_qty.as_f64())
        });
        let fill_qty = Quantity::new(fill_qty, fill.last_qty.precision);
        let notional = instrument.calculate_notional_value(fill_qty, fill.last_px, None);

        match fill.order_side {
            OrderSide::Buy => {
                if let (Some(base_currency), None) = (base_currency, self.base_currency) {
                    pnls.push(Money::new(fill_qty.as_f64(), base_currency));
                }
                pnls.push(Money::new(-notional.as_f64(), notional.currency));
            }
            OrderSide::Sell => {
                if let (Some(base_currency), None) = (base_currency, self.base_currency) {
                    pnls.push(Money::new(-fill_qty.as_f64(), base_currency));
                }
                pnls.push(Money::new(notional.as_f64(), notional.currency));
            }
            OrderSide::NoOrderSide => panic!("Invalid `OrderSide` in `calculate_pnls`"),
        }
        pnls
    }
}

impl Deref for CashAccount {
    type Target = BaseAccount;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

impl DerefMut for CashAccount {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.base
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{
        accounts::stubs::cash_account_state,
        instruments::{InstrumentAny, stubs::audusd_sim},
    };

    #[rstest]
    fn test_new_from_event() {
        let account = CashAccount::new(cash_account_state(), true);
        assert!(account.is_cash_account());
        assert_eq!(account.base_currency, Some(Currency::USD()));
        assert_eq!(
            account.base_balance_total(None),
            Some(Money::from("1525000.00 USD"))
        );
    }

    #[rstest]
    fn test_update_balance_locked() {
        let mut account = CashAccount::new(cash_account_state(), true);
        account.update_balance_locked(Currency::USD(), Money::from("100000.00 USD"));
        assert_eq!(
            account.base_balance_locked(None),
            Some(Money::from("100000.00 USD"))
        );
        assert_eq!(
            account.base_balance_free(None),
            Some(Money::from("1425000.00 USD"))
        );
    }

    #[rstest]
    fn test_calculate_balance_locked_buy_uses_quote() {
        let account = CashAccount::new(cash_account_state(), true);
        let instrument = InstrumentAny::CurrencyPair(audusd_sim());
        let locked = account.calculate_balance_locked(
            &instrument,
            OrderSide::Buy,
            Quantity::from("100000"),
            Price::from("0.66000"),
        );
        assert_eq!(locked, Money::from("66000.00 USD"));
    }

    #[rstest]
    fn test_calculate_balance_locked_sell_uses_base() {
        let account = CashAccount::new(cash_account_state(), true);
        let instrument = InstrumentAny::CurrencyPair(audusd_sim());
        let locked = account.calculate_balance_locked(
            &instrument,
            OrderSide::Sell,
            Quantity::from("100000"),
            Price::from("0.66000"),
        );
        assert_eq!(locked, Money::from("100000.00 AUD"));
    }
}
