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

//! Account balance and margin updates driven by order and position state.

use std::collections::HashMap;

use meridian_core::{UUID4, UnixNanos};
use meridian_model::{
    accounts::AccountAny,
    events::{AccountState, OrderFilled},
    instruments::{Instrument, InstrumentAny},
    orders::Order,
    position::Position,
    types::{AccountBalance, Currency, Money},
};

/// Applies order and position driven updates to account balances and margins.
///
/// The manager never mutates the given accounts in place: it works on clones
/// and returns the updated account together with a newly generated
/// `AccountState` for the caller to apply and publish.
#[derive(Clone, Debug, Default)]
pub struct AccountsManager;

impl AccountsManager {
    /// Creates a new [`AccountsManager`] instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Updates the account balances from the given `fill`.
    ///
    /// For cash accounts the fill PnL legs are applied to the balances; for
    /// all accounts the fill commission is recorded and deducted.
    ///
    /// # Errors
    ///
    /// Returns an error if a balance would become negative.
    pub fn update_balances(
        &self,
        account: &AccountAny,
        instrument: &InstrumentAny,
        fill: &OrderFilled,
    ) -> anyhow::Result<AccountAny> {
        let mut account = account.clone();

        let mut deltas: Vec<Money> = Vec::new();
        if let AccountAny::Cash(cash) = &account {
            deltas = cash.calculate_pnls(instrument, fill, None);
        }
        if let Some(commission) = fill.commission {
            deltas.push(-commission);
        }

        let mut balances: HashMap<Currency, AccountBalance> = match &account {
            AccountAny::Cash(cash) => cash.balances.clone(),
            AccountAny::Margin(margin) => margin.balances.clone(),
        };

        for delta in &deltas {
            let currency = delta.currency;
            let current = balances.get(&currency).copied();
            let (total, locked) = match current {
                Some(balance) => (balance.total + *delta, balance.locked),
                None => {
                    if delta.raw < 0 {
                        anyhow::bail!(
                            "Cannot apply balance delta {delta}: no {currency} balance to debit"
                        );
                    }
                    (*delta, Money::zero(currency))
                }
            };
            if total.raw < 0 {
                anyhow::bail!("Balance for {currency} would become negative, delta was {delta}");
            }
            let free = Money::from_raw(total.raw - locked.raw, currency);
            balances.insert(currency, AccountBalance::new(total, locked, free));
        }

        match &mut account {
            AccountAny::Cash(cash) => {
                cash.update_balances(balances.into_values().collect());
                if let Some(commission) = fill.commission {
                    cash.update_commissions(commission);
                }
            }
            AccountAny::Margin(margin) => {
                margin.update_balances(balances.into_values().collect());
                if let Some(commission) = fill.commission {
                    margin.update_commissions(commission);
                }
            }
        }

        Ok(account)
    }

    /// Recomputes the locked balance (cash) or initial margins (margin) from
    /// the given passive open orders, generating a new account state.
    ///
    /// # Errors
    ///
    /// Returns an error if the account holds no balance in a required currency.
    pub fn update_orders(
        &self,
        account: &AccountAny,
        instrument: &InstrumentAny,
        orders_open: &[&Order],
        ts_event: UnixNanos,
    ) -> anyhow::Result<(AccountAny, AccountState)> {
        let mut account = account.clone();

        match &mut account {
            AccountAny::Cash(cash) => {
                let mut locked_totals: HashMap<Currency, f64> = HashMap::new();
                for order in orders_open {
                    if !order.is_passive() || !order.is_open() {
                        continue;
                    }
                    let Some(price) = order.locking_price() else {
                        continue;
                    };
                    let locked = cash.calculate_balance_locked(
                        instrument,
                        order.side,
                        order.leaves_qty(),
                        price,
                    );
                    *locked_totals.entry(locked.currency).or_insert(0.0) += locked.as_f64();
                }

                // Release currencies which no longer have any resting orders
                for currency in [instrument.quote_currency(), instrument.settlement_currency()] {
                    locked_totals.entry(currency).or_insert(0.0);
                }
                if let Some(base_currency) = instrument.base_currency() {
                    locked_totals.entry(base_currency).or_insert(0.0);
                }

                for (currency, locked) in locked_totals {
                    if cash.balances.get(&currency).is_none() {
                        if locked > 0.0 {
                            anyhow::bail!(
                                "Cannot lock {locked} {currency}: no balance for currency"
                            );
                        }
                        continue;
                    }
                    cash.update_balance_locked(currency, Money::new(locked, currency));
                }
            }
            AccountAny::Margin(margin) => {
                let mut margin_totals: HashMap<Currency, f64> = HashMap::new();
                for order in orders_open {
                    if !order.is_passive() || !order.is_open() {
                        continue;
                    }
                    let Some(price) = order.locking_price() else {
                        continue;
                    };
                    let margin_init =
                        margin.calculate_initial_margin(instrument, order.leaves_qty(), price);
                    *margin_totals.entry(margin_init.currency).or_insert(0.0) +=
                        margin_init.as_f64();
                }

                let margin_currency = if instrument.is_inverse() {
                    instrument
                        .base_currency()
                        .expect("Inverse instruments require a base currency")
                } else {
                    instrument.quote_currency()
                };
                let total = margin_totals.get(&margin_currency).copied().unwrap_or(0.0);
                if margin.balances.get(&margin_currency).is_none() {
                    anyhow::bail!(
                        "Cannot update initial margin: no balance for {margin_currency}"
                    );
                }
                margin.update_initial_margin(
                    instrument.id(),
                    Money::new(total, margin_currency),
                );
            }
        }

        let state = self.generate_account_state(&account, ts_event);
        account.apply(state.clone());
        Ok((account, state))
    }

    /// Recomputes the maintenance margins for the given open positions,
    /// generating a new account state.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is not a margin account, or holds no
    /// balance in the margin currency.
    pub fn update_positions(
        &self,
        account: &AccountAny,
        instrument: &InstrumentAny,
        positions_open: &[&Position],
        ts_event: UnixNanos,
    ) -> anyhow::Result<(AccountAny, AccountState)> {
        let AccountAny::Margin(margin) = account else {
            anyhow::bail!("Cannot update position margins for a cash account");
        };
        let mut margin = margin.clone();

        let mut total = 0.0;
        for position in positions_open {
            if position.is_closed() {
                continue;
            }
            let price = instrument.make_price(position.avg_px_open);
            let margin_maint =
                margin.calculate_maintenance_margin(instrument, position.quantity, price);
            total += margin_maint.as_f64();
        }

        let margin_currency = if instrument.is_inverse() {
            instrument
                .base_currency()
                .expect("Inverse instruments require a base currency")
        } else {
            instrument.quote_currency()
        };
        if margin.balances.get(&margin_currency).is_none() {
            anyhow::bail!("Cannot update maintenance margin: no balance for {margin_currency}");
        }
        margin.update_maintenance_margin(instrument.id(), Money::new(total, margin_currency));

        let mut account = AccountAny::Margin(margin);
        let state = self.generate_account_state(&account, ts_event);
        account.apply(state.clone());
        Ok((account, state))
    }

    /// Generates a new `AccountState` snapshot of the given `account`.
    #[must_use]
    pub fn generate_account_state(&self, account: &AccountAny, ts_event: UnixNanos) -> AccountState {
        let margins = match account {
            AccountAny::Cash(_) => vec![],
            AccountAny::Margin(margin) => margin.margins.values().copied().collect(),
        };
        AccountState::new(
            account.id(),
            account.account_type(),
            account.balances().into_values().collect(),
            margins,
            false,
            UUID4::new(),
            ts_event,
            ts_event,
            account.base_currency(),
        )
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use meridian_model::{
        accounts::stubs::{cash_account_state, margin_account_state},
        enums::{LiquiditySide, OrderSide, OrderType},
        events::OrderEventAny,
        events::order::OrderAccepted,
        identifiers::{
            AccountId, ClientOrderId, InstrumentId, PositionId, StrategyId, TradeId, TraderId,
            VenueOrderId,
        },
        instruments::stubs::audusd_sim,
        types::{Price, Quantity},
    };
    use rstest::rstest;

    use super::*;

    fn accepted_limit_order(side: OrderSide, qty: &str, px: &str) -> Order {
        let mut order = Order::limit(
            TraderId::from("TRADER-001"),
            StrategyId::from("EMA-CROSS-001"),
            InstrumentId::from("AUD/USD.SIM"),
            ClientOrderId::from("O-1"),
            side,
            Quantity::from(qty),
            Price::from(px),
            UnixNanos::default(),
        );
        order.apply(&OrderEventAny::Accepted(OrderAccepted::new(
            order.trader_id,
            order.strategy_id,
            order.instrument_id,
            order.client_order_id,
            None,
            Some(AccountId::from("SIM-001")),
            UUID4::new(),
            UnixNanos::from(1),
            UnixNanos::from(1),
        )));
        order
    }

    fn buy_fill(qty: &str, px: &str, commission: Option<Money>) -> OrderFilled {
        OrderFilled::new(
            TraderId::from("TRADER-001"),
            StrategyId::from("EMA-CROSS-001"),
            InstrumentId::from("AUD/USD.SIM"),
            ClientOrderId::from("O-1"),
            VenueOrderId::from("V-1"),
            AccountId::from("SIM-001"),
            TradeId::from("T-1"),
            OrderSide::Buy,
            OrderType::Market,
            Quantity::from(qty),
            Price::from(px),
            Currency::USD(),
            LiquiditySide::Taker,
            UUID4::new(),
            UnixNanos::from(1),
            UnixNanos::from(1),
            Some(PositionId::from("P-1")),
            commission,
        )
    }

    #[rstest]
    fn test_update_orders_cash_locks_balance() {
        let manager = AccountsManager::new();
        let account = AccountAny::new(cash_account_state(), true);
        let instrument = InstrumentAny::CurrencyPair(audusd_sim());
        let order = accepted_limit_order(OrderSide::Buy, "100000", "0.66000");
        let orders = vec![&order];

        let (updated, state) = manager
            .update_orders(&account, &instrument, &orders, UnixNanos::from(1))
            .unwrap();

        let locked = updated.balances_locked();
        assert_eq!(locked.get(&Currency::USD()), Some(&Money::from("66000.00 USD")));
        assert!(!state.is_reported);
        assert_eq!(state.account_id, AccountId::from("SIM-001"));
    }

    #[rstest]
    fn test_update_orders_cash_releases_when_no_orders() {
        let manager = AccountsManager::new();
        let account = AccountAny::new(cash_account_state(), true);
        let instrument = InstrumentAny::CurrencyPair(audusd_sim());
        let order = accepted_limit_order(OrderSide::Buy, "100000", "0.66000");

        let (updated, _) = manager
            .update_orders(&account, &instrument, &[&order], UnixNanos::from(1))
            .unwrap();
        let (released, _) = manager
            .update_orders(&updated, &instrument, &[], UnixNanos::from(2))
            .unwrap();

        assert_eq!(
            released.balances_locked().get(&Currency::USD()),
            Some(&Money::from("0.00 USD"))
        );
    }

    #[rstest]
    fn test_update_orders_margin_sets_initial_margin() {
        let manager = AccountsManager::new();
        let account = AccountAny::new(margin_account_state(), true);
        let instrument = InstrumentAny::CurrencyPair(audusd_sim());
        let order = accepted_limit_order(OrderSide::Buy, "100000", "0.66000");

        let (updated, state) = manager
            .update_orders(&account, &instrument, &[&order], UnixNanos::from(1))
            .unwrap();

        let AccountAny::Margin(margin) = updated else {
            panic!("Expected margin account");
        };
        // notional 66_000 * (3% + 2 * 0.002%)
        assert_eq!(
            margin.initial_margins().get(&instrument.id()),
            Some(&Money::from("1982.64 USD"))
        );
        assert_eq!(state.margins.len(), 1);
    }

    #[rstest]
    fn test_update_balances_cash_buy_reduces_quote() {
        let manager = AccountsManager::new();
        let account = AccountAny::new(cash_account_state(), true);
        let instrument = InstrumentAny::CurrencyPair(audusd_sim());
        let fill = buy_fill("100000", "0.66000", Some(Money::from("2.00 USD")));

        let updated = manager.update_balances(&account, &instrument, &fill).unwrap();

        // 1_525_000 - 66_000 - 2 commission
        assert_eq!(
            updated.balances_total().get(&Currency::USD()),
            Some(&Money::from("1458998.00 USD"))
        );
    }

    #[rstest]
    fn test_update_positions_margin_sets_maintenance_margin() {
        let manager = AccountsManager::new();
        let account = AccountAny::new(margin_account_state(), true);
        let instrument = InstrumentAny::CurrencyPair(audusd_sim());
        let position = Position::new(&instrument, buy_fill("100000", "0.66000", None));

        let (updated, _) = manager
            .update_positions(&account, &instrument, &[&position], UnixNanos::from(1))
            .unwrap();

        let AccountAny::Margin(margin) = updated else {
            panic!("Expected margin account");
        };
        // notional 66_000 * (3% + 0.002%)
        assert_eq!(
            margin.maintenance_margins().get(&instrument.id()),
            Some(&Money::from("1981.32 USD"))
        );
    }

    #[rstest]
    fn test_update_positions_rejects_cash_account() {
        let manager = AccountsManager::new();
        let account = AccountAny::new(cash_account_state(), true);
        let instrument = InstrumentAny::CurrencyPair(audusd_sim());

        let result = manager.update_positions(&account, &instrument, &[], UnixNanos::from(1));
        assert!(result.is_err());
    }
}
