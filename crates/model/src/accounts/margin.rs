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

//! An account which facilitates trading on margin.

use std::{
    collections::HashMap,
    ops::{Deref, DerefMut},
};

use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::BaseAccount;
use crate::{
    enums::AccountType,
    events::AccountState,
    identifiers::InstrumentId,
    instruments::{Instrument, InstrumentAny},
    types::{AccountBalance, Currency, MarginBalance, Money, Price, Quantity},
};

/// Provides a margin account (assets used as collateral for leveraged positions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarginAccount {
    base: BaseAccount,
    /// The leverages per instrument.
    pub leverages: HashMap<InstrumentId, f64>,
    /// The margin balances per instrument.
    pub margins: HashMap<InstrumentId, MarginBalance>,
    /// The default leverage applied when no per-instrument leverage is set.
    pub default_leverage: f64,
}

impl MarginAccount {
    /// Creates a new [`MarginAccount`] instance from the given `event`.
    #[must_use]
    pub fn new(event: AccountState, calculate_account_state: bool) -> Self {
        let mut margins = HashMap::new();
        for margin in &event.margins {
            margins.insert(margin.instrument_id, *margin);
        }
        Self {
            base: BaseAccount::new(event, calculate_account_state),
            leverages: HashMap::new(),
            margins,
            default_leverage: 1.0,
        }
    }

    /// Returns whether this is a cash account.
    #[must_use]
    pub fn is_cash_account(&self) -> bool {
        self.account_type == AccountType::Cash
    }

    /// Returns whether this is a margin account.
    #[must_use]
    pub fn is_margin_account(&self) -> bool {
        self.account_type == AccountType::Margin
    }

    /// Applies the given `event` to the account.
    pub fn apply(&mut self, event: AccountState) {
        for margin in &event.margins {
            self.margins.insert(margin.instrument_id, *margin);
        }
        self.base.base_apply(event);
    }

    /// Sets the default leverage for the account.
    pub fn set_default_leverage(&mut self, leverage: f64) {
        self.default_leverage = leverage;
    }

    /// Sets the leverage for the given `instrument_id`.
    pub fn set_leverage(&mut self, instrument_id: InstrumentId, leverage: f64) {
        self.leverages.insert(instrument_id, leverage);
    }

    /// Returns the leverage for the given `instrument_id` (or the default).
    #[must_use]
    pub fn get_leverage(&self, instrument_id: &InstrumentId) -> f64 {
        self.leverages
            .get(instrument_id)
            .copied()
            .unwrap_or(self.default_leverage)
    }

    /// Returns the initial margins per instrument.
    #[must_use]
    pub fn initial_margins(&self) -> HashMap<InstrumentId, Money> {
        self.margins
            .iter()
            .map(|(instrument_id, margin)| (*instrument_id, margin.initial))
            .collect()
    }

    /// Returns the maintenance margins per instrument.
    #[must_use]
    pub fn maintenance_margins(&self) -> HashMap<InstrumentId, Money> {
        self.margins
            .iter()
            .map(|(instrument_id, margin)| (*instrument_id, margin.maintenance))
            .collect()
    }

    /// Updates the initial margin for the given `instrument_id` and
    /// recalculates the balance in the margin currency.
    pub fn update_initial_margin(&mut self, instrument_id: InstrumentId, margin_init: Money) {
        let margin_maint = self
            .margins
            .get(&instrument_id)
            .map_or_else(|| Money::zero(margin_init.currency), |m| m.maintenance);
        self.margins.insert(
            instrument_id,
            MarginBalance::new(margin_init, margin_maint, instrument_id),
        );
        self.recalculate_balance(margin_init.currency);
    }

    /// Updates the maintenance margin for the given `instrument_id` and
    /// recalculates the balance in the margin currency.
    pub fn update_maintenance_margin(&mut self, instrument_id: InstrumentId, margin_maint: Money) {
        let margin_init = self
            .margins
            .get(&instrument_id)
            .map_or_else(|| Money::zero(margin_maint.currency), |m| m.initial);
        self.margins.insert(
            instrument_id,
            MarginBalance::new(margin_init, margin_maint, instrument_id),
        );
        self.recalculate_balance(margin_maint.currency);
    }

    /// Calculates the initial (order) margin for the given order parameters.
    #[must_use]
    pub fn calculate_initial_margin(
        &mut self,
        instrument: &InstrumentAny,
        quantity: Quantity,
        price: Price,
    ) -> Money {
        let notional = instrument
            .calculate_notional_value(quantity, price, None)
            .as_f64();
        let leverage = self.get_leverage(&instrument.id());
        let adjusted_notional = notional / leverage;

        let mut margin = adjusted_notional * instrument.margin_init().to_f64().unwrap();
        margin += adjusted_notional * instrument.taker_fee().to_f64().unwrap() * 2.0;

        if instrument.is_inverse() {
            Money::new(margin, instrument.base_currency().unwrap())
        } else {
            Money::new(margin, instrument.quote_currency())
        }
    }

    /// Calculates the maintenance (position) margin for the given position parameters.
    #[must_use]
    pub fn calculate_maintenance_margin(
        &mut self,
        instrument: &InstrumentAny,
        quantity: Quantity,
        price: Price,
    ) -> Money {
        let notional = instrument
            .calculate_notional_value(quantity, price, None)
            .as_f64();
        let leverage = self.get_leverage(&instrument.id());
        let adjusted_notional = notional / leverage;

        let mut margin = adjusted_notional * instrument.margin_maint().to_f64().unwrap();
        margin += adjusted_notional * instrument.taker_fee().to_f64().unwrap();

        if instrument.is_inverse() {
            Money::new(margin, instrument.base_currency().unwrap())
        } else {
            Money::new(margin, instrument.quote_currency())
        }
    }

    /// Recalculates the balance for the given `currency` from the current
    /// margin totals.
    ///
    /// # Panics
    ///
    /// Panics if no starting balance exists for `currency`, or if the margin
    /// total exceeds the current balance.
    pub fn recalculate_balance(&mut self, currency: Currency) {
        let current_balance = match self.balances.get(&currency) {
            Some(balance) => *balance,
            None => panic!("Cannot recalculate balance when no starting balance"),
        };

        let mut total_margin = 0;
        self.margins.values().for_each(|margin| {
            if margin.currency == currency {
                total_margin += margin.initial.raw;
                total_margin += margin.maintenance.raw;
            }
        });

        let total_free = current_balance.total.raw - total_margin;
        assert!(
            total_free >= 0,
            "Cannot recalculate balance when total_free is less than 0.0"
        );
        let new_balance = AccountBalance::new(
            current_balance.total,
            Money::from_raw(total_margin, currency),
            Money::from_raw(total_free, currency),
        );
        self.base.balances.insert(currency, new_balance);
    }
}

impl Deref for MarginAccount {
    type Target = BaseAccount;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

impl DerefMut for MarginAccount {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.base
    }
}
