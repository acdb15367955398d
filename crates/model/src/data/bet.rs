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

//! Betting types for wagering-style instruments (back/lay bets and bet positions).

use std::fmt::Display;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enums::BetSide;

/// Represents a single bet at a decimal odds price with a stake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bet {
    price: Decimal,
    stake: Decimal,
    side: BetSide,
}

impl Bet {
    /// Creates a new [`Bet`] instance.
    #[must_use]
    pub fn new(price: Decimal, stake: Decimal, side: BetSide) -> Self {
        Self { price, stake, side }
    }

    /// Returns the bet's decimal odds price.
    #[must_use]
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Returns the bet's stake.
    #[must_use]
    pub fn stake(&self) -> Decimal {
        self.stake
    }

    /// Returns the bet's side.
    #[must_use]
    pub fn side(&self) -> BetSide {
        self.side
    }

    /// Returns the bet's exposure.
    ///
    /// For BACK bets exposure is positive; for LAY bets it is negative.
    #[must_use]
    pub fn exposure(&self) -> Decimal {
        match self.side {
            BetSide::Back => self.price * self.stake,
            BetSide::Lay => -self.price * self.stake,
        }
    }

    /// Returns the bet's liability.
    ///
    /// For BACK bets liability equals the stake; for LAY bets it is
    /// stake multiplied by (price - 1).
    #[must_use]
    pub fn liability(&self) -> Decimal {
        match self.side {
            BetSide::Back => self.stake,
            BetSide::Lay => self.stake * (self.price - Decimal::ONE),
        }
    }

    /// Returns the bet's profit if the selection wins.
    ///
    /// For BACK bets profit is stake * (price - 1); for LAY bets it equals the stake.
    #[must_use]
    pub fn profit(&self) -> Decimal {
        match self.side {
            BetSide::Back => self.stake * (self.price - Decimal::ONE),
            BetSide::Lay => self.stake,
        }
    }

    /// Returns the payoff for a winning outcome.
    #[must_use]
    pub fn outcome_win_payoff(&self) -> Decimal {
        match self.side {
            BetSide::Back => self.profit(),
            BetSide::Lay => -self.liability(),
        }
    }

    /// Returns the payoff for a losing outcome.
    #[must_use]
    pub fn outcome_lose_payoff(&self) -> Decimal {
        match self.side {
            BetSide::Back => -self.liability(),
            BetSide::Lay => self.profit(),
        }
    }
}

impl Display for Bet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Bet({:?} @ {:.2} x{:.2})",
            self.side, self.price, self.stake
        )
    }
}

/// Calculates the combined profit and loss for a slice of bets.
#[must_use]
pub fn calc_bets_pnl(bets: &[Bet]) -> Decimal {
    bets.iter()
        .fold(Decimal::ZERO, |acc, bet| acc + bet.outcome_win_payoff())
}

/// A position in a betting market comprising one or more bets.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BetPosition {
    price: Decimal,
    exposure: Decimal,
    realized_pnl: Decimal,
    bets: Vec<Bet>,
}

impl Default for BetPosition {
    fn default() -> Self {
        Self {
            price: Decimal::ZERO,
            exposure: Decimal::ZERO,
            realized_pnl: Decimal::ZERO,
            bets: vec![],
        }
    }
}

impl BetPosition {
    /// Returns the position's price.
    #[must_use]
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Returns the position's exposure.
    #[must_use]
    pub fn exposure(&self) -> Decimal {
        self.exposure
    }

    /// Returns the position's realized profit and loss.
    #[must_use]
    pub fn realized_pnl(&self) -> Decimal {
        self.realized_pnl
    }

    /// Returns a reference to the position's bets.
    #[must_use]
    pub fn bets(&self) -> &[Bet] {
        &self.bets
    }

    /// Returns the overall side of the position.
    ///
    /// If exposure is positive the side is BACK; if negative, LAY; if zero, None.
    #[must_use]
    pub fn side(&self) -> Option<BetSide> {
        match self.exposure.cmp(&Decimal::ZERO) {
            std::cmp::Ordering::Less => Some(BetSide::Lay),
            std::cmp::Ordering::Greater => Some(BetSide::Back),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Converts the current position into a single bet, if possible.
    #[must_use]
    pub fn as_bet(&self) -> Option<Bet> {
        self.side().map(|side| {
            let stake = match side {
                BetSide::Back => self.exposure / self.price,
                BetSide::Lay => -self.exposure / self.price,
            };
            Bet::new(self.price, stake, side)
        })
    }

    /// Adds a bet to the position, adjusting exposure and realized PnL.
    pub fn add_bet(&mut self, bet: Bet) {
        match self.side() {
            None => self.position_increase(&bet),
            Some(current_side) => {
                if current_side == bet.side {
                    self.position_increase(&bet);
                } else {
                    self.position_decrease(&bet);
                }
            }
        }
        self.bets.push(bet);
    }

    fn position_increase(&mut self, bet: &Bet) {
        if self.side().is_none() {
            self.price = bet.price;
        }
        self.exposure += bet.exposure();
    }

    // Realizes PnL by matching the incoming bet against a bet derived from
    // the current position
    fn position_decrease(&mut self, bet: &Bet) {
        let abs_bet_exposure = bet.exposure().abs();
        let abs_self_exposure = self.exposure.abs();

        match abs_bet_exposure.cmp(&abs_self_exposure) {
            std::cmp::Ordering::Less => {
                let decreasing_volume = abs_bet_exposure / self.price;
                let current_side = self.side().unwrap();
                let decreasing_bet = Bet::new(self.price, decreasing_volume, current_side);
                let pnl = calc_bets_pnl(&[*bet, decreasing_bet]);
                self.realized_pnl += pnl;
                self.exposure += bet.exposure();
            }
            std::cmp::Ordering::Greater => {
                if let Some(self_bet) = self.as_bet() {
                    let pnl = calc_bets_pnl(&[*bet, self_bet]);
                    self.realized_pnl += pnl;
                }
                self.price = bet.price;
                self.exposure += bet.exposure();
            }
            std::cmp::Ordering::Equal => {
                if let Some(self_bet) = self.as_bet() {
                    let pnl = calc_bets_pnl(&[*bet, self_bet]);
                    self.realized_pnl += pnl;
                }
                self.price = Decimal::ZERO;
                self.exposure = Decimal::ZERO;
            }
        }
    }

    /// Calculates the unrealized profit and loss given a current price.
    #[must_use]
    pub fn unrealized_pnl(&self, price: Decimal) -> Decimal {
        if self.side().is_none() {
            Decimal::ZERO
        } else if let Some(flattening_bet) = self.flattening_bet(price) {
            if let Some(self_bet) = self.as_bet() {
                calc_bets_pnl(&[flattening_bet, self_bet])
            } else {
                Decimal::ZERO
            }
        } else {
            Decimal::ZERO
        }
    }

    /// Returns the total profit and loss (realized plus unrealized) given a current price.
    #[must_use]
    pub fn total_pnl(&self, price: Decimal) -> Decimal {
        self.realized_pnl + self.unrealized_pnl(price)
    }

    /// Creates a bet that would flatten (neutralize) the current position.
    #[must_use]
    pub fn flattening_bet(&self, price: Decimal) -> Option<Bet> {
        self.side().map(|side| {
            let stake = match side {
                BetSide::Back => self.exposure / price,
                BetSide::Lay => -self.exposure / price,
            };
            // Use the opposite side to flatten the position
            Bet::new(price, stake, side.opposite())
        })
    }

    /// Resets the bet position to its initial state.
    pub fn reset(&mut self) {
        self.price = Decimal::ZERO;
        self.exposure = Decimal::ZERO;
        self.realized_pnl = Decimal::ZERO;
        self.bets.clear();
    }
}

impl Display for BetPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BetPosition(price={}, exposure={}, realized_pnl={})",
            self.price, self.exposure, self.realized_pnl
        )
    }
}
