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

//! Enumerations for the trading domain model.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{AsRefStr, Display, EnumIter, EnumString, FromRepr};

/// Implements string-based serde for an enum with strum conversions.
macro_rules! enum_strum_serde {
    ($type:ty) => {
        impl Serialize for $type {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(self.as_ref())
            }
        }

        impl<'de> Deserialize<'de> for $type {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let value_str = String::deserialize(deserializer)?;
                value_str.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

/// An account type provided by a trading venue or broker.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    /// An account with unleveraged cash assets only.
    Cash = 1,
    /// An account which facilitates trading on margin, using account assets as collateral.
    Margin = 2,
    /// An account specific to betting markets.
    Betting = 3,
}

/// An aggregation source for derived data.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregationSource {
    /// The data is externally aggregated (outside the system boundary).
    External = 1,
    /// The data is internally aggregated (inside the system boundary).
    Internal = 2,
}

/// The interval type for bar aggregation.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BarAggregation {
    /// Based on a number of ticks.
    Tick = 1,
    /// Based on seconds.
    Second = 2,
    /// Based on minutes.
    Minute = 3,
    /// Based on hours.
    Hour = 4,
    /// Based on days.
    Day = 5,
}

/// The side of a bet in a betting market.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BetSide {
    /// A bet placed to back a selection.
    Back = 1,
    /// A bet placed to lay a selection.
    Lay = 2,
}

impl BetSide {
    /// Returns the opposite bet side.
    #[must_use]
    pub fn opposite(&self) -> Self {
        match self {
            Self::Back => Self::Lay,
            Self::Lay => Self::Back,
        }
    }
}

impl From<OrderSide> for BetSide {
    /// Returns the equivalent [`BetSide`] for a given [`OrderSide`].
    ///
    /// # Panics
    ///
    /// Panics if `side` is [`OrderSide::NoOrderSide`].
    fn from(side: OrderSide) -> Self {
        match side {
            OrderSide::Buy => BetSide::Back,
            OrderSide::Sell => BetSide::Lay,
            OrderSide::NoOrderSide => panic!("Invalid `OrderSide` for `BetSide`, was {side}"),
        }
    }
}

/// The type of currency.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CurrencyType {
    /// A type of cryptocurrency or crypto token.
    Crypto = 1,
    /// A type of currency issued by governments which is not backed by a commodity.
    Fiat = 2,
}

/// The liquidity side for a trade in a market.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LiquiditySide {
    /// No liquidity side specified.
    NoLiquiditySide = 0,
    /// The order passively provided liquidity to the market (made a market).
    Maker = 1,
    /// The order aggressively took liquidity from the market.
    Taker = 2,
}

/// The order management system (OMS) type for a trading venue or trader.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OmsType {
    /// There is no specific type of order management specified (will defer to the venue).
    Unspecified = 0,
    /// The netting type where there is one position per instrument.
    Netting = 1,
    /// The hedging type where there can be multiple positions per instrument.
    Hedging = 2,
}

/// The order side for a specific order, or action related to orders.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSide {
    /// No order side is specified.
    #[default]
    NoOrderSide = 0,
    /// The order is a BUY.
    Buy = 1,
    /// The order is a SELL.
    Sell = 2,
}

/// The status for a specific order.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// The order is initialized (instantiated) within the system.
    Initialized = 1,
    /// The order was denied by the system, either for being invalid, unprocessable or exceeding a risk limit.
    Denied = 2,
    /// The order was submitted by the system to the venue.
    Submitted = 3,
    /// The order was acknowledged by the venue as being received and valid (may now be working).
    Accepted = 4,
    /// The order was rejected by the venue.
    Rejected = 5,
    /// The order was canceled (closed/done).
    Canceled = 6,
    /// The order reached a GTD expiration (closed/done).
    Expired = 7,
    /// The order STOP price was triggered on a trading venue.
    Triggered = 8,
    /// The order is currently pending a request to modify on a trading venue.
    PendingUpdate = 9,
    /// The order is currently pending a request to cancel on a trading venue.
    PendingCancel = 10,
    /// The order has been partially filled on a trading venue.
    PartiallyFilled = 11,
    /// The order has been completely filled on a trading venue (closed/done).
    Filled = 12,
}

/// The type of order.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// A market order to buy or sell at the best available price in the current market.
    Market = 1,
    /// A limit order to buy or sell at a specific price or better.
    Limit = 2,
    /// A stop market order to buy or sell once the price reaches the specified stop/trigger price.
    StopMarket = 3,
    /// A stop limit order to buy or sell which combines the features of a stop order and a limit order.
    StopLimit = 4,
}

/// The market side for a specific position, or action related to positions.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionSide {
    /// No position side is specified (only valid in the context of a filter for actions involving positions).
    NoPositionSide = 0,
    /// A neutral/flat position, where no position is currently held in the market.
    Flat = 1,
    /// A long position in the market, typically acquired through one or many BUY orders.
    Long = 2,
    /// A short position in the market, typically acquired through one or many SELL orders.
    Short = 3,
}

/// The type of price for an instrument in a market.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceType {
    /// The best quoted price at which buyers are willing to buy a quantity of an instrument.
    Bid = 1,
    /// The best quoted price at which sellers are willing to sell a quantity of an instrument.
    Ask = 2,
    /// The arithmetic midpoint between the top-of-book bid and ask prices.
    Mid = 3,
    /// The last price at which a trade was executed.
    Last = 4,
    /// A reference price reflecting an instrument's fair value, used for margining and settlement.
    Mark = 5,
}

enum_strum_serde!(AccountType);
enum_strum_serde!(AggregationSource);
enum_strum_serde!(BarAggregation);
enum_strum_serde!(BetSide);
enum_strum_serde!(CurrencyType);
enum_strum_serde!(LiquiditySide);
enum_strum_serde!(OmsType);
enum_strum_serde!(OrderSide);
enum_strum_serde!(OrderStatus);
enum_strum_serde!(OrderType);
enum_strum_serde!(PositionSide);
enum_strum_serde!(PriceType);

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(OrderSide::Buy, "BUY")]
    #[case(OrderSide::Sell, "SELL")]
    #[case(OrderSide::NoOrderSide, "NO_ORDER_SIDE")]
    fn test_order_side_display(#[case] side: OrderSide, #[case] expected: &str) {
        assert_eq!(side.to_string(), expected);
    }

    #[rstest]
    fn test_order_side_from_str() {
        assert_eq!(OrderSide::from_str("BUY").unwrap(), OrderSide::Buy);
        assert_eq!(OrderSide::from_str("buy").unwrap(), OrderSide::Buy);
        assert!(OrderSide::from_str("HOLD").is_err());
    }

    #[rstest]
    #[case(BetSide::Back, BetSide::Lay)]
    #[case(BetSide::Lay, BetSide::Back)]
    fn test_bet_side_opposite(#[case] side: BetSide, #[case] expected: BetSide) {
        assert_eq!(side.opposite(), expected);
    }

    #[rstest]
    fn test_bet_side_from_order_side() {
        assert_eq!(BetSide::from(OrderSide::Buy), BetSide::Back);
        assert_eq!(BetSide::from(OrderSide::Sell), BetSide::Lay);
    }

    #[rstest]
    fn test_price_type_serde_round_trip() {
        let json = serde_json::to_string(&PriceType::Mark).unwrap();
        assert_eq!(json, "\"MARK\"");
        let price_type: PriceType = serde_json::from_str(&json).unwrap();
        assert_eq!(price_type, PriceType::Mark);
    }

    #[rstest]
    fn test_account_type_display() {
        assert_eq!(AccountType::Cash.to_string(), "CASH");
        assert_eq!(AccountType::Margin.to_string(), "MARGIN");
    }
}
