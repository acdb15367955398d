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

//! Aggregated bar types with an associated bar type definition.

use std::{
    fmt::{Debug, Display, Formatter},
    hash::Hash,
    str::FromStr,
};

use meridian_core::{UnixNanos, correctness::FAILED};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    enums::{AggregationSource, BarAggregation, PriceType},
    identifiers::InstrumentId,
    types::{Price, Quantity},
};

/// Represents a bar aggregation specification as a step, aggregation method and price type.
#[repr(C)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BarSpecification {
    /// The step for binning samples for bar aggregation.
    pub step: usize,
    /// The type of bar aggregation.
    pub aggregation: BarAggregation,
    /// The price type to use for aggregation.
    pub price_type: PriceType,
}

impl BarSpecification {
    /// Creates a new [`BarSpecification`] instance.
    #[must_use]
    pub fn new(step: usize, aggregation: BarAggregation, price_type: PriceType) -> Self {
        Self {
            step,
            aggregation,
            price_type,
        }
    }
}

impl Display for BarSpecification {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.step, self.aggregation, self.price_type)
    }
}

/// Represents a bar type including the instrument ID, bar specification and
/// aggregation source.
#[repr(C)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BarType {
    /// The bar type's instrument ID.
    pub instrument_id: InstrumentId,
    /// The bar type's specification.
    pub spec: BarSpecification,
    /// The bar type's aggregation source.
    pub aggregation_source: AggregationSource,
}

impl BarType {
    /// Creates a new [`BarType`] instance.
    #[must_use]
    pub fn new(
        instrument_id: InstrumentId,
        spec: BarSpecification,
        aggregation_source: AggregationSource,
    ) -> Self {
        Self {
            instrument_id,
            spec,
            aggregation_source,
        }
    }

    /// Returns the instrument ID for the bar type.
    #[must_use]
    pub fn instrument_id(&self) -> InstrumentId {
        self.instrument_id
    }

    /// Returns the specification for the bar type.
    #[must_use]
    pub fn spec(&self) -> BarSpecification {
        self.spec
    }

    /// Returns whether the bar type is externally aggregated.
    #[must_use]
    pub fn is_externally_aggregated(&self) -> bool {
        self.aggregation_source == AggregationSource::External
    }
}

impl FromStr for BarType {
    type Err = anyhow::Error;

    /// Parses a bar type string such as `"AUD/USD.SIM-1-MINUTE-BID-EXTERNAL"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let pieces: Vec<&str> = s.rsplitn(5, '-').collect();
        if pieces.len() != 5 {
            anyhow::bail!(
                "Error parsing `BarType` from '{s}', expected '<instrument_id>-<step>-<aggregation>-<price_type>-<aggregation_source>'"
            );
        }
        // rsplitn returns pieces in reverse order
        let instrument_id = InstrumentId::from_str(pieces[4])
            .map_err(|e| anyhow::anyhow!("Error parsing `BarType` from '{s}': {e}"))?;
        let step: usize = pieces[3]
            .parse()
            .map_err(|e| anyhow::anyhow!("Error parsing `BarType` step from '{s}': {e}"))?;
        let aggregation = BarAggregation::from_str(pieces[2])
            .map_err(|e| anyhow::anyhow!("Error parsing `BarType` aggregation from '{s}': {e}"))?;
        let price_type = PriceType::from_str(pieces[1])
            .map_err(|e| anyhow::anyhow!("Error parsing `BarType` price type from '{s}': {e}"))?;
        let aggregation_source = AggregationSource::from_str(pieces[0])
            .map_err(|e| anyhow::anyhow!("Error parsing `BarType` source from '{s}': {e}"))?;

        Ok(Self {
            instrument_id,
            spec: BarSpecification::new(step, aggregation, price_type),
            aggregation_source,
        })
    }
}

impl From<&str> for BarType {
    /// Creates a [`BarType`] from a string slice.
    ///
    /// # Panics
    ///
    /// Panics if the `value` string is not valid.
    fn from(value: &str) -> Self {
        Self::from_str(value).expect(FAILED)
    }
}

impl Display for BarType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.instrument_id, self.spec, self.aggregation_source
        )
    }
}

impl Serialize for BarType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for BarType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bar_type_str = String::deserialize(deserializer)?;
        Self::from_str(&bar_type_str).map_err(serde::de::Error::custom)
    }
}

/// Represents an aggregated bar.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct Bar {
    /// The bar type for this bar.
    pub bar_type: BarType,
    /// The bars open price.
    pub open: Price,
    /// The bars high price.
    pub high: Price,
    /// The bars low price.
    pub low: Price,
    /// The bars close price.
    pub close: Price,
    /// The bars volume.
    pub volume: Quantity,
    /// UNIX timestamp (nanoseconds) when the data event occurred.
    pub ts_event: UnixNanos,
    /// UNIX timestamp (nanoseconds) when the struct was initialized.
    pub ts_init: UnixNanos,
}

impl Bar {
    /// Creates a new [`Bar`] instance.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        bar_type: BarType,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: Quantity,
        ts_event: UnixNanos,
        ts_init: UnixNanos,
    ) -> Self {
        Self {
            bar_type,
            open,
            high,
            low,
            close,
            volume,
            ts_event,
            ts_init,
        }
    }

    /// Returns the instrument ID for the bar.
    #[must_use]
    pub fn instrument_id(&self) -> InstrumentId {
        self.bar_type.instrument_id
    }
}

impl Display for Bar {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{},{}",
            self.bar_type, self.open, self.high, self.low, self.close, self.volume, self.ts_event
        )
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
    fn test_bar_type_parse() {
        let bar_type = BarType::from("AUD/USD.SIM-1-MINUTE-BID-EXTERNAL");
        assert_eq!(bar_type.instrument_id(), InstrumentId::from("AUD/USD.SIM"));
        assert_eq!(bar_type.spec().step, 1);
        assert_eq!(bar_type.spec().aggregation, BarAggregation::Minute);
        assert_eq!(bar_type.spec().price_type, PriceType::Bid);
        assert!(bar_type.is_externally_aggregated());
    }

    #[rstest]
    fn test_bar_type_round_trip() {
        let input = "EUR/USD.SIM-15-MINUTE-ASK-EXTERNAL";
        let bar_type = BarType::from(input);
        assert_eq!(bar_type.to_string(), input);
    }

    #[rstest]
    #[should_panic(expected = "Condition failed")]
    fn test_bar_type_parse_invalid_panics() {
        let _ = BarType::from("AUD/USD.SIM");
    }

    #[rstest]
    fn test_bar_instrument_id() {
        let bar_type = BarType::from("AUD/USD.SIM-1-MINUTE-LAST-EXTERNAL");
        let bar = Bar::new(
            bar_type,
            Price::from("0.6600"),
            Price::from("0.6610"),
            Price::from("0.6595"),
            Price::from("0.6605"),
            Quantity::from("100000"),
            UnixNanos::from(1),
            UnixNanos::from(2),
        );
        assert_eq!(bar.instrument_id(), InstrumentId::from("AUD/USD.SIM"));
        assert_eq!(bar.close, Price::from("0.6605"));
    }
}
