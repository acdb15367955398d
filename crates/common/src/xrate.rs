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

//! Exchange rate calculations between currencies.
//!
//! An exchange rate is the value of one asset versus that of another.

use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use meridian_core::correctness::{check_equal_usize, check_map_not_empty};
use meridian_model::enums::PriceType;
use ustr::Ustr;

/// Returns the calculated exchange rate for the given price type using the
/// given maps of bid and ask quotes, keyed by symbol (e.g. "EUR/USD").
///
/// Rates are resolved directly from a quoted pair, from its inverse, or through
/// a single common currency. Returns `Ok(None)` when no path exists.
///
/// # Errors
///
/// Returns an error if either quote map is empty, if the map lengths differ,
/// or if `price_type` is not `Bid`, `Ask` or `Mid`.
pub fn get_exchange_rate(
    from_currency: Ustr,
    to_currency: Ustr,
    price_type: PriceType,
    quotes_bid: HashMap<String, f64>,
    quotes_ask: HashMap<String, f64>,
) -> anyhow::Result<Option<f64>> {
    check_map_not_empty(&quotes_bid, stringify!(quotes_bid))?;
    check_map_not_empty(&quotes_ask, stringify!(quotes_ask))?;
    check_equal_usize(
        quotes_bid.len(),
        quotes_ask.len(),
        "quotes_bid.len()",
        "quotes_ask.len()",
    )?;

    if from_currency == to_currency {
        return Ok(Some(1.0));
    }

    let calculation_quotes: HashMap<String, f64> = match price_type {
        PriceType::Bid => quotes_bid,
        PriceType::Ask => quotes_ask,
        PriceType::Mid => quotes_bid
            .iter()
            .map(|(symbol, bid)| {
                let ask = quotes_ask.get(symbol).unwrap_or(bid);
                (symbol.clone(), f64::midpoint(*bid, *ask))
            })
            .collect(),
        _ => anyhow::bail!("Cannot calculate exchange rate for PriceType {price_type}"),
    };

    let mut codes: HashSet<Ustr> = HashSet::new();
    let mut exchange_rates: HashMap<Ustr, HashMap<Ustr, f64>> = HashMap::new();

    // Build the quote table from the given symbols
    for (symbol, quote) in &calculation_quotes {
        let pieces: Vec<&str> = symbol.split('/').collect();
        if pieces.len() != 2 {
            continue;
        }
        let code_lhs = Ustr::from(pieces[0]);
        let code_rhs = Ustr::from(pieces[1]);

        codes.insert(code_lhs);
        codes.insert(code_rhs);

        let rates_lhs = exchange_rates.entry(code_lhs).or_default();
        rates_lhs.insert(code_lhs, 1.0);
        rates_lhs.insert(code_rhs, *quote);

        let rates_rhs = exchange_rates.entry(code_rhs).or_default();
        rates_rhs.insert(code_rhs, 1.0);
    }

    let code_perms: Vec<(Ustr, Ustr)> = codes
        .iter()
        .cartesian_product(codes.iter())
        .filter(|(a, b)| a != b)
        .map(|(a, b)| (*a, *b))
        .collect();

    // Insert inverse rates
    for (perm0, perm1) in &code_perms {
        let rate_0_to_1 = exchange_rates
            .get(perm0)
            .and_then(|rates| rates.get(perm1))
            .copied();
        if let Some(rate) = rate_0_to_1
            && let Some(xrate_perm1) = exchange_rates.get_mut(perm1)
        {
            xrate_perm1.entry(*perm0).or_insert(1.0 / rate);
        }

        let rate_1_to_0 = exchange_rates
            .get(perm1)
            .and_then(|rates| rates.get(perm0))
            .copied();
        if let Some(rate) = rate_1_to_0
            && let Some(xrate_perm0) = exchange_rates.get_mut(perm0)
        {
            xrate_perm0.entry(*perm1).or_insert(1.0 / rate);
        }
    }

    if let Some(rates) = exchange_rates.get(&from_currency)
        && let Some(rate) = rates.get(&to_currency)
    {
        return Ok(Some(*rate));
    }

    // Calculate remaining rates through a single common currency
    for (perm0, perm1) in &code_perms {
        if exchange_rates
            .get(perm1)
            .is_some_and(|rates| rates.contains_key(perm0))
        {
            continue;
        }

        for code in &codes {
            let through_common = {
                let rates_perm0 = exchange_rates.get(perm0);
                let rates_perm1 = exchange_rates.get(perm1);
                match (rates_perm0, rates_perm1) {
                    (Some(rates0), Some(rates1)) => {
                        match (rates0.get(code), rates1.get(code)) {
                            (Some(rate0), Some(rate1)) => Some((*rate0, *rate1)),
                            _ => None,
                        }
                    }
                    _ => None,
                }
            };

            if let Some((common_rate0, common_rate1)) = through_common {
                if let Some(rates_perm1) = exchange_rates.get_mut(perm1) {
                    rates_perm1.insert(*perm0, common_rate1 / common_rate0);
                }
                if let Some(rates_perm0) = exchange_rates.get_mut(perm0) {
                    rates_perm0
                        .entry(*perm1)
                        .or_insert(common_rate0 / common_rate1);
                }
            }
        }
    }

    Ok(exchange_rates
        .get(&from_currency)
        .and_then(|rates| rates.get(&to_currency))
        .copied())
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn setup_test_quotes() -> (HashMap<String, f64>, HashMap<String, f64>) {
        let mut quotes_bid = HashMap::new();
        let mut quotes_ask = HashMap::new();

        quotes_bid.insert("EUR/USD".to_string(), 1.1000);
        quotes_ask.insert("EUR/USD".to_string(), 1.1002);

        quotes_bid.insert("GBP/USD".to_string(), 1.3000);
        quotes_ask.insert("GBP/USD".to_string(), 1.3002);

        quotes_bid.insert("USD/JPY".to_string(), 110.00);
        quotes_ask.insert("USD/JPY".to_string(), 110.02);

        quotes_bid.insert("AUD/USD".to_string(), 0.7500);
        quotes_ask.insert("AUD/USD".to_string(), 0.7502);

        (quotes_bid, quotes_ask)
    }

    #[rstest]
    fn test_same_currency() {
        let (quotes_bid, quotes_ask) = setup_test_quotes();
        let rate = get_exchange_rate(
            Ustr::from("USD"),
            Ustr::from("USD"),
            PriceType::Mid,
            quotes_bid,
            quotes_ask,
        )
        .unwrap();
        assert_eq!(rate, Some(1.0));
    }

    #[rstest]
    fn test_direct_pair() {
        let (quotes_bid, quotes_ask) = setup_test_quotes();

        let rate_bid = get_exchange_rate(
            Ustr::from("EUR"),
            Ustr::from("USD"),
            PriceType::Bid,
            quotes_bid.clone(),
            quotes_ask.clone(),
        )
        .unwrap();
        assert_eq!(rate_bid, Some(1.1000));

        let rate_ask = get_exchange_rate(
            Ustr::from("EUR"),
            Ustr::from("USD"),
            PriceType::Ask,
            quotes_bid,
            quotes_ask,
        )
        .unwrap();
        assert_eq!(rate_ask, Some(1.1002));
    }

    #[rstest]
    fn test_inverse_pair() {
        let (quotes_bid, quotes_ask) = setup_test_quotes();
        let rate = get_exchange_rate(
            Ustr::from("USD"),
            Ustr::from("EUR"),
            PriceType::Mid,
            quotes_bid,
            quotes_ask,
        )
        .unwrap()
        .unwrap();
        let expected = 1.0 / 1.1001;
        assert!((rate - expected).abs() < 1e-9);
    }

    #[rstest]
    fn test_cross_pair_through_usd() {
        let (quotes_bid, quotes_ask) = setup_test_quotes();
        let rate = get_exchange_rate(
            Ustr::from("EUR"),
            Ustr::from("JPY"),
            PriceType::Mid,
            quotes_bid,
            quotes_ask,
        )
        .unwrap()
        .unwrap();
        let expected = 1.1001 * 110.01;
        assert!((rate - expected).abs() < 0.01);
    }

    #[rstest]
    fn test_cross_pair_through_multiple_paths() {
        let (quotes_bid, quotes_ask) = setup_test_quotes();
        let rate = get_exchange_rate(
            Ustr::from("GBP"),
            Ustr::from("AUD"),
            PriceType::Mid,
            quotes_bid,
            quotes_ask,
        )
        .unwrap()
        .unwrap();
        let expected = 1.3001 / 0.7501;
        assert!((rate - expected).abs() < 0.01);
    }

    #[rstest]
    fn test_missing_pair_returns_none() {
        let mut quotes_bid = HashMap::new();
        let mut quotes_ask = HashMap::new();
        quotes_bid.insert("EUR/USD".to_string(), 1.1000);
        quotes_ask.insert("EUR/USD".to_string(), 1.1002);

        let rate = get_exchange_rate(
            Ustr::from("EUR"),
            Ustr::from("JPY"),
            PriceType::Mid,
            quotes_bid,
            quotes_ask,
        )
        .unwrap();
        assert_eq!(rate, None);
    }

    #[rstest]
    fn test_empty_quotes_errors() {
        let rate = get_exchange_rate(
            Ustr::from("EUR"),
            Ustr::from("USD"),
            PriceType::Mid,
            HashMap::new(),
            HashMap::new(),
        );
        assert!(rate.is_err());
    }

    #[rstest]
    fn test_invalid_price_type_errors() {
        let (quotes_bid, quotes_ask) = setup_test_quotes();
        let rate = get_exchange_rate(
            Ustr::from("EUR"),
            Ustr::from("USD"),
            PriceType::Last,
            quotes_bid,
            quotes_ask,
        );
        assert!(rate.is_err());
    }

    #[rstest]
    fn test_rate_consistency() {
        let (quotes_bid, quotes_ask) = setup_test_quotes();
        let rate_eur_usd = get_exchange_rate(
            Ustr::from("EUR"),
            Ustr::from("USD"),
            PriceType::Mid,
            quotes_bid.clone(),
            quotes_ask.clone(),
        )
        .unwrap()
        .unwrap();
        let rate_usd_eur = get_exchange_rate(
            Ustr::from("USD"),
            Ustr::from("EUR"),
            PriceType::Mid,
            quotes_bid,
            quotes_ask,
        )
        .unwrap()
        .unwrap();
        assert!((rate_eur_usd * rate_usd_eur - 1.0).abs() < 1e-9);
    }
}
