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

//! Defines commonly used currencies and the process-wide currency registry.

use std::{
    collections::HashMap,
    sync::{LazyLock, Mutex},
};

use ustr::Ustr;

use crate::{enums::CurrencyType, types::Currency};

/// The process-wide currency map, seeded with commonly used currencies.
///
/// User defined currencies can be registered with [`Currency::register`].
pub static CURRENCY_MAP: LazyLock<Mutex<HashMap<String, Currency>>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    for currency in [
        Currency::AUD(),
        Currency::BRL(),
        Currency::CAD(),
        Currency::CHF(),
        Currency::EUR(),
        Currency::GBP(),
        Currency::JPY(),
        Currency::NZD(),
        Currency::SGD(),
        Currency::USD(),
        Currency::BTC(),
        Currency::ETH(),
        Currency::USDC(),
        Currency::USDT(),
    ] {
        map.insert(currency.code.to_string(), currency);
    }
    Mutex::new(map)
});

macro_rules! define_currency {
    ($fn_name:ident, $code:literal, $precision:literal, $iso4217:literal, $name:literal, $currency_type:ident) => {
        #[allow(non_snake_case)]
        impl Currency {
            #[doc = concat!("Returns the ", $name, " currency (", $code, ").")]
            #[must_use]
            pub fn $fn_name() -> Self {
                Self {
                    code: Ustr::from($code),
                    precision: $precision,
                    iso4217: $iso4217,
                    name: Ustr::from($name),
                    currency_type: CurrencyType::$currency_type,
                }
            }
        }
    };
}

// Fiat currencies
define_currency!(AUD, "AUD", 2, 36, "Australian dollar", Fiat);
define_currency!(BRL, "BRL", 2, 986, "Brazilian real", Fiat);
define_currency!(CAD, "CAD", 2, 124, "Canadian dollar", Fiat);
define_currency!(CHF, "CHF", 2, 756, "Swiss franc", Fiat);
define_currency!(EUR, "EUR", 2, 978, "Euro", Fiat);
define_currency!(GBP, "GBP", 2, 826, "British Pound", Fiat);
define_currency!(JPY, "JPY", 0, 392, "Japanese yen", Fiat);
define_currency!(NZD, "NZD", 2, 554, "New Zealand dollar", Fiat);
define_currency!(SGD, "SGD", 2, 702, "Singapore dollar", Fiat);
define_currency!(USD, "USD", 2, 840, "United States dollar", Fiat);

// Crypto currencies
define_currency!(BTC, "BTC", 8, 0, "Bitcoin", Crypto);
define_currency!(ETH, "ETH", 8, 0, "Ether", Crypto);
define_currency!(USDC, "USDC", 8, 0, "USD Coin", Crypto);
define_currency!(USDT, "USDT", 8, 0, "Tether", Crypto);
