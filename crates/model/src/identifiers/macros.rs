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

//! Provides macros for generating identifier functionality.

macro_rules! impl_serialization_for_identifier {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                self.inner().serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let value_str = String::deserialize(deserializer)?;
                let value: $ty = value_str.into();
                Ok(value)
            }
        }
    };
}

macro_rules! impl_from_str_for_identifier {
    ($ty:ty) => {
        impl From<&str> for $ty {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $ty {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }
    };
}

macro_rules! impl_as_ref_for_identifier {
    ($ty:ty) => {
        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }
    };
}

/// Defines an interned string identifier type with correctness checking.
macro_rules! define_identifier {
    ($ty:ident, $doc:literal) => {
        #[doc = $doc]
        #[repr(C)]
        #[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
        pub struct $ty(Ustr);

        impl $ty {
            /// Creates a new identifier instance with correctness checking.
            ///
            /// # Errors
            ///
            /// Returns an error if `value` is not a valid string.
            pub fn new_checked<T: AsRef<str>>(value: T) -> anyhow::Result<Self> {
                let value = value.as_ref();
                check_valid_string(value, stringify!(value))?;
                Ok(Self(Ustr::from(value)))
            }

            /// Creates a new identifier instance.
            ///
            /// # Panics
            ///
            /// Panics if `value` is not a valid string.
            pub fn new<T: AsRef<str>>(value: T) -> Self {
                Self::new_checked(value).expect(FAILED)
            }

            /// Creates a new identifier instance without correctness checking.
            #[must_use]
            pub fn from_str_unchecked<T: AsRef<str>>(s: T) -> Self {
                Self(Ustr::from(s.as_ref()))
            }

            /// Returns the inner identifier value.
            #[must_use]
            pub fn inner(&self) -> Ustr {
                self.0
            }

            /// Returns the inner identifier value as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl Debug for $ty {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:?}", self.0)
            }
        }

        impl Display for $ty {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}
