// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::constants::{NATIVE_SENTINEL, USDC_PHAROS, USDT_PHAROS, WPHRS_PHAROS};
use crate::domain::error::AppError;
use alloy::primitives::utils::parse_units;
use alloy::primitives::{Address, U256};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// Assets the farmer can move. The native coin is represented by the
/// `0xEeee…` sentinel and is never approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    Native,
    WrappedNative,
    Usdc,
    Usdt,
}

impl Token {
    pub const ALL: [Token; 4] = [Token::Native, Token::WrappedNative, Token::Usdc, Token::Usdt];

    pub fn symbol(self) -> &'static str {
        match self {
            Token::Native => "PHRS",
            Token::WrappedNative => "WPHRS",
            Token::Usdc => "USDC",
            Token::Usdt => "USDT",
        }
    }

    pub fn address(self) -> Address {
        match self {
            Token::Native => NATIVE_SENTINEL,
            Token::WrappedNative => WPHRS_PHAROS,
            Token::Usdc => USDC_PHAROS,
            Token::Usdt => USDT_PHAROS,
        }
    }

    pub fn decimals(self) -> u8 {
        match self {
            Token::Native | Token::WrappedNative => 18,
            Token::Usdc | Token::Usdt => 6,
        }
    }

    pub fn is_native(self) -> bool {
        matches!(self, Token::Native)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Token {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.symbol().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AppError::Config(format!("Unknown token symbol: {wanted}")))
    }
}

impl<'de> Deserialize<'de> for Token {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Strictly positive human-readable amount ("0.001", "1"), kept as text so
/// scaling to base units is exact for any decimal precision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAmount(String);

impl TokenAmount {
    /// For known-good literals such as configuration defaults.
    pub(crate) fn from_static(amount: &'static str) -> Self {
        Self(amount.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Scale to the smallest unit of an asset with `decimals` precision.
    pub fn to_base_units(&self, decimals: u8) -> Result<U256, AppError> {
        let parsed = parse_units(&self.0, decimals).map_err(|e| {
            AppError::Config(format!(
                "Amount {} cannot be expressed with {decimals} decimals: {e}",
                self.0
            ))
        })?;
        let units = parsed.get_absolute();
        if units.is_zero() {
            return Err(AppError::Config(format!(
                "Amount {} rounds to zero with {decimals} decimals",
                self.0
            )));
        }
        Ok(units)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TokenAmount {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut seen_dot = false;
        let mut seen_digit = false;
        for c in trimmed.chars() {
            match c {
                '0'..='9' => seen_digit = true,
                '.' if !seen_dot => seen_dot = true,
                _ => {
                    return Err(AppError::Config(format!(
                        "Amount must be a positive decimal number, got {trimmed:?}"
                    )));
                }
            }
        }
        if !seen_digit || trimmed.chars().all(|c| c == '0' || c == '.') {
            return Err(AppError::Config(format!(
                "Amount must be greater than zero, got {trimmed:?}"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{Error, Visitor};

        struct AmountVisitor;

        impl Visitor<'_> for AmountVisitor {
            type Value = TokenAmount;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a positive decimal amount as a number or string")
            }

            fn visit_str<E: Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: Error>(self, v: u64) -> Result<Self::Value, E> {
                v.to_string().parse().map_err(E::custom)
            }

            fn visit_i64<E: Error>(self, v: i64) -> Result<Self::Value, E> {
                v.to_string().parse().map_err(E::custom)
            }

            fn visit_f64<E: Error>(self, v: f64) -> Result<Self::Value, E> {
                v.to_string().parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}
