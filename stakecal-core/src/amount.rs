//! Ledger-native amounts.
//!
//! The ledger counts stakes and balances in wei (10^-18 ether). `Ether`
//! keeps the exact integer and renders it the way wallets do: trailing
//! zeros trimmed, but always at least one fractional digit ("1.0", "0.05").

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::StakeCalError;

pub const DECIMALS: u32 = 18;
const WEI_PER_ETHER: u128 = 10u128.pow(DECIMALS);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Ether(u128);

impl Ether {
    pub const ZERO: Ether = Ether(0);

    pub fn from_wei(wei: u128) -> Self {
        Ether(wei)
    }

    pub fn wei(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Parse a human decimal amount in ether ("0.5", "2", ".25") into wei.
    pub fn parse_ether(input: &str) -> Result<Self, StakeCalError> {
        let invalid = || StakeCalError::InvalidAmount(input.to_string());
        let trimmed = input.trim();

        let (whole, frac) = match trimmed.split_once('.') {
            Some((w, f)) => (w, f),
            None => (trimmed, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }
        if frac.len() > DECIMALS as usize {
            return Err(StakeCalError::InvalidAmount(format!(
                "{input} has more than {DECIMALS} decimal places"
            )));
        }

        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let frac_wei: u128 = if frac.is_empty() {
            0
        } else {
            let padded = format!("{frac:0<width$}", width = DECIMALS as usize);
            padded.parse().map_err(|_| invalid())?
        };

        whole
            .checked_mul(WEI_PER_ETHER)
            .and_then(|w| w.checked_add(frac_wei))
            .map(Ether)
            .ok_or_else(invalid)
    }

    /// Parse a decimal string of wei, as carried on the wire.
    pub fn parse_wei(input: &str) -> Result<Self, StakeCalError> {
        input
            .trim()
            .parse::<u128>()
            .map(Ether)
            .map_err(|_| StakeCalError::InvalidAmount(format!("{input:?} is not a wei amount")))
    }
}

impl fmt::Display for Ether {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / WEI_PER_ETHER;
        let frac = self.0 % WEI_PER_ETHER;

        let frac = format!("{frac:0>width$}", width = DECIMALS as usize);
        let frac = frac.trim_end_matches('0');
        let frac = if frac.is_empty() { "0" } else { frac };

        write!(f, "{whole}.{frac}")
    }
}

impl FromStr for Ether {
    type Err = StakeCalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ether::parse_ether(s)
    }
}

// Wire format is a decimal string of wei so that amounts above 2^53 survive JSON.
impl Serialize for Ether {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Ether {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ether::parse_wei(&raw).map_err(serde::de::Error::custom)
    }
}
