use alloy::primitives::utils::{format_units, parse_units};
use alloy::primitives::U256;
use lazy_static::lazy_static;
use regex::Regex;

use crate::entity::SwapError;
use crate::evm::constants::REFERENCE_DECIMALS;

/// Amount entered by the user, resolved against a token's precision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedAmount {
    /// Parsed at the reference precision (18 decimals)
    pub reference_units: U256,
    /// Rescaled to the token's declared precision; this is what goes on chain
    pub base_units: U256,
    pub decimals: u8,
}

impl NormalizedAmount {
    pub fn was_rescaled(&self) -> bool {
        self.decimals != REFERENCE_DECIMALS
    }
}

/// Parse a whole-unit decimal string at the reference precision
pub fn parse_reference_amount(amount: &str) -> Result<U256, SwapError> {
    lazy_static! {
        static ref AMOUNT_RE: Regex = Regex::new(r"^\d+(\.\d+)?$").unwrap();
    }

    let amount = amount.trim();
    if !AMOUNT_RE.is_match(amount) {
        return Err(SwapError::InvalidAmount(format!(
            "'{}' is not a plain decimal number",
            amount
        )));
    }

    let fraction_digits = amount.split_once('.').map_or(0, |(_, fraction)| fraction.len());
    if fraction_digits > REFERENCE_DECIMALS as usize {
        return Err(SwapError::InvalidAmount(format!(
            "'{}' has more than {} fractional digits",
            amount, REFERENCE_DECIMALS
        )));
    }

    let parsed = parse_units(amount, REFERENCE_DECIMALS)
        .map_err(|e| SwapError::InvalidAmount(format!("'{}': {}", amount, e)))?;

    Ok(parsed.get_absolute())
}

/// `raw * 10^to / 10^from`, remainder discarded
pub fn rescale(raw: U256, from_decimals: u8, to_decimals: u8) -> Result<U256, SwapError> {
    let ten = U256::from(10u8);

    ten.checked_pow(U256::from(to_decimals))
        .zip(ten.checked_pow(U256::from(from_decimals)))
        .and_then(|(scale_up, scale_down)| {
            raw.checked_mul(scale_up).map(|scaled| scaled / scale_down)
        })
        .ok_or_else(|| {
            SwapError::InvalidAmount(format!(
                "{} overflows 256 bits at {} decimals",
                raw, to_decimals
            ))
        })
}

/// Convert a user amount into the token's base units.
///
/// Zero after rescaling is rejected: a swap of nothing would only burn gas.
pub fn to_base_units(amount: &str, token_decimals: u8) -> Result<NormalizedAmount, SwapError> {
    let reference_units = parse_reference_amount(amount)?;
    let base_units = rescale(reference_units, REFERENCE_DECIMALS, token_decimals)?;

    if base_units.is_zero() {
        return Err(SwapError::InvalidAmount(format!(
            "'{}' is zero at {} decimals",
            amount.trim(),
            token_decimals
        )));
    }

    Ok(NormalizedAmount {
        reference_units,
        base_units,
        decimals: token_decimals,
    })
}

/// Render base units as a whole-unit decimal string
pub fn format_base_units(amount: U256, decimals: u8) -> String {
    format_units(amount, decimals).unwrap_or_else(|_| amount.to_string())
}
