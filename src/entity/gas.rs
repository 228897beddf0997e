use serde::{Deserialize, Serialize};

/// Gas settings attached to an outgoing transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasParams {
    pub gas_limit: u64,
    pub gas_price: u128,
}

/// Where a resolved gas limit came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GasSource {
    Estimated,
    /// Node could not simulate the call
    FallbackAfterError,
    /// Node answered with a zero estimate
    FallbackAfterZero,
}

impl std::fmt::Display for GasSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GasSource::Estimated => write!(f, "ESTIMATED"),
            GasSource::FallbackAfterError => write!(f, "FALLBACK_AFTER_ERROR"),
            GasSource::FallbackAfterZero => write!(f, "FALLBACK_AFTER_ZERO"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedGas {
    pub params: GasParams,
    pub source: GasSource,
}
