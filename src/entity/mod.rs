mod gas;
mod swap;
mod swap_error;
mod swap_result;
mod token;

pub use gas::{GasParams, GasSource, ResolvedGas};
pub use swap::SwapRequest;
pub use swap_error::SwapError;
pub use swap_result::{ApprovalReceipt, ChainMismatch, SwapReport};
pub use token::Token;
