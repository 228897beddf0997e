pub mod swap_interactor;

pub use swap_interactor::{gas_limit_or_fallback, SwapInteractor, SwapInteractorImpl, SwapStage};
