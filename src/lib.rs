//! HBDM (火币合约) USDT 本位永续合约 REST SDK
//!
//! 逐仓: [`HbdmUsdtSwap`]，全仓: [`HbdmUsdtSwapCross`]。

pub mod client;
pub mod config;
pub mod error;
pub mod restful;
pub mod traits;
pub mod types;

pub use client::HbdmClient;
pub use config::HbdmConfig;
pub use error::HbdmError;
pub use restful::usdt_swap::HbdmUsdtSwap;
pub use restful::usdt_swap_cross::HbdmUsdtSwapCross;
pub use traits::{FutureRestAPI, Transport};
