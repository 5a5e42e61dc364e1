pub mod adapt;
pub mod models;
pub mod sign;
pub mod usdt_swap;
pub mod usdt_swap_cross;
