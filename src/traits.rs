use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::types::{CurrencyPair, FutureOrder, OpenType, OrderPriceType};

/// 签名 + 发送请求，返回响应里的 data 字段
#[async_trait]
pub trait Transport: Send + Sync {
    async fn do_request(&self, path: &str, params: &BTreeMap<String, String>) -> Result<Value>;
}

/// 合约交易通用接口，逐仓/全仓各自实现
#[async_trait]
pub trait FutureRestAPI: Send + Sync {
    fn get_exchange_name(&self) -> &'static str;

    /// 下单，返回交易所订单号
    async fn place_future_order(
        &self,
        pair: &CurrencyPair,
        price: f64,
        amount: f64,
        open_type: OpenType,
        price_type: OrderPriceType,
        lever_rate: i32,
    ) -> Result<String>;

    async fn future_cancel_order(&self, pair: &CurrencyPair, order_id: &str) -> Result<bool>;

    /// 撤销该合约全部订单，open_type 为空时不限方向
    async fn future_cancel_all(
        &self,
        pair: &CurrencyPair,
        open_type: Option<OpenType>,
    ) -> Result<bool>;

    async fn get_future_order(&self, order_id: &str, pair: &CurrencyPair) -> Result<FutureOrder>;
}
