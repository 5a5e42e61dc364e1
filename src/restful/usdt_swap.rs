use anyhow::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use tracing::{info, warn};

use super::adapt::{
    adapt_open_type, adapt_order, cancel_result, merge_positions, new_client_order_id,
};
use super::models::{AccountInfo, CancelResp, OrderInfo, PlaceOrderResp, PositionInfo};
use crate::client::HbdmClient;
use crate::config::{HbdmConfig, DEFAULT_LEVER};
use crate::error::HbdmError;
use crate::traits::{FutureRestAPI, Transport};
use crate::types::{
    Currency, CurrencyPair, FutureAccount, FutureOrder, FuturePosition, FutureSubAccount,
    OpenType, OrderPriceType,
};

pub const HBDM_USDT_SWAP: &str = "hbdm.com_usdt_swap";

pub const GET_ACCOUNT_INFO_PATH: &str = "/linear-swap-api/v1/swap_account_info";
pub const PLACE_ORDER_PATH: &str = "/linear-swap-api/v1/swap_order";
pub const GET_ORDER_INFO_PATH: &str = "/linear-swap-api/v1/swap_order_info";
pub const LIGHTNING_CLOSE_PATH: &str = "/linear-swap-api/v1/swap_lightning_close_position";
pub const CANCEL_ORDER_PATH: &str = "/linear-swap-api/v1/swap_cancel";
pub const GET_POSITION_PATH: &str = "/linear-swap-api/v1/swap_position_info";
pub const CANCEL_ALL_PATH: &str = "/linear-swap-api/v1/swap_cancelall";

/// USDT 本位永续 逐仓
pub struct HbdmUsdtSwap<T: Transport = HbdmClient> {
    base: T,
    lever: i32,
}

impl HbdmUsdtSwap<HbdmClient> {
    pub fn new(config: HbdmConfig) -> Result<Self> {
        let lever = config.effective_lever();
        Ok(HbdmUsdtSwap {
            base: HbdmClient::new(config)?,
            lever,
        })
    }
}

impl<T: Transport> HbdmUsdtSwap<T> {
    pub fn with_transport(base: T, lever: i32) -> Self {
        HbdmUsdtSwap {
            base,
            lever: if lever <= 0 { DEFAULT_LEVER } else { lever },
        }
    }

    pub fn lever(&self) -> i32 {
        self.lever
    }

    pub fn transport(&self) -> &T {
        &self.base
    }

    async fn request<R: DeserializeOwned>(
        &self,
        path: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<R> {
        let data = self.base.do_request(path, params).await?;
        Ok(serde_json::from_value(data)?)
    }

    /// 查询账户信息，不传合约时返回全部合约
    /// POST /linear-swap-api/v1/swap_account_info
    pub async fn get_account_info(&self, pair: Option<&CurrencyPair>) -> Result<FutureAccount> {
        let mut params: BTreeMap<String, String> = BTreeMap::new();
        if let Some(pair) = pair {
            params.insert("contract_code".into(), pair.contract_code());
        }
        let rows: Vec<AccountInfo> = self.request(GET_ACCOUNT_INFO_PATH, &params).await?;

        let mut account = FutureAccount::default();
        for acc in rows {
            let currency = Currency::new(&acc.symbol);
            account.sub_accounts.insert(
                currency.clone(),
                FutureSubAccount {
                    currency,
                    margin_balance: acc.margin_balance,
                    margin_position: acc.margin_position,
                    profit_real: acc.profit_real,
                    profit_unreal: acc.profit_unreal,
                    risk_rate: acc.risk_rate,
                },
            );
        }
        Ok(account)
    }

    /// 查询持仓，按合约合并多空
    /// POST /linear-swap-api/v1/swap_position_info
    pub async fn get_future_position(&self, pair: &CurrencyPair) -> Result<Vec<FuturePosition>> {
        let mut params: BTreeMap<String, String> = BTreeMap::new();
        params.insert("contract_code".into(), pair.contract_code());
        let rows: Vec<PositionInfo> = self.request(GET_POSITION_PATH, &params).await?;
        Ok(merge_positions(&rows))
    }

    /// 闪电平仓，只用到 direction
    /// POST /linear-swap-api/v1/swap_lightning_close_position
    pub async fn lightning_close(
        &self,
        pair: &CurrencyPair,
        volume: f64,
        open_type: OpenType,
    ) -> Result<String> {
        let (direction, _) = adapt_open_type(open_type);
        let mut params: BTreeMap<String, String> = BTreeMap::new();
        params.insert("contract_code".into(), pair.contract_code());
        params.insert("client_order_id".into(), new_client_order_id().to_string());
        params.insert("volume".into(), volume.to_string());
        params.insert("direction".into(), direction.into());

        let resp: PlaceOrderResp = self.request(LIGHTNING_CLOSE_PATH, &params).await?;
        Ok(resp.order_id_str)
    }
}

#[async_trait]
impl<T: Transport> FutureRestAPI for HbdmUsdtSwap<T> {
    fn get_exchange_name(&self) -> &'static str {
        HBDM_USDT_SWAP
    }

    /// POST /linear-swap-api/v1/swap_order
    async fn place_future_order(
        &self,
        pair: &CurrencyPair,
        price: f64,
        amount: f64,
        open_type: OpenType,
        price_type: OrderPriceType,
        lever_rate: i32,
    ) -> Result<String> {
        let lever_rate = if lever_rate <= 0 { self.lever } else { lever_rate };
        let (direction, offset) = adapt_open_type(open_type);
        info!(%direction, %offset, contract = %pair.contract_code(), "place order");

        let mut params: BTreeMap<String, String> = BTreeMap::new();
        params.insert("contract_code".into(), pair.contract_code());
        params.insert("client_order_id".into(), new_client_order_id().to_string());
        params.insert("price".into(), price.to_string());
        params.insert("volume".into(), amount.to_string());
        params.insert("lever_rate".into(), lever_rate.to_string());
        params.insert("direction".into(), direction.into());
        params.insert("offset".into(), offset.into());
        params.insert("order_price_type".into(), price_type.as_str().into());

        let resp: PlaceOrderResp = self.request(PLACE_ORDER_PATH, &params).await?;
        Ok(resp.order_id_str)
    }

    /// POST /linear-swap-api/v1/swap_cancel
    async fn future_cancel_order(&self, pair: &CurrencyPair, order_id: &str) -> Result<bool> {
        let mut params: BTreeMap<String, String> = BTreeMap::new();
        params.insert("order_id".into(), order_id.into());
        params.insert("contract_code".into(), pair.contract_code());

        let resp: CancelResp = self.request(CANCEL_ORDER_PATH, &params).await?;
        cancel_result(resp).map_err(|e| {
            warn!(%order_id, error = %e, "cancel order failed");
            e.into()
        })
    }

    /// POST /linear-swap-api/v1/swap_cancelall
    async fn future_cancel_all(
        &self,
        pair: &CurrencyPair,
        open_type: Option<OpenType>,
    ) -> Result<bool> {
        let mut params: BTreeMap<String, String> = BTreeMap::new();
        params.insert("contract_code".into(), pair.contract_code());
        if let Some(open_type) = open_type {
            let (direction, offset) = adapt_open_type(open_type);
            params.insert("direction".into(), direction.into());
            params.insert("offset".into(), offset.into());
        }

        let resp: CancelResp = self.request(CANCEL_ALL_PATH, &params).await?;
        cancel_result(resp).map_err(|e| {
            warn!(contract = %pair.contract_code(), error = %e, "cancel all failed");
            e.into()
        })
    }

    /// POST /linear-swap-api/v1/swap_order_info
    async fn get_future_order(&self, order_id: &str, pair: &CurrencyPair) -> Result<FutureOrder> {
        let mut params: BTreeMap<String, String> = BTreeMap::new();
        params.insert("contract_code".into(), pair.contract_code());
        params.insert("order_id".into(), order_id.into());

        let rows: Vec<OrderInfo> = self.request(GET_ORDER_INFO_PATH, &params).await?;
        let info = rows.first().ok_or(HbdmError::NotFound)?;
        Ok(adapt_order(info, pair))
    }
}
