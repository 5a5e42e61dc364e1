use anyhow::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use tracing::{info, warn};

use super::adapt::{adapt_open_type, adapt_order, cancel_result, merge_positions, new_client_order_id};
use super::models::{CancelResp, CrossAccountInfo, OrderInfo, PlaceOrderResp, PositionInfo};
use crate::client::HbdmClient;
use crate::config::{HbdmConfig, DEFAULT_LEVER};
use crate::error::HbdmError;
use crate::traits::{FutureRestAPI, Transport};
use crate::types::{
    Currency, CurrencyPair, FutureAccount, FutureOrder, FuturePosition, FutureSubAccount,
    OpenType, OrderPriceType,
};

pub const HBDM_USDT_SWAP_CROSS: &str = "hbdm.com_usdt_swap_cross";

/// 全仓保证金账户
pub const MARGIN_ACCOUNT: &str = "USDT";

pub const GET_ACCOUNT_INFO_PATH: &str = "/linear-swap-api/v1/swap_cross_account_info";
pub const PLACE_ORDER_PATH: &str = "/linear-swap-api/v1/swap_cross_order";
pub const GET_ORDER_INFO_PATH: &str = "/linear-swap-api/v1/swap_cross_order_info";
pub const CANCEL_ORDER_PATH: &str = "/linear-swap-api/v1/swap_cross_cancel";
pub const GET_POSITION_PATH: &str = "/linear-swap-api/v1/swap_cross_position_info";
pub const CANCEL_ALL_PATH: &str = "/linear-swap-api/v1/swap_cross_cancelall";

/// USDT 本位永续 全仓
pub struct HbdmUsdtSwapCross<T: Transport = HbdmClient> {
    base: T,
    lever: i32,
}

impl HbdmUsdtSwapCross<HbdmClient> {
    pub fn new(config: HbdmConfig) -> Result<Self> {
        let lever = config.effective_lever();
        Ok(HbdmUsdtSwapCross {
            base: HbdmClient::new(config)?,
            lever,
        })
    }
}

impl<T: Transport> HbdmUsdtSwapCross<T> {
    pub fn with_transport(base: T, lever: i32) -> Self {
        HbdmUsdtSwapCross {
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

    /// 查询 USDT 全仓账户。余额、保证金、已实现盈亏、风险率取账户行，
    /// 未实现盈亏取合约明细行
    /// POST /linear-swap-api/v1/swap_cross_account_info
    pub async fn get_account_info(&self) -> Result<FutureAccount> {
        let mut params: BTreeMap<String, String> = BTreeMap::new();
        params.insert("margin_account".into(), MARGIN_ACCOUNT.into());
        let rows: Vec<CrossAccountInfo> = self.request(GET_ACCOUNT_INFO_PATH, &params).await?;

        let mut account = FutureAccount::default();
        for acc in &rows {
            for detail in &acc.contract_detail {
                let currency = Currency::new(&detail.symbol);
                account.sub_accounts.insert(
                    currency.clone(),
                    FutureSubAccount {
                        currency,
                        margin_balance: acc.margin_balance,
                        margin_position: acc.margin_position,
                        profit_real: acc.profit_real,
                        profit_unreal: detail.profit_unreal,
                        risk_rate: acc.risk_rate,
                    },
                );
            }
        }
        Ok(account)
    }

    /// 查询单个合约持仓。只取与请求合约代码一致的记录，
    /// 没有匹配的持仓时返回该合约的零值记录
    /// POST /linear-swap-api/v1/swap_cross_position_info
    pub async fn get_future_position(&self, pair: &CurrencyPair) -> Result<FuturePosition> {
        let contract_code = pair.contract_code();
        let mut params: BTreeMap<String, String> = BTreeMap::new();
        params.insert("contract_code".into(), contract_code.clone());
        let rows: Vec<PositionInfo> = self.request(GET_POSITION_PATH, &params).await?;

        let matched = merge_positions(&rows)
            .into_iter()
            .find(|p| p.contract_code.eq_ignore_ascii_case(&contract_code));
        Ok(matched.unwrap_or_else(|| FuturePosition {
            symbol: pair.clone(),
            contract_code,
            ..Default::default()
        }))
    }
}

#[async_trait]
impl<T: Transport> FutureRestAPI for HbdmUsdtSwapCross<T> {
    fn get_exchange_name(&self) -> &'static str {
        HBDM_USDT_SWAP_CROSS
    }

    /// price 为 0 时不传 price (市价类报价)
    /// POST /linear-swap-api/v1/swap_cross_order
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
        info!(%direction, %offset, contract = %pair.contract_code(), "place cross order");

        let mut params: BTreeMap<String, String> = BTreeMap::new();
        params.insert("contract_code".into(), pair.contract_code());
        params.insert("client_order_id".into(), new_client_order_id().to_string());
        if price != 0.0 {
            params.insert("price".into(), price.to_string());
        }
        params.insert("volume".into(), amount.to_string());
        params.insert("lever_rate".into(), lever_rate.to_string());
        params.insert("direction".into(), direction.into());
        params.insert("offset".into(), offset.into());
        params.insert("order_price_type".into(), price_type.as_str().into());

        let resp: PlaceOrderResp = self.request(PLACE_ORDER_PATH, &params).await?;
        Ok(resp.order_id_str)
    }

    /// POST /linear-swap-api/v1/swap_cross_cancel
    async fn future_cancel_order(&self, pair: &CurrencyPair, order_id: &str) -> Result<bool> {
        let mut params: BTreeMap<String, String> = BTreeMap::new();
        params.insert("order_id".into(), order_id.into());
        params.insert("contract_code".into(), pair.contract_code());

        let resp: CancelResp = self.request(CANCEL_ORDER_PATH, &params).await?;
        cancel_result(resp).map_err(|e| {
            warn!(%order_id, error = %e, "cross cancel order failed");
            e.into()
        })
    }

    /// POST /linear-swap-api/v1/swap_cross_cancelall
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
            warn!(contract = %pair.contract_code(), error = %e, "cross cancel all failed");
            e.into()
        })
    }

    /// POST /linear-swap-api/v1/swap_cross_order_info
    async fn get_future_order(&self, order_id: &str, pair: &CurrencyPair) -> Result<FutureOrder> {
        let mut params: BTreeMap<String, String> = BTreeMap::new();
        params.insert("contract_code".into(), pair.contract_code());
        params.insert("order_id".into(), order_id.into());

        let rows: Vec<OrderInfo> = self.request(GET_ORDER_INFO_PATH, &params).await?;
        let info = rows.first().ok_or(HbdmError::NotFound)?;
        Ok(adapt_order(info, pair))
    }
}
