use serde::{Deserialize, Deserializer, Serialize};

use crate::error::HbdmError;

/// null 当作默认值处理，接口里很多数值字段会返回 null
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 通用响应
/// {"status":"ok","data":...,"ts":158797866555}
/// {"status":"error","err_code":1030,"err_msg":"...","ts":...}
#[derive(Deserialize, Serialize, Debug)]
pub struct RestApi<T> {
    pub status: String,
    pub data: Option<T>,
    pub err_code: Option<i64>,
    pub err_msg: Option<String>,
    pub ts: Option<i64>,
}

impl<T> RestApi<T> {
    pub fn into_data(self) -> Result<T, HbdmError> {
        if self.status != "ok" {
            return Err(HbdmError::Api {
                code: self.err_code.unwrap_or_default(),
                msg: self.err_msg.unwrap_or_default(),
            });
        }
        self.data
            .ok_or_else(|| HbdmError::InvalidResponse("missing data".into()))
    }
}

/// 逐仓账户
/// POST /linear-swap-api/v1/swap_account_info
#[derive(Debug, Serialize, Deserialize)]
pub struct AccountInfo {
    pub symbol: String,
    #[serde(default)]
    pub contract_code: String,
    #[serde(default, deserialize_with = "null_default")]
    pub margin_balance: f64, // 账户权益
    #[serde(default, deserialize_with = "null_default")]
    pub margin_position: f64, // 持仓保证金
    #[serde(default, deserialize_with = "null_default")]
    pub margin_frozen: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub margin_available: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub profit_real: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub profit_unreal: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub risk_rate: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub liquidation_price: f64,
}

/// 全仓账户
/// POST /linear-swap-api/v1/swap_cross_account_info
#[derive(Debug, Serialize, Deserialize)]
pub struct CrossAccountInfo {
    #[serde(default)]
    pub margin_account: String,
    #[serde(default, deserialize_with = "null_default")]
    pub margin_balance: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub margin_position: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub margin_frozen: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub margin_available: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub profit_real: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub profit_unreal: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub risk_rate: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub contract_detail: Vec<CrossContractDetail>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CrossContractDetail {
    pub symbol: String,
    #[serde(default)]
    pub contract_code: String,
    #[serde(default, deserialize_with = "null_default")]
    pub margin_position: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub margin_frozen: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub margin_available: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub profit_unreal: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub liquidation_price: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub lever_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Buy,
    Sell,
    #[serde(other)]
    Unknown,
}

/// 持仓，每个方向一行
/// POST /linear-swap-api/v1/swap_position_info
/// POST /linear-swap-api/v1/swap_cross_position_info
#[derive(Debug, Serialize, Deserialize)]
pub struct PositionInfo {
    #[serde(default)]
    pub symbol: String,
    pub contract_code: String,
    #[serde(default, deserialize_with = "null_default")]
    pub volume: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub available: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub cost_open: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub cost_hold: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub profit_unreal: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub profit_rate: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub profit: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub position_margin: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub lever_rate: f64,
    pub direction: Direction,
    /// 仅全仓返回
    #[serde(default, deserialize_with = "null_default")]
    pub last_price: f64,
}

/// 下单 / 闪电平仓
/// POST /linear-swap-api/v1/swap_order
#[derive(Debug, Serialize, Deserialize)]
pub struct PlaceOrderResp {
    #[serde(default)]
    pub order_id: i64,
    pub order_id_str: String,
    #[serde(default)]
    pub client_order_id: Option<i64>,
}

/// 撤单失败项。撤单接口返回对象，部分撤全部接口直接返回字符串
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CancelFailure {
    Message(String),
    Detail {
        #[serde(default)]
        order_id: String,
        #[serde(default)]
        err_code: Option<i64>,
        #[serde(default)]
        err_msg: String,
    },
}

impl CancelFailure {
    pub fn message(&self) -> &str {
        match self {
            CancelFailure::Message(msg) => msg,
            CancelFailure::Detail { err_msg, .. } => err_msg,
        }
    }
}

/// 撤单 / 全部撤单
/// POST /linear-swap-api/v1/swap_cancel
/// POST /linear-swap-api/v1/swap_cancelall
#[derive(Debug, Serialize, Deserialize)]
pub struct CancelResp {
    #[serde(default, deserialize_with = "null_default")]
    pub errors: Vec<CancelFailure>,
    #[serde(default)]
    pub successes: Option<String>,
}

/// 订单信息
/// POST /linear-swap-api/v1/swap_order_info
#[derive(Debug, Serialize, Deserialize)]
pub struct OrderInfo {
    #[serde(default)]
    pub symbol: String,
    pub contract_code: String,
    #[serde(default, deserialize_with = "null_default")]
    pub volume: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub price: f64,
    #[serde(default)]
    pub order_price_type: String,
    pub direction: String,
    pub offset: String,
    #[serde(default, deserialize_with = "null_default")]
    pub lever_rate: i32,
    pub order_id: i64,
    #[serde(default)]
    pub order_id_str: Option<String>,
    #[serde(default)]
    pub client_order_id: Option<i64>,
    #[serde(default, deserialize_with = "null_default")]
    pub created_at: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub trade_volume: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub trade_turnover: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub fee: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub trade_avg_price: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub margin_frozen: f64,
    pub status: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn error_envelope_becomes_api_error() {
        let raw = r#"{"status":"error","err_code":1048,"err_msg":"Insufficient close amount available.","ts":1}"#;
        let resp: RestApi<Value> = serde_json::from_str(raw).unwrap();
        assert_eq!(
            resp.into_data().unwrap_err(),
            HbdmError::Api {
                code: 1048,
                msg: "Insufficient close amount available.".into()
            }
        );
    }

    #[test]
    fn null_numbers_decode_as_zero() {
        let raw = r#"{"symbol":"BTC","margin_balance":12.5,"profit_unreal":null,"risk_rate":null}"#;
        let acc: AccountInfo = serde_json::from_str(raw).unwrap();
        assert_eq!(acc.margin_balance, 12.5);
        assert_eq!(acc.profit_unreal, 0.0);
        assert_eq!(acc.risk_rate, 0.0);
    }

    #[test]
    fn cancel_errors_accept_strings_and_objects() {
        let raw = r#"{"errors":["first",{"order_id":"1","err_code":1061,"err_msg":"second"}],"successes":""}"#;
        let resp: CancelResp = serde_json::from_str(raw).unwrap();
        let msgs: Vec<&str> = resp.errors.iter().map(|e| e.message()).collect();
        assert_eq!(msgs, vec!["first", "second"]);
    }
}
