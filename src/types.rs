use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// 币种，统一大写
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Currency(String);

impl Currency {
    pub fn new(symbol: &str) -> Self {
        Currency(symbol.trim().to_uppercase())
    }

    pub fn symbol(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 交易对，合约代码形如 BTC-USDT
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct CurrencyPair {
    pub base: Currency,
    pub quote: Currency,
}

impl CurrencyPair {
    pub fn new(base: &str, quote: &str) -> Self {
        CurrencyPair {
            base: Currency::new(base),
            quote: Currency::new(quote),
        }
    }

    /// 按分隔符解析合约代码，没有分隔符时整体当作 base
    pub fn from_symbol(symbol: &str, sep: &str) -> Self {
        match symbol.split_once(sep) {
            Some((base, quote)) => CurrencyPair::new(base, quote),
            None => CurrencyPair::new(symbol, ""),
        }
    }

    pub fn to_symbol(&self, sep: &str) -> String {
        format!("{}{}{}", self.base, sep, self.quote)
    }

    /// 合约代码 BTC-USDT
    pub fn contract_code(&self) -> String {
        self.to_symbol("-")
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.base, self.quote)
    }
}

/// 开平仓类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpenType {
    /// 开多
    OpenBuy = 1,
    /// 开空
    OpenSell = 2,
    /// 平多
    CloseBuy = 3,
    /// 平空
    CloseSell = 4,
}

impl OpenType {
    pub const ALL: [OpenType; 4] = [
        OpenType::OpenBuy,
        OpenType::OpenSell,
        OpenType::CloseBuy,
        OpenType::CloseSell,
    ];

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(OpenType::OpenBuy),
            2 => Some(OpenType::OpenSell),
            3 => Some(OpenType::CloseBuy),
            4 => Some(OpenType::CloseSell),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

/// 订单状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeStatus {
    /// 未成交
    Unfinish,
    /// 部分成交
    PartFinish,
    /// 完全成交
    Finish,
    /// 已撤单
    Cancel,
    /// 撤单中
    Canceling,
}

/// 订单报价类型 order_price_type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderPriceType {
    Limit,
    Opponent,
    Lightning,
    #[serde(rename = "optimal_5")]
    Optimal5,
    #[serde(rename = "optimal_10")]
    Optimal10,
    #[serde(rename = "optimal_20")]
    Optimal20,
    Fok,
    Ioc,
    OpponentIoc,
    LightningIoc,
    #[serde(rename = "optimal_5_ioc")]
    Optimal5Ioc,
    #[serde(rename = "optimal_10_ioc")]
    Optimal10Ioc,
    #[serde(rename = "optimal_20_ioc")]
    Optimal20Ioc,
    PostOnly,
}

impl OrderPriceType {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderPriceType::Limit => "limit",
            OrderPriceType::Opponent => "opponent",
            OrderPriceType::Lightning => "lightning",
            OrderPriceType::Optimal5 => "optimal_5",
            OrderPriceType::Optimal10 => "optimal_10",
            OrderPriceType::Optimal20 => "optimal_20",
            OrderPriceType::Fok => "fok",
            OrderPriceType::Ioc => "ioc",
            OrderPriceType::OpponentIoc => "opponent_ioc",
            OrderPriceType::LightningIoc => "lightning_ioc",
            OrderPriceType::Optimal5Ioc => "optimal_5_ioc",
            OrderPriceType::Optimal10Ioc => "optimal_10_ioc",
            OrderPriceType::Optimal20Ioc => "optimal_20_ioc",
            OrderPriceType::PostOnly => "post_only",
        }
    }
}

impl fmt::Display for OrderPriceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单币种保证金账户
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FutureSubAccount {
    pub currency: Currency,
    /// 账户权益
    pub margin_balance: f64,
    /// 持仓保证金
    pub margin_position: f64,
    /// 已实现盈亏
    pub profit_real: f64,
    /// 未实现盈亏
    pub profit_unreal: f64,
    /// 保证金率
    pub risk_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FutureAccount {
    pub sub_accounts: HashMap<Currency, FutureSubAccount>,
}

impl FutureAccount {
    pub fn get(&self, currency: &Currency) -> Option<&FutureSubAccount> {
        self.sub_accounts.get(currency)
    }
}

/// 单方向持仓
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PositionSide {
    /// 持仓量（张）
    pub amount: f64,
    /// 可平仓数量
    pub available: f64,
    /// 开仓均价
    pub price_avg: f64,
    /// 持仓均价
    pub price_cost: f64,
    /// 收益率
    pub profit_rate: f64,
    /// 收益
    pub profit: f64,
    /// 未实现盈亏
    pub profit_unreal: f64,
    pub position_margin: f64,
    pub lever_rate: f64,
}

/// 合约持仓，多空两个方向各一份，缺失的方向为零值
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FuturePosition {
    pub symbol: CurrencyPair,
    pub contract_code: String,
    pub buy: PositionSide,
    pub sell: PositionSide,
    /// 最新价，仅全仓接口返回
    pub last_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FutureOrder {
    pub currency: CurrencyPair,
    pub client_oid: Option<String>,
    pub order_id: i64,
    pub order_id_str: String,
    pub price: f64,
    pub amount: f64,
    pub avg_price: f64,
    pub deal_amount: f64,
    pub status: TradeStatus,
    pub o_type: OpenType,
    pub lever_rate: i32,
    pub fee: f64,
    pub contract_name: String,
    /// 创建时间 (毫秒)
    pub order_time: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_round_trips_through_contract_code() {
        let pair = CurrencyPair::new("btc", "usdt");
        assert_eq!(pair.contract_code(), "BTC-USDT");
        assert_eq!(CurrencyPair::from_symbol("BTC-USDT", "-"), pair);
    }

    #[test]
    fn pair_without_separator_keeps_base() {
        let pair = CurrencyPair::from_symbol("eth", "-");
        assert_eq!(pair.base, Currency::new("ETH"));
        assert_eq!(pair.quote.symbol(), "");
    }

    #[test]
    fn order_price_type_matches_wire_names() {
        assert_eq!(OrderPriceType::Optimal5Ioc.as_str(), "optimal_5_ioc");
        let json = serde_json::to_string(&OrderPriceType::Optimal5Ioc).unwrap();
        assert_eq!(json, "\"optimal_5_ioc\"");
        let json = serde_json::to_string(&OrderPriceType::OpponentIoc).unwrap();
        assert_eq!(json, "\"opponent_ioc\"");
    }

    #[test]
    fn open_type_codes() {
        for t in OpenType::ALL {
            assert_eq!(OpenType::from_code(t.code()), Some(t));
        }
        assert_eq!(OpenType::from_code(0), None);
    }
}
