//! 逐仓、全仓共用的字段转换

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use super::models::{CancelResp, Direction, OrderInfo, PositionInfo};
use crate::error::HbdmError;
use crate::types::{CurrencyPair, FutureOrder, FuturePosition, OpenType, PositionSide, TradeStatus};

static LAST_CLIENT_ORDER_ID: AtomicI64 = AtomicI64::new(0);

/// 开平仓类型 -> (direction, offset)
pub fn adapt_open_type(open_type: OpenType) -> (&'static str, &'static str) {
    match open_type {
        OpenType::OpenBuy => ("buy", "open"),
        OpenType::OpenSell => ("sell", "open"),
        OpenType::CloseBuy => ("sell", "close"),
        OpenType::CloseSell => ("buy", "close"),
    }
}

/// (offset, direction) -> 开平仓类型
pub fn adapt_offset_direction_to_open_type(offset: &str, direction: &str) -> OpenType {
    match (offset, direction) {
        ("close", "buy") => OpenType::CloseSell,
        ("close", _) => OpenType::CloseBuy,
        (_, "buy") => OpenType::OpenBuy,
        _ => OpenType::OpenSell,
    }
}

/// 订单状态: 1 准备提交 2 准备提交 3 已提交 4 部分成交 5 部分成交已撤单
/// 6 全部成交 7 已撤单 11 撤单中
pub fn adapt_order_status(status: i32) -> TradeStatus {
    match status {
        1 | 2 | 3 => TradeStatus::Unfinish,
        4 => TradeStatus::PartFinish,
        5 | 6 => TradeStatus::Finish,
        7 => TradeStatus::Cancel,
        11 => TradeStatus::Canceling,
        _ => TradeStatus::Unfinish,
    }
}

/// 纳秒时间戳作为 client_order_id，同一进程内严格递增。
/// LAST_CLIENT_ORDER_ID 是本 crate 唯一的进程级可变状态，只用于 id 去重，
/// 无锁，不影响各接口调用之间的独立性
pub fn new_client_order_id() -> i64 {
    let now = chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or(i64::MAX);
    let mut last = LAST_CLIENT_ORDER_ID.load(Ordering::Relaxed);
    loop {
        let next = if now > last { now } else { last + 1 };
        match LAST_CLIENT_ORDER_ID.compare_exchange_weak(
            last,
            next,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => return next,
            Err(actual) => last = actual,
        }
    }
}

/// 撤单结果: errors 为空即成功，否则取第一条错误信息
pub fn cancel_result(resp: CancelResp) -> Result<bool, HbdmError> {
    match resp.errors.first() {
        Some(failure) => Err(HbdmError::Rejected(failure.message().to_string())),
        None => Ok(true),
    }
}

fn position_side(row: &PositionInfo) -> PositionSide {
    PositionSide {
        amount: row.volume,
        available: row.available,
        price_avg: row.cost_open,
        price_cost: row.cost_hold,
        profit_rate: row.profit_rate,
        profit: row.profit,
        profit_unreal: row.profit_unreal,
        position_margin: row.position_margin,
        lever_rate: row.lever_rate,
    }
}

/// 按合约代码合并多空两行持仓
pub fn merge_positions(rows: &[PositionInfo]) -> Vec<FuturePosition> {
    let mut grouped: BTreeMap<&str, FuturePosition> = BTreeMap::new();
    for row in rows.iter().filter(|r| r.direction != Direction::Unknown) {
        let pos = grouped
            .entry(row.contract_code.as_str())
            .or_insert_with(|| FuturePosition {
                symbol: CurrencyPair::from_symbol(&row.contract_code, "-"),
                contract_code: row.contract_code.clone(),
                ..Default::default()
            });
        if row.direction == Direction::Buy {
            pos.buy = position_side(row);
        } else {
            pos.sell = position_side(row);
        }
        if row.last_price != 0.0 {
            pos.last_price = row.last_price;
        }
    }
    grouped.into_values().collect()
}

pub fn adapt_order(info: &OrderInfo, pair: &CurrencyPair) -> FutureOrder {
    FutureOrder {
        currency: pair.clone(),
        client_oid: info.client_order_id.map(|id| id.to_string()),
        order_id: info.order_id,
        order_id_str: info
            .order_id_str
            .clone()
            .unwrap_or_else(|| info.order_id.to_string()),
        price: info.price,
        amount: info.volume,
        avg_price: info.trade_avg_price,
        deal_amount: info.trade_volume,
        status: adapt_order_status(info.status),
        o_type: adapt_offset_direction_to_open_type(&info.offset, &info.direction),
        lever_rate: info.lever_rate,
        fee: info.fee,
        contract_name: info.contract_code.clone(),
        order_time: info.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_type_round_trip() {
        for t in OpenType::ALL {
            let (direction, offset) = adapt_open_type(t);
            assert_eq!(adapt_offset_direction_to_open_type(offset, direction), t);
        }
    }

    #[test]
    fn close_long_is_sell_close() {
        assert_eq!(adapt_open_type(OpenType::CloseBuy), ("sell", "close"));
        assert_eq!(adapt_open_type(OpenType::CloseSell), ("buy", "close"));
    }

    #[test]
    fn status_codes() {
        assert_eq!(adapt_order_status(3), TradeStatus::Unfinish);
        assert_eq!(adapt_order_status(4), TradeStatus::PartFinish);
        assert_eq!(adapt_order_status(5), TradeStatus::Finish);
        assert_eq!(adapt_order_status(6), TradeStatus::Finish);
        assert_eq!(adapt_order_status(7), TradeStatus::Cancel);
        assert_eq!(adapt_order_status(11), TradeStatus::Canceling);
        assert_eq!(adapt_order_status(99), TradeStatus::Unfinish);
    }

    #[test]
    fn client_order_ids_never_repeat() {
        let ids: Vec<i64> = (0..1000).map(|_| new_client_order_id()).collect();
        assert!(ids.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn client_order_ids_unique_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| (0..500).map(|_| new_client_order_id()).collect::<Vec<_>>()))
            .collect();
        let mut ids: Vec<i64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn merge_keeps_missing_side_zeroed() {
        let rows: Vec<PositionInfo> = serde_json::from_str(
            r#"[{"contract_code":"ETH-USDT","volume":3,"available":2,"direction":"sell"}]"#,
        )
        .unwrap();
        let merged = merge_positions(&rows);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].sell.amount, 3.0);
        assert_eq!(merged[0].buy, PositionSide::default());
        assert_eq!(merged[0].symbol, CurrencyPair::new("ETH", "USDT"));
    }
}
