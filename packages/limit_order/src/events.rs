//! Event-attribute builders for the order book contract. Centralized here so
//! the executor's indexer and the contract's `execute` handlers agree on
//! attribute names without either importing the other.

use cosmwasm_std::{Event, Uint128};

use crate::order::Order;

pub fn order_created(order: &Order) -> Event {
    Event::new("order_created")
        .add_attribute("order_id", order.order_id.to_string())
        .add_attribute("owner", order.owner.to_string())
        .add_attribute("from_token", order.from_token.to_string())
        .add_attribute("from_amount", order.from_amount.to_string())
        .add_attribute("to_token", order.to_token.to_string())
        .add_attribute("target_num", order.target_num.to_string())
        .add_attribute("target_denom", order.target_denom.to_string())
        .add_attribute("expires_at", order.expires_at.to_string())
}

pub fn order_executed(
    order_id: u64,
    amount_out: Uint128,
    current_num: u64,
    current_denom: u64,
) -> Event {
    Event::new("order_executed")
        .add_attribute("order_id", order_id.to_string())
        .add_attribute("amount_out", amount_out.to_string())
        .add_attribute("current_num", current_num.to_string())
        .add_attribute("current_denom", current_denom.to_string())
}

pub fn order_execution_failed(order_id: u64, reason: impl ToString) -> Event {
    Event::new("order_execution_failed")
        .add_attribute("order_id", order_id.to_string())
        .add_attribute("reason", reason.to_string())
}

pub fn order_cancelled(order_id: u64) -> Event {
    Event::new("order_cancelled").add_attribute("order_id", order_id.to_string())
}

pub fn order_expired(order_id: u64) -> Event {
    Event::new("order_expired").add_attribute("order_id", order_id.to_string())
}
