//! Shared order/event types and the wire codec used by both the order book
//! contract and the off-chain executor. Keeping these in one crate is what
//! lets the executor decode `OrderCreated` event payloads into the exact
//! `Order` shape the contract stores, without either side drifting.

pub mod codec;
pub mod events;
pub mod order;

pub use codec::{decode_order, encode_order};
pub use order::{Order, OrderStatus};

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::MockApi;
    use cosmwasm_std::Uint128;

    use gridiron_limit_order_amm_adapter::AssetInfo;

    fn sample_order(api: &MockApi) -> Order {
        Order {
            order_id: 42,
            owner: api.addr_validate("owner0000000000000000000000000000").unwrap(),
            from_token: AssetInfo::NativeToken {
                denom: "uusdc".to_string(),
            },
            from_amount: Uint128::new(10_000_000),
            to_token: AssetInfo::Token {
                contract_addr: cosmwasm_std::Addr::unchecked("wegld0000000000000000000000000"),
            },
            target_num: 155_000_000_000_000,
            target_denom: 1_000,
            slippage_bp: 50,
            created_at: 1_700_000_000,
            expires_at: 1_700_086_400,
            status: OrderStatus::Pending,
        }
    }

    #[test]
    fn round_trips_through_the_byte_codec() {
        let api = MockApi::default();
        let order = sample_order(&api);

        let bytes = encode_order(&api, &order).unwrap();
        let decoded = decode_order(&api, &bytes).unwrap();

        assert_eq!(decoded, order);
    }

    #[test]
    fn round_trips_a_terminal_order() {
        let api = MockApi::default();
        let mut order = sample_order(&api);
        order.status = OrderStatus::Executed;

        let bytes = encode_order(&api, &order).unwrap();
        let decoded = decode_order(&api, &bytes).unwrap();

        assert_eq!(decoded.status, OrderStatus::Executed);
        assert!(decoded.status.is_terminal());
    }

    #[test]
    fn rejects_truncated_payloads() {
        let api = MockApi::default();
        let order = sample_order(&api);
        let mut bytes = encode_order(&api, &order).unwrap();
        bytes.truncate(bytes.len() - 4);

        assert!(decode_order(&api, &bytes).is_err());
    }

    #[test]
    fn rejects_unrecognized_status_byte() {
        let api = MockApi::default();
        let order = sample_order(&api);
        let mut bytes = encode_order(&api, &order).unwrap();

        // status sits 8 bytes before the trailing created_at u64.
        let status_pos = bytes.len() - 8 - 1;
        bytes[status_pos] = 0xFF;

        assert!(decode_order(&api, &bytes).is_err());
    }

    #[test]
    fn is_terminal_covers_only_non_pending_states() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(OrderStatus::Executed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(OrderStatus::Expired.is_terminal());
    }

    #[test]
    fn is_expired_compares_against_expiry_timestamp() {
        let api = MockApi::default();
        let order = sample_order(&api);

        assert!(!order.is_expired(order.expires_at - 1));
        assert!(order.is_expired(order.expires_at));
        assert!(order.is_expired(order.expires_at + 1));
    }
}
