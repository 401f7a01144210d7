//! Byte-level `Order` codec, normative per the event wire protocol: this is
//! what an external indexer decodes from event payloads, independent of the
//! CosmWasm JSON encoding used for `ExecuteMsg`/`QueryMsg` dispatch.
//!
//! Layout (big-endian throughout):
//!
//! | field          | encoding                                   |
//! |----------------|---------------------------------------------|
//! | order_id       | 8 bytes                                      |
//! | owner          | 32 bytes fixed, canonical address, zero-padded |
//! | from_token     | 4-byte length, then UTF-8 bytes              |
//! | from_amount    | 4-byte length, then big-endian magnitude     |
//! | to_token       | 4-byte length, then UTF-8 bytes               |
//! | target_num     | 4-byte length, then big-endian magnitude     |
//! | target_denom   | 4-byte length, then big-endian magnitude     |
//! | slippage_bp    | 8 bytes                                      |
//! | expires_at     | 8 bytes                                      |
//! | status         | 1 byte (0=Pending,1=Executed,2=Cancelled,3=Expired) |
//! | created_at     | 8 bytes                                      |
//!
//! The trailing `expires_at, status, created_at` order is normative and must
//! match between emitter and decoder.

use cosmwasm_std::{Addr, Api, StdError, StdResult, Uint128};

use gridiron_limit_order_amm_adapter::AssetInfo;

use crate::order::{Order, OrderStatus};

const OWNER_WIDTH: usize = 32;

fn write_u64(out: &mut Vec<u8>, value: u64) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn read_u64(bytes: &[u8], pos: &mut usize) -> StdResult<u64> {
    let slice = bytes
        .get(*pos..*pos + 8)
        .ok_or_else(|| StdError::generic_err("order codec: truncated u64 field"))?;
    *pos += 8;
    Ok(u64::from_be_bytes(slice.try_into().unwrap()))
}

/// Minimal big-endian magnitude: no leading zero bytes, except the value
/// zero itself which encodes as a single `0x00` byte.
fn encode_magnitude(value: u128) -> Vec<u8> {
    let full = value.to_be_bytes();
    let first_nonzero = full.iter().position(|b| *b != 0);
    match first_nonzero {
        Some(idx) => full[idx..].to_vec(),
        None => vec![0u8],
    }
}

fn decode_magnitude(bytes: &[u8]) -> u128 {
    let mut buf = [0u8; 16];
    let start = 16usize.saturating_sub(bytes.len());
    buf[start..].copy_from_slice(&bytes[bytes.len().saturating_sub(16 - start)..]);
    u128::from_be_bytes(buf)
}

fn write_length_prefixed(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
    out.extend_from_slice(bytes);
}

fn read_length_prefixed<'a>(bytes: &'a [u8], pos: &mut usize) -> StdResult<&'a [u8]> {
    let len_bytes = bytes
        .get(*pos..*pos + 4)
        .ok_or_else(|| StdError::generic_err("order codec: truncated length prefix"))?;
    let len = u32::from_be_bytes(len_bytes.try_into().unwrap()) as usize;
    *pos += 4;
    let value = bytes
        .get(*pos..*pos + len)
        .ok_or_else(|| StdError::generic_err("order codec: truncated length-prefixed field"))?;
    *pos += len;
    Ok(value)
}

fn encode_asset_info(info: &AssetInfo) -> Vec<u8> {
    match info {
        AssetInfo::NativeToken { denom } => format!("native:{denom}").into_bytes(),
        AssetInfo::Token { contract_addr } => format!("cw20:{contract_addr}").into_bytes(),
    }
}

fn decode_asset_info(bytes: &[u8]) -> StdResult<AssetInfo> {
    let s = std::str::from_utf8(bytes)
        .map_err(|_| StdError::generic_err("order codec: asset info is not valid utf-8"))?;
    if let Some(denom) = s.strip_prefix("native:") {
        Ok(AssetInfo::NativeToken {
            denom: denom.to_string(),
        })
    } else if let Some(addr) = s.strip_prefix("cw20:") {
        Ok(AssetInfo::Token {
            contract_addr: Addr::unchecked(addr),
        })
    } else {
        Err(StdError::generic_err("order codec: unrecognized asset info tag"))
    }
}

fn encode_owner(api: &dyn Api, owner: &Addr) -> StdResult<[u8; OWNER_WIDTH]> {
    let canonical = api.addr_canonicalize(owner.as_str())?;
    if canonical.len() > OWNER_WIDTH {
        return Err(StdError::generic_err("order codec: canonical address exceeds 32 bytes"));
    }
    let mut buf = [0u8; OWNER_WIDTH];
    buf[..canonical.len()].copy_from_slice(canonical.as_slice());
    Ok(buf)
}

fn decode_owner(api: &dyn Api, bytes: &[u8]) -> StdResult<Addr> {
    // Trailing zero padding is stripped; canonical addresses never contain
    // trailing zero bytes in practice for the chains this codec targets.
    let trimmed_len = bytes.iter().rposition(|b| *b != 0).map(|i| i + 1).unwrap_or(0);
    let canonical = cosmwasm_std::CanonicalAddr::from(bytes[..trimmed_len].to_vec());
    api.addr_humanize(&canonical)
}

/// Encode an `Order` into its normative byte representation.
pub fn encode_order(api: &dyn Api, order: &Order) -> StdResult<Vec<u8>> {
    let mut out = Vec::with_capacity(128);

    write_u64(&mut out, order.order_id);
    out.extend_from_slice(&encode_owner(api, &order.owner)?);
    write_length_prefixed(&mut out, &encode_asset_info(&order.from_token));
    write_length_prefixed(&mut out, &encode_magnitude(order.from_amount.u128()));
    write_length_prefixed(&mut out, &encode_asset_info(&order.to_token));
    write_length_prefixed(&mut out, &encode_magnitude(order.target_num as u128));
    write_length_prefixed(&mut out, &encode_magnitude(order.target_denom as u128));
    write_u64(&mut out, order.slippage_bp as u64);
    write_u64(&mut out, order.expires_at);
    out.push(order.status.as_u8());
    write_u64(&mut out, order.created_at);

    Ok(out)
}

/// Decode an `Order` from its normative byte representation. The inverse of
/// [`encode_order`] for every well-formed order.
pub fn decode_order(api: &dyn Api, bytes: &[u8]) -> StdResult<Order> {
    let mut pos = 0usize;

    let order_id = read_u64(bytes, &mut pos)?;

    let owner_bytes = bytes
        .get(pos..pos + OWNER_WIDTH)
        .ok_or_else(|| StdError::generic_err("order codec: truncated owner field"))?;
    let owner = decode_owner(api, owner_bytes)?;
    pos += OWNER_WIDTH;

    let from_token = decode_asset_info(read_length_prefixed(bytes, &mut pos)?)?;
    let from_amount = Uint128::new(decode_magnitude(read_length_prefixed(bytes, &mut pos)?));
    let to_token = decode_asset_info(read_length_prefixed(bytes, &mut pos)?)?;
    let target_num = decode_magnitude(read_length_prefixed(bytes, &mut pos)?) as u64;
    let target_denom = decode_magnitude(read_length_prefixed(bytes, &mut pos)?) as u64;

    let slippage_bp = read_u64(bytes, &mut pos)? as u16;
    let expires_at = read_u64(bytes, &mut pos)?;
    let status_byte = *bytes
        .get(pos)
        .ok_or_else(|| StdError::generic_err("order codec: truncated status field"))?;
    pos += 1;
    let status = OrderStatus::from_u8(status_byte)
        .ok_or_else(|| StdError::generic_err("order codec: unrecognized status byte"))?;
    let created_at = read_u64(bytes, &mut pos)?;

    Ok(Order {
        order_id,
        owner,
        from_token,
        from_amount,
        to_token,
        target_num,
        target_denom,
        slippage_bp,
        created_at,
        expires_at,
        status,
    })
}
