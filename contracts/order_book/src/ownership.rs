//! Two-step transfer of `Config.owner`. Mirrors the `propose_new_owner` /
//! `drop_ownership_proposal` / `claim_ownership` dance every pair contract in
//! this stack exposes through `gridiron::common`, reimplemented here against
//! this contract's own `Config`/`OwnershipProposal` storage so a single bad
//! transaction can never hand the contract to an unreachable address.

use cosmwasm_std::{attr, Addr, DepsMut, Env, MessageInfo, Response, StdError};
use cw_storage_plus::Item;

use crate::error::ContractError;
use crate::state::{Config, OwnershipProposal, CONFIG};

/// Owner-only. Stores a pending owner proposal that expires `expires_in`
/// seconds from now; a later [`claim_ownership`] by that address finalizes
/// the transfer.
pub fn propose_new_owner(
    deps: DepsMut,
    info: MessageInfo,
    env: Env,
    new_owner: String,
    expires_in: u64,
    owner: Addr,
    proposal: Item<OwnershipProposal>,
) -> Result<Response, ContractError> {
    if info.sender != owner {
        return Err(ContractError::Unauthorized {});
    }

    let new_owner = deps.api.addr_validate(&new_owner)?;

    proposal.save(
        deps.storage,
        &OwnershipProposal {
            owner: new_owner.clone(),
            expires_at: env.block.time.seconds() + expires_in,
        },
    )?;

    Ok(Response::new().add_attributes(vec![
        attr("action", "propose_new_owner"),
        attr("new_owner", new_owner),
    ]))
}

/// Owner-only. Clears a pending proposal without waiting for it to expire.
pub fn drop_ownership_proposal(
    deps: DepsMut,
    info: MessageInfo,
    owner: Addr,
    proposal: Item<OwnershipProposal>,
) -> Result<Response, ContractError> {
    if info.sender != owner {
        return Err(ContractError::Unauthorized {});
    }

    proposal.remove(deps.storage);

    Ok(Response::new().add_attribute("action", "drop_ownership_proposal"))
}

/// Callable only by the address named in a live (non-expired) proposal.
/// `apply` commits the new owner into the caller's own config storage.
pub fn claim_ownership(
    deps: DepsMut,
    info: MessageInfo,
    env: Env,
    proposal: Item<OwnershipProposal>,
    apply: impl FnOnce(DepsMut, Addr) -> Result<(), StdError>,
) -> Result<Response, ContractError> {
    let p = proposal
        .load(deps.storage)
        .map_err(|_| ContractError::Unauthorized {})?;

    if info.sender != p.owner {
        return Err(ContractError::Unauthorized {});
    }

    if env.block.time.seconds() > p.expires_at {
        return Err(ContractError::Unauthorized {});
    }

    proposal.remove(deps.storage);
    apply(deps, p.owner.clone())?;

    Ok(Response::new().add_attributes(vec![
        attr("action", "claim_ownership"),
        attr("new_owner", p.owner),
    ]))
}

/// Convenience wrapper used by `contract::execute`'s `ClaimOwnership` arm —
/// commits the claimed owner straight into [`Config`].
pub fn claim_ownership_into_config(
    deps: DepsMut,
    info: MessageInfo,
    env: Env,
    proposal: Item<OwnershipProposal>,
) -> Result<Response, ContractError> {
    claim_ownership(deps, info, env, proposal, |deps, new_owner| {
        CONFIG.update::<_, StdError>(deps.storage, |mut config: Config| {
            config.owner = new_owner;
            Ok(config)
        })?;
        Ok(())
    })
}
