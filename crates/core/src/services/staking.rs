//! Staking and nomination pool validators.
//!
//! Each validator is independent: it checks its request against the static
//! per-network tables, converts amounts to minimal units and returns a
//! descriptor with a confirmation message. No chain I/O.

use crate::error::{DomainError, DomainResult};
use crate::models::{
    AddressField, AddressScheme, Amount, BondDescriptor, BondExtra, BondExtraPoolDescriptor,
    BondExtraPoolRequest, BondExtraSource, BondRequest, JoinPoolDescriptor, JoinPoolRequest,
    NominateDescriptor, NominateRequest, PayeeSelector, Prepared, RewardDestination,
    UnbondDescriptor, UnbondFromPoolDescriptor, UnbondFromPoolRequest, UnbondRequest,
};

fn require_positive(amount: &Amount, subject: &'static str) -> DomainResult<()> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(DomainError::NonPositiveAmount { subject })
    }
}

fn require_account(candidate: &str, field: AddressField) -> DomainResult<()> {
    AddressScheme::Ss58.require(candidate, field)
}

// =============================================================================
// Staking
// =============================================================================

pub fn prepare_bond(request: &BondRequest) -> DomainResult<Prepared> {
    require_positive(&request.value, "bonding")?;
    require_account(&request.stash, AddressField::Stash)?;
    let controller = request.controller.as_deref().unwrap_or(&request.stash);
    require_account(controller, AddressField::Controller)?;

    let payee = match request.payee {
        PayeeSelector::Staked => RewardDestination::Staked,
        PayeeSelector::Stash => RewardDestination::Stash,
        PayeeSelector::Controller => RewardDestination::Controller,
        PayeeSelector::None => RewardDestination::None,
        PayeeSelector::Account => {
            let account = request.reward_account.as_deref().unwrap_or_default();
            require_account(account, AddressField::RewardAccount)?;
            RewardDestination::Account(account.to_string())
        }
    };

    let value = request.value.to_minimal_units(request.token.decimals())?;
    let message = format!(
        "stashAccount: {}\ncontrollerAccount: {}\nA bond of {} {} tokens on {} has been prepared, with rewards sent to {}. Please sign and submit the transaction using your wallet to bond the tokens.",
        request.stash,
        controller,
        request.value,
        request.token,
        request.token.network(),
        payee
    );

    Ok(Prepared::new(
        BondDescriptor {
            stash_account: request.stash.clone(),
            controller_account: controller.to_string(),
            value,
            payee,
            token: request.token,
        },
        message,
    ))
}

pub fn prepare_nominate(request: &NominateRequest) -> DomainResult<Prepared> {
    require_account(&request.controller, AddressField::Controller)?;

    let max = request.token.max_nominations();
    if request.targets.is_empty() {
        return Err(DomainError::NoNominationTargets);
    }
    if request.targets.len() > max {
        return Err(DomainError::TooManyNominations {
            max,
            network: request.token.network(),
        });
    }
    for (index, target) in request.targets.iter().enumerate() {
        require_account(target, AddressField::NominationTarget(index))?;
    }

    let message = format!(
        "controllerAccount: {}\ntargets: {}\nA nomination request for {} validators on {} has been prepared. Please sign and submit the transaction to nominate the validators.",
        request.controller,
        request.targets.join(", "),
        request.targets.len(),
        request.token.network()
    );

    Ok(Prepared::new(
        NominateDescriptor {
            controller_account: request.controller.clone(),
            targets: request.targets.clone(),
            token: request.token,
        },
        message,
    ))
}

pub fn prepare_unbond(request: &UnbondRequest) -> DomainResult<Prepared> {
    require_positive(&request.value, "unbonding")?;
    require_account(&request.controller, AddressField::Controller)?;

    let value = request.value.to_minimal_units(request.token.decimals())?;
    let message = format!(
        "controllerAccount: {}\nAn unbonding request for {} {} on {} has been prepared. The tokens will become available after an unbonding period of {} days. Please sign and submit the transaction to unbond tokens.",
        request.controller,
        request.value,
        request.token,
        request.token.network(),
        request.token.unbonding_period_days()
    );

    Ok(Prepared::new(
        UnbondDescriptor {
            controller_account: request.controller.clone(),
            value,
            token: request.token,
        },
        message,
    ))
}

// =============================================================================
// Nomination pools
// =============================================================================

pub fn prepare_join_pool(request: &JoinPoolRequest) -> DomainResult<Prepared> {
    require_account(&request.member, AddressField::Sender)?;

    let minimum = Amount::parse(request.token.min_pool_bond())?;
    if request.amount < minimum {
        return Err(DomainError::BelowMinimumBond {
            network: request.token.network(),
            minimum: minimum.to_fixed(2),
            symbol: request.token,
        });
    }

    let pool_id = u32::try_from(request.pool_id)
        .ok()
        .filter(|id| *id > 0)
        .ok_or(DomainError::InvalidPoolId(request.pool_id))?;

    let amount = request.amount.to_minimal_units(request.token.decimals())?;
    let message = format!(
        "senderAddress: {}\namount: {} {}\npoolId: {}\nA staking request for {} {} on {} has been prepared for pool ID {}. Please sign and submit the transaction to join the pool.",
        request.member,
        request.amount,
        request.token,
        pool_id,
        request.amount,
        request.token,
        request.token.network(),
        pool_id
    );

    Ok(Prepared::new(
        JoinPoolDescriptor {
            sender_address: request.member.clone(),
            amount,
            pool_id,
            token: request.token,
        },
        message,
    ))
}

pub fn prepare_bond_extra_pool(request: &BondExtraPoolRequest) -> DomainResult<Prepared> {
    require_account(&request.member, AddressField::Member)?;

    let (extra, detail) = match &request.extra {
        BondExtraSource::FreeBalance(amount) => {
            require_positive(amount, "FreeBalance")?;
            let units = amount.to_minimal_units(request.token.decimals())?;
            (
                BondExtra::FreeBalance(units),
                format!("from Free Balance\nAmount: {} {}", amount, request.token),
            )
        }
        BondExtraSource::Rewards => (BondExtra::Rewards, "by re-staking Rewards".to_string()),
    };

    let message = format!(
        "Nomination Pool Bond Extra prepared on {}\nMember Account: {}\nBonding Type: {}",
        request.token.network(),
        request.member,
        detail
    );

    Ok(Prepared::new(
        BondExtraPoolDescriptor {
            member_address: request.member.clone(),
            extra,
            token: request.token,
        },
        message,
    ))
}

pub fn prepare_unbond_from_pool(request: &UnbondFromPoolRequest) -> DomainResult<Prepared> {
    require_positive(&request.unbonding_points, "unbonding points")?;
    require_account(&request.member, AddressField::Member)?;

    let unbonding_points = request
        .unbonding_points
        .to_minimal_units(request.token.decimals())?;
    let network = request.token.network();
    let message = format!(
        "Nomination Pools Unbond prepared on {}\nMember Account: {}\nUnbonding Points: {} {}\nFunds will be withdrawable after the unbonding period (approximately {} days) on {}.",
        network,
        request.member,
        request.unbonding_points,
        request.token,
        request.token.unbonding_period_days(),
        network
    );

    Ok(Prepared::new(
        UnbondFromPoolDescriptor {
            member_address: request.member.clone(),
            unbonding_points,
            token: request.token,
        },
        message,
    ))
}
