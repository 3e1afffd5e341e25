//! Multi-party threshold voting.
//!
//! A ballot is the set of distinct principals that approved one proposal.
//! Callers decide who is eligible and how many eligible voters exist; this
//! module enforces one vote per principal and reports when the threshold is
//! crossed. A passed ballot is cleared so the same proposal key can be voted
//! on again later.

use soroban_sdk::{Address, Env, Vec};

use crate::error::GovernanceError;
use crate::types::{DataKey, ProposalKey};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VoteOutcome {
    Pending { votes: u32, required: u32 },
    Passed { votes: u32 },
}

/// Votes needed out of `eligible`: half, rounded up, and never zero.
pub fn majority(eligible: u32) -> u32 {
    let half = eligible / 2 + eligible % 2;
    half.max(1)
}

/// Record `voter`'s approval of `proposal`.
pub fn cast_vote(
    env: &Env,
    proposal: &ProposalKey,
    voter: &Address,
    eligible: u32,
    threshold: fn(u32) -> u32,
) -> Result<VoteOutcome, GovernanceError> {
    let key = DataKey::Ballot(proposal.clone());
    let mut voters = ballot(env, proposal);

    if voters.contains(voter) {
        return Err(GovernanceError::DuplicateVote);
    }
    voters.push_back(voter.clone());

    let votes = voters.len();
    let required = threshold(eligible);
    if votes >= required {
        env.storage().persistent().remove(&key);
        return Ok(VoteOutcome::Passed { votes });
    }

    env.storage().persistent().set(&key, &voters);
    Ok(VoteOutcome::Pending { votes, required })
}

/// Principals that approved `proposal` so far.
pub fn ballot(env: &Env, proposal: &ProposalKey) -> Vec<Address> {
    env.storage()
        .persistent()
        .get(&DataKey::Ballot(proposal.clone()))
        .unwrap_or(Vec::new(env))
}

pub fn clear(env: &Env, proposal: &ProposalKey) {
    env.storage()
        .persistent()
        .remove(&DataKey::Ballot(proposal.clone()));
}
