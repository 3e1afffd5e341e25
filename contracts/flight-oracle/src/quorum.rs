//! Quorum matching over the reports collected for one status request.

use soroban_sdk::{Address, Env, Map};

use crate::types::{StatusCode, StatusRequest};

/// What a single report did to its request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Submission {
    /// Report stored; `matching` oracles now agree on this code.
    Recorded { matching: u32 },
    /// The oracle already reported in this round; nothing changed.
    Duplicate,
    /// This report pushed its code over the quorum.
    Resolved(StatusCode),
}

/// Record one oracle's report and resolve the request once a single code
/// reaches `quorum` matching reports.
///
/// Counting is per code, not a majority over all reports: mixed answers can
/// exceed `quorum` in total without resolving anything. The caller must reject
/// resolved requests before calling this.
pub fn record_response(
    request: &mut StatusRequest,
    oracle: &Address,
    status: StatusCode,
    quorum: u32,
) -> Submission {
    if request.responses.contains_key(oracle.clone()) {
        return Submission::Duplicate;
    }

    let code = status.code();
    request.responses.set(oracle.clone(), code);

    let matching = request.tally.get(code).unwrap_or(0) + 1;
    request.tally.set(code, matching);

    if matching >= quorum {
        request.resolved = Some(status);
        Submission::Resolved(status)
    } else {
        Submission::Recorded { matching }
    }
}

/// Start a fresh round on `index`, discarding reports from earlier rounds.
pub fn reopen(env: &Env, request: &mut StatusRequest, index: u32) {
    request.index = index;
    request.round += 1;
    request.responses = Map::new(env);
    request.tally = Map::new(env);
}
