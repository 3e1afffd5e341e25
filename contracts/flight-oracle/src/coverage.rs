//! Requester-side retry protocol for status requests.
//!
//! Index assignment is independent per oracle, so a freshly derived request
//! index can be covered by fewer oracles than the quorum needs. The contract
//! never retries on its own; requesters reissue `fetch_status` (which derives a
//! new index) until the index is covered, bounded by `max_attempts`.

use soroban_sdk::{Address, String};

use crate::{FlightOracleClient, OracleError, OracleRequest};

/// Reissue a status request until its index is covered by at least `quorum`
/// registered oracles.
///
/// Returns the covered request, or `InsufficientCoverage` once `max_attempts`
/// requests were issued without one reaching the quorum.
pub fn request_covered_status(
    client: &FlightOracleClient,
    requester: &Address,
    flight: &String,
    timestamp: u64,
    max_attempts: u32,
) -> Result<OracleRequest, OracleError> {
    let quorum = match client.try_get_config() {
        Ok(Ok(config)) => config.quorum,
        Err(Ok(err)) => return Err(err),
        _ => return Err(OracleError::NotInitialized),
    };

    for _ in 0..max_attempts {
        let request = match client.try_fetch_status(requester, flight, &timestamp) {
            Ok(Ok(request)) => request,
            Err(Ok(err)) => return Err(err),
            _ => return Err(OracleError::RequestFailed),
        };
        if request.coverage >= quorum {
            return Ok(request);
        }
    }

    Err(OracleError::InsufficientCoverage)
}
