//! Ownership checks applied by the domain services
//!
//! Authentication happens in [`crate::middleware`]; the guards here decide
//! whether an authenticated caller may touch a particular record. They are
//! evaluated on every call and hold no state.

use tracing::warn;

use crate::{error::ApiError, middleware::CurrentUser};

/// The caller may only act on their own user record.
pub fn ensure_self(caller: &CurrentUser, user_id: &str) -> Result<(), ApiError> {
    if caller.id == user_id {
        Ok(())
    } else {
        warn!("User {} attempted to act on user {}", caller.id, user_id);
        Err(ApiError::Unauthorized)
    }
}

/// Admit `resource` only if it exists and both the caller and the claimed
/// owner match the owner extracted from it.
///
/// Every failure yields `denial`, so a missing resource and someone else's
/// resource are indistinguishable to the caller.
pub fn authorize_owner<R>(
    caller: &CurrentUser,
    claimed_owner: &str,
    resource: Option<R>,
    owner_of: impl Fn(&R) -> &str,
    denial: ApiError,
) -> Result<R, ApiError> {
    match resource {
        Some(resource) if owner_of(&resource) == claimed_owner && caller.id == claimed_owner => {
            Ok(resource)
        }
        Some(_) => {
            warn!(
                "User {} denied access to a resource claimed for {}",
                caller.id, claimed_owner
            );
            Err(denial)
        }
        None => Err(denial),
    }
}
