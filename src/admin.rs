//! Administrator resolution
//!
//! Some per-item calls need a user context with elevated rights. This
//! module picks that user from the server's user list.

use crate::JanitorError;
use crate::catalog::CatalogClient;

/// Returns the id of the first enabled administrator, in server order
///
/// # Errors
///
/// `JanitorError::ListUsers` if the user listing fails and
/// `JanitorError::NoAdministrator` if no enabled user is an administrator.
pub(crate) fn resolve_admin_user<C>(client: &C) -> Result<String, JanitorError>
where
    C: CatalogClient + ?Sized,
{
    let users = client
        .list_enabled_users()
        .map_err(JanitorError::ListUsers)?;

    users
        .into_iter()
        .find(|user| user.is_administrator())
        .map(|user| user.id)
        .ok_or(JanitorError::NoAdministrator)
}
