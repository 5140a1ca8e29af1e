/// Router Module Index
///
/// Routes are grouped by the access level they require. Authentication is applied at
/// the router layer; role and ownership checks run inside the workflows.

/// Routes open to anonymous callers.
pub mod public;

/// Routes that require a verified bearer token.
pub mod authenticated;

/// Routes that additionally require the `admin` role.
pub mod admin;
