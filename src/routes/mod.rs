/// Router Module Index
///
/// Every route here sits behind the `route_guard` middleware applied in
/// `create_router`. Access control is decided by path family, not by the
/// module a route lives in.

/// Health check and the SPA bundle.
pub mod dashboard;
