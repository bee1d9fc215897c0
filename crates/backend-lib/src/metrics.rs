// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for Prometheus metric keys
pub const LOGIN_SUCCESS: &str = "auth.login.success";
pub const LOGIN_REJECTED: &str = "auth.login.rejected";
pub const REFRESH_SUCCESS: &str = "auth.refresh.success";
pub const REFRESH_REJECTED: &str = "auth.refresh.rejected";
pub const REVOKE: &str = "auth.revoke";
pub const USER_CREATED: &str = "user.created";
pub const USER_UPGRADED: &str = "user.upgraded";
pub const CHIRP_CREATED: &str = "chirp.created";
pub const CHIRP_DELETED: &str = "chirp.deleted";
pub const APP_HITS: &str = "app.hits";
