//! Extension contracts around dispatch: the outbound rate gate and request mutation hooks.

pub mod rate_limit;
pub mod request_option;

pub use rate_limit::*;
pub use request_option::*;
