//! Permission policy adapters.

mod static_policy;

pub use static_policy::StaticPermissionPolicy;
