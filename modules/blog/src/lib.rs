// === PUBLIC CONTRACT ===
// Other crates consume posts and users through these types and traits only.
pub mod contract;

pub use contract::{client, error, model};

// === MODULE DEFINITION ===
pub mod module;
pub use module::Blog;

pub mod config;
pub use config::BlogConfig;

// === INTERNAL MODULES ===
// Exposed for tests and the CLI's JSON output; not a stable API.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod gateways;
#[doc(hidden)]
pub mod infra;
