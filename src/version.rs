/// Crate version, as printed by the `version` commands.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
