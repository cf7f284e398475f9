/// Main configuration module.
/// 
/// Re-exports submodules for server and session configuration.
pub mod server;
pub mod session;
