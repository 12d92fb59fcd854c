//! Network manager abstraction layer

pub mod mock_backend;
pub mod network_manager;
pub mod nmcli_backend;

pub use network_manager::NetworkManager;
pub use nmcli_backend::NmcliBackend;

#[cfg(test)]
pub use mock_backend::MockNetworkManager;
