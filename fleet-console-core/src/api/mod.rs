pub mod client;
pub mod reports;
pub mod resources;

pub use client::FleetClient;
pub use resources::Resource;
