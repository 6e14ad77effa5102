//! Domain events - Notifications of state changes coming from the host

pub mod host_events;

pub use host_events::HostEvent;
