//! Network-side collaborators: reachability probing, adapter
//! classification, and link establishment

pub mod interface;
pub mod probe;
pub mod wifi;

pub use interface::{InterfaceInspector, LinkInspector};
pub use probe::{Reachability, ReachabilityProbe};
pub use wifi::{LinkConnector, LinkControl, NmcliStation, WirelessStation};
