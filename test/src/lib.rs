pub mod helpers;
pub mod local_relay;
pub mod test_protocol;

pub use helpers::*;
pub use local_relay::LocalRelay;
pub use test_protocol::{codecs, DropMineEvent, TurretsParams};
