//! Background protocols started once the channel is validated. Each holds only
//! a weak reference to the channel and stops when it is gone.

pub(crate) mod heartbeat;
pub(crate) mod network_status;
