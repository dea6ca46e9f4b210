//! Top-level facade crate for go2link.
//!
//! Re-exports the protocol core and the channel runtime so users can depend on
//! a single crate.

pub mod core {
    pub use go2link_core::*;
}

pub mod channel {
    pub use go2link_channel::*;
}
