//! Request routing.
//!
//! - **`router`**: the immutable route table and content-coding negotiation
//! - **`handlers`**: the root, user-agent, echo and files endpoints

pub mod handlers;
pub mod router;

pub use router::{Handler, Router, RouterBuilder};
