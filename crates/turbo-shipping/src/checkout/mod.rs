//! Checkout input and the order context derived from it.

mod address;
mod context;
mod request;

pub use address::ShippingAddress;
pub use context::OrderContext;
pub use request::{CheckoutItem, CheckoutRequest};
