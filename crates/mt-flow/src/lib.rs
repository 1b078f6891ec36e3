//! # mt-flow
//!
//! Single-shot order flows on top of a [`Terminal`](mt_td::Terminal).
//!
//! A run is: connect → resolve symbol → (wait for the price trigger) →
//! fresh tick → build & validate order → submit once → interpret result →
//! release the connection. [`session::run`] owns the connection for the
//! whole run and releases it on every exit path, including cancellation.
//!
//! - [`resolve`] — symbol lookup and Market Watch selection
//! - [`wait`] — bid-below-threshold polling loop
//! - [`order`] — risk-level checks and tick-size normalization
//! - [`submit`] — one `order_send` and its interpretation
//! - [`session`] — connection lifecycle around all of the above

pub mod order;
pub mod resolve;
pub mod session;
pub mod submit;
pub mod wait;

pub use session::{RunOptions, RunOutcome, arm_plan, place_order, run};
