//! Application layer: the two interceptors that sit around the PayPal NVP
//! transport and the order history.
//!
//! `RequestRewriter` runs before every outbound NVP call and publishes a
//! conversion record; `AuditAttacher` runs after a status-history entry is
//! added and turns that record into a single order comment. They share
//! nothing but the registry, so the host must call them in that order within
//! one request.

pub mod audit;
pub mod rewriter;
pub mod totals;
