//! Domain layer: NVP request model, money, order/payment views and the ports
//! the application layer depends on.

pub mod conversion;
pub mod currency;
pub mod method;
pub mod money;
pub mod nvp;
pub mod order;
pub mod ports;
