//! Outbound channels used by subscribers to reach the outside world.

pub mod email;
