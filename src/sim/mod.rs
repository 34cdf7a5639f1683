//! Engine-independent gameplay core.
//!
//! Nothing in here touches the ECS world. Systems in `plugins` adapt Avian
//! bodies, sprites and messages to the ports in `ports` and drive the core from
//! the fixed schedule.

pub mod combat;
pub mod controller;
pub mod death;
pub mod gauge;
pub mod observers;
pub mod ports;
pub mod sprint;

#[cfg(test)]
pub(crate) mod test_rig;
