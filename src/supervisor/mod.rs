//! Motor safety supervisor
//!
//! Three pieces compose around one shared state cell:
//!
//! - [`state::SupervisorState`]: the single `(armed, commanded_duty)` source
//!   of truth, mutated by ingestion sessions and read by the actuation loop
//! - [`safety::ClampProfile`]: the fixed per-deployment output bounds
//! - [`actuation`]: the periodic loop that is the only caller of the actuator
//!
//! Raw commanded values are stored unclamped; the clamp is enforced at the
//! single point that talks to hardware, so no command path can bypass it.

pub mod actuation;
pub mod safety;
pub mod state;

pub use safety::ClampProfile;
pub use state::{Rejected, SupervisorState};
