//! Continuous collision detection for projectile trajectories.
//!
//! ## Swept Segment Algorithm
//!
//! Instead of checking whether a single sample lies inside a target (which
//! fails at high speeds), we check whether the segment travelled during one
//! timestep intersects the target volume.
//!
//! ```text
//! sample i          sample i+1
//!    ●────────────────●
//!          ╭───╮
//!          │ ○ │  ← hit even though neither sample is inside
//!          ╰───╯
//! ```
//!
//! Substituting `p1 + t·(p2 − p1)` into the sphere equation gives a quadratic
//! in `t`; a root inside `[0, 1]` means the segment touches the sphere.

pub mod detection;

pub use detection::*;
