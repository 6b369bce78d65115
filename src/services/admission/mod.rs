//! Cooldown enforcement for new proposal threads.

pub mod controller;
pub mod notices;
pub mod platform;

#[cfg(test)]
pub mod mock;

pub use controller::{AdmissionController, AdmissionOutcome, AdmissionPolicy, NewThread};
pub use platform::{ForumPlatform, SerenityPlatform, StarterMessage};
