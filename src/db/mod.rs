pub mod cooldown_store;

pub use cooldown_store::{CooldownStore, Verdict};
