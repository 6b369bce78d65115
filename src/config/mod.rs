pub mod settings;

pub use settings::{ProposalRoute, Settings};
