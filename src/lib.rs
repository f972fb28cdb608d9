//! profile-diversity: team diversity over agent profiles.
//!
//! This library scores how heterogeneous a team of agents is across
//! quantitative and qualitative attributes, finds agents interchangeable on
//! all attributes but one, and searches single-member substitutions that move
//! a team's diversity in a requested direction.

pub mod cli;
pub mod diversity;
pub mod error;
pub mod profile;
pub mod similarity;

// Re-export commonly used error types
pub use error::{CacheError, DiversityError, ProfileError};
