pub mod comments;
pub mod health;
pub mod internal;
pub mod stats;
pub mod suggestions;
pub mod votes;
