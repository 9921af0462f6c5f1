pub mod client;
pub mod events;

pub use client::GitLabClient;
pub use events::fetch_remote_events;
