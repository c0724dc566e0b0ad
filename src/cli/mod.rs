//! # CLI Module
//!
//! Command implementations behind the `tastelist` binary. Each command takes
//! the loaded [`crate::config::Config`], reports progress with the crate's
//! output macros and exits with status 1 on unrecoverable errors.
//!
//! ## Commands
//!
//! - [`serve`] - Runs the web application (login, callback, create-playlist API)
//! - [`create`] - Logs in through the browser and creates a single playlist
//!
//! ## Data Flow of `create`
//!
//! 1. **Validation**: The request is checked before anything touches the network
//! 2. **Authentication**: Temporary callback server, browser login, code exchange
//! 3. **Fetch**: Liked or top tracks are paged in and deduplicated
//! 4. **Build**: The playlist is created and filled in batches of 100
//! 5. **Output**: A summary table with the playlist link
//!
//! ## Usage Patterns
//!
//! ```bash
//! tastelist serve
//! tastelist create --source liked --limit 120
//! tastelist create --source top --time-range medium_term --name "Top of the year"
//! ```

mod auth;
mod create;
mod serve;

pub use auth::browser_login;
pub use auth::wait_for_token;
pub use create::create;
pub use serve::serve;
