mod session;

pub use session::MAX_PENDING_SESSIONS;
pub use session::PENDING_TTL_SECS;
pub use session::SESSION_COOKIE;
pub use session::SESSION_TTL_SECS;
pub use session::Session;
pub use session::SessionManager;
pub use session::expired_session_cookie;
pub use session::session_cookie;
pub use session::session_id;
