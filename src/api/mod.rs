//! HTTP layer for session-bridge.
//!
//! This module exposes the session lifecycle over HTTP: a
//! cookie-identified `/session` resource and a `/flow` redirect chain
//! that walks one complete lifecycle across separate requests, the way
//! a browser following redirects would.
//!
//! ## Endpoints
//!
//! ### Health & Info
//! - `GET /health` - Health check
//! - `GET /` - API information
//!
//! ### Session access
//! - `GET /session` - Read-only snapshot of the cookie's session
//! - `PUT /session` - Merge variables and commit (creates on first use)
//! - `DELETE /session` - Destroy the cookie's session
//!
//! ### Lifecycle chain
//! - `GET /flow` - Entry; drops any previous cookie, redirects to seed
//! - `GET /flow/seed` → `/flow/persisted` → `/flow/regenerate` →
//!   `/flow/clear?old_id=…` → `/flow/status` → `/flow/destroy` →
//!   `/flow/abort` → `/flow/done` - Each step checks part of the
//!   contract and 303-redirects onward with the session cookie applied
//!
//! ## Example
//!
//! ```no_run
//! use session_bridge::api::{ServerConfig, serve};
//!
//! #[tokio::main]
//! async fn main() -> session_bridge::Result<()> {
//!     let config = ServerConfig::new("127.0.0.1", 8080);
//!     serve(config).await
//! }
//! ```

pub mod cookie;
pub mod handlers;
pub mod router;
pub mod types;

// Re-export commonly used types
pub use handlers::AppState;
pub use router::{create_router, create_router_with_state, serve, serve_with_state, ServerConfig};
pub use types::{
    DestroySessionResponse, ErrorResponse, FlowStepResponse, FlowSummaryResponse,
    SessionSnapshotResponse, UpdateSessionRequest, UpdateSessionResponse,
};
