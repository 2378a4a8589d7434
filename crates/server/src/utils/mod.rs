mod sessions;
pub use sessions::{SessionStore, SharedSession};

mod shutdown_signal;
pub use shutdown_signal::shutdown_signal;

mod state;
pub use state::AppState;
