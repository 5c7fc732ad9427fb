//! Server state

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::app::options::AppOptions;
use crate::authn::token_guard::TokenGuard;
use crate::exec::runner::CommandRunner;
use crate::filesys::file::File;

/// Server state shared across handlers
pub struct ServerState {
    pub options: Arc<AppOptions>,
    pub token_guard: TokenGuard,
    pub runner: Arc<dyn CommandRunner>,
    pub log_file: File,
    /// Held while a privileged action runs, so actions never overlap
    pub action_lock: Mutex<()>,
}

impl ServerState {
    pub fn new(options: Arc<AppOptions>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            token_guard: TokenGuard::new(options.server.token.clone()),
            log_file: File::new(options.log_tail.path.clone()),
            options,
            runner,
            action_lock: Mutex::new(()),
        }
    }
}
