use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use services::{AdminService, GameService};

pub trait UiApp: Send + Sync {
    fn open_admin_on_launch(&self) -> bool;

    fn game(&self) -> Arc<GameService>;
    fn admin(&self) -> Arc<AdminService>;
}

#[derive(Clone)]
pub struct AppContext {
    open_admin_on_launch_once: Arc<AtomicBool>,

    game: Arc<GameService>,
    admin: Arc<AdminService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            open_admin_on_launch_once: Arc::new(AtomicBool::new(app.open_admin_on_launch())),
            game: app.game(),
            admin: app.admin(),
        }
    }

    /// One-shot: true only for the first caller when `--admin` was passed.
    #[must_use]
    pub fn take_open_admin_on_launch(&self) -> bool {
        self.open_admin_on_launch_once.swap(false, Ordering::AcqRel)
    }

    #[must_use]
    pub fn game(&self) -> Arc<GameService> {
        Arc::clone(&self.game)
    }

    #[must_use]
    pub fn admin(&self) -> Arc<AdminService> {
        Arc::clone(&self.admin)
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
