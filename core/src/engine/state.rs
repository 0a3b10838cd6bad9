use crate::model::{Coordinate, ViewModel};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio_util::sync::CancellationToken;

/// Shared, session-scoped access to the [`ViewModel`].
///
/// Every mutation goes through [`ViewHandle::update`], which refuses to touch
/// the model once the session token is cancelled. Locks are never held
/// across an await point.
#[derive(Debug, Clone)]
pub struct ViewHandle {
    model: Arc<RwLock<ViewModel>>,
    session: CancellationToken,
}

impl ViewHandle {
    pub fn new() -> Self {
        Self::with_token(CancellationToken::new())
    }

    pub fn with_token(session: CancellationToken) -> Self {
        Self {
            model: Arc::new(RwLock::new(ViewModel::new())),
            session,
        }
    }

    pub fn session_token(&self) -> CancellationToken {
        self.session.clone()
    }

    pub fn is_active(&self) -> bool {
        !self.session.is_cancelled()
    }

    pub fn snapshot(&self) -> ViewModel {
        self.read().clone()
    }

    pub fn position(&self) -> Option<Coordinate> {
        self.read().position()
    }

    pub fn report_location(&self, index: usize) -> Option<Coordinate> {
        self.read().reports().get(index).map(|report| report.location)
    }

    /// Applies `mutate` if the session is still active. Returns whether it ran.
    pub fn update<F>(&self, mutate: F) -> bool
    where
        F: FnOnce(&mut ViewModel),
    {
        let mut guard = self.write();
        if self.session.is_cancelled() {
            return false;
        }
        mutate(&mut guard);
        true
    }

    /// Ends the session. Once this returns no mutation is running and none
    /// will run again.
    pub fn seal(&self) {
        self.session.cancel();
        drop(self.write());
    }

    fn read(&self) -> RwLockReadGuard<'_, ViewModel> {
        self.model.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ViewModel> {
        self.model.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ViewHandle {
    fn default() -> Self {
        Self::new()
    }
}
