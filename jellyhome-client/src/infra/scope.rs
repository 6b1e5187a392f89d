//! Lifecycle-bound task scope
//!
//! Every task spawned through a scope stops at its next await point once the
//! scope is cancelled. Child scopes are cancelled together with their parent.

use std::future::Future;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct LifecycleScope {
    handle: Handle,
    token: CancellationToken,
}

impl LifecycleScope {
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            token: CancellationToken::new(),
        }
    }

    /// Scope on the runtime the caller is running on.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }

    /// A scope that ends no later than this one.
    pub fn child(&self) -> Self {
        Self {
            handle: self.handle.clone(),
            token: self.token.child_token(),
        }
    }

    /// Spawn `future`; it is dropped at its next await point once the scope
    /// is cancelled, in which case the handle resolves to `None`.
    pub fn spawn<F>(&self, future: F) -> JoinHandle<Option<F::Output>>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let token = self.token.clone();
        self.handle.spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => None,
                output = future => Some(output),
            }
        })
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn spawned_tasks_complete_while_alive() {
        let scope = LifecycleScope::current();
        let output = scope.spawn(async { 7 }).await.unwrap();
        assert_eq!(output, Some(7));
    }

    #[tokio::test]
    async fn cancellation_stops_pending_tasks() {
        let scope = LifecycleScope::current();
        let task = scope.spawn(async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            1
        });
        scope.cancel();
        assert_eq!(task.await.unwrap(), None);
        assert!(scope.is_cancelled());
    }

    #[tokio::test]
    async fn children_follow_parent() {
        let parent = LifecycleScope::current();
        let child = parent.child();
        parent.cancel();
        assert!(child.is_cancelled());

        let sibling = LifecycleScope::current();
        let grandchild = sibling.child();
        grandchild.cancel();
        assert!(!sibling.is_cancelled());
    }
}
