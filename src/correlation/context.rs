//! Per-thread / per-task correlation id binding.

use std::cell::Cell;
use std::fmt;
use std::future::Future;

use serde::Serialize;
use uuid::Uuid;

tokio::task_local! {
    static TASK_CORRELATION: Cell<Option<CorrelationId>>;
}

thread_local! {
    static THREAD_CORRELATION: Cell<Option<CorrelationId>> = const { Cell::new(None) };
}

/// Identifier shared by every invocation of one top-level call chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    /// Generate a new random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for CorrelationId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of resolving the correlation id at invocation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrelationBinding {
    pub id: CorrelationId,
    nested: bool,
}

impl CorrelationBinding {
    /// True when an id was already bound before this invocation started.
    pub fn is_nested(&self) -> bool {
        self.nested
    }

    /// Only the invocation that created the binding may release it.
    pub fn owns_binding(&self) -> bool {
        !self.nested
    }
}

/// Accessor for the binding of the current logical execution context.
///
/// Inside a future run through [`CorrelationContext::scope`] the binding is
/// task-local, so it follows the task across worker threads. Everywhere
/// else it is thread-local.
#[derive(Debug, Clone, Copy, Default)]
pub struct CorrelationContext;

impl CorrelationContext {
    /// The currently bound id, if any.
    pub fn current() -> Option<CorrelationId> {
        TASK_CORRELATION
            .try_with(Cell::get)
            .unwrap_or_else(|_| THREAD_CORRELATION.with(Cell::get))
    }

    /// Return the bound id, generating and binding one if absent.
    pub fn get_or_create() -> CorrelationId {
        Self::enter().id
    }

    /// Resolve the id for a new invocation and report whether it is nested.
    pub fn enter() -> CorrelationBinding {
        match Self::current() {
            Some(id) => CorrelationBinding { id, nested: true },
            None => {
                let id = CorrelationId::generate();
                replace(Some(id));
                tracing::trace!(correlation_id = %id, "Correlation id bound");
                CorrelationBinding { id, nested: false }
            }
        }
    }

    /// True if an id is currently bound.
    pub fn is_bound() -> bool {
        Self::current().is_some()
    }

    /// Unbind the current id. No-op when nothing is bound.
    pub fn release() {
        if let Some(id) = replace(None) {
            tracing::trace!(correlation_id = %id, "Correlation id released");
        }
    }

    /// True when running inside a task-local correlation scope.
    pub fn in_task_scope() -> bool {
        TASK_CORRELATION.try_with(|_| ()).is_ok()
    }

    /// Run `fut` with its own, initially empty, task-local binding.
    pub async fn scope<F: Future>(fut: F) -> F::Output {
        TASK_CORRELATION.scope(Cell::new(None), fut).await
    }

    /// Run `fut` with the caller's current id pre-bound.
    ///
    /// Monitored calls inside `fut` join the caller's chain as nested
    /// invocations. Capture happens when `inherit` is called, so the returned
    /// future can be handed to `tokio::spawn`.
    pub fn inherit<F: Future>(fut: F) -> impl Future<Output = F::Output> {
        let current = Self::current();
        TASK_CORRELATION.scope(Cell::new(current), fut)
    }
}

fn replace(value: Option<CorrelationId>) -> Option<CorrelationId> {
    match TASK_CORRELATION.try_with(|slot| slot.replace(value)) {
        Ok(previous) => previous,
        Err(_) => THREAD_CORRELATION.with(|slot| slot.replace(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create_is_stable_until_release() {
        CorrelationContext::release();
        assert!(!CorrelationContext::is_bound());

        let first = CorrelationContext::get_or_create();
        let second = CorrelationContext::get_or_create();
        assert_eq!(first, second);

        CorrelationContext::release();
        assert!(CorrelationContext::current().is_none());
        let third = CorrelationContext::get_or_create();
        assert_ne!(first, third);
        CorrelationContext::release();
    }

    #[test]
    fn test_enter_reports_nesting() {
        let outer = CorrelationContext::enter();
        let inner = CorrelationContext::enter();
        assert!(!outer.is_nested());
        assert!(inner.is_nested());
        assert_eq!(outer.id, inner.id);
        CorrelationContext::release();
    }

    #[test]
    fn test_release_absent_is_noop() {
        CorrelationContext::release();
        CorrelationContext::release();
        assert!(!CorrelationContext::is_bound());
    }

    #[test]
    fn test_threads_do_not_share_bindings() {
        let here = CorrelationContext::get_or_create();
        let there = std::thread::spawn(|| {
            assert!(!CorrelationContext::is_bound());
            let id = CorrelationContext::get_or_create();
            CorrelationContext::release();
            id
        })
        .join()
        .unwrap();
        assert_ne!(here, there);
        CorrelationContext::release();
    }

    #[tokio::test]
    async fn test_task_scopes_are_isolated() {
        let a = tokio::spawn(CorrelationContext::scope(async {
            let id = CorrelationContext::get_or_create();
            tokio::task::yield_now().await;
            assert_eq!(CorrelationContext::current(), Some(id));
            id
        }));
        let b = tokio::spawn(CorrelationContext::scope(async {
            let id = CorrelationContext::get_or_create();
            tokio::task::yield_now().await;
            id
        }));
        assert_ne!(a.await.unwrap(), b.await.unwrap());
    }

    #[tokio::test]
    async fn test_inherit_carries_current_id() {
        CorrelationContext::scope(async {
            let parent = CorrelationContext::get_or_create();
            let child = tokio::spawn(CorrelationContext::inherit(async {
                CorrelationContext::enter()
            }))
            .await
            .unwrap();
            assert_eq!(child.id, parent);
            assert!(child.is_nested());
        })
        .await;
    }

    #[test]
    fn test_display_is_hyphenated_uuid() {
        let id = CorrelationId::generate();
        let text = id.to_string();
        assert_eq!(text.len(), 36);
        assert_eq!(text.matches('-').count(), 4);
    }
}
