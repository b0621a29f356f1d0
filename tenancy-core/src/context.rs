//! Ambient tenant context.
//!
//! Code that cannot take a [`TenantContext`] parameter reads the tenant of
//! the current logical flow through a [`TenantContextAccessor`]. A flow is a
//! future run under [`TaskLocalTenantContextAccessor::scope`]; child flows
//! started with [`scope`](TaskLocalTenantContextAccessor::scope) or
//! [`spawn`](TaskLocalTenantContextAccessor::spawn) see the value of the
//! flow they were started from.
//!
//! The slot of each flow does not hold the context directly but a shared
//! holder. Setting a new value clears the old holder before installing a new
//! one, so clearing reaches every flow that still points at the old holder,
//! while a new value never travels back into the flow that started this one.

use std::cell::RefCell;
use std::future::Future;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::task::JoinHandle;

use crate::tenant::TenantContext;

/// Gives access to the tenant of the current logical operation.
pub trait TenantContextAccessor: Send + Sync {
    fn get(&self) -> Option<TenantContext>;

    /// `Some` installs a new context for this flow and the flows it starts
    /// from now on. `None` clears the context for every flow sharing it.
    fn set(&self, value: Option<TenantContext>);
}

#[derive(Debug, Default)]
struct Holder {
    current: RwLock<Option<TenantContext>>,
}

tokio::task_local! {
    static FLOW: RefCell<Option<Arc<Holder>>>;
}

fn current_holder() -> Option<Arc<Holder>> {
    FLOW.try_with(|slot| slot.borrow().clone()).ok().flatten()
}

/// [`TenantContextAccessor`] backed by tokio task-local storage.
///
/// All instances share the same storage; the accessor itself is stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskLocalTenantContextAccessor;

impl TaskLocalTenantContextAccessor {
    pub fn new() -> Self {
        Self
    }

    /// Run `fut` as a logical flow, starting from the enclosing flow's context.
    pub fn scope<F>(fut: F) -> impl Future<Output = F::Output>
    where
        F: Future,
    {
        FLOW.scope(RefCell::new(current_holder()), fut)
    }

    /// `tokio::spawn` a child flow of the current one.
    pub fn spawn<F>(fut: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        tokio::spawn(Self::scope(fut))
    }
}

impl TenantContextAccessor for TaskLocalTenantContextAccessor {
    fn get(&self) -> Option<TenantContext> {
        current_holder().and_then(|holder| holder.current.read().clone())
    }

    fn set(&self, value: Option<TenantContext>) {
        let outside = FLOW
            .try_with(|slot| {
                let mut slot = slot.borrow_mut();
                if let Some(holder) = slot.as_ref() {
                    *holder.current.write() = None;
                }
                if let Some(value) = value {
                    *slot = Some(Arc::new(Holder {
                        current: RwLock::new(Some(value)),
                    }));
                }
            })
            .is_err();

        if outside {
            tracing::warn!("tenant context set outside of a tenant flow; value discarded");
        }
    }
}

impl<A> TenantContextAccessor for Arc<A>
where
    A: TenantContextAccessor + ?Sized,
{
    fn get(&self) -> Option<TenantContext> {
        (**self).get()
    }

    fn set(&self, value: Option<TenantContext>) {
        (**self).set(value)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::oneshot;
    use tracing_test::traced_test;

    use super::*;

    type Accessor = TaskLocalTenantContextAccessor;

    fn foo() -> TenantContext {
        TenantContext::new("foo", Some("bar".to_string()))
    }

    #[tokio::test]
    async fn returns_context_after_await() {
        Accessor::scope(async {
            let accessor = Accessor::new();
            accessor.set(Some(foo()));

            tokio::time::sleep(Duration::from_millis(10)).await;

            assert_eq!(accessor.get(), Some(foo()));
        })
        .await;
    }

    #[tokio::test]
    async fn returns_none_when_nothing_is_set() {
        assert_eq!(Accessor::new().get(), None);
        Accessor::scope(async { assert_eq!(Accessor::new().get(), None) }).await;
    }

    #[tokio::test]
    async fn clearing_in_parent_is_seen_by_running_child() {
        Accessor::scope(async {
            let accessor = Accessor::new();
            accessor.set(Some(foo()));

            let (flowed_tx, flowed_rx) = oneshot::channel();
            let (cleared_tx, cleared_rx) = oneshot::channel::<()>();

            let child = Accessor::spawn(async move {
                let seen = Accessor::new().get();
                let _ = flowed_tx.send(seen);
                let _ = cleared_rx.await;
                Accessor::new().get()
            });

            assert_eq!(flowed_rx.await.unwrap(), Some(foo()));

            accessor.set(None);
            cleared_tx.send(()).unwrap();

            assert_eq!(accessor.get(), None);
            assert_eq!(child.await.unwrap(), None);
        })
        .await;
    }

    #[tokio::test]
    async fn replacing_in_parent_clears_running_child() {
        Accessor::scope(async {
            let accessor = Accessor::new();
            accessor.set(Some(foo()));

            let (flowed_tx, flowed_rx) = oneshot::channel();
            let (changed_tx, changed_rx) = oneshot::channel::<()>();

            let child = Accessor::spawn(async move {
                let _ = flowed_tx.send(Accessor::new().get());
                let _ = changed_rx.await;
                Accessor::new().get()
            });

            assert_eq!(flowed_rx.await.unwrap(), Some(foo()));

            let replacement = TenantContext::new("baz", Some("qux".to_string()));
            accessor.set(Some(replacement.clone()));
            changed_tx.send(()).unwrap();

            assert_eq!(accessor.get(), Some(replacement));
            assert_eq!(child.await.unwrap(), None);
        })
        .await;
    }

    #[tokio::test]
    async fn does_not_flow_after_clear() {
        Accessor::scope(async {
            let accessor = Accessor::new();
            accessor.set(Some(foo()));
            accessor.set(None);

            let child = Accessor::spawn(async { Accessor::new().get() });
            assert_eq!(child.await.unwrap(), None);
        })
        .await;
    }

    #[tokio::test]
    async fn does_not_flow_into_plain_spawned_tasks() {
        Accessor::scope(async {
            Accessor::new().set(Some(foo()));

            let detached = tokio::spawn(async { Accessor::new().get() });
            assert_eq!(detached.await.unwrap(), None);
        })
        .await;
    }

    #[tokio::test]
    async fn child_value_does_not_flow_back_to_parent() {
        Accessor::scope(async {
            let child = Accessor::spawn(async {
                Accessor::new().set(Some(foo()));
                Accessor::new().get()
            });

            assert_eq!(child.await.unwrap(), Some(foo()));
            assert_eq!(Accessor::new().get(), None);
        })
        .await;
    }

    #[tokio::test]
    async fn clearing_in_child_is_seen_by_siblings() {
        Accessor::scope(async {
            Accessor::new().set(Some(foo()));

            let (cleared_tx, cleared_rx) = oneshot::channel::<()>();

            let sibling = Accessor::spawn(async move {
                let _ = cleared_rx.await;
                Accessor::new().get()
            });

            Accessor::spawn(async { Accessor::new().set(None) }).await.unwrap();
            cleared_tx.send(()).unwrap();

            assert_eq!(sibling.await.unwrap(), None);
        })
        .await;
    }

    #[tokio::test]
    async fn independent_flows_are_isolated() {
        let (a_set_tx, a_set_rx) = oneshot::channel::<()>();
        let (b_checked_tx, b_checked_rx) = oneshot::channel::<()>();

        let a = tokio::spawn(Accessor::scope(async move {
            Accessor::new().set(Some(TenantContext::from_id("a")));
            a_set_tx.send(()).unwrap();
            let _ = b_checked_rx.await;
            Accessor::new().get()
        }));

        let b = tokio::spawn(Accessor::scope(async move {
            let _ = a_set_rx.await;
            let seen = Accessor::new().get();
            b_checked_tx.send(()).unwrap();
            seen
        }));

        assert_eq!(a.await.unwrap(), Some(TenantContext::from_id("a")));
        assert_eq!(b.await.unwrap(), None);
    }

    #[tokio::test]
    async fn nested_scope_inherits_enclosing_context() {
        Accessor::scope(async {
            Accessor::new().set(Some(foo()));
            let inner = Accessor::scope(async { Accessor::new().get() }).await;
            assert_eq!(inner, Some(foo()));
        })
        .await;
    }

    #[tokio::test]
    #[traced_test]
    async fn set_outside_of_flow_is_discarded() {
        let accessor = Accessor::new();

        accessor.set(Some(foo()));

        assert_eq!(accessor.get(), None);
        assert!(logs_contain("outside of a tenant flow"));
    }
}
