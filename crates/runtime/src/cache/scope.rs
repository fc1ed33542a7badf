use std::future::Future;

use tokio::sync::OnceCell;

/// Memoizes one value for the lifetime of a single logical request.
///
/// Several lookups inside the same request share the first successful load;
/// a failed load is retried by the next caller.
#[derive(Debug)]
pub struct RequestScope<V> {
    cell: OnceCell<V>,
}

impl<V> RequestScope<V> {
    pub fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    pub async fn get_or_load<F, Fut, E>(&self, load: F) -> Result<&V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        self.cell.get_or_try_init(load).await
    }

    pub fn get(&self) -> Option<&V> {
        self.cell.get()
    }
}

impl<V> Default for RequestScope<V> {
    fn default() -> Self {
        Self::new()
    }
}
