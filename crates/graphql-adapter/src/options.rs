use std::{future::Future, sync::Arc};

use futures_util::{future::BoxFuture, FutureExt};
use http::request::Parts;

use crate::BoxError;

type OptionsFn<T> = dyn Fn(&Parts) -> BoxFuture<'static, Result<T, BoxError>> + Send + Sync;

/// Configuration handed to the query engine or the explorer renderer on every call.
///
/// Either a fixed value shared by all requests, or computed from the incoming request head.
pub enum Options<T> {
    Static(Arc<T>),
    Dynamic(Arc<OptionsFn<T>>),
}

impl<T> Clone for Options<T> {
    fn clone(&self) -> Self {
        match self {
            Options::Static(value) => Options::Static(Arc::clone(value)),
            Options::Dynamic(f) => Options::Dynamic(Arc::clone(f)),
        }
    }
}

impl<T> From<T> for Options<T>
where
    T: Send + Sync + 'static,
{
    fn from(value: T) -> Self {
        Options::new(value)
    }
}

impl<T> Options<T>
where
    T: Send + Sync + 'static,
{
    pub fn new(value: T) -> Self {
        Options::Static(Arc::new(value))
    }

    pub fn from_fn<F, E>(f: F) -> Self
    where
        F: Fn(&Parts) -> Result<T, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        Options::Dynamic(Arc::new(move |parts: &Parts| -> BoxFuture<'static, Result<T, BoxError>> {
            let result = f(parts).map_err(Into::into);
            futures_util::future::ready(result).boxed()
        }))
    }

    /// The returned future can't borrow the request, copy whatever it needs out of it first.
    pub fn from_async_fn<F, Fut, E>(f: F) -> Self
    where
        F: Fn(&Parts) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Into<BoxError>,
    {
        Options::Dynamic(Arc::new(move |parts: &Parts| -> BoxFuture<'static, Result<T, BoxError>> {
            f(parts).map(|result| result.map_err(Into::into)).boxed()
        }))
    }

    pub(crate) async fn resolve(&self, parts: &Parts) -> Result<Arc<T>, BoxError> {
        match self {
            Options::Static(value) => Ok(Arc::clone(value)),
            Options::Dynamic(f) => f(parts).await.map(Arc::new),
        }
    }
}
