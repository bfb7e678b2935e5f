//! Lookup Module
//!
//! The lookup capability every source implements, the context it runs under,
//! and the caching decorator that composes with any source.
//!
//! A lookup resolves a string key to `Ok(Some(value))` when found,
//! `Ok(None)` when the key definitively does not exist, or an error when the
//! lookup could not be completed.

mod cached;
mod context;

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::LookupError;

pub use cached::{wrap_with_cache, CachedLookup};
pub use context::LookupContext;

// == Lookup Trait ==
/// An asynchronous, possibly slow and possibly failing key lookup.
#[async_trait]
pub trait Lookup: Send + Sync {
    /// Payload produced for a resolved key
    type Value: Clone + Send + Sync + 'static;

    async fn lookup(
        &self,
        ctx: &LookupContext,
        key: &str,
    ) -> Result<Option<Self::Value>, LookupError>;
}

/// Type-erased lookup, as returned by [`wrap_with_cache`].
pub type SharedLookup<V> = Arc<dyn Lookup<Value = V>>;

#[async_trait]
impl<L> Lookup for Arc<L>
where
    L: Lookup + ?Sized,
{
    type Value = L::Value;

    async fn lookup(
        &self,
        ctx: &LookupContext,
        key: &str,
    ) -> Result<Option<Self::Value>, LookupError> {
        (**self).lookup(ctx, key).await
    }
}

// == Closure Lookups ==
/// Adapts an async closure into a [`Lookup`]. Built by [`lookup_fn`].
#[derive(Clone)]
pub struct FnLookup<F> {
    f: F,
}

/// Turns `Fn(LookupContext, String) -> impl Future<Output = Result<Option<V>, LookupError>>`
/// into a [`Lookup`].
///
/// ```ignore
/// let upper = lookup_fn(|_ctx, key: String| async move {
///     Ok(Some(key.to_uppercase()))
/// });
/// ```
pub fn lookup_fn<F, Fut, V>(f: F) -> FnLookup<F>
where
    F: Fn(LookupContext, String) -> Fut,
    Fut: Future<Output = Result<Option<V>, LookupError>>,
{
    FnLookup { f }
}

#[async_trait]
impl<F, Fut, V> Lookup for FnLookup<F>
where
    F: Fn(LookupContext, String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<V>, LookupError>> + Send + 'static,
    V: Clone + Send + Sync + 'static,
{
    type Value = V;

    async fn lookup(&self, ctx: &LookupContext, key: &str) -> Result<Option<V>, LookupError> {
        (self.f)(ctx.clone(), key.to_string()).await
    }
}
