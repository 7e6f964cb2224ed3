//! Adapter registry: provider identifier → adapter instance.
//!
//! The registry is an explicit, constructed value handed to the checkout
//! flow. Tests substitute fake adapters by building their own registry; no
//! process-wide table exists.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::sync::Arc;

use crate::adapters::{
    CardNetworkAdapter, ChainSettlementAdapter, ProviderAdapter, WalletNetworkAdapter,
};
use crate::types::Provider;

/// A mapping from [`Provider`] to the adapter that settles for it.
///
/// Resolving an identifier with no registered adapter is a contract
/// violation the flow reports as `UnknownProvider` before any settlement
/// attempt is made.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<Provider, Arc<dyn ProviderAdapter>>,
}

impl AdapterRegistry {
    /// An empty registry. Use [`AdapterRegistry::defaults`] for the three
    /// bundled simulators.
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// The bundled simulated adapters, one per provider.
    pub fn defaults() -> Self {
        Self::new()
            .and_register(CardNetworkAdapter::new())
            .and_register(WalletNetworkAdapter::new())
            .and_register(ChainSettlementAdapter::new())
    }

    /// Registers an adapter under its own provider identifier, replacing any
    /// previous registration for that provider.
    pub fn register<A>(&mut self, adapter: A)
    where
        A: ProviderAdapter + 'static,
    {
        self.adapters.insert(adapter.provider(), Arc::new(adapter));
    }

    /// Fluent form of [`AdapterRegistry::register`].
    pub fn and_register<A>(mut self, adapter: A) -> Self
    where
        A: ProviderAdapter + 'static,
    {
        self.register(adapter);
        self
    }

    /// Returns the adapter for the given provider, if one is registered.
    pub fn by_provider<P: Borrow<Provider>>(&self, provider: P) -> Option<&Arc<dyn ProviderAdapter>> {
        self.adapters.get(provider.borrow())
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl<'a> IntoIterator for &'a AdapterRegistry {
    type Item = (&'a Provider, &'a Arc<dyn ProviderAdapter>);
    type IntoIter = std::collections::hash_map::Iter<'a, Provider, Arc<dyn ProviderAdapter>>;

    fn into_iter(self) -> Self::IntoIter {
        self.adapters.iter()
    }
}
