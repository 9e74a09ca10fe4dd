//! Token-keyed dependency container.
//!
//! Three registration strategies share one resolution algorithm:
//! - **Transient**: the factory runs on every [`Container::resolve`]
//! - **Singleton**: the factory runs on first resolution and the value is cached
//! - **Instance**: a pre-built value is returned as-is
//!
//! Resolution order is instances, then cached singletons, then singleton
//! factories, then transient factories. Factories receive the container and may
//! resolve other tokens from it. There is no cycle detection: a singleton that
//! depends on itself blocks forever.

use std::any::{type_name, Any};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use super::Token;

/// Type-erased value stored in the container.
type Value = Arc<dyn Any + Send + Sync>;

/// Error a factory may return while building its value.
pub type BuildError = Box<dyn std::error::Error + Send + Sync>;

type Factory = Box<dyn Fn(&Container) -> Result<Value, ContainerError> + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("DI: token not registered → {0}")]
    NotRegistered(Token),

    #[error("DI: token {token} does not hold a value of type {expected}")]
    TypeMismatch { token: Token, expected: &'static str },

    #[error("DI: failed to build {token}: {source}")]
    Build {
        token: Token,
        #[source]
        source: BuildError,
    },
}

/// A singleton factory and the cell its value is cached in.
///
/// Each token owns its cell, so concurrent first resolutions of one token run
/// the factory once while a factory is free to resolve other tokens.
struct Singleton {
    factory: Factory,
    cache: OnceCell<Value>,
}

/// Dependency registry addressed by [`Token`].
///
/// Registration takes `&mut self`; once shared behind an `Arc` the container is
/// only resolved from. Singleton caches are the only state that changes after
/// that point.
#[derive(Default)]
pub struct Container {
    factories: HashMap<Token, Factory>,
    singletons: HashMap<Token, Singleton>,
    instances: HashMap<Token, Value>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transient factory. Every resolution builds a fresh value.
    pub fn register<T, F>(&mut self, token: Token, factory: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&Container) -> Result<T, BuildError> + Send + Sync + 'static,
    {
        self.factories.insert(token, erase(token, factory));
    }

    /// Register a singleton factory. It is not invoked until the first resolution.
    ///
    /// Replacing the factory of a singleton that was already built keeps the
    /// cached value.
    pub fn register_singleton<T, F>(&mut self, token: Token, factory: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&Container) -> Result<T, BuildError> + Send + Sync + 'static,
    {
        let factory = erase(token, factory);
        match self.singletons.entry(token) {
            Entry::Occupied(mut entry) => entry.get_mut().factory = factory,
            Entry::Vacant(entry) => {
                entry.insert(Singleton {
                    factory,
                    cache: OnceCell::new(),
                });
            }
        }
    }

    /// Register an already constructed value. Wins over any factory for `token`.
    pub fn register_instance<T>(&mut self, token: Token, instance: T)
    where
        T: Send + Sync + 'static,
    {
        self.instances.insert(token, Arc::new(instance));
    }

    /// Resolve `token` to a value of type `T`.
    pub fn resolve<T>(&self, token: Token) -> Result<Arc<T>, ContainerError>
    where
        T: Send + Sync + 'static,
    {
        self.resolve_value(token)?
            .downcast::<T>()
            .map_err(|_| ContainerError::TypeMismatch {
                token,
                expected: type_name::<T>(),
            })
    }

    fn resolve_value(&self, token: Token) -> Result<Value, ContainerError> {
        if let Some(instance) = self.instances.get(&token) {
            return Ok(Arc::clone(instance));
        }

        if let Some(singleton) = self.singletons.get(&token) {
            // A failed build leaves the cell empty so the next resolution retries.
            return singleton
                .cache
                .get_or_try_init(|| (singleton.factory)(self))
                .map(Arc::clone);
        }

        if let Some(factory) = self.factories.get(&token) {
            return factory(self);
        }

        Err(ContainerError::NotRegistered(token))
    }

    /// Whether `token` is present in any mapping. Never builds anything.
    pub fn has(&self, token: Token) -> bool {
        self.instances.contains_key(&token)
            || self.singletons.contains_key(&token)
            || self.factories.contains_key(&token)
    }

    /// Drop every registration and every cached singleton.
    pub fn clear(&mut self) {
        self.factories.clear();
        self.singletons.clear();
        self.instances.clear();
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cached: Vec<_> = self
            .singletons
            .iter()
            .filter(|(_, singleton)| singleton.cache.get().is_some())
            .map(|(token, _)| token)
            .collect();
        f.debug_struct("Container")
            .field("factories", &self.factories.keys().collect::<Vec<_>>())
            .field("singletons", &self.singletons.keys().collect::<Vec<_>>())
            .field("instances", &self.instances.keys().collect::<Vec<_>>())
            .field("cache", &cached)
            .finish()
    }
}

fn erase<T, F>(token: Token, factory: F) -> Factory
where
    T: Send + Sync + 'static,
    F: Fn(&Container) -> Result<T, BuildError> + Send + Sync + 'static,
{
    Box::new(move |container| {
        factory(container)
            .map(|value| Arc::new(value) as Value)
            .map_err(|source| ContainerError::Build { token, source })
    })
}
