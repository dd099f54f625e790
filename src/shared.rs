//! Shared Engine
//!
//! A cloneable, thread-safe handle around one [`Engine`].
//!
//! The engine itself assumes a single owner. This handle provides that
//! exclusivity with a mutex, so every operation runs alone, reads included.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::Config;
use crate::engine::Engine;
use crate::error::Result;
use crate::format::{Key, Value};

/// Cloneable handle; all clones refer to the same engine
#[derive(Clone)]
pub struct SharedEngine {
    inner: Arc<Mutex<Engine>>,
}

impl SharedEngine {
    /// Open or create a database and wrap it
    pub fn open(config: Config) -> Result<Self> {
        Ok(Self::new(Engine::open(config)?))
    }

    pub fn new(engine: Engine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    pub fn write(&self, key: impl Into<Key>, value: impl Into<Value>) -> Result<()> {
        self.inner.lock().write(key, value)
    }

    pub fn read(&self, key: impl Into<Key>) -> Result<Value> {
        self.inner.lock().read(key)
    }

    pub fn delete(&self, key: impl Into<Key>) -> Result<()> {
        self.inner.lock().delete(key)
    }

    pub fn contains_key(&self, key: impl Into<Key>) -> bool {
        self.inner.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Run several operations under one lock acquisition
    ///
    /// Use this for delete-then-rewrite so no other handle observes the
    /// key missing in between.
    pub fn with<R>(&self, f: impl FnOnce(&mut Engine) -> R) -> R {
        let mut engine = self.inner.lock();
        f(&mut *engine)
    }

    /// Close the engine if this is the last handle
    ///
    /// Returns `Ok(false)` without closing while other clones are alive.
    pub fn close(self) -> Result<bool> {
        match Arc::try_unwrap(self.inner) {
            Ok(engine) => {
                engine.into_inner().close()?;
                Ok(true)
            }
            Err(_) => Ok(false),
        }
    }
}
