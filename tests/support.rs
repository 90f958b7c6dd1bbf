// tests/support.rs
//! Test utilities: fast configs, in-memory vaults, fault-injecting collaborators
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

use encrypted_record_vault::{
    Config, InMemorySecretHolder, KvStore, MasterSecret, MemoryKvStore, Result, SecretHolder,
    StoredBlob, Vault, VaultError,
};

/// Defaults with the KDF slowdown skipped and a short minimum secret length
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.features.skip_kdf_slowdown = true;
    config.policy.min_secret_len = 4;
    config
}

/// In-memory vault unlocked with `secret`, plus a handle on its storage
pub fn memory_vault(secret: &str) -> (Vault, Arc<MemoryKvStore>) {
    let kv = Arc::new(MemoryKvStore::new());
    let vault = Vault::new(
        kv.clone(),
        Arc::new(InMemorySecretHolder::new()),
        &test_config(),
    )
    .expect("build vault");
    vault.set_active_secret(secret).expect("unlock");
    (vault, kv)
}

/// Store that fails chosen `put` calls, counted from the moment it is armed
#[derive(Default)]
pub struct FlakyKvStore {
    inner: MemoryKvStore,
    puts: AtomicUsize,
    failing: Mutex<HashSet<usize>>,
}

impl FlakyKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the n-th upcoming puts (1-based, relative to now)
    pub fn fail_upcoming_puts(&self, which: &[usize]) {
        let base = self.puts.load(Ordering::SeqCst);
        let mut failing = self.failing.lock().unwrap();
        failing.clear();
        failing.extend(which.iter().map(|n| base + n));
    }

    pub fn heal(&self) {
        self.failing.lock().unwrap().clear();
    }

    pub fn snapshot(&self, key: &str) -> Option<StoredBlob> {
        self.inner.get(key).unwrap()
    }
}

impl KvStore for FlakyKvStore {
    fn get(&self, key: &str) -> Result<Option<StoredBlob>> {
        self.inner.get(key)
    }

    fn put(&self, key: &str, value: &StoredBlob) -> Result<()> {
        let n = self.puts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.failing.lock().unwrap().contains(&n) {
            return Err(VaultError::Storage(format!("injected failure on put #{n}")));
        }
        self.inner.put(key, value)
    }
}

/// Secret holder whose next `install` calls can be made to fail
#[derive(Default)]
pub struct FlakyHolder {
    inner: InMemorySecretHolder,
    failing_installs: AtomicUsize,
}

impl FlakyHolder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next_installs(&self, count: usize) {
        self.failing_installs.store(count, Ordering::SeqCst);
    }
}

impl SecretHolder for FlakyHolder {
    fn current(&self) -> Result<Option<MasterSecret>> {
        self.inner.current()
    }

    fn install(&self, secret: MasterSecret) -> Result<()> {
        let remaining = self.failing_installs.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failing_installs.store(remaining - 1, Ordering::SeqCst);
            return Err(VaultError::Storage("injected install failure".into()));
        }
        self.inner.install(secret)
    }

    fn clear(&self) -> Result<()> {
        self.inner.clear()
    }
}

/// Vault over fault-injecting collaborators, unlocked with `secret`
pub fn flaky_vault(secret: &str) -> (Vault, Arc<FlakyKvStore>, Arc<FlakyHolder>) {
    let kv = Arc::new(FlakyKvStore::new());
    let holder = Arc::new(FlakyHolder::new());
    let vault = Vault::new(kv.clone(), holder.clone(), &test_config()).expect("build vault");
    vault.set_active_secret(secret).expect("unlock");
    (vault, kv, holder)
}

/// Store whose next `put` parks until the test lets it go
#[derive(Default)]
pub struct PausingKvStore {
    inner: MemoryKvStore,
    pause: Mutex<Option<(Sender<()>, Receiver<()>)>>,
}

impl PausingKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the next put; returns (put-entered signal, release handle)
    pub fn pause_next_put(&self) -> (Receiver<()>, Sender<()>) {
        let (entered_tx, entered_rx) = channel();
        let (release_tx, release_rx) = channel();
        *self.pause.lock().unwrap() = Some((entered_tx, release_rx));
        (entered_rx, release_tx)
    }

    pub fn snapshot(&self, key: &str) -> Option<StoredBlob> {
        self.inner.get(key).unwrap()
    }
}

impl KvStore for PausingKvStore {
    fn get(&self, key: &str) -> Result<Option<StoredBlob>> {
        self.inner.get(key)
    }

    fn put(&self, key: &str, value: &StoredBlob) -> Result<()> {
        let armed = self.pause.lock().unwrap().take();
        if let Some((entered, release)) = armed {
            entered.send(()).ok();
            release.recv().ok();
        }
        self.inner.put(key, value)
    }
}
