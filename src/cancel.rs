use std::collections::HashMap;
use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicBool, Ordering},
};

#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn same_as(&self, other: &CancelFlag) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// In-flight week loads, at most one per client. Starting a load cancels the previous one.
///
/// The lock is never held across an await, so a plain mutex is enough and lets
/// [`WeekLoad`] unregister itself from `Drop`.
#[derive(Debug, Default)]
pub struct WeekLoads {
    active: Mutex<HashMap<String, CancelFlag>>,
}

impl WeekLoads {
    pub fn begin(self: &Arc<Self>, client_id: &str) -> WeekLoad {
        let flag = CancelFlag::new();
        if let Some(previous) = self.lock().insert(client_id.to_string(), flag.clone()) {
            previous.cancel();
        }
        WeekLoad {
            loads: Arc::clone(self),
            client_id: client_id.to_string(),
            flag,
        }
    }

    fn finish(&self, client_id: &str, flag: &CancelFlag) {
        let mut active = self.lock();
        if active.get(client_id).is_some_and(|current| current.same_as(flag)) {
            active.remove(client_id);
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CancelFlag>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    fn in_flight(&self) -> usize {
        self.lock().len()
    }
}

/// Registration of one running week load; dropping it unregisters the load,
/// including when the request future is dropped mid-flight.
#[derive(Debug)]
pub struct WeekLoad {
    loads: Arc<WeekLoads>,
    client_id: String,
    flag: CancelFlag,
}

impl WeekLoad {
    pub fn flag(&self) -> &CancelFlag {
        &self.flag
    }
}

impl Drop for WeekLoad {
    fn drop(&mut self) {
        self.loads.finish(&self.client_id, &self.flag);
    }
}
