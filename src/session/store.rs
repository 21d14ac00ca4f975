use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

use super::SessionHandle;

/// Process-local registry of live sessions, keyed by the opaque id carried
/// in the signed session cookie. Ephemeral by design: a restart signs
/// everyone out.
#[derive(Default)]
pub struct SessionStore {
    inner: Mutex<HashMap<String, SessionHandle>>,
}

impl SessionStore {
    pub fn insert(&self, handle: SessionHandle) -> String {
        let sid = Uuid::new_v4().to_string();
        self.inner.lock().unwrap().insert(sid.clone(), handle);
        sid
    }

    pub fn get(&self, sid: &str) -> Option<SessionHandle> {
        self.inner.lock().unwrap().get(sid).cloned()
    }

    pub fn remove(&self, sid: &str) -> Option<SessionHandle> {
        self.inner.lock().unwrap().remove(sid)
    }
}
