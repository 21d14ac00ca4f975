use std::sync::Arc;

use crate::infra::identity::IdentityApi;
use crate::infra::xano::XanoCtx;
use crate::security::config::SecurityConfig;
use crate::security::jwt::JwtManager;
use crate::session::SessionStore;

pub struct AppState {
    pub xano: XanoCtx,
    /// Identity seam used by the session lifecycle; production wiring is
    /// the Xano context itself.
    pub identity: Arc<dyn IdentityApi>,
    pub jwt: JwtManager,
    pub security: SecurityConfig,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(xano: XanoCtx, jwt: JwtManager, security: SecurityConfig) -> Arc<Self> {
        let identity: Arc<dyn IdentityApi> = Arc::new(xano.clone());
        Arc::new(Self {
            xano,
            identity,
            jwt,
            security,
            sessions: SessionStore::default(),
        })
    }
}
