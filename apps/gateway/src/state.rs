use std::sync::Arc;

use foldify_submit::HttpBackend;

use crate::{config::Config, inflight::InFlight, session::SessionSigner};

pub struct State {
    pub config: Config,
    pub backend: HttpBackend,
    pub sessions: Arc<SessionSigner>,
    pub submissions: Arc<InFlight>,
}

impl State {
    pub fn new(config: Config) -> Arc<Self> {
        let backend = HttpBackend::new(config.backend_url.clone());
        let sessions = Arc::new(SessionSigner::new(
            &config.session_secret,
            config.secure_cookies(),
        ));

        Arc::new(Self {
            config,
            backend,
            sessions,
            submissions: Arc::new(InFlight::default()),
        })
    }

    /// Backend client acting for the browser session of the request
    pub fn backend_for(&self, session: Option<&crate::session::SessionToken>) -> HttpBackend {
        self.backend.with_session(session.map(|s| s.0.clone()))
    }
}
