//! Session bootstrap.
//!
//! `fetch_user` resolves the requesting user against `me/`. Concurrent
//! callers share one in-flight request. The first successful resolution of
//! a signed-in user after construction (or after a reset) fans out to the
//! user's characters, notifications and teams. Later resolutions only
//! refresh the user.

use savageaim_client::ApiRequest;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::model::User;
use crate::state::{SessionState, SessionStatus};
use crate::store::{Store, UserCommit};
use crate::toast::Toast;

/// The shared in-flight resolution, if any, and the epoch it started under.
#[derive(Default)]
pub(crate) struct Flight {
    done: Option<watch::Receiver<bool>>,
    epoch: u64,
}

impl Store {
    /// Resolve the session user.
    ///
    /// Returns once the resolution this call joined has finished, whether
    /// it succeeded or not. Failures are reported as toasts and leave the
    /// latch open; the dependent fetches it triggers are not awaited.
    pub async fn fetch_user(&self) {
        let mut done = self.join_or_start();
        // Err only if the store was torn down mid-flight.
        let _ = done.wait_for(|finished| *finished).await;
    }

    fn join_or_start(&self) -> watch::Receiver<bool> {
        let mut flight = self.flight();
        let epoch = self.epoch();
        if let Some(done) = &flight.done {
            // A flight from before a reset resolves for a session that no
            // longer exists, so it is never joined.
            if flight.epoch == epoch {
                debug!("joining in-flight session resolution");
                return done.clone();
            }
            debug!("in-flight resolution predates a reset; starting another");
        }

        let (tx, rx) = watch::channel(false);
        flight.done = Some(rx.clone());
        flight.epoch = epoch;
        drop(flight);

        self.inner.state.update::<SessionState, _>(|s| {
            if s.status == SessionStatus::Unresolved {
                s.status = SessionStatus::Resolving;
            }
        });

        let store = self.clone();
        self.inner.tasks.spawn(async move {
            store.resolve_user(epoch).await;
            {
                let mut flight = store.flight();
                if flight.epoch == epoch {
                    flight.done = None;
                }
            }
            let _ = tx.send(true);
        });
        rx
    }

    async fn resolve_user(&self, epoch: u64) {
        let request = ApiRequest::get(self.endpoints().api("me/"));
        debug!(path = %request.path, "resolving session user");

        match self.inner.gateway.fetch::<User>(request).await {
            Ok(user) => {
                let signed_in = user.is_authenticated();
                let user_id = user.id;
                match self.commit_user(user, Some(epoch)) {
                    UserCommit::Stale => {
                        debug!("session was reset while resolving; dropping user");
                    }
                    UserCommit::Opened if signed_in => {
                        info!(user_id, "session resolved, loading user data");
                        self.fan_out();
                    }
                    _ => debug!(user_id, signed_in, "session user refreshed"),
                }
            }
            Err(err) => {
                let text = match err.status() {
                    Some(code) => format!("Error {} when fetching User details.", code),
                    None => format!("Error {} when fetching current User.", err),
                };
                warn!(error = %err, "session resolution failed");
                self.inner.toasts.notify(Toast::danger(text));
                self.inner.state.try_update::<SessionState, _>(|s| {
                    if self.epoch() != epoch || s.status != SessionStatus::Resolving {
                        return false;
                    }
                    s.status = SessionStatus::Unresolved;
                    true
                });
            }
        }
    }

    /// Spawn the session-dependent fetches. Not awaited.
    fn fan_out(&self) {
        let store = self.clone();
        self.inner
            .tasks
            .spawn(async move { store.fetch_characters().await });
        let store = self.clone();
        self.inner
            .tasks
            .spawn(async move { store.fetch_notifications().await });
        let store = self.clone();
        self.inner.tasks.spawn(async move { store.fetch_teams().await });
    }

    /// End the backend session, then clear everything tied to it.
    ///
    /// On failure the local session is left as it was.
    pub async fn logout(&self) {
        let request = ApiRequest::get(self.endpoints().logout_path.clone());
        if let Err(err) = self.inner.gateway.execute(request).await {
            warn!(error = %err, "logout failed");
            self.inner
                .toasts
                .notify(Toast::danger(format!("Error {} when logging out.", err)));
            return;
        }
        self.reset_user();
        self.set_characters(Vec::new());
        self.set_notifications(Vec::new());
        self.set_teams(Vec::new());
        info!("logged out");
    }
}
