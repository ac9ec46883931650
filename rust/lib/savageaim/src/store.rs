//! The state container.
//!
//! [`Store`] is a cheap handle around one long-lived container. It owns the
//! gateway, the toast sink, every state value and the background tasks
//! spawned by its actions. Views hold clones and read through it.
//!
//! State only changes through the mutations in this file. Each one is a
//! whole-value replacement at a single path, so subscribers always observe
//! a consistent value.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use savageaim_client::{ApiError, Gateway};
use savageaim_flux::{PatternError, State, StateStore, StateValue, SubscriptionId, TaskSet};
use tracing::debug;

use crate::config::{ClientConfig, Endpoints};
use crate::model::{Character, Gear, Job, Notification, Team, Tier, User};
use crate::permissions::TeamAccess;
use crate::session::Flight;
use crate::state::{
    Characters, GearCatalog, ItemLevelBounds, JobCatalog, Notifications, SessionState,
    SessionStatus, Teams, TierCatalog,
};
use crate::toast::ToastSink;

#[derive(Clone)]
pub struct Store {
    pub(crate) inner: Arc<Inner>,
}

pub(crate) struct Inner {
    pub(crate) state: StateStore,
    pub(crate) gateway: Arc<dyn Gateway>,
    pub(crate) toasts: Arc<dyn ToastSink>,
    pub(crate) endpoints: Endpoints,
    pub(crate) tasks: TaskSet,
    /// In-flight `me/` resolution, shared by concurrent callers.
    pub(crate) flight: Mutex<Flight>,
    /// Bumped on every reset; results fetched under an older epoch are dropped.
    pub(crate) epoch: AtomicU64,
}

impl Store {
    pub fn new(gateway: Arc<dyn Gateway>, toasts: Arc<dyn ToastSink>, endpoints: Endpoints) -> Self {
        let state = StateStore::new();
        state.set(SessionState::default());
        state.set(Characters::default());
        state.set(Teams::default());
        state.set(Notifications::default());
        state.set(GearCatalog::default());
        state.set(JobCatalog::default());
        state.set(TierCatalog::default());
        state.set(ItemLevelBounds::default());

        Self {
            inner: Arc::new(Inner {
                state,
                gateway,
                toasts,
                endpoints,
                tasks: TaskSet::new(),
                flight: Mutex::new(Flight::default()),
                epoch: AtomicU64::new(0),
            }),
        }
    }

    /// Store talking HTTP to the server named in `config`.
    pub fn from_config(config: &ClientConfig, toasts: Arc<dyn ToastSink>) -> Result<Self, ApiError> {
        let gateway = Arc::new(config.gateway()?);
        Ok(Self::new(gateway, toasts, config.endpoints()))
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.inner.endpoints
    }

    /// Wait until every background task spawned by this store has finished.
    pub async fn settle(&self) {
        self.inner.tasks.wait_idle().await;
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.inner.epoch.load(Ordering::SeqCst)
    }

    pub(crate) fn next_epoch(&self) {
        self.inner.epoch.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn flight(&self) -> MutexGuard<'_, Flight> {
        self.inner.flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub fn get<T: State + Default>(&self) -> Arc<T> {
        self.inner.state.get_or_default::<T>()
    }

    pub fn session(&self) -> Arc<SessionState> {
        self.get()
    }

    pub fn user(&self) -> User {
        self.session().user.clone()
    }

    pub fn user_loaded(&self) -> bool {
        self.session().user_loaded()
    }

    pub fn status(&self) -> SessionStatus {
        self.session().status
    }

    pub fn characters(&self) -> Arc<Characters> {
        self.get()
    }

    pub fn teams(&self) -> Arc<Teams> {
        self.get()
    }

    pub fn notifications(&self) -> Arc<Notifications> {
        self.get()
    }

    pub fn gear(&self) -> Arc<GearCatalog> {
        self.get()
    }

    pub fn jobs(&self) -> Arc<JobCatalog> {
        self.get()
    }

    pub fn tiers(&self) -> Arc<TierCatalog> {
        self.get()
    }

    pub fn item_levels(&self) -> ItemLevelBounds {
        *self.get::<ItemLevelBounds>()
    }

    pub fn team(&self, id: &str) -> Option<Team> {
        self.teams().find(id).cloned()
    }

    /// What the session user may do in a team, derived from current state.
    pub fn team_access(&self, id: &str) -> Option<TeamAccess> {
        let teams = self.teams();
        let team = teams.find(id)?;
        Some(TeamAccess::derive(team, self.session().user.id))
    }

    pub fn unread_notification_count(&self) -> usize {
        self.notifications().unread()
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    /// Observe changes to every path matching `pattern` (`+` and `#` allowed).
    pub fn subscribe<F>(&self, pattern: &str, handler: F) -> Result<SubscriptionId, PatternError>
    where
        F: Fn(&str, &StateValue) + Send + Sync + 'static,
    {
        self.inner.state.subscribe(pattern, handler)
    }

    /// Observe one state type.
    pub fn watch<T, F>(&self, handler: F) -> SubscriptionId
    where
        T: State,
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.inner.state.watch::<T, F>(handler)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.state.unsubscribe(id);
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    pub fn set_characters(&self, characters: Vec<Character>) {
        debug!(count = characters.len(), "characters committed");
        self.inner.state.set(Characters(characters));
    }

    pub fn set_gear(&self, gear: Vec<Gear>) {
        debug!(count = gear.len(), "gear committed");
        self.inner.state.set(GearCatalog(gear));
    }

    pub fn set_jobs(&self, jobs: Vec<Job>) {
        debug!(count = jobs.len(), "jobs committed");
        self.inner.state.set(JobCatalog(jobs));
    }

    pub fn set_max_item_level(&self, max: u32) {
        self.inner.state.update::<ItemLevelBounds, _>(|b| b.max = max);
    }

    pub fn set_min_item_level(&self, min: u32) {
        self.inner.state.update::<ItemLevelBounds, _>(|b| b.min = min);
    }

    pub fn set_notifications(&self, notifications: Vec<Notification>) {
        debug!(count = notifications.len(), "notifications committed");
        self.inner.state.set(Notifications(notifications));
    }

    pub fn set_teams(&self, teams: Vec<Team>) {
        debug!(count = teams.len(), "teams committed");
        self.inner.state.set(Teams(teams));
    }

    /// Change the theme locally, e.g. to preview it before saving.
    pub fn set_theme(&self, theme: impl Into<String>) {
        let theme = theme.into();
        self.inner.state.update::<SessionState, _>(|s| s.user.theme = theme);
    }

    pub fn set_tiers(&self, tiers: Vec<Tier>) {
        debug!(count = tiers.len(), "tiers committed");
        self.inner.state.set(TierCatalog(tiers));
    }

    /// Commit a resolved user and close the latch.
    pub fn set_user(&self, user: User) {
        self.commit_user(user, None);
    }

    /// Commit a resolved user.
    ///
    /// With `Some(epoch)` the user is only stored if no reset happened
    /// since that epoch. The check, the latch read and the write all happen
    /// under the state write lock, as does the epoch bump in `reset_user`.
    pub(crate) fn commit_user(&self, user: User, epoch: Option<u64>) -> UserCommit {
        let mut outcome = UserCommit::Stale;
        self.inner.state.try_update::<SessionState, _>(|s| {
            if epoch.is_some_and(|e| e != self.epoch()) {
                return false;
            }
            outcome = if s.status == SessionStatus::Resolved {
                UserCommit::Refreshed
            } else {
                UserCommit::Opened
            };
            s.user = user;
            s.status = SessionStatus::Resolved;
            true
        });
        debug!(?outcome, "user committed");
        outcome
    }

    /// Replace a per-user collection fetched under `epoch`.
    ///
    /// Dropped if the session was reset since. Returns whether it was stored.
    pub(crate) fn commit_session<T: State>(&self, epoch: u64, value: T) -> bool {
        let stored = self.inner.state.set_if(value, || self.epoch() == epoch);
        if stored {
            debug!(path = T::PATH, "session collection committed");
        } else {
            debug!(path = T::PATH, "session was reset while fetching; dropping result");
        }
        stored
    }

    /// Back to the anonymous user with the latch open.
    ///
    /// Results of requests issued before the reset are dropped on arrival.
    pub fn reset_user(&self) {
        self.inner.state.update::<SessionState, _>(|s| {
            self.next_epoch();
            *s = SessionState::default();
        });
        debug!("session reset");
    }
}

/// What a user commit did to the latch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UserCommit {
    /// A reset happened first; nothing was stored.
    Stale,
    /// The latch was open and is now closed.
    Opened,
    /// The latch was already closed; only the user changed.
    Refreshed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    use crate::model::{MemberPermissions, TeamMember};
    use crate::testing::{character, harness, notification};

    // ========================================================================
    // Construction
    // ========================================================================

    #[tokio::test]
    async fn collections_start_empty() {
        let (store, _gw, _toasts) = harness();
        assert!(store.characters().0.is_empty());
        assert!(store.teams().0.is_empty());
        assert!(store.notifications().0.is_empty());
        assert!(store.gear().0.is_empty());
        assert_eq!(store.item_levels(), ItemLevelBounds::default());
        assert_eq!(store.status(), SessionStatus::Unresolved);
        assert!(!store.user_loaded());
        assert_eq!(store.user(), User::anonymous());
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    #[tokio::test]
    async fn replace_is_idempotent() {
        let (store, _gw, _toasts) = harness();
        let chars = vec![character(1, 7, true), character(2, 7, false)];
        store.set_characters(chars.clone());
        let once = store.characters();
        store.set_characters(chars.clone());
        assert_eq!(*store.characters(), *once);
        assert_eq!(store.characters().0, chars);
    }

    #[tokio::test]
    async fn replace_never_merges() {
        let (store, _gw, _toasts) = harness();
        store.set_notifications(vec![notification(1, false), notification(2, false)]);
        store.set_notifications(vec![notification(3, true)]);
        let ids: Vec<u64> = store.notifications().0.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![3]);
        assert_eq!(store.unread_notification_count(), 0);
    }

    #[tokio::test]
    async fn item_level_bounds_are_set_independently() {
        let (store, _gw, _toasts) = harness();
        store.set_min_item_level(580);
        store.set_max_item_level(665);
        store.set_min_item_level(590);
        assert_eq!(store.item_levels(), ItemLevelBounds { min: 590, max: 665 });
    }

    #[tokio::test]
    async fn set_user_closes_latch_and_reset_reopens_it() {
        let (store, _gw, _toasts) = harness();
        let user = User {
            id: Some(7),
            username: "aria".into(),
            ..User::anonymous()
        };
        store.set_user(user.clone());
        assert!(store.user_loaded());
        assert_eq!(store.user(), user);

        store.set_theme("traffic");
        assert_eq!(store.user().theme, "traffic");
        assert!(store.user_loaded());

        store.reset_user();
        assert!(!store.user_loaded());
        assert_eq!(store.user(), User::anonymous());
    }

    #[tokio::test]
    async fn commit_reports_latch_only_once() {
        let (store, _gw, _toasts) = harness();
        assert_eq!(store.commit_user(User::anonymous(), None), UserCommit::Opened);
        assert_eq!(store.commit_user(User::anonymous(), None), UserCommit::Refreshed);
        store.reset_user();
        assert_eq!(store.commit_user(User::anonymous(), None), UserCommit::Opened);
    }

    #[tokio::test]
    async fn commit_under_an_old_epoch_is_dropped() {
        let (store, _gw, _toasts) = harness();
        let before = store.epoch();
        store.reset_user();

        let user = User {
            id: Some(7),
            ..User::anonymous()
        };
        assert_eq!(store.commit_user(user.clone(), Some(before)), UserCommit::Stale);
        assert!(!store.user_loaded());
        assert_eq!(store.user(), User::anonymous());

        assert_eq!(store.commit_user(user, Some(store.epoch())), UserCommit::Opened);
        assert!(store.user_loaded());
    }

    #[tokio::test]
    async fn session_collection_from_an_old_epoch_is_dropped() {
        let (store, _gw, _toasts) = harness();
        let before = store.epoch();
        assert!(store.commit_session(before, Characters(vec![character(1, 7, true)])));
        assert_eq!(store.characters().0.len(), 1);

        store.reset_user();
        assert!(!store.commit_session(before, Characters(vec![character(2, 7, true)])));
        assert_eq!(store.characters().0[0].id, 1);
    }

    #[tokio::test]
    async fn reset_racing_commits_never_leaves_a_stale_user() {
        let (store, _gw, _toasts) = harness();
        for _ in 0..50 {
            let epoch = store.epoch();
            let committer = {
                let store = store.clone();
                tokio::task::spawn_blocking(move || {
                    let user = User {
                        id: Some(7),
                        ..User::anonymous()
                    };
                    store.commit_user(user, Some(epoch))
                })
            };
            let resetter = {
                let store = store.clone();
                tokio::task::spawn_blocking(move || store.reset_user())
            };
            let outcome = committer.await.unwrap();
            resetter.await.unwrap();

            // Whichever ran first, the session ends up reset.
            assert!(!store.user_loaded(), "commit outcome {:?}", outcome);
            assert_eq!(store.user().id, None);
        }
    }

    // ========================================================================
    // Derived reads
    // ========================================================================

    #[tokio::test]
    async fn team_access_follows_session_user() {
        let (store, _gw, _toasts) = harness();
        let team = Team {
            id: "abc".into(),
            name: "Static".into(),
            members: vec![TeamMember {
                id: 1,
                character: character(10, 7, true),
                lead: true,
                permissions: MemberPermissions {
                    loot_manager: true,
                    proxy_manager: false,
                },
                ..Default::default()
            }],
            ..Default::default()
        };
        store.set_teams(vec![team]);

        let anon = store.team_access("abc").unwrap();
        assert!(!anon.lead && !anon.loot_manager);

        store.set_user(User {
            id: Some(7),
            ..User::anonymous()
        });
        let access = store.team_access("abc").unwrap();
        assert!(access.lead);
        assert!(access.loot_manager);
        assert!(!access.proxy_manager);

        assert!(store.team_access("missing").is_none());
        assert_eq!(store.team("abc").unwrap().name, "Static");
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    #[tokio::test]
    async fn subscribers_see_user_collections() {
        let (store, _gw, _toasts) = harness();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        let id = store
            .subscribe("user/+", move |_, _| {
                h.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        store.set_teams(vec![]);
        store.set_characters(vec![]);
        store.set_gear(vec![]);
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        store.unsubscribe(id);
        store.set_teams(vec![]);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn watch_receives_typed_value() {
        let (store, _gw, _toasts) = harness();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        store.watch::<SessionState, _>(move |session| {
            s.lock().unwrap().push(session.status);
        });

        store.set_user(User::anonymous());
        store.reset_user();
        assert_eq!(
            *seen.lock().unwrap(),
            vec![SessionStatus::Resolved, SessionStatus::Unresolved]
        );
    }

    #[tokio::test]
    async fn bad_pattern_is_rejected() {
        let (store, _gw, _toasts) = harness();
        assert!(store.subscribe("user/#/teams", |_, _| {}).is_err());
    }
}
