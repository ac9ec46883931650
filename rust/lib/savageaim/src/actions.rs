//! Remote actions: one fetch per collection plus the write flows.
//!
//! A fetch either replaces its collection wholesale or leaves it alone.
//! Access denied (403) is expected for anonymous sessions and is not shown
//! to the user; every other failure becomes one toast naming the status.
//! A per-user collection that arrives after a session reset is dropped.

use savageaim_client::{ApiError, ApiRequest};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::WriteError;
use crate::model::{BisListModify, Character, Gear, ItemLevels, Job, Notification, SettingsUpdate, Team, Tier};
use crate::state::{Characters, Notifications, Teams};
use crate::store::Store;
use crate::toast::Toast;

#[derive(Deserialize)]
struct Created {
    id: u64,
}

impl Store {
    // ========================================================================
    // Collection fetches
    // ========================================================================

    pub async fn fetch_characters(&self) {
        let epoch = self.epoch();
        let request = ApiRequest::get(self.endpoints().api("character/"));
        if let Some(characters) = self.load::<Vec<Character>>(request, "Characters").await {
            self.commit_session(epoch, Characters(characters));
        }
    }

    pub async fn fetch_gear(&self) {
        let request = ApiRequest::get(self.endpoints().api("gear/"));
        if let Some(gear) = self.load::<Vec<Gear>>(request, "Gear list").await {
            self.set_gear(gear);
        }
    }

    pub async fn fetch_item_levels(&self) {
        let request = ApiRequest::get(self.endpoints().api("gear/item_levels/"));
        if let Some(levels) = self.load::<ItemLevels>(request, "Item Levels").await {
            self.set_min_item_level(levels.min);
            self.set_max_item_level(levels.max);
        }
    }

    pub async fn fetch_jobs(&self) {
        let request = ApiRequest::get(self.endpoints().api("job/"));
        if let Some(jobs) = self.load::<Vec<Job>>(request, "Jobs list").await {
            self.set_jobs(jobs);
        }
    }

    /// Fetch the latest notifications, up to the configured window size.
    pub async fn fetch_notifications(&self) {
        let epoch = self.epoch();
        let request = ApiRequest::get(self.endpoints().api("notifications/"))
            .query("limit", self.endpoints().notification_limit);
        if let Some(notifications) = self
            .load::<Vec<Notification>>(request, "Notifications list")
            .await
        {
            self.commit_session(epoch, Notifications(notifications));
        }
    }

    pub async fn fetch_teams(&self) {
        let epoch = self.epoch();
        let request = ApiRequest::get(self.endpoints().api("team/"));
        if let Some(teams) = self.load::<Vec<Team>>(request, "Teams").await {
            self.commit_session(epoch, Teams(teams));
        }
    }

    pub async fn fetch_tiers(&self) {
        let request = ApiRequest::get(self.endpoints().api("tier/"));
        if let Some(tiers) = self.load::<Vec<Tier>>(request, "Tiers list").await {
            self.set_tiers(tiers);
        }
    }

    /// Fetch every reference catalog concurrently.
    pub async fn load_catalogs(&self) {
        tokio::join!(
            self.fetch_gear(),
            self.fetch_item_levels(),
            self.fetch_jobs(),
            self.fetch_tiers(),
        );
    }

    async fn load<T: DeserializeOwned>(&self, request: ApiRequest, label: &str) -> Option<T> {
        debug!(resource = label, path = %request.path, "fetching");
        match self.inner.gateway.fetch::<T>(request).await {
            Ok(value) => Some(value),
            Err(err) if err.is_forbidden() => {
                debug!(resource = label, "access denied; leaving state unchanged");
                None
            }
            Err(err) => {
                self.report(&format!("fetching {}", label), &err);
                None
            }
        }
    }

    /// Show one toast for a failed request.
    fn report(&self, doing: &str, err: &ApiError) {
        let text = match err.status() {
            Some(code) => format!("Error {} when {}.", code, doing),
            None => format!("Error {} when {}.", err, doing),
        };
        warn!(error = %err, "{}", text);
        self.inner.toasts.notify(Toast::danger(text));
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Save user settings, then refresh the session user.
    ///
    /// Validation failures come back as [`WriteError::Invalid`] for the form
    /// to display; nothing is toasted for them.
    pub async fn update_settings(&self, update: &SettingsUpdate) -> Result<(), WriteError> {
        let request = ApiRequest::put(self.endpoints().api("me/")).json(update)?;
        self.write(request, "updating Settings").await?;
        info!("settings saved");
        self.fetch_user().await;
        Ok(())
    }

    /// Create or update a BIS list for one of the user's characters.
    ///
    /// The payload is checked against the loaded catalogs before it is sent.
    /// On success the characters and teams holding the list are re-fetched.
    /// Returns the list's id.
    pub async fn save_bis_list(&self, character_id: u64, list: &BisListModify) -> Result<u64, WriteError> {
        let list = list
            .validate(&self.gear().0, &self.jobs().0)
            .map_err(WriteError::Invalid)?;

        let id = match list.id {
            Some(id) => {
                let path = format!("character/{}/bis_lists/{}/", character_id, id);
                let request = ApiRequest::put(self.endpoints().api(&path)).json(&list)?;
                self.write(request, "updating BIS List").await?;
                id
            }
            None => {
                let path = format!("character/{}/bis_lists/", character_id);
                let request = ApiRequest::post(self.endpoints().api(&path)).json(&list)?;
                let created: Created = self
                    .inner
                    .gateway
                    .fetch(request)
                    .await
                    .map_err(|e| self.write_failed("creating BIS List", e))?;
                created.id
            }
        };
        info!(character_id, bis_list_id = id, "bis list saved");
        tokio::join!(self.fetch_characters(), self.fetch_teams());
        Ok(id)
    }

    /// Mark every notification read, then refresh the window.
    pub async fn mark_notifications_read(&self) {
        let request = ApiRequest::post(self.endpoints().api("notifications/"));
        if self.write(request, "marking Notifications as read").await.is_ok() {
            self.fetch_notifications().await;
        }
    }

    pub async fn mark_notification_read(&self, id: u64) {
        let path = format!("notifications/{}/", id);
        let request = ApiRequest::post(self.endpoints().api(&path));
        if self.write(request, "marking Notification as read").await.is_ok() {
            self.fetch_notifications().await;
        }
    }

    async fn write(&self, request: ApiRequest, doing: &str) -> Result<(), WriteError> {
        debug!(method = %request.method, path = %request.path, "writing");
        self.inner
            .gateway
            .execute(request)
            .await
            .map_err(|e| self.write_failed(doing, e))
    }

    /// Field errors go back to the caller; anything else is also toasted.
    fn write_failed(&self, doing: &str, err: ApiError) -> WriteError {
        let err = WriteError::from(err);
        if let WriteError::Api(api) = &err {
            self.report(doing, api);
        }
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use savageaim_client::Method;
    use serde_json::json;

    use crate::model::Slot;
    use crate::testing::{harness, toasts, user_json, ME};
    use crate::toast::Severity;

    fn gear_json() -> serde_json::Value {
        json!([
            {"id": 1, "name": "Radiant's", "item_level": 660,
             "has_accessories": true, "has_armour": true, "has_weapon": false},
            {"id": 2, "name": "Asphodelos", "item_level": 605,
             "has_accessories": true, "has_armour": true, "has_weapon": true},
        ])
    }

    // ========================================================================
    // Fetch policy
    // ========================================================================

    #[tokio::test]
    async fn forbidden_is_suppressed() {
        let (store, gw, mut rx) = harness();
        store.set_teams(vec![Team {
            id: "keep".into(),
            ..Default::default()
        }]);
        gw.reply(Method::GET, "/backend/api/team/", 403, json!({}));
        gw.reply(Method::GET, "/backend/api/character/", 403, json!({}));

        store.fetch_teams().await;
        store.fetch_characters().await;

        assert!(toasts(&mut rx).is_empty());
        assert_eq!(store.teams().0[0].id, "keep");
    }

    #[tokio::test]
    async fn server_error_is_reported_once_with_code() {
        let (store, gw, mut rx) = harness();
        store.set_tiers(vec![Tier {
            id: 1,
            name: "Asphodelos".into(),
            ..Default::default()
        }]);
        gw.reply(Method::GET, "/backend/api/tier/", 500, json!({}));

        store.fetch_tiers().await;

        let shown = toasts(&mut rx);
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].text, "Error 500 when fetching Tiers list.");
        assert_eq!(shown[0].severity, Severity::Danger);
        assert_eq!(store.tiers().0.len(), 1);
    }

    #[tokio::test]
    async fn decode_failure_is_reported_and_state_kept() {
        let (store, gw, mut rx) = harness();
        gw.reply(Method::GET, "/backend/api/job/", 200, json!({"not": "a list"}));
        store.fetch_jobs().await;
        assert_eq!(toasts(&mut rx).len(), 1);
        assert!(store.jobs().0.is_empty());
    }

    #[tokio::test]
    async fn empty_array_replaces_collection() {
        let (store, gw, mut rx) = harness();
        store.set_gear(vec![Gear::default()]);
        gw.reply(Method::GET, "/backend/api/gear/", 200, json!([]));
        store.fetch_gear().await;
        assert!(store.gear().0.is_empty());
        assert!(toasts(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn notifications_are_windowed() {
        let (store, gw, _rx) = harness();
        gw.reply(
            Method::GET,
            "/backend/api/notifications/",
            200,
            json!([
                {"id": 2, "link": "/team/abc/", "read": false, "text": "joined",
                 "timestamp": "2022-12-17T10:00:00.000000Z", "type": "team_join", "user": 7},
                {"id": 1, "link": "/characters/1/", "read": true, "text": "verified",
                 "timestamp": "2022-12-16T10:00:00Z", "type": "verify_success", "user": 7},
            ]),
        );
        store.fetch_notifications().await;

        let sent = gw.requests(Method::GET, "/backend/api/notifications/");
        assert_eq!(sent[0].query, vec![("limit".to_string(), "20".to_string())]);
        assert_eq!(store.notifications().0.len(), 2);
        assert_eq!(store.unread_notification_count(), 1);
    }

    #[tokio::test]
    async fn catalogs_load_together() {
        let (store, gw, mut rx) = harness();
        gw.reply(Method::GET, "/backend/api/gear/", 200, gear_json());
        gw.reply(Method::GET, "/backend/api/gear/item_levels/", 200, json!({"min": 580, "max": 665}));
        gw.reply(
            Method::GET,
            "/backend/api/job/",
            200,
            json!([{"id": "PLD", "display_name": "Paladin", "name": "paladin", "role": "tank"}]),
        );
        gw.reply(
            Method::GET,
            "/backend/api/tier/",
            200,
            json!([{"id": 2, "name": "Abyssos", "max_item_level": 665,
                    "raid_gear_name": "Abyssos", "tome_gear_name": "Lunar Envoy"}]),
        );

        store.load_catalogs().await;

        assert_eq!(store.gear().0.len(), 2);
        assert_eq!(store.item_levels().min, 580);
        assert_eq!(store.item_levels().max, 665);
        assert_eq!(store.jobs().0[0].id, "PLD");
        assert_eq!(store.tiers().current().unwrap().name, "Abyssos");
        assert!(toasts(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn completions_are_independent() {
        let (store, gw, mut rx) = harness();
        gw.reply(Method::GET, "/backend/api/gear/", 200, gear_json());
        gw.delay(Method::GET, "/backend/api/gear/", Duration::from_millis(30));
        gw.reply(Method::GET, "/backend/api/job/", 500, json!({}));

        tokio::join!(store.fetch_gear(), store.fetch_jobs());

        assert_eq!(store.gear().0.len(), 2);
        assert_eq!(toasts(&mut rx).len(), 1);
    }

    #[tokio::test]
    async fn session_fetch_superseded_by_reset_is_dropped() {
        let (store, gw, _rx) = harness();
        gw.reply(
            Method::GET,
            "/backend/api/team/",
            200,
            json!([{"id": "abc", "name": "Static", "members": [],
                    "tier": {"id": 1, "name": "T", "max_item_level": 600}}]),
        );
        gw.delay(Method::GET, "/backend/api/team/", Duration::from_millis(30));
        gw.reply(Method::GET, "/backend/api/gear/", 200, gear_json());
        gw.delay(Method::GET, "/backend/api/gear/", Duration::from_millis(30));

        let pending = tokio::spawn({
            let store = store.clone();
            async move { tokio::join!(store.fetch_teams(), store.fetch_gear()) }
        });
        tokio::time::sleep(Duration::from_millis(5)).await;
        store.reset_user();
        pending.await.unwrap();

        assert!(store.teams().0.is_empty());
        assert_eq!(store.gear().0.len(), 2);
    }

    // ========================================================================
    // Writes
    // ========================================================================

    #[tokio::test]
    async fn settings_update_revalidates_without_fan_out() {
        let (store, gw, _rx) = harness();
        gw.reply(Method::GET, ME, 200, user_json(Some(7)));
        gw.reply(Method::GET, "/backend/api/character/", 200, json!([]));
        gw.reply(Method::GET, "/backend/api/notifications/", 200, json!([]));
        gw.reply(Method::GET, "/backend/api/team/", 200, json!([]));
        store.fetch_user().await;
        store.settle().await;

        gw.reply(Method::PUT, ME, 200, json!({}));
        let mut fresh = user_json(Some(7));
        fresh["theme"] = json!("traffic");
        gw.reply(Method::GET, ME, 200, fresh);

        let update = SettingsUpdate {
            theme: Some("traffic".into()),
            ..Default::default()
        };
        store.update_settings(&update).await.unwrap();
        store.settle().await;

        assert_eq!(store.user().theme, "traffic");
        assert_eq!(gw.calls(Method::GET, ME), 2);
        assert_eq!(gw.calls(Method::GET, "/backend/api/team/"), 1);
        let sent = gw.requests(Method::PUT, ME);
        assert_eq!(sent[0].body, Some(json!({"theme": "traffic"})));
    }

    #[tokio::test]
    async fn settings_validation_errors_are_returned_not_toasted() {
        let (store, gw, mut rx) = harness();
        gw.reply(Method::PUT, ME, 400, json!({"theme": ["\"pink\" is not a valid choice."]}));

        let update = SettingsUpdate {
            theme: Some("pink".into()),
            ..Default::default()
        };
        let err = store.update_settings(&update).await.unwrap_err();
        match err {
            WriteError::Invalid(fields) => assert_eq!(fields.get("theme").len(), 1),
            other => panic!("unexpected error: {other}"),
        }
        assert!(toasts(&mut rx).is_empty());
        assert_eq!(gw.calls(Method::GET, ME), 0);
    }

    #[tokio::test]
    async fn new_bis_list_is_created_then_refetched() {
        let (store, gw, mut rx) = harness();
        gw.reply(Method::GET, "/backend/api/gear/", 200, gear_json());
        gw.reply(
            Method::GET,
            "/backend/api/job/",
            200,
            json!([{"id": "WHM", "display_name": "White Mage", "name": "whitemage", "role": "heal"}]),
        );
        store.load_catalogs().await;
        toasts(&mut rx);

        gw.reply(Method::POST, "/backend/api/character/3/bis_lists/", 201, json!({"id": 41}));
        gw.reply(Method::GET, "/backend/api/character/", 200, json!([]));
        gw.reply(Method::GET, "/backend/api/team/", 200, json!([]));

        let list = BisListModify {
            id: None,
            job_id: "WHM".into(),
            bis: Slot::ALL.into_iter().map(|s| (s, 2)).collect(),
            current: Slot::ALL.into_iter().map(|s| (s, 2)).collect(),
            external_link: None,
            name: String::new(),
        };
        let id = store.save_bis_list(3, &list).await.unwrap();

        assert_eq!(id, 41);
        assert_eq!(gw.calls(Method::GET, "/backend/api/character/"), 1);
        assert_eq!(gw.calls(Method::GET, "/backend/api/team/"), 1);
        let sent = gw.requests(Method::POST, "/backend/api/character/3/bis_lists/");
        let body = sent[0].body.as_ref().unwrap();
        assert_eq!(body["bis_head_id"], 2);
        assert_eq!(body["job_id"], "WHM");
        assert!(toasts(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn invalid_bis_list_is_not_sent() {
        let (store, gw, _rx) = harness();
        store.set_gear(serde_json::from_value(gear_json()).unwrap());

        let list = BisListModify {
            id: Some(5),
            job_id: "WHM".into(),
            ..Default::default()
        };
        let err = store.save_bis_list(3, &list).await.unwrap_err();
        let WriteError::Invalid(fields) = err else {
            panic!("expected field errors");
        };
        assert!(!fields.get("job_id").is_empty());
        assert!(!fields.get("bis_body_id").is_empty());
        assert_eq!(gw.calls(Method::PUT, "/backend/api/character/3/bis_lists/5/"), 0);
    }

    #[tokio::test]
    async fn mark_read_refreshes_window() {
        let (store, gw, mut rx) = harness();
        gw.reply(Method::POST, "/backend/api/notifications/", 200, json!({}));
        gw.reply(Method::POST, "/backend/api/notifications/9/", 200, json!({}));
        gw.reply(Method::GET, "/backend/api/notifications/", 200, json!([]));

        store.mark_notifications_read().await;
        store.mark_notification_read(9).await;

        assert_eq!(gw.calls(Method::POST, "/backend/api/notifications/"), 1);
        assert_eq!(gw.calls(Method::POST, "/backend/api/notifications/9/"), 1);
        assert_eq!(gw.calls(Method::GET, "/backend/api/notifications/"), 2);
        assert!(toasts(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn failed_mark_read_is_reported_and_skips_refresh() {
        let (store, gw, mut rx) = harness();
        gw.reply(Method::POST, "/backend/api/notifications/9/", 404, json!({}));

        store.mark_notification_read(9).await;

        let shown = toasts(&mut rx);
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].text, "Error 404 when marking Notification as read.");
        assert_eq!(gw.calls(Method::GET, "/backend/api/notifications/"), 0);
    }
}
