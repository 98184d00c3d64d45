//! Recording platform fake and context builder for unit tests.

use crate::config::Config;
use crate::context::AppContext;
use crate::platform::{Platform, PlatformError, TextMode};
use reftrack_ledger::Ledger;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use teloxide::{ApiError, RequestError};

pub const CHANNEL_ID: i64 = -1001234;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub chat_id: i64,
    pub text: String,
    pub mode: TextMode,
}

#[derive(Default)]
pub struct FakePlatform {
    pub sent: Mutex<Vec<SentMessage>>,
    pub links: Mutex<Vec<(i64, String, bool)>>,
    pub fail_links: AtomicBool,
    pub fail_sends: AtomicBool,
}

impl FakePlatform {
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn links(&self) -> Vec<(i64, String, bool)> {
        self.links.lock().unwrap().clone()
    }
}

fn blocked() -> PlatformError {
    PlatformError::Request(RequestError::Api(ApiError::BotBlocked))
}

impl Platform for FakePlatform {
    async fn create_invite_link(
        &self,
        chat_id: i64,
        name: String,
        creates_join_request: bool,
    ) -> Result<String, PlatformError> {
        if self.fail_links.load(Ordering::SeqCst) {
            return Err(blocked());
        }
        let url = format!("https://t.me/+{}", name);
        self.links
            .lock()
            .unwrap()
            .push((chat_id, name, creates_join_request));
        Ok(url)
    }

    async fn send_message(
        &self,
        chat_id: i64,
        text: String,
        mode: TextMode,
    ) -> Result<(), PlatformError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(blocked());
        }
        self.sent
            .lock()
            .unwrap()
            .push(SentMessage { chat_id, text, mode });
        Ok(())
    }

    async fn delete_webhook(&self) -> Result<(), PlatformError> {
        Ok(())
    }
}

pub fn config(dir: &TempDir) -> Config {
    Config {
        bot_token: "test-token".to_string(),
        channel_id: CHANNEL_ID,
        admin_ids: Vec::new(),
        db_path: dir.path().join("ledger"),
        admin_socket: dir.path().join("admin.sock"),
    }
}

/// A context over a fresh ledger; keep the `TempDir` alive for the test.
pub fn context() -> (TempDir, AppContext<FakePlatform>) {
    let dir = tempfile::tempdir().unwrap();
    let config = config(&dir);
    let ledger = Arc::new(Ledger::open(&config.db_path).unwrap());
    let ctx = AppContext::new(config, ledger, FakePlatform::default());
    (dir, ctx)
}

/// Platform JSON for a user.
pub fn user_json(id: u64, first_name: &str) -> Value {
    json!({ "id": id, "is_bot": false, "first_name": first_name })
}

/// Platform JSON for a chat member with a status that carries no extra fields.
pub fn member_json(status: &str) -> Value {
    json!({ "user": user_json(777, "Ann"), "status": status })
}

pub fn kicked_json() -> Value {
    json!({ "user": user_json(777, "Ann"), "status": "kicked", "until_date": 0 })
}

pub fn restricted_json() -> Value {
    json!({
        "user": user_json(777, "Ann"),
        "status": "restricted",
        "until_date": 0,
        "is_member": true,
        "can_send_messages": false,
        "can_send_media_messages": false,
        "can_send_audios": false,
        "can_send_documents": false,
        "can_send_photos": false,
        "can_send_videos": false,
        "can_send_video_notes": false,
        "can_send_voice_notes": false,
        "can_send_polls": false,
        "can_send_other_messages": false,
        "can_add_web_page_previews": false,
        "can_change_info": false,
        "can_invite_users": false,
        "can_pin_messages": false,
        "can_manage_topics": false
    })
}

/// Platform JSON for an invite link, named or not.
pub fn invite_link_json(name: Option<&str>) -> Value {
    let mut link = json!({
        "invite_link": "https://t.me/+AbCdEf",
        "creator": { "id": 1, "is_bot": true, "first_name": "refbot", "username": "refbot" },
        "creates_join_request": false,
        "is_primary": false,
        "is_revoked": false
    });
    if let Some(name) = name {
        link["name"] = json!(name);
    }
    link
}

/// Platform JSON for a `chat_member` update body.
pub fn chat_member_json(chat_id: i64, old: Value, new: Value, invite_link: Option<Value>) -> Value {
    let mut update = json!({
        "chat": { "id": chat_id, "type": "channel", "title": "Referral channel" },
        "from": user_json(777, "Ann"),
        "date": 1_700_000_000,
        "old_chat_member": old,
        "new_chat_member": new,
        "via_join_request": false,
        "via_chat_folder_invite_link": false
    });
    if let Some(link) = invite_link {
        update["invite_link"] = link;
    }
    update
}

/// Platform JSON for a text message from user 42.
pub fn message_json(chat: Value, text: &str) -> Value {
    json!({
        "message_id": 1,
        "date": 1_700_000_000,
        "chat": chat,
        "from": user_json(42, "Ann"),
        "text": text
    })
}

pub fn private_chat_json(id: i64) -> Value {
    json!({ "id": id, "type": "private", "first_name": "Ann" })
}

pub fn group_chat_json(id: i64) -> Value {
    json!({ "id": id, "type": "group", "title": "Chatter" })
}
