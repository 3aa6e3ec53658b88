use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use directory::{DirectoryClient, LookupError, UserDirectory, UserRecord};
use notifier::{
    resolve_recipients, DeliveryError, DirectoryRef, Messenger, NotificationService,
    PipelineError,
};
use serde_json::json;

struct FakeDirectory {
    users: HashMap<u64, UserRecord>,
    lookups: Mutex<Vec<String>>,
}

impl FakeDirectory {
    fn new(users: Vec<UserRecord>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id, u)).collect(),
            lookups: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl DirectoryClient for FakeDirectory {
    async fn get_user(&self, id: u64) -> Result<UserRecord, LookupError> {
        self.lookups.lock().unwrap().push(format!("id:{id}"));
        self.users.get(&id).cloned().ok_or_else(|| {
            LookupError::status(reqwest::StatusCode::NOT_FOUND, format!("/users/{id}"))
        })
    }

    async fn find_users(&self, username: &str) -> Result<Vec<UserRecord>, LookupError> {
        self.lookups.lock().unwrap().push(format!("username:{username}"));
        Ok(self
            .users
            .values()
            .filter(|u| u.username == username)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
struct RecordingMessenger {
    sent: Mutex<Vec<(i64, String)>>,
    failing: HashSet<i64>,
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send(&self, chat_id: i64, text: &str) -> Result<(), DeliveryError> {
        if self.failing.contains(&chat_id) {
            return Err(DeliveryError::Rejected {
                code: Some(403),
                description: "Forbidden: bot was blocked by the user".into(),
            });
        }
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }
}

fn user(id: u64, username: &str, name: &str, bio: &str) -> UserRecord {
    UserRecord {
        id,
        username: username.into(),
        name: name.into(),
        bio: bio.into(),
    }
}

fn team() -> Vec<UserRecord> {
    vec![
        user(1, "ada", "Ada Lovelace", "Telegram_ID: 1001"),
        user(2, "alan", "Alan Turing", "Telegram_ID: 1002"),
        user(3, "grace", "Grace Hopper", "no messenger"),
        // Second account of Ada pointing at the same chat.
        user(4, "ada-bot", "Ada (bot)", "Telegram_ID: 1001"),
        user(5, "linus", "Linus", "Telegram_ID: 1005"),
    ]
}

fn service(
    messenger: Arc<RecordingMessenger>,
) -> (Arc<FakeDirectory>, NotificationService) {
    let fake = Arc::new(FakeDirectory::new(team()));
    let directory = UserDirectory::new(fake.clone());
    (fake, NotificationService::new(directory, messenger))
}

fn issue_body(action: &str, assignees: Vec<u64>, description: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "object_kind": "issue",
        "user": { "id": 1, "name": "Ada Lovelace", "username": "ada" },
        "object_attributes": {
            "iid": 12,
            "title": "Fix bug",
            "author_id": 1,
            "assignee_ids": assignees,
            "updated_by_id": 2,
            "action": action,
            "description": description,
            "url": "https://gitlab.example.com/g/p/-/issues/12",
            "labels": []
        }
    }))
    .unwrap()
}

#[tokio::test]
async fn issue_event_is_delivered_to_unique_recipients() {
    let messenger = Arc::new(RecordingMessenger::default());
    let (_, service) = service(messenger.clone());

    let report = service
        .handle(&issue_body("update", vec![4, 3], ""))
        .await
        .expect("processed");

    // 4 (1001), 3 (none), 1 (1001, dup), 2 (1002)
    assert_eq!(report.issue_number, 12);
    assert_eq!(report.recipients, 3);
    assert_eq!(report.sent, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.failed, 0);

    let sent = messenger.sent.lock().unwrap();
    let chats: Vec<i64> = sent.iter().map(|(chat, _)| *chat).collect();
    assert_eq!(chats, vec![1001, 1002]);
    let text = &sent[0].1;
    assert!(text.starts_with("👀 *Issue updated [\\#12](https://gitlab.example.com/g/p/-/issues/12)*"));
    assert!(text.contains("*Updated by*: Alan Turing"));
    assert!(text.contains("*Assignee*:\n  ◦ Ada \\(bot\\)\n  ◦ Grace Hopper\n"));
}

#[tokio::test]
async fn mentioned_user_is_notified() {
    let messenger = Arc::new(RecordingMessenger::default());
    let (fake, service) = service(messenger.clone());

    let report = service
        .handle(&issue_body("open", vec![], "cc @linus and @grace"))
        .await
        .unwrap();

    assert_eq!(report.sent, 3);
    let chats: Vec<i64> = messenger.sent.lock().unwrap().iter().map(|(c, _)| *c).collect();
    assert_eq!(chats, vec![1001, 1002, 1005]);
    let lookups = fake.lookups.lock().unwrap();
    assert!(lookups.contains(&"username:linus".to_string()));
    assert!(!lookups.contains(&"username:grace".to_string()));
}

#[tokio::test]
async fn failed_delivery_does_not_stop_the_loop() {
    let messenger = Arc::new(RecordingMessenger {
        failing: HashSet::from([1001]),
        ..Default::default()
    });
    let (_, service) = service(messenger.clone());

    let report = service
        .handle(&issue_body("close", vec![5], ""))
        .await
        .unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(report.sent, 2);
    let chats: Vec<i64> = messenger.sent.lock().unwrap().iter().map(|(c, _)| *c).collect();
    assert_eq!(chats, vec![1005, 1002]);
}

#[tokio::test]
async fn lookup_failure_aborts_without_sending() {
    let messenger = Arc::new(RecordingMessenger::default());
    let (_, service) = service(messenger.clone());

    let err = service
        .handle(&issue_body("open", vec![77], ""))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Lookup(LookupError::Status { .. })));
    assert!(messenger.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let messenger = Arc::new(RecordingMessenger::default());
    let (fake, service) = service(messenger.clone());

    let err = service
        .handle(br#"{"object_kind":"pipeline"}"#)
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Parse(_)));
    assert!(fake.lookups.lock().unwrap().is_empty());
    assert!(messenger.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn comment_event_renders_parent_issue_then_comment() {
    let messenger = Arc::new(RecordingMessenger::default());
    let (_, service) = service(messenger.clone());
    let body = serde_json::to_vec(&json!({
        "object_kind": "note",
        "user": { "id": 5, "name": "Linus", "username": "linus" },
        "object_attributes": {
            "note": "Reproduced on main.",
            "noteable_type": "Issue",
            "url": "https://gitlab.example.com/g/p/-/issues/12#note_9"
        },
        "issue": {
            "iid": 12,
            "title": "Fix bug",
            "author_id": 1,
            "assignee_ids": [2],
            "updated_by_id": null,
            "url": "https://gitlab.example.com/g/p/-/issues/12",
            "labels": [{ "id": 1, "title": "bug" }]
        }
    }))
    .unwrap();

    let report = service.handle(&body).await.unwrap();
    assert_eq!(report.kind, "note");
    assert_eq!(report.sent, 2);

    let sent = messenger.sent.lock().unwrap();
    let text = &sent[0].1;
    assert!(text.starts_with("💬 *New comment in [\\#12]"));
    let title = text.find("*Name*: Fix bug").unwrap();
    let author = text.find("*Creator*: Ada Lovelace").unwrap();
    let comment = text.find("*Comment*: Reproduced on main\\.").unwrap();
    assert!(title < author && author < comment);
    assert!(text.contains("  *Labels*:\n    ◦ bug\n"));
}

#[tokio::test]
async fn recipients_skip_zero_ids_and_mark_mentions() {
    let fake = Arc::new(FakeDirectory::new(team()));
    let directory = UserDirectory::new(fake.clone());

    let recipients = resolve_recipients(&directory, &[0, 2, 0], &["nobody".to_string()])
        .await
        .unwrap();

    assert_eq!(recipients.len(), 2);
    assert_eq!(recipients[0].name, "Alan Turing");
    assert_eq!(recipients[0].directory_ref, DirectoryRef::Id(2));
    assert_eq!(recipients[1].name, "nobody");
    assert_eq!(recipients[1].directory_ref, DirectoryRef::Mention);
    assert_eq!(recipients[1].telegram_id, None);
    assert!(!fake.lookups.lock().unwrap().contains(&"id:0".to_string()));
}
