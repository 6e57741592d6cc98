use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::Mutex;

use crate::events::ConversationState;

/// Keyed persistence of conversation state.
///
/// `load` never fails for an unknown conversation; it returns a default state.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn load(&self, conversation_id: &str) -> Result<ConversationState>;

    async fn save(&self, conversation_id: &str, state: &ConversationState) -> Result<()>;

    /// Remove everything stored for the conversation
    async fn delete_all(&self, conversation_id: &str) -> Result<()>;
}

/// Process-local store; state is lost on exit
#[derive(Default)]
pub struct MemoryStore {
    conversations: Mutex<HashMap<String, ConversationState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn load(&self, conversation_id: &str) -> Result<ConversationState> {
        let conversations = self.conversations.lock().await;
        Ok(conversations.get(conversation_id).cloned().unwrap_or_default())
    }

    async fn save(&self, conversation_id: &str, state: &ConversationState) -> Result<()> {
        let mut conversations = self.conversations.lock().await;
        conversations.insert(conversation_id.to_string(), state.clone());
        Ok(())
    }

    async fn delete_all(&self, conversation_id: &str) -> Result<()> {
        self.conversations.lock().await.remove(conversation_id);
        Ok(())
    }
}

/// On-disk record for one conversation
#[derive(Debug, Serialize, Deserialize)]
pub struct StoredConversation {
    pub conversation_id: String,
    pub updated_at: DateTime<Utc>,
    pub state: ConversationState,
}

/// Summary shown by `codehelper list`
#[derive(Debug, Clone)]
pub struct ConversationSummary {
    pub conversation_id: String,
    pub updated_at: DateTime<Utc>,
    pub turns: usize,
    pub message_count: u64,
}

/// Store keeping one JSON file per conversation
pub struct FileStore {
    conversations_dir: PathBuf,
}

impl FileStore {
    pub fn new(conversations_dir: impl Into<PathBuf>) -> Self {
        Self {
            conversations_dir: conversations_dir.into(),
        }
    }

    async fn ensure_directories(&self) -> Result<()> {
        fs::create_dir_all(&self.conversations_dir)
            .await
            .context("Failed to create conversations directory")
    }

    fn conversation_path(&self, conversation_id: &str) -> PathBuf {
        self.conversations_dir
            .join(format!("{}.json", encode_file_name(conversation_id)))
    }

    /// All stored conversations, most recently updated first
    pub async fn list(&self) -> Result<Vec<ConversationSummary>> {
        let mut summaries = Vec::new();
        if !fs::try_exists(&self.conversations_dir).await.unwrap_or(false) {
            return Ok(summaries);
        }

        let mut entries = fs::read_dir(&self.conversations_dir)
            .await
            .context("Failed to read conversations directory")?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .context("Failed to read directory entry")?
        {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let content = fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            match serde_json::from_str::<StoredConversation>(&content) {
                Ok(stored) => summaries.push(ConversationSummary {
                    conversation_id: stored.conversation_id,
                    updated_at: stored.updated_at,
                    turns: stored.state.history.len(),
                    message_count: stored.state.message_count,
                }),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping unreadable conversation file");
                }
            }
        }

        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }
}

#[async_trait]
impl StateStore for FileStore {
    async fn load(&self, conversation_id: &str) -> Result<ConversationState> {
        let path = self.conversation_path(conversation_id);
        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(ConversationState::default());
        }

        let content = fs::read_to_string(&path)
            .await
            .context("Failed to read conversation state")?;
        let stored: StoredConversation =
            serde_json::from_str(&content).context("Failed to parse conversation state")?;
        Ok(stored.state)
    }

    async fn save(&self, conversation_id: &str, state: &ConversationState) -> Result<()> {
        self.ensure_directories().await?;

        let stored = StoredConversation {
            conversation_id: conversation_id.to_string(),
            updated_at: Utc::now(),
            state: state.clone(),
        };
        let content = serde_json::to_string_pretty(&stored)
            .context("Failed to serialize conversation state")?;
        fs::write(self.conversation_path(conversation_id), content)
            .await
            .context("Failed to write conversation state")
    }

    async fn delete_all(&self, conversation_id: &str) -> Result<()> {
        let path = self.conversation_path(conversation_id);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).context("Failed to delete conversation state"),
        }
    }
}

/// Map a conversation id onto a safe, unique file stem.
///
/// ASCII alphanumerics and `-` pass through; every other byte, `_` included,
/// becomes `_xx` in lowercase hex. A lone `_` stands for the empty id.
fn encode_file_name(conversation_id: &str) -> String {
    if conversation_id.is_empty() {
        return "_".to_string();
    }

    let mut name = String::with_capacity(conversation_id.len());
    for byte in conversation_id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            name.push(char::from(byte));
        } else {
            name.push_str(&format!("_{byte:02x}"));
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Turn;

    fn sample_state() -> ConversationState {
        ConversationState {
            message_count: 2,
            history: vec![Turn::user("hi"), Turn::assistant("hello")],
        }
    }

    #[tokio::test]
    async fn memory_store_defaults_and_deletes() {
        let store = MemoryStore::new();
        assert_eq!(store.load("c1").await.unwrap(), ConversationState::default());

        store.save("c1", &sample_state()).await.unwrap();
        assert_eq!(store.load("c1").await.unwrap(), sample_state());
        assert_eq!(store.load("c2").await.unwrap(), ConversationState::default());

        store.delete_all("c1").await.unwrap();
        assert_eq!(store.load("c1").await.unwrap(), ConversationState::default());
    }

    #[tokio::test]
    async fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();

        FileStore::new(dir.path()).save("team/chat:1", &sample_state()).await.unwrap();

        let reopened = FileStore::new(dir.path());
        assert_eq!(reopened.load("team/chat:1").await.unwrap(), sample_state());

        let summaries = reopened.list().await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].conversation_id, "team/chat:1");
        assert_eq!(summaries[0].turns, 2);
        assert_eq!(summaries[0].message_count, 2);
    }

    #[tokio::test]
    async fn file_store_delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.delete_all("missing").await.unwrap();
        store.save("c1", &sample_state()).await.unwrap();
        store.delete_all("c1").await.unwrap();

        assert_eq!(store.load("c1").await.unwrap(), ConversationState::default());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_on_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nope"));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[test]
    fn file_names_are_encoded() {
        assert_eq!(encode_file_name("a/b:c"), "a_2fb_3ac");
        assert_eq!(encode_file_name("ok-id_1"), "ok-id_5f1");
        assert_eq!(encode_file_name("é"), "_c3_a9");
        assert_eq!(encode_file_name(""), "_");
        assert_ne!(encode_file_name("a/b"), encode_file_name("a_b"));
        assert_ne!(encode_file_name("_"), encode_file_name(""));
    }

    #[tokio::test]
    async fn similar_ids_stay_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.save("team/a:b", &sample_state()).await.unwrap();
        assert_eq!(store.load("team_a_b").await.unwrap(), ConversationState::default());

        let other = ConversationState {
            message_count: 7,
            history: vec![Turn::user("other")],
        };
        store.save("team_a_b", &other).await.unwrap();
        assert_eq!(store.load("team/a:b").await.unwrap(), sample_state());
        assert_eq!(store.list().await.unwrap().len(), 2);

        store.delete_all("team_a_b").await.unwrap();
        assert_eq!(store.load("team/a:b").await.unwrap(), sample_state());
        assert_eq!(store.load("team_a_b").await.unwrap(), ConversationState::default());
    }
}
