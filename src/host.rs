use anyhow::Result;
use async_trait::async_trait;
use tokio::io::{AsyncWriteExt, Stdout};
use tokio::sync::Mutex;

/// Outbound side of the messaging host
#[async_trait]
pub trait MessagingHost: Send + Sync {
    async fn send_text(&self, conversation_id: &str, text: &str) -> Result<()>;
}

/// Host that prints replies to stdout, for local use
pub struct ConsoleHost {
    stdout: Mutex<Stdout>,
}

impl ConsoleHost {
    pub fn new() -> Self {
        Self {
            stdout: Mutex::new(tokio::io::stdout()),
        }
    }
}

impl Default for ConsoleHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagingHost for ConsoleHost {
    async fn send_text(&self, _conversation_id: &str, text: &str) -> Result<()> {
        let mut stdout = self.stdout.lock().await;
        stdout.write_all(format!("\n{text}\n\n").as_bytes()).await?;
        stdout.flush().await?;
        Ok(())
    }
}
