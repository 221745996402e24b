use crate::error::ChatError;
use crate::event::chat_event;
use crate::message::IrcMessage;
use crate::ChatSource;
use async_trait::async_trait;
use cheervox_types::ChatEvent;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, info};

pub const DEFAULT_IRC_ADDR: &str = "irc.chat.twitch.tv:6667";

/// Password accepted for anonymous `justinfan` logins.
const ANONYMOUS_PASS: &str = "SCHMOOPIIE";

const LOGIN_FAILURES: &[&str] = &[
    "Login authentication failed",
    "Login unsuccessful",
    "Improperly formatted auth",
];

/// Read-only, anonymous connection to Twitch chat over plain IRC.
#[derive(Debug, Clone)]
pub struct TwitchChat {
    addr: String,
}

impl TwitchChat {
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }
}

impl Default for TwitchChat {
    fn default() -> Self {
        Self::new(DEFAULT_IRC_ADDR)
    }
}

#[async_trait]
impl ChatSource for TwitchChat {
    async fn stream(&self, channel: &str, events: mpsc::Sender<ChatEvent>) -> Result<(), ChatError> {
        let stream = TcpStream::connect(&self.addr)
            .await
            .map_err(|source| ChatError::Connect {
                addr: self.addr.clone(),
                source,
            })?;
        let (reader, mut writer) = stream.into_split();

        let nick = format!("justinfan{}", 10_000 + std::process::id() % 90_000);
        send_line(&mut writer, "CAP REQ :twitch.tv/tags twitch.tv/commands").await?;
        send_line(&mut writer, &format!("PASS {ANONYMOUS_PASS}")).await?;
        send_line(&mut writer, &format!("NICK {nick}")).await?;
        send_line(&mut writer, &format!("JOIN {channel}")).await?;
        info!(addr = %self.addr, channel, nick = %nick, "joined chat");

        let mut lines = BufReader::new(reader).lines();
        while let Some(line) = lines.next_line().await? {
            let Some(message) = IrcMessage::parse(&line) else {
                debug!(line = %line, "skipping malformed chat line");
                continue;
            };

            match message.command.as_str() {
                "PING" => {
                    let token = message.trailing().unwrap_or("tmi.twitch.tv");
                    send_line(&mut writer, &format!("PONG :{token}")).await?;
                }
                "RECONNECT" => {
                    return Err(ChatError::Closed("server requested reconnect".to_string()));
                }
                "NOTICE" => {
                    let text = message.trailing().unwrap_or_default();
                    if LOGIN_FAILURES.iter().any(|failure| text.contains(failure)) {
                        return Err(ChatError::Auth(text.to_string()));
                    }
                    debug!(notice = %text, "chat notice");
                }
                _ => {
                    if let Some(event) = chat_event(&message) {
                        debug!(kind = event.kind(), "chat event received");
                        if events.send(event).await.is_err() {
                            info!(channel, "chat consumer gone, leaving");
                            return Ok(());
                        }
                    }
                }
            }
        }

        Err(ChatError::Closed("server closed the connection".to_string()))
    }
}

async fn send_line<W>(writer: &mut W, line: &str) -> Result<(), ChatError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\r\n").await?;
    writer.flush().await?;
    Ok(())
}
