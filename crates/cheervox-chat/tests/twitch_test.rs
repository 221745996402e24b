use cheervox_chat::{ChatError, ChatSource, TwitchChat};
use cheervox_types::ChatEvent;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Accepts one client, records its lines up to JOIN, then plays `script`
/// and keeps reading so replies can be inspected.
async fn fake_irc(script: Vec<&'static str>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let (reader, mut writer) = socket.into_split();
        let mut lines = BufReader::new(reader).lines();
        let mut received = Vec::new();

        while let Some(line) = lines.next_line().await.unwrap() {
            let joined = line.starts_with("JOIN");
            received.push(line);
            if joined {
                break;
            }
        }
        for line in script {
            writer.write_all(line.as_bytes()).await.unwrap();
            writer.write_all(b"\r\n").await.unwrap();
        }
        while let Ok(Some(line)) = lines.next_line().await {
            received.push(line);
        }
        received
    });

    (addr, server)
}

#[tokio::test]
async fn streams_events_until_reconnect() {
    let (addr, server) = fake_irc(vec![
        ":tmi.twitch.tv 001 justinfan12345 :Welcome, GLHF!",
        ":tmi.twitch.tv CAP * ACK :twitch.tv/tags twitch.tv/commands",
        "PING :tmi.twitch.tv",
        "@bits=500;subscriber=0 :alice!alice@alice.tmi.twitch.tv PRIVMSG #streamer :Cheer500",
        "@display-name=Bob;login=bob;msg-id=sub :tmi.twitch.tv USERNOTICE #streamer",
        "@subscriber=1 :carol!carol@carol.tmi.twitch.tv PRIVMSG #streamer :hi",
        ":tmi.twitch.tv RECONNECT",
    ])
    .await;

    let (tx, mut rx) = mpsc::channel(16);
    let err = TwitchChat::new(addr)
        .stream("#streamer", tx)
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::Closed(_)), "got {err:?}");

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    assert_eq!(
        events,
        vec![
            ChatEvent::Cheer {
                username: "alice".to_string(),
                bits_used: 500,
            },
            ChatEvent::Subscription {
                username: "Bob".to_string(),
            },
            ChatEvent::Message {
                username: "carol".to_string(),
                subscriber: true,
            },
        ]
    );

    let received = server.await.unwrap();
    assert_eq!(received[0], "CAP REQ :twitch.tv/tags twitch.tv/commands");
    assert_eq!(received[1], "PASS SCHMOOPIIE");
    assert!(received[2].starts_with("NICK justinfan"));
    assert_eq!(received[3], "JOIN #streamer");
    assert!(received.contains(&"PONG :tmi.twitch.tv".to_string()));
}

#[tokio::test]
async fn login_failure_is_auth_error() {
    let (addr, _server) = fake_irc(vec![":tmi.twitch.tv NOTICE * :Login authentication failed"]).await;

    let (tx, _rx) = mpsc::channel(16);
    let err = TwitchChat::new(addr).stream("#streamer", tx).await.unwrap_err();
    assert!(matches!(err, ChatError::Auth(_)), "got {err:?}");
}

#[tokio::test]
async fn server_hangup_is_an_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        drop(socket);
    });

    let (tx, _rx) = mpsc::channel(16);
    let err = TwitchChat::new(addr).stream("#streamer", tx).await.unwrap_err();
    assert!(
        matches!(err, ChatError::Closed(_) | ChatError::Io(_)),
        "got {err:?}"
    );
}

#[tokio::test]
async fn unreachable_server_is_connect_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);

    let (tx, _rx) = mpsc::channel(16);
    let err = TwitchChat::new(addr).stream("#streamer", tx).await.unwrap_err();
    assert!(matches!(err, ChatError::Connect { .. }), "got {err:?}");
}

#[tokio::test]
async fn dropped_consumer_ends_stream_cleanly() {
    let (addr, _server) = fake_irc(vec![
        "@bits=100 :alice!alice@alice.tmi.twitch.tv PRIVMSG #streamer :Cheer100",
    ])
    .await;

    let (tx, rx) = mpsc::channel(16);
    drop(rx);
    TwitchChat::new(addr)
        .stream("#streamer", tx)
        .await
        .expect("stream should end cleanly");
}
