use crate::message::IrcMessage;
use cheervox_types::{ChatEvent, GiftRecipient};

/// Maps a Twitch IRC message onto a [`ChatEvent`].
///
/// Returns `None` for commands and notice kinds that never trigger anything.
pub fn chat_event(message: &IrcMessage) -> Option<ChatEvent> {
    match message.command.as_str() {
        "PRIVMSG" => privmsg_event(message),
        "USERNOTICE" => usernotice_event(message),
        _ => None,
    }
}

fn privmsg_event(message: &IrcMessage) -> Option<ChatEvent> {
    let username = message.nick()?.to_string();
    let bits = message
        .tag("bits")
        .and_then(|bits| bits.parse::<u32>().ok())
        .filter(|&bits| bits > 0);

    Some(match bits {
        Some(bits_used) => ChatEvent::Cheer {
            username,
            bits_used,
        },
        None => ChatEvent::Message {
            username,
            subscriber: message.tag("subscriber") == Some("1"),
        },
    })
}

fn usernotice_event(message: &IrcMessage) -> Option<ChatEvent> {
    let owned = |key: &str| message.tag(key).map(str::to_string);

    match message.tag("msg-id")? {
        "sub" => Some(ChatEvent::Subscription {
            username: notice_author(message)?,
        }),
        "resub" => Some(ChatEvent::Resubscription {
            username: notice_author(message)?,
        }),
        "subgift" | "anonsubgift" => Some(ChatEvent::GiftedSubscription {
            recipient: GiftRecipient::new(
                owned("msg-param-recipient-display-name"),
                owned("msg-param-recipient-user-name"),
            ),
        }),
        "submysterygift" | "anonsubmysterygift" => Some(ChatEvent::MassGiftedSubscription {
            recipient: GiftRecipient::new(
                owned("msg-param-recipient-display-name"),
                owned("msg-param-recipient-user-name"),
            ),
        }),
        "raid" => Some(ChatEvent::Raid {
            username: owned("msg-param-displayName").or_else(|| owned("msg-param-login"))?,
            viewers: message
                .tag("msg-param-viewerCount")
                .and_then(|count| count.parse().ok())
                .unwrap_or(0),
        }),
        _ => None,
    }
}

fn notice_author(message: &IrcMessage) -> Option<String> {
    message
        .tag("display-name")
        .or_else(|| message.tag("login"))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Option<ChatEvent> {
        chat_event(&IrcMessage::parse(line).unwrap())
    }

    #[test]
    fn privmsg_with_bits_is_cheer_from_login() {
        let event = parse(
            "@bits=250;display-name=Alice_TV;subscriber=1 \
             :alice_tv!alice_tv@alice_tv.tmi.twitch.tv PRIVMSG #streamer :Cheer250",
        );
        assert_eq!(
            event,
            Some(ChatEvent::Cheer {
                username: "alice_tv".to_string(),
                bits_used: 250,
            })
        );
    }

    #[test]
    fn privmsg_without_bits_is_message() {
        let event = parse("@subscriber=1 :bob!bob@bob.tmi.twitch.tv PRIVMSG #streamer :hello");
        assert_eq!(
            event,
            Some(ChatEvent::Message {
                username: "bob".to_string(),
                subscriber: true,
            })
        );

        let event = parse("@subscriber=0 :bob!bob@bob.tmi.twitch.tv PRIVMSG #streamer :hello");
        assert!(matches!(event, Some(ChatEvent::Message { subscriber: false, .. })));
    }

    #[test]
    fn sub_prefers_display_name() {
        let event = parse(
            "@display-name=Carol;login=carol;msg-id=sub :tmi.twitch.tv USERNOTICE #streamer",
        );
        assert_eq!(
            event,
            Some(ChatEvent::Subscription {
                username: "Carol".to_string(),
            })
        );

        let event = parse("@display-name=;login=carol;msg-id=resub :tmi.twitch.tv USERNOTICE #streamer :6 months!");
        assert_eq!(
            event,
            Some(ChatEvent::Resubscription {
                username: "carol".to_string(),
            })
        );
    }

    #[test]
    fn gifts_carry_recipient() {
        let event = parse(
            "@msg-id=subgift;msg-param-recipient-display-name=Dave;msg-param-recipient-user-name=dave \
             :tmi.twitch.tv USERNOTICE #streamer",
        );
        assert_eq!(
            event,
            Some(ChatEvent::GiftedSubscription {
                recipient: GiftRecipient::new(Some("Dave".to_string()), Some("dave".to_string())),
            })
        );

        let event = parse("@msg-id=anonsubmysterygift :tmi.twitch.tv USERNOTICE #streamer");
        assert_eq!(
            event,
            Some(ChatEvent::MassGiftedSubscription {
                recipient: GiftRecipient::default(),
            })
        );
    }

    #[test]
    fn raid_reads_display_name_and_viewers() {
        let event = parse(
            r"@msg-id=raid;msg-param-displayName=Big\sRaider;msg-param-login=bigraider;msg-param-viewerCount=42 :tmi.twitch.tv USERNOTICE #streamer",
        );
        assert_eq!(
            event,
            Some(ChatEvent::Raid {
                username: "Big Raider".to_string(),
                viewers: 42,
            })
        );
    }

    #[test]
    fn other_notices_are_ignored() {
        assert_eq!(parse("@msg-id=bitsbadgetier :tmi.twitch.tv USERNOTICE #streamer"), None);
        assert_eq!(parse(":tmi.twitch.tv USERNOTICE #streamer"), None);
        assert_eq!(parse("PING :tmi.twitch.tv"), None);
        assert_eq!(parse(":tmi.twitch.tv ROOMSTATE #streamer"), None);
    }
}
