use troutslap_shared::ParticipantSet;

// Slack encodes @here, @channel and @everyone with a `!`, not an `@`.
const MASS_MENTIONS: [&str; 3] = ["!here", "!channel", "!everyone"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandIntent {
    Help,
    MassMention,
    SelfOnly,
    Combat {
        initiator: String,
        participants: ParticipantSet,
    },
}

pub fn parse(text: &str, user_id: &str) -> CommandIntent {
    if text == "help" {
        return CommandIntent::Help;
    }
    if is_mass_mention(text) {
        return CommandIntent::MassMention;
    }

    let participants = ParticipantSet::new(user_id, mentioned_users(text));
    if participants.len() < 2 {
        CommandIntent::SelfOnly
    } else {
        CommandIntent::Combat {
            initiator: user_id.to_string(),
            participants,
        }
    }
}

pub fn is_mass_mention(text: &str) -> bool {
    MASS_MENTIONS.iter().any(|mention| text.contains(mention))
}

/// User ids from `<@UID>` and `<@UID|name>` tokens, in order of appearance.
///
/// We can't know what either part may contain, so a token runs from `<@` to
/// the first `|` or `>` (or the end of the text).
pub fn mentioned_users(text: &str) -> Vec<&str> {
    let mut users = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find("<@") {
        let after = &rest[start + 2..];
        let end = after.find(|c: char| c == '|' || c == '>').unwrap_or(after.len());
        if end > 0 {
            users.push(&after[..end]);
            rest = &after[end..];
        } else {
            rest = after;
        }
    }

    users
}
