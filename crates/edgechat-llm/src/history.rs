//! Turn-order cleanup for backends that require strictly alternating
//! user/assistant history.
//!
//! Some chat backends reject two consecutive user turns or a history that
//! opens with an assistant turn. Clients produce both: a retried question
//! leaves a duplicate user turn, and the usage-cap notice is stored as an
//! assistant reply to a question that was never answered.

use edgechat_types::{Message, Role};

/// Assistant text the client stores when a user hits their usage cap.
pub const USAGE_CAP_NOTICE: &str = "Hold On! You've Hit Your Usage Cap.";

/// Rebuild `messages` so that user and assistant turns alternate.
///
/// - a user turn answered only by the usage-cap notice is dropped together
///   with the notice;
/// - of several consecutive user turns only the last is kept;
/// - the newest user turn is appended unless it is itself a cap notice or
///   would follow another user turn;
/// - an even-length result that opens with an assistant turn loses that
///   turn.
pub fn alternate_turns(messages: &[Message]) -> Vec<Message> {
    let mut cleaned: Vec<Message> = Vec::with_capacity(messages.len());

    let mut i = 0;
    while i + 1 < messages.len() {
        let current = &messages[i];
        let next = &messages[i + 1];

        if next.role == Role::Assistant && next.content.contains(USAGE_CAP_NOTICE) {
            if current.role == Role::User {
                i += 1;
            }
        } else if !(next.role == Role::User && current.role == Role::User) {
            cleaned.push(current.clone());
        }
        i += 1;
    }

    if let Some(last) = messages.last()
        && last.role == Role::User
        && !last.content.contains(USAGE_CAP_NOTICE)
        && cleaned.last().is_none_or(|m| m.role != Role::User)
    {
        cleaned.push(last.clone());
    }

    if cleaned.len() % 2 == 0 && cleaned.first().is_some_and(|m| m.role == Role::Assistant) {
        cleaned.remove(0);
    }

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_alternating_history_is_unchanged() {
        let msgs = vec![
            Message::user("q1"),
            Message::assistant("a1"),
            Message::user("q2"),
        ];
        assert_eq!(alternate_turns(&msgs), msgs);
    }

    #[test]
    fn consecutive_user_turns_keep_the_last() {
        let msgs = vec![
            Message::user("first try"),
            Message::user("second try"),
            Message::assistant("answer"),
            Message::user("follow-up"),
        ];
        assert_eq!(
            alternate_turns(&msgs),
            vec![
                Message::user("second try"),
                Message::assistant("answer"),
                Message::user("follow-up"),
            ]
        );
    }

    #[test]
    fn usage_capped_exchange_is_removed() {
        let msgs = vec![
            Message::user("q1"),
            Message::assistant("a1"),
            Message::user("capped question"),
            Message::assistant(format!("{USAGE_CAP_NOTICE} Upgrade to continue.")),
            Message::user("q3"),
        ];
        assert_eq!(
            alternate_turns(&msgs),
            vec![
                Message::user("q1"),
                Message::assistant("a1"),
                Message::user("q3"),
            ]
        );
    }

    #[test]
    fn leading_assistant_turn_is_dropped_for_even_length() {
        let msgs = vec![
            Message::assistant("welcome"),
            Message::user("q1"),
            Message::assistant("a1"),
            Message::user("q2"),
        ];
        assert_eq!(
            alternate_turns(&msgs),
            vec![
                Message::user("q1"),
                Message::assistant("a1"),
                Message::user("q2"),
            ]
        );
    }

    #[test]
    fn empty_and_single_inputs() {
        assert!(alternate_turns(&[]).is_empty());
        assert_eq!(
            alternate_turns(&[Message::user("only")]),
            vec![Message::user("only")]
        );
    }
}
