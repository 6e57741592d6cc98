use crate::events::Turn;

/// Number of stored turns sent along with each request
pub const CONTEXT_WINDOW: usize = 8;

/// Build the message list for one completion call.
///
/// The output is the system instruction, then the most recent
/// `CONTEXT_WINDOW` turns of `history` in their original order, then the new
/// user message. `history` itself is left untouched.
pub fn compose(system_instruction: &str, history: &[Turn], new_user_message: &str) -> Vec<Turn> {
    let window = &history[history.len().saturating_sub(CONTEXT_WINDOW)..];

    let mut messages = Vec::with_capacity(window.len() + 2);
    messages.push(Turn::system(system_instruction));
    messages.extend_from_slice(window);
    messages.push(Turn::user(new_user_message));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Role;

    fn numbered_history(len: usize) -> Vec<Turn> {
        (0..len)
            .map(|i| {
                if i % 2 == 0 {
                    Turn::user(format!("q{i}"))
                } else {
                    Turn::assistant(format!("a{i}"))
                }
            })
            .collect()
    }

    #[test]
    fn empty_history_yields_system_and_user() {
        let messages = compose("sys", &[], "hello");

        assert_eq!(messages, vec![Turn::system("sys"), Turn::user("hello")]);
    }

    #[test]
    fn short_history_is_sent_whole() {
        let history = numbered_history(3);
        let messages = compose("sys", &history, "next");

        assert_eq!(messages.len(), 5);
        assert_eq!(&messages[1..4], &history[..]);
    }

    #[test]
    fn only_the_last_eight_turns_are_sent() {
        let history = numbered_history(20);
        let messages = compose("sys", &history, "next");

        assert_eq!(messages.len(), CONTEXT_WINDOW + 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(&messages[1..=CONTEXT_WINDOW], &history[12..]);
        assert_eq!(messages.last(), Some(&Turn::user("next")));
    }

    #[test]
    fn history_is_not_mutated() {
        let history = numbered_history(12);
        let before = history.clone();
        let _ = compose("sys", &history, "next");

        assert_eq!(history, before);
    }
}
