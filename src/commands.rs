use once_cell::sync::Lazy;
use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};

use crate::prompts;

/// Commands that can be invoked by starting a message with a leading slash.
///
/// Declaration order is match priority: the first command whose trigger
/// prefixes the message wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum SlashCommand {
    /// Show help
    Help,
    /// Review a pasted code snippet
    Review,
    /// Help debug an error or bug description
    Debug,
    /// Explain a programming concept
    Explain,
    /// List best practices for a technology
    BestPractices,
    /// Wipe the whole conversation state
    Clear,
    /// Drop the conversation history only
    Reset,
}

/// What running a command amounts to, independent of any conversation
#[derive(Debug, Clone, Copy)]
pub enum CommandAction {
    /// Reply with fixed text
    Reply(&'static str),
    /// Wrap the argument in a directive and run a completion exchange
    Exchange(ExchangeSpec),
    /// Destroy and recreate the conversation state
    Clear,
    /// Clear the stored history only
    Reset,
}

/// How an argument-consuming command talks to the completion service
#[derive(Debug, Clone, Copy)]
pub struct ExchangeSpec {
    pub label: &'static str,
    pub missing_argument: &'static str,
    pub template: fn(&str) -> String,
}

impl ExchangeSpec {
    /// Prefix a completion reply with the command label
    pub fn labeled(&self, reply: &str) -> String {
        format!("{}\n\n{}", self.label, reply)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub command: SlashCommand,
    pub argument: Option<String>,
}

impl ParsedCommand {
    pub fn argument(&self) -> Option<&str> {
        self.argument.as_deref()
    }
}

impl SlashCommand {
    /// User-visible description shown in help.
    pub fn description(self) -> &'static str {
        match self {
            SlashCommand::Help => "Show this help message",
            SlashCommand::Review => "Paste code after this command for a code review",
            SlashCommand::Debug => "Describe your bug or paste error messages",
            SlashCommand::Explain => "Ask me to explain any programming concept",
            SlashCommand::BestPractices => "Get best practices for any technology",
            SlashCommand::Clear => "Clear the entire conversation and start fresh",
            SlashCommand::Reset => "Clear conversation history (lighter reset)",
        }
    }

    /// Command string without the leading '/'.
    pub fn command(self) -> &'static str {
        self.into()
    }

    pub fn action(self) -> CommandAction {
        match self {
            SlashCommand::Help => CommandAction::Reply(help_text()),
            SlashCommand::Review => CommandAction::Exchange(ExchangeSpec {
                label: "🔍 **Code Review:**",
                missing_argument: "Please paste your code after the /review command for me to review!",
                template: prompts::review_prompt,
            }),
            SlashCommand::Debug => CommandAction::Exchange(ExchangeSpec {
                label: "🐛 **Debug Help:**",
                missing_argument: "Please describe your bug or paste the error message after the /debug command!",
                template: prompts::debug_prompt,
            }),
            SlashCommand::Explain => CommandAction::Exchange(ExchangeSpec {
                label: "📚 **Explanation:**",
                missing_argument: "Please tell me what programming concept you'd like me to explain!",
                template: prompts::explain_prompt,
            }),
            SlashCommand::BestPractices => CommandAction::Exchange(ExchangeSpec {
                label: "⭐ **Best Practices:**",
                missing_argument: "Please specify the technology or programming area you want best practices for!",
                template: prompts::best_practices_prompt,
            }),
            SlashCommand::Clear => CommandAction::Clear,
            SlashCommand::Reset => CommandAction::Reset,
        }
    }
}

/// Match a message against the command triggers.
///
/// Matching is a case-sensitive prefix test of `/<command>` against the
/// message with leading whitespace removed. Whatever follows the trigger,
/// trimmed, is the argument.
pub fn parse_slash_command(input: &str) -> Option<ParsedCommand> {
    let rest = input.trim_start().strip_prefix('/')?;

    SlashCommand::iter().find_map(|command| {
        let argument = rest.strip_prefix(command.command())?.trim();
        Some(ParsedCommand {
            command,
            argument: (!argument.is_empty()).then(|| argument.to_string()),
        })
    })
}

static HELP_TEXT: Lazy<String> = Lazy::new(|| {
    let mut help = String::from("🤖 **Code Helper Bot Commands:**\n\n");
    help.push_str("• **General coding questions** - Just ask me anything about programming!\n");

    // Help goes last in the listing even though it matches first.
    for command in SlashCommand::iter()
        .filter(|c| *c != SlashCommand::Help)
        .chain(std::iter::once(SlashCommand::Help))
    {
        help.push_str(&format!("• **/{}** - {}\n", command.command(), command.description()));
    }

    help.push('\n');
    help.push_str(prompts::HELP_EXAMPLES);
    help
});

/// Static command reference sent for `/help`
pub fn help_text() -> &'static str {
    HELP_TEXT.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_trigger() {
        for command in SlashCommand::iter() {
            let parsed = parse_slash_command(&format!("/{}", command.command())).unwrap();
            assert_eq!(parsed.command, command);
            assert_eq!(parsed.argument(), None);
        }
    }

    #[test]
    fn extracts_trimmed_argument() {
        let parsed = parse_slash_command("/review   foo()  ").unwrap();
        assert_eq!(parsed.command, SlashCommand::Review);
        assert_eq!(parsed.argument(), Some("foo()"));

        let parsed = parse_slash_command("/best-practices error handling in Rust").unwrap();
        assert_eq!(parsed.command, SlashCommand::BestPractices);
        assert_eq!(parsed.argument(), Some("error handling in Rust"));
    }

    #[test]
    fn argument_keeps_inner_newlines() {
        let parsed = parse_slash_command("/review fn a() {\n    1\n}").unwrap();
        assert_eq!(parsed.argument(), Some("fn a() {\n    1\n}"));
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert_eq!(parse_slash_command("/Review foo"), None);
        assert_eq!(parse_slash_command("/HELP"), None);
    }

    #[test]
    fn non_commands_fall_through() {
        assert_eq!(parse_slash_command("how do I use /review?"), None);
        assert_eq!(parse_slash_command("/unknown"), None);
        assert_eq!(parse_slash_command(""), None);
        assert_eq!(parse_slash_command("review foo"), None);
    }

    #[test]
    fn matching_is_prefix_based() {
        let parsed = parse_slash_command("/reviewfoo").unwrap();
        assert_eq!(parsed.command, SlashCommand::Review);
        assert_eq!(parsed.argument(), Some("foo"));
    }

    #[test]
    fn help_lists_every_command() {
        let help = help_text();
        for command in SlashCommand::iter() {
            assert!(help.contains(&format!("**/{}**", command.command())));
        }
        assert!(help.contains("**Examples:**"));
    }

    #[test]
    fn labeled_reply_separates_label_and_body() {
        let CommandAction::Exchange(spec) = SlashCommand::Debug.action() else {
            panic!("debug should run an exchange");
        };
        assert_eq!(spec.labeled("try again"), "🐛 **Debug Help:**\n\ntry again");
    }
}
