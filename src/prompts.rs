//! Fixed texts: the system instruction, per-command directives and canned replies.

/// System instruction injected at the head of every completion request.
pub const SYSTEM_PROMPT: &str = r#"You are a Code Helper Bot for team chat. You specialize in:
- Explaining programming concepts
- Debugging code issues
- Code reviews and suggestions
- Best practices and patterns
- Language-specific help (JavaScript, TypeScript, Python, etc.)
- Architecture and design questions

Keep responses concise but helpful. Use code blocks for code examples. Be friendly and encouraging."#;

pub fn review_prompt(code: &str) -> String {
    format!(
        "Please review this code and provide constructive feedback on:\n\
         - Code quality and readability\n\
         - Potential bugs or issues\n\
         - Performance improvements\n\
         - Best practices\n\
         - Security considerations if applicable\n\
         \n\
         Code to review:\n\
         {code}"
    )
}

pub fn debug_prompt(issue: &str) -> String {
    format!(
        "Help me debug this issue. Provide step-by-step debugging suggestions and potential solutions:\n\n{issue}"
    )
}

pub fn explain_prompt(concept: &str) -> String {
    format!(
        "Please explain this programming concept in a clear, beginner-friendly way with examples:\n\n{concept}"
    )
}

pub fn best_practices_prompt(technology: &str) -> String {
    format!("Provide best practices and recommendations for: {technology}")
}

/// Reply recorded and sent when the completion service fails.
pub const APOLOGY_REPLY: &str =
    "Sorry, I'm having trouble connecting to my AI brain right now. Please try again later.";

/// Reply used when the completion service answers without any text.
pub const EMPTY_COMPLETION_REPLY: &str = "I'm having trouble processing that right now.";

/// Reply used when the conversation state store cannot be reached.
pub const STATE_UNAVAILABLE_REPLY: &str =
    "Sorry, I couldn't access this conversation right now. Please try again in a moment.";

pub const EMPTY_MESSAGE_REPLY: &str =
    "I didn't receive any text. Please ask me a coding question!";

pub const WELCOME_MESSAGE: &str = "👋 **Welcome to Code Helper Bot!**\n\n\
I'm your AI-powered coding assistant, ready to help with:\n\
• Code reviews and debugging\n\
• Programming concepts and explanations\n\
• Best practices and architecture advice\n\
• Language-specific questions\n\n\
Type **/help** to see all available commands, or just ask me any coding question!";

pub const CLEAR_CONFIRMATION: &str = "🎆 **Complete Conversation Clear!**\n\n\
Everything has been wiped clean:\n\
• All conversation history deleted\n\
• Message count reset to 0\n\
• Fresh start with no context\n\n\
I'm ready to help you with any coding questions!";

pub const RESET_CONFIRMATION: &str = "🔄 Conversation history cleared! Ready for a fresh start.";

pub const HELP_EXAMPLES: &str = "**Examples:**\n\
• \"How do I handle async/await in JavaScript?\"\n\
• \"/review function add(a,b) { return a+b; }\"\n\
• \"/debug TypeError: Cannot read property 'length' of undefined\"\n\
• \"/explain dependency injection\"";
