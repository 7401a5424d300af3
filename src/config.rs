// ABOUTME: Version string, REPL welcome banner, and prompt

pub const VERSION: &str = "1.0.0";
pub const WELCOME_MESSAGE: &str = "MAL interpreter v1.0";
pub const WELCOME_SUBTITLE: &str = "Make-A-Lisp, reader + evaluator core";
pub const PROMPT: &str = "user> ";
