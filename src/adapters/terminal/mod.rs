//! Terminal adapters: console implementations and the session menu.

mod scripted_console;
mod session_menu;
mod stdio_console;

pub use scripted_console::ScriptedConsole;
pub use session_menu::{MenuChoice, SessionMenu};
pub use stdio_console::StdioConsole;
