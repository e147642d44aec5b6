//! Command grammar for incoming messages.
//!
//! Pure parsing, no side effects: text in, `Command` out. Anything not
//! starting with `/` is a freeform outfit request. The `@botname` suffix
//! Telegram appends in groups is stripped before matching.

use fitcheck_core::item::ItemStatus;

/// A parsed incoming message.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Start,
    /// Ask for an outfit. The payload is the occasion, possibly empty.
    Outfit(String),
    /// Add one item from a single line ("categoria: nombre | k: v").
    Add(String),
    /// Enter detailed-add capture mode for the next message.
    AddPro,
    /// Enter bulk-ingest capture mode for the next message.
    Bulk,
    /// Change an item's status. Payload is "query" or "query | reason".
    Status { status: ItemStatus, args: String },
    Closet,
    Available(Option<String>),
    Feedback(String),
    /// `/daily on`, `/daily off`, or bare `/daily` to show the state.
    Daily(Option<bool>),
    ProfileShow,
    ProfileSet { field: String, value: String },
    List(ListCommand),
    Unknown(String),
    /// Non-command text: treated as an outfit request.
    Freeform(String),
}

/// `/list` subcommands.
#[derive(Debug, Clone, PartialEq)]
pub enum ListCommand {
    New { name: String, description: Option<String> },
    Delete(String),
    AddItem { name: String, text: String },
    Remove { name: String, index_raw: String },
    Show(String),
    All,
    Usage,
}

/// Parse one incoming message.
pub fn parse(text: &str) -> Command {
    let text = text.trim();
    if !text.starts_with('/') {
        return Command::Freeform(text.to_string());
    }

    let (token, rest) = match text.split_once(char::is_whitespace) {
        Some((t, r)) => (t, r.trim()),
        None => (text, ""),
    };
    // "/outfit@fitcheck_bot" → "/outfit"
    let token = token.split('@').next().unwrap_or(token).to_lowercase();

    match token.as_str() {
        "/start" => Command::Start,
        "/outfit" => Command::Outfit(rest.to_string()),
        "/add" => Command::Add(rest.to_string()),
        "/addpro" => Command::AddPro,
        "/bulk" => Command::Bulk,
        "/dirty" => Command::Status {
            status: ItemStatus::Dirty,
            args: rest.to_string(),
        },
        "/clean" => Command::Status {
            status: ItemStatus::Clean,
            args: rest.to_string(),
        },
        "/lost" => Command::Status {
            status: ItemStatus::Lost,
            args: rest.to_string(),
        },
        "/damaged" => Command::Status {
            status: ItemStatus::Damaged,
            args: rest.to_string(),
        },
        "/closet" => Command::Closet,
        "/available" => Command::Available(if rest.is_empty() {
            None
        } else {
            Some(rest.to_lowercase())
        }),
        "/feedback" => Command::Feedback(rest.to_string()),
        "/daily" => Command::Daily(match rest.to_lowercase().as_str() {
            "on" => Some(true),
            "off" => Some(false),
            _ => None,
        }),
        "/profile" => {
            if rest.is_empty() {
                Command::ProfileShow
            } else {
                let (field, value) = match rest.split_once(char::is_whitespace) {
                    Some((f, v)) => (f.to_string(), v.trim().to_string()),
                    None => (rest.to_string(), String::new()),
                };
                Command::ProfileSet { field, value }
            }
        }
        "/list" => Command::List(parse_list(rest)),
        _ => Command::Unknown(token),
    }
}

fn parse_list(rest: &str) -> ListCommand {
    if rest.is_empty() {
        return ListCommand::All;
    }

    let (sub, args) = match rest.split_once(char::is_whitespace) {
        Some((s, a)) => (s.to_lowercase(), a.trim()),
        None => (rest.to_lowercase(), ""),
    };

    match sub.as_str() {
        "all" => ListCommand::All,
        "new" if !args.is_empty() => {
            let (name, description) = match args.split_once('|') {
                Some((n, d)) => (n.trim().to_string(), Some(d.trim().to_string())),
                None => (args.to_string(), None),
            };
            ListCommand::New { name, description }
        }
        "del" if !args.is_empty() => ListCommand::Delete(args.to_string()),
        "add" => match args.split_once('|') {
            Some((name, text)) if !name.trim().is_empty() && !text.trim().is_empty() => {
                ListCommand::AddItem {
                    name: name.trim().to_string(),
                    text: text.trim().to_string(),
                }
            }
            _ => ListCommand::Usage,
        },
        "rm" => match args.rsplit_once(char::is_whitespace) {
            Some((name, index)) if !name.trim().is_empty() => ListCommand::Remove {
                name: name.trim().to_string(),
                index_raw: index.to_string(),
            },
            _ => ListCommand::Usage,
        },
        "show" if !args.is_empty() => ListCommand::Show(args.to_string()),
        _ => ListCommand::Usage,
    }
}
