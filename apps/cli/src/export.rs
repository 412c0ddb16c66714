use std::io;
use std::path::{Path, PathBuf};

use chat_core::{ChatMessage, Role};
use chrono::Local;
use serde::Serialize;

#[derive(Serialize)]
struct ChatExport<'a> {
    export_date: String,
    messages: &'a [ChatMessage],
    message_count: usize,
}

pub fn export_to_json(messages: &[ChatMessage], dir: &Path) -> io::Result<PathBuf> {
    let path = dir.join(format!(
        "chat_export_{}.json",
        Local::now().format("%Y%m%d_%H%M%S")
    ));
    let export = ChatExport {
        export_date: Local::now().to_rfc3339(),
        messages,
        message_count: messages.len(),
    };
    let contents = serde_json::to_string_pretty(&export).map_err(io::Error::other)?;
    std::fs::write(&path, contents)?;
    Ok(path)
}

pub fn export_to_txt(messages: &[ChatMessage], dir: &Path) -> io::Result<PathBuf> {
    let path = dir.join(format!(
        "chat_export_{}.txt",
        Local::now().format("%Y%m%d_%H%M%S")
    ));
    let mut text = format!(
        "Chat export from {}\n{}\n\n",
        Local::now().format("%d.%m.%Y %H:%M:%S"),
        "=".repeat(50)
    );
    for message in messages {
        text.push_str(&format!(
            "[{}]: {}\n\n",
            role_label(message.role),
            message.content
        ));
    }
    text.push_str(&format!(
        "{}\nTotal messages: {}\n",
        "=".repeat(50),
        messages.len()
    ));
    std::fs::write(&path, text)?;
    Ok(path)
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::System => "SYSTEM",
        Role::User => "USER",
        Role::Assistant => "ASSISTANT",
    }
}
