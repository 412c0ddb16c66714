use std::io;

use chat_app::AppState;
use chat_client::CompletionClient;
use chat_core::ChatMessage;

use crate::export;
use crate::spinner::Spinner;
use crate::views;

const SYSTEM_MESSAGE: &str = "You are a helpful assistant.";

pub fn run_chat(state: &AppState) -> io::Result<()> {
    let settings = match state.services.settings.get() {
        Ok(settings) => settings,
        Err(err) => {
            views::display_error("settings", &err);
            return Ok(());
        }
    };
    let client = match CompletionClient::new(&settings.endpoint, &settings.api_key) {
        Ok(client) => client,
        Err(err) => {
            views::display_error("client", &err);
            return Ok(());
        }
    };

    println!();
    println!("Chatting with {} (type 'exit' to leave,", settings.model_id);
    println!("'/export json' or '/export txt' to save the transcript).");

    let mut messages = vec![ChatMessage::system(SYSTEM_MESSAGE)];
    loop {
        let Some(line) = views::read_line("you> ")? else {
            break;
        };
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("exit") {
            break;
        }
        if let Some(rest) = line.strip_prefix("/export") {
            handle_export(rest.trim(), &messages)?;
            continue;
        }

        messages.push(ChatMessage::user(line));
        let spinner = Spinner::start("waiting for the model");
        let result = client.send(&messages, &settings.model_id);
        spinner.stop();

        match result {
            Ok(completion) => {
                if let Some(usage) = completion.usage {
                    if let Err(err) = state.services.usage.record(
                        usage.input_tokens as i64,
                        usage.output_tokens as i64,
                        &settings.model_id,
                    ) {
                        views::display_error("usage", &err);
                    }
                    println!("ai> {} [{} tokens]", completion.content, usage.output_tokens);
                } else {
                    println!("ai> {}", completion.content);
                }
                messages.push(ChatMessage::assistant(completion.content));
            }
            Err(err) => {
                views::display_error("api", &err);
                // drop the unanswered user turn so a retry resends cleanly
                messages.pop();
            }
        }
    }
    Ok(())
}

fn handle_export(format: &str, messages: &[ChatMessage]) -> io::Result<()> {
    let cwd = std::env::current_dir()?;
    let result = match format {
        "json" | "" => export::export_to_json(messages, &cwd),
        "txt" => export::export_to_txt(messages, &cwd),
        _ => {
            println!("Unknown export format: {format} (expected 'json' or 'txt')");
            return Ok(());
        }
    };
    match result {
        Ok(path) => println!("Exported to {}", path.display()),
        Err(err) => views::display_error("export", &err),
    }
    Ok(())
}
