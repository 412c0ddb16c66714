use std::fmt::Write as _;
use std::io::{self, Write};

use chat_app::AppState;
use chat_core::{AggregateStats, SettingsPatch};
use chrono::Local;

use crate::chat;

/// Prompts and reads one trimmed line; `None` on EOF.
pub fn read_line(prompt: &str) -> io::Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

pub fn run_main_menu(state: &AppState) -> io::Result<()> {
    println!("ChatAI CLI");
    loop {
        println!();
        println!("1) New chat");
        println!("2) Settings");
        println!("3) Usage stats");
        println!("4) Quit");
        let Some(choice) = read_line("> ")? else {
            break;
        };
        match choice.as_str() {
            "1" => chat::run_chat(state)?,
            "2" => settings_menu(state)?,
            "3" => show_stats(state),
            "4" | "q" | "quit" | "exit" => break,
            "" => {}
            _ => println!("Invalid option: {choice}"),
        }
    }
    println!("Goodbye!");
    Ok(())
}

fn settings_menu(state: &AppState) -> io::Result<()> {
    loop {
        let settings = match state.services.settings.get() {
            Ok(settings) => settings,
            Err(err) => {
                display_error("settings", &err);
                return Ok(());
            }
        };
        println!();
        println!("Model:    {}", settings.model_id);
        println!("Endpoint: {}", settings.endpoint);
        println!("API key:  {}", mask_api_key(&settings.api_key));
        println!();
        println!("1) Change model");
        println!("2) Change endpoint");
        println!("3) Change API key");
        println!("4) Back");
        let Some(choice) = read_line("> ")? else {
            return Ok(());
        };
        let patch = match choice.as_str() {
            "1" => prompt_patch("New model: ", |value| SettingsPatch {
                model_id: Some(value),
                ..Default::default()
            })?,
            "2" => prompt_patch("New endpoint: ", |value| SettingsPatch {
                endpoint: Some(value),
                ..Default::default()
            })?,
            "3" => prompt_patch("New API key: ", |value| SettingsPatch {
                api_key: Some(value),
                ..Default::default()
            })?,
            "4" | "" => return Ok(()),
            _ => {
                println!("Invalid option: {choice}");
                continue;
            }
        };
        let Some(patch) = patch else {
            println!("Unchanged.");
            continue;
        };
        match state.services.settings.merge(&patch) {
            Ok(_) => println!("Saved."),
            Err(err) => display_error("settings", &err),
        }
    }
}

fn prompt_patch(
    prompt: &str,
    build: impl FnOnce(String) -> SettingsPatch,
) -> io::Result<Option<SettingsPatch>> {
    let Some(value) = read_line(prompt)? else {
        return Ok(None);
    };
    if value.is_empty() {
        return Ok(None);
    }
    Ok(Some(build(value)))
}

fn show_stats(state: &AppState) {
    let today = Local::now().date_naive();
    match state.services.usage.period_stats(today) {
        Ok(stats) => print!("{}", format_stats(&format!("Today ({today})"), &stats)),
        Err(err) => display_error("stats", &err),
    }
    match state.services.usage.all_time_stats() {
        Ok(stats) => {
            let title = match state.services.usage.first_recorded_day() {
                Ok(Some(first)) => format!("All time (since {first})"),
                _ => "All time".to_string(),
            };
            print!("{}", format_stats(&title, &stats));
        }
        Err(err) => display_error("stats", &err),
    }
}

fn format_stats(title: &str, stats: &AggregateStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "{title}");
    let _ = writeln!(
        out,
        "  requests: {}  input: {}  output: {}  total: {}",
        stats.requests, stats.input_tokens, stats.output_tokens, stats.total_tokens
    );
    for (model, usage) in &stats.models {
        let _ = writeln!(
            out,
            "  {model}: {} requests, {} input, {} output",
            usage.requests, usage.input_tokens, usage.output_tokens
        );
    }
    out
}

fn mask_api_key(api_key: &str) -> String {
    if api_key.is_empty() {
        return "(not set)".to_string();
    }
    let visible: String = api_key.chars().take(4).collect();
    format!("{visible}…")
}

pub fn display_error(kind: &str, err: &dyn std::fmt::Display) {
    println!("[{kind} error] {err}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_core::ModelUsage;

    #[test]
    fn stats_are_rendered_with_per_model_lines() {
        let mut stats = AggregateStats {
            requests: 2,
            input_tokens: 13,
            output_tokens: 7,
            total_tokens: 20,
            ..Default::default()
        };
        stats.models.insert(
            "model-a".to_string(),
            ModelUsage {
                requests: 2,
                input_tokens: 13,
                output_tokens: 7,
            },
        );
        let rendered = format_stats("Today", &stats);
        assert!(rendered.contains("Today"));
        assert!(rendered.contains("requests: 2  input: 13  output: 7  total: 20"));
        assert!(rendered.contains("model-a: 2 requests, 13 input, 7 output"));
    }

    #[test]
    fn api_key_is_masked() {
        assert_eq!(mask_api_key(""), "(not set)");
        assert_eq!(mask_api_key("io-secret-key"), "io-s…");
    }
}
