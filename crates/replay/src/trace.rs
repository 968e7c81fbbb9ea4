use crate::{Replay, ReplayError};
use std::fs;
use std::path::Path;
use tcghub_core::format_number;

impl Replay {
    pub fn to_text_report(&self) -> String {
        let mut lines = vec![
            format!("status: {}", self.status.message()),
            format!(
                "threshold: {} operations: {}",
                format_number(self.threshold),
                self.operations
            ),
            format!("coins: {}", join_coins(&self.initial_coins)),
            String::new(),
            "steps:".to_string(),
        ];
        if self.frames.is_empty() {
            lines.push("  (none)".to_string());
        }
        let mut board = self.board();
        for frame in &self.frames {
            board.merge(frame.new_coin);
            lines.push(format!("  {}", frame.message()));
            lines.push(format!("    coins: {}", join_coins(board.coins())));
        }
        lines.push(String::new());
        lines.push(self.summary());
        lines.join("\n")
    }
}

pub fn join_coins(coins: &[f64]) -> String {
    if coins.is_empty() {
        return "-".to_string();
    }
    coins
        .iter()
        .map(|value| format_number(*value))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn write_json(path: &Path, replay: &Replay) -> Result<(), ReplayError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let body = serde_json::to_string_pretty(replay)?;
    fs::write(path, body)?;
    Ok(())
}

pub fn write_text(path: &Path, replay: &Replay) -> Result<(), ReplayError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, replay.to_text_report())?;
    Ok(())
}
