//! 端末への描画
//!
//! [`SessionView`] の差分だけを出力する。進捗表示は indicatif のスピナー。

use crate::orchestrator::Renderer;
use gmb_sanitizer_common::{SessionView, StatusKind};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
struct Printed {
    spinner: Option<ProgressBar>,
    status: Option<String>,
    location: Option<String>,
    filename: Option<String>,
    verify: Option<String>,
    file_count: usize,
}

#[derive(Default)]
pub struct TerminalRenderer {
    printed: Mutex<Printed>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

/// 値が変わった場合だけ返す
fn changed(previous: &mut Option<String>, current: &Option<String>) -> Option<String> {
    if previous == current {
        return None;
    }
    *previous = current.clone();
    current.clone()
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

impl Renderer for TerminalRenderer {
    fn render(&self, view: &SessionView) {
        let mut printed = self.printed.lock().unwrap_or_else(|p| p.into_inner());

        if view.file_tags.len() != printed.file_count {
            printed.file_count = view.file_tags.len();
            if !view.file_tags.is_empty() {
                println!("✔ {} foto(s) seleccionada(s)", view.file_tags.len());
                for tag in &view.file_tags {
                    println!("  - {}", tag);
                }
            }
        }

        if let Some(location) = changed(&mut printed.location, &view.location_preview) {
            println!("📍 {}", location);
        }
        if let Some(filename) = changed(&mut printed.filename, &view.filename_preview) {
            println!("📄 Archivo: {}", filename);
        }

        match (&view.progress, printed.spinner.take()) {
            (Some(message), None) => printed.spinner = Some(spinner(message)),
            (Some(_), Some(bar)) => printed.spinner = Some(bar),
            (None, Some(bar)) => bar.finish_and_clear(),
            (None, None) => {}
        }

        let status_text = view.status.as_ref().map(|s| s.text.clone());
        if let Some(text) = changed(&mut printed.status, &status_text) {
            match view.status.as_ref().map(|s| s.kind) {
                Some(StatusKind::Success) => println!("{}", text),
                _ => eprintln!("{}", text),
            }
        }

        if let Some(text) = changed(&mut printed.verify, &view.verify) {
            println!("{}", text);
        }
    }

    fn artifact_saved(&self, path: &Path) {
        println!("💾 ZIP guardado: {}", path.display());
    }
}
