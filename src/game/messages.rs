//! Player-facing text.
//!
//! Every line the session sends goes through [`Messages`]. Templates use
//! `{seconds}`, `{id}`, `{name}` and `{score}` placeholders.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Built-in message catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    /// English
    #[default]
    En,
    /// Japanese
    Ja,
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::En => write!(f, "en"),
            Self::Ja => write!(f, "ja"),
        }
    }
}

/// Message templates, one per outbound line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Messages {
    /// Echo of every received script event (`{id}`)
    pub received: String,
    /// Countdown line (`{seconds}`)
    pub countdown: String,
    /// Cage opens
    pub round_start: String,
    /// Scoreboard is about to disappear
    pub one_minute_warning: String,
    /// Round is over
    pub round_end: String,
    /// Winner announcement (`{name}`, `{score}`)
    pub winner: String,
    /// Action-bar readout (`{seconds}`)
    pub time_remaining: String,
    /// Scoreboard title
    pub objective_title: String,
}

impl Messages {
    /// Returns the built-in catalog for a locale.
    #[must_use]
    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::En => Self {
                received: "received: {id}".to_string(),
                countdown: "Game starts in {seconds}s".to_string(),
                round_start: "Game start!".to_string(),
                one_minute_warning: "One minute left!".to_string(),
                round_end: "Game over!".to_string(),
                winner: "Winner: {name} ({score} blocks)".to_string(),
                time_remaining: "Time left: {seconds}s".to_string(),
                objective_title: "distance from start".to_string(),
            },
            Locale::Ja => Self {
                received: "受信: {id}".to_string(),
                countdown: "ゲーム開始まで: {seconds}秒".to_string(),
                round_start: "ゲームスタート！".to_string(),
                one_minute_warning: "ゲーム終了1分前！".to_string(),
                round_end: "ゲーム終了！".to_string(),
                winner: "勝者: {name} ({score}ブロック)".to_string(),
                time_remaining: "ゲーム残り時間: {seconds}秒".to_string(),
                objective_title: "スタート地点からの距離".to_string(),
            },
        }
    }

    /// Replaces individual templates with configured overrides.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &MessageOverrides) -> Self {
        let pairs = [
            (&mut self.received, &overrides.received),
            (&mut self.countdown, &overrides.countdown),
            (&mut self.round_start, &overrides.round_start),
            (&mut self.one_minute_warning, &overrides.one_minute_warning),
            (&mut self.round_end, &overrides.round_end),
            (&mut self.winner, &overrides.winner),
            (&mut self.time_remaining, &overrides.time_remaining),
            (&mut self.objective_title, &overrides.objective_title),
        ];
        for (slot, value) in pairs {
            if let Some(value) = value {
                slot.clone_from(value);
            }
        }
        self
    }

    /// Echo line for a received event.
    #[must_use]
    pub fn received(&self, id: &str) -> String {
        self.received.replace("{id}", id)
    }

    /// Countdown line.
    #[must_use]
    pub fn countdown(&self, seconds: u32) -> String {
        self.countdown.replace("{seconds}", &seconds.to_string())
    }

    /// Action-bar readout.
    #[must_use]
    pub fn time_remaining(&self, seconds: u32) -> String {
        self.time_remaining.replace("{seconds}", &seconds.to_string())
    }

    /// Winner announcement.
    #[must_use]
    pub fn winner(&self, name: &str, score: i32) -> String {
        render(&self.winner, &[("{name}", name), ("{score}", &score.to_string())])
    }
}

/// Substitutes placeholders in a single left-to-right pass, so values are
/// never themselves scanned for placeholders.
fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    'scan: while let Some(at) = rest.find('{') {
        out.push_str(&rest[..at]);
        rest = &rest[at..];
        for (key, value) in values {
            if let Some(tail) = rest.strip_prefix(key) {
                out.push_str(value);
                rest = tail;
                continue 'scan;
            }
        }
        out.push('{');
        rest = &rest[1..];
    }
    out.push_str(rest);
    out
}

impl Default for Messages {
    fn default() -> Self {
        Self::for_locale(Locale::default())
    }
}

/// Optional per-line replacements read from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MessageOverrides {
    /// Replaces [`Messages::received`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<String>,
    /// Replaces [`Messages::countdown`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countdown: Option<String>,
    /// Replaces [`Messages::round_start`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round_start: Option<String>,
    /// Replaces [`Messages::one_minute_warning`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_minute_warning: Option<String>,
    /// Replaces [`Messages::round_end`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round_end: Option<String>,
    /// Replaces [`Messages::winner`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
    /// Replaces [`Messages::time_remaining`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_remaining: Option<String>,
    /// Replaces [`Messages::objective_title`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective_title: Option<String>,
}
