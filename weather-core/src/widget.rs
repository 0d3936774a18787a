//! Display-side state for the weather card.
//!
//! [`Widget`] holds what a front-end needs to draw the card and decides when
//! a new fetch is due. It does no I/O; callers feed it clock readings and
//! fetch results.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::model::{Conditions, SnapshotLocation, Temperature, WeatherSnapshot, Wind};

pub const REFRESH_INTERVAL: Duration = Duration::from_secs(900);
/// Interval and focus triggers inside this window of the last request are dropped.
pub const DEDUPE_WINDOW: Duration = Duration::from_secs(300);
/// How long a fetch may run before the card stops showing a spinner.
pub const FALLBACK_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// First draw. Always fetches.
    Mount,
    Interval,
    /// The view regained focus.
    Focus,
}

/// Snapshot shown before the first successful fetch and after failures.
pub fn fallback_snapshot(now: DateTime<Utc>) -> WeatherSnapshot {
    WeatherSnapshot {
        location: SnapshotLocation { city: "Philadelphia".into(), country: "US".into() },
        temperature: Temperature { current: 72, feels_like: 73, min: 68, max: 75 },
        weather: Conditions {
            main: "Clear".into(),
            description: "clear sky".into(),
            icon: "01d".into(),
        },
        wind: Wind { speed: 5, deg: Some(220) },
        humidity: 65,
        timestamp: now,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherIcon {
    ClearDay,
    ClearNight,
    Cloud,
    Cloudy,
    Rain,
    Snow,
    Thunderstorm,
    Fog,
}

impl WeatherIcon {
    /// Pick an icon from the condition group (`weather.main`) and the icon
    /// code, whose `d`/`n` suffix tells day from night.
    pub fn select(main: &str, icon: &str) -> Self {
        let is_day = icon.contains('d');
        let condition = main.to_lowercase();
        let has = |s: &str| condition.contains(s);

        if has("clear") {
            if is_day { Self::ClearDay } else { Self::ClearNight }
        } else if has("cloud") && !has("broken") {
            Self::Cloud
        } else if has("broken") || has("overcast") {
            Self::Cloudy
        } else if has("rain") || has("drizzle") {
            Self::Rain
        } else if has("snow") {
            Self::Snow
        } else if has("thunder") {
            Self::Thunderstorm
        } else if has("fog") || has("mist") || has("haze") {
            Self::Fog
        } else {
            Self::ClearDay
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Self::ClearDay => "☀",
            Self::ClearNight => "☾",
            Self::Cloud => "☁",
            Self::Cloudy => "☁☁",
            Self::Rain => "☂",
            Self::Snow => "❄",
            Self::Thunderstorm => "⚡",
            Self::Fog => "≋",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Widget {
    data: WeatherSnapshot,
    loading_since: Option<Instant>,
    error: Option<String>,
    show_fallback: bool,
    last_request: Option<Instant>,
}

impl Widget {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            data: fallback_snapshot(now),
            loading_since: None,
            error: None,
            show_fallback: false,
            last_request: None,
        }
    }

    /// Whether `trigger` should start a request at `now`. Never while one is
    /// already in flight.
    pub fn should_fetch(&self, trigger: Trigger, now: Instant) -> bool {
        if self.loading_since.is_some() {
            return false;
        }
        match (trigger, self.last_request) {
            (Trigger::Mount, _) | (_, None) => true,
            (_, Some(last)) => now.saturating_duration_since(last) >= DEDUPE_WINDOW,
        }
    }

    pub fn begin(&mut self, now: Instant) {
        self.loading_since = Some(now);
        self.last_request = Some(now);
        self.show_fallback = false;
    }

    /// Advance the fallback timer. Returns `true` when the view changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.loading_since {
            Some(started)
                if !self.show_fallback
                    && now.saturating_duration_since(started) >= FALLBACK_DELAY =>
            {
                self.show_fallback = true;
                true
            }
            _ => false,
        }
    }

    /// Record the outcome of the request started by [`Widget::begin`].
    pub fn finish(&mut self, now: DateTime<Utc>, result: Result<WeatherSnapshot, String>) {
        self.loading_since = None;
        self.show_fallback = false;
        match result {
            Ok(snapshot) => {
                self.data = snapshot;
                self.error = None;
            }
            Err(message) => {
                self.data = fallback_snapshot(now);
                self.error = Some(message);
            }
        }
    }

    /// True while a request runs and the fallback delay hasn't passed.
    pub fn is_loading(&self) -> bool {
        self.loading_since.is_some() && !self.show_fallback
    }

    pub fn show_fallback(&self) -> bool {
        self.show_fallback
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn snapshot(&self) -> &WeatherSnapshot {
        &self.data
    }

    pub fn icon(&self) -> WeatherIcon {
        WeatherIcon::select(&self.data.weather.main, &self.data.weather.icon)
    }

    pub fn headline(&self) -> &'static str {
        if self.is_loading() {
            "Fetching weather..."
        } else if self.error.is_some() {
            "Weather unavailable"
        } else {
            "Current Weather"
        }
    }

    /// Plain-text card.
    pub fn render(&self) -> String {
        let mut out = format!("⌖ {}\n", self.headline());

        if self.is_loading() {
            out.push_str("  ░░░░  ░░░░░░░░░░\n        ░░░░░░░░\n");
            return out;
        }

        let w = &self.data;
        out.push_str(&format!(
            "  {:<3} {}°F  {}\n",
            self.icon().glyph(),
            w.temperature.current,
            w.location.city
        ));
        out.push_str(&format!("      {}\n", capitalize_words(&w.weather.description)));
        out.push_str(&format!("      wind {} mph  humidity {}%\n", w.wind.speed, w.humidity));
        out
    }
}

fn capitalize_words(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
