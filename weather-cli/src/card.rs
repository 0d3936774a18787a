//! Terminal weather card fed by the widget server's `/api/weather`.

use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use reqwest::Client;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use weather_widget_core::{
    WeatherSnapshot, Widget,
    widget::{FALLBACK_DELAY, REFRESH_INTERVAL, Trigger},
};

#[derive(Debug, Clone)]
pub struct WeatherFeed {
    url: String,
    http: Client,
}

impl WeatherFeed {
    pub fn new(server: &str) -> Self {
        Self {
            url: format!("{}/api/weather", server.trim_end_matches('/')),
            http: Client::new(),
        }
    }

    pub async fn fetch(&self) -> Result<WeatherSnapshot> {
        let res = self
            .http
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", self.url))?;

        let status = res.status();
        if !status.is_success() {
            return Err(anyhow!("{} returned status {}", self.url, status));
        }

        res.json::<WeatherSnapshot>()
            .await
            .context("Failed to parse weather response")
    }
}

/// Run one fetch if `trigger` allows it, calling `draw` whenever the card
/// changes: at the start, when the fallback delay passes, and at the end.
/// Returns whether a request was made.
pub async fn refresh<F>(widget: &mut Widget, feed: &WeatherFeed, trigger: Trigger, mut draw: F) -> bool
where
    F: FnMut(&Widget),
{
    if !widget.should_fetch(trigger, Instant::now()) {
        tracing::debug!(?trigger, "skipping refresh inside dedupe window");
        return false;
    }

    widget.begin(Instant::now());
    draw(widget);

    let fetch = feed.fetch();
    tokio::pin!(fetch);
    let fallback = tokio::time::sleep(FALLBACK_DELAY);
    tokio::pin!(fallback);

    let mut fallback_fired = false;

    let result = loop {
        tokio::select! {
            res = &mut fetch => break res,
            _ = &mut fallback, if !fallback_fired => {
                fallback_fired = true;
                if widget.tick(Instant::now()) {
                    draw(widget);
                }
            }
        }
    };

    if let Err(e) = &result {
        tracing::warn!(error = %format!("{e:#}"), "weather fetch failed; showing fallback");
    }
    widget.finish(Utc::now(), result.map_err(|e| format!("{e:#}")));
    draw(widget);
    true
}

/// Poll until Ctrl-C. An Enter keypress counts as the view regaining focus.
pub async fn run(feed: WeatherFeed, once: bool) -> Result<()> {
    let mut widget = Widget::new(Utc::now());
    let draw = |w: &Widget| {
        if !once {
            print!("\x1B[2J\x1B[H");
        }
        println!("{}", w.render());
    };

    refresh(&mut widget, &feed, Trigger::Mount, draw).await;
    if once {
        return Ok(());
    }

    let (focus_tx, mut focus_rx) = mpsc::channel::<()>(4);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(_)) = lines.next_line().await {
            if focus_tx.send(()).await.is_err() {
                break;
            }
        }
    });

    let mut interval = tokio::time::interval(REFRESH_INTERVAL);
    // The first tick fires immediately and mount already fetched.
    interval.tick().await;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                refresh(&mut widget, &feed, Trigger::Interval, draw).await;
            }
            Some(()) = focus_rx.recv() => {
                refresh(&mut widget, &feed, Trigger::Focus, draw).await;
            }
            res = &mut ctrl_c => {
                res.context("Failed to listen for Ctrl-C")?;
                break;
            }
        }
    }

    Ok(())
}
