//! Colorized society pulse logging for quick CLI scanning.

use bevy_ecs::prelude::*;
use colored::{Color, Colorize};
use tracing::{debug, info};

use crate::simulation::{
    ClassId, ClassMetrics, CurrentSnapshot, MetricsHistory, PolicyEvent, PolicyEventLog,
    Sentiment, SimulationConfig, SocietySummary, WorldTime, tier_color,
};

fn badge(label: &str, color: Color) -> String {
    format!("[{}]", label).color(color).to_string()
}

fn category_color(category: &str) -> Color {
    match category {
        "CreamyLayer" => Color::BrightYellow,
        "Support" => Color::BrightCyan,
        "Crime" => Color::BrightRed,
        "Policy" => Color::BrightMagenta,
        _ => Color::White,
    }
}

fn sentiment_tag(sentiment: Sentiment) -> String {
    match sentiment {
        Sentiment::Positive => badge("+", Color::BrightGreen),
        Sentiment::Neutral => badge("=", Color::Yellow),
        Sentiment::Negative => badge("-", Color::BrightRed),
    }
}

pub fn format_number_commas(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn format_gdp(gdp: f64) -> String {
    if gdp.is_finite() && gdp >= 0.0 {
        format_number_commas(gdp.round() as u64)
    } else {
        format!("{gdp:.0}")
    }
}

fn format_event_line(event: &PolicyEvent) -> String {
    format!(
        "{} {} {} {}",
        badge(event.category(), category_color(event.category())),
        sentiment_tag(event.sentiment()),
        badge(&format!("Tick {}", event.tick), Color::BrightBlack),
        event.headline(),
    )
}

fn format_summary_line(summary: &SocietySummary) -> String {
    format!(
        "{} GDP/cap {} | poverty {:.1}% | tertiary {:.1}% | jobs {:.1}% | life {:.1}y | {} {}",
        badge("Society", Color::BrightWhite),
        format_gdp(summary.gdp_per_capita).as_str().bold(),
        summary.poverty_rate,
        summary.tertiary_education,
        summary.job_access,
        summary.life_expectancy,
        badge(
            &format!("Crime {}", summary.crime_level.label()),
            summary.crime_level.color()
        ),
        badge(
            &format!("Trust {:.0}%", summary.trust_in_government_pct()),
            Color::BrightBlue
        ),
    )
}

fn format_class_line(tier: usize, class: &ClassId, metrics: &ClassMetrics) -> String {
    format!(
        "{} pop {:.3} | GDP/cap {} | poverty {:.1}% | edu {:.1}/{:.1}/{:.1} | jobs {:.1}% | wealth {:.2}",
        badge(class.as_str(), tier_color(tier)),
        metrics.population,
        format_gdp(metrics.gdp_per_capita),
        metrics.poverty_rate,
        metrics.education.primary,
        metrics.education.secondary,
        metrics.education.tertiary,
        metrics.job_access,
        metrics.wealth,
    )
}

pub fn logging_system(
    time: Res<WorldTime>,
    config: Res<SimulationConfig>,
    current: Res<CurrentSnapshot>,
    history: Res<MetricsHistory>,
    events: Res<PolicyEventLog>,
) {
    if config.log_every == 0 || time.tick % config.log_every != 0 {
        return;
    }

    let header_line = format!(
        "{} {} {}",
        badge("Pulse", Color::BrightWhite),
        badge(&format!("Tick {}", time.tick), Color::BrightBlack),
        badge(&format!("Year {}", config.year_for_tick(time.tick)), Color::BrightCyan),
    );

    let mut lines = vec![header_line];
    if let Some(summary) = history.latest() {
        lines.push(format_summary_line(summary));
    }

    let mut has_event = false;
    for event in events.for_tick(time.tick) {
        has_event = true;
        lines.push(format_event_line(event));
    }
    if !has_event {
        lines.push(
            "[Event] No policy milestones this tick"
                .color(Color::BrightBlack)
                .to_string(),
        );
    }

    info!("\n{}", lines.join("\n"));

    for (tier, (class, metrics)) in current.0.iter().enumerate() {
        debug!("{}", format_class_line(tier, class, metrics));
    }
}
