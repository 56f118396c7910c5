// Chart report generation.
// Renders a generated chart and profile into a printable HTML document.

pub mod tables;

use std::fmt::Write;

use chrono::Local;

use crate::api::ChartData;
use crate::scoring::{DEFAULT_BIRTH_PLACE, DEFAULT_BIRTH_TIME, UserProfile};

use self::tables::{dasha_info, nakshatra_info, rasi_info, yoga_info};

const PLACEHOLDER: &str = "-";

const STYLE: &str = "body{font-family:'Noto Sans Tamil',sans-serif;margin:32px;color:#2d2d2d}\
h1{color:#8b1e3f}h2{border-bottom:2px solid #d4a017;padding-bottom:4px}\
table{border-collapse:collapse;width:100%}td,th{border:1px solid #ccc;padding:6px;text-align:left}\
.muted{color:#777}";

/// Build the full report document. Pure: no I/O.
pub fn generate_report_html(profile: &UserProfile, chart: &ChartData) -> String {
    let mut html = String::with_capacity(8 * 1024);
    let title = if profile.name.trim().is_empty() {
        "Jathagam Report".to_string()
    } else {
        format!("Jathagam Report - {}", profile.name.trim())
    };

    let _ = write!(
        html,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{}</title><style>{}</style></head><body>",
        escape(&title),
        STYLE
    );
    let _ = write!(html, "<h1>{}</h1>", escape(&title));

    write_birth_details(&mut html, profile);
    write_signs(&mut html, profile, chart);
    write_planets(&mut html, chart);
    write_yogas(&mut html, chart);
    write_dasha(&mut html, chart);

    let _ = write!(
        html,
        "<p class=\"muted\">Generated {}</p></body></html>",
        Local::now().format("%Y-%m-%d %H:%M")
    );
    html
}

fn write_birth_details(html: &mut String, profile: &UserProfile) {
    let value_or = |value: &Option<String>, default: &'static str| -> String {
        value
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(default)
            .to_string()
    };

    html.push_str("<h2>Birth Details</h2><table>");
    row(html, "Date", &value_or(&profile.birth_date, PLACEHOLDER));
    row(html, "Time", &value_or(&profile.birth_time, DEFAULT_BIRTH_TIME));
    row(html, "Place", &value_or(&profile.birth_place, DEFAULT_BIRTH_PLACE));
    html.push_str("</table>");
}

fn write_signs(html: &mut String, profile: &UserProfile, chart: &ChartData) {
    // Chart values win over whatever the profile remembered.
    let rasi = chart.rasi.as_deref().or(profile.rasi.as_deref());
    let nakshatra = chart.nakshatra.as_deref().or(profile.nakshatra.as_deref());

    html.push_str("<h2>Rasi &amp; Nakshatra</h2><table>");
    row(html, "Lagnam", chart.lagnam.as_deref().unwrap_or(PLACEHOLDER));

    match rasi {
        Some(name) => match rasi_info(name) {
            Some(info) => row(
                html,
                "Rasi",
                &format!(
                    "{} ({}) - {} sign ruled by {}",
                    info.tamil, info.english, info.element, info.ruler
                ),
            ),
            None => row(html, "Rasi", name),
        },
        None => row(html, "Rasi", PLACEHOLDER),
    }

    match nakshatra {
        Some(name) => match nakshatra_info(name) {
            Some(info) => {
                row(
                    html,
                    "Nakshatra",
                    &format!("{} ({})", info.tamil, info.english),
                );
                row(html, "Deity", info.deity);
                row(html, "Qualities", info.qualities);
            }
            None => row(html, "Nakshatra", name),
        },
        None => row(html, "Nakshatra", PLACEHOLDER),
    }
    html.push_str("</table>");
}

fn write_planets(html: &mut String, chart: &ChartData) {
    if chart.planets.is_empty() {
        return;
    }

    html.push_str(
        "<h2>Planetary Positions</h2><table><tr><th>Planet</th><th>Rasi</th><th>House</th><th>Degree</th></tr>",
    );
    for planet in &chart.planets {
        let house = planet
            .house
            .map(|h| h.to_string())
            .unwrap_or_else(|| PLACEHOLDER.to_string());
        let degree = planet
            .degree
            .map(|d| format!("{d:.2}°"))
            .unwrap_or_else(|| PLACEHOLDER.to_string());
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&planet.planet),
            escape(planet.rasi.as_deref().unwrap_or(PLACEHOLDER)),
            house,
            degree
        );
    }
    html.push_str("</table>");
}

fn write_yogas(html: &mut String, chart: &ChartData) {
    if chart.yogas.is_empty() {
        return;
    }

    html.push_str("<h2>Yogas</h2><ul>");
    for yoga in &chart.yogas {
        match yoga_info(yoga) {
            Some(info) => {
                let _ = write!(
                    html,
                    "<li><strong>{}</strong> ({}): {}</li>",
                    escape(info.tamil),
                    escape(info.english),
                    escape(info.formation)
                );
            }
            None => {
                let _ = write!(html, "<li><strong>{}</strong></li>", escape(yoga));
            }
        }
    }
    html.push_str("</ul>");
}

fn write_dasha(html: &mut String, chart: &ChartData) {
    let Some(dasha) = &chart.current_dasha else {
        return;
    };
    let Some(lord) = dasha.lord.as_deref() else {
        return;
    };

    html.push_str("<h2>Current Dasha</h2>");
    let period = match (dasha.start.as_deref(), dasha.end.as_deref()) {
        (Some(start), Some(end)) => format!(" ({start} to {end})"),
        _ => String::new(),
    };

    match dasha_info(lord) {
        Some(info) => {
            let _ = write!(
                html,
                "<p><strong>{} ({}) Mahadasha</strong>{}, {} years</p><p>{}</p>",
                escape(info.tamil),
                escape(info.english),
                escape(&period),
                info.years,
                escape(info.prediction)
            );
        }
        None => {
            let _ = write!(
                html,
                "<p><strong>{} Mahadasha</strong>{}</p>",
                escape(lord),
                escape(&period)
            );
        }
    }
}

fn row(html: &mut String, label: &str, value: &str) {
    let _ = write!(
        html,
        "<tr><th>{}</th><td>{}</td></tr>",
        escape(label),
        escape(value)
    );
}

/// Escape text for HTML element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
