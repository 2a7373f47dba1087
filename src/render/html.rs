//! Server-rendered dashboard page

use std::fmt::Write;

use super::{CurrentSummary, DailyTable, ForecastView, chart};
use crate::dashboard::{DashboardRequest, DashboardResults, DashboardState};
use crate::models::{DailyVariable, HourlyVariable, MAX_FORECAST_DAYS};
use crate::weather::geocode::MAX_RESULTS;
use crate::{DashboardError, Result};

const STYLE: &str = "
body { font-family: system-ui, sans-serif; margin: 0; display: flex; color: #222; }
aside { width: 18rem; padding: 1rem; background: #f4f6f8; min-height: 100vh; box-sizing: border-box; }
main { flex: 1; padding: 1rem 2rem; max-width: 60rem; }
label { display: block; margin: .5rem 0 .2rem; font-weight: 600; }
fieldset { border: 1px solid #ccd; margin: .6rem 0; }
fieldset label { font-weight: normal; margin: .1rem 0; }
.notice { padding: .8rem 1rem; border-radius: 4px; margin: 1rem 0; }
.info { background: #e7f1fb; }
.warning { background: #fdf3d8; }
.error { background: #fbe3e3; }
.metrics { display: flex; gap: 2rem; }
.metric strong { display: block; font-size: 1.4rem; }
.chart svg { width: 100%; height: auto; }
table { border-collapse: collapse; }
th, td { border: 1px solid #ddd; padding: .3rem .6rem; text-align: right; }
iframe { width: 100%; height: 320px; border: 1px solid #ccc; }
pre { background: #f6f6f6; padding: .8rem; overflow: auto; max-height: 30rem; }
";

/// Escape text for HTML bodies and attribute values
#[must_use]
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

/// Render the whole page for `request` and the outcome of running it
#[must_use]
pub fn render_page(request: &DashboardRequest, outcome: &Result<DashboardState>) -> String {
    let mut page = String::from(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>Weather Dashboard</title><style>",
    );
    page.push_str(STYLE);
    page.push_str("</style></head><body>");
    page.push_str(&controls(request));
    page.push_str("<main><h1>Weather Dashboard</h1>");

    match outcome {
        Ok(DashboardState::AwaitingQuery) => page.push_str(&notice(
            "info",
            "Enter a location in the sidebar and press Search.",
        )),
        Ok(DashboardState::NoResults { query }) => page.push_str(&notice(
            "warning",
            &DashboardError::empty_result(query.as_str()).user_message(),
        )),
        Ok(DashboardState::ShowingResults(results)) => page.push_str(&results_section(request, results)),
        Err(err) => page.push_str(&notice("error", &err.user_message())),
    }

    page.push_str("</main></body></html>");
    page
}

fn notice(kind: &str, message: &str) -> String {
    format!(r#"<div class="notice {kind}">{}</div>"#, escape(message))
}

fn controls(request: &DashboardRequest) -> String {
    let mut html = String::from(r#"<aside><form method="get" action="/"><h2>Search</h2>"#);
    let _ = write!(
        html,
        r#"<label for="q">Location</label><input id="q" name="q" type="text" value="{}">"#,
        escape(&request.query)
    );
    let _ = write!(
        html,
        r#"<label for="count">Results</label><input id="count" name="count" type="number" min="1" max="{MAX_RESULTS}" value="{}">"#,
        request.max_results
    );
    let _ = write!(
        html,
        r#"<label for="days">Forecast days: <output id="days-out">{days}</output></label><input id="days" name="days" type="range" min="1" max="{MAX_FORECAST_DAYS}" value="{days}" oninput="document.getElementById('days-out').value=this.value">"#,
        days = request.forecast_days
    );

    html.push_str("<fieldset><legend>Hourly</legend>");
    for variable in HourlyVariable::ALL {
        html.push_str(&checkbox("hourly", variable.as_str(), request.hourly.contains(&variable)));
    }
    html.push_str("</fieldset><fieldset><legend>Daily</legend>");
    for variable in DailyVariable::ALL {
        html.push_str(&checkbox("daily", variable.as_str(), request.daily.contains(&variable)));
    }
    html.push_str(r#"</fieldset><button type="submit" name="search" value="1">Search</button></form></aside>"#);
    html
}

fn checkbox(name: &str, value: &str, checked: bool) -> String {
    format!(
        r#"<label><input type="checkbox" name="{name}" value="{value}"{}> {value}</label>"#,
        if checked { " checked" } else { "" }
    )
}

/// Repeat the current inputs so picking a candidate re-runs the same search
fn hidden_inputs(request: &DashboardRequest) -> String {
    let mut html = format!(
        r#"<input type="hidden" name="q" value="{}"><input type="hidden" name="count" value="{}"><input type="hidden" name="days" value="{}">"#,
        escape(&request.query),
        request.max_results,
        request.forecast_days
    );
    for variable in &request.hourly {
        let _ = write!(html, r#"<input type="hidden" name="hourly" value="{variable}">"#);
    }
    for variable in &request.daily {
        let _ = write!(html, r#"<input type="hidden" name="daily" value="{variable}">"#);
    }
    html
}

fn results_section(request: &DashboardRequest, results: &DashboardResults) -> String {
    let mut html = String::from(r#"<form method="get" action="/"><fieldset><legend>Matching places</legend>"#);
    html.push_str(&hidden_inputs(request));
    for (index, candidate) in results.candidates.iter().enumerate() {
        let _ = write!(
            html,
            r#"<label><input type="radio" name="place" value="{index}"{}> {}</label>"#,
            if index == results.place.index { " checked" } else { "" },
            escape(&candidate.display_name)
        );
    }
    html.push_str(r#"</fieldset><button type="submit" name="search" value="1">Show forecast</button></form>"#);

    let place = &results.place;
    let _ = write!(
        html,
        "<h2>{}</h2><p>{:.4}, {:.4} · {}</p>",
        escape(&place.display_name),
        place.latitude,
        place.longitude,
        escape(&place.timezone)
    );
    html.push_str(&forecast_sections(&results.forecast));
    html
}

fn forecast_sections(view: &ForecastView) -> String {
    let mut html = String::from("<h3>Current conditions</h3>");
    match &view.current {
        CurrentSummary::Present {
            temperature,
            wind_speed,
            wind_direction,
            observed_at,
            description,
        } => {
            let _ = write!(
                html,
                r#"<div class="metrics"><div class="metric">Temperature<strong>{temperature} °C</strong></div><div class="metric">Wind<strong>{wind_speed} km/h</strong></div><div class="metric">Direction<strong>{wind_direction}°</strong></div></div><p>Observed {}{}</p>"#,
                escape(observed_at),
                description.map(|d| format!(" · {d}")).unwrap_or_default()
            );
        }
        CurrentSummary::Missing => html.push_str(&notice("info", "No current data available.")),
    }

    if !view.hourly_charts.is_empty() {
        html.push_str("<h3>Hourly forecast</h3>");
        for line in &view.hourly_charts {
            match chart::render_svg(line) {
                Some(svg) => {
                    let _ = write!(html, r#"<div class="chart">{svg}</div>"#);
                }
                None => html.push_str(&notice(
                    "warning",
                    &format!("Chart for {} could not be drawn.", line.variable),
                )),
            }
        }
    }

    if let Some(table) = &view.daily_table {
        html.push_str("<h3>Daily summary</h3>");
        html.push_str(&daily_table(table));
    }

    let _ = write!(
        html,
        r#"<h3>Map</h3><iframe title="Location map" src="{}" loading="lazy"></iframe>"#,
        escape(&view.marker.embed_url())
    );
    let _ = write!(
        html,
        "<details><summary>Raw forecast JSON</summary><pre>{}</pre></details>",
        escape(&view.raw_json)
    );
    html
}

fn daily_table(table: &DailyTable) -> String {
    let mut html = String::from("<table><thead><tr>");
    for header in &table.headers {
        let _ = write!(html, "<th>{}</th>", escape(header));
    }
    html.push_str("</tr></thead><tbody>");
    for row in &table.rows {
        html.push_str("<tr>");
        for cell in row {
            let _ = write!(html, "<td>{}</td>", escape(cell));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}
