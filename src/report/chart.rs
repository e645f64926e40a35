use crate::core::{MONTH_NAMES, MonthlyPayments, Scenario, ScenarioSet};

use super::format::format_currency;

const SERIES_COLORS: [&str; 3] = ["#d62728", "#1f77b4", "#2ca02c"];

#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    pub title: Option<String>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 700,
            height: 300,
            margin: 50,
            title: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ChartSeries<'a> {
    pub label: &'a str,
    pub values: &'a MonthlyPayments,
}

/// Three-series chart of a scenario run.
pub fn scenario_chart(set: &ScenarioSet, options: &ChartOptions) -> String {
    let series: Vec<ChartSeries<'_>> = Scenario::ALL
        .into_iter()
        .map(|scenario| ChartSeries {
            label: scenario.label(),
            values: set.series(scenario),
        })
        .collect();
    render_line_chart(&series, options)
}

/// Two-series chart comparing capped payments with and without smoothing.
pub fn smoothing_chart(set: &ScenarioSet, options: &ChartOptions) -> String {
    let series = [
        ChartSeries {
            label: "Without smoothing",
            values: &set.capped,
        },
        ChartSeries {
            label: "With smoothing",
            values: &set.smoothed,
        },
    ];
    render_line_chart(&series, options)
}

/// Renders a month-by-month line chart as a standalone SVG document. All series
/// share one y-axis scaled to the largest value.
pub fn render_line_chart(series: &[ChartSeries<'_>], options: &ChartOptions) -> String {
    let width = f64::from(options.width);
    let height = f64::from(options.height);
    let margin = f64::from(options.margin);
    let plot_left = margin;
    let plot_right = width - margin;
    let plot_top = margin;
    let plot_bottom = height - margin;

    let mut max_value = series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .fold(0.0_f64, f64::max);
    if max_value <= 0.0 {
        max_value = 1.0;
    }

    let x_coord = |idx: usize| {
        plot_left + (idx as f64 / (MONTH_NAMES.len() - 1) as f64) * (plot_right - plot_left)
    };
    let y_coord = |value: f64| plot_bottom - (value / max_value) * (plot_bottom - plot_top);

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"sans-serif\" font-size=\"11\">\n",
        w = options.width,
        h = options.height,
    );
    svg.push_str(&format!(
        "<rect width=\"{}\" height=\"{}\" fill=\"white\"/>\n",
        options.width, options.height
    ));
    if let Some(title) = &options.title {
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"13\">{}</text>\n",
            width / 2.0,
            margin / 2.0,
            xml_escape(title)
        ));
    }

    // Axes.
    svg.push_str(&line(plot_left, plot_bottom, plot_right, plot_bottom, "black", 1));
    svg.push_str(&line(plot_left, plot_bottom, plot_left, plot_top, "black", 1));

    for fraction in [0.0, 0.5, 1.0] {
        let y = plot_bottom - fraction * (plot_bottom - plot_top);
        svg.push_str(&line(plot_left - 5.0, y, plot_left, y, "black", 1));
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" dominant-baseline=\"middle\" fill=\"gray\">{}</text>\n",
            plot_left - 10.0,
            y,
            xml_escape(&format_currency(fraction * max_value, 0))
        ));
    }

    for (idx, name) in MONTH_NAMES.iter().enumerate() {
        let x = x_coord(idx);
        svg.push_str(&line(x, plot_bottom, x, plot_bottom + 5.0, "black", 1));
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\">{}</text>\n",
            x,
            plot_bottom + 18.0,
            name
        ));
    }

    for (idx, s) in series.iter().enumerate() {
        let color = SERIES_COLORS[idx % SERIES_COLORS.len()];
        let points: Vec<String> = s
            .values
            .iter()
            .enumerate()
            .map(|(month, value)| format!("{:.1},{:.1}", x_coord(month), y_coord(*value)))
            .collect();
        svg.push_str(&format!(
            "<polyline fill=\"none\" stroke=\"{color}\" stroke-width=\"2\" points=\"{}\"/>\n",
            points.join(" ")
        ));
        for (month, value) in s.values.iter().enumerate() {
            svg.push_str(&format!(
                "<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"3\" fill=\"{color}\"/>\n",
                x_coord(month),
                y_coord(*value)
            ));
        }
    }

    let legend_x = plot_right - 120.0;
    let legend_y = plot_top + 10.0;
    for (idx, s) in series.iter().enumerate() {
        let color = SERIES_COLORS[idx % SERIES_COLORS.len()];
        let y = legend_y + idx as f64 * 20.0;
        svg.push_str(&format!(
            "<rect x=\"{legend_x:.1}\" y=\"{y:.1}\" width=\"10\" height=\"10\" fill=\"{color}\"/>\n"
        ));
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" dominant-baseline=\"middle\">{}</text>\n",
            legend_x + 15.0,
            y + 5.0,
            xml_escape(s.label)
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

fn line(x1: f64, y1: f64, x2: f64, y2: f64, stroke: &str, width: u32) -> String {
    format!(
        "<line x1=\"{x1:.1}\" y1=\"{y1:.1}\" x2=\"{x2:.1}\" y2=\"{y2:.1}\" stroke=\"{stroke}\" stroke-width=\"{width}\"/>\n"
    )
}

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
