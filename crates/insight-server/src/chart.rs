//! Inline SVG line chart of open and close prices

use insight_metrics::PriceSeries;

const CLOSE_COLOR: &str = "#1f77b4";
const OPEN_COLOR: &str = "#ff7f0e";
const GRID_COLOR: &str = "#e5e5e5";
const Y_TICKS: usize = 5;
const MAX_DATE_LABELS: usize = 10;

const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 110.0;

/// Rendering options for [`render_price_chart`]
#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Label every Nth date; `None` picks a step that fits about ten labels
    pub label_every: Option<usize>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: "Stock Price Over the Last Month".to_string(),
            width: 1200,
            height: 600,
            label_every: None,
        }
    }
}

impl ChartOptions {
    /// Set the chart title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Label every `n`th date
    pub fn with_label_every(mut self, n: usize) -> Self {
        self.label_every = Some(n.max(1));
        self
    }
}

/// Render the open and close lines of `series` as a standalone `<svg>` element
///
/// An empty series renders the frame with a "No data" placeholder.
pub fn render_price_chart(series: &PriceSeries, options: &ChartOptions) -> String {
    let width = f64::from(options.width);
    let height = f64::from(options.height);
    let plot_w = (width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0);
    let plot_h = (height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0);
    let bottom = MARGIN_TOP + plot_h;

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="100%" role="img" font-family="sans-serif" font-size="12">"#,
        w = options.width,
        h = options.height,
    );
    svg.push_str(&format!(
        r#"<rect width="{width}" height="{height}" fill="white"/><text x="{x:.1}" y="28" text-anchor="middle" font-size="18">{title}</text>"#,
        x = width / 2.0,
        title = escape(&options.title),
    ));

    let points = series.points();
    if points.is_empty() {
        svg.push_str(&format!(
            r##"<text x="{x:.1}" y="{y:.1}" text-anchor="middle" fill="#888">No data</text></svg>"##,
            x = width / 2.0,
            y = MARGIN_TOP + plot_h / 2.0,
        ));
        return svg;
    }

    let (low, high) = price_bounds(series);
    let y_of = |price: f64| bottom - (price - low) / (high - low) * plot_h;
    let x_of = |i: usize| {
        if points.len() == 1 {
            MARGIN_LEFT + plot_w / 2.0
        } else {
            MARGIN_LEFT + i as f64 * plot_w / (points.len() - 1) as f64
        }
    };

    // Horizontal grid with price labels
    for tick in 0..=Y_TICKS {
        let price = low + (high - low) * tick as f64 / Y_TICKS as f64;
        let y = y_of(price);
        svg.push_str(&format!(
            r#"<line x1="{MARGIN_LEFT}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}" stroke="{GRID_COLOR}"/><text x="{lx:.1}" y="{ty:.1}" text-anchor="end">{price:.2}</text>"#,
            x2 = MARGIN_LEFT + plot_w,
            lx = MARGIN_LEFT - 8.0,
            ty = y + 4.0,
        ));
    }

    // Axes
    svg.push_str(&format!(
        r#"<line x1="{MARGIN_LEFT}" y1="{MARGIN_TOP}" x2="{MARGIN_LEFT}" y2="{bottom:.1}" stroke="black"/><line x1="{MARGIN_LEFT}" y1="{bottom:.1}" x2="{x2:.1}" y2="{bottom:.1}" stroke="black"/>"#,
        x2 = MARGIN_LEFT + plot_w,
    ));

    // Rotated date labels
    let step = options
        .label_every
        .unwrap_or_else(|| points.len().div_ceil(MAX_DATE_LABELS))
        .max(1);
    for (i, point) in points.iter().enumerate().step_by(step) {
        let x = x_of(i);
        let y = bottom + 16.0;
        svg.push_str(&format!(
            r#"<text x="{x:.1}" y="{y:.1}" text-anchor="end" transform="rotate(-45 {x:.1} {y:.1})">{date}</text>"#,
            date = point.date.format("%Y-%m-%d"),
        ));
    }

    // Axis titles
    svg.push_str(&format!(
        r#"<text x="{x:.1}" y="{y:.1}" text-anchor="middle" font-size="14">Date</text><text x="20" y="{cy:.1}" text-anchor="middle" font-size="14" transform="rotate(-90 20 {cy:.1})">Price (USD)</text>"#,
        x = MARGIN_LEFT + plot_w / 2.0,
        y = height - 12.0,
        cy = MARGIN_TOP + plot_h / 2.0,
    ));

    // Price lines
    let line = |price: fn(&insight_metrics::PricePoint) -> f64| {
        points
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{:.1},{:.1}", x_of(i), y_of(price(p))))
            .collect::<Vec<_>>()
            .join(" ")
    };
    svg.push_str(&format!(
        r#"<polyline fill="none" stroke="{CLOSE_COLOR}" stroke-width="2" points="{close}"/><polyline fill="none" stroke="{OPEN_COLOR}" stroke-width="2" points="{open}"/>"#,
        close = line(|p| p.close),
        open = line(|p| p.open),
    ));

    // Legend
    let lx = MARGIN_LEFT + plot_w - 130.0;
    let ly = MARGIN_TOP + 10.0;
    svg.push_str(&format!(
        r#"<g class="legend"><line x1="{lx:.1}" y1="{ly:.1}" x2="{l2:.1}" y2="{ly:.1}" stroke="{CLOSE_COLOR}" stroke-width="2"/><text x="{tx:.1}" y="{t1:.1}">Close Price</text><line x1="{lx:.1}" y1="{ly2:.1}" x2="{l2:.1}" y2="{ly2:.1}" stroke="{OPEN_COLOR}" stroke-width="2"/><text x="{tx:.1}" y="{t2:.1}">Open Price</text></g>"#,
        l2 = lx + 24.0,
        tx = lx + 30.0,
        t1 = ly + 4.0,
        ly2 = ly + 20.0,
        t2 = ly + 24.0,
    ));

    svg.push_str("</svg>");
    svg
}

/// Padded min/max over open and close, never a zero-height band
fn price_bounds(series: &PriceSeries) -> (f64, f64) {
    let (min, max) = series
        .points()
        .iter()
        .flat_map(|p| [p.open, p.close])
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    let pad = if max > min { (max - min) * 0.05 } else { 1.0 };
    ((min - pad).max(0.0), max + pad)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use insight_metrics::PricePoint;

    fn series(len: usize) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let points = start
            .iter_days()
            .take(len)
            .enumerate()
            .map(|(i, date)| {
                let close = 100.0 + i as f64;
                PricePoint::new(date, close - 0.5, close + 1.0, close - 1.0, close, 1_000)
            })
            .collect();
        PriceSeries::new(points).unwrap()
    }

    #[test]
    fn test_chart_structure() {
        let svg = render_price_chart(&series(20), &ChartOptions::default());

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("Stock Price Over the Last Month"));
        assert!(svg.contains(">Date</text>"));
        assert!(svg.contains(">Price (USD)</text>"));
        assert!(svg.contains("Close Price"));
        assert!(svg.contains("Open Price"));
        assert_eq!(svg.matches("<polyline").count(), 2);
    }

    #[test]
    fn test_date_label_step() {
        let options = ChartOptions::default().with_label_every(5);
        let svg = render_price_chart(&series(20), &options);

        assert!(svg.contains(">2024-02-01</text>"));
        assert!(svg.contains(">2024-02-06</text>"));
        assert!(!svg.contains(">2024-02-02</text>"));
        assert_eq!(svg.matches("rotate(-45").count(), 4);
    }

    #[test]
    fn test_auto_label_step_caps_labels() {
        let svg = render_price_chart(&series(60), &ChartOptions::default());
        assert!(svg.matches("rotate(-45").count() <= MAX_DATE_LABELS);
    }

    #[test]
    fn test_empty_series_placeholder() {
        let svg = render_price_chart(&PriceSeries::empty(), &ChartOptions::default());
        assert!(svg.contains("No data"));
        assert!(!svg.contains("<polyline"));
    }

    #[test]
    fn test_single_point_and_flat_prices() {
        let svg = render_price_chart(&series(1), &ChartOptions::default());
        assert!(svg.contains("<polyline"));
        assert!(!svg.contains("NaN"));
        assert!(!svg.contains("inf"));
    }

    #[test]
    fn test_title_escaped() {
        let options = ChartOptions::default().with_title("AT&T <1mo>");
        let svg = render_price_chart(&series(3), &options);
        assert!(svg.contains("AT&amp;T &lt;1mo&gt;"));
    }
}
