//! ASCII charts for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grids), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Chart elements:
//! - bar chart: `#` bars, one row per grouping key
//! - trend chart: `o` period markers connected by `-` segments

use crate::domain::GroupTotals;

/// Render a horizontal bar chart of total value per key.
///
/// Rows appear in the aggregate's own order; bars are scaled to the widest
/// value so the largest group always spans the full bar width.
pub fn render_value_bars(title: &str, groups: &[GroupTotals], width: usize) -> String {
    let mut out = String::new();
    out.push_str(title);
    out.push('\n');

    if groups.is_empty() {
        out.push_str("(no data)\n");
        return out;
    }

    let label_width = groups
        .iter()
        .map(|g| g.key.chars().count())
        .max()
        .unwrap_or(0)
        .min(24);
    let bar_width = width.saturating_sub(label_width + 3).max(4);

    let max_value = groups.iter().map(|g| g.value).fold(f64::MIN, f64::max);

    for g in groups {
        let filled = if max_value > 0.0 {
            ((g.value / max_value) * bar_width as f64).round() as usize
        } else {
            0
        };
        let bar: String = std::iter::repeat('#').take(filled).collect();
        out.push_str(&format!(
            "{:<label_width$} | {bar} {:.2}\n",
            truncate(&g.key, label_width),
            g.value,
        ));
    }

    out
}

/// Render a line chart of total value per period.
///
/// The x-axis is the period sequence in aggregate order; the y-axis is the
/// period's total value.
pub fn render_trend_line(title: &str, by_period: &[GroupTotals], width: usize, height: usize) -> String {
    let mut out = String::new();
    out.push_str(title);
    out.push('\n');

    if by_period.is_empty() {
        out.push_str("(no data)\n");
        return out;
    }

    let width = width.max(10);
    let height = height.max(5);

    let (y_min, y_max) = value_range(by_period).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    out.push_str(&format!(
        "periods: {} .. {} | value=[{y_min:.2}, {y_max:.2}]\n",
        by_period[0].key,
        by_period[by_period.len() - 1].key,
    ));

    let mut grid = vec![vec![' '; width]; height];

    let n = by_period.len();
    let mut prev: Option<(usize, usize)> = None;
    for (i, g) in by_period.iter().enumerate() {
        let x = map_x(i, n, width);
        let y = map_y(g.value, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(&mut grid, x0, y0, x, y, '-');
        }
        grid[y][x] = 'o';
        prev = Some((x, y));
    }

    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }

    out
}

fn value_range(groups: &[GroupTotals]) -> Option<(f64, f64)> {
    let mut min_v = f64::INFINITY;
    let mut max_v = f64::NEG_INFINITY;
    for g in groups {
        min_v = min_v.min(g.value);
        max_v = max_v.max(g.value);
    }
    if min_v.is_finite() && max_v.is_finite() && max_v > min_v {
        Some((min_v, max_v))
    } else if min_v.is_finite() {
        // A single period (or all-equal values) still plots as a flat line.
        Some((min_v - 0.5, min_v + 0.5))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(i: usize, n: usize, width: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    let u = i as f64 / (n as f64 - 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(v: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((v - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // v=max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
