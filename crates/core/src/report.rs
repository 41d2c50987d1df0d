//! Text rendering of a timing outline.
//!
//! Both modes walk the tree depth-first, children in first-seen order, one
//! line per node.
//!
//! Plain mode, one `| ` per nesting level:
//!
//! ```text
//! -Total: 10.00ms CPU (0 times, 0 iterations, 0µs wall, 10.00ms children, min: 0µs max: 0µs)
//! | -solve: 10.00ms CPU (1 times, 1 iterations, 10.20ms wall, 4.00ms children, min: 10.00ms max: 10.00ms)
//! | | -factor: 4.00ms CPU (4 times, 1 iterations, 4.10ms wall, 0µs children, min: 4.00ms max: 4.00ms)
//! ```
//!
//! Statistics mode, two spaces per nesting level, with each node's share of
//! its parent's time. The mean is per iteration, or per close when no
//! iteration boundary was ever marked:
//!
//! ```text
//! Total: 10.00ms
//!   solve:                  1 (times),  1 (iterations), 10.00ms (mean), 0µs (std), 10.00ms (total), 100.00 (%)
//!     factor:               4 (times),  1 (iterations), 4.00ms (mean), 0µs (std), 4.00ms (total),  40.00 (%)
//! ```

use std::io::Write;

use calltree_protocol::{OutlineSummary, ReportMode, format_time};

const LABEL_WIDTH: usize = 24;

pub fn write_outline<W: Write>(
    out: &mut W,
    root: &OutlineSummary,
    mode: ReportMode,
) -> std::io::Result<()> {
    match mode {
        ReportMode::Plain => write_plain(out, root, ""),
        ReportMode::Statistics => write_statistics(out, root, "", 0),
    }?;
    out.flush()
}

pub fn render_outline(root: &OutlineSummary, mode: ReportMode) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_outline(&mut buf, root, mode);
    String::from_utf8_lossy(&buf).into_owned()
}

fn write_plain<W: Write>(out: &mut W, node: &OutlineSummary, prefix: &str) -> std::io::Result<()> {
    writeln!(
        out,
        "{prefix}-{}: {} CPU ({} times, {} iterations, {} wall, {} children, min: {} max: {})",
        node.label.display_name(),
        format_time(node.time_us as f64),
        node.closes,
        node.sample_count(),
        format_time(node.wall_total_us as f64),
        format_time(node.children_time_us() as f64),
        format_time(node.min_iteration_us as f64),
        format_time(node.max_iteration_us as f64),
    )?;
    let child_prefix = format!("{prefix}| ");
    for child in &node.children {
        write_plain(out, child, &child_prefix)?;
    }
    Ok(())
}

fn write_statistics<W: Write>(
    out: &mut W,
    node: &OutlineSummary,
    prefix: &str,
    parent_time_us: u64,
) -> std::io::Result<()> {
    let label = format!("{prefix}{}: ", node.label);
    if node.closes == 0 {
        writeln!(out, "{label}{}", format_time(node.time_us as f64))?;
    } else {
        write!(
            out,
            "{label:<width$}{:>2} (times), {:>2} (iterations), {} (mean), {} (std), {} (total)",
            node.closes,
            node.sample_count(),
            format_time(node.mean_us),
            format_time(node.std_dev_us),
            format_time(node.time_us as f64),
            width = LABEL_WIDTH + prefix.len(),
        )?;
        if let Some(pct) = node.percent_of(parent_time_us) {
            write!(out, ", {pct:6.2} (%)")?;
        }
        writeln!(out)?;
    }
    let child_prefix = format!("{prefix}  ");
    for child in &node.children {
        write_statistics(out, child, &child_prefix, node.time_us)?;
    }
    Ok(())
}
