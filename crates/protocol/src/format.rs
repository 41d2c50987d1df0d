/// Format a microsecond quantity with a unit that keeps it readable.
pub fn format_time(us: f64) -> String {
    if us >= 1_000_000.0 {
        format!("{:.2}s", us / 1_000_000.0)
    } else if us >= 1_000.0 {
        format!("{:.2}ms", us / 1_000.0)
    } else {
        format!("{:.0}µs", us)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_unit_by_magnitude() {
        assert_eq!(format_time(0.0), "0µs");
        assert_eq!(format_time(999.0), "999µs");
        assert_eq!(format_time(4_000.0), "4.00ms");
        assert_eq!(format_time(12_346.0), "12.35ms");
        assert_eq!(format_time(2_500_000.0), "2.50s");
    }
}
