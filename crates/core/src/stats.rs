/// Running statistics for one outline node.
///
/// Every close folds its elapsed time into the totals and into a pending
/// per-iteration accumulator. An iteration boundary turns that accumulator
/// into one sample for min/max/variance, so a region entered many times in
/// a loop body still contributes a single sample per iteration.
#[derive(Debug, Clone, Default)]
pub struct IterationStats {
    cpu_total_us: u64,
    wall_total_us: u64,
    closes: u64,
    pending_us: u64,
    pending_closes: u64,
    sum_sq_us: f64,
    min_us: u64,
    max_us: u64,
    iterations: u64,
}

impl IterationStats {
    pub fn record(&mut self, cpu_us: u64, wall_us: u64) {
        self.cpu_total_us += cpu_us;
        self.wall_total_us += wall_us;
        self.closes += 1;
        self.pending_us += cpu_us;
        self.pending_closes += 1;
    }

    /// Close the current iteration. Returns whether a sample was taken,
    /// which only happens when the node was closed since the last boundary.
    pub fn finish_iteration(&mut self) -> bool {
        if self.pending_closes == 0 {
            return false;
        }
        let sample = self.pending_us;
        if self.iterations == 0 {
            self.min_us = sample;
            self.max_us = sample;
        } else {
            self.min_us = self.min_us.min(sample);
            self.max_us = self.max_us.max(sample);
        }
        self.sum_sq_us += (sample as f64) * (sample as f64);
        self.iterations += 1;
        self.pending_us = 0;
        self.pending_closes = 0;
        true
    }

    pub fn cpu_total_us(&self) -> u64 {
        self.cpu_total_us
    }

    pub fn wall_total_us(&self) -> u64 {
        self.wall_total_us
    }

    pub fn closes(&self) -> u64 {
        self.closes
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Smallest iteration sample. Before any boundary the whole run so far
    /// counts as one iteration.
    pub fn min_us(&self) -> u64 {
        if self.iterations == 0 {
            self.pending_us
        } else {
            self.min_us
        }
    }

    pub fn max_us(&self) -> u64 {
        if self.iterations == 0 {
            self.pending_us
        } else {
            self.max_us
        }
    }

    /// CPU total per iteration, or per close when no boundary was marked.
    pub fn mean_us(&self) -> f64 {
        let n = if self.iterations > 0 {
            self.iterations
        } else {
            self.closes
        };
        if n == 0 {
            0.0
        } else {
            self.cpu_total_us as f64 / n as f64
        }
    }

    /// Variance of the iteration samples, clamped at zero to absorb
    /// cancellation. Zero until the first boundary.
    pub fn variance_us2(&self) -> f64 {
        if self.iterations == 0 {
            return 0.0;
        }
        let mean = self.mean_us();
        (self.sum_sq_us / self.iterations as f64 - mean * mean).max(0.0)
    }

    pub fn std_dev_us(&self) -> f64 {
        self.variance_us2().sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn many_closes_one_iteration() {
        let mut stats = IterationStats::default();
        for t in [100, 200, 300] {
            stats.record(t, t + 5);
        }
        assert!(stats.finish_iteration());
        assert_eq!(stats.cpu_total_us(), 600);
        assert_eq!(stats.wall_total_us(), 615);
        assert_eq!(stats.closes(), 3);
        assert_eq!(stats.iterations(), 1);
        assert_eq!(stats.min_us(), 600);
        assert_eq!(stats.max_us(), 600);
        assert!((stats.mean_us() - 600.0).abs() < f64::EPSILON);
        assert!(stats.variance_us2().abs() < 1e-9);
    }

    #[test]
    fn one_close_per_iteration() {
        let mut stats = IterationStats::default();
        for t in [100, 400, 250] {
            stats.record(t, t);
            stats.finish_iteration();
        }
        assert_eq!(stats.iterations(), 3);
        assert_eq!(stats.min_us(), 100);
        assert_eq!(stats.max_us(), 400);
        assert!((stats.mean_us() - 250.0).abs() < 1e-9);
        // samples 100, 400, 250 around mean 250: (22500 + 22500 + 0) / 3
        assert!((stats.variance_us2() - 15_000.0).abs() < 1e-6);
        assert!((stats.std_dev_us() - 15_000f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn untouched_iteration_is_not_a_sample() {
        let mut stats = IterationStats::default();
        stats.record(50, 50);
        stats.finish_iteration();
        assert!(!stats.finish_iteration());
        assert_eq!(stats.iterations(), 1);
    }

    #[test]
    fn zero_length_close_still_counts() {
        let mut stats = IterationStats::default();
        stats.record(0, 0);
        assert!(stats.finish_iteration());
        assert_eq!(stats.iterations(), 1);
        assert_eq!(stats.min_us(), 0);
    }

    #[test]
    fn without_boundaries_the_run_is_one_iteration() {
        let mut stats = IterationStats::default();
        stats.record(30, 30);
        stats.record(70, 70);
        assert_eq!(stats.iterations(), 0);
        assert_eq!(stats.min_us(), 100);
        assert_eq!(stats.max_us(), 100);
        assert!((stats.mean_us() - 50.0).abs() < f64::EPSILON);
        assert_eq!(stats.variance_us2(), 0.0);
    }

    #[test]
    fn empty_stats() {
        let stats = IterationStats::default();
        assert_eq!(stats.mean_us(), 0.0);
        assert_eq!(stats.std_dev_us(), 0.0);
        assert_eq!(stats.min_us(), 0);
    }
}
