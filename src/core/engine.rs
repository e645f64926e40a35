use super::types::{
    CAP, MONTHLY_WEIGHTS, MONTHS_IN_YEAR, MonthlyPayments, ScenarioSet, SeriesStats, SummaryStats,
};

/// Spreads the year total over the weighting, pushing rounding residue into December.
fn build_spending(annual_estimate: f64, cap: Option<f64>) -> MonthlyPayments {
    let mut total = annual_estimate.max(0.0);
    if let Some(cap) = cap {
        total = total.min(cap);
    }

    // Non-finite totals have no meaningful spread; NaN is already 0 via `max`.
    if total == 0.0 || !total.is_finite() {
        return [0.0; MONTHS_IN_YEAR];
    }

    let mut baseline = MONTHLY_WEIGHTS.map(|weight| weight * total);
    let residual = total - baseline.iter().sum::<f64>();
    baseline[MONTHS_IN_YEAR - 1] += residual;
    baseline
}

/// Clamps a requested plan start month into `1..=12`.
pub fn clamp_start_month(start_month: i64) -> u32 {
    start_month.clamp(1, MONTHS_IN_YEAR as i64) as u32
}

pub fn allocate_uncapped(annual_estimate: f64) -> MonthlyPayments {
    build_spending(annual_estimate, None)
}

pub fn allocate_capped(annual_estimate: f64) -> MonthlyPayments {
    build_spending(annual_estimate, Some(CAP))
}

/// Capped allocation where months from `start_month` on pay an equal share of
/// what is still owed. Months before the start keep their front-loaded amounts.
pub fn allocate_capped_smoothed(annual_estimate: f64, start_month: i64) -> MonthlyPayments {
    let start_month = clamp_start_month(start_month) as usize;

    let baseline = allocate_capped(annual_estimate);
    let total_capped: f64 = baseline.iter().sum();
    if total_capped == 0.0 {
        return [0.0; MONTHS_IN_YEAR];
    }

    let already_paid = start_month - 1;
    let mut payments = [0.0; MONTHS_IN_YEAR];
    payments[..already_paid].copy_from_slice(&baseline[..already_paid]);

    let paid_so_far: f64 = baseline[..already_paid].iter().sum();
    let remaining_balance = (total_capped - paid_so_far).max(0.0);
    let remaining_months = MONTHS_IN_YEAR - already_paid;
    if remaining_months == 0 || remaining_balance == 0.0 {
        return payments;
    }

    let installment = remaining_balance / remaining_months as f64;
    for payment in &mut payments[already_paid..] {
        *payment = installment;
    }

    let total_paid: f64 = payments.iter().sum();
    if total_paid > total_capped {
        payments[MONTHS_IN_YEAR - 1] -= total_paid - total_capped;
    }

    payments
}

/// Runs all three scenarios for one request. The reported start month is the
/// clamped one actually used for smoothing.
pub fn run_scenarios(annual_estimate: f64, start_month: i64) -> ScenarioSet {
    ScenarioSet {
        annual_estimate,
        start_month: clamp_start_month(start_month),
        uncapped: allocate_uncapped(annual_estimate),
        capped: allocate_capped(annual_estimate),
        smoothed: allocate_capped_smoothed(annual_estimate, start_month),
    }
}

pub fn series_stats(payments: &MonthlyPayments) -> SeriesStats {
    let mut peak = payments[0];
    let mut peak_month_index = 0;
    for (idx, &value) in payments.iter().enumerate().skip(1) {
        if value > peak {
            peak = value;
            peak_month_index = idx;
        }
    }

    SeriesStats {
        total: payments.iter().sum(),
        peak,
        peak_month_index,
    }
}

pub fn summarize(
    uncapped: &MonthlyPayments,
    capped: &MonthlyPayments,
    smoothed: &MonthlyPayments,
) -> SummaryStats {
    let uncapped = series_stats(uncapped);
    let capped = series_stats(capped);
    let smoothed = series_stats(smoothed);

    SummaryStats {
        amount_avoided: (uncapped.total - capped.total).max(0.0),
        uncapped,
        capped,
        smoothed,
    }
}

impl ScenarioSet {
    pub fn summary(&self) -> SummaryStats {
        summarize(&self.uncapped, &self.capped, &self.smoothed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn assert_series_approx(actual: &MonthlyPayments, expected: &[f64]) {
        assert_eq!(expected.len(), MONTHS_IN_YEAR);
        for (month, (a, e)) in actual.iter().zip(expected).enumerate() {
            assert!(
                (a - e).abs() <= EPS,
                "month {} expected {e}, got {a}",
                month + 1
            );
        }
    }

    fn total(payments: &MonthlyPayments) -> f64 {
        payments.iter().sum()
    }

    #[test]
    fn weights_sum_to_one_and_are_front_loaded() {
        assert_approx(MONTHLY_WEIGHTS.iter().sum(), 1.0);
        assert!(MONTHLY_WEIGHTS.iter().all(|w| *w >= 0.0));
        assert!(MONTHLY_WEIGHTS.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn uncapped_follows_weights_for_high_spend() {
        let payments = allocate_uncapped(3000.0);
        assert_series_approx(
            &payments,
            &[
                450.0, 360.0, 330.0, 300.0, 300.0, 240.0, 240.0, 210.0, 210.0, 180.0, 120.0, 60.0,
            ],
        );
        assert_approx(total(&payments), 3000.0);
    }

    #[test]
    fn capped_limits_total_to_cap() {
        let payments = allocate_capped(3000.0);
        assert_approx(total(&payments), 2000.0);
        assert_series_approx(
            &payments,
            &[
                300.0, 240.0, 220.0, 200.0, 200.0, 160.0, 160.0, 140.0, 140.0, 120.0, 80.0, 40.0,
            ],
        );
    }

    #[test]
    fn capped_below_cap_matches_uncapped() {
        assert_eq!(allocate_capped(1500.0), allocate_uncapped(1500.0));
    }

    #[test]
    fn capped_exactly_at_cap_is_unchanged() {
        assert_eq!(allocate_capped(CAP), allocate_uncapped(CAP));
        assert_approx(total(&allocate_capped(CAP)), CAP);
    }

    #[test]
    fn zero_estimate_returns_zeros_for_every_scenario() {
        let zeros = [0.0; MONTHS_IN_YEAR];
        assert_eq!(allocate_uncapped(0.0), zeros);
        assert_eq!(allocate_capped(0.0), zeros);
        for start_month in 1..=12 {
            assert_eq!(allocate_capped_smoothed(0.0, start_month), zeros);
        }
    }

    #[test]
    fn negative_estimate_behaves_like_zero() {
        let zeros = [0.0; MONTHS_IN_YEAR];
        assert_eq!(allocate_uncapped(-250.0), zeros);
        assert_eq!(allocate_capped(-250.0), zeros);
        assert_eq!(allocate_capped_smoothed(-250.0, 4), zeros);
    }

    #[test]
    fn non_finite_estimates_stay_finite() {
        let zeros = [0.0; MONTHS_IN_YEAR];
        assert_eq!(allocate_uncapped(f64::INFINITY), zeros);
        assert_eq!(allocate_uncapped(f64::NAN), zeros);
        assert_eq!(allocate_uncapped(f64::NEG_INFINITY), zeros);

        let capped = allocate_capped(f64::INFINITY);
        assert!(capped.iter().all(|v| v.is_finite()));
        assert_approx(total(&capped), CAP);

        let smoothed = allocate_capped_smoothed(f64::INFINITY, 4);
        assert!(smoothed.iter().all(|v| v.is_finite()));
        assert_approx(total(&smoothed), CAP);

        let summary = run_scenarios(f64::INFINITY, 1).summary();
        assert_approx(summary.uncapped.total, 0.0);
        assert_approx(summary.amount_avoided, 0.0);
    }

    #[test]
    fn smoothing_from_january_is_equal_installments() {
        let payments = allocate_capped_smoothed(3000.0, 1);
        for value in payments {
            assert!((value - 166.67).abs() < 0.005, "got {value}");
            assert_approx(value, 2000.0 / 12.0);
        }
        assert_approx(total(&payments), 2000.0);
    }

    #[test]
    fn smoothing_from_july_keeps_first_half_baseline() {
        let payments = allocate_capped_smoothed(3000.0, 7);
        let baseline = allocate_capped(3000.0);

        assert_eq!(payments[..6], baseline[..6]);
        assert_approx(payments[..6].iter().sum(), 1320.0);
        for value in &payments[6..] {
            assert_approx(*value, 680.0 / 6.0);
            assert!((value - 113.33).abs() < 0.005, "got {value}");
        }
        assert_approx(total(&payments), 2000.0);
    }

    #[test]
    fn smoothing_from_december_puts_remaining_balance_in_last_month() {
        let baseline = allocate_capped(3000.0);
        let payments = allocate_capped_smoothed(3000.0, 12);

        assert_eq!(payments[..11], baseline[..11]);
        let paid_before: f64 = baseline[..11].iter().sum();
        assert_approx(payments[11], 2000.0 - paid_before);
        assert_approx(payments[11], 40.0);
    }

    #[test]
    fn out_of_range_start_months_are_clamped() {
        assert_eq!(
            allocate_capped_smoothed(2400.0, 0),
            allocate_capped_smoothed(2400.0, 1)
        );
        assert_eq!(
            allocate_capped_smoothed(2400.0, -3),
            allocate_capped_smoothed(2400.0, 1)
        );
        assert_eq!(
            allocate_capped_smoothed(2400.0, 15),
            allocate_capped_smoothed(2400.0, 12)
        );
        assert_eq!(clamp_start_month(0), 1);
        assert_eq!(clamp_start_month(15), 12);
        assert_eq!(clamp_start_month(6), 6);
    }

    #[test]
    fn smoothing_lowers_peak_for_early_enrollment() {
        let capped = allocate_capped(5000.0);
        let smoothed = allocate_capped_smoothed(5000.0, 1);
        let capped_peak = capped.iter().cloned().fold(f64::MIN, f64::max);
        let smoothed_peak = smoothed.iter().cloned().fold(f64::MIN, f64::max);
        assert!(smoothed_peak < capped_peak);
    }

    #[test]
    fn run_scenarios_reports_clamped_start_month() {
        let set = run_scenarios(3000.0, 20);
        assert_eq!(set.start_month, 12);
        assert_eq!(set.smoothed, allocate_capped_smoothed(3000.0, 12));
        assert_eq!(set.uncapped, allocate_uncapped(3000.0));
        assert_eq!(set.capped, allocate_capped(3000.0));
    }

    #[test]
    fn summarize_reports_totals_peaks_and_avoided_amount() {
        let set = run_scenarios(3000.0, 7);
        let summary = set.summary();

        assert_approx(summary.uncapped.total, 3000.0);
        assert_approx(summary.capped.total, 2000.0);
        assert_approx(summary.smoothed.total, 2000.0);
        assert_approx(summary.amount_avoided, 1000.0);

        assert_approx(summary.uncapped.peak, 450.0);
        assert_eq!(summary.uncapped.peak_month_index, 0);
        assert_eq!(summary.uncapped.peak_month_name(), "Jan");
        assert_approx(summary.capped.peak, 300.0);
        assert_approx(summary.smoothed.peak, 300.0);
        assert_eq!(summary.smoothed.peak_month_index, 0);
    }

    #[test]
    fn summarize_below_cap_avoids_nothing() {
        let summary = run_scenarios(1200.0, 3).summary();
        assert_approx(summary.amount_avoided, 0.0);
        assert_approx(summary.uncapped.total, summary.capped.total);
    }

    #[test]
    fn series_stats_breaks_ties_on_first_month() {
        let mut payments = [10.0; MONTHS_IN_YEAR];
        payments[4] = 25.0;
        payments[9] = 25.0;
        let stats = series_stats(&payments);
        assert_approx(stats.peak, 25.0);
        assert_eq!(stats.peak_month_index, 4);
        assert_eq!(stats.peak_month_name(), "May");
    }

    #[test]
    fn series_stats_of_zero_vector_points_at_january() {
        let stats = series_stats(&[0.0; MONTHS_IN_YEAR]);
        assert_eq!(stats.peak_month_index, 0);
        assert_approx(stats.peak, 0.0);
        assert_approx(stats.total, 0.0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(256))]

        #[test]
        fn prop_uncapped_sums_to_estimate(cents in 0u64..100_000_000) {
            let estimate = cents as f64 / 100.0;
            let payments = allocate_uncapped(estimate);
            prop_assert!((total(&payments) - estimate).abs() <= EPS);
            prop_assert!(payments.iter().all(|v| *v >= 0.0));
        }

        #[test]
        fn prop_capped_sums_to_min_of_estimate_and_cap(cents in 0u64..100_000_000) {
            let estimate = cents as f64 / 100.0;
            let payments = allocate_capped(estimate);
            prop_assert!((total(&payments) - estimate.min(CAP)).abs() <= EPS);
        }

        #[test]
        fn prop_smoothing_preserves_capped_total(
            cents in 0u64..100_000_000,
            start_month in 1i64..=12
        ) {
            let estimate = cents as f64 / 100.0;
            let capped_total = total(&allocate_capped(estimate));
            let smoothed = allocate_capped_smoothed(estimate, start_month);
            prop_assert!((total(&smoothed) - capped_total).abs() <= EPS);
            prop_assert!(total(&smoothed) <= capped_total + EPS);
            prop_assert!(smoothed.iter().all(|v| *v >= -EPS));
        }

        #[test]
        fn prop_smoothed_installments_are_equal_from_start_month(
            cents in 1u64..100_000_000,
            start_month in 1i64..=12
        ) {
            let estimate = cents as f64 / 100.0;
            let smoothed = allocate_capped_smoothed(estimate, start_month);
            let start = (start_month - 1) as usize;
            let first = smoothed[start];
            for value in &smoothed[start..] {
                prop_assert!((value - first).abs() <= EPS);
            }
        }

        #[test]
        fn prop_uncapped_is_monotone_in_estimate(
            cents in 0u64..50_000_000,
            extra_cents in 1u64..50_000_000
        ) {
            let lower = allocate_uncapped(cents as f64 / 100.0);
            let higher = allocate_uncapped((cents + extra_cents) as f64 / 100.0);
            for (lo, hi) in lower.iter().zip(&higher) {
                prop_assert!(lo <= hi);
            }
        }

        #[test]
        fn prop_start_month_clamping_is_idempotent(
            cents in 0u64..1_000_000,
            start_month in -50i64..50
        ) {
            let estimate = cents as f64 / 100.0;
            let clamped = clamp_start_month(start_month) as i64;
            prop_assert!(
                allocate_capped_smoothed(estimate, start_month)
                    == allocate_capped_smoothed(estimate, clamped)
            );
        }
    }
}
