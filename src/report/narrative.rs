use crate::core::{CAP, MONTH_NAMES, SummaryStats};

use super::format::format_currency;

/// Plain-language explanation of a scenario run.
pub fn narrative(
    subject: &str,
    annual_estimate: f64,
    start_month: u32,
    summary: &SummaryStats,
) -> String {
    let start_name = MONTH_NAMES[(start_month.clamp(1, 12) - 1) as usize];
    let money = |value: f64| format_currency(value, 0);

    format!(
        "{subject} with an annual out of pocket estimate of {estimate}:\n\
         \n\
         - Without any cap, total yearly out of pocket would be about {uncapped_total}.\n\
         - Under the {cap} annual cap, yearly out of pocket is limited to {capped_total}, \
         avoiding about {avoided} in spending.\n\
         - The highest monthly payment without a cap is about {uncapped_peak} in {uncapped_month}.\n\
         - With the cap but no monthly payment plan, the highest monthly payment is about \
         {capped_peak} in {capped_month}.\n\
         - After enrolling in the monthly payment plan in month {start_month} ({start_name}), \
         the highest monthly payment is about {smoothed_peak} in {smoothed_month}.\n\
         \n\
         The total owed under the cap is the same with or without the monthly payment plan. \
         The plan changes the timing of payments and reduces the worst single month bill.\n",
        estimate = money(annual_estimate),
        uncapped_total = money(summary.uncapped.total),
        cap = money(CAP),
        capped_total = money(summary.capped.total),
        avoided = money(summary.amount_avoided),
        uncapped_peak = money(summary.uncapped.peak),
        uncapped_month = summary.uncapped.peak_month_name(),
        capped_peak = money(summary.capped.peak),
        capped_month = summary.capped.peak_month_name(),
        smoothed_peak = money(summary.smoothed.peak),
        smoothed_month = summary.smoothed.peak_month_name(),
    )
}
