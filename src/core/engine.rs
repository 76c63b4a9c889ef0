use super::types::{ProjectionInput, ProjectionResult, YearRecord};

#[derive(Debug, Clone, Copy, Default)]
struct YearFlow {
    contribution: f64,
    interest: f64,
}

pub fn project(input: &ProjectionInput) -> ProjectionResult {
    let mut years = Vec::with_capacity(input.term_years as usize);
    let mut balance = input.initial_capital;
    let mut total_invested = input.initial_capital;
    let mut total_interest = 0.0;

    for year in 1..=input.term_years {
        let starting_balance = balance;
        let flow = run_year(input, &mut balance);

        total_invested += flow.contribution;
        total_interest += flow.interest;

        years.push(YearRecord {
            year,
            starting_balance,
            contribution: flow.contribution,
            interest: flow.interest,
            ending_balance: balance,
        });
    }

    let final_capital = if input.term_years > 0 {
        balance
    } else {
        input.initial_capital
    };

    tracing::debug!(
        term_years = input.term_years,
        final_capital,
        total_invested,
        total_interest,
        "projection computed"
    );

    ProjectionResult {
        years,
        final_capital,
        total_invested,
        total_interest,
    }
}

// Contributions are spread evenly over the capitalization periods and land at
// the start of each period, before that period's interest is credited.
fn run_year(input: &ProjectionInput, balance: &mut f64) -> YearFlow {
    let periods = input.capitalization_frequency.get();
    let periods_f = f64::from(periods);
    let rate_per_period = input.annual_interest_rate / periods_f;
    let contribution_per_period = input.annual_contribution() / periods_f;

    let mut flow = YearFlow::default();
    for _ in 0..periods {
        if input.contribution_frequency > 0 {
            *balance += contribution_per_period;
            flow.contribution += contribution_per_period;
        }

        let interest = *balance * rate_per_period;
        *balance += interest;
        flow.interest += interest;
    }
    flow
}
