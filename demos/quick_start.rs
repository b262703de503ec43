/// quick start - calculate an EMI schedule and show it in another currency
use emi_calculator_rs::{
    CalculatorConfig, CurrencyCode, LoanInput, LoanSession, RateSource, RateTable, RatesResponse,
    SafeTimeProvider, TimeSource,
};
use simple_logger::SimpleLogger;

/// canned provider payload standing in for the http collaborator
struct CannedRates;

impl RateSource for CannedRates {
    fn fetch(&self, _base: &CurrencyCode) -> emi_calculator_rs::Result<RateTable> {
        RatesResponse::from_json(
            r#"{
                "result": "success",
                "base_code": "USD",
                "time_last_update_unix": 1700000000,
                "conversion_rates": { "USD": 1, "EUR": 0.92, "INR": 83.2, "GBP": 0.79 }
            }"#,
        )?
        .into_table()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()?;

    let time = SafeTimeProvider::new(TimeSource::System);
    let mut session = LoanSession::new(CalculatorConfig::default())?;

    let form = *session.default_input();
    println!(
        "loan {:.2} at {}% over {} years",
        form.principal, form.annual_rate_percent, form.term_years
    );
    let payment = session.calculate_default(&time)?.monthly_payment;
    println!("monthly emi: {:.2}", payment);

    // a longer term entered on the form
    let longer = LoanInput::new(form.principal, form.annual_rate_percent, 10.0);
    println!("over 10 years: {:.2}", session.calculate(&longer, &time)?.monthly_payment);
    session.calculate_default(&time)?;

    session.refresh_rates(&CannedRates, &time);
    session.select_currency(CurrencyCode::new("INR")?, &time)?;

    if let Some(display) = session.monthly_payment_display()? {
        println!("monthly emi in {}: {}", session.selected_currency(), display);
    }

    println!("\nfirst six months:");
    for row in session.rows()?.iter().take(6) {
        println!(
            "{:>3}  principal {:>12}  interest {:>10}  balance {:>14}",
            row.month, row.principal, row.interest, row.balance
        );
    }

    println!("\n{}", session.json());

    Ok(())
}
