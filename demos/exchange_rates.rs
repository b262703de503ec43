/// exchange rates - paginate a rate table and switch base currency
use emi_calculator_rs::{
    CalculatorConfig, CurrencyCode, MemoryPreferenceStore, RateSource, RateTable, RatesBrowser,
    SafeTimeProvider, Theme, ThemeContext, TimeSource,
};
use simple_logger::SimpleLogger;

/// generates a wide table so there is something to page through
struct SyntheticRates;

impl RateSource for SyntheticRates {
    fn fetch(&self, base: &CurrencyCode) -> emi_calculator_rs::Result<RateTable> {
        let mut rates = Vec::new();
        for (i, first) in ('A'..='Z').enumerate() {
            for (j, second) in ['A', 'B', 'C', 'D', 'E', 'F'].into_iter().enumerate() {
                let code = CurrencyCode::new(&format!("Z{}{}", first, second))?;
                rates.push((code, 1.0 + (i * 6 + j) as f64 / 10.0));
            }
        }
        RateTable::new(base.clone(), rates)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Debug)
        .init()?;

    let store = MemoryPreferenceStore::with_theme("dark");
    let mut theme = ThemeContext::load(&store);
    println!("theme: {}", theme.theme());

    let time = SafeTimeProvider::new(TimeSource::System);
    let mut browser = RatesBrowser::new(&CalculatorConfig::default())?;
    browser.refresh(&SyntheticRates, &time);

    println!("{} pages of rates for {}", browser.total_pages(), browser.base());
    browser.go_to(usize::MAX);
    if let Some(page) = browser.current_page() {
        println!("page {} of {}:", page.number, page.total_pages);
        for (code, rate) in page.items {
            println!("  {}  {}", code, rate);
        }
    }

    let ticket = browser.select_base(CurrencyCode::new("EUR")?);
    let response = SyntheticRates.fetch(&ticket.base);
    browser.complete(&ticket, response, &time);
    println!("\nswitched to {}, now on page {}", browser.base(), browser.page_number());

    let toggled: Theme = theme.toggle();
    println!("theme toggled to {}", toggled);

    Ok(())
}
