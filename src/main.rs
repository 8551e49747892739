use std::process::ExitCode;

use resultscraper::config::ScrapeConfig;
use resultscraper::logging;
use resultscraper::report::Reporter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    logging::init_logging()?;

    let config = ScrapeConfig::default();
    let stdout = std::io::stdout();
    let mut reporter = Reporter::new(stdout.lock(), &config.result_tag);

    let outcome = resultscraper::run(&config, &mut reporter).await?;

    if outcome.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
