use clap::Parser;
use offer_scout::Crawl;
use offer_scout::records::OutputRecord;
use std::fs::File;
use std::io::{BufWriter, Write};

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    ::log::info!("Starting offer crawl for keyword: {}", args.keyword);
    println!("Note: crawling requires a WebDriver server (e.g., ChromeDriver or geckodriver).");
    println!(
        "Set WEBDRIVER_URL environment variable if not using the default http://localhost:4444"
    );

    // Open the output sink before crawling so a bad path fails fast
    let mut sink: Box<dyn Write> = match &args.output {
        Some(path) => match File::create(path) {
            Ok(file) => Box::new(BufWriter::new(file)),
            Err(e) => {
                ::log::error!("Failed to open output file {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Box::new(std::io::stdout()),
    };

    let crawl = Crawl::new(&args.keyword)
        .with_max_concurrency(args.concurrency)
        .with_webdriver_url(&args.webdriver_url)
        .with_max_attempts(args.max_attempts)
        .with_settle_delay_ms(args.settle_delay_ms);

    // Start the crawl and get a receiver for output records
    let mut rx = match crawl.run().await {
        Ok(rx) => rx,
        Err(e) => {
            ::log::error!("Failed to start crawl: {}", e);
            std::process::exit(1);
        }
    };

    // Append records as they come in
    let mut products = 0;
    let mut status_rows = 0;
    let mut failures = 0;
    let start_time = std::time::Instant::now();

    while let Some(record) = rx.recv().await {
        match &record {
            OutputRecord::Product(product) => {
                products += 1;
                ::log::info!("Completed product {} with {} offers", product.asin, product.offers.len());
            }
            OutputRecord::NoResults { url, .. } => {
                status_rows += 1;
                ::log::info!("No results recorded for {}", url);
            }
            OutputRecord::Failure { url, .. } => {
                failures += 1;
                ::log::warn!("Failure recorded for {}", url);
            }
        }

        if let Err(e) = append_record(&mut sink, &record) {
            ::log::error!("Failed to write record: {}", e);
            std::process::exit(1);
        }
    }

    let duration = start_time.elapsed();
    ::log::info!(
        "Crawl complete - {} products, {} status rows, {} failures in {:.2} seconds",
        products,
        status_rows,
        failures,
        duration.as_secs_f64()
    );
}

/// Writes one record as a JSON line and flushes it so records are durable as
/// soon as they are emitted
fn append_record(sink: &mut Box<dyn Write>, record: &OutputRecord) -> std::io::Result<()> {
    let json = serde_json::to_string(record)?;
    writeln!(sink, "{}", json)?;
    sink.flush()
}
