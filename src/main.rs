use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
    trendgen::cli::run_generate(std::env::args().skip(1))
}
