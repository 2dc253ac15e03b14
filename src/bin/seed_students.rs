//! Fills the database with demo students, eg. `seed_students 50`.

use showcase::{
    config::DbConfig,
    error::{GetDatabaseConnectionSnafu, ParseSeedCountSnafu, ShowcaseResult},
    seed::{SCRIPT_PAUSE, SCRIPT_SEED_COUNT, SeedReport, seed_students},
    state::connect_and_migrate,
};
use snafu::ResultExt;
use sqlx::postgres::PgPoolOptions;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn seed_count(arg: Option<String>) -> ShowcaseResult<usize> {
    match arg {
        None => Ok(SCRIPT_SEED_COUNT),
        Some(original) => original
            .trim()
            .parse()
            .context(ParseSeedCountSnafu { original }),
    }
}

async fn run() -> ShowcaseResult<SeedReport> {
    let count = seed_count(std::env::args().nth(1))?;

    let db_config = DbConfig::elevated()?;
    let pool = connect_and_migrate(PgPoolOptions::new().max_connections(1), &db_config).await?;
    let mut conn = pool.acquire().await.context(GetDatabaseConnectionSnafu)?;

    info!(count, "Seeding demo students");
    let report = seed_students(&mut *conn, count, Some(SCRIPT_PAUSE)).await;

    drop(conn);
    pool.close().await;

    Ok(report)
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("no .env file loaded: {e}");
    }

    if let Err(e) = tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .finish(),
    ) {
        eprintln!("unable to set tracing subscriber: {e}");
    }

    match run().await {
        Ok(SeedReport { added, failed }) => {
            info!(added, failed, "Finished seeding");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e.full_message(), hint = e.hint().describe("no further details"), "Seeding failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use showcase::error::ShowcaseError;

    #[test]
    fn count_defaults_and_parses() {
        assert_eq!(seed_count(None).unwrap(), SCRIPT_SEED_COUNT);
        assert_eq!(seed_count(Some("50".into())).unwrap(), 50);
        assert_eq!(seed_count(Some(" 3 ".into())).unwrap(), 3);
    }

    #[test]
    fn bad_counts_are_errors() {
        assert!(matches!(
            seed_count(Some("lots".into())),
            Err(ShowcaseError::ParseSeedCount { original, .. }) if original == "lots"
        ));
        assert!(seed_count(Some("-1".into())).is_err());
    }
}
