use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory with an initial `config.json` and an empty ledger database.
///
/// # Arguments
/// - `mototaxi_home` - The directory that will be the root of data directory, e.g.
///   `$HOME/mototaxi`
/// - `timezone` - The IANA timezone the business day is counted in, `America/Caracas` if `None`
///
/// # Errors
/// - Returns an error if the directory was already initialized or any file operation fails.
pub async fn init(mototaxi_home: &Path, timezone: Option<&str>) -> Result<Out<()>> {
    let config = Config::create(mototaxi_home, timezone)
        .await
        .context("Unable to create the data directory and configs")
        .pub_result(ErrorType::Config)?;
    Ok(format!(
        "Created the mototaxi ledger in {} (timezone {})",
        config.root().display(),
        config.timezone()
    )
    .into())
}
