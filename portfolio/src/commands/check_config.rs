use portfolio_config::Config;

use crate::environment::ConfigProvider;

/// Make sure the loaded config can be turned into the service configs.
pub fn check_config(config: &Config, verbose: bool) -> anyhow::Result<()> {
    ConfigProvider::new(config)?;
    if verbose {
        println!("{config:#?}");
    }
    Ok(())
}
