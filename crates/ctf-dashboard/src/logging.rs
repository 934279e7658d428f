use tracing_subscriber::EnvFilter;

/// Variável de ambiente com o filtro de logs (sintaxe do `EnvFilter`)
pub const LOG_ENV: &str = "CTF_LOG";

/// Logs vão para stderr; stdout fica só com os cards.
pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    // idempotente
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_err()
    {
        tracing::debug!("subscriber de logs já instalado");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice() {
        init(false);
        init(true);
        tracing::debug!("ainda registrando");
    }
}
