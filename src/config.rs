use envconfig::Envconfig;

#[derive(Envconfig, Debug, Clone)]
pub struct Config {
    #[envconfig(from = "DATABASE_URL")]
    pub database_url: String,

    #[envconfig(from = "DATABASE_NAME", default = "medistore")]
    pub database_name: String,

    #[envconfig(from = "JWT_SECRET")]
    pub jwt_secret: String,

    /// Lifetime of issued access tokens, in seconds.
    #[envconfig(from = "TOKEN_TTL_SECS", default = "3600")]
    pub token_ttl_secs: i64,

    #[envconfig(from = "STRIPE_SECRET_KEY")]
    pub stripe_secret_key: String,

    #[envconfig(from = "STRIPE_API_BASE", default = "https://api.stripe.com")]
    pub stripe_api_base: String,

    #[envconfig(from = "PAYMENT_CURRENCY", default = "usd")]
    pub payment_currency: String,

    #[envconfig(from = "PROCESSOR_TIMEOUT_SECS", default = "30")]
    pub processor_timeout_secs: u64,

    #[envconfig(from = "BIND_ADDRESS", default = "127.0.0.1:8080")]
    pub bind_address: String,
}
