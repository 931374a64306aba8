use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub mailer: MailerConfig,
    /// Base URL clients reach the portal at; used for resume URLs and the
    /// login link in notification emails.
    pub portal_base_url: String,
    /// Pause between consecutive email attempts during fan-out (provider
    /// rate limit).
    pub email_send_delay_ms: u64,
    /// Enables dangerous operations like purge. Must never be true in production.
    pub test_mode: bool,
    /// Maximum resume upload size in bytes
    pub max_upload_size: u64,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    pub data_dir: String,
}

#[derive(Debug, Clone)]
pub enum StorageBackend {
    Gcs,
    Local,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Directory for local storage backend
    pub local_storage_path: String,
    /// GCS bucket name (required when backend is gcs)
    pub gcs_bucket: Option<String>,
    /// Path to GCS service account JSON (optional, defaults to ADC)
    pub gcs_credentials_file: Option<String>,
}

#[derive(Debug, Clone)]
pub enum MailerBackend {
    EmailJs,
    Smtp,
}

#[derive(Debug, Clone)]
pub struct MailerConfig {
    pub backend: MailerBackend,
    pub smtp: SmtpConfig,
    pub emailjs: EmailJsConfig,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub relay: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// From mailbox, e.g. `Placement Portal <no-reply@example.edu>`
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct EmailJsConfig {
    pub api_url: String,
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Local,
            local_storage_path: "./files".to_string(),
            gcs_bucket: None,
            gcs_credentials_file: None,
        }
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            relay: "localhost".to_string(),
            port: 25,
            username: None,
            password: None,
            from: "Placement Portal <no-reply@localhost>".to_string(),
        }
    }
}

impl Default for EmailJsConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.emailjs.com/api/v1.0/email/send".to_string(),
            service_id: String::new(),
            template_id: String::new(),
            public_key: String::new(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let bind_address =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string());

        let test_mode = std::env::var("TEST_MODE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let max_upload_size = std::env::var("MAX_UPLOAD_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10 * 1024 * 1024); // 10MB

        let portal_base_url =
            std::env::var("PORTAL_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());

        let email_send_delay_ms = std::env::var("EMAIL_SEND_DELAY_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(500);

        let storage_backend = match std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "local".to_string())
            .to_lowercase()
            .as_str()
        {
            "gcs" => StorageBackend::Gcs,
            _ => StorageBackend::Local,
        };

        let local_storage_path =
            std::env::var("LOCAL_STORAGE_PATH").unwrap_or_else(|_| "./files".to_string());

        let gcs_bucket = std::env::var("GCS_BUCKET").ok();
        let gcs_credentials_file = std::env::var("GCS_CREDENTIALS_FILE").ok();

        let mailer_backend = match std::env::var("MAILER_BACKEND")
            .unwrap_or_else(|_| "smtp".to_string())
            .to_lowercase()
            .as_str()
        {
            "emailjs" => MailerBackend::EmailJs,
            _ => MailerBackend::Smtp,
        };

        let smtp_defaults = SmtpConfig::default();
        let smtp = SmtpConfig {
            relay: std::env::var("SMTP_RELAY").unwrap_or(smtp_defaults.relay),
            port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(smtp_defaults.port),
            username: std::env::var("SMTP_USERNAME").ok(),
            password: std::env::var("SMTP_PASSWORD").ok(),
            from: std::env::var("SMTP_FROM").unwrap_or(smtp_defaults.from),
        };

        let emailjs_defaults = EmailJsConfig::default();
        let emailjs = EmailJsConfig {
            api_url: std::env::var("EMAILJS_API_URL").unwrap_or(emailjs_defaults.api_url),
            service_id: std::env::var("EMAILJS_SERVICE_ID").unwrap_or_default(),
            template_id: std::env::var("EMAILJS_TEMPLATE_ID").unwrap_or_default(),
            public_key: std::env::var("EMAILJS_PUBLIC_KEY").unwrap_or_default(),
        };

        let config = Config {
            server: ServerConfig {
                bind_address,
                data_dir,
            },
            storage: StorageConfig {
                backend: storage_backend,
                local_storage_path,
                gcs_bucket,
                gcs_credentials_file,
            },
            mailer: MailerConfig {
                backend: mailer_backend,
                smtp,
                emailjs,
            },
            portal_base_url,
            email_send_delay_ms,
            test_mode,
            max_upload_size,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if matches!(self.storage.backend, StorageBackend::Gcs) && self.storage.gcs_bucket.is_none()
        {
            return Err(ConfigError::ValidationError(
                "GCS_BUCKET is required when STORAGE_BACKEND=gcs".to_string(),
            ));
        }

        if matches!(self.mailer.backend, MailerBackend::EmailJs) {
            let emailjs = &self.mailer.emailjs;
            if emailjs.service_id.is_empty()
                || emailjs.template_id.is_empty()
                || emailjs.public_key.is_empty()
            {
                return Err(ConfigError::ValidationError(
                    "EMAILJS_SERVICE_ID, EMAILJS_TEMPLATE_ID and EMAILJS_PUBLIC_KEY are required when MAILER_BACKEND=emailjs"
                        .to_string(),
                ));
            }
        }

        if matches!(self.mailer.backend, MailerBackend::Smtp) && self.mailer.smtp.from.is_empty() {
            return Err(ConfigError::ValidationError(
                "SMTP_FROM cannot be empty".to_string(),
            ));
        }

        if self.portal_base_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "PORTAL_BASE_URL cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
