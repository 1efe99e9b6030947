//! Service settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `IMMUNISATION_*` environment variables or a
//! configuration file. Everything is optional; [`ServiceSettings::resolve`]
//! applies the fallbacks and turns the raw strings into typed domain
//! configuration, failing fast on anything malformed.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use immunisation::domain::{
    DailySchedule, EmailAddress, GuardianValidationError, ReferenceZone, ReminderDedupePolicy,
    ReminderScannerConfig, SchedulerError,
};
use immunisation::inbound::http::session_config::{SESSION_KEY_DEFAULT_PATH, SessionToggles};
use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_REMINDER_TIME: &str = "09:00";
const DEFAULT_DELIVERY_TIMEOUT_SECONDS: u64 = 10;
const DEFAULT_SCAN_CONCURRENCY: usize = 4;

/// Raw configuration values.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "IMMUNISATION")]
pub struct ServiceSettings {
    /// PostgreSQL URL. Falls back to `DATABASE_URL`; absent means in-memory
    /// storage.
    #[ortho_config(cli_short = 'd')]
    pub database_url: Option<String>,
    /// Socket address for the HTTP listener.
    #[ortho_config(cli_short = 'b')]
    pub bind_addr: Option<String>,
    /// Daily reminder scan time, `HH:MM` in the reference zone.
    #[ortho_config(cli_short = 't')]
    pub reminder_time: Option<String>,
    /// Reference zone offset east of UTC, in minutes.
    #[ortho_config(cli_short = 'z')]
    pub reference_utc_offset_minutes: Option<i32>,
    /// E-mail relay endpoint.
    #[ortho_config(cli_short = 'r')]
    pub delivery_relay_url: Option<String>,
    /// `From` address for reminders.
    #[ortho_config(cli_short = 'f')]
    pub delivery_sender: Option<String>,
    /// Per-send delivery budget.
    #[ortho_config(cli_short = 'w')]
    pub delivery_timeout_seconds: Option<u64>,
    /// Reminder deliveries in flight at once.
    #[ortho_config(cli_short = 'c')]
    pub scan_concurrency: Option<usize>,
    /// `none` or `skip-when-sent`.
    #[ortho_config(cli_short = 'u')]
    pub reminder_dedupe: Option<String>,
    /// Session key file.
    #[ortho_config(cli_short = 'k')]
    pub session_key_file: Option<PathBuf>,
    /// Permit a generated session key when the file is missing.
    #[ortho_config(default = false, cli_short = 'e')]
    pub session_allow_ephemeral: bool,
    /// Mark session cookies `Secure`; defaults to true.
    #[ortho_config(cli_short = 's')]
    pub cookie_secure: Option<bool>,
}

/// Outward delivery selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliverySettings {
    /// POST reminders to an e-mail relay.
    Relay {
        /// Relay URL that accepts the JSON message.
        endpoint: Url,
        /// `From` address stamped on every reminder.
        sender: EmailAddress,
        /// Per-request budget.
        timeout: Duration,
    },
    /// Log and report simulated success.
    Unconfigured,
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeSettings {
    /// PostgreSQL URL; `None` selects in-memory storage.
    pub database_url: Option<String>,
    /// Address the HTTP server binds.
    pub bind_addr: SocketAddr,
    /// Zone used for due dates, completion stamps and the scan window.
    pub zone: ReferenceZone,
    /// Local time of the daily reminder scan.
    pub schedule: DailySchedule,
    /// Concurrency, timeout and dedupe for the scan.
    pub scanner: ReminderScannerConfig,
    /// How reminders leave the service.
    pub delivery: DeliverySettings,
    /// Session key source and cookie flags.
    pub session: SessionToggles,
}

/// Errors raised while resolving settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The bind address is not a socket address.
    #[error("invalid bind address {value:?}")]
    BindAddr { value: String },
    /// The reminder time is not `HH:MM`.
    #[error(transparent)]
    ReminderTime(#[from] SchedulerError),
    /// The reference offset is a day or more from UTC.
    #[error("reference offset {minutes} minutes is outside ±24 hours")]
    ReferenceOffset { minutes: i32 },
    /// The relay URL does not parse.
    #[error("invalid delivery relay URL {value:?}")]
    RelayUrl { value: String },
    /// The sender is not a valid e-mail address.
    #[error("invalid delivery sender: {0}")]
    Sender(#[from] GuardianValidationError),
    /// Only one of relay URL and sender was set.
    #[error("delivery relay needs both a relay URL and a sender address")]
    IncompleteRelay,
    /// The dedupe policy name is unknown.
    #[error("reminder dedupe must be none or skip-when-sent, got {value:?}")]
    Dedupe { value: String },
    /// A count or timeout that must be positive was zero.
    #[error("{name} must be greater than zero")]
    Zero { name: &'static str },
}

impl ServiceSettings {
    /// Apply fallbacks and validate.
    ///
    /// `database_url_fallback` is consulted only when no database URL was
    /// configured under the service prefix.
    pub fn resolve(
        &self,
        database_url_fallback: Option<String>,
    ) -> Result<RuntimeSettings, SettingsError> {
        let bind_raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        let bind_addr = bind_raw.parse().map_err(|_| SettingsError::BindAddr {
            value: bind_raw.to_owned(),
        })?;

        let minutes = self.reference_utc_offset_minutes.unwrap_or(0);
        let zone = ReferenceZone::from_offset_minutes(minutes)
            .ok_or(SettingsError::ReferenceOffset { minutes })?;

        let schedule = DailySchedule::parse(
            self.reminder_time.as_deref().unwrap_or(DEFAULT_REMINDER_TIME),
            zone,
        )?;

        let timeout_seconds = positive(
            self.delivery_timeout_seconds
                .unwrap_or(DEFAULT_DELIVERY_TIMEOUT_SECONDS),
            "delivery timeout",
        )?;
        let delivery_timeout = Duration::from_secs(timeout_seconds);
        let scanner = ReminderScannerConfig {
            max_concurrent_deliveries: positive(
                self.scan_concurrency.unwrap_or(DEFAULT_SCAN_CONCURRENCY),
                "scan concurrency",
            )?,
            delivery_timeout,
            dedupe: self.dedupe_policy()?,
        };

        Ok(RuntimeSettings {
            database_url: self
                .database_url
                .clone()
                .or(database_url_fallback)
                .filter(|url| !url.trim().is_empty()),
            bind_addr,
            zone,
            schedule,
            scanner,
            delivery: self.delivery_settings(delivery_timeout)?,
            session: SessionToggles {
                key_file: self
                    .session_key_file
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(SESSION_KEY_DEFAULT_PATH)),
                allow_ephemeral: self.session_allow_ephemeral,
                cookie_secure: self.cookie_secure.unwrap_or(true),
            },
        })
    }

    fn dedupe_policy(&self) -> Result<ReminderDedupePolicy, SettingsError> {
        match self.reminder_dedupe.as_deref().map(str::trim) {
            None | Some("none") => Ok(ReminderDedupePolicy::Disabled),
            Some("skip-when-sent") => Ok(ReminderDedupePolicy::SkipWhenSent),
            Some(other) => Err(SettingsError::Dedupe {
                value: other.to_owned(),
            }),
        }
    }

    fn delivery_settings(&self, timeout: Duration) -> Result<DeliverySettings, SettingsError> {
        match (&self.delivery_relay_url, &self.delivery_sender) {
            (None, None) => Ok(DeliverySettings::Unconfigured),
            (Some(url), Some(sender)) => {
                let endpoint = Url::parse(url).map_err(|_| SettingsError::RelayUrl {
                    value: url.clone(),
                })?;
                Ok(DeliverySettings::Relay {
                    endpoint,
                    sender: EmailAddress::new(sender.as_str())?,
                    timeout,
                })
            }
            _ => Err(SettingsError::IncompleteRelay),
        }
    }
}

fn positive<T: PartialEq + Default>(value: T, name: &'static str) -> Result<T, SettingsError> {
    if value == T::default() {
        Err(SettingsError::Zero { name })
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings loading and validation.

    use std::ffi::OsString;

    use chrono::NaiveTime;
    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    const VARS: [&str; 12] = [
        "IMMUNISATION_DATABASE_URL",
        "IMMUNISATION_BIND_ADDR",
        "IMMUNISATION_REMINDER_TIME",
        "IMMUNISATION_REFERENCE_UTC_OFFSET_MINUTES",
        "IMMUNISATION_DELIVERY_RELAY_URL",
        "IMMUNISATION_DELIVERY_SENDER",
        "IMMUNISATION_DELIVERY_TIMEOUT_SECONDS",
        "IMMUNISATION_SCAN_CONCURRENCY",
        "IMMUNISATION_REMINDER_DEDUPE",
        "IMMUNISATION_SESSION_KEY_FILE",
        "IMMUNISATION_SESSION_ALLOW_EPHEMERAL",
        "IMMUNISATION_COOKIE_SECURE",
    ];

    fn env_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    fn load_from_empty_args() -> ServiceSettings {
        ServiceSettings::load_from_iter([OsString::from("immunisation")])
            .expect("config should load")
    }

    fn blank() -> ServiceSettings {
        ServiceSettings {
            database_url: None,
            bind_addr: None,
            reminder_time: None,
            reference_utc_offset_minutes: None,
            delivery_relay_url: None,
            delivery_sender: None,
            delivery_timeout_seconds: None,
            scan_concurrency: None,
            reminder_dedupe: None,
            session_key_file: None,
            session_allow_ephemeral: false,
            cookie_secure: None,
        }
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(env_with(&[]));

        let runtime = load_from_empty_args().resolve(None).expect("valid defaults");

        assert!(runtime.database_url.is_none());
        assert_eq!(runtime.bind_addr, "0.0.0.0:8080".parse().expect("addr"));
        assert_eq!(runtime.zone, ReferenceZone::utc());
        assert_eq!(
            runtime.schedule.run_at(),
            NaiveTime::from_hms_opt(9, 0, 0).expect("time")
        );
        assert_eq!(runtime.scanner, ReminderScannerConfig::default());
        assert_eq!(runtime.delivery, DeliverySettings::Unconfigured);
        assert!(runtime.session.cookie_secure);
        assert!(!runtime.session.allow_ephemeral);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("IMMUNISATION_BIND_ADDR", "127.0.0.1:9000"),
            ("IMMUNISATION_REMINDER_TIME", "07:30"),
            ("IMMUNISATION_REFERENCE_UTC_OFFSET_MINUTES", "330"),
            ("IMMUNISATION_DELIVERY_RELAY_URL", "https://relay.example.org/send"),
            ("IMMUNISATION_DELIVERY_SENDER", "reminders@example.org"),
            ("IMMUNISATION_DELIVERY_TIMEOUT_SECONDS", "3"),
            ("IMMUNISATION_SCAN_CONCURRENCY", "8"),
            ("IMMUNISATION_REMINDER_DEDUPE", "skip-when-sent"),
        ]));

        let runtime = load_from_empty_args().resolve(None).expect("valid overrides");

        assert_eq!(runtime.bind_addr, "127.0.0.1:9000".parse().expect("addr"));
        assert_eq!(
            runtime.zone,
            ReferenceZone::from_offset_minutes(330).expect("zone")
        );
        assert_eq!(
            runtime.schedule.run_at(),
            NaiveTime::from_hms_opt(7, 30, 0).expect("time")
        );
        assert_eq!(runtime.scanner.max_concurrent_deliveries, 8);
        assert_eq!(runtime.scanner.delivery_timeout, Duration::from_secs(3));
        assert_eq!(runtime.scanner.dedupe, ReminderDedupePolicy::SkipWhenSent);
        assert!(matches!(
            runtime.delivery,
            DeliverySettings::Relay { ref endpoint, .. }
                if endpoint.as_str() == "https://relay.example.org/send"
        ));
    }

    #[rstest]
    #[case(Some("postgres://svc@db/immunisation".to_owned()), None, Some("postgres://svc@db/immunisation"))]
    #[case(None, Some("postgres://fallback@db/x".to_owned()), Some("postgres://fallback@db/x"))]
    #[case(Some("  ".to_owned()), None, None)]
    fn database_url_prefers_prefixed_value(
        #[case] configured: Option<String>,
        #[case] fallback: Option<String>,
        #[case] expected: Option<&str>,
    ) {
        let settings = ServiceSettings {
            database_url: configured,
            ..blank()
        };
        let runtime = settings.resolve(fallback).expect("valid");
        assert_eq!(runtime.database_url.as_deref(), expected);
    }

    #[rstest]
    #[case(ServiceSettings { bind_addr: Some("nowhere".into()), ..blank() })]
    #[case(ServiceSettings { reminder_time: Some("9am".into()), ..blank() })]
    #[case(ServiceSettings { reference_utc_offset_minutes: Some(1440), ..blank() })]
    #[case(ServiceSettings { delivery_sender: Some("a@b.org".into()), ..blank() })]
    #[case(ServiceSettings { reminder_dedupe: Some("always".into()), ..blank() })]
    #[case(ServiceSettings { scan_concurrency: Some(0), ..blank() })]
    #[case(ServiceSettings {
        delivery_relay_url: Some("not a url".into()),
        delivery_sender: Some("a@b.org".into()),
        ..blank()
    })]
    fn malformed_settings_fail_fast(#[case] settings: ServiceSettings) {
        assert!(settings.resolve(None).is_err());
    }
}
