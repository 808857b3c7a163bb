use std::path::{Path, PathBuf};

use serde::Deserialize;

use kitpanel_types::{InstrumentId, TypePolicy};

use crate::knob::{DEFAULT_MAX, DEFAULT_MIN};
use crate::router::RouterConfig;

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    router: RouterSection,
    #[serde(default)]
    controls: ControlsSection,
    #[serde(default)]
    instruments: InstrumentsSection,
    #[serde(default)]
    host: HostSection,
}

#[derive(Deserialize, Default)]
struct RouterSection {
    ui_updates: Option<bool>,
    console_logging: Option<bool>,
    host_bridge: Option<bool>,
}

#[derive(Deserialize, Default)]
struct ControlsSection {
    min: Option<f64>,
    max: Option<f64>,
}

#[derive(Deserialize, Default)]
struct InstrumentsSection {
    default: Option<String>,
    type_policy: Option<String>,
}

#[derive(Deserialize, Default)]
struct HostSection {
    osc_addr: Option<String>,
}

pub struct Config {
    router: RouterSection,
    controls: ControlsSection,
    instruments: InstrumentsSection,
    host: HostSection,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_file(embedded())
    }
}

impl Config {
    /// Built-in defaults overlaid with `~/.config/kitpanel/config.toml`, if present.
    pub fn load() -> Self {
        match user_config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Built-in defaults overlaid with the file at `path`. A missing or
    /// malformed file leaves the defaults untouched.
    pub fn load_from(path: &Path) -> Self {
        let mut base = embedded();

        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                    Ok(user) => merge(&mut base, user),
                    Err(e) => {
                        log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                    }
                },
                Err(e) => {
                    log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
                }
            }
        }

        Self::from_file(base)
    }

    /// Built-in defaults overlaid with `overrides`.
    pub fn from_toml_str(overrides: &str) -> Result<Self, toml::de::Error> {
        let mut base = embedded();
        merge(&mut base, toml::from_str(overrides)?);
        Ok(Self::from_file(base))
    }

    fn from_file(file: ConfigFile) -> Self {
        Config {
            router: file.router,
            controls: file.controls,
            instruments: file.instruments,
            host: file.host,
        }
    }

    pub fn router(&self) -> RouterConfig {
        let fallback = RouterConfig::default();
        RouterConfig {
            ui_updates: self.router.ui_updates.unwrap_or(fallback.ui_updates),
            console_logging: self
                .router
                .console_logging
                .unwrap_or(fallback.console_logging),
            host_bridge: self.router.host_bridge.unwrap_or(fallback.host_bridge),
        }
    }

    /// Knob range as configured. Knobs sanitize it themselves.
    pub fn knob_range(&self) -> (f64, f64) {
        (
            self.controls.min.unwrap_or(DEFAULT_MIN),
            self.controls.max.unwrap_or(DEFAULT_MAX),
        )
    }

    pub fn initial_instrument(&self) -> InstrumentId {
        let configured = self.instruments.default.as_deref();
        match configured.map(InstrumentId::parse) {
            Some(Some(id)) => id,
            Some(None) => {
                log::warn!(target: "config", "unknown default instrument {:?}", configured);
                InstrumentId::default()
            }
            None => InstrumentId::default(),
        }
    }

    pub fn type_policy(&self) -> TypePolicy {
        self.instruments
            .type_policy
            .as_deref()
            .and_then(TypePolicy::parse)
            .unwrap_or_default()
    }

    /// UDP target for the OSC host bridge. Unset or blank means no host.
    pub fn osc_addr(&self) -> Option<&str> {
        self.host
            .osc_addr
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

fn embedded() -> ConfigFile {
    match toml::from_str(DEFAULT_CONFIG) {
        Ok(file) => file,
        Err(e) => {
            log::error!(target: "config", "embedded config.toml is invalid: {}", e);
            ConfigFile::default()
        }
    }
}

pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("kitpanel").join("config.toml"))
}

fn merge(base: &mut ConfigFile, user: ConfigFile) {
    merge_router(&mut base.router, user.router);
    merge_controls(&mut base.controls, user.controls);
    merge_instruments(&mut base.instruments, user.instruments);
    merge_host(&mut base.host, user.host);
}

fn merge_router(base: &mut RouterSection, user: RouterSection) {
    if user.ui_updates.is_some() {
        base.ui_updates = user.ui_updates;
    }
    if user.console_logging.is_some() {
        base.console_logging = user.console_logging;
    }
    if user.host_bridge.is_some() {
        base.host_bridge = user.host_bridge;
    }
}

fn merge_controls(base: &mut ControlsSection, user: ControlsSection) {
    if user.min.is_some() {
        base.min = user.min;
    }
    if user.max.is_some() {
        base.max = user.max;
    }
}

fn merge_instruments(base: &mut InstrumentsSection, user: InstrumentsSection) {
    if user.default.is_some() {
        base.default = user.default;
    }
    if user.type_policy.is_some() {
        base.type_policy = user.type_policy;
    }
}

fn merge_host(base: &mut HostSection, user: HostSection) {
    if user.osc_addr.is_some() {
        base.osc_addr = user.osc_addr;
    }
}
