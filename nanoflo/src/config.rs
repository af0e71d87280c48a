/// Configuration shared by every nanoflo binary, regardless of what it does
/// with it. Mirrors the teacher's `glonax::GlobalConfig`/`Configurable` split
/// so a future second binary in this workspace can reuse `GlobalConfig`
/// without depending on this crate's daemon-specific fields.
pub trait Configurable: Clone {
    fn global(&self) -> &GlobalConfig;
}

#[derive(Clone, Debug)]
pub struct GlobalConfig {
    pub bin_name: String,
    pub daemon: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self { bin_name: String::new(), daemon: false }
    }
}

impl Configurable for GlobalConfig {
    fn global(&self) -> &GlobalConfig {
        self
    }
}

/// The `nanoflo` daemon's own configuration: which transport to drive the
/// network with, and at what cadence.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct NanofloConfig {
    #[serde(skip)]
    pub global: GlobalConfig,

    /// Path to the serial device; ignored when running with `--sim`.
    pub device: Option<String>,
    /// Baud rate for `device`.
    #[serde(default = "default_baud")]
    pub baud: u32,
    /// Milliseconds between `Network::run_tick` calls.
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,
}

fn default_baud() -> u32 {
    115_200
}

fn default_tick_millis() -> u64 {
    10
}

impl Default for NanofloConfig {
    fn default() -> Self {
        Self {
            global: GlobalConfig::default(),
            device: None,
            baud: default_baud(),
            tick_millis: default_tick_millis(),
        }
    }
}

impl Configurable for NanofloConfig {
    fn global(&self) -> &GlobalConfig {
        &self.global
    }
}

/// Load a `NanofloConfig` from a TOML file, matching the teacher's
/// `glonax::config::from_toml` helper.
pub fn from_toml(path: impl AsRef<std::path::Path>) -> std::io::Result<NanofloConfig> {
    use std::io::Read;

    let mut contents = String::new();
    std::fs::File::open(path)?.read_to_string(&mut contents)?;

    toml::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}
