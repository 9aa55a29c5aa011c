/// Forgelight backend configuration. Sane defaults provided (mailbox present
/// mode, 1x AA, default arena sizes).
#[derive(Builder)]
#[builder(default)]
pub struct Config {
  pub requested_width: u32,
  pub requested_height: u32,
  pub application_details: ApplicationDetails<'static>,
  pub engine_details: EngineDetails<'static>,
  pub present_mode: PresentMode,
  pub aa_config: AntiAliasingConfig,
  pub arena_sizes: ArenaSizes,
}
impl Config {
  pub fn builder() -> ConfigBuilder {
    ConfigBuilder::default()
  }
}
impl Default for Config {
  fn default() -> Self {
    Self {
      requested_width: 800,
      requested_height: 600,
      application_details: ApplicationDetails::default(),
      engine_details: EngineDetails::default(),
      present_mode: PresentMode::default(),
      aa_config: AntiAliasingConfig::default(),
      arena_sizes: ArenaSizes::default(),
    }
  }
}

// ================================================================================
//  Version struct
// ================================================================================
/// A simple version with major, minor and patch fields for specifying
/// information about your application.
#[derive(Copy, Clone)]
pub struct Version {
  major: u32,
  minor: u32,
  patch: u32,
}
impl Version {
  pub fn new(major: u32, minor: u32, patch: u32) -> Self {
    Self {
      major,
      minor,
      patch,
    }
  }

  /// Major, minor, patch packed into a single u32, 10 bits each.
  pub fn packed(self) -> u32 {
    (self.major << 20) | (self.minor << 10) | self.patch
  }
}
impl Default for Version {
  fn default() -> Self {
    Self {
      major: 0,
      minor: 1,
      patch: 0,
    }
  }
}

// ================================================================================
//  ApplicationDetails / EngineDetails structs
// ================================================================================
/// Application details and version for your application.
#[derive(Copy, Clone)]
pub struct ApplicationDetails<'a> {
  pub name: &'a str,
  pub version: Version,
}
impl<'a> ApplicationDetails<'a> {
  pub fn new(name: &'a str, version: Version) -> Self {
    Self { name, version }
  }
}
impl<'a> Default for ApplicationDetails<'a> {
  fn default() -> Self {
    Self {
      name: "Nameless Application",
      version: Version::new(0, 1, 0),
    }
  }
}

/// Engine details and version, separate from the application's so the
/// backend can report both at init time.
#[derive(Copy, Clone)]
pub struct EngineDetails<'a> {
  pub name: &'a str,
  pub version: Version,
}
impl<'a> EngineDetails<'a> {
  pub fn new(name: &'a str, version: Version) -> Self {
    Self { name, version }
  }
}
impl<'a> Default for EngineDetails<'a> {
  fn default() -> Self {
    Self {
      name: "Forgelight",
      version: Version::new(0, 1, 0),
    }
  }
}

/// Determines present mode. Default is Mailbox if possible, to allow for
/// frame rate equal to screen refresh while continuing to draw; backends
/// fall back to Fifo when Mailbox isn't available.
#[derive(Copy, Clone)]
pub enum PresentMode {
  Immediate,
  Mailbox,
  Fifo,
}
impl Default for PresentMode {
  fn default() -> PresentMode {
    PresentMode::Mailbox
  }
}

/// Configuration for AA. Sample count must be a power of 2.
#[derive(Copy, Clone)]
pub enum AntiAliasingConfig {
  Msaa(NumSamples),
  None,
}
impl Default for AntiAliasingConfig {
  fn default() -> AntiAliasingConfig {
    AntiAliasingConfig::None
  }
}
#[derive(Copy, Clone)]
pub enum NumSamples {
  One,
  Two,
  Four,
  Eight,
}
impl Default for NumSamples {
  fn default() -> NumSamples {
    NumSamples::One
  }
}

/// Override sizes for the three per-frame transient upload arenas. Defaults
/// match the sizes called for by the command context's binding contract.
#[derive(Copy, Clone)]
pub struct ArenaSizes {
  pub vertex_arena_bytes: usize,
  pub index_arena_bytes: usize,
  pub constant_arena_bytes: usize,
}
impl Default for ArenaSizes {
  fn default() -> Self {
    Self {
      vertex_arena_bytes: 4 * 1024 * 1024,
      index_arena_bytes: 1024 * 1024,
      constant_arena_bytes: 256 * 1024,
    }
  }
}
