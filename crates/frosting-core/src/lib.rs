//! Frosting Core
//!
//! Wires the menu page behaviours onto a [`Page`]: mobile navigation, menu
//! tabs, the image lightbox and (with the `equalizer` feature) the aside
//! height lock. Each behaviour attaches on its own; one that finds its
//! markup missing is skipped without affecting the others.

mod config;
mod enhancer;
mod error;

pub use config::Config;
pub use enhancer::{Enhancer, EnhancerStatus};
pub use error::CoreError;

// Re-export the behaviours
pub use frosting_dom::{Document, DomError, DomEvent, ElementRef, EventKind, EventTarget, Key, Page};
#[cfg(feature = "equalizer")]
pub use frosting_equalizer::{EqualizerConfig, EqualizerError, HeightEqualizer};
pub use frosting_lightbox::{
    LightboxConfig, LightboxController, LightboxError, LightboxEvent, LightboxState,
};
pub use frosting_navigation::{MenuState, MenuToggleConfig, MenuToggleController, NavigationError};
pub use frosting_tabs::{TabConfig, TabController, TabError, TabEvent};
pub use frosting_timers::{ManualScheduler, Scheduler};

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, EnvFilter};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging through `make_writer`.
///
/// Timestamps and colours are left out so the output suits hosts without a
/// system clock or terminal, such as the browser console. A second call
/// leaves the first subscriber in place.
pub fn init_logging_with<W>(make_writer: W)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(make_writer)
        .without_time()
        .with_ansi(false)
        .try_init();
    if installed.is_err() {
        tracing::debug!("Logging already initialized");
    }
}
