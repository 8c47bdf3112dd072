//! Frosting Tabs
//!
//! Menu category tabs (Cakes / Cookies / Other). Exactly one tab is active
//! at a time; its panel is the only one shown.
//!
//! ```text
//! tab₁ ──click / arrow──▶ tab₂ ──▶ … ──▶ tabₙ
//!   ▲                                     │
//!   └──────────── ArrowRight wraps ───────┘
//! ```

mod controller;
mod error;
mod state;
mod tab;

pub use controller::{TabConfig, TabController};
pub use error::TabError;
pub use state::{TabEvent, TabSet, Transition};
pub use tab::Tab;

pub type Result<T> = std::result::Result<T, TabError>;
