//! Keeps a host's settings sidebar grouped into user folders.
//!
//! The host re-renders its navigation list whenever it likes and emits no
//! events for it. [`detector::ChangeDetector`] finds the list with a slow
//! existence probe and then watches it for structural change;
//! [`grouping::plan`] turns the items it finds plus the user's rules into a
//! plan; [`sync::PresentationSync`] replaces the previous folders with the new
//! ones. Each pass suspends detection until the records it caused have been
//! drained, so passes never trigger themselves.
//!
//! [`Organizer`] wires these together for one document and [`Driver`] runs it
//! on a tokio current-thread loop.

pub mod classes;
pub mod detector;
pub mod driver;
pub mod features;
pub mod grouping;
mod organizer;
mod state;
pub mod sync;
pub mod view;

pub use driver::Driver;
pub use driver::DriverExit;
pub use driver::EngineEvent;
pub use driver::EngineEventSender;
pub use organizer::ClickOutcome;
pub use organizer::EngineStats;
pub use organizer::InstalledPlugins;
pub use organizer::Organizer;
pub use organizer::PassOutcome;
pub use organizer::PassReport;
pub use organizer::PluginRegistry;
pub use state::EngineState;
pub use view::SidebarSnapshot;
