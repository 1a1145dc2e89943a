//! Derived views over the part repository
//!
//! Pure functions of the part list; memoized by [`cache::ViewCache`].

pub mod cache;
pub mod calendar;
pub mod history;
pub mod statistics;
pub mod suggestions;

pub use cache::ViewCache;
pub use calendar::{activity_by_day, CalendarMonth, DayActivity};
pub use history::{build_history, HistoryDay, HistoryMonth, HistoryView, VehicleGroup};
pub use statistics::{build_statistics, LeaderboardEntry, Statistics, StatisticsTarget};
pub use suggestions::{build_suggestions, Suggestions};
