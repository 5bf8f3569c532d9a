//! Derived dashboard views computed from the task cache.
//!
//! Every view is a pure, synchronous function of a task snapshot and
//! (where relevant) the current instant. No view holds state of its own;
//! callers recompute after every cache change, and given the same inputs
//! the outputs are identical.

mod activity;
mod calendar;
mod deadlines;
mod filter;
mod notifications;
mod summary;

pub use activity::{ActivityEntry, ActivityIcon, RECENT_ACTIVITY_LIMIT, recent_activity};
pub use calendar::{CalendarEvent, EventColor, calendar_events};
pub use deadlines::{UPCOMING_DEADLINES_LIMIT, upcoming_deadlines};
pub use filter::filter_tasks;
pub use notifications::{DueWhen, Notification, notifications};
pub use summary::{Summary, summary};
