//! Core business logic, one module per aggregate.
//!
//! Every function takes a `&DatabaseConnection` (or any `ConnectionTrait`
//! implementor where it must compose into a caller's transaction) and returns
//! the crate-wide `Result`. Nothing in here knows about HTTP.

/// Accessory catalog, redemption and equipping
pub mod accessory;
/// Registration and credential verification
pub mod auth;
/// Avatar growth stages and active-day tracking
pub mod avatar;
/// Friend requests, acceptance and progress comparison
pub mod friendship;
/// Habit CRUD and the completion pipeline
pub mod habit;
/// Xp/coin awards, leveling and progress summaries
pub mod progress;
/// Task CRUD, the DONE transition and the calendar view
pub mod task;
/// Profile projections and profile updates
pub mod user;
