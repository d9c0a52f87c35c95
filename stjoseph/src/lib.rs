//! Schedules a parish's weekly Mass livestream on YouTube.
//!
//! Target dates come from a [`mass::LiturgicalCalendar`], the broadcast text from
//! [`generators`], and every change to the channel goes through [`channel::Channel`], which owns
//! the OAuth credentials (see [`credentials`]) and retries remote calls (see [`retry`]).

pub mod channel;
pub mod cli;
pub mod credentials;
pub mod generators;
pub mod livestream;
pub mod mass;
pub mod oauth;
pub mod retry;
pub mod schedule;
pub mod usccb;
pub mod youtube_api;

pub use channel::{BroadcastPlan, Channel, ScheduleOutcome, ValidationError};
pub use credentials::{AuthError, Credentials, CredentialsManager};
pub use livestream::LiveStream;
pub use mass::{LiturgicalCalendar, Mass, MassType, Reading, Section};
pub use schedule::{BatchReport, Broadcasts, ScheduleOptions, Scheduler, Upsert};
