//! Command-line interface.

use crate::channel::Channel;
use crate::credentials::CredentialsManager;
use crate::livestream::LiveStream;
use crate::mass::{LiturgicalCalendar, MassType};
use crate::schedule::{
    DEFAULT_TIMEZONE, EventDescription, ScheduleOptions, Scheduler, Upsert, parse_date,
    parse_date_time,
};
use crate::usccb::UsccbProvider;
use clap::{Args, Parser, Subcommand};
use eyre::Context;
use futures::{Stream, TryStreamExt};
use jiff::civil::{Date, DateTime};
use jiff::tz::TimeZone;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "stjoseph", version)]
#[command(about = "Schedule the parish's weekly Mass livestream on YouTube")]
pub struct Cli {
    #[command(flatten)]
    pub config: Config,

    #[command(subcommand)]
    pub command: Command,
}

/// Settings shared by every command.
#[derive(Debug, Args)]
pub struct Config {
    /// The path to the OAuth client secret file
    #[arg(
        short,
        long,
        global = true,
        env = "STJOSEPH_CREDENTIALS",
        default_value = "credentials.json"
    )]
    pub credentials: PathBuf,

    /// The path to the token file
    #[arg(
        short,
        long,
        global = true,
        env = "STJOSEPH_TOKEN",
        default_value = "token.json"
    )]
    pub token: PathBuf,

    /// Image uploaded as the thumbnail of every scheduled broadcast
    #[arg(
        long,
        global = true,
        env = "STJOSEPH_THUMBNAIL",
        default_value = "thumbnail.jpg"
    )]
    pub thumbnail: PathBuf,

    /// Time zone that command-line dates are given in
    #[arg(
        long,
        global = true,
        env = "STJOSEPH_TIMEZONE",
        default_value = DEFAULT_TIMEZONE,
        value_parser = TimeZone::get
    )]
    pub timezone: TimeZone,
}

impl Config {
    pub fn channel(&self) -> eyre::Result<Channel> {
        let credentials = CredentialsManager::new(self.credentials.clone(), self.token.clone());
        Ok(Channel::new(credentials)?.with_thumbnail(self.thumbnail.clone()))
    }

    fn scheduler(&self, options: ScheduleOptions) -> eyre::Result<Scheduler<UsccbProvider, Channel>> {
        let calendar = UsccbProvider::new(self.timezone.clone())?;
        Ok(Scheduler::new(
            calendar,
            self.channel()?,
            self.timezone.clone(),
            options,
        ))
    }

    fn local(&self, date_time: DateTime) -> eyre::Result<jiff::Zoned> {
        date_time
            .to_zoned(self.timezone.clone())
            .with_context(|| format!("interpret {date_time} in the configured time zone"))
    }
}

#[derive(Debug, Clone, Args)]
pub struct PublishArgs {
    /// Make the broadcast public instead of private
    #[arg(long)]
    pub public: bool,

    /// Log what would be scheduled without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Update broadcasts that are already scheduled at the same time
    #[arg(long)]
    pub force: bool,

    /// Which of the day's Masses to take the readings from, tried in order
    #[arg(long = "type", value_enum)]
    pub mass_types: Vec<MassType>,
}

impl From<PublishArgs> for ScheduleOptions {
    fn from(args: PublishArgs) -> Self {
        Self {
            is_public: args.public,
            dry_run: args.dry_run,
            force: args.force,
            mass_types: args.mass_types,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the channels of the authenticated account
    Channels,

    /// Print the upcoming scheduled broadcasts
    ListScheduled,

    /// Print completed broadcasts
    ListCompleted {
        /// Only print broadcasts that can be pruned
        #[arg(long)]
        eligible: bool,
    },

    /// Delete a broadcast
    DeleteBroadcast { broadcast_id: String },

    /// Delete all but the first broadcast scheduled at each start time
    DeleteDuplicates {
        #[arg(long)]
        dry_run: bool,
    },

    /// Delete completed broadcasts that were aborted or never published
    PruneCompleted {
        #[arg(long)]
        dry_run: bool,
    },

    /// Schedule the Mass celebrated at DATE ("YYYY-MM-DD HH:MM")
    ScheduleMass {
        #[arg(value_parser = parse_date_time)]
        date: DateTime,

        /// The date of the Mass whose readings to use ("YYYY-MM-DD")
        #[arg(short, long, value_parser = parse_date)]
        mass_date: Option<Date>,

        #[command(flatten)]
        publish: PublishArgs,
    },

    /// Schedule the Saturday vigil Mass for every Sunday in a window
    ScheduleMasses {
        /// First day of the window ("YYYY-MM-DD"), today by default
        #[arg(short, long, value_parser = parse_date)]
        start: Option<Date>,

        /// Last day of the window ("YYYY-MM-DD"), four weeks after the start by default
        #[arg(short, long, value_parser = parse_date)]
        end: Option<Date>,

        #[command(flatten)]
        publish: PublishArgs,
    },

    /// Schedule a one-off event at DATE ("YYYY-MM-DD HH:MM")
    ScheduleEvent {
        title: String,

        #[arg(value_parser = parse_date_time)]
        date: DateTime,

        /// Description of the event
        #[arg(short, long, required_unless_present = "mass_date")]
        description: Option<String>,

        /// Generate the description from this day's readings instead ("YYYY-MM-DD")
        #[arg(short, long, value_parser = parse_date, conflicts_with = "description")]
        mass_date: Option<Date>,

        #[command(flatten)]
        publish: PublishArgs,
    },
}

async fn print_streams(
    mut streams: impl Stream<Item = eyre::Result<LiveStream>> + Unpin,
    only_eligible: bool,
) -> eyre::Result<()> {
    let now = jiff::Timestamp::now();
    while let Some(stream) = streams.try_next().await? {
        if !only_eligible || stream.is_eligible_for_deletion_at(now) {
            println!("{stream}");
        }
    }
    Ok(())
}

fn print_upsert(upsert: &Upsert) {
    match upsert {
        Upsert::Scheduled(outcome) | Upsert::Updated(outcome) => println!("{outcome}"),
        Upsert::Skipped { id } => tracing::info!(%id, "nothing to do"),
    }
}

pub async fn run(cli: Cli) -> eyre::Result<()> {
    let Cli { config, command } = cli;
    match command {
        Command::Channels => {
            for channel in config.channel()?.get_channels().await? {
                println!("{} ({})", channel.snippet.title, channel.id);
            }
        }
        Command::ListScheduled => {
            let channel = config.channel()?;
            print_streams(channel.list_scheduled_livestreams(), false).await?;
        }
        Command::ListCompleted { eligible } => {
            let channel = config.channel()?;
            print_streams(channel.list_completed_livestreams(), eligible).await?;
        }
        Command::DeleteBroadcast { broadcast_id } => {
            config.channel()?.delete_broadcast(&broadcast_id).await?;
        }
        Command::DeleteDuplicates { dry_run } => {
            let channel = config.channel()?;
            for (start, ids) in channel.get_duplicated_schedules_dates().await? {
                let Some((kept, duplicates)) = ids.split_first() else {
                    continue;
                };
                for id in duplicates {
                    tracing::info!(%start, %kept, %id, dry_run, "deleting duplicate broadcast");
                    if !dry_run {
                        channel.delete_broadcast(id).await?;
                    }
                }
            }
        }
        Command::PruneCompleted { dry_run } => {
            let channel = config.channel()?;
            let eligible = channel.list_eligible_for_deletion().await?;
            tracing::info!(count = eligible.len(), "completed broadcasts eligible for deletion");
            for stream in eligible {
                tracing::info!(%stream, dry_run, "pruning broadcast");
                if !dry_run {
                    channel.delete_broadcast(&stream.id).await?;
                }
            }
        }
        Command::ScheduleMass {
            date,
            mass_date,
            publish,
        } => {
            let when = config.local(date)?;
            let scheduler = config.scheduler(publish.into())?;
            print_upsert(&scheduler.schedule_mass(&when, mass_date).await?);
        }
        Command::ScheduleMasses {
            start,
            end,
            publish,
        } => {
            let scheduler = config.scheduler(publish.into())?;
            let start = start.unwrap_or_else(|| scheduler.calendar().today());
            let report = scheduler.schedule_masses(start, end).await?;
            if !report.missing.is_empty() {
                let missing: Vec<String> = report.missing.iter().map(Date::to_string).collect();
                tracing::warn!(?missing, "some masses could not be scheduled");
            }
        }
        Command::ScheduleEvent {
            title,
            date,
            description,
            mass_date,
            publish,
        } => {
            let when = config.local(date)?;
            let description = match (description, mass_date) {
                (_, Some(day)) => EventDescription::Readings(day),
                (Some(text), None) => EventDescription::Text(text),
                (None, None) => eyre::bail!("an event needs a description or a mass date"),
            };
            let scheduler = config.scheduler(publish.into())?;
            print_upsert(&scheduler.schedule_event(&title, &when, description).await?);
        }
    }
    Ok(())
}
