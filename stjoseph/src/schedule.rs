//! Deciding which Masses to put on the channel, and when.
//!
//! The parish streams its Saturday 5:30 PM vigil Mass, which uses the readings of the following
//! Sunday. Batch scheduling therefore walks the Sundays of a window, maps each to its vigil, and
//! creates a broadcast for every vigil that is not on the channel yet.

use crate::channel::{BroadcastPlan, Channel, ScheduleOutcome};
use crate::generators::{generate_description, generate_title};
use crate::mass::{LiturgicalCalendar, Mass, MassType};
use async_trait::async_trait;
use eyre::Context;
use jiff::civil::{Date, DateTime, Weekday};
use jiff::tz::TimeZone;
use jiff::{Timestamp, ToSpan, Zoned};
use std::collections::BTreeMap;

/// Hour and minute of the Saturday vigil Mass.
pub const SATURDAY_EVENING_MASS: (i8, i8) = (17, 30);

pub const DEFAULT_TIMEZONE: &str = "America/New_York";

/// How date-times are written on the command line.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Whether `when` is the Saturday vigil Mass.
pub fn is_saturday_pm_mass(when: &Zoned) -> bool {
    when.weekday() == Weekday::Saturday && (when.hour(), when.minute()) == SATURDAY_EVENING_MASS
}

/// The vigil Mass, on the Saturday before `sunday`, in the parish time zone.
pub fn to_saturday_mass(sunday: Date, tz: &TimeZone) -> eyre::Result<Zoned> {
    eyre::ensure!(
        sunday.weekday() == Weekday::Sunday,
        "{sunday} is a {:?}, not a Sunday",
        sunday.weekday()
    );
    let (hour, minute) = SATURDAY_EVENING_MASS;
    let saturday = sunday.yesterday()?;
    saturday
        .at(hour, minute, 0, 0)
        .to_zoned(tz.clone())
        .with_context(|| format!("place the vigil of {sunday} in the parish time zone"))
}

/// The Sundays in `[start, end]`, in order.
pub fn sundays_between(start: Date, end: Date) -> Vec<Date> {
    let first = if start.weekday() == Weekday::Sunday {
        start
    } else {
        match start.nth_weekday(1, Weekday::Sunday) {
            Ok(first) => first,
            Err(_) => return Vec::new(),
        }
    };
    first
        .series(1.week())
        .take_while(|sunday| *sunday <= end)
        .collect()
}

/// End of the batch window when none is given.
pub fn default_window_end(start: Date) -> Date {
    start.saturating_add(4.weeks())
}

pub fn parse_date_time(input: &str) -> Result<DateTime, jiff::Error> {
    DateTime::strptime(DATE_TIME_FORMAT, input)
}

pub fn parse_date(input: &str) -> Result<Date, jiff::Error> {
    Date::strptime(DATE_FORMAT, input)
}

/// The broadcast operations the scheduler needs from the channel.
#[async_trait]
pub trait Broadcasts: Send + Sync {
    /// Upcoming broadcasts keyed by start time.
    async fn scheduled_dates(&self) -> eyre::Result<BTreeMap<Timestamp, String>>;

    async fn schedule(&self, plan: &BroadcastPlan, dry_run: bool) -> eyre::Result<ScheduleOutcome>;

    async fn update(
        &self,
        broadcast_id: &str,
        plan: &BroadcastPlan,
        dry_run: bool,
    ) -> eyre::Result<ScheduleOutcome>;
}

#[async_trait]
impl Broadcasts for Channel {
    async fn scheduled_dates(&self) -> eyre::Result<BTreeMap<Timestamp, String>> {
        self.get_scheduled_dates().await
    }

    async fn schedule(&self, plan: &BroadcastPlan, dry_run: bool) -> eyre::Result<ScheduleOutcome> {
        self.schedule_broadcast(plan, dry_run).await
    }

    async fn update(
        &self,
        broadcast_id: &str,
        plan: &BroadcastPlan,
        dry_run: bool,
    ) -> eyre::Result<ScheduleOutcome> {
        self.update_broadcast(broadcast_id, plan, dry_run).await
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScheduleOptions {
    pub is_public: bool,
    pub dry_run: bool,
    /// Update broadcasts that already exist at the target time instead of skipping them.
    pub force: bool,
    /// Which of a day's Masses to take readings from; empty means the default Mass.
    pub mass_types: Vec<MassType>,
}

/// What happened to one target time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upsert {
    Scheduled(ScheduleOutcome),
    Updated(ScheduleOutcome),
    /// A broadcast already exists at that time.
    Skipped { id: String },
}

/// Tally of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub scheduled: usize,
    pub updated: usize,
    pub skipped: usize,
    /// Sundays for which no readings could be found.
    pub missing: Vec<Date>,
}

impl BatchReport {
    fn record(&mut self, upsert: &Upsert) {
        match upsert {
            Upsert::Scheduled(_) => self.scheduled += 1,
            Upsert::Updated(_) => self.updated += 1,
            Upsert::Skipped { .. } => self.skipped += 1,
        }
    }
}

/// The description of a one-off event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventDescription {
    Text(String),
    /// Generated from the readings of the given day.
    Readings(Date),
}

/// Schedules Masses from a liturgical calendar onto a channel.
pub struct Scheduler<C, B> {
    calendar: C,
    broadcasts: B,
    timezone: TimeZone,
    options: ScheduleOptions,
}

impl<C, B> Scheduler<C, B>
where
    C: LiturgicalCalendar,
    B: Broadcasts,
{
    pub fn new(calendar: C, broadcasts: B, timezone: TimeZone, options: ScheduleOptions) -> Self {
        Self {
            calendar,
            broadcasts,
            timezone,
            options,
        }
    }

    pub fn calendar(&self) -> &C {
        &self.calendar
    }

    pub fn broadcasts(&self) -> &B {
        &self.broadcasts
    }

    pub fn timezone(&self) -> &TimeZone {
        &self.timezone
    }

    async fn mass(&self, date: Date) -> eyre::Result<Mass> {
        self.calendar
            .mass_from_date(date, &self.options.mass_types)
            .await
            .with_context(|| format!("look up readings for {date}"))?
            .ok_or_else(|| eyre::eyre!("failed to find a mass on {date}"))
    }

    /// Creates the broadcast for `plan` unless one already exists at its start, in which case it
    /// is updated with `force` and left alone otherwise.
    async fn upsert(
        &self,
        plan: &BroadcastPlan,
        scheduled: &BTreeMap<Timestamp, String>,
    ) -> eyre::Result<Upsert> {
        let dry_run = self.options.dry_run;
        match scheduled.get(&plan.start) {
            Some(id) if self.options.force => {
                Ok(Upsert::Updated(self.broadcasts.update(id, plan, dry_run).await?))
            }
            Some(id) => {
                tracing::warn!(%id, start = %plan.start, "already scheduled");
                Ok(Upsert::Skipped { id: id.clone() })
            }
            None => Ok(Upsert::Scheduled(
                self.broadcasts.schedule(plan, dry_run).await?,
            )),
        }
    }

    fn mass_plan(&self, when: &Zoned, mass: &Mass) -> BroadcastPlan {
        BroadcastPlan::new(
            generate_title(when, mass.title.as_deref()),
            generate_description(mass),
            when.timestamp(),
        )
        .public(self.options.is_public)
    }

    /// Schedules the Mass celebrated at `when`.
    ///
    /// Readings come from `mass_date` if given. Otherwise they come from the day of `when`, or
    /// from the next day when `when` is the Saturday vigil. Missing readings are an error.
    #[tracing::instrument(skip(self, when), fields(when = %when))]
    pub async fn schedule_mass(&self, when: &Zoned, mass_date: Option<Date>) -> eyre::Result<Upsert> {
        let readings_date = match mass_date {
            Some(date) => date,
            None if is_saturday_pm_mass(when) => {
                let sunday = when.date().tomorrow()?;
                tracing::info!(%sunday, "querying for mass on Sunday");
                sunday
            }
            None => when.date(),
        };

        let scheduled = self.broadcasts.scheduled_dates().await?;
        if !self.options.force {
            if let Some(id) = scheduled.get(&when.timestamp()) {
                tracing::warn!(%id, "already scheduled");
                return Ok(Upsert::Skipped { id: id.clone() });
            }
        }

        let mass = self.mass(readings_date).await?;
        self.upsert(&self.mass_plan(when, &mass), &scheduled).await
    }

    /// Schedules the vigil Mass of every Sunday in `[start, end]`.
    ///
    /// `end` defaults to four weeks after `start`. Readings for all new dates are fetched
    /// concurrently; broadcasts are then created one at a time. Sundays without readings are
    /// reported rather than failing the batch.
    #[tracing::instrument(skip(self))]
    pub async fn schedule_masses(&self, start: Date, end: Option<Date>) -> eyre::Result<BatchReport> {
        let mut report = BatchReport::default();
        let scheduled = self.broadcasts.scheduled_dates().await?;

        let mut targets = Vec::new();
        for sunday in self.calendar.sunday_mass_dates(start, end) {
            let when = to_saturday_mass(sunday, &self.timezone)?;
            if !self.options.force {
                if let Some(id) = scheduled.get(&when.timestamp()) {
                    tracing::debug!(%id, %when, "already scheduled");
                    report.skipped += 1;
                    continue;
                }
            }
            targets.push((sunday, when));
        }
        if targets.is_empty() {
            tracing::info!("there are no new dates to schedule");
            return Ok(report);
        }

        let dates: Vec<String> = targets.iter().map(|(sunday, _)| sunday.to_string()).collect();
        tracing::info!(?dates, "querying for masses");
        let masses = futures::future::join_all(
            targets
                .iter()
                .map(|(sunday, _)| self.calendar.mass_from_date(*sunday, &self.options.mass_types)),
        )
        .await;

        for ((sunday, when), mass) in targets.iter().zip(masses) {
            let mass = match mass {
                Ok(Some(mass)) => mass,
                Ok(None) => {
                    tracing::error!(%sunday, "failed to find a mass");
                    report.missing.push(*sunday);
                    continue;
                }
                Err(e) => {
                    tracing::error!(%sunday, error = ?e, "failed to fetch readings");
                    report.missing.push(*sunday);
                    continue;
                }
            };
            let upsert = self.upsert(&self.mass_plan(when, &mass), &scheduled).await?;
            report.record(&upsert);
        }

        if !report.missing.is_empty() {
            tracing::warn!(count = report.missing.len(), "masses missing readings");
        }
        tracing::info!(
            scheduled = report.scheduled,
            updated = report.updated,
            skipped = report.skipped,
            missing = report.missing.len(),
            "batch complete"
        );
        Ok(report)
    }

    /// Schedules a one-off event such as a funeral or a holy day Mass.
    #[tracing::instrument(skip(self, when, description), fields(when = %when))]
    pub async fn schedule_event(
        &self,
        title: &str,
        when: &Zoned,
        description: EventDescription,
    ) -> eyre::Result<Upsert> {
        let description = match description {
            EventDescription::Text(text) => text,
            EventDescription::Readings(date) => generate_description(&self.mass(date).await?),
        };
        let plan =
            BroadcastPlan::new(title, description, when.timestamp()).public(self.options.is_public);
        let scheduled = self.broadcasts.scheduled_dates().await?;
        self.upsert(&plan, &scheduled).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mass::{Reading, Section};
    use jiff::civil::date;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn new_york() -> TimeZone {
        TimeZone::get(DEFAULT_TIMEZONE).unwrap()
    }

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    fn mass_on(day: Date) -> Mass {
        Mass {
            date: Some(day),
            title: Some(format!("Sunday {day}")),
            url: format!("https://bible.usccb.org/bible/readings/{}.cfm", day.strftime("%m%d%y")),
            sections: vec![Section {
                header: "Gospel".to_string(),
                readings: vec![Reading {
                    citation: "Jn 12:20-33".to_string(),
                    text: "Some Greeks wished to see Jesus.".to_string(),
                }],
            }],
        }
    }

    #[derive(Default)]
    struct FakeCalendar {
        masses: HashMap<Date, Mass>,
        lookups: Mutex<Vec<Date>>,
    }

    impl FakeCalendar {
        fn with_masses(days: &[Date]) -> Self {
            Self {
                masses: days.iter().map(|day| (*day, mass_on(*day))).collect(),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl LiturgicalCalendar for FakeCalendar {
        fn today(&self) -> Date {
            date(2024, 3, 13)
        }

        async fn mass_from_date(
            &self,
            date: Date,
            _types: &[MassType],
        ) -> eyre::Result<Option<Mass>> {
            self.lookups.lock().unwrap().push(date);
            Ok(self.masses.get(&date).cloned())
        }
    }

    #[derive(Default)]
    struct FakeChannel {
        scheduled: Mutex<BTreeMap<Timestamp, String>>,
        created: Mutex<Vec<BroadcastPlan>>,
        updated: Mutex<Vec<(String, BroadcastPlan)>>,
    }

    impl FakeChannel {
        fn with_existing(start: Timestamp, id: &str) -> Self {
            let channel = Self::default();
            channel
                .scheduled
                .lock()
                .unwrap()
                .insert(start, id.to_string());
            channel
        }
    }

    #[async_trait]
    impl Broadcasts for FakeChannel {
        async fn scheduled_dates(&self) -> eyre::Result<BTreeMap<Timestamp, String>> {
            Ok(self.scheduled.lock().unwrap().clone())
        }

        async fn schedule(
            &self,
            plan: &BroadcastPlan,
            dry_run: bool,
        ) -> eyre::Result<ScheduleOutcome> {
            if dry_run {
                return Ok(ScheduleOutcome::NoOp);
            }
            let mut created = self.created.lock().unwrap();
            created.push(plan.clone());
            let id = format!("b{}", created.len());
            self.scheduled
                .lock()
                .unwrap()
                .insert(plan.start, id.clone());
            Ok(ScheduleOutcome::Broadcast(id))
        }

        async fn update(
            &self,
            broadcast_id: &str,
            plan: &BroadcastPlan,
            dry_run: bool,
        ) -> eyre::Result<ScheduleOutcome> {
            if dry_run {
                return Ok(ScheduleOutcome::NoOp);
            }
            self.updated
                .lock()
                .unwrap()
                .push((broadcast_id.to_string(), plan.clone()));
            Ok(ScheduleOutcome::Broadcast(broadcast_id.to_string()))
        }
    }

    fn scheduler(
        calendar: FakeCalendar,
        channel: FakeChannel,
        options: ScheduleOptions,
    ) -> Scheduler<FakeCalendar, FakeChannel> {
        Scheduler::new(calendar, channel, new_york(), options)
    }

    #[test]
    fn sunday_maps_to_saturday_vigil() {
        let vigil = to_saturday_mass(date(2024, 3, 17), &new_york()).unwrap();
        assert_eq!(vigil.date(), date(2024, 3, 16));
        assert_eq!(vigil.timestamp(), ts("2024-03-16T21:30:00Z"));
        assert!(is_saturday_pm_mass(&vigil));

        let winter = to_saturday_mass(date(2024, 1, 7), &new_york()).unwrap();
        assert_eq!(winter.timestamp(), ts("2024-01-06T22:30:00Z"));

        assert!(to_saturday_mass(date(2024, 3, 16), &new_york()).is_err());
    }

    #[test]
    fn only_saturday_at_five_thirty_is_the_vigil() {
        let at = |d: Date, h, m| d.at(h, m, 0, 0).to_zoned(new_york()).unwrap();
        assert!(is_saturday_pm_mass(&at(date(2024, 3, 16), 17, 30)));
        assert!(!is_saturday_pm_mass(&at(date(2024, 3, 16), 9, 0)));
        assert!(!is_saturday_pm_mass(&at(date(2024, 3, 17), 17, 30)));
    }

    #[test]
    fn sundays_are_enumerated_inclusively() {
        assert_eq!(
            sundays_between(date(2024, 3, 13), date(2024, 3, 31)),
            vec![date(2024, 3, 17), date(2024, 3, 24), date(2024, 3, 31)]
        );
        assert_eq!(
            sundays_between(date(2024, 3, 17), date(2024, 3, 17)),
            vec![date(2024, 3, 17)]
        );
        assert_eq!(sundays_between(date(2024, 3, 18), date(2024, 3, 23)), vec![]);
    }

    #[test]
    fn window_defaults_to_four_weeks() {
        let calendar = FakeCalendar::default();
        assert_eq!(
            calendar.sunday_mass_dates(calendar.today(), None),
            vec![
                date(2024, 3, 17),
                date(2024, 3, 24),
                date(2024, 3, 31),
                date(2024, 4, 7),
            ]
        );
    }

    #[test]
    fn command_line_dates_parse() {
        assert_eq!(
            parse_date_time("2024-03-16 17:30").unwrap(),
            date(2024, 3, 16).at(17, 30, 0, 0)
        );
        assert_eq!(parse_date("2024-03-17").unwrap(), date(2024, 3, 17));
        assert!(parse_date_time("2024-03-16").is_err());
    }

    #[tokio::test]
    async fn batch_scheduling_is_idempotent() {
        let sundays = [date(2024, 3, 17), date(2024, 3, 24)];
        let scheduler = scheduler(
            FakeCalendar::with_masses(&sundays),
            FakeChannel::default(),
            ScheduleOptions::default(),
        );

        let first = scheduler
            .schedule_masses(date(2024, 3, 13), Some(date(2024, 3, 31)))
            .await
            .unwrap();
        assert_eq!(
            first,
            BatchReport {
                scheduled: 2,
                updated: 0,
                skipped: 0,
                missing: vec![date(2024, 3, 31)],
            }
        );

        let second = scheduler
            .schedule_masses(date(2024, 3, 13), Some(date(2024, 3, 31)))
            .await
            .unwrap();
        assert_eq!(second.scheduled, 0);
        assert_eq!(second.skipped, 2);
        assert_eq!(second.missing, vec![date(2024, 3, 31)]);

        let created = scheduler.broadcasts().created.lock().unwrap();
        let starts: Vec<Timestamp> = created.iter().map(|plan| plan.start).collect();
        assert_eq!(
            starts,
            vec![ts("2024-03-16T21:30:00Z"), ts("2024-03-23T21:30:00Z")]
        );
        assert_eq!(
            created[0].title,
            "Mass March 16, 2024 - 5:30 PM - Sunday 2024-03-17"
        );
        assert!(!created[0].is_public);
    }

    #[tokio::test]
    async fn already_scheduled_dates_are_not_looked_up() {
        let scheduler = scheduler(
            FakeCalendar::with_masses(&[date(2024, 3, 17), date(2024, 3, 24)]),
            FakeChannel::with_existing(ts("2024-03-16T21:30:00Z"), "existing"),
            ScheduleOptions::default(),
        );
        let report = scheduler
            .schedule_masses(date(2024, 3, 13), Some(date(2024, 3, 24)))
            .await
            .unwrap();
        assert_eq!(report.scheduled, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(
            *scheduler.calendar().lookups.lock().unwrap(),
            vec![date(2024, 3, 24)]
        );
    }

    #[tokio::test]
    async fn force_updates_existing_broadcasts() {
        let scheduler = scheduler(
            FakeCalendar::with_masses(&[date(2024, 3, 17)]),
            FakeChannel::with_existing(ts("2024-03-16T21:30:00Z"), "existing"),
            ScheduleOptions {
                force: true,
                is_public: true,
                ..Default::default()
            },
        );
        let report = scheduler
            .schedule_masses(date(2024, 3, 17), Some(date(2024, 3, 17)))
            .await
            .unwrap();
        assert_eq!(report.updated, 1);
        assert_eq!(report.scheduled, 0);

        let updated = scheduler.broadcasts().updated.lock().unwrap();
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].0, "existing");
        assert!(updated[0].1.is_public);
    }

    #[tokio::test]
    async fn dry_run_creates_nothing() {
        let scheduler = scheduler(
            FakeCalendar::with_masses(&[date(2024, 3, 17)]),
            FakeChannel::default(),
            ScheduleOptions {
                dry_run: true,
                ..Default::default()
            },
        );
        let when = to_saturday_mass(date(2024, 3, 17), &new_york()).unwrap();
        let upsert = scheduler.schedule_mass(&when, None).await.unwrap();
        assert_eq!(upsert, Upsert::Scheduled(ScheduleOutcome::NoOp));
        assert!(scheduler.broadcasts().created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn vigil_uses_sunday_readings() {
        let scheduler = scheduler(
            FakeCalendar::with_masses(&[date(2024, 3, 17)]),
            FakeChannel::default(),
            ScheduleOptions::default(),
        );
        let when = date(2024, 3, 16)
            .at(17, 30, 0, 0)
            .to_zoned(new_york())
            .unwrap();
        let upsert = scheduler.schedule_mass(&when, None).await.unwrap();
        assert_eq!(
            upsert,
            Upsert::Scheduled(ScheduleOutcome::Broadcast("b1".to_string()))
        );
        assert_eq!(
            *scheduler.calendar().lookups.lock().unwrap(),
            vec![date(2024, 3, 17)]
        );
    }

    #[tokio::test]
    async fn explicit_mass_date_wins() {
        let scheduler = scheduler(
            FakeCalendar::with_masses(&[date(2024, 3, 24)]),
            FakeChannel::default(),
            ScheduleOptions::default(),
        );
        let when = date(2024, 3, 16)
            .at(17, 30, 0, 0)
            .to_zoned(new_york())
            .unwrap();
        scheduler
            .schedule_mass(&when, Some(date(2024, 3, 24)))
            .await
            .unwrap();
        assert_eq!(
            *scheduler.calendar().lookups.lock().unwrap(),
            vec![date(2024, 3, 24)]
        );
    }

    #[tokio::test]
    async fn single_mass_without_readings_fails() {
        let scheduler = scheduler(
            FakeCalendar::default(),
            FakeChannel::default(),
            ScheduleOptions::default(),
        );
        let when = date(2024, 3, 20)
            .at(9, 0, 0, 0)
            .to_zoned(new_york())
            .unwrap();
        let err = scheduler.schedule_mass(&when, None).await.unwrap_err();
        assert!(err.to_string().contains("2024-03-20"), "{err}");
        assert!(scheduler.broadcasts().created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn single_mass_skips_existing_broadcast() {
        let scheduler = scheduler(
            FakeCalendar::with_masses(&[date(2024, 3, 17)]),
            FakeChannel::with_existing(ts("2024-03-16T21:30:00Z"), "existing"),
            ScheduleOptions::default(),
        );
        let when = to_saturday_mass(date(2024, 3, 17), &new_york()).unwrap();
        let upsert = scheduler.schedule_mass(&when, None).await.unwrap();
        assert_eq!(
            upsert,
            Upsert::Skipped {
                id: "existing".to_string()
            }
        );
        assert!(scheduler.calendar().lookups.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn events_take_literal_or_generated_descriptions() {
        let scheduler = scheduler(
            FakeCalendar::with_masses(&[date(2024, 3, 28)]),
            FakeChannel::default(),
            ScheduleOptions::default(),
        );
        let when = date(2024, 3, 28)
            .at(19, 0, 0, 0)
            .to_zoned(new_york())
            .unwrap();
        scheduler
            .schedule_event(
                "Holy Thursday",
                &when,
                EventDescription::Readings(date(2024, 3, 28)),
            )
            .await
            .unwrap();

        let later = date(2024, 3, 29)
            .at(15, 0, 0, 0)
            .to_zoned(new_york())
            .unwrap();
        scheduler
            .schedule_event(
                "Good Friday",
                &later,
                EventDescription::Text("Stations of the Cross".to_string()),
            )
            .await
            .unwrap();

        let created = scheduler.broadcasts().created.lock().unwrap();
        assert_eq!(created[0].title, "Holy Thursday");
        assert!(created[0].description.contains("Jn 12:20-33"));
        assert_eq!(created[1].description, "Stations of the Cross");
        assert_eq!(created[1].start, ts("2024-03-29T19:00:00Z"));
    }
}
