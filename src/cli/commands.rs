use std::io::{self, Read};

use anyhow::{bail, Context, Result};
use clap::Args;
use time::OffsetDateTime;

use crate::app::{ActiveView, NoticeLevel, PlannerApp};
use crate::bulk::{self, BulkOutcome};
use crate::classify::PlanStatus;
use crate::model::{ContentItem, CreateItem, ItemId};
use crate::timeline::{self, planner::WindowLength, tracker::TrackerSection};

#[derive(Args, Debug, Clone, Default)]
pub struct PlanArgs {
    /// Window length: week, fortnight or month (defaults to the config)
    #[arg(long)]
    pub window: Option<String>,
    /// Show a single day (YYYY-MM-DD) instead of the whole board
    #[arg(long)]
    pub day: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct TrackerArgs {
    /// Section to show: today, upcoming, past or unknown (all when omitted)
    #[arg()]
    pub section: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct NewArgs {
    /// Title for the item
    #[arg()]
    pub title: String,
    /// Publishing platform (facebook, instagram, tiktok, youtube, zalo, threads, x)
    #[arg(long)]
    pub platform: String,
    /// Provide the body inline. If omitted, reads from stdin.
    #[arg(long)]
    pub body: Option<String>,
    /// Schedule the item at this RFC 3339 timestamp
    #[arg(long)]
    pub at: Option<String>,
    /// Destination channel id
    #[arg(long)]
    pub channel: Option<i64>,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    /// Item identifier
    pub id: String,
    /// Target status: idea, draft, scheduled or posted
    pub status: String,
}

#[derive(Args, Debug, Clone)]
pub struct SetTimeArgs {
    /// Wall-clock time as HH:MM
    pub time: String,
    /// Day to reschedule (YYYY-MM-DD)
    #[arg(long)]
    pub day: String,
}

#[derive(Args, Debug, Clone)]
pub struct PromoteArgs {
    /// Source status
    pub from: String,
    /// Target status
    pub to: String,
    /// Restrict to one day (YYYY-MM-DD); defaults to the backlog
    #[arg(long)]
    pub day: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Export one day (YYYY-MM-DD); defaults to the backlog
    #[arg(long)]
    pub day: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    /// Item identifier
    pub id: String,
}

pub fn plan(app: &mut PlannerApp, now: OffsetDateTime, args: PlanArgs) -> Result<()> {
    if let Some(raw) = &args.window {
        app.window = parse_window(raw)?;
    }
    let board = app.board(now);

    if let Some(raw) = &args.day {
        let day = parse_day(raw)?;
        let Some(bucket) = board.days.get(&day) else {
            bail!("{raw} is outside the current {} window", app.window);
        };
        println!("{raw}: {} item(s)", bucket.len());
        print_items(bucket);
        return Ok(());
    }

    let stats = board.stats();
    println!(
        "{} item(s): {} today, {} scheduled and {} posted in range, {} in the backlog",
        stats.total, stats.today, stats.scheduled_in_range, stats.posted_in_range, stats.backlog
    );
    let heat = board.heat();
    for (day, bucket) in &board.days {
        println!(
            "{}  {:<4} ({})",
            timeline::format_day_key(*day),
            "#".repeat(heat[day] as usize),
            bucket.len()
        );
        print_items(bucket);
    }
    if !board.out_of_range.is_empty() {
        println!("{} scheduled item(s) outside the window", board.out_of_range.len());
    }
    if !board.backlog.is_empty() {
        println!("{} item(s) in the backlog (see `planboard inbox`)", board.backlog.len());
    }
    Ok(())
}

pub fn tracker(app: &mut PlannerApp, now: OffsetDateTime, args: TrackerArgs) -> Result<()> {
    let timeline = app.tracker(now);
    let sections: Vec<TrackerSection> = match &args.section {
        Some(raw) => vec![raw
            .parse()
            .ok()
            .with_context(|| format!("unknown section {raw}; expected today, upcoming, past or unknown"))?],
        None => vec![
            TrackerSection::Today,
            TrackerSection::Upcoming,
            TrackerSection::Past,
            TrackerSection::Unknown,
        ],
    };
    for section in sections {
        let items = timeline.section_items(section);
        println!("{section} ({})", items.len());
        for item in items {
            print_tracker_item(item);
        }
    }
    Ok(())
}

pub fn inbox(app: &mut PlannerApp, now: OffsetDateTime) -> Result<()> {
    let board = app.board(now);
    println!("backlog ({})", board.backlog.len());
    print_items(&board.backlog);
    Ok(())
}

pub async fn new_item(app: &mut PlannerApp, args: NewArgs) -> Result<()> {
    let body = match args.body {
        Some(body) => body,
        None => read_stdin().context("reading item body from stdin")?,
    };
    let status = if args.at.is_some() {
        PlanStatus::Scheduled
    } else {
        PlanStatus::Draft
    };
    let draft = CreateItem {
        shop_id: app.shop().clone(),
        title: args.title.trim().to_owned(),
        body,
        platform: args.platform,
        status: status.to_string(),
        scheduled_at: args.at,
        channel_id: args.channel,
    };
    let created = app.create(draft).await.context("creating item")?;
    println!("created {}", created.id);
    Ok(())
}

pub async fn set_status(app: &mut PlannerApp, args: StatusArgs) -> Result<()> {
    let status: PlanStatus = args.status.parse().ok().with_context(|| {
        format!(
            "unknown status {}; expected idea, draft, scheduled or posted",
            args.status
        )
    })?;
    app.set_status(&ItemId::from(args.id), status).await;
    report_notice(app)
}

pub async fn set_time(app: &mut PlannerApp, now: OffsetDateTime, args: SetTimeArgs) -> Result<()> {
    let (hour, minute) =
        bulk::parse_hhmm(&args.time).with_context(|| format!("{} is not HH:MM", args.time))?;
    let day = parse_day(&args.day)?;
    app.set_view(ActiveView::Day(day));
    app.select_visible(now);
    if app.selection.is_empty() {
        println!("nothing scheduled on {}", args.day);
        return Ok(());
    }
    let outcome = app.bulk_set_time(hour, minute).await?;
    report_outcome(&outcome);
    Ok(())
}

pub async fn promote(app: &mut PlannerApp, now: OffsetDateTime, args: PromoteArgs) -> Result<()> {
    let from: PlanStatus = parse_status(&args.from)?;
    let to: PlanStatus = parse_status(&args.to)?;
    app.set_view(scope_view(args.day.as_deref())?);
    app.select_visible(now);
    if app.selection.is_empty() {
        println!("nothing to promote");
        return Ok(());
    }
    let outcome = app.bulk_promote(from, to).await?;
    report_outcome(&outcome);
    Ok(())
}

pub fn export(app: &mut PlannerApp, now: OffsetDateTime, args: ExportArgs) -> Result<()> {
    app.set_view(scope_view(args.day.as_deref())?);
    app.select_visible(now);
    print!("{}", app.export_selection());
    Ok(())
}

pub async fn delete(app: &mut PlannerApp, args: DeleteArgs) -> Result<()> {
    let id = ItemId::from(args.id);
    app.delete(&id).await.with_context(|| format!("deleting {id}"))?;
    println!("deleted {id}");
    Ok(())
}

fn scope_view(day: Option<&str>) -> Result<ActiveView> {
    Ok(match day {
        Some(raw) => ActiveView::Day(parse_day(raw)?),
        None => ActiveView::Inbox,
    })
}

fn parse_day(raw: &str) -> Result<time::Date> {
    timeline::parse_day_key(raw).with_context(|| format!("{raw} is not a YYYY-MM-DD day"))
}

fn parse_window(raw: &str) -> Result<WindowLength> {
    raw.parse()
        .ok()
        .with_context(|| format!("unknown window {raw}; expected week, fortnight or month"))
}

fn parse_status(raw: &str) -> Result<PlanStatus> {
    raw.parse().ok().with_context(|| {
        format!("unknown status {raw}; expected idea, draft, scheduled or posted")
    })
}

fn report_outcome(outcome: &BulkOutcome) {
    println!("{}", outcome.summary());
    for (id, err) in &outcome.failed {
        eprintln!("  {id}: {err}");
    }
}

fn report_notice(app: &mut PlannerApp) -> Result<()> {
    if let Some(notice) = app.take_notice() {
        match notice.level {
            NoticeLevel::Error => bail!(notice.message),
            _ => println!("{}", notice.message),
        }
    }
    Ok(())
}

fn print_items(items: &[ContentItem]) {
    for item in items {
        print_item(item);
    }
}

fn print_item(item: &ContentItem) {
    let when = item.scheduled_at.as_deref().unwrap_or("-");
    println!(
        "  {:>8}  [{:<9}] [{:<9}] {:<25} {}",
        item.id.to_string(),
        item.platform().to_string(),
        item.plan_status().to_string(),
        when,
        item.title
    );
}

/// Tracker rows show the delivery-state vocabulary, not planner statuses.
fn print_tracker_item(item: &ContentItem) {
    let when = item.scheduled_at.as_deref().unwrap_or("-");
    println!(
        "  {:>8}  [{:<9}] [{:<10}] {:<25} {}",
        item.id.to_string(),
        item.platform().to_string(),
        item.post_status().to_string(),
        when,
        item.title
    );
}

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf.trim_end().to_owned())
}
