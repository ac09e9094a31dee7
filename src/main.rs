//! Salon front-desk command line

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    process,
};

use clap::{Args, Parser, Subcommand, ValueEnum};
use jiff::{
    SignedDuration,
    civil::{Date, Time},
};
use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use salon::{
    appointments::AppointmentStatus,
    availability::{AvailabilityError, WorkingHours, available_slots},
    calendar::{self, CalendarView, Direction},
    checkout::{
        CartAction, CartState, CheckoutError, CheckoutRequest, DiscountType, PaymentMethod,
        SelectedClient,
        input::{InputError, parse_amount, parse_discount},
        reduce,
    },
    config::{self, AppConfig, ConfigError},
    fixtures::{Fixture, FixtureError},
    observability,
    preferences::{
        CalendarPreferences, JsonFilePreferenceStore, MemoryPreferenceStore, PreferenceError,
        PreferenceStore, Preferences,
    },
    report::{self, ReportError},
    scheduling::{RevenuePolicy, SchedulingController, SchedulingError, StatusFilter},
    staff::{StaffFilter, StaffId},
};

#[derive(Debug, Parser)]
#[command(name = "salon", about = "Salon scheduling and checkout", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: AppConfig,

    /// Fixture set to load from the fixtures directory
    #[arg(long, env = "SALON_FIXTURE_SET", default_value = "demo")]
    set: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List appointments in the visible range
    Agenda(AgendaArgs),

    /// Appointment count and revenue for a day
    Stats(StatsArgs),

    /// Print the selected date after moving through the calendar
    Navigate(NavigateArgs),

    /// Open start times for a service with one staff member
    Slots(SlotsArgs),

    /// Ring up a cart and print its receipt
    Receipt(ReceiptArgs),
}

#[derive(Debug, Args)]
struct AgendaArgs {
    /// Selected date (defaults to today)
    #[arg(long)]
    date: Option<Date>,

    /// Calendar view (defaults to the saved preference)
    #[arg(long)]
    view: Option<CalendarView>,

    /// Staff id, or "all"
    #[arg(long, default_value = "all")]
    staff: StaffFilter,

    /// Comma-separated statuses to show (empty shows all)
    #[arg(long, value_delimiter = ',')]
    status: Vec<AppointmentStatus>,
}

#[derive(Debug, Args)]
struct StatsArgs {
    /// Day to summarise (defaults to today)
    #[arg(long)]
    date: Option<Date>,

    /// Leave cancelled and no-show appointments out
    #[arg(long)]
    exclude_cancelled: bool,
}

#[derive(Debug, Args)]
struct NavigateArgs {
    /// Starting date (defaults to today)
    #[arg(long)]
    date: Option<Date>,

    /// Calendar view (defaults to the saved preference)
    #[arg(long)]
    view: Option<CalendarView>,

    /// Number of moves; negative moves backwards
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    steps: i32,
}

#[derive(Debug, Args)]
struct SlotsArgs {
    /// Day to search (defaults to today)
    #[arg(long)]
    date: Option<Date>,

    /// Staff id
    #[arg(long)]
    staff: String,

    /// Service key from the catalog
    #[arg(long)]
    service: String,

    /// Opening time
    #[arg(long, default_value = "09:00")]
    opens: Time,

    /// Closing time
    #[arg(long, default_value = "18:00")]
    closes: Time,

    /// Minutes between candidate start times
    #[arg(long, default_value_t = 15)]
    step: i64,
}

#[derive(Debug, Args)]
struct ReceiptArgs {
    /// Service key to add (repeatable)
    #[arg(long = "service")]
    services: Vec<String>,

    /// Product key to add (repeatable)
    #[arg(long = "product")]
    products: Vec<String>,

    /// Custom item as NAME=AMOUNT (repeatable)
    #[arg(long = "quick-sale")]
    quick_sales: Vec<String>,

    /// Client id to attach
    #[arg(long)]
    client: Option<String>,

    /// Discount value
    #[arg(long)]
    discount: Option<String>,

    /// Discount type
    #[arg(long, value_enum, default_value_t = DiscountKind::Percentage)]
    discount_type: DiscountKind,

    /// Tip amount
    #[arg(long)]
    tip: Option<String>,

    /// Payment method (cash, card, gift_card, none)
    #[arg(long, default_value = "none")]
    payment: PaymentMethod,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DiscountKind {
    Percentage,
    Fixed,
}

impl From<DiscountKind> for DiscountType {
    fn from(kind: DiscountKind) -> Self {
        match kind {
            DiscountKind::Percentage => Self::Percentage,
            DiscountKind::Fixed => Self::Fixed,
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error(transparent)]
    Scheduling(#[from] SchedulingError),

    #[error(transparent)]
    Availability(#[from] AvailabilityError),

    #[error(transparent)]
    Preference(#[from] PreferenceError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode checkout request: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("staff member {0} is unknown or inactive")]
    UnknownStaff(String),

    #[error("client {0} not found")]
    UnknownClient(String),

    #[error("quick sale must be NAME=AMOUNT, got {0:?}")]
    InvalidQuickSale(String),
}

/// Loaded fixtures and calendar state shared by every command.
#[derive(Debug)]
struct Session {
    fixture: Fixture,
    controller: SchedulingController,
    currency: &'static Currency,
    today: Date,
    preferences: Option<PathBuf>,
}

fn main() {
    let cli = match config::load::<Cli>() {
        Ok(cli) => cli,
        Err(ConfigError::Parse(parse_error)) => parse_error.exit(),
        Err(config_error) => {
            #[expect(
                clippy::print_stderr,
                reason = "logging not initialized yet, must use eprintln for config errors"
            )]
            {
                eprintln!("Configuration error: {config_error}");
            }

            process::exit(2);
        }
    };

    if let Err(init_error) = observability::init(&cli.config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialise, must use eprintln"
        )]
        {
            eprintln!("Logging error: {init_error}");
        }

        process::exit(2);
    }

    let result = open_session(&cli).and_then(|session| {
        let mut out = io::stdout().lock();

        match cli.command {
            Commands::Agenda(args) => agenda(session, args, &mut out),
            Commands::Stats(args) => stats(session, &args, &mut out),
            Commands::Navigate(args) => navigate(session, &args, &mut out),
            Commands::Slots(args) => slots(&session, args, &mut out),
            Commands::Receipt(args) => receipt(&session, args, &mut out),
        }
    });

    if let Err(run_error) = result {
        error!(error = %run_error, "command failed");

        process::exit(1);
    }
}

fn open_session(cli: &Cli) -> Result<Session, CliError> {
    let currency = cli.config.currency()?;
    let time_zone = cli.config.time_zone()?;
    let fixture = Fixture::from_set_in(&cli.config.fixtures, &cli.set)?;

    if let Ok(catalog_currency) = fixture.currency()
        && catalog_currency != currency
    {
        warn!(
            configured = currency.iso_alpha_code,
            catalog = catalog_currency.iso_alpha_code,
            "catalog prices are in a different currency; using the configured one"
        );
    }

    let today = calendar::today(&time_zone);
    let controller =
        SchedulingController::from_snapshot(fixture.snapshot()?, today, time_zone, currency)?;

    info!(
        set = %cli.set,
        appointments = controller.appointments().len(),
        "loaded schedule"
    );

    Ok(Session {
        fixture,
        controller,
        currency,
        today,
        preferences: cli.config.preferences.clone(),
    })
}

fn agenda(session: Session, args: AgendaArgs, out: &mut impl Write) -> Result<(), CliError> {
    let view = resolve_view(session.preferences.as_deref(), args.view)?;
    let mut controller = session.controller;

    controller.go_to(args.date.unwrap_or(session.today));
    controller.set_view(view);
    controller.set_staff_filter(args.staff);
    controller.set_status_filter(args.status.into_iter().collect::<StatusFilter>());

    let range = controller.visible_range()?;

    writeln!(out, " {view} view: {} to {}", range.start(), range.end())?;

    report::write_agenda(out, &controller.visible_appointments()?, controller.time_zone())?;

    Ok(())
}

fn stats(session: Session, args: &StatsArgs, out: &mut impl Write) -> Result<(), CliError> {
    let policy = if args.exclude_cancelled {
        RevenuePolicy::ExcludeCancelled
    } else {
        RevenuePolicy::AllStatuses
    };

    let stats = session
        .controller
        .with_revenue_policy(policy)
        .compute_day_stats(args.date.unwrap_or(session.today));

    report::write_day_stats(out, &stats)?;

    Ok(())
}

fn navigate(session: Session, args: &NavigateArgs, out: &mut impl Write) -> Result<(), CliError> {
    let view = resolve_view(session.preferences.as_deref(), args.view)?;
    let mut controller = session.controller;

    controller.go_to(args.date.unwrap_or(session.today));
    controller.set_view(view);

    let direction = if args.steps < 0 {
        Direction::Backward
    } else {
        Direction::Forward
    };

    for _ in 0..args.steps.unsigned_abs() {
        let moved = controller.navigate(direction)?;

        debug!(%moved, "navigated");
    }

    let range = controller.visible_range()?;

    writeln!(
        out,
        " {} ({view} view: {} to {})",
        controller.selected_date(),
        range.start(),
        range.end()
    )?;

    Ok(())
}

fn slots(session: &Session, args: SlotsArgs, out: &mut impl Write) -> Result<(), CliError> {
    let staff_id = StaffId::new(args.staff.as_str());
    let member = session
        .controller
        .filter_by_staff(&StaffFilter::Only(staff_id.clone()))
        .into_iter()
        .next()
        .ok_or(CliError::UnknownStaff(args.staff))?;

    let service = session.fixture.service(&args.service)?;
    let date = args.date.unwrap_or(session.today);

    let slots = available_slots(
        session.controller.appointments(),
        &staff_id,
        date,
        session.controller.time_zone(),
        WorkingHours {
            start: args.opens,
            end: args.closes,
        },
        SignedDuration::from_mins(i64::from(service.duration_minutes)),
        SignedDuration::from_mins(args.step),
    )?;

    report::write_slots(out, &member.name, date, &slots)?;

    Ok(())
}

fn receipt(session: &Session, args: ReceiptArgs, out: &mut impl Write) -> Result<(), CliError> {
    let currency = session.currency;
    let mut actions = Vec::new();

    for key in &args.services {
        actions.push(CartAction::add_service(session.fixture.service(key)?, currency));
    }

    for key in &args.products {
        actions.push(CartAction::add_product(session.fixture.product(key)?, currency));
    }

    for entry in &args.quick_sales {
        actions.push(quick_sale(entry, currency)?);
    }

    if let Some(client_id) = args.client {
        let selected = session
            .controller
            .clients()
            .iter()
            .find(|known| known.id.as_str() == client_id)
            .map(SelectedClient::from)
            .ok_or(CliError::UnknownClient(client_id))?;

        actions.push(CartAction::SetClient(selected));
    }

    if let Some(text) = args.discount {
        actions.push(CartAction::SetDiscount(parse_discount(
            &text,
            args.discount_type.into(),
            currency,
        )?));
    }

    if let Some(text) = args.tip {
        actions.push(CartAction::SetTip(parse_amount(&text, currency)?));
    }

    actions.push(CartAction::SetPaymentMethod(args.payment));

    let cart = actions.into_iter().fold(CartState::new(currency), reduce);

    report::write_receipt(out, &cart)?;

    if args.payment != PaymentMethod::None {
        let request = CheckoutRequest::from_cart(&cart)?;

        info!(
            total = request.total,
            lines = request.lines.len(),
            "checkout request ready"
        );

        debug!(payload = %serde_json::to_string(&request)?, "checkout payload");
    }

    Ok(())
}

fn quick_sale(entry: &str, currency: &'static Currency) -> Result<CartAction, CliError> {
    let (name, amount) = entry
        .split_once('=')
        .ok_or_else(|| CliError::InvalidQuickSale(entry.to_string()))?;

    Ok(CartAction::quick_sale(name.trim(), parse_amount(amount, currency)?))
}

/// The requested view, persisted; or the saved one when none was requested.
fn resolve_view(
    preferences_path: Option<&Path>,
    requested: Option<CalendarView>,
) -> Result<CalendarView, CliError> {
    match preferences_path {
        Some(path) => remember_view(
            &mut Preferences::new(JsonFilePreferenceStore::open(path)),
            requested,
        ),
        None => remember_view(&mut Preferences::new(MemoryPreferenceStore::default()), requested),
    }
}

fn remember_view<S: PreferenceStore>(
    preferences: &mut Preferences<S>,
    requested: Option<CalendarView>,
) -> Result<CalendarView, CliError> {
    let mut saved = CalendarPreferences::load(preferences);

    if let Some(view) = requested {
        saved.set_view(preferences, view)?;
    }

    Ok(saved.view)
}
