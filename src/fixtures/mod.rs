//! Fixtures
//!
//! YAML fixture sets for demos and scenario tests. A set named `demo` is made of
//! `catalog/demo.yml` (services and products with `"AMOUNT CURRENCY"` prices) and
//! `schedules/demo.yml` (a [`ScheduleSnapshot`]).

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    appointments::AppointmentError,
    catalog::{Product, Service},
    fixtures::catalog::CatalogFixture,
    loader::ScheduleSnapshot,
};

pub mod catalog;

const DEFAULT_BASE_PATH: &str = "./fixtures";

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between catalog entries
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No catalog loaded yet
    #[error("No catalog loaded yet; currency unknown")]
    NoCurrency,

    /// Service not found
    #[error("Service not found: {0}")]
    ServiceNotFound(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// No schedule loaded
    #[error("No schedule loaded")]
    NoSchedule,

    /// A scheduled appointment is invalid
    #[error(transparent)]
    InvalidSchedule(#[from] AppointmentError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Catalog key -> record
    services: FxHashMap<String, Service>,
    products: FxHashMap<String, Product>,

    /// Loaded schedule
    schedule: Option<ScheduleSnapshot>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path(DEFAULT_BASE_PATH)
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            services: FxHashMap::default(),
            products: FxHashMap::default(),
            schedule: None,
            currency: None,
        }
    }

    /// Load services and products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if there are currency mismatches.
    pub fn load_catalog(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("catalog").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CatalogFixture = serde_norway::from_str(&contents)?;

        for (key, service_fixture) in fixture.services {
            let (service, currency) = service_fixture.try_into_service(&key)?;

            self.check_currency(currency)?;
            self.services.insert(key, service);
        }

        for (key, product_fixture) in fixture.products {
            let (product, currency) = product_fixture.try_into_product(&key)?;

            self.check_currency(currency)?;
            self.products.insert(key, product);
        }

        Ok(self)
    }

    /// Load a schedule snapshot from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or an appointment is invalid.
    pub fn load_schedule(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("schedules").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let snapshot: ScheduleSnapshot = serde_norway::from_str(&contents)?;

        snapshot.validate()?;

        self.schedule = Some(snapshot);

        Ok(self)
    }

    /// Load a complete fixture set (catalog and schedule with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_set_in(DEFAULT_BASE_PATH, name)
    }

    /// Load a complete fixture set from a custom base path
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set_in(base_path: impl Into<PathBuf>, name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::with_base_path(base_path);

        fixture.load_catalog(name)?.load_schedule(name)?;

        Ok(fixture)
    }

    /// Get a service by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the service is not found.
    pub fn service(&self, key: &str) -> Result<&Service, FixtureError> {
        self.services
            .get(key)
            .ok_or_else(|| FixtureError::ServiceNotFound(key.to_string()))
    }

    /// Get a product by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, key: &str) -> Result<&Product, FixtureError> {
        self.products
            .get(key)
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// All services, ordered by key
    pub fn services(&self) -> Vec<&Service> {
        sorted_by_key(&self.services)
    }

    /// All products, ordered by key
    pub fn products(&self) -> Vec<&Product> {
        sorted_by_key(&self.products)
    }

    /// The loaded schedule with the catalog merged in where the schedule has none.
    ///
    /// # Errors
    ///
    /// Returns an error if no schedule has been loaded.
    pub fn snapshot(&self) -> Result<ScheduleSnapshot, FixtureError> {
        let mut snapshot = self.schedule.clone().ok_or(FixtureError::NoSchedule)?;

        if snapshot.services.is_empty() {
            snapshot.services = self.services().into_iter().cloned().collect();
        }

        if snapshot.products.is_empty() {
            snapshot.products = self.products().into_iter().cloned().collect();
        }

        Ok(snapshot)
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no catalog entries have been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    fn check_currency(&mut self, currency: &'static Currency) -> Result<(), FixtureError> {
        if let Some(existing_currency) = self.currency {
            if existing_currency != currency {
                return Err(FixtureError::CurrencyMismatch(
                    existing_currency.iso_alpha_code.to_string(),
                    currency.iso_alpha_code.to_string(),
                ));
            }
        } else {
            self.currency = Some(currency);
        }

        Ok(())
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

fn sorted_by_key<T>(map: &FxHashMap<String, T>) -> Vec<&T> {
    let mut entries: Vec<(&String, &T)> = map.iter().collect();

    entries.sort_by(|(a, _), (b, _)| a.cmp(b));

    entries.into_iter().map(|(_, value)| value).collect()
}
