pub mod accounts;
pub mod analysis;
pub mod domain;
pub mod error;
pub mod export;
pub mod ports;
pub mod presentation;
pub mod reports;

pub use accounts::{AccountService, SignedIn};
pub use domain::{
    Account, AccountCredentials, AuthSession, BmiCategory, CholesterolCategory, Classification,
    HealthMetrics, Level, OverallRisk, Report,
};
pub use error::{ServiceError, ServiceResult};
pub use ports::{CredentialHasher, DatabaseService, PortError, PortResult};
pub use reports::ReportService;
