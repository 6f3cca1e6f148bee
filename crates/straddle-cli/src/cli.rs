/*
[INPUT]:  Command-line arguments
[OUTPUT]: Parsed global flags and subcommands
[POS]:    CLI layer - argument definitions (clap derive)
[UPDATE]: When adding subcommands or flags
*/

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use straddle_adapter::{
    CustomerListParams, CustomerSortBy, CustomerStatus, CustomerType, OrganizationListParams,
    OrganizationSortBy, ReviewDecision, SortOrder,
};

use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "straddle", version, about = "Straddle customer and identity API client")]
pub struct Cli {
    /// YAML configuration file
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn", global = true)]
    pub log_level: String,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json, global = true)]
    pub output: OutputFormat,
    /// Use the sandbox environment regardless of configuration
    #[arg(long, global = true)]
    pub sandbox: bool,
    /// Act on behalf of this connected account
    #[arg(long = "account-id", value_name = "ID", global = true)]
    pub account_id: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create, inspect and review customers
    Customers {
        #[command(subcommand)]
        command: CustomerCommand,
    },
    /// Manage organizations
    Organizations {
        #[command(subcommand)]
        command: OrganizationCommand,
    },
    /// Account reports
    Reports {
        #[command(subcommand)]
        command: ReportCommand,
    },
    /// Print the resolved configuration (API key masked)
    Config,
}

#[derive(Subcommand, Debug)]
pub enum CustomerCommand {
    /// List customers, one page or every page with --all
    List(CustomerListArgs),
    Get {
        id: String,
        /// Include unmasked PII (requires elevated API key permissions)
        #[arg(long)]
        unmasked: bool,
    },
    /// Create a customer from a YAML or JSON file
    Create {
        #[arg(long, value_name = "PATH")]
        file: PathBuf,
        #[arg(long = "idempotency-key", value_name = "KEY")]
        idempotency_key: Option<String>,
    },
    /// Change a customer's status (e.g. inactive)
    UpdateStatus { id: String, status: CustomerStatus },
    Delete { id: String },
    /// Show the identity review breakdown
    Review { id: String },
    /// Approve or reject a customer in review
    Decide { id: String, decision: ReviewDecision },
    /// Re-run identity verification
    RefreshReview { id: String },
}

#[derive(Args, Debug, Clone, Default)]
pub struct CustomerListArgs {
    /// Filter by status (repeatable)
    #[arg(long = "status", value_name = "STATUS")]
    pub status: Vec<CustomerStatus>,
    /// Filter by customer type (repeatable)
    #[arg(long = "type", value_name = "TYPE")]
    pub types: Vec<CustomerType>,
    /// Free-text search over name, email, phone and external id
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long = "external-id")]
    pub external_id: Option<String>,
    /// RFC 3339 timestamp
    #[arg(long = "created-from")]
    pub created_from: Option<DateTime<Utc>>,
    #[arg(long = "created-to")]
    pub created_to: Option<DateTime<Utc>>,
    #[arg(long = "sort-by")]
    pub sort_by: Option<CustomerSortBy>,
    #[arg(long = "sort-order")]
    pub sort_order: Option<SortOrder>,
    #[arg(long = "page")]
    pub page_number: Option<u32>,
    #[arg(long = "page-size")]
    pub page_size: Option<u32>,
    /// Follow pagination until the last page
    #[arg(long)]
    pub all: bool,
}

impl CustomerListArgs {
    pub fn params(&self) -> CustomerListParams {
        CustomerListParams {
            created_from: self.created_from,
            created_to: self.created_to,
            email: self.email.clone(),
            external_id: self.external_id.clone(),
            name: self.name.clone(),
            page_number: self.page_number,
            page_size: self.page_size,
            search_text: self.search.clone(),
            sort_by: self.sort_by.clone(),
            sort_order: self.sort_order.clone(),
            status: self.status.clone(),
            types: self.types.clone(),
            ..Default::default()
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum OrganizationCommand {
    List(OrganizationListArgs),
    Get { id: String },
    Create {
        name: String,
        #[arg(long = "external-id")]
        external_id: Option<String>,
        #[arg(long = "idempotency-key", value_name = "KEY")]
        idempotency_key: Option<String>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct OrganizationListArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long = "external-id")]
    pub external_id: Option<String>,
    #[arg(long = "sort-by")]
    pub sort_by: Option<OrganizationSortBy>,
    #[arg(long = "sort-order")]
    pub sort_order: Option<SortOrder>,
    #[arg(long = "page")]
    pub page_number: Option<u32>,
    #[arg(long = "page-size")]
    pub page_size: Option<u32>,
    #[arg(long)]
    pub all: bool,
}

impl OrganizationListArgs {
    pub fn params(&self) -> OrganizationListParams {
        OrganizationListParams {
            external_id: self.external_id.clone(),
            name: self.name.clone(),
            page_number: self.page_number,
            page_size: self.page_size,
            sort_by: self.sort_by.clone(),
            sort_order: self.sort_order.clone(),
            ..Default::default()
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ReportCommand {
    /// Customer counts per verification status
    CustomersByStatus,
}
