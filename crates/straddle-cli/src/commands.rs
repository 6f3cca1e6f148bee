/*
[INPUT]:  Parsed subcommand, resolved configuration, output format
[OUTPUT]: Rendered command result
[POS]:    CLI layer - subcommand dispatch onto the Straddle client
[UPDATE]: When adding subcommands
*/

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use futures_util::TryStreamExt;
use serde::de::DeserializeOwned;
use straddle_adapter::{
    CustomerCreateParams, CustomerReviewDecisionParams, CustomerSummary, CustomerUpdateParams,
    Organization, OrganizationCreateParams, RequestHeaders, StraddleClient,
};
use tracing::info;

use crate::cli::{Command, CustomerCommand, OrganizationCommand, ReportCommand};
use crate::config::CliConfig;
use crate::output::{OutputFormat, render};

/// Run one subcommand and return what should be printed on stdout
pub async fn run(command: &Command, config: &CliConfig, format: OutputFormat) -> Result<String> {
    match command {
        Command::Config => render(&config.resolved(), format),
        Command::Customers { command } => customers(&connect(config)?, command, format).await,
        Command::Organizations { command } => {
            organizations(&connect(config)?, command, format).await
        }
        Command::Reports { command } => reports(&connect(config)?, command, format).await,
    }
}

fn connect(config: &CliConfig) -> Result<StraddleClient> {
    let client = StraddleClient::new(config.client_config()?).context("build Straddle client")?;
    info!(base_url = %client.base_url(), "client ready");
    Ok(client)
}

async fn customers(
    client: &StraddleClient,
    command: &CustomerCommand,
    format: OutputFormat,
) -> Result<String> {
    let headers = RequestHeaders::new();
    match command {
        CustomerCommand::List(args) => {
            let params = args.params();
            if args.all {
                let customers: Vec<CustomerSummary> = client
                    .list_customers_stream(params)
                    .try_collect()
                    .await
                    .context("list customers")?;
                info!(count = customers.len(), "listed every customer page");
                render(&customers, format)
            } else {
                let page = client.list_customers(&params).await.context("list customers")?;
                render(&page, format)
            }
        }
        CustomerCommand::Get { id, unmasked } => {
            let customer = if *unmasked {
                client.get_customer_unmasked(id, &headers).await
            } else {
                client.get_customer(id, &headers).await
            }
            .with_context(|| format!("get customer {id}"))?;
            render(&customer.data, format)
        }
        CustomerCommand::Create {
            file,
            idempotency_key,
        } => {
            let mut params: CustomerCreateParams = read_document(file)?;
            if let Some(key) = idempotency_key {
                params.headers = params.headers.with_idempotency_key(key.clone());
            }
            let customer = client
                .create_customer(&params)
                .await
                .context("create customer")?;
            render(&customer.data, format)
        }
        CustomerCommand::UpdateStatus { id, status } => {
            let params = CustomerUpdateParams {
                status: Some(status.clone()),
                ..Default::default()
            };
            let customer = client
                .update_customer(id, &params)
                .await
                .with_context(|| format!("update customer {id}"))?;
            render(&customer.data, format)
        }
        CustomerCommand::Delete { id } => {
            let customer = client
                .delete_customer(id, &headers)
                .await
                .with_context(|| format!("delete customer {id}"))?;
            render(&customer.data, format)
        }
        CustomerCommand::Review { id } => {
            let review = client
                .get_customer_review(id, &headers)
                .await
                .with_context(|| format!("get review for customer {id}"))?;
            render(&review.data, format)
        }
        CustomerCommand::Decide { id, decision } => {
            let params = CustomerReviewDecisionParams::new(decision.clone());
            let customer = client
                .decide_customer_review(id, &params)
                .await
                .with_context(|| format!("decide review for customer {id}"))?;
            render(&customer.data, format)
        }
        CustomerCommand::RefreshReview { id } => {
            let customer = client
                .refresh_customer_review(id, &headers)
                .await
                .with_context(|| format!("refresh review for customer {id}"))?;
            render(&customer.data, format)
        }
    }
}

async fn organizations(
    client: &StraddleClient,
    command: &OrganizationCommand,
    format: OutputFormat,
) -> Result<String> {
    match command {
        OrganizationCommand::List(args) => {
            let params = args.params();
            if args.all {
                let organizations: Vec<Organization> = client
                    .list_organizations_stream(params)
                    .try_collect()
                    .await
                    .context("list organizations")?;
                render(&organizations, format)
            } else {
                let page = client
                    .list_organizations(&params)
                    .await
                    .context("list organizations")?;
                render(&page, format)
            }
        }
        OrganizationCommand::Get { id } => {
            let organization = client
                .get_organization(id, &RequestHeaders::new())
                .await
                .with_context(|| format!("get organization {id}"))?;
            render(&organization.data, format)
        }
        OrganizationCommand::Create {
            name,
            external_id,
            idempotency_key,
        } => {
            let mut params = OrganizationCreateParams::new(name.clone());
            params.external_id = external_id.clone();
            if let Some(key) = idempotency_key {
                params.headers = params.headers.with_idempotency_key(key.clone());
            }
            let organization = client
                .create_organization(&params)
                .await
                .context("create organization")?;
            render(&organization.data, format)
        }
    }
}

async fn reports(
    client: &StraddleClient,
    command: &ReportCommand,
    format: OutputFormat,
) -> Result<String> {
    match command {
        ReportCommand::CustomersByStatus => {
            let report = client
                .customers_by_status(&RequestHeaders::new())
                .await
                .context("fetch customers-by-status report")?;
            render(&report.data, format)
        }
    }
}

/// Parse a JSON file, or YAML for any other extension
fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(&content).with_context(|| format!("parse {} as JSON", path.display()))
    } else {
        serde_yaml::from_str(&content).with_context(|| format!("parse {} as YAML", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CustomerListArgs;
    use serde_json::json;
    use std::path::PathBuf;
    use straddle_adapter::{CustomerStatus, CustomerType, Environment};
    use tokio_test::assert_ok;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> CliConfig {
        CliConfig {
            api_key: Some("sk_test_abcdefgh1234".to_string()),
            environment: Environment::Sandbox,
            base_url: Some(server.uri()),
            timeout_secs: 5,
            max_retries: 0,
            account_id: None,
            strict: false,
        }
    }

    fn customer_row(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": "Ada Lovelace",
            "type": "individual",
            "email": "ada@example.com",
            "phone": "+12125550123",
            "status": "review",
            "created_at": "2024-03-01T12:00:00Z",
            "updated_at": "2024-03-01T12:00:00Z"
        })
    }

    fn page(number: u32, total: u32, ids: &[&str]) -> serde_json::Value {
        json!({
            "meta": {
                "api_request_id": "r",
                "api_request_timestamp": "2024-03-01T12:00:00Z",
                "max_page_size": 1000,
                "page_number": number,
                "page_size": ids.len(),
                "total_items": 3,
                "total_pages": total
            },
            "response_type": "array",
            "data": ids.iter().map(|id| customer_row(id)).collect::<Vec<_>>()
        })
    }

    #[tokio::test]
    async fn test_list_all_follows_pages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/customers"))
            .and(query_param("page_number", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(2, 2, &["cus_3"])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/customers"))
            .and(query_param("status", "review"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(1, 2, &["cus_1", "cus_2"])))
            .expect(1)
            .mount(&server)
            .await;

        let command = Command::Customers {
            command: CustomerCommand::List(CustomerListArgs {
                status: vec![CustomerStatus::Review],
                all: true,
                ..Default::default()
            }),
        };
        let rendered = assert_ok!(run(&command, &config_for(&server), OutputFormat::Json).await);

        let value: serde_json::Value = serde_json::from_str(&rendered).expect("json output");
        let ids: Vec<&str> = value
            .as_array()
            .expect("array output")
            .iter()
            .filter_map(|row| row["id"].as_str())
            .collect();
        assert_eq!(ids, vec!["cus_1", "cus_2", "cus_3"]);
    }

    #[tokio::test]
    async fn test_update_status_sends_only_status() {
        let server = MockServer::start().await;
        let mut updated = customer_row("cus_1");
        updated["status"] = json!("inactive");
        Mock::given(method("PATCH"))
            .and(path("/v1/customers/cus_1"))
            .and(body_json(json!({ "status": "inactive" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "meta": { "api_request_id": "r", "api_request_timestamp": "2024-03-01T12:00:00Z" },
                "response_type": "object",
                "data": updated
            })))
            .expect(1)
            .mount(&server)
            .await;

        let command = Command::Customers {
            command: CustomerCommand::UpdateStatus {
                id: "cus_1".to_string(),
                status: CustomerStatus::Inactive,
            },
        };
        let rendered = assert_ok!(run(&command, &config_for(&server), OutputFormat::Yaml).await);
        assert!(rendered.contains("status: inactive"));
    }

    #[tokio::test]
    async fn test_config_command_needs_no_api_key() {
        let config = CliConfig {
            api_key: None,
            environment: Environment::Production,
            base_url: None,
            timeout_secs: 60,
            max_retries: 2,
            account_id: None,
            strict: false,
        };
        let rendered = assert_ok!(run(&Command::Config, &config, OutputFormat::Json).await);
        assert!(rendered.contains("https://production.straddle.io"));
        assert!(rendered.contains("\"api_key\": null"));
    }

    #[test]
    fn test_read_document_by_extension() {
        let dir = std::env::temp_dir();
        let yaml_path: PathBuf = dir.join(format!("straddle-cli-{}.yaml", std::process::id()));
        fs::write(
            &yaml_path,
            "type: individual\nname: Ada Lovelace\nemail: ada@example.com\nphone: \"+12125550123\"\ndevice:\n  ip_address: 192.168.1.1\n",
        )
        .unwrap();
        let params: CustomerCreateParams = assert_ok!(read_document(&yaml_path));
        fs::remove_file(&yaml_path).ok();
        assert_eq!(params.customer_type, CustomerType::Individual);
        assert_eq!(params.device.ip_address, "192.168.1.1");

        let json_path: PathBuf = dir.join(format!("straddle-cli-{}.json", std::process::id()));
        fs::write(&json_path, "{ \"name\": \"Acme\" }").unwrap();
        let parsed: serde_json::Value = read_document(&json_path).expect("json document");
        fs::remove_file(&json_path).ok();
        assert_eq!(parsed["name"], "Acme");
    }
}
