/*
[INPUT]:  STRADDLE_API_KEY / STRADDLE_ENVIRONMENT environment variables
[OUTPUT]: Every verified customer, followed by the status report
[POS]:    Examples - paginated customer listing
[UPDATE]: When list filters or pagination change
*/

use futures_util::{TryStreamExt, pin_mut};
use straddle_adapter::*;

/// Example: walk every page of verified customers
///
/// Run with `STRADDLE_API_KEY=... STRADDLE_ENVIRONMENT=sandbox cargo run --example list_customers`.
#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Straddle Customer Listing Example ===\n");

    let client = StraddleClient::from_env()?;
    println!("✓ Client created for {}\n", client.base_url());

    let params = CustomerListParams {
        status: vec![CustomerStatus::Verified],
        sort_by: Some(CustomerSortBy::CreatedAt),
        sort_order: Some(SortOrder::Desc),
        page_size: Some(50),
        ..Default::default()
    };

    let customers = client.list_customers_stream(params);
    pin_mut!(customers);
    let mut count = 0usize;
    while let Some(customer) = customers.try_next().await? {
        count += 1;
        println!("{:>4}. {} <{}> ({})", count, customer.name, customer.email, customer.id);
    }

    let report = client.customers_by_status(&RequestHeaders::new()).await?;
    println!(
        "\n✓ Listed {} verified customers ({} in total across all statuses)",
        count,
        report.data.total()
    );
    Ok(())
}
