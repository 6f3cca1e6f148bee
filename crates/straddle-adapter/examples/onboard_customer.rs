/*
[INPUT]:  STRADDLE_API_KEY environment variable (sandbox key)
[OUTPUT]: A sandbox customer driven through manual review
[POS]:    Examples - customer onboarding and identity review
[UPDATE]: When customer creation or review endpoints change
*/

use chrono::NaiveDate;
use straddle_adapter::*;

/// Example: create an individual in the sandbox, force it into review, then approve it
#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Straddle Onboarding Example ===\n");

    let config = ClientConfig::from_env()?.with_environment(Environment::Sandbox);
    let client = StraddleClient::new(config)?;

    let mut params = CustomerCreateParams::new(
        CustomerType::Individual,
        "Ada Lovelace",
        "ada@example.com",
        "+12125550123",
        "192.168.1.1",
    );
    params.address = Some(Address::new("1 Main St", "New York", "NY", "10001"));
    params.compliance_profile = Some(ComplianceProfileParams::Individual {
        dob: NaiveDate::from_ymd_opt(1990, 12, 10).ok_or_else(|| {
            StraddleError::invalid("compliance_profile.dob", "not a calendar date")
        })?,
        ssn: "123456789".to_string(),
    });
    params.config = Some(CustomerConfig {
        sandbox_outcome: Some(SandboxOutcome::Review),
        ..Default::default()
    });

    let created = client.create_customer(&params).await?;
    println!("✓ Created {} with status {}", created.data.id, created.data.status);

    let review = client
        .get_customer_review(&created.data.id, &RequestHeaders::new())
        .await?;
    if let Some(identity) = review.data.identity_details.as_ref() {
        println!("✓ Identity decision: {}", identity.decision);
        for (check, result) in &identity.breakdown {
            let decision = result
                .decision
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "-".to_string());
            println!(
                "    {check}: {decision} {:?}",
                result.codes.as_deref().unwrap_or_default()
            );
        }
    }

    let decided = client
        .decide_customer_review(
            &created.data.id,
            &CustomerReviewDecisionParams::new(ReviewDecision::Verified),
        )
        .await?;
    println!("✓ Review decided, customer is now {}", decided.data.status);
    Ok(())
}
