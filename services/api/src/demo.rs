use crate::infra::{in_memory_service, parse_date};
use chrono::{Local, NaiveDate};
use clap::Args;
use serde_json::json;
use std::sync::Arc;
use tradepost::error::AppError;
use tradepost::marketplace::listings::domain::{PostId, UserId};
use tradepost::marketplace::listings::fields::quarters::quarterly_labels;
use tradepost::marketplace::listings::service::ListingServiceError;
use tradepost::marketplace::listings::{ListingSubmission, SubmittedField};
use uuid::Uuid;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Viewer whose feed the demo renders after blocking
    #[arg(long, default_value_t = 100)]
    pub(crate) viewer: i64,
    /// Skip the rejected-submission portion of the demo
    #[arg(long)]
    pub(crate) skip_rejection: bool,
}

#[derive(Args, Debug)]
pub(crate) struct QuartersArgs {
    /// Reference date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
}

pub(crate) fn run_quarters(args: QuartersArgs) -> Result<(), AppError> {
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    println!("Quarterly delivery labels valid on {date}:");
    for label in quarterly_labels(date) {
        println!("- {label}");
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        viewer,
        skip_rejection,
    } = args;
    let viewer = UserId(viewer);

    println!("Marketplace listing demo");
    let (service, posts) = in_memory_service();
    let service = Arc::new(service);
    posts.register_user(UserId(7), "ivan");
    posts.register_user(UserId(8), "maria");

    let kept = service
        .submit(demo_submission(UserId(7), "Two-room apartment", 85_000.0))
        .map_err(AppError::from)?;
    let hidden = service
        .submit(demo_submission(UserId(8), "Garage box", 12_000.0))
        .map_err(AppError::from)?;

    for url in photo_urls(kept.id, 2) {
        service.attach_photo(kept.id, url).map_err(AppError::from)?;
    }
    for url in photo_urls(hidden.id, 1) {
        service
            .attach_photo(hidden.id, url)
            .map_err(AppError::from)?;
    }

    println!("- Stored posts {} and {}", kept.id.0, hidden.id.0);

    service
        .block_by_moderator(UserId(1), hidden.id)
        .map_err(AppError::from)?;
    println!("- Moderator blocked post {}", hidden.id.0);

    let feed = service.feed(viewer).map_err(AppError::from)?;
    println!("Feed for viewer {}:", viewer.0);
    match serde_json::to_string_pretty(&feed) {
        Ok(payload) => println!("{payload}"),
        Err(err) => println!("  feed payload unavailable: {err}"),
    }

    if skip_rejection {
        return Ok(());
    }

    println!("\nRejected submission demo");
    let mut rejected = demo_submission(UserId(7), "Overstuffed apartment", 1.0);
    rejected.additional_fields = vec![
        SubmittedField::new("rooms", json!(99)),
        SubmittedField::new("rooms", json!(99)),
        SubmittedField::new("finish", json!("gilded")),
    ];

    match service.submit(rejected) {
        Ok(stored) => println!("  Unexpectedly accepted as post {}", stored.id.0),
        Err(ListingServiceError::Rejected(report)) => {
            match serde_json::to_string_pretty(&report) {
                Ok(payload) => println!("{payload}"),
                Err(err) => println!("  report unavailable: {err}"),
            }
        }
        Err(err) => println!("  Submission failed: {err}"),
    }

    Ok(())
}

fn demo_submission(owner: UserId, title: &str, price: f64) -> ListingSubmission {
    ListingSubmission {
        owner,
        title: title.to_string(),
        description: "Demo listing".to_string(),
        price,
        trade: false,
        category: "apartments".to_string(),
        additional_fields: vec![
            SubmittedField::new("rooms", json!(2)),
            SubmittedField::new("finish", json!("turnkey")),
            SubmittedField::new(
                "amenities",
                json!([
                    { "title": "parking" },
                    { "title": "balcony" },
                    { "title": "elevator" }
                ]),
            ),
        ],
    }
}

fn photo_urls(post: PostId, count: usize) -> Vec<String> {
    (0..count)
        .map(|_| format!("pics_web/{}/{}.jpg", post.0, Uuid::new_v4()))
        .collect()
}
