use chrono::{Duration, Local};
use postita_client::{Client, Document, JobStatus, PostClass, SendOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let user = std::env::var("POSTITA_USER")?;
    let pass = std::env::var("POSTITA_PASS")?;
    let client = Client::new(user, pass)?;

    println!("Account: {}", client.account_info().await?);

    if let Some(path) = std::env::args().nth(1) {
        let pdf = Document::from_path(&path).await?;
        let options = SendOptions::new().post_class(PostClass::SecondClass);
        let job = client.send("demo letter", &pdf, &options).await?;
        println!("Sent {path}: {job}");
    }

    let week_ago = Local::now().date_naive() - Duration::days(7);
    println!("Last week: {}", client.list_jobs(week_ago).await?);
    println!("Unconfirmed: {}", client.list_jobs(JobStatus::New).await?);

    Ok(())
}
