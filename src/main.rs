mod telemetry;

use mingle_notify_api::Application;
use mingle_notify_infra::{run_migration, setup_context};
use telemetry::{get_subscriber, init_subscriber};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber("mingle_notify_server".into(), "info".into());
    init_subscriber(subscriber);

    if std::env::var("DATABASE_URL").is_ok() {
        run_migration().await.expect("To run database migrations");
    }

    let context = setup_context().await;

    let app = Application::new(context).await?;
    app.start().await
}
