use crate::email::process_due_emails::ProcessDueEmailsUseCase;
use crate::event::dispatch_goes_live::DispatchGoesLiveUseCase;
use crate::shared::usecase::execute;
use actix_web::rt;
use actix_web::rt::time::{interval, sleep_until, Instant};
use mingle_notify_domain::ID;
use mingle_notify_infra::MingleContext;
use std::time::Duration;
use tracing::error;

/// Periodically drains the delayed-send queue. The interval is configured
/// via `EMAIL_DISPATCH_INTERVAL_SECS`.
pub fn start_email_dispatch_job(ctx: MingleContext) {
    rt::spawn(async move {
        let mut interval = interval(Duration::from_secs(ctx.config.dispatch_interval_secs));
        loop {
            interval.tick().await;

            let usecase = ProcessDueEmailsUseCase {};
            let _ = execute(usecase, &ctx).await;
        }
    });
}

/// One-shot deferred callback: sleeps until `fire_at` (millis) and then runs
/// the goes-live dispatch for the event. Callbacks for different events are
/// independent tasks and may fire concurrently.
pub fn schedule_goes_live_dispatch(ctx: MingleContext, event_id: ID, fire_at: i64) {
    rt::spawn(async move {
        let now = ctx.sys.get_timestamp_millis();
        let delay = Duration::from_millis((fire_at - now).max(0) as u64);
        sleep_until(Instant::now() + delay).await;

        let usecase = DispatchGoesLiveUseCase {
            event_id: event_id.clone(),
        };
        if let Err(e) = execute(usecase, &ctx).await {
            // The moment has passed; there is nothing to retry.
            error!(
                "Goes-live dispatch for event {} was abandoned: {:?}",
                event_id, e
            );
        }
    });
}
