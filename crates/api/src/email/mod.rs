pub mod cancel_scheduled_email;
pub mod create_batch;
pub mod create_rule;
pub mod create_template;
pub mod get_batch;
pub mod get_rules;
pub mod get_scheduled_emails;
pub mod get_template;
pub mod process_batch;
pub mod process_due_emails;
pub mod schedule_batch;
pub mod trigger_email_event;
pub mod update_rule;
pub mod update_template;

use actix_web::web;
use cancel_scheduled_email::cancel_scheduled_email_controller;
use create_batch::create_batch_controller;
use create_rule::create_rule_controller;
use create_template::create_template_controller;
use get_batch::get_batch_controller;
use get_rules::get_rules_controller;
use get_scheduled_emails::get_scheduled_emails_controller;
use get_template::get_template_controller;
use process_batch::process_batch_controller;
use process_due_emails::process_due_emails_controller;
use schedule_batch::schedule_batch_controller;
use trigger_email_event::trigger_email_event_controller;
use update_rule::update_rule_controller;
use update_template::update_template_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // The sole inbound trigger boundary of the notification engine.
    cfg.route("/email/events", web::post().to(trigger_email_event_controller));

    cfg.route("/email/rules", web::post().to(create_rule_controller));
    cfg.route("/email/rules", web::get().to(get_rules_controller));
    cfg.route("/email/rules/{rule_id}", web::put().to(update_rule_controller));

    cfg.route("/email/templates", web::post().to(create_template_controller));
    cfg.route(
        "/email/templates/{template_id}",
        web::get().to(get_template_controller),
    );
    cfg.route(
        "/email/templates/{template_id}",
        web::put().to(update_template_controller),
    );

    cfg.route(
        "/users/{user_id}/scheduled-emails",
        web::get().to(get_scheduled_emails_controller),
    );
    cfg.route(
        "/email/scheduled/{scheduled_email_id}",
        web::delete().to(cancel_scheduled_email_controller),
    );
    cfg.route(
        "/email/scheduled/process",
        web::post().to(process_due_emails_controller),
    );

    cfg.route("/email/batches", web::post().to(create_batch_controller));
    cfg.route("/email/batches/{batch_id}", web::get().to(get_batch_controller));
    cfg.route(
        "/email/batches/{batch_id}/schedule",
        web::post().to(schedule_batch_controller),
    );
    cfg.route(
        "/email/batches/{batch_id}/process",
        web::post().to(process_batch_controller),
    );
}
