mod add_calendar_member;
mod create_calendar;

use actix_web::web;
use add_calendar_member::add_calendar_member_controller;
use create_calendar::create_calendar_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/calendars", web::post().to(create_calendar_controller));
    cfg.route(
        "/calendars/{calendar_id}/members",
        web::post().to(add_calendar_member_controller),
    );
}
